//! Connection record held by the registry.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::identity::{ConnectionId, Identity};

/// Outbound half of a connection as seen by the session.
///
/// Bounded: a full channel makes the sender wait, which is how a slow
/// recipient pushes back on fan-out.
pub type OutboundChannel = mpsc::Sender<Vec<u8>>;

/// One joined peer (network socket or the local operator).
#[derive(Debug)]
pub struct Connection {
    identity: Identity,
    outbound: OutboundChannel,
    joined_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(identity: Identity, outbound: OutboundChannel) -> Self {
        Self {
            identity,
            outbound,
            joined_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.identity.id()
    }

    pub fn outbound(&self) -> &OutboundChannel {
        &self.outbound
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}
