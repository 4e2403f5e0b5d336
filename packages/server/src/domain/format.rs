//! Per-connection chunk formatting.

use irori_shared::color::RESET;

use super::identity::Identity;

/// Body of the join announcement.
pub const JOINED_TEXT: &str = "Joined...";

/// Wraps each inbound chunk of one connection with its identity prefix and a reset suffix.
///
/// One input chunk always yields exactly one output chunk; chunks are never
/// merged or split.
#[derive(Debug, Clone)]
pub struct ChunkFormatter {
    prefix: Vec<u8>,
}

impl ChunkFormatter {
    pub fn new(identity: &Identity) -> Self {
        Self {
            prefix: identity.prefix().as_bytes().to_vec(),
        }
    }

    /// `prefix ++ chunk ++ reset`
    pub fn format(&self, chunk: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + chunk.len() + RESET.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(chunk);
        out.extend_from_slice(RESET.as_bytes());
        out
    }
}

/// Announcement broadcast when `identity` joins: `prefix + "Joined..." + reset + "\n"`.
pub fn join_announcement(identity: &Identity) -> Vec<u8> {
    format!("{}{}{}\n", identity.prefix(), JOINED_TEXT, RESET).into_bytes()
}
