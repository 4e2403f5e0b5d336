//! Identity allocation for newly joined connections.

use std::{fmt, ops::Range};

use irori_shared::color;
use rand::Rng;

/// Low byte range of the avatar glyph (half-open).
///
/// The glyph is the UTF-8 sequence `F0 9F 90 xx` with `xx` drawn from this
/// range, i.e. one of U+1F40C..U+1F43B (animal emoji block).
pub const AVATAR_RANGE: Range<u8> = 0x8C..0xBC;

/// Separator between the identity label and the chunk payload.
pub const PREFIX_SEPARATOR: &str = "\t❚ ";

/// Connection ID, assigned in join order and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decode an avatar low byte into its glyph.
///
/// `F0 9F 90 xx` decodes to `0x1F400 + (xx & 0x3F)`.
pub fn avatar_glyph(low: u8) -> char {
    char::from_u32(0x1F400 + u32::from(low & 0x3F)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Identity of one joined connection: id, color tag, avatar and the derived prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: ConnectionId,
    color: &'static str,
    avatar: char,
    prefix: String,
}

impl Identity {
    /// Allocate the identity for the `ordinal`-th join of the session.
    ///
    /// Callers serialize allocation so that ordinals stay unique and increasing.
    pub fn allocate(ordinal: u64) -> Self {
        Self::allocate_with(ordinal, &mut rand::rng())
    }

    /// Same as [`Identity::allocate`] with an explicit random source.
    pub fn allocate_with<R: Rng>(ordinal: u64, rng: &mut R) -> Self {
        let color = color::nth(ordinal);
        let avatar = avatar_glyph(rng.random_range(AVATAR_RANGE));
        let prefix = format!("{color}User {ordinal} {avatar}{}", PREFIX_SEPARATOR);

        Self {
            id: ConnectionId::new(ordinal),
            color,
            avatar,
            prefix,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn color(&self) -> &'static str {
        self.color
    }

    pub fn avatar(&self) -> char {
        self.avatar
    }

    /// `color + "User " + id + " " + avatar + separator`, computed once at join.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
