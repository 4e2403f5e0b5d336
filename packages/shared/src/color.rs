//! ANSI terminal color codes used to tag chat participants.

/// Resets all terminal attributes. Appended after every relayed chunk.
pub const RESET: &str = "\x1b[0m";

/// Rotating palette of participant colors, assigned in join order.
pub const PALETTE: [&str; 6] = [
    "\x1b[36m", // cyan
    "\x1b[33m", // yellow
    "\x1b[35m", // magenta
    "\x1b[32m", // green
    "\x1b[34m", // blue
    "\x1b[31m", // red
];

/// Color for the n-th participant. Cycles through [`PALETTE`] indefinitely.
pub fn nth(n: u64) -> &'static str {
    PALETTE[(n % PALETTE.len() as u64) as usize]
}
