//! Line-oriented multi-user chat relay over raw TCP.
//!
//! Every chunk a peer sends is tagged with the peer's identity prefix and
//! fanned out to every other peer. All broadcast traffic is appended to a
//! per-session history file that newcomers receive in full before live
//! traffic.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
