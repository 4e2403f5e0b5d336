//! Irori chat peer.
//!
//! Joins a running session as a plain TCP peer, or hosts a new session when
//! nobody is listening yet.

pub mod error;
pub mod runner;
pub mod session;

pub use runner::{ClientConfig, run};
