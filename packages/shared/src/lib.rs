//! Shared utilities for the Irori chat relay (logging, terminal colors).

pub mod color;
pub mod logger;
