//! Support library for the `genoclust` binary.
//!
//! Exposes the command pipeline and logging setup so tests can drive both
//! without spawning a subprocess.

pub mod cli;
pub mod logging;
