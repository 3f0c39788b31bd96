//! Mock servers for adapter integration testing
//!
//! Simulates the MPC-HC web interface so the adapters can be driven end to
//! end without a running player.

#[allow(dead_code)]
pub mod mpchc;

#[allow(unused_imports)]
pub use mpchc::{MockMpcHcServer, RecordedCommand};
