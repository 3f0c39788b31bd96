//! MPC-HC Control
//!
//! Bridges the MPC-HC (Media Player Classic - Home Cinema) web interface into
//! two device abstractions:
//! - a media player entity (state, progress, volume, transport controls)
//! - a remote entity (named command dispatch)
//!
//! The binary hosts both behind a small HTTP API with a periodic poller.

pub mod adapters;
pub mod api;
pub mod bus;
pub mod config;
pub mod error;
