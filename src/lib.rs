//! shiftris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and hosts the binary's
//! configuration and event log.

pub mod config;
pub mod log;

pub use shiftris_core as core;
pub use shiftris_input as input;
pub use shiftris_term as term;
pub use shiftris_types as types;

pub use config::AppConfig;
pub use log::EventLog;
