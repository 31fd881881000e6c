//! vitakita-checkin library root.
//!
//! Re-exports the config and rendering modules so integration tests can
//! exercise them without driving the interactive prompt.

pub mod config;
pub mod render;
