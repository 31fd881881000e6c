//! vitakita-storage
//!
//! The profile persistence port and its adapters: S3 JSON documents for the
//! hosted deployment, local JSON files for single-device use.

pub mod client;
pub mod error;
pub mod local;
pub mod objects;
pub mod port;
pub mod s3;
pub mod state;
