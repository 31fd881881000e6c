//! vitakita-core
//!
//! Pure domain types and document key conventions for the VitaKita
//! check-in. No storage dependency; this is the shared vocabulary of the
//! diagnostic crates and the PWA bindings.

pub mod doc_keys;
pub mod error;
pub mod models;
