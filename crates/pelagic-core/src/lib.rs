//! Core types and trait definitions for the pelagic observation store.
//!
//! This crate is deliberately free of database and regex dependencies.
//! All other crates depend on it; it depends only on `chrono`, `serde`,
//! and `thiserror`.

pub mod error;
pub mod geo;
pub mod index;
pub mod plan;
pub mod platform;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use platform::PlatformId;
