//! # enumfield-core
//!
//! Core types shared by the enumfield crates: error types, settings and their
//! loaders, logging setup, and small text helpers. This crate has no
//! dependency on the other enumfield crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings and the global [`SETTINGS`] instance
//! - [`settings_loader`] - TOML/JSON loading with environment overrides
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{EnumError, EnumResult, ValidationError};
pub use settings::{Settings, SETTINGS};
