//! Utility functions shared by the enumfield crates.
//!
//! - [`text`]: string helpers (capitalization, integer literal parsing, repr quoting).

pub mod text;
