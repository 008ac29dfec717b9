//! Query filters.
//!
//! - [`lookups`] - Q objects and lookup types for filtering

pub mod lookups;

pub use lookups::{Lookup, Q};
