//! # enumfield-migrations
//!
//! Migration state for enum fields. Enum fields reach migrations only
//! through their deconstruction, which describes a plain integer field; this
//! crate turns deconstructions into field states, diffs project states, and
//! reads and writes migration files.
//!
//! ## Module Overview
//!
//! - [`autodetect`] - `MigrationFieldDef`, `ModelState`, `ProjectState`, `MigrationAutodetector`
//! - [`operations`] - `Operation` trait and the model/field operations
//! - [`serializer`] - JSON migration files and `SerializableField`

// Clippy overrides appropriate for a migration crate.
#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod autodetect;
pub mod operations;
pub mod serializer;

// Re-export key types at the crate root.
pub use autodetect::{MigrationAutodetector, MigrationFieldDef, ModelState, ProjectState};
pub use operations::Operation;
pub use serializer::{SerializableField, SerializableMigration, SerializableOperation};
