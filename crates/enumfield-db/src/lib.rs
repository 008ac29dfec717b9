//! # enumfield-db
//!
//! Enumerations and the model field that stores them. Provides the
//! [`Item`](enums::Item) and [`Enum`](enums::Enum) registry types, the typed
//! [`Enumeration`](enums::Enumeration) trait, and
//! [`EnumField`](fields::EnumField), which keeps items in an integer column.
//!
//! ## Module Overview
//!
//! - [`enums`] - Items, registries, and typed enumerations
//! - [`fields`] - Field definitions, [`EnumField`](fields::EnumField), and deconstruction
//! - [`value`] - The backend-agnostic [`Value`](value::Value) enum
//! - [`query`] - Lookups and `Q` filters that enum fields rewrite

// These clippy lints are intentionally allowed for the ORM crate:
// - struct_excessive_bools: FieldDef mirrors Django's field API which uses many booleans
// - result_large_err: EnumError is the crate error type and should be used consistently
// - doc_markdown: backtick requirements for documentation items are too strict
// - return_self_not_must_use: builder pattern methods are self-documenting
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::wrong_self_convention)]

pub mod enums;
pub mod fields;
pub mod query;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use enums::{Enum, EnumBuilder, Enumeration, Item};
pub use fields::{Deconstruction, EnumDefault, EnumField, FieldDef, FieldTriple, FieldType};
pub use query::{Lookup, Q};
pub use value::Value;
