//! Field definitions for the ORM.
//!
//! [`FieldDef`] and [`FieldType`] describe plain model fields and their
//! column mappings; [`EnumField`] layers an enumeration on top of an
//! integer field, and [`deconstruct`] turns fields into the descriptions
//! migration tooling stores.

pub mod deconstruct;
pub mod enum_field;
pub mod types;

pub use deconstruct::{Deconstruction, FieldTriple, Kwargs};
pub use enum_field::{EnumDefault, EnumField};
pub use types::{FieldDef, FieldType};
