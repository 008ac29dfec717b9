//! # django-enumfield
//!
//! Integer-backed enumeration fields for the django-rs ORM.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `django-enumfield` to get everything, or depend on
//! individual crates for finer-grained control.
//!
//! ```
//! use django_enumfield::prelude::*;
//!
//! let size: &'static Enum = Enum::builder("Size")
//!     .item(1, "small", None)
//!     .item(2, "large", Some("Extra large"))
//!     .build()
//!     .unwrap()
//!     .leak();
//!
//! let field = EnumField::new("size", size).default_item(size.from_value(1).unwrap().clone());
//! assert_eq!(field.get_db_prep_save(&Value::from("large")).unwrap(), Value::Int(2));
//! assert_eq!(field.deconstruct().unwrap().path, "django.db.models.fields.IntegerField");
//! ```

/// Settings, logging, errors, and text utilities.
pub use enumfield_core as core;

/// Items, registries, `EnumField`, and lookups.
pub use enumfield_db as db;

/// `#[derive(Enumeration)]`.
#[cfg(feature = "macros")]
pub use enumfield_macros as macros;

/// Migration field states, change detection, and migration files.
#[cfg(feature = "migrations")]
pub use enumfield_migrations as migrations;

/// Template context resolution and `TemplateErrorDict`.
#[cfg(feature = "template")]
pub use enumfield_template as template;

pub use enumfield_core::logging::setup_logging;

/// The types most code needs.
pub mod prelude {
    pub use enumfield_core::{EnumError, EnumResult, ValidationError, SETTINGS};
    pub use enumfield_db::enums::{Enum, Enumeration, Item};
    pub use enumfield_db::fields::{EnumField, FieldDef, FieldType};
    pub use enumfield_db::query::{Lookup, Q};
    pub use enumfield_db::value::Value;

    #[cfg(feature = "macros")]
    pub use enumfield_macros::Enumeration;

    #[cfg(feature = "template")]
    pub use enumfield_template::{Context, ContextValue, TemplateError, TemplateErrorDict};
}
