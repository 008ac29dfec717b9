//! # enumfield-template
//!
//! Template-side helpers for django-enumfield: a [`Context`](context::Context)
//! that resolves dotted variables, and the strict
//! [`TemplateErrorDict`](error_dict::TemplateErrorDict) whose missing keys are
//! errors rather than empty strings.
//!
//! ## Module Overview
//!
//! - [`context`] - `ContextValue`, `Context`, and item/enumeration conversions
//! - [`error_dict`] - `TemplateErrorDict` and `TemplateError`

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::float_cmp)]

pub mod context;
pub mod error_dict;

pub use context::{strict_enum_context, Context, ContextValue};
pub use error_dict::{TemplateError, TemplateErrorDict};
