//! # enumfield-macros
//!
//! Procedural macros for django-enumfield. Provides `#[derive(Enumeration)]`,
//! which registers the variants of a fieldless enum as items of an
//! enumeration.
//!
//! This crate is independent of the other enumfield crates because proc-macro
//! crates cannot depend on crates that use them. Generated code refers to
//! `::enumfield_db` unless `#[enumeration(crate = "...")]` says otherwise.

mod enumeration;
mod utils;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `enumfield_db::enums::Enumeration` for a fieldless enum.
///
/// The enum must also derive `Clone` and `Copy`.
///
/// ```ignore
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Enumeration)]
/// #[enumeration(name = "Status")]
/// enum Status {
///     #[item(value = 1)]
///     Draft,
///     #[item(value = 2, slug = "LIVE", display = "Published")]
///     Live,
///     Archived = 3,
/// }
/// ```
///
/// Each variant takes its value from `#[item(value = ...)]` or from an
/// explicit discriminant. The slug defaults to the variant name in
/// `snake_case` and the display label to the capitalized slug.
#[proc_macro_derive(Enumeration, attributes(enumeration, item))]
pub fn derive_enumeration(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    enumeration::derive_enumeration_impl(&input).into()
}
