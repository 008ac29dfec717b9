//! Enumerations: items, registries, and the typed [`Enumeration`] trait.
//!
//! - [`Item`] - one value/slug/display member with loose equality
//! - [`Enum`] - the immutable value-to-item registry and its builder
//! - [`Enumeration`] - typed access, implemented by `#[derive(Enumeration)]`

mod enumeration;
mod item;
mod registry;

pub use enumeration::Enumeration;
pub use item::Item;
pub use registry::{Enum, EnumBuilder};
