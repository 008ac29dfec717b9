//! The [`Enumeration`] trait: typed access to a declared registry.
//!
//! Implemented by `#[derive(Enumeration)]` for fieldless Rust enums. The
//! derive builds the [`Enum`] registry on first use from the variant
//! declarations, so every variant is registered before any of them is read.

use enumfield_core::{EnumError, EnumResult};

use super::item::Item;
use super::registry::Enum;

/// A Rust enum whose variants are registered as [`Item`]s.
///
/// Only [`enumeration`](Enumeration::enumeration),
/// [`variants`](Enumeration::variants) and [`value`](Enumeration::value) are
/// required; everything else is derived from them.
pub trait Enumeration: Copy + Sized + 'static {
    /// The registry holding one item per variant.
    fn enumeration() -> &'static Enum;

    /// All variants in declaration order.
    fn variants() -> &'static [Self];

    /// The integer value of this variant.
    fn value(&self) -> i64;

    /// The registered item for this variant.
    ///
    /// # Panics
    ///
    /// Panics if `value()` has no registered item, which means the trait was
    /// implemented by hand inconsistently with `enumeration()`.
    fn item(&self) -> &'static Item {
        Self::enumeration()
            .from_value(self.value())
            .expect("every declared variant is registered in its enumeration")
    }

    /// The slug of this variant.
    fn slug(&self) -> &'static str {
        self.item().slug()
    }

    /// The display label of this variant.
    fn display(&self) -> &'static str {
        self.item().display()
    }

    /// Finds the variant matching an item (by value).
    fn from_item(item: &Item) -> Option<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|variant| variant.value() == item.value())
    }

    /// Finds the variant with the given value.
    fn from_value(value: i64) -> EnumResult<Self> {
        let item = Self::enumeration().from_value(value)?;
        Self::from_item(item).ok_or_else(|| EnumError::UnknownValue {
            enumeration: Self::enumeration().name().to_string(),
            value,
        })
    }

    /// Finds the variant with the given slug.
    fn from_slug(slug: &str) -> EnumResult<Self> {
        let item = Self::enumeration().from_slug(slug)?;
        Self::from_item(item).ok_or_else(|| EnumError::UnknownSlug {
            enumeration: Self::enumeration().name().to_string(),
            slug: slug.to_string(),
        })
    }

    /// The `(item, display)` choices of the registry.
    fn get_choices() -> Vec<(Item, String)> {
        Self::enumeration().get_choices()
    }
}
