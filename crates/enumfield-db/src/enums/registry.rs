//! The enumeration registry.
//!
//! An [`Enum`] maps integer values to [`Item`]s. It is assembled once, at
//! definition time, through [`EnumBuilder`] (directly, or by the code
//! `#[derive(Enumeration)]` generates) and is never mutated afterwards:
//! registries are handed out as `&'static Enum`.

use std::collections::{btree_map, BTreeMap, HashMap};

use enumfield_core::utils::text::parse_int;
use enumfield_core::{EnumError, EnumResult};

use super::item::Item;
use crate::value::Value;

/// A registry of items keyed by value.
///
/// # Examples
///
/// ```
/// use enumfield_db::enums::Enum;
/// use enumfield_db::value::Value;
///
/// let status = Enum::builder("Status")
///     .item(10, "DRAFT", None)
///     .item(20, "LIVE", Some("Published"))
///     .build()
///     .unwrap();
///
/// assert_eq!(status.from_value(20).unwrap().display(), "Published");
/// assert_eq!(status.to_python(&Value::from("DRAFT")).unwrap().unwrap().value(), 10);
/// assert_eq!(status.get_choices()[0].1, "Draft");
/// ```
#[derive(Debug, Clone)]
pub struct Enum {
    name: String,
    items: BTreeMap<i64, Item>,
    slugs: HashMap<String, i64>,
}

impl Enum {
    /// Creates an empty registry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: BTreeMap::new(),
            slugs: HashMap::new(),
        }
    }

    /// Starts a declarative definition.
    pub fn builder(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Registers an item.
    ///
    /// # Errors
    ///
    /// Fails if another item already uses the same value or slug.
    pub fn add_item(&mut self, item: Item) -> EnumResult<()> {
        if self.items.contains_key(&item.value()) {
            return Err(EnumError::DuplicateValue {
                enumeration: self.name.clone(),
                value: item.value(),
            });
        }
        if self.slugs.contains_key(item.slug()) {
            return Err(EnumError::DuplicateSlug {
                enumeration: self.name.clone(),
                slug: item.slug().to_string(),
            });
        }

        tracing::trace!(
            enumeration = %self.name,
            value = item.value(),
            slug = item.slug(),
            "registered enumeration item"
        );
        self.slugs.insert(item.slug().to_string(), item.value());
        self.items.insert(item.value(), item);
        Ok(())
    }

    /// Moves the registry onto the heap for the rest of the program.
    ///
    /// Useful for registries built at runtime that need to back an
    /// [`EnumField`](crate::fields::EnumField).
    pub fn leak(self) -> &'static Self {
        Box::leak(Box::new(self))
    }

    /// The enumeration's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up an item by value.
    pub fn from_value(&self, value: i64) -> EnumResult<&Item> {
        self.items.get(&value).ok_or_else(|| EnumError::UnknownValue {
            enumeration: self.name.clone(),
            value,
        })
    }

    /// Looks up an item by slug.
    pub fn from_slug(&self, slug: &str) -> EnumResult<&Item> {
        self.slugs
            .get(slug)
            .and_then(|value| self.items.get(value))
            .ok_or_else(|| EnumError::UnknownSlug {
                enumeration: self.name.clone(),
                slug: slug.to_string(),
            })
    }

    /// Iterates over the items in ascending value order.
    pub fn iter(&self) -> btree_map::Values<'_, i64, Item> {
        self.items.values()
    }

    /// Returns the item at `index` in ascending value order.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.values().nth(index)
    }

    /// Returns the item with the lowest value.
    pub fn first(&self) -> Option<&Item> {
        self.items.values().next()
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `(item, display)` pairs in ascending value order.
    pub fn get_choices(&self) -> Vec<(Item, String)> {
        self.iter()
            .map(|item| (item.clone(), item.display().to_string()))
            .collect()
    }

    /// Converts a raw value to an item.
    ///
    /// `Null` and the empty string mean "no item". Integers are looked up by
    /// value; strings by value when numeric, otherwise by slug.
    ///
    /// # Errors
    ///
    /// Fails for unknown values or slugs, and for values of any other kind.
    pub fn to_python(&self, value: &Value) -> EnumResult<Option<&Item>> {
        if value.is_empty_input() {
            return Ok(None);
        }

        match value {
            Value::Int(i) => self.from_value(*i).map(Some),
            Value::String(s) => match parse_int(s) {
                Some(i) => self.from_value(i).map(Some),
                None => self.from_slug(s).map(Some),
            },
            other => Err(EnumError::InvalidValue(format!(
                "{} cannot hold a {} value: {other}",
                self.name,
                other.kind()
            ))),
        }
    }

    /// Returns `true` if `value` converts to an item of this enumeration.
    pub fn contains(&self, value: &Value) -> bool {
        matches!(self.to_python(value), Ok(Some(_)))
    }
}

impl<'a> IntoIterator for &'a Enum {
    type Item = &'a Item;
    type IntoIter = btree_map::Values<'a, i64, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

/// Collects item declarations and registers them in declaration order.
///
/// Item construction errors are deferred to [`build`](EnumBuilder::build) so
/// declarations can be chained.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    items: Vec<EnumResult<Item>>,
}

impl EnumBuilder {
    /// Declares an item.
    #[must_use]
    pub fn item(mut self, value: i64, slug: &str, display: Option<&str>) -> Self {
        self.items.push(Item::new(value, slug, display));
        self
    }

    /// Adds an already constructed item.
    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(Ok(item));
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns the first invalid item or duplicate value/slug encountered.
    pub fn build(self) -> EnumResult<Enum> {
        let span = enumfield_core::logging::enumeration_span(&self.name);
        let _guard = span.enter();

        let mut registry = Enum::new(self.name);
        for item in self.items {
            registry.add_item(item?)?;
        }
        tracing::debug!(items = registry.len(), "built enumeration");
        Ok(registry)
    }
}
