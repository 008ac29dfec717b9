//! A single named member of an enumeration.
//!
//! An [`Item`] pairs the integer stored in the database with a slug used in
//! code and a label shown to people. Items compare loosely: against other
//! items, integers, and strings, always by the underlying integer unless the
//! string is not numeric, in which case the slug decides.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use enumfield_core::utils::text::{capitalize, parse_int, repr_str};
use enumfield_core::{EnumError, EnumResult};

use crate::value::Value;

/// One member of an enumeration: value, slug, and display label.
///
/// # Examples
///
/// ```
/// use enumfield_db::enums::Item;
///
/// let red = Item::new(1, "RED", None).unwrap();
/// assert_eq!(red.display(), "Red");
///
/// assert_eq!(red, 1);
/// assert_eq!(red, "1");
/// assert_eq!(red, "RED");
/// assert_ne!(red, "red");
/// ```
#[derive(Clone)]
pub struct Item {
    value: i64,
    slug: String,
    display: String,
}

impl Item {
    /// Creates a new item.
    ///
    /// When `display` is `None` the label is the capitalized slug.
    ///
    /// # Errors
    ///
    /// Returns [`EnumError::InvalidItem`] if the slug is empty, contains
    /// whitespace, or is itself an integer literal (which would make string
    /// comparisons ambiguous).
    pub fn new(value: i64, slug: impl Into<String>, display: Option<&str>) -> EnumResult<Self> {
        let slug = slug.into();

        if slug.is_empty() {
            return Err(EnumError::InvalidItem(format!(
                "item {value} needs a non-empty slug"
            )));
        }
        if slug.chars().any(char::is_whitespace) {
            return Err(EnumError::InvalidItem(format!(
                "item slug should not contain whitespace, got {slug:?}"
            )));
        }
        if parse_int(&slug).is_some() {
            return Err(EnumError::InvalidItem(format!(
                "item slug should not be an integer, got {slug:?}"
            )));
        }

        let display = display.map_or_else(|| capitalize(&slug), ToString::to_string);

        Ok(Self {
            value,
            slug,
            display,
        })
    }

    /// The integer stored in the database.
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// The programmatic name.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The human-readable label.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Applies the string equality rule: numeric strings compare by value,
    /// anything else compares against the slug.
    pub fn matches_str(&self, other: &str) -> bool {
        parse_int(other).map_or_else(|| self.slug == other, |v| v == self.value)
    }

    /// Compares against a raw ORM value. Only integers and strings can match.
    pub fn matches_value(&self, other: &Value) -> bool {
        match other {
            Value::Int(i) => *i == self.value,
            Value::String(s) => self.matches_str(s),
            Value::Null | Value::Bool(_) | Value::Float(_) | Value::List(_) => false,
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<enum.Item: {} {} {}>",
            self.value,
            self.slug,
            repr_str(&self.display)
        )
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

// ── Equality and hashing ───────────────────────────────────────────────

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

macro_rules! impl_int_eq {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Item {
                fn eq(&self, other: &$ty) -> bool {
                    i64::try_from(*other).is_ok_and(|v| v == self.value)
                }
            }

            impl PartialEq<Item> for $ty {
                fn eq(&self, other: &Item) -> bool {
                    other == self
                }
            }
        )*
    };
}

impl_int_eq!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl PartialEq<str> for Item {
    fn eq(&self, other: &str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<&str> for Item {
    fn eq(&self, other: &&str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<String> for Item {
    fn eq(&self, other: &String) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<Item> for str {
    fn eq(&self, other: &Item) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<Item> for &str {
    fn eq(&self, other: &Item) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<Item> for String {
    fn eq(&self, other: &Item) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<Value> for Item {
    fn eq(&self, other: &Value) -> bool {
        self.matches_value(other)
    }
}

impl PartialEq<Item> for Value {
    fn eq(&self, other: &Item) -> bool {
        other.matches_value(self)
    }
}

// ── Conversions ────────────────────────────────────────────────────────

impl From<&Item> for Value {
    fn from(item: &Item) -> Self {
        Self::Int(item.value)
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Self::Int(item.value)
    }
}
