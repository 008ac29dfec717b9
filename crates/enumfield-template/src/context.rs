//! Template context for variable resolution.
//!
//! Provides [`Context`] for holding template variables in a stack-based scope,
//! and [`ContextValue`] for representing dynamic template values. Missing
//! variables resolve to the configured `string_if_invalid`, except inside a
//! [`TemplateErrorDict`], whose misses abort resolution with a
//! [`TemplateError`].

use std::collections::HashMap;
use std::fmt;

use enumfield_core::utils::text::repr_str;
use enumfield_core::SETTINGS;
use enumfield_db::enums::{Enum, Item};

use crate::error_dict::{TemplateError, TemplateErrorDict};

/// Represents a dynamic value in a template context.
#[derive(Debug, Clone)]
pub enum ContextValue {
    /// A string value.
    String(String),
    /// A 64-bit integer.
    Integer(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// An ordered list of values.
    List(Vec<ContextValue>),
    /// A key-value mapping.
    Dict(HashMap<String, ContextValue>),
    /// A key-value mapping whose missing keys are errors.
    Strict(TemplateErrorDict<ContextValue>),
    /// The absence of a value (Python's `None`).
    None,
}

impl ContextValue {
    /// Returns `true` if this value is considered "truthy" in Django template logic.
    ///
    /// - `None` is falsy
    /// - Empty strings, empty lists, empty dicts are falsy
    /// - `Bool(false)` is falsy
    /// - `Integer(0)` and `Float(0.0)` are falsy
    /// - Everything else is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Dict(d) => !d.is_empty(),
            Self::Strict(d) => !d.is_empty(),
        }
    }

    /// Converts this value to a display string.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::None => String::new(),
            other => other.to_repr(),
        }
    }

    /// Returns a Python-like repr string.
    fn to_repr(&self) -> String {
        match self {
            Self::String(s) => repr_str(s),
            Self::Integer(i) => i.to_string(),
            // Python prints integral floats with a trailing `.0`
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{f:.1}"),
            Self::Float(f) => f.to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::None => "None".to_string(),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Self::to_repr).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Dict(map) => repr_map(map.iter()),
            Self::Strict(dict) => repr_map(dict.iter()),
        }
    }

    /// Resolves one path segment on this value (e.g. `name` or `0`).
    ///
    /// Returns `Ok(None)` when the segment does not apply, and an error only
    /// when a strict dict is missing the key.
    pub fn resolve_path(&self, key: &str) -> Result<Option<&ContextValue>, TemplateError> {
        match self {
            Self::Dict(map) => Ok(map.get(key)),
            Self::Strict(dict) => dict.lookup(key).map(Some),
            Self::List(list) => Ok(key.parse::<usize>().ok().and_then(|idx| list.get(idx))),
            _ => Ok(None),
        }
    }

    /// Returns the length of a list, string, or dict.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::List(l) => Some(l.len()),
            Self::Dict(d) => Some(d.len()),
            Self::Strict(d) => Some(d.len()),
            _ => None,
        }
    }

    /// Returns `true` if this is an empty collection or empty string.
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|l| l == 0)
    }

    /// Returns the string contents if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

fn repr_map<'a>(entries: impl Iterator<Item = (&'a String, &'a ContextValue)>) -> String {
    let mut inner: Vec<String> = entries
        .map(|(k, v)| format!("{}: {}", repr_str(k), v.to_repr()))
        .collect();
    inner.sort();
    format!("{{{}}}", inner.join(", "))
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                (*a as f64) == *b
            }
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::None, Self::None) => true,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::Strict(a), Self::Strict(b)) => a == b,
            _ => false,
        }
    }
}

// -- From implementations --

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for ContextValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ContextValue>> From<HashMap<String, T>> for ContextValue {
    fn from(m: HashMap<String, T>) -> Self {
        Self::Dict(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(o: Option<T>) -> Self {
        o.map_or(Self::None, Into::into)
    }
}

impl From<TemplateErrorDict<ContextValue>> for ContextValue {
    fn from(d: TemplateErrorDict<ContextValue>) -> Self {
        Self::Strict(d)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::None),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(arr) => {
                Self::List(arr.into_iter().map(ContextValue::from).collect())
            }
            serde_json::Value::Object(map) => Self::Dict(
                map.into_iter()
                    .map(|(k, v)| (k, ContextValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// An item as a template sees it: `value`, `slug` and `display`.
impl From<&Item> for ContextValue {
    fn from(item: &Item) -> Self {
        let mut map = HashMap::with_capacity(3);
        map.insert("value".to_string(), Self::Integer(item.value()));
        map.insert("slug".to_string(), Self::String(item.slug().to_string()));
        map.insert("display".to_string(), Self::String(item.display().to_string()));
        Self::Dict(map)
    }
}

impl From<Item> for ContextValue {
    fn from(item: Item) -> Self {
        Self::from(&item)
    }
}

/// Exposes an enumeration to templates as a strict dict keyed by slug.
///
/// `{{ Color.RED.value }}` resolves normally; `{{ Color.MAUVE }}` is an error
/// instead of an empty string.
pub fn strict_enum_context(enumeration: &Enum) -> ContextValue {
    let template = format!("{} has no item %r", enumeration.name());
    let mut dict = TemplateErrorDict::new(template);
    dict.extend(
        enumeration
            .iter()
            .map(|item| (item.slug().to_string(), ContextValue::from(item))),
    );
    ContextValue::Strict(dict)
}

/// A template context that holds variables in a stack of scopes.
///
/// The context supports push/pop semantics for nested scopes (e.g., inside
/// `{% for %}` or `{% with %}` blocks). Variable lookup searches from the
/// top of the stack downward.
///
/// # Examples
///
/// ```
/// use enumfield_template::context::{Context, ContextValue};
///
/// let mut ctx = Context::new().with_string_if_invalid("?");
/// ctx.set("name", ContextValue::from("Django"));
/// assert_eq!(ctx.resolve("name").unwrap().to_display_string(), "Django");
/// assert_eq!(ctx.resolve("missing").unwrap().to_display_string(), "?");
///
/// ctx.push();
/// ctx.set("name", ContextValue::from("Overridden"));
/// assert_eq!(ctx.resolve("name").unwrap().to_display_string(), "Overridden");
///
/// ctx.pop();
/// assert_eq!(ctx.resolve("name").unwrap().to_display_string(), "Django");
/// ```
pub struct Context {
    stack: Vec<HashMap<String, ContextValue>>,
    string_if_invalid: String,
}

impl Context {
    /// Creates a new empty context with a single scope.
    pub fn new() -> Self {
        Self {
            stack: vec![HashMap::new()],
            string_if_invalid: SETTINGS.get().string_if_invalid.clone(),
        }
    }

    /// Overrides what missing variables render as.
    #[must_use]
    pub fn with_string_if_invalid(mut self, value: impl Into<String>) -> Self {
        self.string_if_invalid = value.into();
        self
    }

    /// What missing variables render as.
    pub fn string_if_invalid(&self) -> &str {
        &self.string_if_invalid
    }

    /// Pushes a new scope onto the context stack.
    pub fn push(&mut self) {
        self.stack.push(HashMap::new());
    }

    /// Pops the top scope from the context stack.
    ///
    /// If only one scope remains, this is a no-op.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Sets a variable in the current (top) scope.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        if let Some(top) = self.stack.last_mut() {
            top.insert(key.into(), value.into());
        }
    }

    /// Looks up a dotted path like `user.name` or `items.0.title`.
    ///
    /// Returns `Ok(None)` for missing variables and the error of any strict
    /// dict the path runs into.
    pub fn get(&self, key: &str) -> Result<Option<&ContextValue>, TemplateError> {
        let mut parts = key.split('.');
        let root_key = parts.next().unwrap_or_default();

        let Some(mut current) = self.stack.iter().rev().find_map(|scope| scope.get(root_key))
        else {
            return Ok(None);
        };

        for part in parts {
            match current.resolve_path(part)? {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    /// Resolves a variable the way `{{ var }}` does.
    ///
    /// Missing variables become `string_if_invalid`. A [`TemplateError`] from
    /// a strict dict is never silent and is returned as-is.
    pub fn resolve(&self, key: &str) -> Result<ContextValue, TemplateError> {
        if let Some(value) = self.get(key)? {
            return Ok(value.clone());
        }
        tracing::trace!(variable = key, "unresolved template variable");
        Ok(ContextValue::String(self.string_if_invalid.clone()))
    }

    /// Resolves a variable and renders it as text.
    pub fn render_variable(&self, key: &str) -> Result<String, TemplateError> {
        self.resolve(key).map(|v| v.to_display_string())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
