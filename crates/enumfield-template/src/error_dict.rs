//! A dictionary that refuses to be looked up silently.
//!
//! Template variable resolution normally swallows missing keys and renders
//! `string_if_invalid` instead. A [`TemplateErrorDict`] turns a missing key
//! into a [`TemplateError`] whose message comes from a `%s` template, so
//! typos in enum attribute names surface while the template renders.

use std::collections::{hash_map, HashMap};
use std::fmt;

use enumfield_core::utils::text::repr_str;
use enumfield_core::SETTINGS;

/// The error raised when a [`TemplateErrorDict`] is missing a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TemplateError {
    message: String,
    key: String,
}

impl TemplateError {
    /// Creates an error for a missing key.
    pub fn new(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: key.into(),
        }
    }

    /// The formatted message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The key that was missing.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether template rendering may swallow this error. Never.
    pub const fn silent_variable_failure(&self) -> bool {
        false
    }
}

/// Substitutes `key` into a `%`-style message template.
///
/// `%s` becomes the key, `%r` the quoted key, and `%%` a literal `%`.
/// Any other `%` sequence is copied unchanged.
pub fn format_missing_key(template: &str, key: &str) -> String {
    let mut out = String::with_capacity(template.len() + key.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                out.push_str(key);
                chars.next();
            }
            Some('r') => {
                out.push_str(&repr_str(key));
                chars.next();
            }
            Some('%') => {
                out.push('%');
                chars.next();
            }
            _ => out.push('%'),
        }
    }
    out
}

/// A map whose keyed lookup fails loudly.
///
/// [`lookup`](Self::lookup) returns a [`TemplateError`] for a missing key;
/// [`get`](Self::get) stays silent for code that wants to probe.
///
/// # Examples
///
/// ```
/// use enumfield_template::error_dict::TemplateErrorDict;
///
/// let mut colors = TemplateErrorDict::new("Unknown color: %s");
/// colors.insert("RED", 1);
///
/// assert_eq!(colors.lookup("RED"), Ok(&1));
/// let err = colors.lookup("BLUE").unwrap_err();
/// assert_eq!(err.to_string(), "Unknown color: BLUE");
/// assert!(!err.silent_variable_failure());
/// ```
#[derive(Clone, PartialEq)]
pub struct TemplateErrorDict<V> {
    template: String,
    entries: HashMap<String, V>,
}

impl<V> TemplateErrorDict<V> {
    /// Creates an empty dict using `template` for missing-key messages.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            entries: HashMap::new(),
        }
    }

    /// Creates an empty dict using the configured `missing_key_template`.
    pub fn with_default_template() -> Self {
        Self::new(SETTINGS.get().missing_key_template.clone())
    }

    /// The missing-key message template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Looks up `key`, failing with the formatted template if it is absent.
    pub fn lookup(&self, key: &str) -> Result<&V, TemplateError> {
        self.entries.get(key).ok_or_else(|| {
            tracing::warn!(key, "missing key in strict template dict");
            TemplateError::new(format_missing_key(&self.template, key), key)
        })
    }

    /// Looks up `key` without failing.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, V> {
        self.entries.iter()
    }

    /// Iterates over the keys in arbitrary order.
    pub fn keys(&self) -> hash_map::Keys<'_, String, V> {
        self.entries.keys()
    }
}

impl<V> Default for TemplateErrorDict<V> {
    fn default() -> Self {
        Self::with_default_template()
    }
}

impl<V: fmt::Debug> fmt::Debug for TemplateErrorDict<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateErrorDict")
            .field("template", &self.template)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for TemplateErrorDict<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::with_default_template();
        dict.extend(iter);
        dict
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for TemplateErrorDict<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

impl<'a, V> IntoIterator for &'a TemplateErrorDict<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = hash_map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_missing_key() {
        assert_eq!(format_missing_key("Missing: %s", "x"), "Missing: x");
        assert_eq!(format_missing_key("Missing %r", "x"), "Missing 'x'");
        assert_eq!(format_missing_key("100%% sure %s", "x"), "100% sure x");
        assert_eq!(format_missing_key("%s and %s", "x"), "x and x");
        assert_eq!(format_missing_key("no placeholder", "x"), "no placeholder");
        assert_eq!(format_missing_key("odd %d %", "x"), "odd %d %");
    }

    #[test]
    fn test_lookup_present() {
        let mut d = TemplateErrorDict::new("Missing %s");
        d.insert("a", 1);
        assert_eq!(d.lookup("a"), Ok(&1));
    }

    #[test]
    fn test_lookup_missing_raises() {
        let d: TemplateErrorDict<i32> = TemplateErrorDict::new("Unknown item: %s");
        let err = d.lookup("GREEN").unwrap_err();
        assert_eq!(err.message(), "Unknown item: GREEN");
        assert_eq!(err.key(), "GREEN");
        assert!(!err.silent_variable_failure());
    }

    #[test]
    fn test_get_is_silent() {
        let d: TemplateErrorDict<i32> = TemplateErrorDict::new("%s");
        assert!(d.get("nope").is_none());
    }

    #[test]
    fn test_mutation() {
        let mut d = TemplateErrorDict::new("%s");
        assert!(d.is_empty());
        assert_eq!(d.insert("a", 1), None);
        assert_eq!(d.insert("a", 2), Some(1));
        assert!(d.contains_key("a"));
        assert_eq!(d.len(), 1);
        assert_eq!(d.remove("a"), Some(2));
        assert!(d.lookup("a").is_err());
    }

    #[test]
    fn test_from_iterator_uses_default_template() {
        let d: TemplateErrorDict<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(d.len(), 2);
        assert_eq!(d.template(), "Missing template variable: %s");
        assert_eq!(
            d.lookup("c").unwrap_err().to_string(),
            "Missing template variable: c"
        );
    }

    #[test]
    fn test_extend_and_iter() {
        let mut d = TemplateErrorDict::new("%s");
        d.extend(vec![("x".to_string(), 1), ("y".to_string(), 2)]);
        let mut keys: Vec<&String> = d.keys().collect();
        keys.sort();
        assert_eq!(keys, ["x", "y"]);
        let total: i32 = d.iter().map(|(_, v)| v).sum();
        assert_eq!(total, 3);
        assert_eq!((&d).into_iter().count(), 2);
    }
}
