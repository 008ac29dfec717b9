//! String utility functions.
//!
//! These helpers cover the handful of text conventions enumerations rely on:
//! default display labels, integer-literal detection for loose equality, and
//! quoted rendering for error messages.

/// Capitalizes the first character of a string and lower-cases the rest.
///
/// This is the rule used to derive an item's display label from its slug.
///
/// # Examples
///
/// ```
/// use enumfield_core::utils::text::capitalize;
///
/// assert_eq!(capitalize("RED"), "Red");
/// assert_eq!(capitalize("dark_green"), "Dark_green");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |c| {
        let mut result = c.to_uppercase().to_string();
        result.extend(chars.flat_map(char::to_lowercase));
        result
    })
}

/// Parses a string as a base-10 integer literal.
///
/// Surrounding whitespace and a single leading sign are accepted. Anything
/// else (empty strings, decimals, embedded spaces) yields `None`.
///
/// # Examples
///
/// ```
/// use enumfield_core::utils::text::parse_int;
///
/// assert_eq!(parse_int(" 42 "), Some(42));
/// assert_eq!(parse_int("-7"), Some(-7));
/// assert_eq!(parse_int("red"), None);
/// assert_eq!(parse_int("4.2"), None);
/// ```
pub fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Renders a string quoted the way a debug representation would show it.
///
/// Single quotes are used unless the string itself contains one.
///
/// # Examples
///
/// ```
/// use enumfield_core::utils::text::repr_str;
///
/// assert_eq!(repr_str("slug"), "'slug'");
/// assert_eq!(repr_str("it's"), "\"it's\"");
/// ```
pub fn repr_str(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{s}\"")
    } else {
        format!("'{}'", s.replace('\'', "\\'"))
    }
}
