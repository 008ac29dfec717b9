//! Settings for the enumfield crates.
//!
//! This module provides the [`Settings`] struct and [`LazySettings`], a
//! globally-accessible, lazily-initialized settings instance. The design
//! mirrors Django's `django.conf.settings` with sensible defaults.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The complete set of enumfield settings.
///
/// # Examples
///
/// ```
/// use enumfield_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.log_level, "info");
/// assert_eq!(settings.integer_field_path, "django.db.models.fields.IntegerField");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter directive (e.g. "info", "enumfield_db=debug").
    pub log_level: String,

    // ── Templates ────────────────────────────────────────────────────

    /// Rendered in place of variables that fail to resolve silently.
    pub string_if_invalid: String,
    /// Default message template for strict dictionaries; `%s` is the key.
    pub missing_key_template: String,

    // ── Migrations ───────────────────────────────────────────────────

    /// The field path enum fields deconstruct to.
    pub integer_field_path: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            string_if_invalid: String::new(),
            missing_key_template: "Missing template variable: %s".to_string(),
            integer_field_path: "django.db.models.fields.IntegerField".to_string(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Readers use
/// [`get`](LazySettings::get), which falls back to the defaults when nothing
/// was configured.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called at most once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured (or already read).
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns the configured settings, initializing defaults on first use.
    pub fn get(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if settings have been configured or read.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
