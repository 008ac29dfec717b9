//! Field type definitions for the ORM.
//!
//! This module defines the subset of the field type system enum fields
//! interact with. Each [`FieldType`] variant corresponds to a Django model
//! field class, and [`FieldDef`] captures the metadata of a single field.

use enumfield_core::{EnumError, EnumResult, SETTINGS};

use crate::value::Value;

/// The type of a model field, determining its SQL column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    /// Auto-incrementing 32-bit integer primary key.
    AutoField,
    /// 32-bit signed integer.
    IntegerField,
    /// 64-bit signed integer.
    BigIntegerField,
    /// 16-bit signed integer.
    SmallIntegerField,
    /// Non-negative 32-bit integer.
    PositiveIntegerField,
    /// Boolean (true/false).
    BooleanField,
    /// Variable-length string with a max length.
    CharField,
    /// Unlimited-length text.
    TextField,
}

impl FieldType {
    const ALL: [Self; 8] = [
        Self::AutoField,
        Self::IntegerField,
        Self::BigIntegerField,
        Self::SmallIntegerField,
        Self::PositiveIntegerField,
        Self::BooleanField,
        Self::CharField,
        Self::TextField,
    ];

    /// The Django class name of this field type.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::AutoField => "AutoField",
            Self::IntegerField => "IntegerField",
            Self::BigIntegerField => "BigIntegerField",
            Self::SmallIntegerField => "SmallIntegerField",
            Self::PositiveIntegerField => "PositiveIntegerField",
            Self::BooleanField => "BooleanField",
            Self::CharField => "CharField",
            Self::TextField => "TextField",
        }
    }

    /// The dotted import path migration files refer to this type by.
    pub fn path(self) -> String {
        format!("django.db.models.fields.{}", self.class_name())
    }

    /// Resolves a dotted path (or bare class name) back to a field type.
    ///
    /// The configured `integer_field_path` always resolves to
    /// [`IntegerField`](Self::IntegerField), since enum fields deconstruct to it.
    pub fn from_path(path: &str) -> EnumResult<Self> {
        if path == SETTINGS.get().integer_field_path {
            return Ok(Self::IntegerField);
        }
        let class = path.rsplit('.').next().unwrap_or(path);
        Self::ALL
            .into_iter()
            .find(|ft| ft.class_name() == class)
            .ok_or_else(|| EnumError::SerializationError(format!("Unknown field path '{path}'")))
    }
}

/// Complete definition of a model field, including metadata and constraints.
///
/// This struct captures everything Django stores in a field's `__init__`.
/// [`EnumField`](super::EnumField) wraps one and keeps it in sync with its
/// enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: String,
    /// The database column name (may differ from `name`).
    pub column: String,
    /// The type of this field.
    pub field_type: FieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed in the database.
    pub null: bool,
    /// Whether the field may be left blank in forms.
    pub blank: bool,
    /// Default value for new instances.
    pub default: Option<Value>,
    /// Whether a UNIQUE constraint is applied.
    pub unique: bool,
    /// Whether a database index should be created.
    pub db_index: bool,
    /// Maximum character length (for CharField).
    pub max_length: Option<usize>,
    /// Human-readable help text.
    pub help_text: String,
    /// Human-readable name for the field.
    pub verbose_name: String,
    /// Allowed values as (value, display_label) pairs.
    pub choices: Option<Vec<(Value, String)>>,
    /// Whether the field is editable in forms.
    pub editable: bool,
}

impl FieldDef {
    /// Creates a new `FieldDef` with sensible defaults.
    ///
    /// Only the field name and type are required. All other attributes take
    /// their default values (non-null, no index, editable, etc.).
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            verbose_name: name.replace('_', " "),
            name,
            field_type,
            primary_key: false,
            null: false,
            blank: false,
            default: None,
            unique: false,
            db_index: false,
            max_length: None,
            help_text: String::new(),
            choices: None,
            editable: true,
        }
    }

    /// Sets the database column name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows NULL values in the database.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Allows blank values in forms.
    #[must_use]
    pub const fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Marks this field as having a database index.
    #[must_use]
    pub const fn db_index(mut self) -> Self {
        self.db_index = true;
        self
    }

    /// Marks this field as having a UNIQUE constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value for this field.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the allowed choices.
    #[must_use]
    pub fn choices(mut self, choices: Vec<(Value, String)>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Marks this field as not editable in forms.
    #[must_use]
    pub const fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def_new_defaults() {
        let f = FieldDef::new("order_status", FieldType::IntegerField);
        assert_eq!(f.name, "order_status");
        assert_eq!(f.column, "order_status");
        assert!(!f.primary_key);
        assert!(!f.null);
        assert!(!f.blank);
        assert!(f.default.is_none());
        assert!(!f.unique);
        assert!(!f.db_index);
        assert!(f.max_length.is_none());
        assert!(f.choices.is_none());
        assert!(f.editable);
        assert_eq!(f.verbose_name, "order status");
    }

    #[test]
    fn test_field_def_builder() {
        let f = FieldDef::new("status", FieldType::IntegerField)
            .column("status_id")
            .unique()
            .db_index()
            .nullable()
            .blank()
            .default(3)
            .choices(vec![(Value::Int(3), "Three".into())])
            .verbose_name("Current status")
            .help_text("Where the order is")
            .not_editable();
        assert_eq!(f.column, "status_id");
        assert!(f.unique && f.db_index && f.null && f.blank);
        assert_eq!(f.default, Some(Value::Int(3)));
        assert_eq!(f.choices.as_ref().map(Vec::len), Some(1));
        assert_eq!(f.verbose_name, "Current status");
        assert_eq!(f.help_text, "Where the order is");
        assert!(!f.editable);
    }

    #[test]
    fn test_field_type_paths() {
        assert_eq!(
            FieldType::IntegerField.path(),
            "django.db.models.fields.IntegerField"
        );
        assert_eq!(
            FieldType::from_path("django.db.models.fields.IntegerField").unwrap(),
            FieldType::IntegerField
        );
        assert_eq!(FieldType::from_path("CharField").unwrap(), FieldType::CharField);
        assert!(FieldType::from_path("myapp.fields.EnumField").is_err());
    }
}
