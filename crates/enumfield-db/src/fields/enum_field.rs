//! The enum model field.
//!
//! [`EnumField`] stores an [`Item`] as its integer value in an ordinary
//! integer column and hands [`Item`]s back to application code. Migration
//! tooling sees a plain integer field: deconstruction reports the integer
//! field path, drops the choices, and replaces item defaults with their
//! values so generated migrations never reference the enumeration.

use std::fmt;

use enumfield_core::{EnumError, EnumResult, ValidationError, SETTINGS};

use super::deconstruct::{introspect, Deconstruction, FieldTriple};
use super::types::{FieldDef, FieldType};
use crate::enums::{Enum, Enumeration, Item};
use crate::query::lookups::{Lookup, Q};
use crate::value::Value;

/// The default of an [`EnumField`].
#[derive(Clone)]
pub enum EnumDefault {
    /// A fixed item.
    Item(Item),
    /// A function evaluated each time a default is needed.
    Callable(fn() -> Item),
}

impl EnumDefault {
    /// Returns `true` for [`EnumDefault::Callable`].
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// Produces the default item.
    pub fn resolve(&self) -> Item {
        match self {
            Self::Item(item) => item.clone(),
            Self::Callable(f) => f(),
        }
    }
}

impl fmt::Debug for EnumDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(item) => f.debug_tuple("Item").field(item).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// A model field holding one item of an enumeration.
///
/// # Examples
///
/// ```
/// use enumfield_db::enums::Enum;
/// use enumfield_db::fields::EnumField;
/// use enumfield_db::value::Value;
///
/// let status: &'static Enum = Enum::builder("Status")
///     .item(1, "draft", None)
///     .item(2, "live", None)
///     .build()
///     .unwrap()
///     .leak();
///
/// let field = EnumField::new("status", status);
/// assert_eq!(field.get_internal_type(), "IntegerField");
/// assert_eq!(field.get_db_prep_save(&Value::from("live")).unwrap(), Value::Int(2));
/// assert_eq!(field.to_python(&Value::Int(1)).unwrap().unwrap().slug(), "draft");
/// ```
#[derive(Debug, Clone)]
pub struct EnumField {
    enumeration: &'static Enum,
    def: FieldDef,
    default: Option<EnumDefault>,
}

impl EnumField {
    /// Creates a field for `enumeration`, offering all of its items as choices.
    pub fn new(name: impl Into<String>, enumeration: &'static Enum) -> Self {
        let choices = enumeration
            .get_choices()
            .into_iter()
            .map(|(item, display)| (Value::from(&item), display))
            .collect();

        Self {
            enumeration,
            def: FieldDef::new(name, FieldType::IntegerField).choices(choices),
            default: None,
        }
    }

    /// Creates a field for a typed enumeration.
    pub fn for_enum<E: Enumeration>(name: impl Into<String>) -> Self {
        Self::new(name, E::enumeration())
    }

    // ── Builder ──────────────────────────────────────────────────────

    /// Allows NULL values in the database.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.def = self.def.nullable();
        self
    }

    /// Allows blank values in forms.
    #[must_use]
    pub fn blank(mut self) -> Self {
        self.def = self.def.blank();
        self
    }

    /// Marks this field as having a database index.
    #[must_use]
    pub fn db_index(mut self) -> Self {
        self.def = self.def.db_index();
        self
    }

    /// Marks this field as having a UNIQUE constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.def = self.def.unique();
        self
    }

    /// Sets the database column name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.def = self.def.column(column);
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.def = self.def.verbose_name(name);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.def = self.def.help_text(text);
        self
    }

    /// Restricts the offered choices.
    #[must_use]
    pub fn choices(mut self, choices: Vec<(Value, String)>) -> Self {
        self.def = self.def.choices(choices);
        self
    }

    /// Uses a fixed item as the default.
    #[must_use]
    pub fn default_item(mut self, item: Item) -> Self {
        self.default = Some(EnumDefault::Item(item));
        self
    }

    /// Uses a function as the default.
    #[must_use]
    pub fn default_callable(mut self, f: fn() -> Item) -> Self {
        self.default = Some(EnumDefault::Callable(f));
        self
    }

    /// Uses the item a raw value converts to as the default.
    ///
    /// # Errors
    ///
    /// Fails if `value` does not convert to an item of this enumeration.
    pub fn default_value(self, value: impl Into<Value>) -> EnumResult<Self> {
        let value = value.into();
        let item = self.to_python(&value)?.ok_or_else(|| {
            EnumError::InvalidValue(format!("{value} is not a usable default"))
        })?;
        Ok(self.default_item(item.clone()))
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// The enumeration backing this field.
    pub const fn enumeration(&self) -> &'static Enum {
        self.enumeration
    }

    /// The underlying field definition.
    pub const fn field_def(&self) -> &FieldDef {
        &self.def
    }

    /// The configured default, if any.
    pub const fn default(&self) -> Option<&EnumDefault> {
        self.default.as_ref()
    }

    /// Evaluates the default.
    pub fn get_default(&self) -> Option<Item> {
        self.default.as_ref().map(EnumDefault::resolve)
    }

    /// The host ORM column machinery this field reuses.
    pub const fn get_internal_type(&self) -> &'static str {
        FieldType::IntegerField.class_name()
    }

    /// The field type stored in the database.
    pub const fn field_type(&self) -> FieldType {
        FieldType::IntegerField
    }

    // ── Conversion ───────────────────────────────────────────────────

    /// Converts a raw value into an item of this field's enumeration.
    pub fn to_python(&self, value: &Value) -> EnumResult<Option<&'static Item>> {
        self.enumeration.to_python(value)
    }

    /// Converts a value read from the database.
    pub fn from_db_value(&self, value: &Value) -> EnumResult<Option<Item>> {
        Ok(self.to_python(value)?.cloned())
    }

    /// Converts a value about to be written to the database.
    ///
    /// `Null` is written as-is; anything else is resolved to an item and
    /// stored as its integer value.
    pub fn get_db_prep_save(&self, value: &Value) -> EnumResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        Ok(self.to_python(value)?.map_or(Value::Null, Value::from))
    }

    fn prepare(&self, value: &Value) -> EnumResult<Value> {
        self.get_db_prep_save(value)
    }

    /// Converts the right-hand side of a lookup into database values.
    ///
    /// # Errors
    ///
    /// Returns [`EnumError::UnsupportedLookup`] for anything other than
    /// `exact`, `lt`, `lte`, `gt`, `gte`, `in`, and `isnull`.
    pub fn get_db_prep_lookup(&self, lookup_type: &str, value: &Value) -> EnumResult<Vec<Value>> {
        tracing::debug!(field = %self.def.name, lookup_type, "preparing lookup");
        match lookup_type {
            "exact" | "lt" | "lte" | "gt" | "gte" => Ok(vec![self.prepare(value)?]),
            "in" => match value {
                Value::List(values) => values.iter().map(|v| self.prepare(v)).collect(),
                other => Err(EnumError::InvalidValue(format!(
                    "'in' lookup needs a list, got a {} value",
                    other.kind()
                ))),
            },
            "isnull" => Ok(Vec::new()),
            other => Err(EnumError::UnsupportedLookup(other.to_string())),
        }
    }

    /// Rewrites a typed lookup so its values are database integers.
    pub fn prepare_lookup(&self, lookup: Lookup) -> EnumResult<Lookup> {
        match lookup {
            Lookup::Exact(v) => Ok(Lookup::Exact(self.prepare(&v)?)),
            Lookup::Lt(v) => Ok(Lookup::Lt(self.prepare(&v)?)),
            Lookup::Lte(v) => Ok(Lookup::Lte(self.prepare(&v)?)),
            Lookup::Gt(v) => Ok(Lookup::Gt(self.prepare(&v)?)),
            Lookup::Gte(v) => Ok(Lookup::Gte(self.prepare(&v)?)),
            Lookup::In(values) => values
                .iter()
                .map(|v| self.prepare(v))
                .collect::<EnumResult<_>>()
                .map(Lookup::In),
            Lookup::IsNull(flag) => Ok(Lookup::IsNull(flag)),
            other => Err(EnumError::UnsupportedLookup(
                other.lookup_type().to_string(),
            )),
        }
    }

    /// Rewrites every filter on this field inside a `Q` tree.
    pub fn prepare_q(&self, q: Q) -> EnumResult<Q> {
        q.try_map_filters(&mut |field, lookup| {
            if field == self.def.name {
                Ok(Q::filter(field, self.prepare_lookup(lookup)?))
            } else {
                Ok(Q::filter(field, lookup))
            }
        })
    }

    /// Serializes an item for fixtures: its value as decimal text.
    pub fn value_to_string(&self, item: Option<&Item>) -> String {
        item.map(|item| item.value().to_string()).unwrap_or_default()
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Validates a raw value against nullability, blankness, and choices.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if !value.is_empty_input() {
            let item = self
                .to_python(value)
                .map_err(EnumError::into_validation_error)?;
            let offered = self.def.choices.as_ref().map_or(true, |choices| {
                item.is_some_and(|item| choices.iter().any(|(v, _)| item == v))
            });
            if !offered {
                return Err(ValidationError::new(
                    format!("Value {value} is not a valid choice."),
                    "invalid_choice",
                )
                .with_param("value", value.to_string()));
            }
        }

        if value.is_null() && !self.def.null {
            return Err(ValidationError::new("This field cannot be null.", "null"));
        }

        if value.is_empty_input() && !self.def.blank {
            return Err(ValidationError::new("This field cannot be blank.", "blank"));
        }

        Ok(())
    }

    // ── Migrations ───────────────────────────────────────────────────

    fn integer_field_path() -> String {
        SETTINGS.get().integer_field_path.clone()
    }

    /// Describes this field for the legacy introspection tool.
    ///
    /// The path is always Django's `IntegerField`, regardless of the
    /// configured `integer_field_path`. With a default set, `default` is
    /// `Null` for callables and the item's value otherwise.
    pub fn south_field_triple(&self) -> FieldTriple {
        let (args, mut kwargs) = introspect(&self.def);

        if let Some(ref default) = self.default {
            let value = match default {
                EnumDefault::Callable(_) => Value::Null,
                EnumDefault::Item(item) => Value::from(item),
            };
            kwargs.insert("default".into(), value);
        }

        FieldTriple {
            path: FieldType::IntegerField.path(),
            args,
            kwargs,
        }
    }

    /// Describes this field for the migration autodetector.
    ///
    /// A callable default is replaced by the enumeration's first item so
    /// repeated runs produce identical migrations; item defaults become
    /// their values, and choices are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`EnumError::EmptyEnumeration`] when a callable default has
    /// no first item to stand in for it.
    pub fn deconstruct(&self) -> EnumResult<Deconstruction> {
        let mut d = self.def.deconstruct();

        match self.default {
            Some(EnumDefault::Callable(_)) => {
                let first = self
                    .enumeration
                    .first()
                    .ok_or_else(|| EnumError::EmptyEnumeration(self.enumeration.name().into()))?;
                d.kwargs.insert("default".into(), Value::from(first));
            }
            Some(EnumDefault::Item(ref item)) => {
                d.kwargs.insert("default".into(), Value::from(item));
            }
            None => {}
        }

        d.kwargs.remove("choices");
        d.path = Self::integer_field_path();

        tracing::debug!(
            field = %d.name,
            enumeration = self.enumeration.name(),
            path = %d.path,
            "deconstructed enum field"
        );
        Ok(d)
    }

    /// Builds the plain integer field migrations operate on.
    ///
    /// The copy is an `IntegerField` whatever path `deconstruct` reports.
    ///
    /// # Errors
    ///
    /// Fails like [`deconstruct`](Self::deconstruct).
    pub fn clone_field(&self) -> EnumResult<FieldDef> {
        let d = self.deconstruct()?;
        Ok(FieldDef::from_kwargs(d.name, FieldType::IntegerField, &d.kwargs))
    }
}
