//! Field deconstruction for migration tooling.
//!
//! Migration tools never store field objects; they store how to rebuild
//! them. [`Deconstruction`] is the modern `(name, path, args, kwargs)` form
//! consumed by the autodetector, and [`FieldTriple`] is the legacy
//! `(path, args, kwargs)` form produced for older introspection tools.
//!
//! Keyword arguments only list attributes that differ from the field
//! defaults, in a [`BTreeMap`] so the output is stable across runs.

use std::collections::BTreeMap;

use enumfield_core::EnumResult;

use super::types::{FieldDef, FieldType};
use crate::value::Value;

/// Keyword arguments of a deconstructed field.
pub type Kwargs = BTreeMap<String, Value>;

/// The `(name, path, args, kwargs)` description of a field.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Deconstruction {
    /// The attribute name.
    pub name: String,
    /// The dotted path of the field class to rebuild.
    pub path: String,
    /// Positional arguments.
    pub args: Vec<Value>,
    /// Keyword arguments.
    pub kwargs: Kwargs,
}

/// The legacy `(path, args, kwargs)` description of a field.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldTriple {
    /// The dotted path of the field class to rebuild.
    pub path: String,
    /// Positional arguments.
    pub args: Vec<Value>,
    /// Keyword arguments.
    pub kwargs: Kwargs,
}

/// Collects the non-default attributes of a field as keyword arguments.
pub fn introspect(field: &FieldDef) -> (Vec<Value>, Kwargs) {
    let mut kwargs = Kwargs::new();

    if field.primary_key {
        kwargs.insert("primary_key".into(), Value::Bool(true));
    }
    if let Some(max_length) = field.max_length {
        kwargs.insert(
            "max_length".into(),
            Value::Int(i64::try_from(max_length).unwrap_or(i64::MAX)),
        );
    }
    if field.null {
        kwargs.insert("null".into(), Value::Bool(true));
    }
    if field.blank {
        kwargs.insert("blank".into(), Value::Bool(true));
    }
    if field.unique {
        kwargs.insert("unique".into(), Value::Bool(true));
    }
    if field.db_index {
        kwargs.insert("db_index".into(), Value::Bool(true));
    }
    if field.column != field.name {
        kwargs.insert("db_column".into(), Value::String(field.column.clone()));
    }
    if field.verbose_name != field.name.replace('_', " ") {
        kwargs.insert(
            "verbose_name".into(),
            Value::String(field.verbose_name.clone()),
        );
    }
    if !field.help_text.is_empty() {
        kwargs.insert("help_text".into(), Value::String(field.help_text.clone()));
    }
    if let Some(ref default) = field.default {
        kwargs.insert("default".into(), default.clone());
    }
    if let Some(ref choices) = field.choices {
        kwargs.insert("choices".into(), choices_to_value(choices));
    }
    if !field.editable {
        kwargs.insert("editable".into(), Value::Bool(false));
    }

    (Vec::new(), kwargs)
}

impl FieldDef {
    /// Describes how to rebuild this field.
    pub fn deconstruct(&self) -> Deconstruction {
        let (args, kwargs) = introspect(self);
        Deconstruction {
            name: self.name.clone(),
            path: self.field_type.path(),
            args,
            kwargs,
        }
    }

    /// Rebuilds a field from its deconstruction.
    ///
    /// # Errors
    ///
    /// Fails if the path names an unknown field class.
    pub fn from_deconstruction(d: &Deconstruction) -> EnumResult<Self> {
        let field_type = FieldType::from_path(&d.path)?;
        Ok(Self::from_kwargs(d.name.clone(), field_type, &d.kwargs))
    }

    /// Rebuilds a field of a known type from deconstructed keyword arguments.
    pub fn from_kwargs(name: impl Into<String>, field_type: FieldType, kwargs: &Kwargs) -> Self {
        let mut field = Self::new(name, field_type);
        let flag = |key: &str| kwargs.get(key).and_then(Value::as_bool).unwrap_or(false);
        let text = |key: &str| kwargs.get(key).and_then(Value::as_str).map(str::to_string);

        field.primary_key = flag("primary_key");
        field.null = flag("null");
        field.blank = flag("blank");
        field.unique = flag("unique");
        field.db_index = flag("db_index");
        field.editable = kwargs
            .get("editable")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        field.max_length = kwargs
            .get("max_length")
            .and_then(Value::as_int)
            .and_then(|n| usize::try_from(n).ok());
        if let Some(column) = text("db_column") {
            field.column = column;
        }
        if let Some(verbose_name) = text("verbose_name") {
            field.verbose_name = verbose_name;
        }
        if let Some(help_text) = text("help_text") {
            field.help_text = help_text;
        }
        field.default = kwargs.get("default").cloned();
        field.choices = kwargs.get("choices").and_then(choices_from_value);

        field
    }
}

/// Encodes choices as a list of `[value, label]` pairs.
pub fn choices_to_value(choices: &[(Value, String)]) -> Value {
    Value::List(
        choices
            .iter()
            .map(|(value, label)| Value::List(vec![value.clone(), Value::String(label.clone())]))
            .collect(),
    )
}

fn choices_from_value(value: &Value) -> Option<Vec<(Value, String)>> {
    value
        .as_list()?
        .iter()
        .map(|pair| match pair.as_list()? {
            [value, Value::String(label)] => Some((value.clone(), label.clone())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introspect_defaults_are_omitted() {
        let f = FieldDef::new("count", FieldType::IntegerField);
        let (args, kwargs) = introspect(&f);
        assert!(args.is_empty());
        assert!(kwargs.is_empty());
    }

    #[test]
    fn test_introspect_non_defaults() {
        let f = FieldDef::new("count", FieldType::IntegerField)
            .nullable()
            .db_index()
            .column("cnt")
            .help_text("How many")
            .default(0);
        let (_, kwargs) = introspect(&f);
        assert_eq!(kwargs.get("null"), Some(&Value::Bool(true)));
        assert_eq!(kwargs.get("db_index"), Some(&Value::Bool(true)));
        assert_eq!(kwargs.get("db_column"), Some(&Value::from("cnt")));
        assert_eq!(kwargs.get("help_text"), Some(&Value::from("How many")));
        assert_eq!(kwargs.get("default"), Some(&Value::Int(0)));
        assert!(!kwargs.contains_key("blank"));
    }

    #[test]
    fn test_kwargs_are_sorted() {
        let f = FieldDef::new("n", FieldType::IntegerField)
            .unique()
            .blank()
            .nullable();
        let d = f.deconstruct();
        let keys: Vec<&str> = d.kwargs.keys().map(String::as_str).collect();
        assert_eq!(keys, ["blank", "null", "unique"]);
    }

    #[test]
    fn test_deconstruct_path_and_name() {
        let d = FieldDef::new("title", FieldType::CharField)
            .max_length(50)
            .deconstruct();
        assert_eq!(d.name, "title");
        assert_eq!(d.path, "django.db.models.fields.CharField");
        assert_eq!(d.kwargs.get("max_length"), Some(&Value::Int(50)));
    }

    #[test]
    fn test_choices_encoding() {
        let f = FieldDef::new("n", FieldType::IntegerField)
            .choices(vec![(Value::Int(1), "One".into()), (Value::Int(2), "Two".into())]);
        let d = f.deconstruct();
        assert_eq!(
            d.kwargs.get("choices"),
            Some(&Value::List(vec![
                Value::List(vec![Value::Int(1), Value::from("One")]),
                Value::List(vec![Value::Int(2), Value::from("Two")]),
            ]))
        );
    }

    #[test]
    fn test_from_deconstruction_rebuilds_field() {
        let original = FieldDef::new("status", FieldType::IntegerField)
            .nullable()
            .unique()
            .column("status_code")
            .verbose_name("Status code")
            .default(2)
            .choices(vec![(Value::Int(2), "Two".into())])
            .not_editable();
        let rebuilt = FieldDef::from_deconstruction(&original.deconstruct()).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_from_kwargs_uses_given_type() {
        let original = FieldDef::new("level", FieldType::IntegerField)
            .nullable()
            .default(3);
        let d = original.deconstruct();
        let rebuilt = FieldDef::from_kwargs("level", FieldType::IntegerField, &d.kwargs);
        assert_eq!(rebuilt, original);

        let small = FieldDef::from_kwargs("level", FieldType::SmallIntegerField, &d.kwargs);
        assert_eq!(small.field_type, FieldType::SmallIntegerField);
        assert!(small.null);
    }

    #[test]
    fn test_from_deconstruction_unknown_path() {
        let d = Deconstruction {
            name: "x".into(),
            path: "app.fields.Unknown".into(),
            args: vec![],
            kwargs: Kwargs::new(),
        };
        assert!(FieldDef::from_deconstruction(&d).is_err());
    }
}
