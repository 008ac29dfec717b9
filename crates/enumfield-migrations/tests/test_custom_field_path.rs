//! Enum fields under a configured `integer_field_path`.
//!
//! Settings are global and configured once, so these tests live in their
//! own test binary.

use std::sync::{LazyLock, Once};

use enumfield_core::{Settings, SETTINGS};
use enumfield_db::enums::Enum;
use enumfield_db::fields::{EnumField, FieldType};
use enumfield_db::value::Value;
use enumfield_migrations::autodetect::MigrationFieldDef;
use enumfield_migrations::serializer::SerializableField;

const CUSTOM_PATH: &str = "myorm.columns.Integer";

static INIT: Once = Once::new();

fn configure() {
    INIT.call_once(|| {
        SETTINGS.configure(Settings {
            integer_field_path: CUSTOM_PATH.to_string(),
            ..Settings::default()
        });
    });
}

static STATUS: LazyLock<Enum> = LazyLock::new(|| {
    Enum::builder("Status")
        .item(1, "draft", None)
        .item(2, "live", None)
        .build()
        .unwrap()
});

fn status_field() -> EnumField {
    EnumField::new("status", &STATUS).nullable()
}

#[test]
fn test_deconstruct_reports_configured_path() {
    configure();
    let d = status_field().deconstruct().unwrap();
    assert_eq!(d.path, CUSTOM_PATH);
}

#[test]
fn test_clone_field_stays_integer_field() {
    configure();
    let clone = status_field().clone_field().unwrap();
    assert_eq!(clone.field_type, FieldType::IntegerField);
    assert_eq!(clone.name, "status");
    assert!(clone.null);
}

#[test]
fn test_south_field_triple_ignores_configured_path() {
    configure();
    let triple = status_field().south_field_triple();
    assert_eq!(triple.path, "django.db.models.fields.IntegerField");
}

#[test]
fn test_migration_state_from_enum_field() {
    configure();
    let state = MigrationFieldDef::from_enum_field(&status_field()).unwrap();
    assert_eq!(state.field_type, FieldType::IntegerField);
    assert!(state.null);
}

#[test]
fn test_stored_field_reads_back_with_configured_path() {
    configure();
    let field = EnumField::new("status", &STATUS).default_callable(|| {
        STATUS.from_slug("live").unwrap().clone()
    });
    let stored = SerializableField::from_enum_field(&field).unwrap();
    assert_eq!(stored.path, CUSTOM_PATH);

    let loaded = SerializableField::from_json(&stored.to_json().unwrap()).unwrap();
    let state = loaded.to_state().unwrap();
    assert_eq!(state.field_type, FieldType::IntegerField);
    assert_eq!(state.default, Some(Value::Int(1)));
}
