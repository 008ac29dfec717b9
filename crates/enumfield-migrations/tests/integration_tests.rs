//! Integration tests for the migration pipeline.
//!
//! These tests build project states from enum fields, detect changes,
//! replay the operations, and verify that:
//! - Enum fields are recorded as plain integer fields
//! - Callable defaults do not produce spurious alterations
//! - Migration files round-trip through JSON on disk

use std::sync::LazyLock;

use enumfield_db::enums::{Enum, Item};
use enumfield_db::fields::{EnumField, FieldType};
use enumfield_db::value::Value;
use enumfield_migrations::autodetect::{
    MigrationAutodetector, MigrationFieldDef, ModelState, ProjectState,
};
use enumfield_migrations::serializer::{
    generate_migration_name, migration_file_path, next_migration_number, SerializableMigration,
};

static SIZE: LazyLock<Enum> = LazyLock::new(|| {
    Enum::builder("Size")
        .item(1, "small", None)
        .item(2, "medium", None)
        .item(3, "large", Some("Extra large"))
        .build()
        .unwrap()
});

fn medium() -> Item {
    SIZE.from_slug("medium").unwrap().clone()
}

fn shirt_state(fields: Vec<MigrationFieldDef>) -> ProjectState {
    let mut state = ProjectState::new();
    let mut all = vec![MigrationFieldDef::new("id", FieldType::AutoField).primary_key()];
    all.extend(fields);
    state.add_model(ModelState::new("shop", "shirt", all));
    state
}

fn size_state(field: &EnumField) -> MigrationFieldDef {
    MigrationFieldDef::from_enum_field(field).unwrap()
}

#[test]
fn test_adding_enum_field_produces_add_field() {
    let from = shirt_state(vec![]);
    let to = shirt_state(vec![size_state(
        &EnumField::new("size", &SIZE).default_item(medium()),
    )]);

    let changes = MigrationAutodetector::new(from.clone(), to.clone()).detect_changes();
    let ops = &changes["shop"];
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].describe(), "Add field size to shirt");

    let mut replayed = from;
    for op in ops {
        op.state_forwards("shop", &mut replayed);
    }
    assert_eq!(replayed.model("shop", "shirt"), to.model("shop", "shirt"));

    let field = replayed.model("shop", "shirt").unwrap().field("size").unwrap();
    assert_eq!(field.field_type, FieldType::IntegerField);
    assert_eq!(field.default, Some(Value::Int(2)));
}

#[test]
fn test_repeated_detection_with_callable_default_is_empty() {
    let field = EnumField::new("size", &SIZE).default_callable(medium);
    let first = shirt_state(vec![size_state(&field)]);
    let second = shirt_state(vec![size_state(&field)]);
    assert!(MigrationAutodetector::new(first, second)
        .detect_changes()
        .is_empty());
}

#[test]
fn test_making_enum_field_nullable_alters_it() {
    let from = shirt_state(vec![size_state(&EnumField::new("size", &SIZE))]);
    let to = shirt_state(vec![size_state(&EnumField::new("size", &SIZE).nullable())]);
    let changes = MigrationAutodetector::new(from, to).detect_changes();
    assert_eq!(changes["shop"][0].describe(), "Alter field size on shirt");
    assert_eq!(
        generate_migration_name(2, None, &changes["shop"]),
        "0002_alter_shirt_size"
    );
}

#[test]
fn test_migration_file_roundtrip() {
    let dir = std::env::temp_dir().join(format!(
        "enumfield_integration_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);

    let changes = MigrationAutodetector::new(
        ProjectState::new(),
        shirt_state(vec![size_state(
            &EnumField::new("size", &SIZE).default_callable(medium),
        )]),
    )
    .detect_changes();
    let ops = &changes["shop"];

    let number = next_migration_number(&dir, "shop");
    let name = generate_migration_name(number, None, ops);
    assert_eq!(name, "0001_initial");

    let migration = SerializableMigration::from_operations("shop", &name, vec![], true, ops);
    let path = migration_file_path(&dir, "shop", &name);
    migration.write_to_file(&path).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("django.db.models.fields.IntegerField"));
    assert!(!json.contains("medium"));

    let loaded = SerializableMigration::read_from_file(&path).unwrap();
    let mut state = ProjectState::new();
    for op in loaded.to_operations().unwrap() {
        op.state_forwards("shop", &mut state);
    }
    let size = state.model("shop", "shirt").unwrap().field("size").unwrap();
    assert_eq!(size.default, Some(Value::Int(1)));
    assert_eq!(next_migration_number(&dir, "shop"), 2);

    let _ = std::fs::remove_dir_all(&dir);
}
