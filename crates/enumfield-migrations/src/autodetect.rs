//! Migration auto-detection by comparing project states.
//!
//! The [`MigrationAutodetector`] compares an "old" [`ProjectState`] against a "new"
//! [`ProjectState`] and generates the minimal set of [`Operation`]s needed to
//! transform one into the other. Field states are built from field
//! deconstructions, so an [`EnumField`] shows up here as the plain integer
//! field it stores its items in.

use std::collections::{BTreeMap, HashMap};

use enumfield_core::EnumResult;
use enumfield_db::fields::{Deconstruction, EnumField, FieldDef, FieldType};
use enumfield_db::value::Value;

use crate::operations::{AddField, AlterField, CreateModel, DeleteModel, Operation, RemoveField};

/// A snapshot of the entire project's model state at a point in time.
///
/// Contains all models across all apps, keyed by `(app_label, model_name)`.
/// This is the fundamental input to the autodetector.
#[derive(Debug, Clone, Default)]
pub struct ProjectState {
    /// All models in the project, keyed by `(app_label, model_name)`.
    pub models: HashMap<(String, String), ModelState>,
}

impl ProjectState {
    /// Creates a new empty project state.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Adds a model to this project state.
    pub fn add_model(&mut self, model: ModelState) {
        let key = (model.app_label.clone(), model.name.clone());
        self.models.insert(key, model);
    }

    /// Looks up a model.
    pub fn model(&self, app_label: &str, name: &str) -> Option<&ModelState> {
        self.models.get(&(app_label.to_string(), name.to_string()))
    }
}

/// The state of a single model at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelState {
    /// The application label this model belongs to.
    pub app_label: String,
    /// The model name (lowercase).
    pub name: String,
    /// The fields of this model.
    pub fields: Vec<MigrationFieldDef>,
}

impl ModelState {
    /// Creates a new model state.
    pub fn new(
        app_label: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<MigrationFieldDef>,
    ) -> Self {
        Self {
            app_label: app_label.into(),
            name: name.into(),
            fields,
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&MigrationFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A migration-friendly field definition.
///
/// Captures the schema-relevant part of a deconstructed field. Choices and
/// labels are left out: changing them never alters the table.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationFieldDef {
    /// The field name.
    pub name: String,
    /// The database column name.
    pub column: String,
    /// The field type.
    pub field_type: FieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed.
    pub null: bool,
    /// Default value.
    pub default: Option<Value>,
    /// Whether a UNIQUE constraint is applied.
    pub unique: bool,
    /// Whether a database index should be created.
    pub db_index: bool,
    /// Maximum character length.
    pub max_length: Option<usize>,
}

impl MigrationFieldDef {
    /// Creates a new migration field definition with sensible defaults.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        let column = name.clone();
        Self {
            name,
            column,
            field_type,
            primary_key: false,
            null: false,
            default: None,
            unique: false,
            db_index: false,
            max_length: None,
        }
    }

    /// Rebuilds a field state from a deconstruction.
    ///
    /// # Errors
    ///
    /// Returns [`EnumError::SerializationError`](enumfield_core::EnumError::SerializationError)
    /// if the path does not name a known field class.
    pub fn from_deconstruction(d: &Deconstruction) -> EnumResult<Self> {
        Ok(Self::from_field_def(&FieldDef::from_deconstruction(d)?))
    }

    /// Builds the state of an enum field, as migrations record it.
    pub fn from_enum_field(field: &EnumField) -> EnumResult<Self> {
        field.clone_field().map(|fd| Self::from_field_def(&fd))
    }

    /// Extracts the schema-relevant attributes of a field definition.
    pub fn from_field_def(fd: &FieldDef) -> Self {
        Self {
            name: fd.name.clone(),
            column: fd.column.clone(),
            field_type: fd.field_type,
            primary_key: fd.primary_key,
            null: fd.null,
            default: fd.default.clone(),
            unique: fd.unique,
            db_index: fd.db_index,
            max_length: fd.max_length,
        }
    }

    /// Sets the database column name.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Marks this field as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows NULL values.
    pub fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Sets the maximum character length.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Marks this field as having a UNIQUE constraint.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks this field as having a database index.
    pub fn db_index(mut self) -> Self {
        self.db_index = true;
        self
    }

    /// Sets the default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Converts this to a `FieldDef`.
    pub fn to_field_def(&self) -> FieldDef {
        let mut fd = FieldDef::new(self.name.clone(), self.field_type).column(self.column.clone());

        if self.primary_key {
            fd = fd.primary_key();
        }
        if self.null {
            fd = fd.nullable();
        }
        if self.unique {
            fd = fd.unique();
        }
        if self.db_index {
            fd = fd.db_index();
        }
        if let Some(ml) = self.max_length {
            fd = fd.max_length(ml);
        }
        if let Some(ref val) = self.default {
            fd = fd.default(val.clone());
        }
        fd
    }

    /// Describes how to rebuild this field.
    pub fn deconstruct(&self) -> Deconstruction {
        self.to_field_def().deconstruct()
    }
}

/// Compares two [`ProjectState`]s and generates migration operations.
///
/// The autodetector detects:
/// - New models (creates `CreateModel`)
/// - Deleted models (creates `DeleteModel`)
/// - Added fields (creates `AddField`)
/// - Removed fields (creates `RemoveField`)
/// - Altered fields (creates `AlterField`)
///
/// Operations are produced in a deterministic order (models and fields
/// sorted by name) so generated migrations are reproducible.
pub struct MigrationAutodetector {
    /// The old project state (before changes).
    pub from_state: ProjectState,
    /// The new project state (after changes).
    pub to_state: ProjectState,
}

impl MigrationAutodetector {
    /// Creates a new autodetector with from and to states.
    pub fn new(from_state: ProjectState, to_state: ProjectState) -> Self {
        Self {
            from_state,
            to_state,
        }
    }

    /// Detects differences between the two states and returns operations
    /// grouped by app label.
    pub fn detect_changes(&self) -> BTreeMap<String, Vec<Box<dyn Operation>>> {
        let mut result: BTreeMap<String, Vec<Box<dyn Operation>>> = BTreeMap::new();

        let mut new_keys: Vec<&(String, String)> = self.to_state.models.keys().collect();
        new_keys.sort();
        let mut old_keys: Vec<&(String, String)> = self.from_state.models.keys().collect();
        old_keys.sort();

        // 1. Detect new models
        for key in &new_keys {
            if !self.from_state.models.contains_key(*key) {
                let model = &self.to_state.models[*key];
                result.entry(key.0.clone()).or_default().push(Box::new(
                    CreateModel {
                        name: model.name.clone(),
                        fields: model.fields.clone(),
                    },
                ));
            }
        }

        // 2. Detect deleted models
        for key in &old_keys {
            if !self.to_state.models.contains_key(*key) {
                result
                    .entry(key.0.clone())
                    .or_default()
                    .push(Box::new(DeleteModel {
                        name: key.1.clone(),
                    }));
            }
        }

        // 3. Detect field changes for existing models
        for key in &new_keys {
            let Some(old_model) = self.from_state.models.get(*key) else {
                continue;
            };
            let new_model = &self.to_state.models[*key];
            let ops = diff_fields(old_model, new_model);
            if !ops.is_empty() {
                tracing::debug!(
                    app_label = %key.0,
                    model = %key.1,
                    operations = ops.len(),
                    "detected field changes"
                );
                result.entry(key.0.clone()).or_default().extend(ops);
            }
        }

        result
    }
}

fn diff_fields(old_model: &ModelState, new_model: &ModelState) -> Vec<Box<dyn Operation>> {
    let old_fields: BTreeMap<&str, &MigrationFieldDef> =
        old_model.fields.iter().map(|f| (f.name.as_str(), f)).collect();
    let new_fields: BTreeMap<&str, &MigrationFieldDef> =
        new_model.fields.iter().map(|f| (f.name.as_str(), f)).collect();

    let mut ops: Vec<Box<dyn Operation>> = Vec::new();

    for (name, field) in &new_fields {
        match old_fields.get(name) {
            None => ops.push(Box::new(AddField {
                model_name: new_model.name.clone(),
                field: (*field).clone(),
            })),
            Some(old_field) if fields_differ(old_field, field) => {
                ops.push(Box::new(AlterField {
                    model_name: new_model.name.clone(),
                    field_name: (*name).to_string(),
                    field: (*field).clone(),
                }));
            }
            Some(_) => {}
        }
    }

    for name in old_fields.keys() {
        if !new_fields.contains_key(name) {
            ops.push(Box::new(RemoveField {
                model_name: new_model.name.clone(),
                field_name: (*name).to_string(),
            }));
        }
    }

    ops
}

/// Checks if two fields differ in schema-relevant properties.
fn fields_differ(a: &MigrationFieldDef, b: &MigrationFieldDef) -> bool {
    a.field_type != b.field_type
        || a.null != b.null
        || a.primary_key != b.primary_key
        || a.unique != b.unique
        || a.db_index != b.db_index
        || a.max_length != b.max_length
        || a.default != b.default
        || a.column != b.column
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumfield_db::enums::{Enum, Item};
    use std::sync::LazyLock;

    static STATUS: LazyLock<Enum> = LazyLock::new(|| {
        Enum::builder("Status")
            .item(1, "draft", None)
            .item(2, "live", None)
            .build()
            .unwrap()
    });

    fn live() -> Item {
        STATUS.from_slug("live").unwrap().clone()
    }

    fn make_field(name: &str, ft: FieldType) -> MigrationFieldDef {
        MigrationFieldDef::new(name, ft)
    }

    fn state_with(fields: Vec<MigrationFieldDef>) -> ProjectState {
        let mut state = ProjectState::new();
        state.add_model(ModelState::new("blog", "post", fields));
        state
    }

    // ── ProjectState / ModelState ───────────────────────────────────

    #[test]
    fn test_project_state_add_model() {
        let state = state_with(vec![]);
        assert_eq!(state.models.len(), 1);
        assert!(state.model("blog", "post").is_some());
        assert!(state.model("blog", "comment").is_none());
    }

    #[test]
    fn test_model_state_field_lookup() {
        let model = ModelState::new("blog", "post", vec![make_field("id", FieldType::AutoField)]);
        assert!(model.field("id").is_some());
        assert!(model.field("title").is_none());
    }

    // ── MigrationFieldDef ───────────────────────────────────────────

    #[test]
    fn test_from_enum_field_is_integer_field() {
        let field = EnumField::new("status", &STATUS).nullable().default_item(live());
        let state = MigrationFieldDef::from_enum_field(&field).unwrap();
        assert_eq!(state.field_type, FieldType::IntegerField);
        assert_eq!(state.default, Some(Value::Int(2)));
        assert!(state.null);
    }

    #[test]
    fn test_from_deconstruction_unknown_path() {
        let mut d = make_field("x", FieldType::IntegerField).deconstruct();
        d.path = "myapp.fields.EnumField".into();
        assert!(MigrationFieldDef::from_deconstruction(&d).is_err());
    }

    #[test]
    fn test_deconstruct_roundtrip() {
        let f = make_field("title", FieldType::CharField)
            .max_length(200)
            .unique()
            .column("post_title");
        let rebuilt = MigrationFieldDef::from_deconstruction(&f.deconstruct()).unwrap();
        assert_eq!(rebuilt, f);
    }

    // ── Autodetector ────────────────────────────────────────────────

    #[test]
    fn test_detect_new_model() {
        let to = state_with(vec![make_field("id", FieldType::AutoField).primary_key()]);
        let changes = MigrationAutodetector::new(ProjectState::new(), to).detect_changes();
        let ops = &changes["blog"];
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].describe(), "Create model post");
    }

    #[test]
    fn test_detect_deleted_model() {
        let from = state_with(vec![]);
        let changes = MigrationAutodetector::new(from, ProjectState::new()).detect_changes();
        assert_eq!(changes["blog"][0].describe(), "Delete model post");
    }

    #[test]
    fn test_detect_added_and_removed_fields() {
        let from = state_with(vec![make_field("old", FieldType::IntegerField)]);
        let to = state_with(vec![make_field("new", FieldType::IntegerField)]);
        let changes = MigrationAutodetector::new(from, to).detect_changes();
        let descriptions: Vec<String> = changes["blog"].iter().map(|op| op.describe()).collect();
        assert_eq!(
            descriptions,
            ["Add field new to post", "Remove field old from post"]
        );
    }

    #[test]
    fn test_detect_altered_field() {
        let from = state_with(vec![make_field("status", FieldType::IntegerField)]);
        let to = state_with(vec![make_field("status", FieldType::IntegerField).nullable()]);
        let changes = MigrationAutodetector::new(from, to).detect_changes();
        assert_eq!(changes["blog"].len(), 1);
        assert_eq!(changes["blog"][0].describe(), "Alter field status on post");
    }

    #[test]
    fn test_no_changes() {
        let from = state_with(vec![make_field("status", FieldType::IntegerField)]);
        let to = from.clone();
        assert!(MigrationAutodetector::new(from, to).detect_changes().is_empty());
    }

    #[test]
    fn test_callable_default_is_stable() {
        let field = EnumField::new("status", &STATUS).default_callable(live);
        let first = state_with(vec![MigrationFieldDef::from_enum_field(&field).unwrap()]);
        let second = state_with(vec![MigrationFieldDef::from_enum_field(&field).unwrap()]);
        assert!(MigrationAutodetector::new(first, second)
            .detect_changes()
            .is_empty());
    }

    #[test]
    fn test_changing_choices_is_not_a_change() {
        let all = EnumField::new("status", &STATUS);
        let restricted = EnumField::new("status", &STATUS).choices(vec![(Value::Int(1), "Draft".into())]);
        let from = state_with(vec![MigrationFieldDef::from_enum_field(&all).unwrap()]);
        let to = state_with(vec![MigrationFieldDef::from_enum_field(&restricted).unwrap()]);
        assert!(MigrationAutodetector::new(from, to).detect_changes().is_empty());
    }

    #[test]
    fn test_changing_enum_default_alters_field() {
        let from_field = EnumField::new("status", &STATUS);
        let to_field = EnumField::new("status", &STATUS).default_item(live());
        let from = state_with(vec![MigrationFieldDef::from_enum_field(&from_field).unwrap()]);
        let to = state_with(vec![MigrationFieldDef::from_enum_field(&to_field).unwrap()]);
        let changes = MigrationAutodetector::new(from, to).detect_changes();
        assert_eq!(changes["blog"][0].describe(), "Alter field status on post");
    }

    #[test]
    fn test_fields_differ() {
        let a = make_field("x", FieldType::IntegerField);
        assert!(!fields_differ(&a, &a.clone()));
        assert!(fields_differ(&a, &make_field("x", FieldType::SmallIntegerField)));
        assert!(fields_differ(&a, &a.clone().default(1)));
    }
}
