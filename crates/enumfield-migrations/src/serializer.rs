//! Migration file serialization and deserialization.
//!
//! Fields are stored in their deconstructed `(name, path, args, kwargs)`
//! form, so a migration written for an enum field records a plain integer
//! field and can be read back without the enumeration.

use std::path::{Path, PathBuf};

use enumfield_core::{EnumError, EnumResult};
use enumfield_db::fields::{Deconstruction, EnumField, Kwargs};
use enumfield_db::value::Value;
use serde::{Deserialize, Serialize};

use crate::autodetect::MigrationFieldDef;
use crate::operations::{AddField, AlterField, CreateModel, DeleteModel, Operation, RemoveField};

/// A serializable deconstructed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableField {
    /// The attribute name.
    pub name: String,
    /// The dotted path of the field class.
    pub path: String,
    /// Positional arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    /// Keyword arguments.
    #[serde(default)]
    pub kwargs: Kwargs,
}

impl SerializableField {
    /// Wraps a deconstruction.
    pub fn from_deconstruction(d: Deconstruction) -> Self {
        Self {
            name: d.name,
            path: d.path,
            args: d.args,
            kwargs: d.kwargs,
        }
    }

    /// Deconstructs an enum field for storage.
    pub fn from_enum_field(field: &EnumField) -> EnumResult<Self> {
        field.deconstruct().map(Self::from_deconstruction)
    }

    /// Deconstructs a field state for storage.
    pub fn from_state(field: &MigrationFieldDef) -> Self {
        Self::from_deconstruction(field.deconstruct())
    }

    /// Returns the deconstruction this field was built from.
    pub fn to_deconstruction(&self) -> Deconstruction {
        Deconstruction {
            name: self.name.clone(),
            path: self.path.clone(),
            args: self.args.clone(),
            kwargs: self.kwargs.clone(),
        }
    }

    /// Rebuilds the field state.
    pub fn to_state(&self) -> EnumResult<MigrationFieldDef> {
        MigrationFieldDef::from_deconstruction(&self.to_deconstruction())
    }

    /// Serializes this field to a JSON string.
    pub fn to_json(&self) -> EnumResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EnumError::SerializationError(format!("Failed to serialize field: {e}")))
    }

    /// Deserializes a field from a JSON string.
    pub fn from_json(json: &str) -> EnumResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            EnumError::SerializationError(format!("Failed to deserialize field: {e}"))
        })
    }

    /// Writes this field to a JSON file, creating parent directories.
    pub fn write_to_file(&self, path: &Path) -> EnumResult<()> {
        write_json(path, &self.to_json()?)
    }

    /// Reads a field from a JSON file.
    pub fn read_from_file(path: &Path) -> EnumResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// A serializable representation of a migration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableMigration {
    /// The app label this migration belongs to.
    pub app_label: String,
    /// The migration name (e.g. "0001_initial").
    pub name: String,
    /// Dependencies as `[app_label, name]` pairs.
    pub dependencies: Vec<(String, String)>,
    /// Whether this is the initial migration for the app.
    #[serde(default)]
    pub initial: bool,
    /// The operations to apply.
    pub operations: Vec<SerializableOperation>,
}

/// A serializable representation of a single migration operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SerializableOperation {
    /// Create a new model.
    CreateModel {
        /// The model name.
        name: String,
        /// The fields for the model.
        fields: Vec<SerializableField>,
    },
    /// Delete a model.
    DeleteModel {
        /// The model name.
        name: String,
    },
    /// Add a field to an existing model.
    AddField {
        /// The model name.
        model_name: String,
        /// The field definition.
        field: SerializableField,
    },
    /// Remove a field from a model.
    RemoveField {
        /// The model name.
        model_name: String,
        /// The field name.
        field_name: String,
    },
    /// Alter a field on a model.
    AlterField {
        /// The model name.
        model_name: String,
        /// The field name.
        field_name: String,
        /// The new field definition.
        field: SerializableField,
    },
}

impl SerializableOperation {
    /// Converts this back into an operation.
    ///
    /// # Errors
    ///
    /// Fails if a stored field path does not name a known field class.
    pub fn to_operation(&self) -> EnumResult<Box<dyn Operation>> {
        Ok(match self {
            Self::CreateModel { name, fields } => Box::new(CreateModel {
                name: name.clone(),
                fields: fields
                    .iter()
                    .map(SerializableField::to_state)
                    .collect::<EnumResult<_>>()?,
            }),
            Self::DeleteModel { name } => Box::new(DeleteModel { name: name.clone() }),
            Self::AddField { model_name, field } => Box::new(AddField {
                model_name: model_name.clone(),
                field: field.to_state()?,
            }),
            Self::RemoveField {
                model_name,
                field_name,
            } => Box::new(RemoveField {
                model_name: model_name.clone(),
                field_name: field_name.clone(),
            }),
            Self::AlterField {
                model_name,
                field_name,
                field,
            } => Box::new(AlterField {
                model_name: model_name.clone(),
                field_name: field_name.clone(),
                field: field.to_state()?,
            }),
        })
    }
}

impl SerializableMigration {
    /// Serializes this migration to a JSON string.
    pub fn to_json(&self) -> EnumResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            EnumError::SerializationError(format!("Failed to serialize migration: {e}"))
        })
    }

    /// Deserializes a migration from a JSON string.
    pub fn from_json(json: &str) -> EnumResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            EnumError::SerializationError(format!("Failed to deserialize migration: {e}"))
        })
    }

    /// Converts operations from boxed trait objects to serializable form.
    pub fn from_operations(
        app_label: &str,
        name: &str,
        dependencies: Vec<(String, String)>,
        initial: bool,
        operations: &[Box<dyn Operation>],
    ) -> Self {
        Self {
            app_label: app_label.to_string(),
            name: name.to_string(),
            dependencies,
            initial,
            operations: operations.iter().map(|op| op.to_serializable()).collect(),
        }
    }

    /// Converts the serializable operations back to boxed trait objects.
    pub fn to_operations(&self) -> EnumResult<Vec<Box<dyn Operation>>> {
        self.operations
            .iter()
            .map(SerializableOperation::to_operation)
            .collect()
    }

    /// Writes this migration to a file at the given path.
    pub fn write_to_file(&self, path: &Path) -> EnumResult<()> {
        write_json(path, &self.to_json()?)
    }

    /// Reads a migration from a file.
    pub fn read_from_file(path: &Path) -> EnumResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

fn write_json(path: &Path, json: &str) -> EnumResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "wrote migration file");
    Ok(())
}

/// Generates a sequential migration name.
///
/// Uses `custom_name` when given. Otherwise the first migration is
/// `initial`, a single operation names the migration after itself, and
/// anything else falls back to `auto`.
pub fn generate_migration_name(
    number: u32,
    custom_name: Option<&str>,
    operations: &[Box<dyn Operation>],
) -> String {
    let suffix = match (custom_name, operations) {
        (Some(name), _) => name.to_string(),
        (None, _) if number == 1 => "initial".to_string(),
        (None, [op]) => op.migration_name_fragment(),
        (None, _) => "auto".to_string(),
    };
    format!("{number:04}_{suffix}")
}

/// Determines the next migration number for an app by scanning existing files.
pub fn next_migration_number(migrations_dir: &Path, app_label: &str) -> u32 {
    let Ok(entries) = std::fs::read_dir(migrations_dir.join(app_label)) else {
        return 1;
    };

    let max_num = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|n| n.to_str())
                .and_then(|stem| stem.split('_').next())
                .and_then(|num| num.parse::<u32>().ok())
        })
        .max()
        .unwrap_or(0);

    max_num + 1
}

/// Returns the path where a migration file should be written.
pub fn migration_file_path(migrations_dir: &Path, app_label: &str, name: &str) -> PathBuf {
    migrations_dir.join(app_label).join(format!("{name}.json"))
}
