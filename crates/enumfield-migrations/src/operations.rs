//! Migration operations that describe schema changes.
//!
//! Operations are the building blocks of migrations, corresponding to
//! Django's `django.db.migrations.operations`. Each one can replay itself
//! against an in-memory [`ProjectState`] and knows its serialized form.

use crate::autodetect::{MigrationFieldDef, ModelState, ProjectState};
use crate::serializer::{SerializableField, SerializableOperation};

/// A single migration operation.
pub trait Operation: Send + Sync {
    /// Returns a human-readable description of this operation.
    fn describe(&self) -> String;

    /// A short name fragment used when naming a migration after this operation.
    fn migration_name_fragment(&self) -> String;

    /// Applies this operation to the in-memory project state (forward direction).
    fn state_forwards(&self, app_label: &str, state: &mut ProjectState);

    /// Returns whether this operation is reversible.
    fn reversible(&self) -> bool;

    /// Returns the serializable form of this operation.
    fn to_serializable(&self) -> SerializableOperation;
}

fn model_key(app_label: &str, model_name: &str) -> (String, String) {
    (app_label.to_string(), model_name.to_string())
}

/// Creates a new model.
#[derive(Debug, Clone)]
pub struct CreateModel {
    /// The model name.
    pub name: String,
    /// The fields of the new model.
    pub fields: Vec<MigrationFieldDef>,
}

impl Operation for CreateModel {
    fn describe(&self) -> String {
        format!("Create model {}", self.name)
    }

    fn migration_name_fragment(&self) -> String {
        self.name.to_lowercase()
    }

    fn state_forwards(&self, app_label: &str, state: &mut ProjectState) {
        state.add_model(ModelState::new(
            app_label,
            self.name.clone(),
            self.fields.clone(),
        ));
    }

    fn reversible(&self) -> bool {
        true
    }

    fn to_serializable(&self) -> SerializableOperation {
        SerializableOperation::CreateModel {
            name: self.name.clone(),
            fields: self.fields.iter().map(SerializableField::from_state).collect(),
        }
    }
}

/// Deletes a model.
#[derive(Debug, Clone)]
pub struct DeleteModel {
    /// The model name.
    pub name: String,
}

impl Operation for DeleteModel {
    fn describe(&self) -> String {
        format!("Delete model {}", self.name)
    }

    fn migration_name_fragment(&self) -> String {
        format!("delete_{}", self.name.to_lowercase())
    }

    fn state_forwards(&self, app_label: &str, state: &mut ProjectState) {
        state.models.remove(&model_key(app_label, &self.name));
    }

    fn reversible(&self) -> bool {
        false
    }

    fn to_serializable(&self) -> SerializableOperation {
        SerializableOperation::DeleteModel {
            name: self.name.clone(),
        }
    }
}

/// Adds a field to an existing model.
#[derive(Debug, Clone)]
pub struct AddField {
    /// The model name the field is being added to.
    pub model_name: String,
    /// The field to add.
    pub field: MigrationFieldDef,
}

impl Operation for AddField {
    fn describe(&self) -> String {
        format!("Add field {} to {}", self.field.name, self.model_name)
    }

    fn migration_name_fragment(&self) -> String {
        format!("{}_{}", self.model_name.to_lowercase(), self.field.name.to_lowercase())
    }

    fn state_forwards(&self, app_label: &str, state: &mut ProjectState) {
        if let Some(model) = state.models.get_mut(&model_key(app_label, &self.model_name)) {
            model.fields.push(self.field.clone());
        }
    }

    fn reversible(&self) -> bool {
        true
    }

    fn to_serializable(&self) -> SerializableOperation {
        SerializableOperation::AddField {
            model_name: self.model_name.clone(),
            field: SerializableField::from_state(&self.field),
        }
    }
}

/// Removes a field from an existing model.
#[derive(Debug, Clone)]
pub struct RemoveField {
    /// The model name the field is being removed from.
    pub model_name: String,
    /// The name of the field to remove.
    pub field_name: String,
}

impl Operation for RemoveField {
    fn describe(&self) -> String {
        format!("Remove field {} from {}", self.field_name, self.model_name)
    }

    fn migration_name_fragment(&self) -> String {
        format!(
            "remove_{}_{}",
            self.model_name.to_lowercase(),
            self.field_name.to_lowercase()
        )
    }

    fn state_forwards(&self, app_label: &str, state: &mut ProjectState) {
        if let Some(model) = state.models.get_mut(&model_key(app_label, &self.model_name)) {
            model.fields.retain(|f| f.name != self.field_name);
        }
    }

    fn reversible(&self) -> bool {
        true
    }

    fn to_serializable(&self) -> SerializableOperation {
        SerializableOperation::RemoveField {
            model_name: self.model_name.clone(),
            field_name: self.field_name.clone(),
        }
    }
}

/// Alters a field on an existing model.
#[derive(Debug, Clone)]
pub struct AlterField {
    /// The model name containing the field.
    pub model_name: String,
    /// The name of the field being altered.
    pub field_name: String,
    /// The new field definition.
    pub field: MigrationFieldDef,
}

impl Operation for AlterField {
    fn describe(&self) -> String {
        format!("Alter field {} on {}", self.field_name, self.model_name)
    }

    fn migration_name_fragment(&self) -> String {
        format!(
            "alter_{}_{}",
            self.model_name.to_lowercase(),
            self.field_name.to_lowercase()
        )
    }

    fn state_forwards(&self, app_label: &str, state: &mut ProjectState) {
        if let Some(model) = state.models.get_mut(&model_key(app_label, &self.model_name)) {
            if let Some(f) = model.fields.iter_mut().find(|f| f.name == self.field_name) {
                *f = self.field.clone();
            }
        }
    }

    fn reversible(&self) -> bool {
        true
    }

    fn to_serializable(&self) -> SerializableOperation {
        SerializableOperation::AlterField {
            model_name: self.model_name.clone(),
            field_name: self.field_name.clone(),
            field: SerializableField::from_state(&self.field),
        }
    }
}
