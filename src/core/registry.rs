//! The ordered set of exportable models

use crate::core::model::{Definitions, ModelDef};

/// Models carrying the export marker, in declaration order
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelDef>,
}

impl ModelRegistry {
    /// Collect every model with `export: true`. Enums and unmarked models are skipped.
    pub fn from_definitions(definitions: &Definitions) -> Self {
        Self {
            models: definitions
                .models
                .iter()
                .filter(|m| m.export)
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDef> {
        self.models.iter()
    }

    /// Entry at a 1-based position
    pub fn at(&self, position: usize) -> Option<&ModelDef> {
        position
            .checked_sub(1)
            .and_then(|index| self.models.get(index))
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}
