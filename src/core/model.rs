//! Model definitions as declared in the definitions file

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::types::TypeExpr;
use crate::schema::example::Example;

/// The whole definitions document: models plus supporting enums
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Definitions {
    #[serde(default)]
    pub models: Vec<ModelDef>,

    /// Enumerations referenced by model fields. Never exported on their own.
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

impl Definitions {
    /// Look up a model by name (exported or not)
    pub fn model(&self, name: &str) -> Option<&ModelDef> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Look up an enum by name
    pub fn enumeration(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// All model and enum names in declaration order (models first)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.enums.iter().map(|e| e.name.as_str()))
    }
}

/// A named structured type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDef {
    pub name: String,

    /// Export marker; only models with `export: true` are offered for generation
    #[serde(default)]
    pub export: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldDef>,

    /// Example-generation capability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Example>,
}

impl ModelDef {
    pub fn has_example(&self) -> bool {
        self.example.is_some()
    }
}

/// A single field of a model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeExpr,

    /// Declared default. `Some(Value::Null)` means an explicit `default: null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldDef {
    /// A field is optional iff it declares a default or its type is nullable
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.ty.is_nullable()
    }

    /// Validation constraints declared on this field
    pub fn constraints(&self) -> Constraints {
        Constraints {
            min_length: self.min_length,
            max_length: self.max_length,
            minimum: self.minimum,
            maximum: self.maximum,
            pattern: self.pattern.clone(),
        }
    }
}

/// Validation constraints carried into the schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<String>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        *self == Constraints::default()
    }
}

/// A closed set of literal values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub values: Vec<Value>,
}

/// Distinguishes an absent key from an explicit `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
