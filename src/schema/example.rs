//! Example-generation capability and conformance checking
//!
//! A model may carry an [`Example`]. When it does, the example is dumped
//! as pre-serialized JSON text and (optionally) checked against the model's
//! own derived schema before being persisted.

use jsonschema::{error::ValidationErrorKind, validator_for, ValidationError as JsonSchemaError};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// An example instance declared alongside a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Example(JsonValue);

impl Example {
    pub fn value(&self) -> &JsonValue {
        &self.0
    }

    /// Serialize the example to pretty-printed JSON text
    pub fn dump_json(&self) -> Result<String, ExampleError> {
        serde_json::to_string_pretty(&self.0).map_err(ExampleError::Serialize)
    }
}

/// A model name paired with its pre-serialized example document
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleResult {
    pub name: String,
    pub json: String,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExampleError {
    #[error("Failed to serialize example: {0}")]
    #[diagnostic(code(modelgen::example::serialize))]
    Serialize(#[source] serde_json::Error),

    #[error("Schema for '{model}' could not be compiled: {message}")]
    #[diagnostic(code(modelgen::example::schema))]
    InvalidSchema { model: String, message: String },

    #[error("Example for '{model}' does not match its schema ({} violation(s))", .violations.len())]
    #[diagnostic(
        code(modelgen::example::nonconforming),
        help("Fix the model's `example` block in the definitions file")
    )]
    Nonconforming {
        model: String,
        /// One message per disagreement, each naming its location
        violations: Vec<String>,
    },
}

/// Check an example instance against the schema derived for the same model
pub fn check_conformance(
    model: &str,
    schema: &JsonValue,
    instance: &JsonValue,
) -> Result<(), ExampleError> {
    let validator = validator_for(schema).map_err(|e| ExampleError::InvalidSchema {
        model: model.to_string(),
        message: e.to_string(),
    })?;

    let violations: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format_schema_error(&e))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ExampleError::Nonconforming {
            model: model.to_string(),
            violations,
        })
    }
}

/// Format a JSON Schema error into a user-friendly message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop_str, path)
        }
        ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        ValidationErrorKind::Enum { options } => {
            format!("Invalid value at {}: must be one of: {}", path, options)
        }
        ValidationErrorKind::Pattern { pattern } => {
            format!("Value at {} doesn't match pattern: {}", path, pattern)
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}
