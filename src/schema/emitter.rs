//! JSON Schema derivation from model definitions
//!
//! Each exported model becomes a standalone schema document. Referenced
//! models and enums are collected under `$defs` and pointed at with
//! `$ref`, so recursive models terminate. Keys are emitted in sorted
//! order, which makes derivation byte-for-byte deterministic.

use miette::Diagnostic;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::core::model::{Definitions, EnumDef, FieldDef, ModelDef};
use crate::core::types::TypeExpr;

/// A model name paired with its schema document
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaResult {
    pub name: String,
    pub schema: Value,
}

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum DerivationError {
    #[error("Field '{model}.{field}' refers to unknown type '{name}'")]
    #[diagnostic(
        code(modelgen::schema::unknown_type),
        help("Declare a model or enum with that name in the same definitions file")
    )]
    UnknownType {
        model: String,
        field: String,
        name: String,
    },

    #[error("Field '{model}.{field}': `{constraint}` does not apply to type '{ty}'")]
    #[diagnostic(
        code(modelgen::schema::constraint),
        help("min_length/max_length apply to strings and lists, minimum/maximum to numbers, pattern to strings")
    )]
    IncompatibleConstraint {
        model: String,
        field: String,
        constraint: &'static str,
        ty: String,
    },
}

/// Derives schemas for models drawn from one definitions document
pub struct SchemaEmitter<'d> {
    definitions: &'d Definitions,
}

#[derive(Default)]
struct Context {
    defs: BTreeMap<String, Value>,
    seen: HashSet<String>,
}

impl<'d> SchemaEmitter<'d> {
    pub fn new(definitions: &'d Definitions) -> Self {
        Self { definitions }
    }

    /// Derive the schema document for one model
    pub fn emit(&self, model: &ModelDef) -> Result<SchemaResult, DerivationError> {
        let mut ctx = Context::default();
        let mut schema = self.object_schema(model, &mut ctx)?;

        if !ctx.defs.is_empty() {
            let defs: Map<String, Value> = ctx.defs.into_iter().collect();
            schema.insert("$defs".to_string(), Value::Object(defs));
        }

        Ok(SchemaResult {
            name: model.name.clone(),
            schema: Value::Object(sorted(schema)),
        })
    }

    fn object_schema(
        &self,
        model: &ModelDef,
        ctx: &mut Context,
    ) -> Result<Map<String, Value>, DerivationError> {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &model.fields {
            properties.insert(field.name.clone(), self.field_schema(model, field, ctx)?);
            if field.is_required() {
                required.push(Value::String(field.name.clone()));
            }
        }

        let mut schema = Map::new();
        if let Some(description) = &model.description {
            schema.insert("description".to_string(), json!(description));
        }
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        schema.insert("title".to_string(), json!(model.name));
        schema.insert("type".to_string(), json!("object"));
        Ok(sorted(schema))
    }

    fn field_schema(
        &self,
        model: &ModelDef,
        field: &FieldDef,
        ctx: &mut Context,
    ) -> Result<Value, DerivationError> {
        let inner_ty = field.ty.non_null();
        let mut inner = self.type_schema(model, field, inner_ty, ctx)?;
        apply_constraints(model, field, inner_ty, &mut inner)?;
        let inner = sorted(inner);

        let is_bare_ref = inner.contains_key("$ref") && !field.ty.is_nullable();

        let mut schema = if field.ty.is_nullable() {
            let mut wrapper = Map::new();
            wrapper.insert(
                "anyOf".to_string(),
                json!([Value::Object(inner), {"type": "null"}]),
            );
            wrapper
        } else {
            inner
        };

        if let Some(default) = &field.default {
            schema.insert("default".to_string(), default.clone());
        }
        if let Some(description) = &field.description {
            schema.insert("description".to_string(), json!(description));
        }
        if !is_bare_ref {
            let title = field
                .title
                .clone()
                .unwrap_or_else(|| title_case(&field.name));
            schema.insert("title".to_string(), json!(title));
        }

        Ok(Value::Object(sorted(schema)))
    }

    fn type_schema(
        &self,
        model: &ModelDef,
        field: &FieldDef,
        ty: &TypeExpr,
        ctx: &mut Context,
    ) -> Result<Map<String, Value>, DerivationError> {
        let mut schema = Map::new();
        match ty {
            TypeExpr::String => {
                schema.insert("type".to_string(), json!("string"));
            }
            TypeExpr::Integer => {
                schema.insert("type".to_string(), json!("integer"));
            }
            TypeExpr::Number => {
                schema.insert("type".to_string(), json!("number"));
            }
            TypeExpr::Boolean => {
                schema.insert("type".to_string(), json!("boolean"));
            }
            TypeExpr::Any => {}
            TypeExpr::List(item) => {
                let items = self.type_schema(model, field, item, ctx)?;
                schema.insert("items".to_string(), Value::Object(items));
                schema.insert("type".to_string(), json!("array"));
            }
            TypeExpr::Map(value) => {
                let values = self.type_schema(model, field, value, ctx)?;
                schema.insert("additionalProperties".to_string(), Value::Object(values));
                schema.insert("type".to_string(), json!("object"));
            }
            TypeExpr::Nullable(inner) => {
                let inner = self.type_schema(model, field, inner, ctx)?;
                schema.insert(
                    "anyOf".to_string(),
                    json!([Value::Object(inner), {"type": "null"}]),
                );
            }
            TypeExpr::Named(name) => {
                self.define(model, field, name, ctx)?;
                schema.insert("$ref".to_string(), json!(format!("#/$defs/{}", name)));
            }
        }
        Ok(schema)
    }

    /// Make sure `name` has an entry under `$defs`
    fn define(
        &self,
        model: &ModelDef,
        field: &FieldDef,
        name: &str,
        ctx: &mut Context,
    ) -> Result<(), DerivationError> {
        if ctx.seen.contains(name) {
            return Ok(());
        }

        if let Some(nested) = self.definitions.model(name) {
            ctx.seen.insert(name.to_string());
            let schema = self.object_schema(nested, ctx)?;
            ctx.defs.insert(name.to_string(), Value::Object(schema));
            Ok(())
        } else if let Some(enumeration) = self.definitions.enumeration(name) {
            ctx.seen.insert(name.to_string());
            ctx.defs
                .insert(name.to_string(), Value::Object(enum_schema(enumeration)));
            Ok(())
        } else {
            Err(DerivationError::UnknownType {
                model: model.name.clone(),
                field: field.name.clone(),
                name: name.to_string(),
            })
        }
    }
}

fn enum_schema(enumeration: &EnumDef) -> Map<String, Value> {
    let mut schema = Map::new();
    if let Some(description) = &enumeration.description {
        schema.insert("description".to_string(), json!(description));
    }
    schema.insert("enum".to_string(), Value::Array(enumeration.values.clone()));
    schema.insert("title".to_string(), json!(enumeration.name));

    let values = &enumeration.values;
    let ty = if values.iter().all(Value::is_string) {
        Some("string")
    } else if values.iter().all(|v| v.is_i64() || v.is_u64()) {
        Some("integer")
    } else if values.iter().all(Value::is_number) {
        Some("number")
    } else if values.iter().all(Value::is_boolean) {
        Some("boolean")
    } else {
        None
    };
    if let Some(ty) = ty {
        schema.insert("type".to_string(), json!(ty));
    }
    sorted(schema)
}

fn apply_constraints(
    model: &ModelDef,
    field: &FieldDef,
    ty: &TypeExpr,
    schema: &mut Map<String, Value>,
) -> Result<(), DerivationError> {
    let c = field.constraints();
    if c.is_empty() {
        return Ok(());
    }

    let incompatible = |constraint: &'static str| DerivationError::IncompatibleConstraint {
        model: model.name.clone(),
        field: field.name.clone(),
        constraint,
        ty: field.ty.to_string(),
    };

    let (min_key, max_key) = match ty {
        TypeExpr::String => ("minLength", "maxLength"),
        TypeExpr::List(_) => ("minItems", "maxItems"),
        _ if c.min_length.is_some() => return Err(incompatible("min_length")),
        _ if c.max_length.is_some() => return Err(incompatible("max_length")),
        _ => ("", ""),
    };
    if let Some(min) = c.min_length {
        schema.insert(min_key.to_string(), json!(min));
    }
    if let Some(max) = c.max_length {
        schema.insert(max_key.to_string(), json!(max));
    }

    let numeric = matches!(ty, TypeExpr::Integer | TypeExpr::Number);
    if let Some(minimum) = c.minimum {
        if !numeric {
            return Err(incompatible("minimum"));
        }
        schema.insert("minimum".to_string(), number(minimum));
    }
    if let Some(maximum) = c.maximum {
        if !numeric {
            return Err(incompatible("maximum"));
        }
        schema.insert("maximum".to_string(), number(maximum));
    }

    if let Some(pattern) = &c.pattern {
        if !matches!(ty, TypeExpr::String) {
            return Err(incompatible("pattern"));
        }
        schema.insert("pattern".to_string(), json!(pattern));
    }

    Ok(())
}

/// Whole numbers are written without a fractional part
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn sorted(map: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().collect()
}

/// `zip_code` -> `Zip Code`
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
