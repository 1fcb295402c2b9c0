//! Field type expressions used in model definitions
//!
//! Grammar:
//!
//! ```text
//! type := base '?'?
//! base := 'string' | 'integer' | 'number' | 'boolean' | 'any'
//!       | 'list[' type ']' | 'map[' type ']' | IDENT
//! ```
//!
//! A trailing `?` makes the type nullable. Any identifier that is not a
//! primitive names another model or enum in the same definitions file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A parsed field type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeExpr {
    String,
    Integer,
    Number,
    Boolean,
    /// Opaque value, no structural constraint
    Any,
    List(Box<TypeExpr>),
    /// String-keyed object with uniform values
    Map(Box<TypeExpr>),
    Nullable(Box<TypeExpr>),
    /// Reference to a model or enum by name
    Named(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("empty type expression")]
    Empty,

    #[error("'{0}' is not a valid type name")]
    InvalidName(String),

    #[error("unbalanced brackets in '{0}'")]
    Unbalanced(String),

    #[error("'{0}' is already nullable")]
    DoubleNullable(String),
}

impl TypeExpr {
    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeExpr::Nullable(_))
    }

    /// The type with one level of nullability removed
    pub fn non_null(&self) -> &TypeExpr {
        match self {
            TypeExpr::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Every model/enum name this type refers to, in order of appearance
    pub fn referenced_names(&self) -> Vec<&str> {
        match self {
            TypeExpr::Named(name) => vec![name.as_str()],
            TypeExpr::List(inner) | TypeExpr::Map(inner) | TypeExpr::Nullable(inner) => {
                inner.referenced_names()
            }
            _ => Vec::new(),
        }
    }
}

impl FromStr for TypeExpr {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TypeParseError::Empty);
        }

        if let Some(inner) = s.strip_suffix('?') {
            let inner: TypeExpr = inner.parse()?;
            if inner.is_nullable() {
                return Err(TypeParseError::DoubleNullable(s.to_string()));
            }
            return Ok(TypeExpr::Nullable(Box::new(inner)));
        }

        for (prefix, wrap) in [
            ("list[", TypeExpr::List as fn(Box<TypeExpr>) -> TypeExpr),
            ("map[", TypeExpr::Map as fn(Box<TypeExpr>) -> TypeExpr),
        ] {
            if let Some(rest) = s.strip_prefix(prefix) {
                let inner = rest
                    .strip_suffix(']')
                    .ok_or_else(|| TypeParseError::Unbalanced(s.to_string()))?;
                return Ok(wrap(Box::new(inner.parse()?)));
            }
        }

        match s {
            "string" => Ok(TypeExpr::String),
            "integer" => Ok(TypeExpr::Integer),
            "number" => Ok(TypeExpr::Number),
            "boolean" => Ok(TypeExpr::Boolean),
            "any" => Ok(TypeExpr::Any),
            name if is_identifier(name) => Ok(TypeExpr::Named(name.to_string())),
            other if other.contains('[') || other.contains(']') => {
                Err(TypeParseError::Unbalanced(other.to_string()))
            }
            other => Err(TypeParseError::InvalidName(other.to_string())),
        }
    }
}

impl TryFrom<String> for TypeExpr {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeExpr> for String {
    fn from(value: TypeExpr) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::String => write!(f, "string"),
            TypeExpr::Integer => write!(f, "integer"),
            TypeExpr::Number => write!(f, "number"),
            TypeExpr::Boolean => write!(f, "boolean"),
            TypeExpr::Any => write!(f, "any"),
            TypeExpr::List(inner) => write!(f, "list[{}]", inner),
            TypeExpr::Map(inner) => write!(f, "map[{}]", inner),
            TypeExpr::Nullable(inner) => write!(f, "{}?", inner),
            TypeExpr::Named(name) => write!(f, "{}", name),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
