//! Core module - definitions, discovery, selection and configuration

pub mod config;
pub mod loader;
pub mod model;
pub mod registry;
pub mod selection;
pub mod types;

pub use config::Config;
pub use loader::{load_definitions, LoadError};
pub use model::{Constraints, Definitions, EnumDef, FieldDef, ModelDef};
pub use registry::ModelRegistry;
pub use selection::{LinePrompt, MalformedSelection, SelectionInput, SelectionNotice};
pub use types::TypeExpr;
