//! YAML parsing diagnostics

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;
