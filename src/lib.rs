//! modelgen: JSON Schema and example data generator
//!
//! Reads model definitions from a YAML file, lets the operator pick the
//! exportable ones, and writes a JSON Schema document plus example
//! payloads for the selection.

pub mod cli;
pub mod core;
pub mod schema;
pub mod yaml;
