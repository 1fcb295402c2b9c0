//! Schema system - derivation, example checking and output

pub mod emitter;
pub mod example;
pub mod writer;

pub use emitter::{DerivationError, SchemaEmitter, SchemaResult};
pub use example::{check_conformance, Example, ExampleError, ExampleResult};
pub use writer::WriteError;
