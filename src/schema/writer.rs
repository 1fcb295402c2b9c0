//! Console rendering and file persistence of generated documents
//!
//! One result is persisted as the document itself. Several results are
//! persisted as one object keyed by model name, in selection order.

use miette::Diagnostic;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::emitter::SchemaResult;
use crate::schema::example::ExampleResult;

#[derive(Debug, Error, Diagnostic)]
pub enum WriteError {
    #[error("Failed to write {}", .path.display())]
    #[diagnostic(code(modelgen::output::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {}", .path.display())]
    #[diagnostic(code(modelgen::output::encode))]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Example for '{model}' is not valid JSON")]
    #[diagnostic(code(modelgen::output::example))]
    InvalidExample {
        model: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Print every schema under a per-model header
pub fn render_schemas(out: &mut impl Write, results: &[SchemaResult]) -> io::Result<()> {
    writeln!(out, "\n--- JSON Schemas ---")?;
    for result in results {
        writeln!(out, "\n--- Schema for '{}' ---", result.name)?;
        let text = serde_json::to_string_pretty(&result.schema).map_err(io::Error::from)?;
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

/// Print every example exactly as it was serialized
pub fn render_examples(out: &mut impl Write, results: &[ExampleResult]) -> io::Result<()> {
    writeln!(out, "\n--- Example Data ---")?;
    for result in results {
        writeln!(out, "\n--- Example for '{}' ---", result.name)?;
        writeln!(out, "{}", result.json)?;
    }
    Ok(())
}

/// Build the schema file document
pub fn schema_document(results: &[SchemaResult]) -> Value {
    match results {
        [single] => single.schema.clone(),
        many => Value::Object(
            many.iter()
                .map(|r| (r.name.clone(), r.schema.clone()))
                .collect::<Map<String, Value>>(),
        ),
    }
}

/// Build the example file document, decoding each pre-serialized example
pub fn example_document(results: &[ExampleResult]) -> Result<Value, WriteError> {
    let decode = |result: &ExampleResult| {
        serde_json::from_str::<Value>(&result.json).map_err(|source| WriteError::InvalidExample {
            model: result.name.clone(),
            source,
        })
    };

    match results {
        [single] => decode(single),
        many => {
            let mut combined = Map::new();
            for result in many {
                combined.insert(result.name.clone(), decode(result)?);
            }
            Ok(Value::Object(combined))
        }
    }
}

/// Write a document as indented UTF-8 JSON. The file is replaced if it exists.
pub fn write_document(path: &Path, document: &Value) -> Result<(), WriteError> {
    let io_err = |source: io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document).map_err(|source| WriteError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn schema(name: &str) -> SchemaResult {
        SchemaResult {
            name: name.to_string(),
            schema: json!({"title": name, "type": "object"}),
        }
    }

    fn example(name: &str, json: &str) -> ExampleResult {
        ExampleResult {
            name: name.to_string(),
            json: json.to_string(),
        }
    }

    #[test]
    fn test_single_schema_is_top_level() {
        let doc = schema_document(&[schema("Person")]);
        assert_eq!(doc, json!({"title": "Person", "type": "object"}));
    }

    #[test]
    fn test_many_schemas_keyed_in_selection_order() {
        let doc = schema_document(&[schema("Zeta"), schema("Alpha"), schema("Mid")]);
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(doc["Alpha"]["title"], "Alpha");
    }

    #[test]
    fn test_examples_are_decoded_not_concatenated() {
        let doc = example_document(&[
            example("Person", "{\n  \"name\": \"Ada\"\n}"),
            example("Address", "{\"city\": \"Zürich\"}"),
        ])
        .unwrap();
        assert_eq!(
            doc,
            json!({"Person": {"name": "Ada"}, "Address": {"city": "Zürich"}})
        );
    }

    #[test]
    fn test_single_example_is_top_level() {
        let doc = example_document(&[example("Person", "{\"name\": \"Ada\"}")]).unwrap();
        assert_eq!(doc, json!({"name": "Ada"}));
    }

    #[test]
    fn test_invalid_example_text_is_reported() {
        let err = example_document(&[example("Broken", "{not json")]).unwrap_err();
        assert!(matches!(err, WriteError::InvalidExample { ref model, .. } if model == "Broken"));
    }

    #[test]
    fn test_written_file_keeps_non_ascii_and_indentation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("generated_data.json");
        write_document(&path, &json!({"city": "Zürich", "nested": {"a": 1}})).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"city\": \"Zürich\""));
        assert!(!content.contains("\\u00fc"));
        assert!(content.contains("\n  \"nested\": {\n    \"a\": 1\n  }"));
    }

    #[test]
    fn test_render_schemas_has_headers() {
        let mut out = Vec::new();
        render_schemas(&mut out, &[schema("Person"), schema("Address")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--- Schema for 'Person' ---"));
        assert!(text.contains("--- Schema for 'Address' ---"));
        assert!(text.contains("  \"title\": \"Person\""));
    }

    #[test]
    fn test_render_examples_prints_text_verbatim() {
        let mut out = Vec::new();
        render_examples(&mut out, &[example("Person", "{\"name\":\"Ada\"}")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--- Example for 'Person' ---\n{\"name\":\"Ada\"}\n"));
    }
}
