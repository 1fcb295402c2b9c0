//! Definitions loading
//!
//! Reads a YAML definitions file from disk and turns it into
//! [`Definitions`]. Discovery of the exportable subset lives in
//! [`crate::core::registry`].

use miette::Diagnostic;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::model::Definitions;
use crate::yaml::YamlSyntaxError;

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Definitions file not found: {}", .path.display())]
    #[diagnostic(
        code(modelgen::load::not_found),
        help("Create one with `modelgen init` or point to it with --source")
    )]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read {}", .path.display())]
    #[diagnostic(code(modelgen::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("'{name}' is defined more than once")]
    #[diagnostic(
        code(modelgen::load::duplicate),
        help("Model and enum names share one namespace and must be unique")
    )]
    DuplicateDefinition { name: String },
}

/// Load and parse a definitions file
pub fn load_definitions(path: &Path) -> Result<Definitions, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_definitions(&content, &filename)
}

/// Parse definitions from YAML text. `filename` is only used for diagnostics.
pub fn parse_definitions(content: &str, filename: &str) -> Result<Definitions, LoadError> {
    // An empty or comment-only file declares nothing
    if is_blank(content) {
        return Ok(Definitions::default());
    }

    let definitions: Definitions = serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename))?;

    reject_duplicates(&definitions)?;
    Ok(definitions)
}

fn reject_duplicates(definitions: &Definitions) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for name in definitions.names() {
        if !seen.insert(name) {
            return Err(LoadError::DuplicateDefinition {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
