//! Definitions-file parse errors rendered with source context

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Syntax or shape error in a YAML definitions file
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid definitions file: {message}")]
#[diagnostic(code(modelgen::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    let mut current_line = 1;

    for (i, ch) in source.char_indices() {
        if current_line == line {
            let line_start = i;
            let mut col = 1;
            for (j, c) in source[line_start..].char_indices() {
                if col == column {
                    return line_start + j;
                }
                if c == '\n' {
                    break;
                }
                col += 1;
            }
            return line_start + column.saturating_sub(1);
        }
        if ch == '\n' {
            current_line += 1;
        }
        offset = i;
    }

    offset
}

/// Suggest a fix based on the parser's message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    if msg_lower.contains("unknown field") {
        return Some(
            "Models accept: name, export, description, fields, example. Fields accept: name, type, default, title, description, min_length, max_length, minimum, maximum, pattern.".to_string(),
        );
    }

    if msg_lower.contains("missing field `type`") {
        return Some("Every field needs a `type`, e.g. `type: string`".to_string());
    }

    if msg_lower.contains("not a valid type name") || msg_lower.contains("unbalanced brackets") {
        return Some(
            "Types are string, integer, number, boolean, any, list[T], map[T], a model or enum name, optionally followed by '?'".to_string(),
        );
    }

    None
}
