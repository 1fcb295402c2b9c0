//! Operator selection of models
//!
//! Accepted input:
//! - `all` (any case): every registered model, in registry order
//! - empty / whitespace: nothing
//! - `2,5,2`: 1-based positions; out-of-range entries are reported and
//!   skipped, duplicates collapse to their first occurrence
//!
//! Anything else is malformed and the operator is asked again.

use dialoguer::{theme::ColorfulTheme, Input};
use miette::Diagnostic;
use std::io::{self, BufRead, Write};
use std::num::IntErrorKind;
use thiserror::Error;

use crate::core::model::ModelDef;
use crate::core::registry::ModelRegistry;

/// Parsed form of one line of selection input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    All,
    Nothing,
    Indices {
        /// In-range positions, input order, duplicates removed
        picked: Vec<usize>,
        /// Out-of-range numbers as typed
        rejected: Vec<String>,
    },
}

#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
#[error("Invalid input '{input}': enter numbers separated by commas, or 'all'")]
#[diagnostic(code(modelgen::select::malformed))]
pub struct MalformedSelection {
    pub input: String,
}

/// Something the operator should be told while selecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionNotice {
    OutOfRange(String),
    NoValidChoice,
    Malformed(MalformedSelection),
    Cancelled,
}

/// Parse a selection line against a registry of `len` entries
pub fn parse_selection(input: &str, len: usize) -> Result<SelectionInput, MalformedSelection> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(SelectionInput::Nothing);
    }
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(SelectionInput::All);
    }

    let mut picked = Vec::new();
    let mut rejected = Vec::new();

    for item in trimmed.split(',') {
        let item = item.trim();
        let number = match item.parse::<i64>() {
            Ok(number) => number,
            // Too large for any registry, but still a number
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                rejected.push(item.to_string());
                continue;
            }
            Err(_) => {
                return Err(MalformedSelection {
                    input: trimmed.to_string(),
                })
            }
        };

        match usize::try_from(number) {
            Ok(position) if (1..=len).contains(&position) => {
                if !picked.contains(&position) {
                    picked.push(position);
                }
            }
            _ => rejected.push(item.to_string()),
        }
    }

    Ok(SelectionInput::Indices { picked, rejected })
}

/// Resolve parsed input into registry entries
pub fn pick<'r>(registry: &'r ModelRegistry, input: &SelectionInput) -> Vec<&'r ModelDef> {
    match input {
        SelectionInput::All => registry.iter().collect(),
        SelectionInput::Nothing => Vec::new(),
        SelectionInput::Indices { picked, .. } => {
            picked.iter().filter_map(|&p| registry.at(p)).collect()
        }
    }
}

/// Source of operator input lines
pub trait LinePrompt {
    /// Read one line. `Ok(None)` means the operator cancelled (interrupt or end of input).
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Interactive prompt on a terminal
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl LinePrompt for TerminalPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();

        match result {
            Ok(line) => Ok(Some(line)),
            Err(err) => {
                let dialoguer::Error::IO(err) = err;
                if err.kind() == io::ErrorKind::Interrupted {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}

/// Prompt over plain streams (piped stdin, tests)
pub struct ReaderPrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ReaderPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> LinePrompt for ReaderPrompt<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{}: ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => {
                writeln!(self.writer)?;
                Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Ask until the input is well-formed or the operator cancels.
///
/// Returns the chosen models, possibly empty. `notify` receives every
/// message meant for the operator.
pub fn select_interactive<'r>(
    registry: &'r ModelRegistry,
    prompt: &mut dyn LinePrompt,
    prompt_text: &str,
    mut notify: impl FnMut(SelectionNotice),
) -> io::Result<Vec<&'r ModelDef>> {
    loop {
        let Some(line) = prompt.read_line(prompt_text)? else {
            notify(SelectionNotice::Cancelled);
            return Ok(Vec::new());
        };

        match parse_selection(&line, registry.len()) {
            Ok(SelectionInput::Indices { picked, rejected }) => {
                for number in &rejected {
                    notify(SelectionNotice::OutOfRange(number.clone()));
                }
                if picked.is_empty() {
                    notify(SelectionNotice::NoValidChoice);
                    continue;
                }
                let input = SelectionInput::Indices { picked, rejected };
                return Ok(pick(registry, &input));
            }
            Ok(input) => return Ok(pick(registry, &input)),
            Err(malformed) => notify(SelectionNotice::Malformed(malformed)),
        }
    }
}

/// Apply a selection given up front (no re-prompting possible)
pub fn select_once<'r>(
    registry: &'r ModelRegistry,
    input: &str,
    mut notify: impl FnMut(SelectionNotice),
) -> Result<Vec<&'r ModelDef>, MalformedSelection> {
    let parsed = parse_selection(input, registry.len())?;
    if let SelectionInput::Indices { rejected, .. } = &parsed {
        for number in rejected {
            notify(SelectionNotice::OutOfRange(number.clone()));
        }
    }
    Ok(pick(registry, &parsed))
}
