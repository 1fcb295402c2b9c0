//! `modelgen generate` - the load, select, emit, write pipeline

use miette::{Diagnostic, IntoDiagnostic, Result};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::helpers::plural;
use crate::cli::{GlobalOpts, Reporter};
use crate::core::config::Config;
use crate::core::loader::{load_definitions, LoadError};
use crate::core::model::ModelDef;
use crate::core::registry::ModelRegistry;
use crate::core::selection::{
    select_interactive, select_once, LinePrompt, ReaderPrompt, SelectionNotice, TerminalPrompt,
};
use crate::schema::emitter::{DerivationError, SchemaEmitter, SchemaResult};
use crate::schema::example::{check_conformance, ExampleError, ExampleResult};
use crate::schema::writer;

const SELECT_PROMPT: &str = "Models to generate (comma-separated numbers, or 'all')";

#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// Definitions file (default: models.yaml)
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,

    /// Apply this selection instead of prompting ("all", "1,3", ...)
    #[arg(long)]
    pub select: Option<String>,

    /// Schema output file (default: generated_schemas.json)
    #[arg(long)]
    pub schema_out: Option<PathBuf>,

    /// Example data output file (default: generated_data.json)
    #[arg(long)]
    pub data_out: Option<PathBuf>,

    /// Skip checking examples against their schema
    #[arg(long)]
    pub no_validate: bool,
}

impl GenerateArgs {
    fn overrides(&self) -> Config {
        Config {
            source: self.source.clone(),
            schema_output: self.schema_out.clone(),
            data_output: self.data_out.clone(),
            validate_examples: self.no_validate.then_some(false),
        }
    }
}

/// One or more selected models could not be fully generated
#[derive(Debug, Error, Diagnostic)]
#[error("Generation failed for {}: {}", plural(.models.len(), "model"), .models.join(", "))]
#[diagnostic(
    code(modelgen::generate::failed),
    help("Fix the reported definitions and run again")
)]
pub struct GenerationFailed {
    pub models: Vec<String>,
}

/// What happened to a model's example
#[derive(Debug)]
pub enum ExampleOutcome {
    Missing,
    Produced(ExampleResult),
    Rejected(ExampleError),
}

/// Result of running the emitter over one model
#[derive(Debug)]
pub struct ModelOutcome {
    pub schema: Result<SchemaResult, DerivationError>,
    pub example: ExampleOutcome,
}

/// Derive a model's schema and, when it has one, its example.
///
/// A derivation failure affects only this model; the example is not
/// attempted because there is no schema to check it against.
pub fn process_model(emitter: &SchemaEmitter, model: &ModelDef, validate: bool) -> ModelOutcome {
    let schema = emitter.emit(model);

    let example = match (&schema, &model.example) {
        (_, None) => ExampleOutcome::Missing,
        (Err(_), Some(_)) => ExampleOutcome::Missing,
        (Ok(result), Some(example)) => {
            let checked = if validate {
                check_conformance(&model.name, &result.schema, example.value())
            } else {
                Ok(())
            };
            match checked.and_then(|_| example.dump_json()) {
                Ok(json) => ExampleOutcome::Produced(ExampleResult {
                    name: model.name.clone(),
                    json,
                }),
                Err(err) => ExampleOutcome::Rejected(err),
            }
        }
    };

    ModelOutcome { schema, example }
}

/// Print an example failure with one line per violation
pub fn report_example_error(reporter: &Reporter, err: &ExampleError) {
    reporter.error(&err.to_string());
    if let ExampleError::Nonconforming { violations, .. } = err {
        for violation in violations {
            reporter.error(&format!("  {}", violation));
        }
    }
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let reporter = Reporter::new(global);
    let mut config = Config::load();
    config.merge(args.overrides());

    reporter.heading("--- Model to JSON Schema Generator ---");

    let source = config.source();
    reporter.status(&format!("Loading models from '{}'...", source.display()));

    let definitions = match load_definitions(&source) {
        Ok(definitions) => definitions,
        Err(LoadError::SourceNotFound { path }) => {
            reporter.warn(&format!("Definitions file not found: {}", path.display()));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let registry = ModelRegistry::from_definitions(&definitions);
    if registry.is_empty() {
        reporter.warn(&format!(
            "No models marked with `export: true` found in '{}'",
            source.display()
        ));
        return Ok(());
    }
    reporter.status(&format!(
        "Found {}: {}",
        plural(registry.len(), "model"),
        registry.names().join(", ")
    ));

    let notify = |notice: SelectionNotice| report_notice(&reporter, &notice);
    let selected = match &args.select {
        Some(input) => select_once(&registry, input, notify)?,
        None => {
            print_menu(&registry);
            let mut prompt = operator_prompt();
            select_interactive(&registry, prompt.as_mut(), SELECT_PROMPT, notify)
                .into_diagnostic()?
        }
    };

    if selected.is_empty() {
        reporter.warn("No models selected, exiting.");
        return Ok(());
    }

    let emitter = SchemaEmitter::new(&definitions);
    let mut schemas = Vec::new();
    let mut examples = Vec::new();
    let mut failed = Vec::new();

    for model in selected {
        reporter.status(&format!("Generating schema for {}...", model.name));
        let outcome = process_model(&emitter, model, config.validate_examples());

        match outcome.schema {
            Ok(result) => schemas.push(result),
            Err(err) => {
                // Only this model is skipped; the others are still written
                reporter.error(&err.to_string());
                failed.push(model.name.clone());
                continue;
            }
        }

        match outcome.example {
            ExampleOutcome::Missing => {
                reporter.note(&format!("Model '{}' does not define an example", model.name));
            }
            ExampleOutcome::Produced(example) => {
                reporter.detail(&format!("{} example data:\n{}", model.name, example.json));
                examples.push(example);
            }
            ExampleOutcome::Rejected(err) => {
                report_example_error(&reporter, &err);
                failed.push(model.name.clone());
            }
        }
    }

    if !schemas.is_empty() {
        let path = config.schema_output();
        writer::render_schemas(&mut io::stdout(), &schemas).into_diagnostic()?;
        reporter.status(&format!(
            "\nSchemas are written to the console and '{}'",
            path.display()
        ));
        writer::write_document(&path, &writer::schema_document(&schemas))?;
        reporter.success(&format!("Schemas saved to {}", path.display()));
    }

    if !examples.is_empty() {
        let path = config.data_output();
        writer::render_examples(&mut io::stdout(), &examples).into_diagnostic()?;
        let document = writer::example_document(&examples)?;
        writer::write_document(&path, &document)?;
        reporter.success(&format!("Example data saved to {}", path.display()));
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(GenerationFailed { models: failed }.into())
    }
}

fn print_menu(registry: &ModelRegistry) {
    println!("\nExportable models:");
    for (i, model) in registry.iter().enumerate() {
        match &model.description {
            Some(desc) => println!("  {}. {} - {}", i + 1, model.name, desc),
            None => println!("  {}. {}", i + 1, model.name),
        }
    }
}

fn operator_prompt() -> Box<dyn LinePrompt> {
    if io::stdin().is_terminal() {
        Box::new(TerminalPrompt::new())
    } else {
        Box::new(ReaderPrompt::new(io::stdin().lock(), io::stdout()))
    }
}

fn report_notice(reporter: &Reporter, notice: &SelectionNotice) {
    match notice {
        SelectionNotice::OutOfRange(number) => {
            reporter.warn(&format!("Invalid selection: {}", number));
        }
        SelectionNotice::NoValidChoice => reporter.warn("No valid selection."),
        SelectionNotice::Malformed(err) => reporter.warn(&err.to_string()),
        SelectionNotice::Cancelled => reporter.warn("Operation cancelled."),
    }
}
