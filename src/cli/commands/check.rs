//! `modelgen check` - derive every exportable schema and check examples

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::generate::{
    process_model, report_example_error, ExampleOutcome, GenerationFailed,
};
use crate::cli::helpers::plural;
use crate::cli::{GlobalOpts, Reporter};
use crate::core::config::Config;
use crate::core::loader::load_definitions;
use crate::core::registry::ModelRegistry;
use crate::schema::emitter::SchemaEmitter;

#[derive(clap::Args, Debug, Default)]
pub struct CheckArgs {
    /// Definitions file (default: models.yaml)
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let reporter = Reporter::new(global);
    let mut config = Config::load();
    config.merge(Config {
        source: args.source,
        ..Default::default()
    });

    let source = config.source();
    reporter.detail(&format!("Checking {}", source.display()));
    let definitions = load_definitions(&source)?;
    let registry = ModelRegistry::from_definitions(&definitions);

    if registry.is_empty() {
        reporter.warn(&format!(
            "No models marked with `export: true` found in '{}'",
            source.display()
        ));
        return Ok(());
    }

    let emitter = SchemaEmitter::new(&definitions);
    let mut failed = Vec::new();

    for model in registry.iter() {
        let outcome = process_model(&emitter, model, true);

        if let Err(err) = &outcome.schema {
            reporter.error(&err.to_string());
            failed.push(model.name.clone());
            continue;
        }

        match &outcome.example {
            ExampleOutcome::Rejected(err) => {
                report_example_error(&reporter, err);
                failed.push(model.name.clone());
            }
            ExampleOutcome::Produced(_) => {
                reporter.success(&format!("{} (schema, example)", style(&model.name).bold()));
            }
            ExampleOutcome::Missing => {
                reporter.success(&format!("{} (schema)", style(&model.name).bold()));
            }
        }
    }

    let ok = registry.len() - failed.len();
    reporter.status(&format!(
        "\nChecked {}: {} ok, {} failed",
        plural(registry.len(), "model"),
        ok,
        failed.len()
    ));

    if failed.is_empty() {
        Ok(())
    } else {
        Err(GenerationFailed { models: failed }.into())
    }
}
