//! `modelgen list` - show exportable models

use miette::Result;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{plural, truncate_str};
use crate::cli::{GlobalOpts, Reporter};
use crate::core::config::Config;
use crate::core::loader::load_definitions;
use crate::core::registry::ModelRegistry;

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    /// Definitions file (default: models.yaml)
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let reporter = Reporter::new(global);
    let mut config = Config::load();
    config.merge(Config {
        source: args.source,
        ..Default::default()
    });

    let source = config.source();
    let definitions = load_definitions(&source)?;
    let registry = ModelRegistry::from_definitions(&definitions);

    if registry.is_empty() {
        reporter.warn(&format!(
            "No models marked with `export: true` found in '{}'",
            source.display()
        ));
        return Ok(());
    }

    println!("{}", model_table(&registry));
    reporter.status(&format!("\n{} found", plural(registry.len(), "model")));
    Ok(())
}

fn model_table(registry: &ModelRegistry) -> String {
    let mut table = Builder::default();
    table.push_record(["#", "MODEL", "FIELDS", "EXAMPLE", "DESCRIPTION"]);
    for (i, model) in registry.iter().enumerate() {
        table.push_record([
            (i + 1).to_string(),
            model.name.clone(),
            model.fields.len().to_string(),
            if model.has_example() { "yes" } else { "no" }.to_string(),
            truncate_str(model.description.as_deref().unwrap_or(""), 40),
        ]);
    }
    table.build().with(Style::rounded()).to_string()
}
