//! `modelgen init` command - Write a starter definitions file

use console::style;
use miette::{miette, IntoDiagnostic, Result};
use rust_embed::Embed;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, Reporter};
use crate::core::config::DEFAULT_SOURCE;

#[derive(Embed)]
#[folder = "templates/"]
struct StarterTemplates;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// File to create
    #[arg(default_value = DEFAULT_SOURCE)]
    pub path: PathBuf,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,
}

/// Contents of the bundled starter definitions file
pub fn starter_definitions() -> Result<String> {
    let file = StarterTemplates::get("models.yaml")
        .ok_or_else(|| miette!("Starter template 'models.yaml' is not bundled"))?;
    String::from_utf8(file.data.into_owned()).into_diagnostic()
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let reporter = Reporter::new(global);

    if args.path.exists() && !args.force {
        reporter.warn(&format!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        ));
        return Ok(());
    }

    if let Some(parent) = args.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
    }

    std::fs::write(&args.path, starter_definitions()?).into_diagnostic()?;

    reporter.success(&format!(
        "Created definitions file {}",
        style(args.path.display()).cyan()
    ));
    reporter.status("");
    reporter.status("Next steps:");
    reporter.status(&format!(
        "  {} List exportable models",
        style("modelgen list").yellow()
    ));
    reporter.status(&format!(
        "  {} Generate schemas and example data",
        style("modelgen generate").yellow()
    ));
    Ok(())
}
