//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, generate::GenerateArgs, init::InitArgs,
    list::ListArgs,
};

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(author, version, about = "Generate JSON Schemas and example data from model definitions")]
#[command(long_about = "Discovers models marked `export: true` in a YAML definitions file, \
lets you pick some, and writes a JSON Schema document and example payloads for them.")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `generate` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select models and generate schemas and example data (default)
    Generate(GenerateArgs),

    /// List exportable models
    List(ListArgs),

    /// Derive every exportable schema and check examples without writing files
    Check(CheckArgs),

    /// Write a starter definitions file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
