//! Operator-facing status output
//!
//! All progress and diagnostic lines go through [`Reporter`] so that
//! `--quiet` and `--verbose` are honoured in one place. Generated
//! documents are written to stdout directly and are never suppressed.

use console::style;

use crate::cli::GlobalOpts;

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
    verbose: bool,
}

impl Reporter {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            quiet: global.quiet,
            verbose: global.verbose && !global.quiet,
        }
    }

    pub fn heading(&self, message: &str) {
        if !self.quiet {
            println!("{}", style(message).bold());
        }
    }

    pub fn status(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    /// Informational, not a problem
    pub fn note(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("i").cyan(), message);
        }
    }

    /// Shown even with --quiet
    pub fn warn(&self, message: &str) {
        println!("{} {}", style("!").yellow(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    /// Only with --verbose
    pub fn detail(&self, message: &str) {
        if self.verbose {
            println!("{}", style(message).dim());
        }
    }
}
