use clap::Parser;
use miette::Result;
use modelgen::cli::commands::{check, completions, generate, init, list};
use modelgen::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping to `head` exits quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        None => generate::run(generate::GenerateArgs::default(), &global),
        Some(Commands::Generate(args)) => generate::run(args, &global),
        Some(Commands::List(args)) => list::run(args, &global),
        Some(Commands::Check(args)) => check::run(args, &global),
        Some(Commands::Init(args)) => init::run(args, &global),
        Some(Commands::Completions(args)) => completions::run(args),
    }
}
