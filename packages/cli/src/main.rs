mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, export, init, lint, CompileArgs, ExportArgs, InitArgs, LintArgs};
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - build multi-page sites from section layouts
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and a starter project
    Init(InitArgs),

    /// Compile project pages to React components
    Compile(CompileArgs),

    /// Check a project for dangling links, route clashes and malformed sections
    Lint(LintArgs),

    /// Pack the generated project into a tar archive
    Export(ExportArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Compile(args) => compile(args, &cwd),
            Command::Lint(args) => lint(args, &cwd),
            Command::Export(args) => export(args, &cwd).map(|_| ()),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
