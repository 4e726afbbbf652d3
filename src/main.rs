// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let filter = if cli.global.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let global = &cli.global;
    match cli.command {
        Some(Commands::Layout) => commands::cmd_layout(global),
        Some(Commands::Build) => commands::cmd_build(global),
        Some(Commands::Test) => commands::cmd_test(global),
        Some(Commands::Package) => commands::cmd_package(global),
        Some(Commands::Create {
            skip_tests,
            cache,
            cache_dir,
        }) => commands::cmd_create(global, skip_tests, cache, cache_dir),
        Some(Commands::Inspect) => commands::cmd_inspect(global),
        Some(Commands::Completions { shell }) => commands::cmd_completions(shell),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
