// src/cli/mod.rs
//! CLI definitions for pantry
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Lifecycle commands, each independently invocable:
//! - `layout` - Resolve and print the folder layout
//! - `build` - Generate build inputs, configure and compile
//! - `test` - Run the test suite against the last build
//! - `package` - Assemble the package folder and publish its info
//!
//! Everything at once:
//! - `create` - Full pipeline, optionally through the artifact cache
//!
//! Utilities:
//! - `inspect` - Validate a recipe and show its identity
//! - `completions` - Shell completion scripts

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(version)]
#[command(about = "Recipe-driven build, test and packaging for native libraries", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Invocation root; layout folders resolve against it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Recipe file (default: <root>/pantry.toml)
    #[arg(long, global = true)]
    pub recipe: Option<PathBuf>,

    /// Target setting override, e.g. -s build_type=Debug (repeatable)
    #[arg(short = 's', long = "setting", global = true, value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Meson program to run instead of the one on PATH
    #[arg(long, global = true, env = "PANTRY_MESON")]
    pub meson: Option<PathBuf>,

    /// Directory of unpacked dependencies laid out as <name>/<version>/
    #[arg(long, global = true)]
    pub deps_root: Option<PathBuf>,

    /// Number of parallel compile jobs (default: available CPUs)
    #[arg(short, long, global = true)]
    pub jobs: Option<u32>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and print the folder layout
    Layout,

    /// Generate build inputs, configure and compile
    Build,

    /// Run the test suite against the last successful build
    Test,

    /// Copy headers, install into the package folder and publish info
    Package,

    /// Run the whole pipeline: build, test, package
    Create {
        /// Skip the test stage
        #[arg(long)]
        skip_tests: bool,

        /// Reuse and populate the artifact cache
        #[arg(long)]
        cache: bool,

        /// Artifact cache directory (default: user cache dir)
        #[arg(long, env = "PANTRY_CACHE_DIR")]
        cache_dir: Option<PathBuf>,
    },

    /// Validate the recipe and show metadata, requirements and identity
    Inspect,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
