// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn global_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("root")
            .long("root")
            .value_name("DIR")
            .default_value(".")
            .global(true)
            .help("Invocation root; layout folders resolve against it"),
    )
    .arg(
        Arg::new("recipe")
            .long("recipe")
            .value_name("FILE")
            .global(true)
            .help("Recipe file (default: <root>/pantry.toml)"),
    )
    .arg(
        Arg::new("setting")
            .short('s')
            .long("setting")
            .value_name("KEY=VALUE")
            .action(ArgAction::Append)
            .global(true)
            .help("Target setting override (repeatable)"),
    )
    .arg(
        Arg::new("meson")
            .long("meson")
            .value_name("PATH")
            .env("PANTRY_MESON")
            .global(true)
            .help("Meson program to run instead of the one on PATH"),
    )
    .arg(
        Arg::new("deps_root")
            .long("deps-root")
            .value_name("DIR")
            .global(true)
            .help("Directory of unpacked dependencies laid out as <name>/<version>/"),
    )
    .arg(
        Arg::new("jobs")
            .short('j')
            .long("jobs")
            .global(true)
            .help("Number of parallel compile jobs"),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Enable debug logging"),
    )
}

fn build_cli() -> Command {
    global_args(
        Command::new("pantry")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Recipe-driven build, test and packaging for native libraries")
            .subcommand_required(false),
    )
    .subcommand(Command::new("layout").about("Resolve and print the folder layout"))
    .subcommand(Command::new("build").about("Generate build inputs, configure and compile"))
    .subcommand(Command::new("test").about("Run the test suite against the last successful build"))
    .subcommand(
        Command::new("package")
            .about("Copy headers, install into the package folder and publish info"),
    )
    .subcommand(
        Command::new("create")
            .about("Run the whole pipeline: build, test, package")
            .arg(
                Arg::new("skip_tests")
                    .long("skip-tests")
                    .action(ArgAction::SetTrue)
                    .help("Skip the test stage"),
            )
            .arg(
                Arg::new("cache")
                    .long("cache")
                    .action(ArgAction::SetTrue)
                    .help("Reuse and populate the artifact cache"),
            )
            .arg(
                Arg::new("cache_dir")
                    .long("cache-dir")
                    .value_name("DIR")
                    .env("PANTRY_CACHE_DIR")
                    .help("Artifact cache directory"),
            ),
    )
    .subcommand(
        Command::new("inspect")
            .about("Validate the recipe and show metadata, requirements and identity"),
    )
    .subcommand(
        Command::new("completions")
            .about("Generate shell completion scripts")
            .arg(
                Arg::new("shell")
                    .required(true)
                    .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                    .help("Shell type"),
            ),
    )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    if let Err(e) = fs::write(man_dir.join("pantry.1"), buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
