// src/commands/cook.rs

//! Lifecycle commands - build, test, package and create

use super::Session;
use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use pantry::recipe::PackageCache;

/// Run the build stage
pub fn cmd_build(global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let kitchen = session.kitchen();

    println!(
        "Building {} [{}]",
        session.recipe.reference(),
        session.settings
    );
    kitchen
        .build(&session.recipe, &session.settings)
        .with_context(|| format!("Failed to build {}", session.recipe.package.name))?;

    println!("[OK] Build complete");
    Ok(())
}

/// Run the test stage
pub fn cmd_test(global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let kitchen = session.kitchen();

    println!("Testing {}", session.recipe.reference());
    kitchen
        .test(&session.recipe, &session.settings)
        .with_context(|| format!("Tests failed for {}", session.recipe.package.name))?;

    println!("[OK] Tests passed");
    Ok(())
}

/// Run the package stage
pub fn cmd_package(global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let kitchen = session.kitchen();

    let info = kitchen
        .package(&session.recipe, &session.settings)
        .with_context(|| format!("Failed to package {}", session.recipe.package.name))?;

    let layout = kitchen.resolve_layout(&session.recipe, &session.settings)?;
    println!("[OK] Packaged {}/{}", info.name, info.version);
    println!("  Package folder: {}", layout.package_folder().display());
    println!("  Package id: {}", info.package_id);
    Ok(())
}

/// Run the full pipeline
pub fn cmd_create(
    global: &GlobalArgs,
    skip_tests: bool,
    cache: bool,
    cache_dir: Option<std::path::PathBuf>,
) -> Result<()> {
    let mut session = Session::load(global)?;
    session.config.run_tests = !skip_tests;
    if cache {
        session.config.cache_dir = Some(cache_dir.unwrap_or_else(PackageCache::default_dir));
    }

    let kitchen = session.kitchen();
    println!(
        "Creating {} [{}] with {} parallel jobs...",
        session.recipe.reference(),
        session.settings,
        session.config.jobs
    );

    let result = kitchen
        .cook(&session.recipe, &session.settings)
        .with_context(|| format!("Failed to create {}", session.recipe.package.name))?;

    for warning in &result.warnings {
        println!("Warning: {}", warning);
    }

    println!();
    if result.from_cache {
        println!("[COMPLETE] Restored from cache");
    } else {
        println!("[COMPLETE] Package created");
    }
    println!("  Package folder: {}", result.layout.package_folder().display());
    println!("  Package id: {}", result.package_id);
    if !result.from_cache && !result.tests_run {
        println!("  Tests: skipped");
    }
    if let Some(entry) = &result.cache_entry {
        println!("  Cache: {} ({} bytes)", entry.archive_path.display(), entry.size);
    }

    Ok(())
}
