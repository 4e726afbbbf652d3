// src/commands/inspect.rs

//! Inspect command - validate a recipe and show what it resolves to

use super::Session;
use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use pantry::recipe::{PackageIdentity, RequirementSet, validate_recipe};

pub fn cmd_inspect(global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let recipe = &session.recipe;
    let pkg = &recipe.package;

    let warnings = validate_recipe(recipe).context("Recipe validation failed")?;
    let requirements = RequirementSet::declare(recipe)?;
    let id = PackageIdentity::compute(recipe, &session.settings);

    println!("Recipe: {} version {}", pkg.name, pkg.version);
    if let Some(description) = &pkg.description {
        println!("  Description: {}", description);
    }
    if let Some(author) = &pkg.author {
        println!("  Author: {}", author);
    }
    if !pkg.topics.is_empty() {
        println!("  Topics: {}", pkg.topics.join(", "));
    }
    let generators: Vec<String> = recipe.build.generators.iter().map(|g| g.to_string()).collect();
    if !generators.is_empty() {
        println!("  Generators: {}", generators.join(", "));
    }

    println!("Requirements:");
    for req in requirements.runtime_graph() {
        println!("  {}", req);
    }
    for req in requirements.test_graph() {
        println!("  {}", req);
    }

    println!("Identity:");
    println!("  Policy: {}", recipe.identity_policy());
    println!("  Settings: {}", session.settings);
    println!("  Package id: {}", id);

    for warning in &warnings {
        println!("Warning: {}", warning);
    }
    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }
    Ok(())
}
