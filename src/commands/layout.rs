// src/commands/layout.rs

//! Layout command - show where each folder role lives

use super::Session;
use crate::cli::GlobalArgs;
use anyhow::{Context, Result};

pub fn cmd_layout(global: &GlobalArgs) -> Result<()> {
    let session = Session::load(global)?;
    let layout = session
        .kitchen()
        .resolve_layout(&session.recipe, &session.settings)
        .context("Failed to resolve folder layout")?;

    println!("Layout for {}:", session.recipe.reference());
    println!("  source:     {}", layout.source_folder().display());
    println!("  build:      {}", layout.build_folder().display());
    println!("  generators: {}", layout.generators_folder().display());
    println!("  package:    {}", layout.package_folder().display());
    Ok(())
}
