// src/commands/mod.rs
//! Command handlers for the pantry CLI

mod completions;
mod cook;
mod inspect;
mod layout;

pub use completions::cmd_completions;
pub use cook::{cmd_build, cmd_create, cmd_package, cmd_test};
pub use inspect::cmd_inspect;
pub use layout::cmd_layout;

use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use pantry::recipe::{
    DirectoryResolver, Kitchen, KitchenConfig, RECIPE_FILE, Recipe, TargetSettings,
    parse_recipe_file,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Everything a lifecycle command needs
pub struct Session {
    pub recipe: Recipe,
    pub settings: TargetSettings,
    pub config: KitchenConfig,
    deps_root: Option<PathBuf>,
}

impl Session {
    /// Load the recipe and settings named by the global flags
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let recipe_path = global
            .recipe
            .clone()
            .unwrap_or_else(|| global.root.join(RECIPE_FILE));
        let recipe = parse_recipe_file(&recipe_path)
            .with_context(|| format!("Failed to parse recipe: {}", recipe_path.display()))?;

        let settings = TargetSettings::detect_host()
            .with_overrides(&global.settings)
            .context("Invalid --setting")?;
        debug!("Settings: {}", settings);

        let mut config = KitchenConfig::for_root(&global.root);
        config.meson = global.meson.clone();
        if let Some(jobs) = global.jobs {
            config.jobs = jobs;
        }

        Ok(Self {
            recipe,
            settings,
            config,
            deps_root: global.deps_root.clone(),
        })
    }

    /// Build the Kitchen for this session
    pub fn kitchen(&self) -> Kitchen {
        let mut kitchen = Kitchen::new(self.config.clone());
        if let Some(root) = &self.deps_root {
            kitchen.set_resolver(Arc::new(DirectoryResolver::new(root)));
        }
        kitchen
    }
}
