// src/recipe/kitchen/mod.rs

//! Kitchen: the pipeline that cooks recipes
//!
//! The Kitchen pairs an immutable recipe with injected adapters for the
//! external build system and the dependency resolver, and runs the
//! lifecycle stages strictly in order:
//!
//! 1. **Layout**: resolve folder roles under the invocation root
//! 2. **Declare**: parse and check pinned requirements
//! 3. **Build**: run generators, then configure and compile
//! 4. **Test**: run the build system's test runner
//! 5. **Package**: copy headers, install, check identity, publish info
//!
//! Every stage blocks until it finishes. The first failure aborts the
//! remaining stages; nothing is retried.

mod assemble;
mod build_system;
mod config;
mod cook;
mod resolver;

pub use assemble::{ExportManifest, copy_headers, export_sources};
pub use build_system::{BuildSystem, Meson, StageContext};
pub use config::{CookResult, KitchenConfig};
pub use cook::{BUILD_MARKER, BuildMarker, Cook};
pub use resolver::{DependencyResolver, DirectoryResolver, NoopResolver, ResolvedDependency};

use crate::error::Result;
use crate::recipe::cache::PackageCache;
use crate::recipe::format::Recipe;
use crate::recipe::info::PackageInfo;
use crate::recipe::layout::FolderLayout;
use crate::recipe::settings::TargetSettings;
use std::sync::Arc;
use tracing::info;

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    build_system: Arc<dyn BuildSystem>,
    resolver: Arc<dyn DependencyResolver>,
}

impl Kitchen {
    /// Create a Kitchen driving Meson, with dependencies left to the system
    pub fn new(config: KitchenConfig) -> Self {
        let meson = Meson::new(config.meson.clone()).with_jobs(config.jobs);
        Self {
            config,
            build_system: Arc::new(meson),
            resolver: Arc::new(NoopResolver),
        }
    }

    /// Create a Kitchen with explicit adapters
    pub fn with_adapters(
        config: KitchenConfig,
        build_system: Arc<dyn BuildSystem>,
        resolver: Arc<dyn DependencyResolver>,
    ) -> Self {
        Self {
            config,
            build_system,
            resolver,
        }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    /// Set the dependency resolver
    pub fn set_resolver(&mut self, resolver: Arc<dyn DependencyResolver>) {
        self.resolver = resolver;
    }

    /// Kitchen configuration
    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Start a cook for one recipe and settings tuple
    ///
    /// Validates the recipe, resolves the layout and declares requirements.
    /// No external process is started.
    pub fn prepare<'a>(
        &'a self,
        recipe: &'a Recipe,
        settings: &'a TargetSettings,
    ) -> Result<Cook<'a>> {
        Cook::new(self, recipe, settings)
    }

    /// Resolve the folder layout
    pub fn resolve_layout(&self, recipe: &Recipe, settings: &TargetSettings) -> Result<FolderLayout> {
        FolderLayout::resolve(recipe, &self.config.root, settings)
    }

    /// Run the build stage on its own
    pub fn build(&self, recipe: &Recipe, settings: &TargetSettings) -> Result<()> {
        self.prepare(recipe, settings)?.build()
    }

    /// Run the test stage on its own
    pub fn test(&self, recipe: &Recipe, settings: &TargetSettings) -> Result<()> {
        self.prepare(recipe, settings)?.test()
    }

    /// Run the package stage on its own
    pub fn package(&self, recipe: &Recipe, settings: &TargetSettings) -> Result<PackageInfo> {
        self.prepare(recipe, settings)?.package()
    }

    /// Cook a recipe: the full pipeline
    ///
    /// With a cache configured, a hit for this package identity and the
    /// current recipe revision restores the package folder and skips every
    /// external stage. Otherwise the package is built, tested (unless
    /// disabled), assembled and then stored.
    pub fn cook(&self, recipe: &Recipe, settings: &TargetSettings) -> Result<CookResult> {
        info!("Cooking {} [{}]", recipe.reference(), settings);

        let mut cook = self.prepare(recipe, settings)?;
        let package_id = cook.package_id();

        let cache = match &self.config.cache_dir {
            Some(dir) => Some(PackageCache::new(dir)?),
            None => None,
        };

        // Hash the sources as they are now; a package built before an
        // edit lives under a different revision
        let revision = match &cache {
            Some(_) => Some(export_sources(recipe, &cook.layout)?.recipe_revision),
            None => None,
        };

        if let (Some(cache), Some(revision)) = (&cache, &revision)
            && let Some(entry) = cache.get(
                &recipe.package.name,
                &recipe.package.version,
                revision,
                &package_id,
            )?
        {
            let package_folder = cook.layout.package_folder();
            cache.restore(&entry, &package_folder)?;
            let info = PackageInfo::read(&package_folder)?;
            info!("Restored {} from cache", recipe.reference());
            return Ok(CookResult {
                layout: cook.layout.clone(),
                info,
                package_id,
                warnings: cook.warnings.clone(),
                tests_run: false,
                from_cache: true,
                cache_entry: Some(entry),
            });
        }

        cook.build()?;

        let tests_run = self.config.run_tests;
        if tests_run {
            cook.test()?;
        } else {
            info!("Skipping test stage");
        }

        let info = cook.package()?;

        let cache_entry = match &cache {
            Some(cache) => Some(cache.put(&info, settings, &cook.layout.package_folder())?),
            None => None,
        };

        info!("Cooked {} (package id {})", recipe.reference(), package_id);

        Ok(CookResult {
            layout: cook.layout.clone(),
            info,
            package_id,
            warnings: cook.warnings.clone(),
            tests_run,
            from_cache: false,
            cache_entry,
        })
    }
}
