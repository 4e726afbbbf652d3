// src/recipe/kitchen/cook.rs

//! Cook: stage execution for a single recipe

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::generators::run_generators;
use crate::recipe::identity::{IdentityPolicy, PackageIdentity, ensure_header_only};
use crate::recipe::info::PackageInfo;
use crate::recipe::layout::FolderLayout;
use crate::recipe::parser::validate_recipe;
use crate::recipe::requirements::RequirementSet;
use crate::recipe::settings::TargetSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::Kitchen;
use super::assemble::{copy_headers, export_sources};
use super::build_system::StageContext;
use super::resolver::ResolvedDependency;

/// Marker written into the build folder after a successful build
pub const BUILD_MARKER: &str = ".pantry-build";

/// Contents of the build marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMarker {
    pub name: String,
    pub version: String,
    pub settings: TargetSettings,
    pub finished_at: DateTime<Utc>,
}

/// A single cook operation
///
/// Holds the immutable recipe and settings for one invocation together with
/// the values derived from them up front: the folder layout and the declared
/// requirements. Both are computed before any stage runs, so a bad layout or
/// requirement never reaches the external build system.
pub struct Cook<'a> {
    pub(super) kitchen: &'a Kitchen,
    pub(super) recipe: &'a Recipe,
    pub(super) settings: &'a TargetSettings,
    pub(super) layout: FolderLayout,
    pub(super) requirements: RequirementSet,
    /// Warnings
    pub(super) warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    pub(super) fn new(
        kitchen: &'a Kitchen,
        recipe: &'a Recipe,
        settings: &'a TargetSettings,
    ) -> Result<Self> {
        let warnings = validate_recipe(recipe)?;
        for warning in &warnings {
            warn!("{}: {}", recipe.reference(), warning);
        }

        let layout = FolderLayout::resolve(recipe, &kitchen.config.root, settings)?;
        let requirements = RequirementSet::declare(recipe)?;

        Ok(Self {
            kitchen,
            recipe,
            settings,
            layout,
            requirements,
            warnings,
        })
    }

    /// Resolved folder layout
    pub fn layout(&self) -> &FolderLayout {
        &self.layout
    }

    /// Declared requirements
    pub fn requirements(&self) -> &RequirementSet {
        &self.requirements
    }

    /// Warnings gathered so far
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Identity of the package for this invocation's settings
    pub fn package_id(&self) -> PackageIdentity {
        PackageIdentity::compute(self.recipe, self.settings)
    }

    fn context(&self) -> StageContext<'_> {
        StageContext {
            recipe: self.recipe,
            layout: &self.layout,
            settings: self.settings,
        }
    }

    fn marker_path(&self) -> PathBuf {
        self.layout.build_folder().join(BUILD_MARKER)
    }

    fn remove_marker(&self) -> Result<()> {
        match fs::remove_file(self.marker_path()) {
            Ok(()) => {
                debug!("Removed stale build marker");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_marker(&self) -> Result<()> {
        let marker = BuildMarker {
            name: self.recipe.package.name.clone(),
            version: self.recipe.package.version.clone(),
            settings: self.settings.clone(),
            finished_at: Utc::now(),
        };
        fs::create_dir_all(self.layout.build_folder())?;
        fs::write(self.marker_path(), serde_json::to_string_pretty(&marker)?)?;
        Ok(())
    }

    /// Check that a successful build for these settings exists
    pub fn require_build(&self, stage: &str) -> Result<BuildMarker> {
        let path = self.marker_path();
        let content = fs::read_to_string(&path).map_err(|_| {
            Error::config(format!(
                "Cannot run {} stage: no successful build in {}",
                stage,
                self.layout.build_folder().display()
            ))
        })?;
        let marker: BuildMarker = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("Corrupt build marker {}: {}", path.display(), e))
        })?;

        if marker.name != self.recipe.package.name || marker.version != self.recipe.package.version
        {
            return Err(Error::config(format!(
                "Cannot run {} stage: build folder holds {}/{}, not {}",
                stage,
                marker.name,
                marker.version,
                self.recipe.reference()
            )));
        }
        if marker.settings != *self.settings {
            return Err(Error::config(format!(
                "Cannot run {} stage: build folder was built for [{}], not [{}]",
                stage, marker.settings, self.settings
            )));
        }

        Ok(marker)
    }

    /// Locate every requirement in the build graph
    pub fn resolve_dependencies(&self) -> Result<Vec<ResolvedDependency>> {
        let mut resolved = Vec::new();
        for requirement in self.requirements.build_graph() {
            match self.kitchen.resolver.resolve(requirement, self.settings)? {
                Some(dep) => resolved.push(dep),
                None => debug!("{} left to the build system", requirement),
            }
        }
        Ok(resolved)
    }

    /// Build stage: generate, configure, then compile
    pub fn build(&self) -> Result<()> {
        info!("Building {}", self.recipe.reference());

        // Any earlier marker is stale from here on; a failure below must
        // leave test and package unable to run
        self.remove_marker()?;

        let deps = self.resolve_dependencies()?;
        let written = run_generators(
            &self.recipe.build.generators,
            &self.layout,
            self.settings,
            &deps,
        )?;
        debug!("Generators wrote {} file(s)", written.len());

        let ctx = self.context();
        let build_system = &self.kitchen.build_system;
        build_system.configure(&ctx)?;
        build_system.build(&ctx)?;

        self.write_marker()?;
        info!("Built {}", self.recipe.reference());
        Ok(())
    }

    /// Test stage
    ///
    /// A failure is returned as-is; the build folder and marker are left
    /// untouched so the stage can simply be rerun.
    pub fn test(&self) -> Result<()> {
        self.require_build("test")?;
        info!("Testing {}", self.recipe.reference());
        self.kitchen.build_system.test(&self.context())
    }

    /// Package stage: copy headers, install, check identity, publish info
    pub fn package(&mut self) -> Result<PackageInfo> {
        self.require_build("package")?;
        info!("Packaging {}", self.recipe.reference());

        let package_folder = self.layout.package_folder();
        fs::create_dir_all(&package_folder)?;

        // Headers first so install-time files win on collision
        copy_headers(&self.layout, &self.recipe.assemble.headers)?;
        self.kitchen.build_system.install(&self.context())?;

        if self.recipe.identity_policy() == IdentityPolicy::HeaderOnly {
            ensure_header_only(&package_folder)?;
        }

        let manifest = export_sources(self.recipe, &self.layout)?;
        for warning in &manifest.warnings {
            warn!("{}: {}", self.recipe.reference(), warning);
        }
        self.warnings.extend(manifest.warnings);

        let info = PackageInfo::from_recipe(
            self.recipe,
            &self.requirements,
            self.package_id(),
            Some(manifest.recipe_revision),
        );
        info.publish(&package_folder)?;

        info!(
            "Packaged {} into {} (package id {})",
            self.recipe.reference(),
            package_folder.display(),
            info.package_id
        );
        Ok(info)
    }
}
