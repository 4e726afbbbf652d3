// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe how a native library is built,
//! tested and packaged. Everything except `[package]` is optional and
//! falls back to the conventional layout of a Meson-built header-only
//! library.

use crate::error::{Error, Result};
use crate::recipe::generators::Generator;
use crate::recipe::identity::IdentityPolicy;
use crate::recipe::settings::TargetSettings;
use serde::{Deserialize, Serialize};

/// A complete recipe for building and packaging a library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Settings, generators and exported sources
    #[serde(default)]
    pub build: BuildSection,

    /// Folder roles, relative to the invocation root
    #[serde(default)]
    pub layout: LayoutSection,

    /// Pinned external requirements
    #[serde(default)]
    pub requirements: RequirementsSection,

    /// Header copy rules for the package folder
    #[serde(default)]
    pub assemble: AssembleSection,

    /// Consumer-facing usage metadata
    #[serde(default)]
    pub info: InfoSection,

    /// Package identity policy
    #[serde(default)]
    pub identity: IdentitySection,
}

impl Recipe {
    /// `name/version` reference string
    pub fn reference(&self) -> String {
        format!("{}/{}", self.package.name, self.package.version)
    }

    /// The identity policy in effect
    ///
    /// An explicit `[identity] policy` wins. Otherwise a recipe that
    /// publishes no binary or library directories is header-only.
    pub fn identity_policy(&self) -> IdentityPolicy {
        match self.identity.policy {
            Some(policy) => policy,
            None if self.info.is_header_only() => IdentityPolicy::HeaderOnly,
            None => IdentityPolicy::PerSettings,
        }
    }

    /// Substitute `%(name)s` variables in a template
    ///
    /// Built-in variables are `name` and `version`; every target setting is
    /// available under its key. An unknown variable or an unterminated
    /// `%(` is an error rather than being left in place.
    pub fn substitute(&self, template: &str, settings: &TargetSettings) -> Result<String> {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("%(") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find(")s").ok_or_else(|| {
                Error::config(format!("Unterminated variable in '{}'", template))
            })?;
            let var = &after[..end];

            let value = match var {
                "name" => self.package.name.as_str(),
                "version" => self.package.version.as_str(),
                other => settings
                    .get(other)
                    .ok_or_else(|| Error::MissingVariable(format!("%({})s in '{}'", other, template)))?,
            };
            result.push_str(value);
            rest = &after[end + 2..];
        }

        result.push_str(rest);
        Ok(result)
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Author and contact
    #[serde(default)]
    pub author: Option<String>,

    /// Homepage or repository URL
    #[serde(default)]
    pub url: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Topic tags for package indexes
    #[serde(default)]
    pub topics: Vec<String>,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,
}

/// Build inputs section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Settings keys the recipe consumes (os, compiler, arch, build_type)
    #[serde(default)]
    pub settings: Vec<String>,

    /// Generators run before configure, in order
    #[serde(default)]
    pub generators: Vec<Generator>,

    /// Glob patterns for the sources that make up the recipe
    ///
    /// Example: `["meson.build", "include/*", "tests/*", "main.cpp"]`
    #[serde(default)]
    pub exports_sources: Vec<String>,
}

/// Folder role section
///
/// Paths may use `%(setting)s` variables, e.g. `build/%(build_type)s`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    /// Hand-authored sources
    #[serde(default = "default_source")]
    pub source: String,

    /// External build system tree
    #[serde(default = "default_build")]
    pub build: String,

    /// Machine-generated build inputs
    #[serde(default = "default_generators")]
    pub generators: String,

    /// Assembled package
    #[serde(default = "default_package")]
    pub package: String,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            build: default_build(),
            generators: default_generators(),
            package: default_package(),
        }
    }
}

fn default_source() -> String {
    ".".to_string()
}

fn default_build() -> String {
    "build/meson".to_string()
}

fn default_generators() -> String {
    "build/generators".to_string()
}

fn default_package() -> String {
    "build/package".to_string()
}

/// Requirements section
///
/// Entries use `name/version` references with exact versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsSection {
    /// Needed at build time and by consumers
    #[serde(default)]
    pub requires: Vec<String>,

    /// Needed only by the test stage
    #[serde(default)]
    pub test_requires: Vec<String>,
}

/// Header copy section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleSection {
    /// Glob patterns, matched against paths relative to the source folder
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,
}

impl Default for AssembleSection {
    fn default() -> Self {
        Self {
            headers: default_headers(),
        }
    }
}

fn default_headers() -> Vec<String> {
    vec!["*.hpp".to_string()]
}

/// Usage metadata section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoSection {
    /// Include directories, relative to the package folder
    #[serde(default = "default_includedirs")]
    pub includedirs: Vec<String>,

    /// Binary directories (empty for header-only packages)
    #[serde(default)]
    pub bindirs: Vec<String>,

    /// Library directories (empty for header-only packages)
    #[serde(default)]
    pub libdirs: Vec<String>,
}

impl InfoSection {
    /// No linkable binary is published
    pub fn is_header_only(&self) -> bool {
        self.bindirs.is_empty() && self.libdirs.is_empty()
    }
}

impl Default for InfoSection {
    fn default() -> Self {
        Self {
            includedirs: default_includedirs(),
            bindirs: Vec::new(),
            libdirs: Vec::new(),
        }
    }
}

fn default_includedirs() -> Vec<String> {
    vec!["include".to_string()]
}

/// Identity section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentitySection {
    /// Explicit policy; derived from `[info]` when absent
    #[serde(default)]
    pub policy: Option<IdentityPolicy>,
}
