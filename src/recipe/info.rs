// src/recipe/info.rs

//! Consumer-facing package metadata
//!
//! Written as `pantry-info.json` at the root of the package folder. Empty
//! `bindirs`/`libdirs` mean "header-only", never "unknown".

use crate::error::Result;
use crate::recipe::format::{InfoSection, Recipe};
use crate::recipe::identity::PackageIdentity;
use crate::recipe::requirements::RequirementSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the published metadata
pub const INFO_FILE: &str = "pantry-info.json";

/// Include and link paths, relative to the package folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppInfo {
    pub includedirs: Vec<String>,
    pub bindirs: Vec<String>,
    pub libdirs: Vec<String>,
}

impl From<&InfoSection> for CppInfo {
    fn from(info: &InfoSection) -> Self {
        Self {
            includedirs: info.includedirs.clone(),
            bindirs: info.bindirs.clone(),
            libdirs: info.libdirs.clone(),
        }
    }
}

/// Published package metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Runtime requirements as `name/version`
    #[serde(default)]
    pub requires: Vec<String>,
    pub cpp_info: CppInfo,
    pub package_id: PackageIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_revision: Option<String>,
}

impl PackageInfo {
    /// Assemble the metadata for a recipe
    ///
    /// Only the runtime graph is listed; test-only requirements stay private
    /// to this package's own test stage.
    pub fn from_recipe(
        recipe: &Recipe,
        requirements: &RequirementSet,
        package_id: PackageIdentity,
        recipe_revision: Option<String>,
    ) -> Self {
        let pkg = &recipe.package;
        Self {
            name: pkg.name.clone(),
            version: pkg.version.clone(),
            author: pkg.author.clone(),
            url: pkg.url.clone(),
            description: pkg.description.clone(),
            topics: pkg.topics.clone(),
            requires: requirements
                .runtime_graph()
                .iter()
                .map(|r| r.reference())
                .collect(),
            cpp_info: CppInfo::from(&recipe.info),
            package_id,
            recipe_revision,
        }
    }

    /// No linkable binary is published
    pub fn is_header_only(&self) -> bool {
        self.cpp_info.bindirs.is_empty() && self.cpp_info.libdirs.is_empty()
    }

    /// Write to `<package_folder>/pantry-info.json`
    pub fn publish(&self, package_folder: &Path) -> Result<PathBuf> {
        fs::create_dir_all(package_folder)?;
        let path = package_folder.join(INFO_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        debug!("Published package info to {}", path.display());
        Ok(path)
    }

    /// Read published metadata from a package folder
    pub fn read(package_folder: &Path) -> Result<Self> {
        let content = fs::read_to_string(package_folder.join(INFO_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::parse_recipe;
    use crate::recipe::settings::TargetSettings;

    fn recipe() -> Recipe {
        parse_recipe(
            r#"
[package]
name = "forti-api"
version = "0.2.2"
description = "FortiGate API interface"
topics = ["c++", "security"]

[requirements]
requires = ["nlohmann_json/3.11.3", "libcurl/8.9.1"]
test_requires = ["gtest/1.14.0"]
"#,
        )
        .unwrap()
    }

    fn info_for(recipe: &Recipe) -> PackageInfo {
        let reqs = RequirementSet::declare(recipe).unwrap();
        let id = PackageIdentity::compute(recipe, &TargetSettings::new());
        PackageInfo::from_recipe(recipe, &reqs, id, Some("abc".to_string()))
    }

    #[test]
    fn test_requires_excludes_test_only() {
        let info = info_for(&recipe());
        assert_eq!(info.requires, vec!["nlohmann_json/3.11.3", "libcurl/8.9.1"]);
        assert!(!info.requires.iter().any(|r| r.starts_with("gtest")));
    }

    #[test]
    fn test_header_only_layout() {
        let info = info_for(&recipe());
        assert_eq!(info.cpp_info.includedirs, vec!["include"]);
        assert!(info.cpp_info.bindirs.is_empty());
        assert!(info.cpp_info.libdirs.is_empty());
        assert!(info.is_header_only());
    }

    #[test]
    fn test_publish_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let info = info_for(&recipe());
        let path = info.publish(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(INFO_FILE));

        let raw = fs::read_to_string(&path).unwrap();
        // Empty lists are written out, not omitted
        assert!(raw.contains("\"bindirs\": []"));
        assert!(raw.contains("\"libdirs\": []"));

        assert_eq!(PackageInfo::read(dir.path()).unwrap(), info);
    }
}
