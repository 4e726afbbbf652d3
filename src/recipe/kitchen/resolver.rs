// src/recipe/kitchen/resolver.rs

//! Dependency resolution for recipe builds

use crate::error::{Error, Result};
use crate::recipe::info::{INFO_FILE, PackageInfo};
use crate::recipe::requirements::Requirement;
use crate::recipe::settings::TargetSettings;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A requirement located on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub requirement: Requirement,
    /// Root of the dependency's package folder
    pub prefix: PathBuf,
    /// Absolute include directories
    pub includedirs: Vec<PathBuf>,
    /// Absolute library directories
    pub libdirs: Vec<PathBuf>,
}

/// Trait for locating pinned requirements before configure
///
/// This keeps the Kitchen decoupled from wherever dependencies actually
/// live. A resolver returns `None` when the build system is expected to
/// find the dependency on its own.
pub trait DependencyResolver: Send + Sync {
    /// Locate one requirement for the given settings
    fn resolve(
        &self,
        requirement: &Requirement,
        settings: &TargetSettings,
    ) -> Result<Option<ResolvedDependency>>;
}

/// A resolver that leaves every dependency to the system
///
/// Use this when dependencies are installed system-wide and the build
/// system discovers them through its usual search paths.
pub struct NoopResolver;

impl DependencyResolver for NoopResolver {
    fn resolve(
        &self,
        _requirement: &Requirement,
        _settings: &TargetSettings,
    ) -> Result<Option<ResolvedDependency>> {
        Ok(None)
    }
}

/// Resolves requirements from a directory of unpacked packages
///
/// Expects `<root>/<name>/<version>/`, optionally holding a published
/// `pantry-info.json` describing its include and library directories.
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DependencyResolver for DirectoryResolver {
    fn resolve(
        &self,
        requirement: &Requirement,
        _settings: &TargetSettings,
    ) -> Result<Option<ResolvedDependency>> {
        let prefix = self
            .root
            .join(&requirement.name)
            .join(&requirement.version);
        if !prefix.is_dir() {
            return Err(Error::config(format!(
                "Requirement {} not found under {}",
                requirement.reference(),
                self.root.display()
            )));
        }

        let (includedirs, libdirs) = if prefix.join(INFO_FILE).exists() {
            let info = PackageInfo::read(&prefix)?;
            (
                info.cpp_info.includedirs.iter().map(|d| prefix.join(d)).collect(),
                info.cpp_info.libdirs.iter().map(|d| prefix.join(d)).collect(),
            )
        } else {
            let lib = prefix.join("lib");
            let libdirs = if lib.is_dir() { vec![lib] } else { Vec::new() };
            (vec![prefix.join("include")], libdirs)
        };

        debug!(
            "Resolved {} at {}",
            requirement.reference(),
            prefix.display()
        );

        Ok(Some(ResolvedDependency {
            requirement: requirement.clone(),
            prefix,
            includedirs,
            libdirs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn req(reference: &str) -> Requirement {
        Requirement::parse(reference, false).unwrap()
    }

    #[test]
    fn test_noop_resolver() {
        let resolver = NoopResolver;
        assert!(resolver
            .resolve(&req("libcurl/8.9.1"), &TargetSettings::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_directory_resolver_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("nlohmann_json/3.11.3");
        fs::create_dir_all(prefix.join("include")).unwrap();

        let resolver = DirectoryResolver::new(dir.path());
        let dep = resolver
            .resolve(&req("nlohmann_json/3.11.3"), &TargetSettings::new())
            .unwrap()
            .unwrap();
        assert_eq!(dep.prefix, prefix);
        assert_eq!(dep.includedirs, vec![prefix.join("include")]);
        assert!(dep.libdirs.is_empty());
    }

    #[test]
    fn test_directory_resolver_reads_info() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("libcurl/8.9.1");
        fs::create_dir_all(&prefix).unwrap();
        fs::write(
            prefix.join(INFO_FILE),
            r#"{
  "name": "libcurl",
  "version": "8.9.1",
  "cpp_info": {"includedirs": ["inc"], "bindirs": [], "libdirs": ["lib64"]},
  "package_id": "0123456789abcdef0123456789abcdef01234567"
}"#,
        )
        .unwrap();

        let dep = DirectoryResolver::new(dir.path())
            .resolve(&req("libcurl/8.9.1"), &TargetSettings::new())
            .unwrap()
            .unwrap();
        assert_eq!(dep.includedirs, vec![prefix.join("inc")]);
        assert_eq!(dep.libdirs, vec![prefix.join("lib64")]);
    }

    #[test]
    fn test_directory_resolver_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirectoryResolver::new(dir.path())
            .resolve(&req("gtest/1.14.0"), &TargetSettings::new())
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("gtest/1.14.0"));
    }
}
