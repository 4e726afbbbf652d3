// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::recipe::cache::CacheEntry;
use crate::recipe::identity::PackageIdentity;
use crate::recipe::info::PackageInfo;
use crate::recipe::layout::FolderLayout;
use std::path::PathBuf;

/// Kitchen configuration
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Invocation root; layout paths resolve against it
    pub root: PathBuf,
    /// Explicit meson program (PATH lookup when unset)
    pub meson: Option<PathBuf>,
    /// Number of parallel compile jobs
    pub jobs: u32,
    /// Run the test stage during a full cook
    pub run_tests: bool,
    /// Artifact cache directory; caching is off when unset
    pub cache_dir: Option<PathBuf>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            root: PathBuf::from("."),
            meson: None,
            jobs,
            run_tests: true,
            cache_dir: None,
        }
    }
}

impl KitchenConfig {
    /// Configuration rooted at `root` with everything else defaulted
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Result of a full cook
#[derive(Debug)]
pub struct CookResult {
    /// Resolved folder layout
    pub layout: FolderLayout,
    /// Published package metadata
    pub info: PackageInfo,
    /// Identity the package is cached under
    pub package_id: PackageIdentity,
    /// Recipe and export warnings
    pub warnings: Vec<String>,
    /// Whether the test stage ran
    pub tests_run: bool,
    /// Package folder came from the cache instead of a build
    pub from_cache: bool,
    /// Cache entry, when caching is enabled
    pub cache_entry: Option<CacheEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KitchenConfig::default();
        assert!(config.jobs >= 1);
        assert!(config.run_tests);
        assert!(config.cache_dir.is_none());
        assert!(config.meson.is_none());
    }

    #[test]
    fn test_for_root() {
        let config = KitchenConfig::for_root("/work/forti-api");
        assert_eq!(config.root, PathBuf::from("/work/forti-api"));
        assert!(config.run_tests);
    }
}
