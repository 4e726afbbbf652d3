// src/recipe/identity.rs

//! Package identity
//!
//! The identity decides which cached artifact a settings tuple may reuse.
//! A header-only package produces the same bytes for every target, so its
//! identity ignores settings entirely. Anything that ships binaries must
//! keep its settings in the identity, otherwise one platform's libraries
//! would be served to another.

use crate::error::{Error, Result};
use crate::hash::Hasher;
use crate::recipe::format::Recipe;
use crate::recipe::settings::TargetSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions treated as linkable or executable binaries
const BINARY_EXTENSIONS: &[&str] = &["a", "so", "dylib", "dll", "lib", "exe"];

/// Top-level package folder whose direct children are executables
const EXECUTABLE_DIR: &str = "bin";

/// Length of the hex identity
const IDENTITY_LEN: usize = 40;

/// How target settings feed the package identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityPolicy {
    /// All settings collapse to one identity
    HeaderOnly,
    /// Declared settings keys are part of the identity
    PerSettings,
}

impl fmt::Display for IdentityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderOnly => write!(f, "header-only"),
            Self::PerSettings => write!(f, "per-settings"),
        }
    }
}

/// Canonical package identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageIdentity(String);

impl PackageIdentity {
    /// Compute the identity of `recipe` built for `settings`
    pub fn compute(recipe: &Recipe, settings: &TargetSettings) -> Self {
        Self::compute_with(recipe, recipe.identity_policy(), settings)
    }

    /// Compute the identity under an explicit policy
    pub fn compute_with(recipe: &Recipe, policy: IdentityPolicy, settings: &TargetSettings) -> Self {
        let mut hasher = Hasher::new();
        hasher.field("name", &recipe.package.name);
        hasher.field("version", &recipe.package.version);
        hasher.field("policy", &policy.to_string());

        if policy == IdentityPolicy::PerSettings {
            let mut keys: Vec<&str> = recipe.build.settings.iter().map(String::as_str).collect();
            keys.sort_unstable();
            keys.dedup();
            for key in keys {
                hasher.field(key, settings.get(key).unwrap_or("<absent>"));
            }
        }

        let mut digest = hasher.finalize();
        digest.truncate(IDENTITY_LEN);
        Self(digest)
    }

    /// Wrap an identity read back from disk
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != IDENTITY_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::config(format!("Invalid package identity '{}'", hex)));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Hex form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find linkable binaries in an assembled package folder
///
/// Returns paths relative to `package_folder`.
pub fn find_binaries(package_folder: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if !package_folder.exists() {
        return Ok(found);
    }

    for entry in WalkDir::new(package_folder).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(package_folder)
            .unwrap_or(entry.path())
            .to_path_buf();

        // lib/ also holds pkgconfig and cmake metadata, so only the file
        // extension decides there
        let in_bin_dir = rel.components().count() == 2
            && rel
                .components()
                .next()
                .is_some_and(|c| c.as_os_str() == EXECUTABLE_DIR);
        let binary_ext = rel
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext));
        // Versioned shared objects like libfoo.so.1.2
        let versioned_so = rel
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(".so."));

        if in_bin_dir || binary_ext || versioned_so {
            found.push(rel);
        }
    }

    Ok(found)
}

/// Fail if a header-only package folder contains binaries
pub fn ensure_header_only(package_folder: &Path) -> Result<()> {
    let binaries = find_binaries(package_folder)?;
    if binaries.is_empty() {
        return Ok(());
    }

    let listed: Vec<String> = binaries
        .iter()
        .take(5)
        .map(|p| p.display().to_string())
        .collect();
    Err(Error::config(format!(
        "Package uses the header-only identity policy but install produced binaries: {}{}",
        listed.join(", "),
        if binaries.len() > 5 { ", ..." } else { "" }
    )))
}
