// src/recipe/kitchen/assemble.rs

//! Source-tree walks: header copy and export manifest

use crate::error::{Error, Result};
use crate::hash::{Hasher, hash_file};
use crate::recipe::format::Recipe;
use crate::recipe::layout::FolderLayout;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::cook::BUILD_MARKER;

/// Files exported with a recipe and the revision they hash to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportManifest {
    /// Source-relative paths, sorted
    pub files: Vec<String>,
    /// SHA-256 over paths and contents
    pub recipe_revision: String,
    /// Patterns that matched nothing
    pub warnings: Vec<String>,
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::config(format!("Invalid pattern '{}': {}", p, e)))
        })
        .collect()
}

/// A configured build tree, possibly one left by other settings
fn is_build_tree(dir: &Path) -> bool {
    dir.join("meson-private").is_dir() || dir.join(BUILD_MARKER).is_file()
}

/// Regular files under the source folder, skipping generated folders
///
/// Besides this layout's own generated folders, any directory holding a
/// configured build tree is skipped.
///
/// Returns `(relative path with '/' separators, absolute path)` pairs in
/// sorted order.
fn source_files(layout: &FolderLayout) -> Result<Vec<(String, PathBuf)>> {
    let source = layout.source_folder();
    let skip = layout.generated_within_source();
    let mut files = Vec::new();

    let walker = WalkDir::new(&source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if skip.iter().any(|s| e.path() == s.as_path()) {
                return false;
            }
            !(e.depth() > 0 && e.file_type().is_dir() && is_build_tree(e.path()))
        });

    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&source)
            .map_err(|e| Error::InvalidPath(e.to_string()))?;
        let rel_str = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((rel_str, entry.path().to_path_buf()));
    }

    Ok(files)
}

/// Copy public headers from the source folder into the package folder
///
/// Relative paths are preserved and directories created as needed. Files
/// already in the package folder are overwritten on collision and otherwise
/// left alone. Returns the copied relative paths.
pub fn copy_headers(layout: &FolderLayout, patterns: &[String]) -> Result<Vec<String>> {
    let patterns = compile_patterns(patterns)?;
    let package = layout.package_folder();
    let mut copied = Vec::new();

    for (rel, path) in source_files(layout)? {
        if !patterns.iter().any(|p| p.matches(&rel)) {
            continue;
        }
        let dest = package.join(&rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&path, &dest)?;
        debug!("Copied header {}", rel);
        copied.push(rel);
    }

    info!(
        "Copied {} header(s) into {}",
        copied.len(),
        package.display()
    );
    Ok(copied)
}

/// Collect the recipe's exported sources and hash them into a revision
///
/// Header files picked up by the recipe's header patterns also feed the
/// revision, so editing a packaged header always changes it.
pub fn export_sources(recipe: &Recipe, layout: &FolderLayout) -> Result<ExportManifest> {
    let raw = &recipe.build.exports_sources;
    let patterns = compile_patterns(raw)?;
    let headers = compile_patterns(&recipe.assemble.headers)?;
    let mut matched = vec![false; patterns.len()];
    let mut hasher = Hasher::new();
    let mut files = Vec::new();

    hasher.field("recipe", &recipe.reference());

    for (rel, path) in source_files(layout)? {
        let mut hit = false;
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.matches(&rel) {
                matched[i] = true;
                hit = true;
            }
        }
        if hit {
            hasher.field("path", &rel);
            hasher.field("sha256", &hash_file(&path)?);
            files.push(rel);
        } else if headers.iter().any(|p| p.matches(&rel)) {
            hasher.field("header", &rel);
            hasher.field("sha256", &hash_file(&path)?);
        }
    }

    let warnings = raw
        .iter()
        .zip(&matched)
        .filter(|(_, hit)| !**hit)
        .map(|(p, _)| format!("exports_sources pattern '{}' matched no files", p))
        .collect();

    Ok(ExportManifest {
        files,
        recipe_revision: hasher.finalize(),
        warnings,
    })
}
