// src/recipe/cache.rs

//! Package artifact cache
//!
//! Assembled package folders are stored as gzip'd tarballs keyed by
//! `name/version/recipe_revision/package_id`. Every settings tuple that maps
//! to the same package identity shares one entry, which is the whole point
//! of the header-only collapse. The revision keeps an edited source tree
//! from being served a package built before the edit.
//!
//! Layout on disk:
//!
//! ```text
//! <cache_dir>/<name>/<version>/<revision>/<package_id>.tar.gz
//! <cache_dir>/<name>/<version>/<revision>/<package_id>.meta
//! ```

use crate::error::{Error, Result};
use crate::recipe::identity::PackageIdentity;
use crate::recipe::info::PackageInfo;
use crate::recipe::settings::TargetSettings;
use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Sidecar metadata stored next to each archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub name: String,
    pub version: String,
    pub package_id: PackageIdentity,
    pub recipe_revision: String,
    /// Settings of the build that populated the entry
    pub settings: TargetSettings,
    pub stored_at: DateTime<Utc>,
}

/// A cached package
#[derive(Debug)]
pub struct CacheEntry {
    /// Path to the archive
    pub archive_path: PathBuf,
    /// Identity the entry is stored under
    pub package_id: PackageIdentity,
    /// When the archive was written
    pub created: SystemTime,
    /// Archive size in bytes
    pub size: u64,
    /// Sidecar metadata, if readable
    pub meta: Option<CacheMeta>,
}

/// Package artifact cache rooted at one directory
#[derive(Debug, Clone)]
pub struct PackageCache {
    cache_dir: PathBuf,
}

impl PackageCache {
    /// Open a cache, creating its directory
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Per-user default location
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("pantry")
            .join("packages")
    }

    /// Cache root
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_dir(&self, name: &str, version: &str, revision: &str) -> PathBuf {
        self.cache_dir.join(name).join(version).join(revision)
    }

    fn archive_path(
        &self,
        name: &str,
        version: &str,
        revision: &str,
        id: &PackageIdentity,
    ) -> PathBuf {
        self.entry_dir(name, version, revision)
            .join(format!("{}.tar.gz", id))
    }

    fn meta_path(&self, name: &str, version: &str, revision: &str, id: &PackageIdentity) -> PathBuf {
        self.entry_dir(name, version, revision)
            .join(format!("{}.meta", id))
    }

    /// Look up a cached package built from `revision`
    pub fn get(
        &self,
        name: &str,
        version: &str,
        revision: &str,
        id: &PackageIdentity,
    ) -> Result<Option<CacheEntry>> {
        let archive_path = self.archive_path(name, version, revision, id);
        if !archive_path.exists() {
            debug!("Cache miss: {}/{}#{}:{}", name, version, revision, id);
            return Ok(None);
        }

        let metadata = fs::metadata(&archive_path)?;
        if metadata.len() == 0 {
            warn!("Cache corruption detected: {}/{}#{}:{}", name, version, revision, id);
            self.remove(name, version, revision, id)?;
            return Ok(None);
        }

        let meta_path = self.meta_path(name, version, revision, id);
        let meta = match fs::read_to_string(&meta_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    warn!("Ignoring corrupt cache metadata {}: {}", meta_path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Cannot read cache metadata {}: {}", meta_path.display(), e);
                None
            }
        };

        info!("Cache hit: {}/{}:{} ({} bytes)", name, version, id, metadata.len());

        Ok(Some(CacheEntry {
            archive_path,
            package_id: id.clone(),
            created: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            size: metadata.len(),
            meta,
        }))
    }

    /// Store an assembled package folder
    pub fn put(
        &self,
        info: &PackageInfo,
        settings: &TargetSettings,
        package_folder: &Path,
    ) -> Result<CacheEntry> {
        let id = &info.package_id;
        let revision = info.recipe_revision.as_deref().ok_or_else(|| {
            Error::config(format!(
                "Cannot cache {}/{}: package info has no recipe revision",
                info.name, info.version
            ))
        })?;
        let archive_path = self.archive_path(&info.name, &info.version, revision, id);
        if let Some(parent) = archive_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a temporary name first so a crash never leaves a
        // truncated archive under the real key
        let tmp_path = archive_path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let encoder = GzEncoder::new(file, Compression::default());
            let mut builder = tar::Builder::new(encoder);
            builder.follow_symlinks(false);
            builder.append_dir_all(".", package_folder)?;
            builder.into_inner()?.finish()?;
        }
        fs::rename(&tmp_path, &archive_path)?;

        let meta = CacheMeta {
            name: info.name.clone(),
            version: info.version.clone(),
            package_id: id.clone(),
            recipe_revision: revision.to_string(),
            settings: settings.clone(),
            stored_at: Utc::now(),
        };
        fs::write(
            self.meta_path(&info.name, &info.version, revision, id),
            serde_json::to_string_pretty(&meta)?,
        )?;

        let metadata = fs::metadata(&archive_path)?;
        info!(
            "Cached: {}/{} as {} ({} bytes)",
            info.name,
            info.version,
            id,
            metadata.len()
        );

        Ok(CacheEntry {
            archive_path,
            package_id: id.clone(),
            created: metadata.modified().unwrap_or_else(|_| SystemTime::now()),
            size: metadata.len(),
            meta: Some(meta),
        })
    }

    /// Unpack a cached package into `dest`
    ///
    /// Existing files in `dest` are overwritten but never deleted.
    pub fn restore(&self, entry: &CacheEntry, dest: &Path) -> Result<()> {
        fs::create_dir_all(dest)?;
        let file = File::open(&entry.archive_path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive.unpack(dest)?;
        debug!(
            "Restored {} into {}",
            entry.archive_path.display(),
            dest.display()
        );
        Ok(())
    }

    /// Drop an entry and its sidecar
    pub fn remove(
        &self,
        name: &str,
        version: &str,
        revision: &str,
        id: &PackageIdentity,
    ) -> Result<()> {
        for path in [
            self.archive_path(name, version, revision, id),
            self.meta_path(name, version, revision, id),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
