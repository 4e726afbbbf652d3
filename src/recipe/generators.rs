// src/recipe/generators.rs

//! Build-input generators
//!
//! Generators run as the first half of configure and write their files into
//! the generators folder. They never start an external process.

use crate::error::{Error, Result};
use crate::recipe::kitchen::ResolvedDependency;
use crate::recipe::layout::FolderLayout;
use crate::recipe::settings::TargetSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the Meson native file written by [`Generator::MesonToolchain`]
pub const MESON_NATIVE_FILE: &str = "pantry_meson_native.ini";

/// Recognized generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Generator {
    /// One pkg-config file per resolved dependency
    PkgConfigDeps,
    /// Meson native file carrying compiler and build type
    MesonToolchain,
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PkgConfigDeps => write!(f, "PkgConfigDeps"),
            Self::MesonToolchain => write!(f, "MesonToolchain"),
        }
    }
}

impl Generator {
    /// Write this generator's files and return their paths
    pub fn generate(
        &self,
        layout: &FolderLayout,
        settings: &TargetSettings,
        deps: &[ResolvedDependency],
    ) -> Result<Vec<PathBuf>> {
        let out_dir = layout.generators_folder();
        fs::create_dir_all(&out_dir)?;

        match self {
            Self::PkgConfigDeps => write_pkg_config(&out_dir, deps),
            Self::MesonToolchain => write_meson_native(&out_dir, settings).map(|p| vec![p]),
        }
    }
}

/// Run generators in declaration order
pub fn run_generators(
    generators: &[Generator],
    layout: &FolderLayout,
    settings: &TargetSettings,
    deps: &[ResolvedDependency],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for generator in generators {
        let files = generator.generate(layout, settings, deps)?;
        debug!("{} wrote {} file(s)", generator, files.len());
        written.extend(files);
    }
    Ok(written)
}

fn write_pkg_config(out_dir: &Path, deps: &[ResolvedDependency]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(deps.len());

    for dep in deps {
        let path = out_dir.join(format!("{}.pc", dep.requirement.name));
        fs::write(&path, pkg_config_contents(dep))?;
        written.push(path);
    }

    Ok(written)
}

fn pkg_config_contents(dep: &ResolvedDependency) -> String {
    let mut pc = String::new();
    pc.push_str(&format!("prefix={}\n\n", dep.prefix.display()));
    pc.push_str(&format!("Name: {}\n", dep.requirement.name));
    pc.push_str(&format!(
        "Description: {} provided by pantry\n",
        dep.requirement.reference()
    ));
    pc.push_str(&format!("Version: {}\n", dep.requirement.version));

    let cflags: Vec<String> = dep
        .includedirs
        .iter()
        .map(|d| format!("-I{}", d.display()))
        .collect();
    pc.push_str(&format!("Cflags: {}\n", cflags.join(" ")));

    let libs: Vec<String> = dep
        .libdirs
        .iter()
        .map(|d| format!("-L{}", d.display()))
        .collect();
    pc.push_str(&format!("Libs: {}\n", libs.join(" ")));

    pc
}

/// Map a `build_type` setting to Meson's buildtype option
pub fn meson_buildtype(build_type: &str) -> Result<&'static str> {
    match build_type {
        "Release" => Ok("release"),
        "Debug" => Ok("debug"),
        "RelWithDebInfo" => Ok("debugoptimized"),
        "MinSizeRel" => Ok("minsize"),
        other => Err(Error::config(format!(
            "Unsupported build_type '{}' for MesonToolchain",
            other
        ))),
    }
}

fn compiler_binaries(compiler: &str) -> Option<(&'static str, &'static str)> {
    match compiler {
        "gcc" => Some(("gcc", "g++")),
        "clang" | "apple-clang" => Some(("clang", "clang++")),
        "msvc" => Some(("cl", "cl")),
        _ => None,
    }
}

fn write_meson_native(out_dir: &Path, settings: &TargetSettings) -> Result<PathBuf> {
    let mut ini = String::from("[binaries]\n");
    if let Some(compiler) = settings.get("compiler") {
        match compiler_binaries(compiler) {
            Some((c, cpp)) => {
                ini.push_str(&format!("c = '{}'\n", c));
                ini.push_str(&format!("cpp = '{}'\n", cpp));
            }
            None => debug!("No known binaries for compiler '{}'", compiler),
        }
    }
    ini.push_str("pkg-config = 'pkg-config'\n\n");

    ini.push_str("[built-in options]\n");
    if let Some(build_type) = settings.get("build_type") {
        ini.push_str(&format!("buildtype = '{}'\n", meson_buildtype(build_type)?));
    }
    ini.push_str("prefix = '/'\n");
    ini.push_str(&format!("pkg_config_path = '{}'\n", out_dir.display()));

    let path = out_dir.join(MESON_NATIVE_FILE);
    fs::write(&path, ini)?;
    Ok(path)
}
