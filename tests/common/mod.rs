// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use pantry::recipe::{
    BuildSystem, DependencyResolver, Kitchen, KitchenConfig, NoopResolver, Recipe, StageContext,
    TargetSettings, parse_recipe,
};
use pantry::{Error, Result};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const FORTI_API_RECIPE: &str = r#"
[package]
name = "forti-api"
version = "0.2.2"
author = "Cooper Larson | cooper.larson1@gmail.com"
url = ""
description = "FortiGate API interface"
topics = ["c++", "security"]

[build]
settings = ["os", "compiler", "arch", "build_type"]
generators = ["PkgConfigDeps", "MesonToolchain"]
exports_sources = ["meson.build", "include/*", "tests/*", "main.cpp"]

[requirements]
requires = ["nlohmann_json/3.11.3", "libcurl/8.9.1"]
test_requires = ["gtest/1.14.0"]
"#;

/// Create a project tree shaped like the forti-api library.
///
/// Returns (TempDir, Recipe) - keep the TempDir alive to prevent cleanup.
pub fn setup_project() -> (TempDir, Recipe) {
    setup_project_with(FORTI_API_RECIPE)
}

/// Same tree, custom recipe text.
pub fn setup_project_with(recipe_text: &str) -> (TempDir, Recipe) {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("include/forti")).unwrap();
    fs::create_dir_all(root.join("tests")).unwrap();
    fs::write(
        root.join("meson.build"),
        "project('forti-api', 'cpp', version: '0.2.2')\n",
    )
    .unwrap();
    fs::write(
        root.join("include/forti/api.hpp"),
        "#pragma once\n// from source\n",
    )
    .unwrap();
    fs::write(root.join("include/forti/session.hpp"), "#pragma once\n").unwrap();
    fs::write(root.join("tests/api_test.cpp"), "int main() { return 0; }\n").unwrap();
    fs::write(root.join("main.cpp"), "int main() { return 0; }\n").unwrap();
    fs::write(root.join("pantry.toml"), recipe_text).unwrap();

    let recipe = parse_recipe(recipe_text).unwrap();
    (temp_dir, recipe)
}

pub fn linux_release() -> TargetSettings {
    TargetSettings::new()
        .with("os", "Linux")
        .with("compiler", "gcc")
        .with("arch", "x86_64")
        .with("build_type", "Release")
}

pub fn windows_debug() -> TargetSettings {
    TargetSettings::new()
        .with("os", "Windows")
        .with("compiler", "msvc")
        .with("arch", "x86_64")
        .with("build_type", "Debug")
}

/// A build system that records every stage call instead of running one.
pub struct MockBuildSystem {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
    install_files: Vec<(String, String)>,
}

impl MockBuildSystem {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            install_files: Vec::new(),
        }
    }

    /// Fail with a non-zero exit when `phase` runs
    pub fn failing(phase: &'static str) -> Self {
        Self {
            fail_on: Some(phase),
            ..Self::new()
        }
    }

    /// Write `content` to `rel` under the package folder during install
    pub fn with_install_file(mut self, rel: &str, content: &str) -> Self {
        self.install_files
            .push((rel.to_string(), content.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, phase: &str) -> Result<()> {
        self.calls.lock().unwrap().push(phase.to_string());
        if self.fail_on == Some(phase) {
            return Err(Error::CommandFailed {
                phase: phase.to_string(),
                program: "mock".to_string(),
                code: Some(1),
                stderr: format!("{} exploded", phase),
            });
        }
        Ok(())
    }
}

impl BuildSystem for MockBuildSystem {
    fn name(&self) -> &str {
        "mock"
    }

    fn configure(&self, ctx: &StageContext<'_>) -> Result<()> {
        self.record("configure")?;
        fs::create_dir_all(ctx.layout.build_folder())?;
        Ok(())
    }

    fn build(&self, _ctx: &StageContext<'_>) -> Result<()> {
        self.record("build")
    }

    fn test(&self, _ctx: &StageContext<'_>) -> Result<()> {
        self.record("test")
    }

    fn install(&self, ctx: &StageContext<'_>) -> Result<()> {
        self.record("install")?;
        let package = ctx.layout.package_folder();
        for (rel, content) in &self.install_files {
            let dest = package.join(rel);
            fs::create_dir_all(dest.parent().unwrap())?;
            fs::write(dest, content)?;
        }
        Ok(())
    }
}

/// Kitchen rooted at `root` driving `build_system`.
pub fn mock_kitchen(root: &Path, build_system: Arc<MockBuildSystem>) -> Kitchen {
    kitchen_with(KitchenConfig::for_root(root), build_system, Arc::new(NoopResolver))
}

pub fn kitchen_with(
    config: KitchenConfig,
    build_system: Arc<MockBuildSystem>,
    resolver: Arc<dyn DependencyResolver>,
) -> Kitchen {
    Kitchen::with_adapters(config, build_system, resolver)
}
