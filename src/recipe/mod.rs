// src/recipe/mod.rs

//! Recipe system for building and packaging native libraries
//!
//! Recipes declare how a library is built with an external build system,
//! what it depends on, and how the distributable package is assembled:
//! - Package metadata and topic tags
//! - Settings keys and build-input generators
//! - Folder layout for source, build, generators and package
//! - Pinned runtime and test-only requirements
//! - Header copy rules and published usage metadata
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build specification (like a recipe card)
//! - **Kitchen**: The pipeline holding the build system and resolver
//! - **Cook**: One run of the pipeline for one settings tuple
//! - **Pantry**: The artifact cache of assembled packages
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "forti-api"
//! version = "0.2.2"
//! description = "FortiGate API interface"
//! topics = ["c++", "security"]
//!
//! [build]
//! settings = ["os", "compiler", "arch", "build_type"]
//! generators = ["PkgConfigDeps", "MesonToolchain"]
//! exports_sources = ["meson.build", "include/*", "tests/*", "main.cpp"]
//!
//! [requirements]
//! requires = ["nlohmann_json/3.11.3", "libcurl/8.9.1"]
//! test_requires = ["gtest/1.14.0"]
//! ```

pub mod cache;
mod format;
pub mod generators;
pub mod identity;
pub mod info;
mod kitchen;
pub mod layout;
pub mod parser;
pub mod requirements;
pub mod settings;

pub use cache::{CacheEntry, PackageCache};
pub use format::{
    AssembleSection, BuildSection, IdentitySection, InfoSection, LayoutSection, PackageSection,
    Recipe, RequirementsSection,
};
pub use generators::Generator;
pub use identity::{IdentityPolicy, PackageIdentity};
pub use info::{CppInfo, PackageInfo};
pub use kitchen::{
    BUILD_MARKER, BuildMarker, BuildSystem, Cook, CookResult, DependencyResolver,
    DirectoryResolver, ExportManifest, Kitchen, KitchenConfig, Meson, NoopResolver,
    ResolvedDependency, StageContext, copy_headers, export_sources,
};
pub use layout::FolderLayout;
pub use parser::{RECIPE_FILE, parse_recipe, parse_recipe_file, validate_recipe};
pub use requirements::{Requirement, RequirementSet};
pub use settings::TargetSettings;
