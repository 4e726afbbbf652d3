// src/lib.rs

//! pantry: recipe-driven build, test and packaging for native libraries
//!
//! A TOML recipe declares a library's metadata, its pinned requirements,
//! the folder layout used during the build and the rules for assembling a
//! distributable package. pantry resolves the layout, delegates configure,
//! compile, test and install to an external build system (Meson), copies
//! public headers, publishes consumer-facing usage metadata and computes
//! the package identity that decides which cached artifact a target may
//! reuse.
//!
//! # Architecture
//!
//! - Immutable recipe: parsed once, never mutated by a stage
//! - Explicit pipeline: [`recipe::Kitchen`] holds injected adapters for the
//!   build system and the dependency resolver
//! - Settings as context: every stage receives the target settings by reference
//! - Fail fast: a stage failure aborts every later stage, nothing is retried

mod error;
pub mod hash;
pub mod recipe;

pub use error::{Error, ErrorKind, Result};
pub use hash::Hasher;
pub use recipe::{Cook, CookResult, Kitchen, KitchenConfig, Recipe};
