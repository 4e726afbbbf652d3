// src/recipe/settings.rs

//! Target settings supplied by the invoking environment
//!
//! Settings are free-form `key=value` descriptors. The recipe never mutates
//! them; every stage receives them by reference.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Settings keys a recipe may declare
pub const SETTING_KEYS: &[&str] = &["os", "compiler", "arch", "build_type"];

/// Ordered key/value descriptors for a build configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSettings {
    values: BTreeMap<String, String>,
}

impl TargetSettings {
    /// Create an empty settings set
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key` set to `value`
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Detect settings for the running host
    ///
    /// `os` and `arch` come from the platform; `compiler` is the platform's
    /// customary C++ compiler and `build_type` defaults to Release.
    pub fn detect_host() -> Self {
        let os = match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Macos",
            "windows" => "Windows",
            "freebsd" => "FreeBSD",
            other => other,
        };
        let compiler = match std::env::consts::OS {
            "macos" => "apple-clang",
            "windows" => "msvc",
            "freebsd" => "clang",
            _ => "gcc",
        };
        let arch = match std::env::consts::ARCH {
            "aarch64" => "armv8",
            other => other,
        };

        Self::new()
            .with("os", os)
            .with("compiler", compiler)
            .with("arch", arch)
            .with("build_type", "Release")
    }

    /// Parse a `key=value` assignment as given on the command line
    pub fn parse_assignment(s: &str) -> Result<(String, String)> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| Error::config(format!("Invalid setting '{}': expected key=value", s)))?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(Error::config(format!(
                "Invalid setting '{}': key and value must be non-empty",
                s
            )));
        }
        Ok((key.to_string(), value.to_string()))
    }

    /// Apply `key=value` overrides on top of these settings
    pub fn with_overrides<I, S>(mut self, assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for assignment in assignments {
            let (key, value) = Self::parse_assignment(assignment.as_ref())?;
            self.values.insert(key, value);
        }
        Ok(self)
    }

    /// Look up a setting
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when no settings are present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for TargetSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Check that a recipe-declared settings key is recognized
pub fn is_known_key(key: &str) -> bool {
    SETTING_KEYS.contains(&key)
}
