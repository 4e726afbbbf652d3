// src/recipe/requirements.rs

//! Pinned dependency requirements
//!
//! Requirements are `name/version` references with exact versions. Runtime
//! requirements propagate to consumers; test-only requirements are visible
//! to the build and test stages but never to the published package.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters that turn a version into a range expression
const RANGE_CHARS: &[char] = &['[', ']', '^', '~', '*', '>', '<', '=', ',', '|'];

/// A single pinned requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Library name
    pub name: String,
    /// Exact version
    pub version: String,
    /// Needed only by the test stage
    #[serde(default)]
    pub test_only: bool,
}

impl Requirement {
    /// Parse a `name/version` reference
    pub fn parse(reference: &str, test_only: bool) -> Result<Self> {
        let (name, version) = reference.split_once('/').ok_or_else(|| {
            Error::config(format!(
                "Invalid requirement '{}': expected name/version",
                reference
            ))
        })?;

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::config(format!(
                "Invalid requirement '{}': bad name",
                reference
            )));
        }
        if version.is_empty() || version.contains('/') {
            return Err(Error::config(format!(
                "Invalid requirement '{}': bad version",
                reference
            )));
        }
        if version
            .chars()
            .any(|c| c.is_whitespace() || RANGE_CHARS.contains(&c))
        {
            return Err(Error::config(format!(
                "Requirement '{}' uses a version range; only exact versions are allowed",
                reference
            )));
        }

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            test_only,
        })
    }

    /// `name/version` form
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if self.test_only {
            write!(f, " (test)")?;
        }
        Ok(())
    }
}

/// Runtime and test requirements of one recipe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    runtime: Vec<Requirement>,
    test: Vec<Requirement>,
}

impl RequirementSet {
    /// Declare the recipe's requirements
    pub fn declare(recipe: &Recipe) -> Result<Self> {
        let runtime = collect(&recipe.requirements.requires, false)?;
        let mut test = collect(&recipe.requirements.test_requires, true)?;

        let mut subsumed = Vec::new();
        for req in &test {
            if let Some(rt) = runtime.iter().find(|r| r.name == req.name) {
                if rt.version != req.version {
                    return Err(Error::config(format!(
                        "Requirement '{}' is pinned to {} at runtime and {} for tests",
                        req.name, rt.version, req.version
                    )));
                }
                subsumed.push(req.name.clone());
            }
        }
        test.retain(|r| !subsumed.contains(&r.name));

        Ok(Self { runtime, test })
    }

    /// Requirements that propagate to consumers of the package
    pub fn runtime_graph(&self) -> &[Requirement] {
        &self.runtime
    }

    /// Test-only requirements
    pub fn test_graph(&self) -> &[Requirement] {
        &self.test
    }

    /// Everything the build and test stages need, runtime first
    pub fn build_graph(&self) -> Vec<&Requirement> {
        self.runtime.iter().chain(self.test.iter()).collect()
    }

    /// True when nothing is required
    pub fn is_empty(&self) -> bool {
        self.runtime.is_empty() && self.test.is_empty()
    }
}

fn collect(references: &[String], test_only: bool) -> Result<Vec<Requirement>> {
    let mut out: Vec<Requirement> = Vec::new();

    for reference in references {
        let req = Requirement::parse(reference, test_only)?;
        match out.iter().find(|r| r.name == req.name) {
            Some(existing) if existing.version == req.version => continue,
            Some(existing) => {
                return Err(Error::config(format!(
                    "Requirement '{}' is declared twice with versions {} and {}",
                    req.name, existing.version, req.version
                )));
            }
            None => out.push(req),
        }
    }

    Ok(out)
}
