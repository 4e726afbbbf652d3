// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::identity::IdentityPolicy;
use crate::recipe::requirements::RequirementSet;
use crate::recipe::settings::is_known_key;
use std::path::Path;

/// Default recipe file name
pub const RECIPE_FILE: &str = "pantry.toml";

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::config(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read recipe file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Hard problems are returned as errors; soft ones as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let pkg = &recipe.package;

    if pkg.name.is_empty() {
        return Err(Error::config("Recipe package name cannot be empty"));
    }
    if pkg.version.is_empty() {
        return Err(Error::config("Recipe package version cannot be empty"));
    }
    if pkg
        .name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_whitespace())
    {
        return Err(Error::config(format!(
            "Invalid package name '{}': no separators or whitespace allowed",
            pkg.name
        )));
    }
    if pkg.version.chars().any(|c| c == '/' || c.is_whitespace()) {
        return Err(Error::config(format!(
            "Invalid package version '{}'",
            pkg.version
        )));
    }

    for key in &recipe.build.settings {
        if !is_known_key(key) {
            return Err(Error::config(format!("Unknown settings key '{}'", key)));
        }
    }

    for (i, generator) in recipe.build.generators.iter().enumerate() {
        if recipe.build.generators[..i].contains(generator) {
            return Err(Error::config(format!("Generator {} listed twice", generator)));
        }
    }

    check_patterns("exports_sources", &recipe.build.exports_sources)?;
    check_patterns("assemble.headers", &recipe.assemble.headers)?;
    if recipe.assemble.headers.is_empty() {
        return Err(Error::config("assemble.headers must name at least one pattern"));
    }

    // Malformed references, ranges, duplicates
    RequirementSet::declare(recipe)?;

    if recipe.identity.policy == Some(IdentityPolicy::HeaderOnly) && !recipe.info.is_header_only()
    {
        return Err(Error::config(
            "Identity policy header-only requires empty info.bindirs and info.libdirs",
        ));
    }

    if pkg.url.as_deref().is_none_or(str::is_empty) {
        warnings.push("Missing package url".to_string());
    }
    if pkg.author.as_deref().is_none_or(str::is_empty) {
        warnings.push("Missing package author".to_string());
    }
    if pkg.description.as_deref().is_none_or(str::is_empty) {
        warnings.push("Missing package description".to_string());
    }
    if pkg.topics.is_empty() {
        warnings.push("No topics specified".to_string());
    }
    if recipe.build.exports_sources.is_empty() {
        warnings.push("No exports_sources specified; recipe revision covers nothing".to_string());
    }

    Ok(warnings)
}

fn check_patterns(field: &str, patterns: &[String]) -> Result<()> {
    for pattern in patterns {
        if pattern.trim().is_empty() {
            return Err(Error::config(format!("Empty pattern in {}", field)));
        }
        glob::Pattern::new(pattern).map_err(|e| {
            Error::config(format!("Invalid pattern '{}' in {}: {}", pattern, field, e))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::generators::Generator;

    const FULL: &str = r#"
[package]
name = "forti-api"
version = "0.2.2"
author = "Cooper Larson | cooper.larson1@gmail.com"
url = "https://example.com/forti-api"
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

    fn with_package(rest: &str) -> String {
        format!("[package]\nname = \"test\"\nversion = \"1.0\"\n{}", rest)
    }

    #[test]
    fn test_parse_valid_recipe() {
        let recipe = parse_recipe(FULL).unwrap();
        assert_eq!(recipe.package.name, "forti-api");
        assert_eq!(
            recipe.build.generators,
            vec![Generator::PkgConfigDeps, Generator::MesonToolchain]
        );
        assert_eq!(recipe.build.exports_sources.len(), 4);
        assert!(validate_recipe(&recipe).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_recipe() {
        let err = parse_recipe("this is not valid toml at all {}").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_recipe_file(Path::new("/nonexistent/pantry.toml")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_empty_name() {
        let recipe = parse_recipe("[package]\nname = \"\"\nversion = \"1.0\"\n").unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_name() {
        let recipe = parse_recipe("[package]\nname = \"a/b\"\nversion = \"1.0\"\n").unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_unknown_setting() {
        let recipe = parse_recipe(&with_package("[build]\nsettings = [\"os\", \"cppstd\"]\n")).unwrap();
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(err.to_string().contains("cppstd"));
    }

    #[test]
    fn test_validate_duplicate_generator() {
        let recipe = parse_recipe(&with_package(
            "[build]\ngenerators = [\"MesonToolchain\", \"MesonToolchain\"]\n",
        ))
        .unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_patterns() {
        let recipe =
            parse_recipe(&with_package("[build]\nexports_sources = [\"include/[\"]\n")).unwrap();
        assert!(validate_recipe(&recipe).is_err());

        let recipe = parse_recipe(&with_package("[assemble]\nheaders = [\"\"]\n")).unwrap();
        assert!(validate_recipe(&recipe).is_err());

        let recipe = parse_recipe(&with_package("[assemble]\nheaders = []\n")).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_version_range() {
        let recipe = parse_recipe(&with_package(
            "[requirements]\nrequires = [\"libcurl/[>=8.0]\"]\n",
        ))
        .unwrap();
        assert!(validate_recipe(&recipe).unwrap_err().is_configuration());
    }

    #[test]
    fn test_validate_header_only_with_libdirs() {
        let recipe = parse_recipe(&with_package(
            "[info]\nlibdirs = [\"lib\"]\n[identity]\npolicy = \"header-only\"\n",
        ))
        .unwrap();
        assert!(validate_recipe(&recipe).is_err());

        let recipe = parse_recipe(&with_package("[info]\nlibdirs = [\"lib\"]\n")).unwrap();
        assert!(validate_recipe(&recipe).is_ok());
    }

    #[test]
    fn test_validate_warnings() {
        let recipe = parse_recipe(&with_package("")).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("url")));
        assert!(warnings.iter().any(|w| w.contains("author")));
        assert!(warnings.iter().any(|w| w.contains("description")));
        assert!(warnings.iter().any(|w| w.contains("topics")));
        assert!(warnings.iter().any(|w| w.contains("exports_sources")));
    }

    #[test]
    fn test_empty_url_warns() {
        let recipe = parse_recipe(&FULL.replace(
            "url = \"https://example.com/forti-api\"",
            "url = \"\"",
        ))
        .unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert_eq!(warnings, vec!["Missing package url".to_string()]);
    }
}
