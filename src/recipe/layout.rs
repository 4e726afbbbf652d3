// src/recipe/layout.rs

//! Folder layout resolution
//!
//! Turns the recipe's declared folder roles into concrete paths under the
//! invocation root. The build, generators and package folders must be
//! pairwise distinct and distinct from the source folder; anything else
//! would let one role clobber another's files.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::settings::TargetSettings;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolved folder roles for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLayout {
    root: PathBuf,
    /// Normalized source path, relative to the root (`.` for the root itself)
    pub source: String,
    /// Normalized build path, relative to the root
    pub build: String,
    /// Normalized generators path, relative to the root
    pub generators: String,
    /// Normalized package path, relative to the root
    pub package: String,
}

impl FolderLayout {
    /// Resolve the recipe's folder roles under `root`
    pub fn resolve(recipe: &Recipe, root: &Path, settings: &TargetSettings) -> Result<Self> {
        let declared = &recipe.layout;

        let source = normalize("source", &recipe.substitute(&declared.source, settings)?)?;
        let build = normalize("build", &recipe.substitute(&declared.build, settings)?)?;
        let generators = normalize(
            "generators",
            &recipe.substitute(&declared.generators, settings)?,
        )?;
        let package = normalize("package", &recipe.substitute(&declared.package, settings)?)?;

        let layout = Self {
            root: root.to_path_buf(),
            source,
            build,
            generators,
            package,
        };
        layout.check_distinct()?;

        debug!(
            "Resolved layout: source={} build={} generators={} package={}",
            layout.source, layout.build, layout.generators, layout.package
        );

        Ok(layout)
    }

    fn check_distinct(&self) -> Result<()> {
        if self.build == "." {
            return Err(Error::config(
                "Build folder cannot be the invocation root; give it its own path segment",
            ));
        }

        let roles = self.roles();
        for (i, (name_a, path_a)) in roles.iter().enumerate() {
            for (name_b, path_b) in roles.iter().skip(i + 1) {
                if path_a == path_b {
                    return Err(Error::config(format!(
                        "Folder roles '{}' and '{}' both resolve to '{}'",
                        name_a, name_b, path_a
                    )));
                }
            }
        }

        Ok(())
    }

    /// All roles as `(name, relative path)` pairs
    pub fn roles(&self) -> [(&'static str, &str); 4] {
        [
            ("source", self.source.as_str()),
            ("build", self.build.as_str()),
            ("generators", self.generators.as_str()),
            ("package", self.package.as_str()),
        ]
    }

    /// The invocation root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute source folder
    pub fn source_folder(&self) -> PathBuf {
        join(&self.root, &self.source)
    }

    /// Absolute build folder
    pub fn build_folder(&self) -> PathBuf {
        join(&self.root, &self.build)
    }

    /// Absolute generators folder
    pub fn generators_folder(&self) -> PathBuf {
        join(&self.root, &self.generators)
    }

    /// Absolute package folder
    pub fn package_folder(&self) -> PathBuf {
        join(&self.root, &self.package)
    }

    /// Machine-managed folders that live inside the source folder
    ///
    /// Walks over the source tree skip these so generated files and the
    /// package itself are never mistaken for hand-authored sources.
    pub fn generated_within_source(&self) -> Vec<PathBuf> {
        let source = self.source_folder();
        [
            self.build_folder(),
            self.generators_folder(),
            self.package_folder(),
        ]
        .into_iter()
        .filter(|p| p.starts_with(&source) && *p != source)
        .collect()
    }
}

fn join(root: &Path, rel: &str) -> PathBuf {
    if rel == "." {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

/// Lexically normalize a relative folder path
///
/// `./build/` becomes `build`, an empty path or `./` becomes `.`.
/// Absolute paths and `..` segments are rejected.
fn normalize(role: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let path = Path::new(trimmed);
    let mut parts: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => parts.push(part.to_string_lossy().to_string()),
            Component::ParentDir => {
                return Err(Error::InvalidPath(format!(
                    "{} folder '{}' escapes the invocation root",
                    role, raw
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidPath(format!(
                    "{} folder '{}' must be relative",
                    role, raw
                )));
            }
        }
    }

    if parts.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::parse_recipe;

    fn recipe_with_layout(layout: &str) -> Recipe {
        parse_recipe(&format!(
            "[package]\nname = \"demo\"\nversion = \"1.0.0\"\n\n[layout]\n{}",
            layout
        ))
        .unwrap()
    }

    fn resolve(layout: &str) -> Result<FolderLayout> {
        FolderLayout::resolve(
            &recipe_with_layout(layout),
            Path::new("/work/demo"),
            &TargetSettings::new().with("build_type", "Release"),
        )
    }

    #[test]
    fn test_default_layout() {
        let layout = resolve("").unwrap();
        assert_eq!(layout.source, ".");
        assert_eq!(layout.build, "build/meson");
        assert_eq!(layout.generators, "build/generators");
        assert_eq!(layout.package, "build/package");
        assert_eq!(layout.source_folder(), PathBuf::from("/work/demo"));
        assert_eq!(
            layout.build_folder(),
            PathBuf::from("/work/demo/build/meson")
        );
    }

    #[test]
    fn test_roles_pairwise_distinct() {
        let cases = [
            "",
            "source = \"src\"\nbuild = \"out/b\"\ngenerators = \"out/g\"\npackage = \"out/p\"",
            "build = \"build/%(build_type)s\"",
            "source = \"./lib/\"\nbuild = \"lib/build\"",
        ];
        for case in cases {
            let layout = resolve(case).unwrap();
            let roles = layout.roles();
            for (i, (_, a)) in roles.iter().enumerate() {
                for (_, b) in roles.iter().skip(i + 1) {
                    assert_ne!(a, b, "case {:?}", case);
                }
            }
        }
    }

    #[test]
    fn test_collision_detected() {
        let err = resolve("generators = \"build/meson\"").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("build"));
    }

    #[test]
    fn test_collision_after_normalization() {
        let err = resolve("package = \"./build/generators/\"").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_source_collision() {
        assert!(resolve("source = \"pkg\"\npackage = \"pkg\"").is_err());
    }

    #[test]
    fn test_build_cannot_be_root() {
        assert!(resolve("source = \"src\"\nbuild = \".\"").is_err());
    }

    #[test]
    fn test_rejects_escape_and_absolute() {
        assert!(matches!(
            resolve("build = \"../elsewhere\"").unwrap_err(),
            Error::InvalidPath(_)
        ));
        assert!(matches!(
            resolve("package = \"/tmp/pkg\"").unwrap_err(),
            Error::InvalidPath(_)
        ));
    }

    #[test]
    fn test_settings_namespace_build_folders() {
        let recipe = recipe_with_layout("build = \"build/%(build_type)s\"");
        let root = Path::new("/work/demo");
        let release = FolderLayout::resolve(
            &recipe,
            root,
            &TargetSettings::new().with("build_type", "Release"),
        )
        .unwrap();
        let debug = FolderLayout::resolve(
            &recipe,
            root,
            &TargetSettings::new().with("build_type", "Debug"),
        )
        .unwrap();
        assert_eq!(release.build, "build/Release");
        assert_eq!(debug.build, "build/Debug");
    }

    #[test]
    fn test_unknown_variable_is_configuration_error() {
        let recipe = recipe_with_layout("build = \"build/%(arch)s\"");
        let err = FolderLayout::resolve(&recipe, Path::new("/w"), &TargetSettings::new())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_generated_within_source() {
        let layout = resolve("").unwrap();
        let nested = layout.generated_within_source();
        assert_eq!(nested.len(), 3);

        let layout =
            resolve("source = \"src\"\nbuild = \"out/b\"\ngenerators = \"out/g\"\npackage = \"out/p\"")
                .unwrap();
        assert!(layout.generated_within_source().is_empty());
    }
}
