// src/recipe/kitchen/build_system.rs

//! External build system adapters
//!
//! The Kitchen never compiles anything itself. Each lifecycle stage is
//! delegated to a [`BuildSystem`], which runs exactly one external command
//! per call, blocks until it exits and reports failure unchanged.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::generators::MESON_NATIVE_FILE;
use crate::recipe::layout::FolderLayout;
use crate::recipe::settings::TargetSettings;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Everything a stage invocation may read
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub recipe: &'a Recipe,
    pub layout: &'a FolderLayout,
    pub settings: &'a TargetSettings,
}

/// Trait for the external build system driven by the Kitchen
pub trait BuildSystem: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Generate native build files in the build folder
    fn configure(&self, ctx: &StageContext<'_>) -> Result<()>;

    /// Compile the configured tree
    fn build(&self, ctx: &StageContext<'_>) -> Result<()>;

    /// Run the test suite against the compiled tree
    fn test(&self, ctx: &StageContext<'_>) -> Result<()>;

    /// Install build outputs into the package folder
    fn install(&self, ctx: &StageContext<'_>) -> Result<()>;
}

/// Meson adapter
#[derive(Debug, Clone, Default)]
pub struct Meson {
    /// Explicit program path; looked up on PATH when unset
    program: Option<PathBuf>,
    /// Parallel compile jobs
    jobs: Option<u32>,
}

impl Meson {
    pub fn new(program: Option<PathBuf>) -> Self {
        Self {
            program,
            jobs: None,
        }
    }

    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Locate the meson program
    pub fn program(&self) -> Result<PathBuf> {
        let wanted = self
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from("meson"));
        which::which(&wanted).map_err(|e| {
            Error::ToolNotFound(format!("{} ({})", wanted.display(), e))
        })
    }

    /// A previous `meson setup` left its core data behind
    fn is_configured(build_dir: &Path) -> bool {
        build_dir.join("meson-private").join("coredata.dat").exists()
    }

    fn run(
        &self,
        phase: &str,
        args: Vec<OsString>,
        workdir: &Path,
        env: &[(&str, OsString)],
    ) -> Result<()> {
        let program = self.program()?;
        info!("Running {} phase", phase);
        debug!(
            "Command: {} {}",
            program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&program)
            .args(&args)
            .current_dir(workdir)
            .envs(env.iter().map(|(k, v)| (*k, v.as_os_str())))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ToolNotFound(program.display().to_string())
                } else {
                    Error::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            debug!("{} stdout:\n{}", phase, stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            debug!("{} stderr:\n{}", phase, stderr.trim_end());
        }

        if !output.status.success() {
            return Err(Error::CommandFailed {
                phase: phase.to_string(),
                program: program.display().to_string(),
                code: output.status.code(),
                stderr: stderr.into_owned(),
            });
        }

        Ok(())
    }
}

impl BuildSystem for Meson {
    fn name(&self) -> &str {
        "meson"
    }

    fn configure(&self, ctx: &StageContext<'_>) -> Result<()> {
        let build_dir = ctx.layout.build_folder();
        let generators = ctx.layout.generators_folder();

        let mut args: Vec<OsString> = vec![
            "setup".into(),
            build_dir.clone().into(),
            ctx.layout.source_folder().into(),
            "--prefix=/".into(),
        ];
        let native_file = generators.join(MESON_NATIVE_FILE);
        if native_file.exists() {
            args.push("--native-file".into());
            args.push(native_file.into());
        }
        if Self::is_configured(&build_dir) {
            args.push("--reconfigure".into());
        }

        self.run(
            "configure",
            args,
            ctx.layout.root(),
            &[("PKG_CONFIG_PATH", generators.into_os_string())],
        )
    }

    fn build(&self, ctx: &StageContext<'_>) -> Result<()> {
        let mut args: Vec<OsString> = vec![
            "compile".into(),
            "-C".into(),
            ctx.layout.build_folder().into(),
        ];
        if let Some(jobs) = self.jobs {
            args.push("-j".into());
            args.push(jobs.to_string().into());
        }
        self.run("build", args, ctx.layout.root(), &[])
    }

    fn test(&self, ctx: &StageContext<'_>) -> Result<()> {
        let args: Vec<OsString> = vec![
            "test".into(),
            "-C".into(),
            ctx.layout.build_folder().into(),
        ];
        self.run("test", args, ctx.layout.root(), &[])
    }

    fn install(&self, ctx: &StageContext<'_>) -> Result<()> {
        let args: Vec<OsString> = vec![
            "install".into(),
            "-C".into(),
            ctx.layout.build_folder().into(),
            "--destdir".into(),
            ctx.layout.package_folder().into(),
        ];
        self.run("install", args, ctx.layout.root(), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program() {
        let meson = Meson::new(Some(PathBuf::from("/nonexistent/bin/meson")));
        let err = meson.program().unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_is_configured() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!Meson::is_configured(dir.path()));
        std::fs::create_dir_all(dir.path().join("meson-private")).unwrap();
        std::fs::write(dir.path().join("meson-private/coredata.dat"), b"x").unwrap();
        assert!(Meson::is_configured(dir.path()));
    }
}
