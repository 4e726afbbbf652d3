// tests/meson_adapter.rs

//! Drives the real Meson adapter against a stub `meson` script.
//!
//! The end-to-end flow stays in a single test so no other thread forks
//! while the stub is still open for writing.

#![cfg(unix)]

mod common;

use common::{linux_release, setup_project};
use pantry::recipe::{Kitchen, KitchenConfig};
use pantry::{Error, ErrorKind};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn write_stub(path: &Path, log: &Path, fail_flag: &Path) {
    let script = format!(
        r#"#!/bin/sh
echo "$*" >> "{log}"
case "$1" in
  setup)
    echo "PKG_CONFIG_PATH=$PKG_CONFIG_PATH" >> "{log}"
    mkdir -p "$2"
    ;;
  test)
    if [ -f "{flag}" ]; then
      echo "1/1 api_test FAIL" >&2
      exit 3
    fi
    ;;
  install)
    mkdir -p "$5/include/forti"
    echo "// installed" > "$5/include/forti/version.hpp"
    ;;
esac
exit 0
"#,
        log = log.display(),
        flag = fail_flag.display()
    );
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_meson_adapter_end_to_end() {
    let (dir, recipe) = setup_project();
    let tools = tempfile::tempdir().unwrap();
    let stub = tools.path().join("meson");
    let log = tools.path().join("meson.log");
    let fail_flag = tools.path().join("fail-tests");
    write_stub(&stub, &log, &fail_flag);

    let config = KitchenConfig {
        meson: Some(stub.clone()),
        jobs: 2,
        ..KitchenConfig::for_root(dir.path())
    };
    let kitchen = Kitchen::new(config);
    let settings = linux_release();

    let result = kitchen.cook(&recipe, &settings).unwrap();

    let root = dir.path();
    let build = root.join("build/meson");
    let generators = root.join("build/generators");
    let package = root.join("build/package");
    let lines: Vec<String> = fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();

    assert_eq!(
        lines,
        vec![
            format!(
                "setup {} {} --prefix=/ --native-file {}",
                build.display(),
                root.display(),
                generators.join("pantry_meson_native.ini").display()
            ),
            format!("PKG_CONFIG_PATH={}", generators.display()),
            format!("compile -C {} -j 2", build.display()),
            format!("test -C {}", build.display()),
            format!(
                "install -C {} --destdir {}",
                build.display(),
                package.display()
            ),
        ]
    );

    assert!(package.join("include/forti/api.hpp").exists());
    assert!(package.join("include/forti/version.hpp").exists());
    assert!(result.info.is_header_only());

    // A failing test run reports the exit code and stderr unchanged
    fs::write(&fail_flag, "").unwrap();
    let err = kitchen.test(&recipe, &settings).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalProcess);
    match err {
        Error::CommandFailed {
            phase,
            code,
            stderr,
            ..
        } => {
            assert_eq!(phase, "test");
            assert_eq!(code, Some(3));
            assert!(stderr.contains("api_test FAIL"));
        }
        other => panic!("unexpected error: {}", other),
    }

    // The build is still there for a rerun
    fs::remove_file(&fail_flag).unwrap();
    kitchen.test(&recipe, &settings).unwrap();
}

#[test]
fn test_missing_meson_is_external_process_error() {
    let (dir, recipe) = setup_project();
    let config = KitchenConfig {
        meson: Some(dir.path().join("no-such-meson")),
        ..KitchenConfig::for_root(dir.path())
    };

    let err = Kitchen::new(config)
        .build(&recipe, &linux_release())
        .unwrap_err();
    assert!(matches!(err, Error::ToolNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::ExternalProcess);
}
