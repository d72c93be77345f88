//! Shared helpers for integration tests.
//!
//! Integration tests under `tests/` compile as independent crates. This module
//! is included via `mod common;` in individual test files to share fixtures and
//! helpers.

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// A complete toolchain record using the usual POSIX tools.
#[allow(dead_code, reason = "not every test crate uses the default record")]
pub const TOOLCHAIN: &str = r#"{
  "mkdir": "mkdir",
  "mkdir_flags": "-p",
  "rm": "rm",
  "rm_flags": "-rf"
}"#;

/// Create a temporary project whose `toolchain.json` holds `toolchain`.
///
/// Returns the directory guard and its canonical UTF-8 path.
#[allow(dead_code, reason = "not every test crate needs a project on disk")]
pub fn project_with_toolchain(toolchain: &str) -> Result<(TempDir, Utf8PathBuf)> {
    let temp = tempfile::tempdir().context("create temp project dir")?;
    let canonical = temp
        .path()
        .canonicalize()
        .context("canonicalise temp project dir")?;
    let root = Utf8PathBuf::from_path_buf(canonical)
        .map_err(|path| anyhow!("non UTF-8 temp dir {}", path.display()))?;
    let record = root.join("toolchain.json");
    fs::write(&record, toolchain).with_context(|| format!("write {record}"))?;
    Ok((temp, root))
}

/// Whether a working `ninja` executable is on `PATH`.
#[allow(dead_code, reason = "only some test crates drive ninja")]
pub fn ninja_available() -> bool {
    Command::new("ninja")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}
