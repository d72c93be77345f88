//! End-to-end validation of the generated build file.
//!
//! The first test snapshots the build file for a fixed configuration using
//! `insta`. The second runs the `configure` binary in a scratch project and
//! drives the result with the real `ninja` executable; it is skipped when
//! `ninja` is not installed.

mod common;

use anyhow::{Context, Result, ensure};
use assert_cmd::Command as CargoCommand;
use common::{TOOLCHAIN, ninja_available, project_with_toolchain};
use insta::{Settings, assert_snapshot};
use neosh_configure::{
    assemble::assemble, config::GeneratorConfig, ninja_gen, toolchain::ToolchainDescriptor,
};
use std::process::Command;

fn run_ok(cmd: &mut Command) -> Result<String> {
    let out = cmd.output().context("spawn command")?;
    ensure!(
        out.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).context("stdout utf8")
}

#[test]
fn neosh_build_file_snapshot() -> Result<()> {
    let toolchain = ToolchainDescriptor::from_json_str(TOOLCHAIN, "toolchain.json")?;
    let config = GeneratorConfig::new("/src/neosh".into(), "/bin/configure".into())
        .with_generator_args(vec!["-C".to_owned(), "/src/neosh".to_owned()]);
    let graph = assemble(&config, &toolchain)?;
    let ninja = ninja_gen::generate(&graph, config.width())?;

    let mut settings = Settings::new();
    settings.set_snapshot_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/snapshots/ninja"
    ));
    settings.bind(|| {
        assert_snapshot!("neosh_build_ninja", ninja);
    });
    Ok(())
}

#[test]
fn generated_file_drives_ninja() -> Result<()> {
    if !ninja_available() {
        eprintln!("skipping test: ninja must be installed for integration tests");
        return Ok(());
    }
    let (_temp, root) = project_with_toolchain(TOOLCHAIN)?;
    CargoCommand::cargo_bin("configure")
        .context("locate configure binary")?
        .current_dir(&root)
        .assert()
        .success();

    let ninja = |args: &[&str]| {
        let mut cmd = Command::new("ninja");
        cmd.arg("-f").arg(root.join("build.ninja")).args(args);
        cmd.current_dir(&root);
        run_ok(&mut cmd)
    };

    let targets = ninja(&["-t", "targets", "all"])?;
    ensure!(
        targets.lines().count() == 4,
        "expected four targets, got:\n{targets}"
    );
    for name in ["build.ninja: self", "clean: builddir_clean", "build: builddir", "all: phony"] {
        ensure!(
            targets.lines().any(|line| line.ends_with(name)),
            "missing target {name} in:\n{targets}"
        );
    }

    let build_dir = root.join("build");
    ninja(&[build_dir.as_str()])?;
    ensure!(build_dir.is_dir(), "ninja should create {build_dir}");

    ninja(&["clean"])?;
    ensure!(!build_dir.exists(), "ninja clean should remove {build_dir}");
    Ok(())
}
