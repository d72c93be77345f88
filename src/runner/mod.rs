//! Generator execution.
//!
//! This module keeps `main` minimal: [`run`] resolves the project root and
//! the generator executable, builds the [`GeneratorConfig`], produces the
//! build file text and writes it atomically.

mod error;
mod file_io;

pub use error::RunnerError;
pub use file_io::write_ninja_file;

use crate::assemble::assemble;
use crate::cli::Cli;
use crate::config::GeneratorConfig;
use crate::diagnostics::ResultExt;
use crate::ninja_gen;
use crate::toolchain::ToolchainDescriptor;
use camino::{Utf8Path, Utf8PathBuf};
use miette::Result;
use std::path::PathBuf;
use tracing::{Level, debug, enabled};

/// Wrapper around generated Ninja build file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NinjaContent(String);
impl NinjaContent {
    /// Store the provided build file text.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self(content)
    }
    /// Borrow the underlying text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Execute one generator run for the parsed command line.
///
/// # Errors
///
/// Returns an error if the project directory or generator executable cannot
/// be resolved, the toolchain record is invalid, or the build file cannot be
/// written.
pub fn run(cli: &Cli) -> Result<()> {
    let root = resolve_root(cli.directory.as_deref())?;
    let generator = resolve_generator()?;
    let config = cli.generator_config(root, generator);
    debug!(?config, "resolved generator configuration");
    let ninja = generate_ninja(&config)?;
    write_ninja_file(config.ninja_file(), &ninja)?;
    Ok(())
}

/// Load the toolchain record and render the build file for `config`.
///
/// Nothing is written to disk.
///
/// # Errors
///
/// Returns an error if the toolchain record is unreadable or invalid, or the
/// graph cannot be assembled or rendered.
pub fn generate_ninja(config: &GeneratorConfig) -> Result<NinjaContent> {
    let toolchain = ToolchainDescriptor::load(config.toolchain_file())?;
    if enabled!(Level::DEBUG) {
        let json = serde_json::to_string_pretty(&toolchain).diag("serialise toolchain record")?;
        debug!("Toolchain record:\n{json}");
    }
    let graph = assemble(config, &toolchain)?;
    let text = ninja_gen::generate(&graph, config.width())?;
    debug!("Generated Ninja file:\n{text}");
    Ok(NinjaContent::new(text))
}

/// Canonical project root: `directory` if given, otherwise the working
/// directory.
fn resolve_root(directory: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let dir = directory.unwrap_or_else(|| Utf8Path::new("."));
    let canonical = dir
        .as_std_path()
        .canonicalize()
        .diag_with(|| format!("resolve project directory {dir}"))?;
    Ok(utf8(canonical)?)
}

/// Absolute path of the running generator executable.
fn resolve_generator() -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe().diag("locate the generator executable")?;
    Ok(utf8(exe)?)
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf, RunnerError> {
    Utf8PathBuf::from_path_buf(path).map_err(|rejected| RunnerError::NonUtf8Path {
        path: rejected,
    })
}
