//! Error types for the runner module.
//!
//! Kept in a submodule so the lint suppression for derive expansion stays
//! narrow.

// The unused_assignments lint fires on miette/thiserror derive expansion in
// some Rust versions only, so `#[expect]` is not an option here.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors raised while resolving paths or writing the build file.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The build file could not be written or replaced.
    #[error("cannot write build file {path}")]
    #[diagnostic(
        code(neosh_configure::runner::unwritable_output),
        help("check that the parent directory exists and is writable")
    )]
    UnwritableOutput {
        /// Destination that was being written.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A path the generator depends on is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .path.display())]
    #[diagnostic(
        code(neosh_configure::runner::non_utf8_path),
        help("move the project or the generator to a UTF-8 path")
    )]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },
}
