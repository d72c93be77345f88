//! Diagnostics utilities.
//!
//! Adds `.diag(...)` and `.diag_with(...)` extension methods to `Result` for
//! converting foreign errors into `miette` diagnostics with contextual
//! messages. Errors defined in this crate already implement
//! [`miette::Diagnostic`] and convert with `?` directly.
//!
//! # Examples
//! ```rust
//! use miette::Result;
//! use neosh_configure::diagnostics::ResultExt;
//!
//! fn load() -> Result<String> {
//!     std::fs::read_to_string("toolchain.json").diag("read toolchain.json")
//! }
//! ```
use miette::{Context, IntoDiagnostic, Result};
use std::fmt::Display;

/// Extension methods for turning `Result` values into `miette` diagnostics.
pub trait ResultExt<T> {
    /// Attach a static context message to any error.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `context`.
    fn diag(self, context: impl Display + Send + Sync + 'static) -> Result<T>;

    /// Attach a lazily evaluated context message to any error.
    ///
    /// ```rust
    /// use miette::Result;
    /// use neosh_configure::diagnostics::ResultExt;
    /// use std::{fs::File, path::Path};
    ///
    /// fn open(path: &Path) -> Result<File> {
    ///     File::open(path).diag_with(|| format!("open {}", path.display()))
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with the message produced by `f`.
    fn diag_with(self, f: impl FnOnce() -> String) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn diag(self, context: impl Display + Send + Sync + 'static) -> Result<T> {
        self.into_diagnostic().wrap_err(context)
    }

    fn diag_with(self, f: impl FnOnce() -> String) -> Result<T> {
        self.into_diagnostic().wrap_err_with(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;

    #[rstest]
    fn diag_prefixes_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let report = result.diag("read toolchain").expect_err("error");
        assert_eq!(report.to_string(), "read toolchain");
        let chain: Vec<_> = report.chain().map(ToString::to_string).collect();
        assert_eq!(chain, ["read toolchain", "gone"]);
    }

    #[rstest]
    fn diag_with_is_lazy_on_success() {
        let result: std::result::Result<u8, io::Error> = Ok(7);
        let value = result
            .diag_with(|| panic!("context must not be built on success"))
            .expect("ok");
        assert_eq!(value, 7);
    }
}
