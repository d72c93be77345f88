//! Generator configuration.
//!
//! [`GeneratorConfig`] holds every path and name the assembler needs. It is
//! built once at start-up (normally from [`crate::cli::Cli`]) and passed by
//! reference afterwards; nothing in the crate reads paths from global state.

use camino::{Utf8Path, Utf8PathBuf};

use crate::ninja_gen::DEFAULT_WIDTH;

/// Default toolchain record, relative to the project root.
pub const DEFAULT_TOOLCHAIN_FILE: &str = "toolchain.json";
/// Default generated build file, relative to the project root.
pub const DEFAULT_NINJA_FILE: &str = "build.ninja";
/// Default build output directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";
/// Name of the primary build product inside the build directory.
pub const DEFAULT_PRODUCT_NAME: &str = "neosh";

/// Immutable paths and settings for one generator run.
///
/// Relative paths given to the builder methods are resolved against the
/// project root; absolute paths are kept as they are.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use neosh_configure::config::GeneratorConfig;
///
/// let config = GeneratorConfig::new("/src/neosh".into(), "/usr/bin/configure".into())
///     .with_build_dir(Utf8Path::new("out"));
/// assert_eq!(config.build_dir().as_str(), "/src/neosh/out");
/// assert_eq!(config.product().as_str(), "/src/neosh/out/neosh");
/// assert_eq!(config.ninja_file().as_str(), "/src/neosh/build.ninja");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    root: Utf8PathBuf,
    toolchain_file: Utf8PathBuf,
    ninja_file: Utf8PathBuf,
    build_dir: Utf8PathBuf,
    product: Option<Utf8PathBuf>,
    generator: Utf8PathBuf,
    generator_args: Vec<String>,
    width: usize,
}

impl GeneratorConfig {
    /// Configuration with default paths under `root`.
    ///
    /// `generator` is the executable the self-regeneration rule invokes.
    #[must_use]
    pub fn new(root: Utf8PathBuf, generator: Utf8PathBuf) -> Self {
        Self {
            toolchain_file: root.join(DEFAULT_TOOLCHAIN_FILE),
            ninja_file: root.join(DEFAULT_NINJA_FILE),
            build_dir: root.join(DEFAULT_BUILD_DIR),
            product: None,
            generator,
            generator_args: Vec::new(),
            width: DEFAULT_WIDTH,
            root,
        }
    }

    /// Read the toolchain record from `path`.
    #[must_use]
    pub fn with_toolchain_file(mut self, path: &Utf8Path) -> Self {
        self.toolchain_file = self.root.join(path);
        self
    }

    /// Write the build file to `path`.
    #[must_use]
    pub fn with_ninja_file(mut self, path: &Utf8Path) -> Self {
        self.ninja_file = self.root.join(path);
        self
    }

    /// Create and clean `path` as the build directory.
    #[must_use]
    pub fn with_build_dir(mut self, path: &Utf8Path) -> Self {
        self.build_dir = self.root.join(path);
        self
    }

    /// Use `path` as the primary build product instead of
    /// `<build dir>/neosh`.
    #[must_use]
    pub fn with_product(mut self, path: &Utf8Path) -> Self {
        self.product = Some(self.root.join(path));
        self
    }

    /// Arguments the self-regeneration rule passes to the generator.
    #[must_use]
    pub fn with_generator_args(mut self, args: Vec<String>) -> Self {
        self.generator_args = args;
        self
    }

    /// Wrap emitted lines at `width` columns.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Toolchain record location.
    #[must_use]
    pub fn toolchain_file(&self) -> &Utf8Path {
        &self.toolchain_file
    }

    /// Generated build file location.
    #[must_use]
    pub fn ninja_file(&self) -> &Utf8Path {
        &self.ninja_file
    }

    /// Build output directory.
    #[must_use]
    pub fn build_dir(&self) -> &Utf8Path {
        &self.build_dir
    }

    /// Primary build product the `all` target depends on.
    #[must_use]
    pub fn product(&self) -> Utf8PathBuf {
        self.product
            .clone()
            .unwrap_or_else(|| self.build_dir.join(DEFAULT_PRODUCT_NAME))
    }

    /// Executable invoked to regenerate the build file.
    #[must_use]
    pub fn generator(&self) -> &Utf8Path {
        &self.generator
    }

    /// Arguments passed to the generator on regeneration.
    #[must_use]
    pub fn generator_args(&self) -> &[String] {
        &self.generator_args
    }

    /// Column at which emitted lines wrap.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
}
