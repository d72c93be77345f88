//! Command line interface definition using clap.
//!
//! Every argument is optional: with none given, the generator reads
//! `toolchain.json` and writes `build.ninja` in the current directory.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

use crate::config::{
    DEFAULT_BUILD_DIR, DEFAULT_NINJA_FILE, DEFAULT_TOOLCHAIN_FILE, GeneratorConfig,
};

/// Generate the self-regenerating Ninja build file for neosh.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root; defaults to the current directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// Toolchain record, relative to the project root.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_TOOLCHAIN_FILE)]
    pub toolchain: Utf8PathBuf,

    /// Build file to write, relative to the project root.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_NINJA_FILE)]
    pub output: Utf8PathBuf,

    /// Build output directory, relative to the project root.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_BUILD_DIR)]
    pub build_dir: Utf8PathBuf,

    /// Primary build product; defaults to `neosh` inside the build directory.
    #[arg(long, value_name = "FILE")]
    pub product: Option<Utf8PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            directory: None,
            toolchain: Utf8PathBuf::from(DEFAULT_TOOLCHAIN_FILE),
            output: Utf8PathBuf::from(DEFAULT_NINJA_FILE),
            build_dir: Utf8PathBuf::from(DEFAULT_BUILD_DIR),
            product: None,
            verbose: false,
        }
    }
}

impl Cli {
    /// Arguments that make the generator reproduce this invocation from any
    /// working directory.
    ///
    /// The resolved `root` is always passed; other options only when they
    /// differ from their defaults. `--verbose` is never replayed.
    #[must_use]
    pub fn regeneration_args(&self, root: &Utf8Path) -> Vec<String> {
        let mut args = vec!["-C".to_owned(), root.to_string()];
        let mut push = |flag: &str, value: &Utf8Path, default: &str| {
            if value.as_str() != default {
                args.push(flag.to_owned());
                args.push(value.to_string());
            }
        };
        push("--toolchain", self.toolchain.as_path(), DEFAULT_TOOLCHAIN_FILE);
        push("--output", self.output.as_path(), DEFAULT_NINJA_FILE);
        push("--build-dir", self.build_dir.as_path(), DEFAULT_BUILD_DIR);
        if let Some(product) = &self.product {
            args.push("--product".to_owned());
            args.push(product.to_string());
        }
        args
    }

    /// Build the run configuration for project `root`, regenerated by the
    /// executable at `generator`.
    #[must_use]
    pub fn generator_config(&self, root: Utf8PathBuf, generator: Utf8PathBuf) -> GeneratorConfig {
        let args = self.regeneration_args(&root);
        let config = GeneratorConfig::new(root, generator)
            .with_toolchain_file(&self.toolchain)
            .with_ninja_file(&self.output)
            .with_build_dir(&self.build_dir)
            .with_generator_args(args);
        match &self.product {
            Some(product) => config.with_product(product),
            None => config,
        }
    }
}
