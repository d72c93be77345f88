//! neosh-configure core library.
//!
//! This library turns a `toolchain.json` record into the self-regenerating
//! `build.ninja` for neosh. The pipeline is
//! [`toolchain`] (load and validate) → [`assemble`] (ordered [`ir`] graph
//! built from [`rules`]) → [`ninja_gen`] (text) → [`runner`] (atomic write).

pub mod assemble;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod ir;
pub mod ninja_gen;
pub mod rules;
pub mod runner;
pub mod toolchain;
