//! Intermediate Representation structures.
//!
//! This module defines the ordered build graph produced by the assembler.
//! The IR mirrors Ninja's declaration model (variables, rules, and build
//! edges) without embedding any Ninja-specific syntax; escaping and line
//! wrapping belong to [`crate::ninja_gen`].
//!
//! Declarations are appended in file order and validated as they arrive, so
//! a graph that exists is one Ninja can load in a single forward pass.
//!
//! # Examples
//!
//! ```
//! use neosh_configure::ir::{BuildGraph, Edge, Rule, Variable};
//! use camino::Utf8PathBuf;
//!
//! let mut graph = BuildGraph::default();
//! graph.push_variable(Variable::new("cc", "cc"))?;
//! graph.push_rule(Rule::new("compile", "$cc -c $in -o $out"))?;
//! graph.push_edge(
//!     Edge::new("compile", vec![Utf8PathBuf::from("hello.o")])
//!         .with_inputs(vec![Utf8PathBuf::from("hello.c")]),
//! )?;
//! assert_eq!(graph.declarations().len(), 3);
//! # Ok::<(), neosh_configure::ir::IrGenError>(())
//! ```

mod graph;
mod vars;

pub use graph::{BuildGraph, Declaration, Edge, IrGenError, PHONY, Rule, Variable};
