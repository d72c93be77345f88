//! Ninja file generator.
//!
//! This module converts a [`crate::ir::BuildGraph`] into the textual
//! representation expected by the Ninja build system. Declarations are written
//! in graph order, so the output is fully determined by the graph. Long lines
//! are wrapped with Ninja's ` $` continuation, and paths on `build` lines are
//! escaped so spaces and colons survive.

use crate::ir::{BuildGraph, Declaration, Edge, Rule, Variable};
use camino::Utf8PathBuf;
use itertools::Itertools;
use miette::Diagnostic;
use std::fmt::{self, Write};
use thiserror::Error;

/// Column at which lines wrap unless configured otherwise.
pub const DEFAULT_WIDTH: usize = 80;

/// Marker appended to a line that continues on the next one.
const CONTINUATION: &str = " $";

/// Errors raised while rendering a build graph.
#[derive(Debug, Error, Diagnostic)]
pub enum NinjaGenError {
    /// Text with a line break cannot be represented in a Ninja file.
    #[error("cannot write {text:?} to a Ninja file: it contains a line break")]
    #[diagnostic(code(neosh_configure::ninja_gen::unescapable_text))]
    UnescapableText {
        /// The offending text.
        text: String,
    },

    /// Formatting into the output buffer failed.
    #[error("failed to format Ninja output")]
    #[diagnostic(code(neosh_configure::ninja_gen::format))]
    Format(#[from] fmt::Error),
}

/// Generate a Ninja build file as a string.
///
/// A blank line separates the leading variable block from what follows, and
/// each rule and build edge is followed by a blank line.
///
/// # Errors
///
/// Returns [`NinjaGenError::UnescapableText`] if any emitted text contains a
/// line break.
///
/// # Examples
///
/// ```
/// use neosh_configure::ir::{BuildGraph, Edge, PHONY};
/// use neosh_configure::ninja_gen::{DEFAULT_WIDTH, generate};
///
/// let mut graph = BuildGraph::default();
/// graph.push_edge(Edge::new(PHONY, vec!["all".into()]))?;
/// assert_eq!(generate(&graph, DEFAULT_WIDTH)?, "build all: phony\n\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate(graph: &BuildGraph, width: usize) -> Result<String, NinjaGenError> {
    let mut writer = NinjaWriter::new(width);
    let mut in_variable_block = false;
    for decl in graph.declarations() {
        let is_variable = matches!(decl, Declaration::Variable(_));
        if in_variable_block && !is_variable {
            writer.newline()?;
        }
        in_variable_block = is_variable;
        match decl {
            Declaration::Variable(variable) => writer.variable(variable)?,
            Declaration::Rule(rule) => writer.rule(rule)?,
            Declaration::Edge(edge) => writer.build(edge)?,
        }
    }
    Ok(writer.into_string())
}

/// Escape a path for use on a `build` line.
///
/// # Examples
/// ```rust,ignore
/// assert_eq!(escape_path("a b:c$d"), "a$ b$:c$$d");
/// ```
fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for ch in path.chars() {
        if matches!(ch, '$' | ' ' | ':') {
            escaped.push('$');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape a literal variable value.
///
/// Dollars are doubled, and a leading space is escaped because Ninja strips
/// leading whitespace from values.
fn escape_value(value: &str) -> String {
    let escaped = value.replace('$', "$$");
    match escaped.strip_prefix(' ') {
        Some(rest) => format!("$ {rest}"),
        None => escaped,
    }
}

/// Convert a slice of paths into a space-separated, escaped string.
fn join(paths: &[Utf8PathBuf]) -> String {
    paths.iter().map(|p| escape_path(p.as_str())).join(" ")
}

/// Returns whether the byte at `index` is preceded by an odd run of `$`,
/// which makes it part of an escape sequence.
fn is_escaped(text: &str, index: usize) -> bool {
    let dollars = text
        .get(..index)
        .map_or(0, |head| head.bytes().rev().take_while(|b| *b == b'$').count());
    dollars.rem_euclid(2) == 1
}

/// Rightmost unescaped space strictly before `limit`.
fn last_break_before(text: &str, limit: usize) -> Option<usize> {
    text.match_indices(' ')
        .map(|(idx, _)| idx)
        .take_while(|idx| *idx < limit)
        .filter(|idx| !is_escaped(text, *idx))
        .last()
}

/// Leftmost unescaped space at or after `limit`.
fn first_break_from(text: &str, limit: usize) -> Option<usize> {
    text.match_indices(' ')
        .map(|(idx, _)| idx)
        .filter(|idx| *idx >= limit)
        .find(|idx| !is_escaped(text, *idx))
}

struct NinjaWriter {
    out: String,
    width: usize,
}

impl NinjaWriter {
    const fn new(width: usize) -> Self {
        Self {
            out: String::new(),
            width,
        }
    }

    fn into_string(self) -> String {
        self.out
    }

    fn newline(&mut self) -> fmt::Result {
        writeln!(self.out)
    }

    fn variable(&mut self, variable: &Variable) -> Result<(), NinjaGenError> {
        let line = format!("{} = {}", variable.name, escape_value(&variable.value));
        self.line(&line, 0)
    }

    fn binding(&mut self, key: &str, value: &str) -> Result<(), NinjaGenError> {
        self.line(&format!("{key} = {value}"), 1)
    }

    fn rule(&mut self, rule: &Rule) -> Result<(), NinjaGenError> {
        self.line(&format!("rule {}", rule.name), 0)?;
        self.binding("command", &rule.command)?;
        if let Some(description) = &rule.description {
            self.binding("description", description)?;
        }
        if rule.generator {
            self.binding("generator", "1")?;
        }
        Ok(self.newline()?)
    }

    fn build(&mut self, edge: &Edge) -> Result<(), NinjaGenError> {
        let mut line = format!("build {}: {}", join(&edge.outputs), edge.rule);
        if !edge.inputs.is_empty() {
            write!(line, " {}", join(&edge.inputs))?;
        }
        if !edge.implicit_inputs.is_empty() {
            write!(line, " | {}", join(&edge.implicit_inputs))?;
        }
        if !edge.order_only_deps.is_empty() {
            write!(line, " || {}", join(&edge.order_only_deps))?;
        }
        self.line(&line, 0)?;
        Ok(self.newline()?)
    }

    /// Write one logical line, wrapping it to the configured width.
    ///
    /// Breaks prefer the rightmost unescaped space that keeps the line within
    /// the width; failing that, the first unescaped space past it. Lines with
    /// no unescaped space are written unbroken. Continuation lines are indented
    /// two levels deeper than the first.
    fn line(&mut self, text: &str, indent: usize) -> Result<(), NinjaGenError> {
        if text.contains(['\n', '\r']) {
            return Err(NinjaGenError::UnescapableText {
                text: text.to_owned(),
            });
        }
        let mut leading = "  ".repeat(indent);
        let mut rest = text;
        while leading.len() + rest.len() > self.width {
            let available = self
                .width
                .saturating_sub(leading.len() + CONTINUATION.len());
            let Some(split) =
                last_break_before(rest, available).or_else(|| first_break_from(rest, available))
            else {
                break;
            };
            let (Some(head), Some(tail)) = (rest.get(..split), rest.get(split + 1..)) else {
                break;
            };
            writeln!(self.out, "{leading}{head}{CONTINUATION}")?;
            rest = tail;
            leading = "  ".repeat(indent + 2);
        }
        writeln!(self.out, "{leading}{rest}")?;
        Ok(())
    }
}
