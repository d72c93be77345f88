//! Build graph declarations and their invariants.

use std::collections::HashSet;

use camino::Utf8PathBuf;
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use super::vars::{is_edge_binding, referenced_variables};

/// Name of Ninja's built-in rule for aggregate targets.
pub const PHONY: &str = "phony";

/// A global variable binding.
///
/// Values are literal text; the emitter escapes them so the bound string
/// reaches commands unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Variable name referenced as `$name`.
    pub name: String,
    /// Literal value.
    pub value: String,
}

impl Variable {
    /// Bind `name` to `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named, reusable command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Unique rule name.
    pub name: String,
    /// Command template; may reference declared variables and `$in`/`$out`.
    pub command: String,
    /// Progress message shown by the executor.
    pub description: Option<String>,
    /// Marks the rule that regenerates the build file itself.
    ///
    /// Emitted as `generator = 1`: Ninja leaves generator outputs alone in
    /// `-t clean` and does not rerun them just because the command changed.
    pub generator: bool,
}

impl Rule {
    /// Create a rule with no description.
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            description: None,
            generator: false,
        }
    }

    /// Attach a progress description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the rule as the build file's generator.
    #[must_use]
    pub const fn generator(mut self) -> Self {
        self.generator = true;
        self
    }
}

/// A binding of a rule to concrete outputs and inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Name of the rule that produces the outputs, or [`PHONY`].
    pub rule: String,
    /// Paths or target names produced by the edge.
    pub outputs: Vec<Utf8PathBuf>,
    /// Explicit inputs, available to the rule as `$in`.
    pub inputs: Vec<Utf8PathBuf>,
    /// Inputs that trigger a rebuild without appearing in `$in`.
    pub implicit_inputs: Vec<Utf8PathBuf>,
    /// Inputs that must exist first but never trigger a rebuild.
    pub order_only_deps: Vec<Utf8PathBuf>,
}

impl Edge {
    /// Bind `rule` to `outputs` with no inputs.
    #[must_use]
    pub fn new(rule: impl Into<String>, outputs: Vec<Utf8PathBuf>) -> Self {
        Self {
            rule: rule.into(),
            outputs,
            inputs: Vec::new(),
            implicit_inputs: Vec::new(),
            order_only_deps: Vec::new(),
        }
    }

    /// Set the explicit inputs.
    #[must_use]
    pub fn with_inputs(mut self, inputs: Vec<Utf8PathBuf>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the implicit inputs.
    #[must_use]
    pub fn with_implicit(mut self, implicit_inputs: Vec<Utf8PathBuf>) -> Self {
        self.implicit_inputs = implicit_inputs;
        self
    }

    /// Set the order-only inputs.
    #[must_use]
    pub fn with_order_only(mut self, order_only_deps: Vec<Utf8PathBuf>) -> Self {
        self.order_only_deps = order_only_deps;
        self
    }

    /// Returns `true` when the edge uses Ninja's built-in phony rule.
    #[must_use]
    pub fn is_phony(&self) -> bool {
        self.rule == PHONY
    }
}

/// One entry of the generated file, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `name = value`
    Variable(Variable),
    /// `rule name` with its bindings.
    Rule(Rule),
    /// `build outputs: rule inputs`
    Edge(Edge),
}

/// Errors raised when a declaration would break the graph's invariants.
#[derive(Debug, Error, Diagnostic)]
pub enum IrGenError {
    /// A variable was declared twice.
    #[error("variable '{name}' is declared more than once")]
    #[diagnostic(code(neosh_configure::ir::duplicate_variable))]
    DuplicateVariable {
        /// Repeated variable name.
        name: String,
    },

    /// A rule was declared twice, or shadows the built-in phony rule.
    #[error("rule '{name}' is declared more than once")]
    #[diagnostic(code(neosh_configure::ir::duplicate_rule))]
    DuplicateRule {
        /// Repeated rule name.
        name: String,
    },

    /// A rule command references a variable that is not declared earlier.
    #[error("rule '{rule}' references undeclared variable '{variable}'")]
    #[diagnostic(
        code(neosh_configure::ir::undefined_variable),
        help("declare variables before the rules that use them")
    )]
    UndefinedVariable {
        /// Rule whose command holds the reference.
        rule: String,
        /// Undeclared variable name.
        variable: String,
    },

    /// An edge references a rule that is not declared earlier.
    #[error("build edge for {output} references unknown rule '{rule}'")]
    #[diagnostic(code(neosh_configure::ir::unknown_rule))]
    UnknownRule {
        /// Missing rule name.
        rule: String,
        /// First output of the offending edge.
        output: String,
    },

    /// An edge declares no outputs.
    #[error("build edge using rule '{rule}' has no outputs")]
    #[diagnostic(code(neosh_configure::ir::empty_outputs))]
    EmptyOutputs {
        /// Rule of the offending edge.
        rule: String,
    },

    /// Two edges declare the same output.
    #[error("duplicate build output(s): {}", .outputs.iter().join(", "))]
    #[diagnostic(
        code(neosh_configure::ir::duplicate_output),
        help("each path may be produced by only one build edge")
    )]
    DuplicateOutput {
        /// Outputs already produced by an earlier edge.
        outputs: Vec<String>,
    },
}

/// The ordered declaration list making up one build file.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    declarations: Vec<Declaration>,
    variables: HashSet<String>,
    rules: HashSet<String>,
    outputs: HashSet<Utf8PathBuf>,
}

impl BuildGraph {
    /// Declarations in emission order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Iterate over the build edges in emission order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Edge(edge) => Some(edge),
            Declaration::Variable(_) | Declaration::Rule(_) => None,
        })
    }

    /// Look up a declared rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.declarations.iter().find_map(|decl| match decl {
            Declaration::Rule(rule) if rule.name == name => Some(rule),
            _ => None,
        })
    }

    /// Append a variable declaration.
    ///
    /// # Errors
    ///
    /// Returns [`IrGenError::DuplicateVariable`] if the name is taken.
    pub fn push_variable(&mut self, variable: Variable) -> Result<(), IrGenError> {
        if !self.variables.insert(variable.name.clone()) {
            return Err(IrGenError::DuplicateVariable {
                name: variable.name,
            });
        }
        self.declarations.push(Declaration::Variable(variable));
        Ok(())
    }

    /// Append a rule declaration.
    ///
    /// # Errors
    ///
    /// Returns [`IrGenError::DuplicateRule`] if the name is taken and
    /// [`IrGenError::UndefinedVariable`] if the command references a variable
    /// not declared earlier.
    pub fn push_rule(&mut self, rule: Rule) -> Result<(), IrGenError> {
        if rule.name == PHONY || self.rules.contains(&rule.name) {
            return Err(IrGenError::DuplicateRule { name: rule.name });
        }
        if let Some(variable) = referenced_variables(&rule.command)
            .into_iter()
            .find(|name| !is_edge_binding(name) && !self.variables.contains(*name))
        {
            return Err(IrGenError::UndefinedVariable {
                rule: rule.name.clone(),
                variable: variable.to_owned(),
            });
        }
        self.rules.insert(rule.name.clone());
        self.declarations.push(Declaration::Rule(rule));
        Ok(())
    }

    /// Append a build edge.
    ///
    /// # Errors
    ///
    /// Returns [`IrGenError::EmptyOutputs`] for an edge without outputs,
    /// [`IrGenError::UnknownRule`] when its rule has not been declared, and
    /// [`IrGenError::DuplicateOutput`] when an output is already produced by
    /// an earlier edge.
    pub fn push_edge(&mut self, edge: Edge) -> Result<(), IrGenError> {
        let Some(first) = edge.outputs.first() else {
            return Err(IrGenError::EmptyOutputs { rule: edge.rule });
        };
        if !edge.is_phony() && !self.rules.contains(&edge.rule) {
            return Err(IrGenError::UnknownRule {
                output: first.to_string(),
                rule: edge.rule,
            });
        }
        if let Some(outputs) = find_duplicates(&edge.outputs, &self.outputs) {
            return Err(IrGenError::DuplicateOutput { outputs });
        }
        self.outputs.extend(edge.outputs.iter().cloned());
        self.declarations.push(Declaration::Edge(edge));
        Ok(())
    }
}

/// Outputs of a new edge that are already produced, or repeated within the
/// edge itself.
fn find_duplicates(outputs: &[Utf8PathBuf], seen: &HashSet<Utf8PathBuf>) -> Option<Vec<String>> {
    let mut local = HashSet::new();
    let mut dups: Vec<_> = outputs
        .iter()
        .filter(|out| seen.contains(*out) || !local.insert(*out))
        .map(ToString::to_string)
        .collect();
    if dups.is_empty() {
        None
    } else {
        dups.sort();
        dups.dedup();
        Some(dups)
    }
}
