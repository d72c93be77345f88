//! Build graph assembly.
//!
//! [`assemble`] turns a [`GeneratorConfig`] and a validated
//! [`ToolchainDescriptor`] into the complete declaration sequence of the
//! build file. The order is fixed so every variable and rule is declared
//! before its first use:
//!
//! 1. the generator interpreter variable,
//! 2. the toolchain variables,
//! 3. the directory-creation rule,
//! 4. the directory-removal rule,
//! 5. the self-regeneration rule and its edge,
//! 6. the `clean` edge,
//! 7. the build-directory edge and the phony `all` edge.

use crate::config::GeneratorConfig;
use crate::ir::{BuildGraph, IrGenError, Variable};
use crate::rules::{
    aggregate_edge, clean_edge, directory_edge, directory_lifecycle_rules,
    self_regeneration_rule_and_edge, shell_word,
};
use crate::toolchain::ToolchainDescriptor;

/// Variable holding the generator executable.
pub const INTERPRETER_VAR: &str = "configure";
/// Target that removes the build directory.
pub const CLEAN_TARGET: &str = "clean";
/// Aggregate target depending on the primary build product.
pub const ALL_TARGET: &str = "all";

/// Assemble the build graph for `toolchain` under `config`.
///
/// # Errors
///
/// Returns [`IrGenError::DuplicateOutput`] when configured paths collide
/// (for example a build directory equal to the build file), or another
/// [`IrGenError`] if a declaration breaks the graph invariants.
///
/// # Examples
///
/// ```
/// use neosh_configure::{assemble::assemble, config::GeneratorConfig};
/// use neosh_configure::toolchain::ToolchainDescriptor;
///
/// let toolchain = ToolchainDescriptor::from_json_str(
///     r#"{"mkdir":"mkdir","mkdir_flags":"-p","rm":"rm","rm_flags":"-rf"}"#,
///     "toolchain.json",
/// )?;
/// let config = GeneratorConfig::new("/src/neosh".into(), "/usr/bin/configure".into());
/// let graph = assemble(&config, &toolchain)?;
/// assert_eq!(graph.edges().count(), 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn assemble(
    config: &GeneratorConfig,
    toolchain: &ToolchainDescriptor,
) -> Result<BuildGraph, IrGenError> {
    let mut graph = BuildGraph::default();

    // The variable is expanded unquoted into the regeneration command.
    graph.push_variable(Variable::new(
        INTERPRETER_VAR,
        shell_word(config.generator().as_str()),
    ))?;
    for (name, value) in toolchain.variables() {
        graph.push_variable(Variable::new(name, value))?;
    }

    let [create, remove] = directory_lifecycle_rules(config.build_dir());
    graph.push_rule(create)?;
    graph.push_rule(remove)?;

    let tracked = [
        config.toolchain_file().to_owned(),
        config.generator().to_owned(),
    ];
    let (regenerate, regenerate_edge) = self_regeneration_rule_and_edge(
        INTERPRETER_VAR,
        config.generator_args(),
        config.ninja_file(),
        &tracked,
    );
    graph.push_rule(regenerate)?;
    graph.push_edge(regenerate_edge)?;

    graph.push_edge(clean_edge(CLEAN_TARGET))?;

    graph.push_edge(directory_edge(config.build_dir()))?;
    graph.push_edge(
        aggregate_edge(ALL_TARGET, &[config.product()])
            .with_order_only(vec![config.build_dir().to_owned()]),
    )?;

    Ok(graph)
}
