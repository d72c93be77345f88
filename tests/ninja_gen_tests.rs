//! Unit tests for Ninja file generation through the public graph API.

use camino::Utf8PathBuf;
use neosh_configure::ir::{BuildGraph, Edge, PHONY, Rule, Variable};
use neosh_configure::ninja_gen::{DEFAULT_WIDTH, NinjaGenError, generate};
use rstest::rstest;

fn paths(items: &[&str]) -> Vec<Utf8PathBuf> {
    items.iter().map(Utf8PathBuf::from).collect()
}

#[rstest]
fn generate_rule_and_edge() {
    let mut graph = BuildGraph::default();
    graph
        .push_variable(Variable::new("touch", "touch"))
        .expect("variable");
    graph
        .push_rule(Rule::new("stamp", "$touch $out").with_description("Stamping $out"))
        .expect("rule");
    graph
        .push_edge(Edge::new("stamp", paths(&["out"])).with_inputs(paths(&["in"])))
        .expect("edge");

    let ninja = generate(&graph, DEFAULT_WIDTH).expect("generate");
    let expected = concat!(
        "touch = touch\n",
        "\n",
        "rule stamp\n",
        "  command = $touch $out\n",
        "  description = Stamping $out\n",
        "\n",
        "build out: stamp in\n",
        "\n",
    );
    assert_eq!(ninja, expected);
}

#[rstest]
fn generate_all_dependency_kinds() {
    let mut graph = BuildGraph::default();
    graph.push_rule(Rule::new("cc", "cc $in -o $out")).expect("rule");
    graph
        .push_edge(
            Edge::new("cc", paths(&["a.o"]))
                .with_inputs(paths(&["a.c"]))
                .with_implicit(paths(&["a.h"]))
                .with_order_only(paths(&["gen"])),
        )
        .expect("edge");
    let ninja = generate(&graph, DEFAULT_WIDTH).expect("generate");
    assert!(ninja.contains("build a.o: cc a.c | a.h || gen\n"), "{ninja}");
}

#[rstest]
fn special_characters_in_paths_are_escaped() {
    let mut graph = BuildGraph::default();
    graph
        .push_edge(Edge::new(PHONY, paths(&["c:/out dir/$x"])))
        .expect("edge");
    let ninja = generate(&graph, DEFAULT_WIDTH).expect("generate");
    assert_eq!(ninja, "build c$:/out$ dir/$$x: phony\n\n");
}

#[rstest]
fn multi_line_commands_are_rejected() {
    let mut graph = BuildGraph::default();
    graph
        .push_rule(Rule::new("bad", "echo one\necho two"))
        .expect("rule");
    let err = generate(&graph, DEFAULT_WIDTH).expect_err("line break");
    assert!(matches!(err, NinjaGenError::UnescapableText { .. }), "{err:?}");
}
