//! Constructors for the rules and edges of the generated build file.
//!
//! Every function here is pure: the same arguments always yield the same
//! declarations. Paths embedded in commands are shell-quoted when they contain
//! anything beyond a conservative safe set, then have `$` escaped for Ninja.

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use shell_quote::{QuoteRefExt, Sh};

use crate::ir::{Edge, PHONY, Rule};

/// Rule that creates the build directory.
pub const BUILDDIR_RULE: &str = "builddir";
/// Rule that removes the build directory.
pub const BUILDDIR_CLEAN_RULE: &str = "builddir_clean";
/// Rule that regenerates the build file.
pub const SELF_RULE: &str = "self";

/// Returns `true` for characters that never need shell quoting.
fn is_shell_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '/' | '+' | ',' | '=' | '@' | '%')
}

/// Quote `word` so a POSIX shell reads it back as one word.
///
/// Words made only of safe characters are returned unchanged.
pub(crate) fn shell_word(word: &str) -> String {
    if !word.is_empty() && word.chars().all(is_shell_safe) {
        return word.to_owned();
    }
    let bytes: Vec<u8> = word.quoted(Sh);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Render `word` as a single shell word inside a Ninja command.
///
/// # Examples
/// ```rust,ignore
/// assert_eq!(command_word("/src/build"), "/src/build");
/// assert_ne!(command_word("/my src/build"), "/my src/build");
/// ```
fn command_word(word: &str) -> String {
    escape_dollars(&shell_word(word))
}

/// Escape `$` so Ninja passes it through literally.
fn escape_dollars(text: &str) -> String {
    text.replace('$', "$$")
}

/// The rules that create and remove the directory at `path`.
///
/// The first rule runs `$mkdir $mkdir_flags <path>`, the second
/// `$rm $rm_flags <path>`; both mention the path in their description.
#[must_use]
pub fn directory_lifecycle_rules(path: &Utf8Path) -> [Rule; 2] {
    let word = command_word(path.as_str());
    let shown = escape_dollars(path.as_str());
    [
        Rule::new(BUILDDIR_RULE, format!("$mkdir $mkdir_flags {word}"))
            .with_description(format!("Creating {shown} directory")),
        Rule::new(BUILDDIR_CLEAN_RULE, format!("$rm $rm_flags {word}"))
            .with_description(format!("Cleaning {shown} directory")),
    ]
}

/// The edge that materialises the directory at `path`.
#[must_use]
pub fn directory_edge(path: &Utf8Path) -> Edge {
    Edge::new(BUILDDIR_RULE, vec![path.to_owned()])
}

/// The edge that removes the build directory under the target name `name`.
#[must_use]
pub fn clean_edge(name: &str) -> Edge {
    Edge::new(BUILDDIR_CLEAN_RULE, vec![Utf8PathBuf::from(name)])
}

/// The generator rule and the edge producing the build file itself.
///
/// The rule runs `$<interpreter> <args...>` and is flagged as a generator.
/// The edge's only output is `output`; `tracked` become implicit inputs so a
/// change to any of them reruns the generator.
#[must_use]
pub fn self_regeneration_rule_and_edge(
    interpreter: &str,
    args: &[String],
    output: &Utf8Path,
    tracked: &[Utf8PathBuf],
) -> (Rule, Edge) {
    let command = std::iter::once(format!("${interpreter}"))
        .chain(args.iter().map(|arg| command_word(arg)))
        .join(" ");
    let name = output.file_name().unwrap_or(output.as_str());
    let rule = Rule::new(SELF_RULE, command)
        .with_description(format!("Reconfiguring {}", escape_dollars(name)))
        .generator();
    let edge = Edge::new(SELF_RULE, vec![output.to_owned()]).with_implicit(tracked.to_vec());
    (rule, edge)
}

/// A phony edge grouping `implicit_targets` under `name`.
///
/// An empty target list is legal and yields a no-op target.
#[must_use]
pub fn aggregate_edge(name: &str, implicit_targets: &[Utf8PathBuf]) -> Edge {
    Edge::new(PHONY, vec![Utf8PathBuf::from(name)]).with_implicit(implicit_targets.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn lifecycle_rules_embed_path() {
        let [create, remove] = directory_lifecycle_rules(Utf8Path::new("/src/neosh/build"));
        assert_eq!(create.name, BUILDDIR_RULE);
        assert_eq!(create.command, "$mkdir $mkdir_flags /src/neosh/build");
        assert_eq!(
            create.description.as_deref(),
            Some("Creating /src/neosh/build directory")
        );
        assert_eq!(remove.name, BUILDDIR_CLEAN_RULE);
        assert_eq!(remove.command, "$rm $rm_flags /src/neosh/build");
        assert_eq!(
            remove.description.as_deref(),
            Some("Cleaning /src/neosh/build directory")
        );
        assert!(!create.generator && !remove.generator);
    }

    #[rstest]
    #[case("/my src/build")]
    #[case("/cost$/build")]
    #[case("/it's/build")]
    fn lifecycle_rules_quote_unsafe_paths(#[case] path: &str) {
        let [create, _] = directory_lifecycle_rules(Utf8Path::new(path));
        let word = create
            .command
            .strip_prefix("$mkdir $mkdir_flags ")
            .expect("command prefix");
        assert_ne!(word, path, "unsafe path should be quoted");
        assert!(word.contains("/build"), "path lost in {word}");
        assert!(
            !word.replace("$$", "").contains('$'),
            "unescaped dollar in {word}"
        );
    }

    #[cfg(unix)]
    #[rstest]
    #[case("/bin/configure")]
    #[case("/opt/my tools/configure")]
    #[case("/opt/it's/configure")]
    fn shell_word_survives_the_shell(#[case] word: &str) {
        let out = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("printf '%s' {}", shell_word(word)))
            .output()
            .expect("run sh");
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout), word);
    }

    #[rstest]
    fn description_escapes_dollars() {
        let [create, _] = directory_lifecycle_rules(Utf8Path::new("/a$b"));
        assert_eq!(create.description.as_deref(), Some("Creating /a$$b directory"));
    }

    #[rstest]
    fn self_regeneration_is_generator() {
        let tracked = vec![Utf8PathBuf::from("/p/toolchain.json")];
        let (rule, edge) = self_regeneration_rule_and_edge(
            "configure",
            &["-C".to_owned(), "/p".to_owned()],
            Utf8Path::new("/p/build.ninja"),
            &tracked,
        );
        assert_eq!(rule.name, SELF_RULE);
        assert_eq!(rule.command, "$configure -C /p");
        assert_eq!(rule.description.as_deref(), Some("Reconfiguring build.ninja"));
        assert!(rule.generator);
        assert_eq!(edge.rule, SELF_RULE);
        assert_eq!(edge.outputs, [Utf8PathBuf::from("/p/build.ninja")]);
        assert!(edge.inputs.is_empty());
        assert_eq!(edge.implicit_inputs, tracked);
    }

    #[rstest]
    fn self_regeneration_without_args() {
        let (rule, _) =
            self_regeneration_rule_and_edge("configure", &[], Utf8Path::new("build.ninja"), &[]);
        assert_eq!(rule.command, "$configure");
    }

    #[rstest]
    fn aggregate_edge_is_phony() {
        let edge = aggregate_edge("all", &[Utf8PathBuf::from("build/neosh")]);
        assert!(edge.is_phony());
        assert_eq!(edge.outputs, [Utf8PathBuf::from("all")]);
        assert_eq!(edge.implicit_inputs, [Utf8PathBuf::from("build/neosh")]);
        assert!(edge.inputs.is_empty());
    }

    #[rstest]
    fn empty_aggregate_edge_is_legal() {
        let edge = aggregate_edge("nothing", &[]);
        assert!(edge.is_phony());
        assert!(edge.implicit_inputs.is_empty());
    }

    #[rstest]
    fn clean_edge_uses_removal_rule() {
        let edge = clean_edge("clean");
        assert_eq!(edge.rule, BUILDDIR_CLEAN_RULE);
        assert_eq!(edge.outputs, [Utf8PathBuf::from("clean")]);
    }

    #[rstest]
    fn directory_edge_outputs_the_directory() {
        let edge = directory_edge(Utf8Path::new("/p/build"));
        assert_eq!(edge.rule, BUILDDIR_RULE);
        assert_eq!(edge.outputs, [Utf8PathBuf::from("/p/build")]);
    }
}
