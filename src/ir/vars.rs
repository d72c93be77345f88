//! Variable reference scanning for rule command templates.

/// Variables Ninja binds per edge; rules may use them without a declaration.
const EDGE_BINDINGS: [&str; 3] = ["in", "out", "in_newline"];

/// Returns whether `ch` may appear in an unbraced `$name` reference.
///
/// # Examples
/// ```rust,ignore
/// assert!(is_simple_varname_char('a'));
/// assert!(is_simple_varname_char('-'));
/// assert!(!is_simple_varname_char('.'));
/// ```
const fn is_simple_varname_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')
}

/// Collect the variable names referenced by `template`, in order of
/// appearance.
///
/// Both `$name` and `${name}` forms are recognised. Escapes (`$$`, `$ `,
/// `$:`) and line continuations are skipped. An unterminated `${` ends the
/// scan.
pub(crate) fn referenced_variables(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        let after = rest.get(pos + 1..).unwrap_or_default();
        if let Some(braced) = after.strip_prefix('{') {
            let Some(end) = braced.find('}') else {
                break;
            };
            names.push(braced.get(..end).unwrap_or_default());
            rest = braced.get(end + 1..).unwrap_or_default();
            continue;
        }
        let len = after
            .find(|ch: char| !is_simple_varname_char(ch))
            .unwrap_or(after.len());
        if len == 0 {
            let skip = after.chars().next().map_or(0, char::len_utf8);
            rest = after.get(skip..).unwrap_or_default();
            continue;
        }
        names.push(after.get(..len).unwrap_or_default());
        rest = after.get(len..).unwrap_or_default();
    }
    names
}

/// Returns `true` when `name` is bound by Ninja for every edge.
pub(crate) fn is_edge_binding(name: &str) -> bool {
    EDGE_BINDINGS.contains(&name)
}
