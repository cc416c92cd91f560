//! Shell script decomposition.
//!
//! Parses a free-form shell script into the ordered list of effective
//! commands it will execute, including commands hidden inside `-c`
//! strings, command substitutions, `xargs`/`find -exec` arguments,
//! script-file invocations, and the common wrappers (`sudo`, `env`,
//! `ssh host "..."`, `timeout`, `flock`, ...).

mod grammar;
mod wrappers;

use tree_sitter::Node;

/// Returns the outer command text(s) appearing in `script`, followed
/// by any inner commands the script will cause to execute.
///
/// Preserves discovery order (outer before inner, left-to-right
/// within the tree walk). May contain duplicates by design — both the
/// wrapper text and its extracted inner form are independently policy
/// checked. Empty for empty/whitespace-only input or scripts the bash
/// grammar can't parse.
pub fn extract_commands(script: &str) -> Vec<String> {
    let Some(tree) = grammar::parse(script) else {
        return Vec::new();
    };
    if grammar::has_error(&tree) {
        return Vec::new();
    }

    let mut out = Vec::new();
    visit(tree.root_node(), script, &mut out);
    out
}

fn node_text<'a>(node: Node<'_>, src: &'a str) -> &'a str {
    node.utf8_text(src.as_bytes()).unwrap_or("")
}

fn followed_by_background(node: Node<'_>) -> bool {
    node.next_sibling().is_some_and(|sib| sib.kind() == "&")
}

fn visit(node: Node<'_>, src: &str, out: &mut Vec<String>) {
    match node.kind() {
        "command" => {
            let mut text = node_text(node, src).to_string();
            if followed_by_background(node) {
                text.push_str(" &");
            }
            out.push(text.clone());

            for sub in collect_substitutions(node) {
                visit(sub, src, out);
            }

            expand_wrappers(&text, out);
        },
        "redirected_statement" => {
            let mut text = node_text(node, src).to_string();
            if followed_by_background(node) {
                text.push_str(" &");
            }
            out.push(text);

            for sub in collect_substitutions(node) {
                visit(sub, src, out);
            }
        },
        "subshell" | "command_substitution" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                visit(child, src, out);
            }
        },
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                visit(child, src, out);
            }
        },
    }
}

/// Finds every `command_substitution` node reachable from `node`
/// without descending through another `command_substitution` already
/// found (that one's own walk will pick up anything nested inside it).
fn collect_substitutions<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut found = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        gather_substitutions(child, &mut found);
    }
    found
}

fn gather_substitutions<'a>(node: Node<'a>, found: &mut Vec<Node<'a>>) {
    if node.kind() == "command_substitution" {
        found.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        gather_substitutions(child, found);
    }
}

fn expand_wrappers(command_text: &str, out: &mut Vec<String>) {
    let tokens = wrappers::split_tokens(command_text);
    match wrappers::expand(&tokens) {
        Some(wrappers::Expansion::Recurse(inner)) => out.extend(extract_commands(&inner)),
        Some(wrappers::Expansion::EmitPath(path)) => out.push(path),
        None => {},
    }
}
