//! Thin wrapper around the external bash grammar.
//!
//! Keeps the rest of the extractor independent of which concrete
//! tree-sitter grammar crate is in use: callers only see `parse` and
//! `Tree`/`Node` from `tree_sitter`.

use tree_sitter::{Parser, Tree};

/// Parses `script` with the bash grammar.
///
/// Returns `None` if the grammar could not be loaded (never expected
/// in practice) or tree-sitter refused to produce a tree at all (only
/// happens for pathological inputs; malformed-but-partial scripts
/// still produce a tree with `ERROR` nodes, which callers detect via
/// [`has_error`]).
pub fn parse(script: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_bash::LANGUAGE.into())
        .expect("bash grammar failed to load");
    parser.parse(script, None)
}

/// Whether the parsed tree contains a syntax error anywhere.
///
/// Per spec, a script that doesn't actually parse should be treated
/// the same as an unparseable one: the extractor returns no commands,
/// which forces the evaluator's safe `RequireApproval` default.
pub fn has_error(tree: &Tree) -> bool {
    tree.root_node().has_error()
}
