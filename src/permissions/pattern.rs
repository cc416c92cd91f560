//! Pattern matching and message interpolation.

use once_cell::sync::Lazy;
use regex::Regex;

const METACHARACTERS: &[char] = &['\\', '.', '*', '+', '?', '[', ']', '(', ')', '{', '}', '|', '^', '$'];

fn is_regex_pattern(pattern: &str) -> bool {
    pattern.chars().any(|c| METACHARACTERS.contains(&c))
}

/// Matches `pattern` against `command`.
///
/// A literal prefix match always wins first, even for patterns that
/// also contain regex metacharacters. Only once that fails does a
/// metacharacter-free pattern give up (it can never match anything but
/// a prefix); otherwise the pattern is anchored at the start and
/// compiled as a regex. A regex compile failure is treated as a
/// non-match rather than propagated.
pub fn match_pattern(pattern: &str, command: &str) -> Option<Vec<String>> {
    if let Some(stripped) = command.strip_prefix(pattern) {
        let _ = stripped;
        return Some(vec![pattern.to_string()]);
    }
    if !is_regex_pattern(pattern) {
        return None;
    }
    let anchored = if pattern.starts_with('^') { pattern.to_string() } else { format!("^{pattern}") };
    let re = Regex::new(&anchored).ok()?;
    let caps = re.captures(command)?;
    Some(
        (0..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect(),
    )
}

static ENV_VAR_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\?\$(?:[A-Za-z_]|\{)").unwrap());
static ENV_VAR_ASSIGNMENT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\^?[A-Za-z_][A-Za-z0-9_]*=").unwrap());

/// Whether `pattern` itself talks about environment variables (either
/// referencing one like `$HOME` or anchoring on an assignment prefix
/// like `DEBUG=`), in which case env-var-prefix stripping must not be
/// applied when matching it — stripping would make it unmatchable.
pub fn pattern_references_env_vars(pattern: &str) -> bool {
    ENV_VAR_REFERENCE.is_match(pattern) || ENV_VAR_ASSIGNMENT_PREFIX.is_match(pattern)
}

static LEADING_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=\S*\s+").unwrap());

/// Strips any number of leading `VAR=value ` tokens from `command`.
pub fn strip_env_var_prefix(command: &str) -> &str {
    let mut rest = command;
    while let Some(m) = LEADING_ASSIGNMENT.find(rest) {
        if m.start() != 0 {
            break;
        }
        rest = &rest[m.end()..];
    }
    rest
}

/// Substitutes `$0..$9` in `message` with `captures`, highest index
/// first so a longer placeholder is never partially consumed by a
/// shorter one's replacement.
pub fn interpolate_message(message: &str, captures: &[String]) -> String {
    let mut out = message.to_string();
    for i in (0..captures.len().min(10)).rev() {
        out = out.replace(&format!("${i}"), &captures[i]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_prefix_matches_regardless_of_metacharacters() {
        let caps = match_pattern("rm -rf /", "rm -rf /home").unwrap();
        assert_eq!(caps, vec!["rm -rf /"]);
    }

    #[test]
    fn plain_prefix_with_no_metacharacters_is_prefix_only() {
        assert!(match_pattern("git status", "git show").is_none());
    }

    #[test]
    fn regex_pattern_is_anchored_at_start() {
        assert!(match_pattern("rm -rf (.+)", "echo rm -rf /").is_none());
        let caps = match_pattern("rm -rf (.+)", "rm -rf /data").unwrap();
        assert_eq!(caps, vec!["rm -rf /data", "/data"]);
    }

    #[test]
    fn invalid_regex_is_a_non_match() {
        assert!(match_pattern("[unclosed", "[unclosed bracket").is_some()); // literal prefix wins first
        assert!(match_pattern("[unclosed", "nope").is_none());
    }

    #[test]
    fn capture_group_interpolation() {
        let caps = match_pattern("rm -rf (.+)", "rm -rf /data").unwrap();
        assert_eq!(interpolate_message("X $1 Y", &caps), "X /data Y");
    }

    #[test]
    fn env_var_prefix_detection() {
        assert!(pattern_references_env_vars("echo $HOME"));
        assert!(pattern_references_env_vars("DEBUG=1 rm"));
        assert!(!pattern_references_env_vars("go test"));
    }

    #[test]
    fn strip_env_var_prefix_removes_leading_assignments() {
        assert_eq!(strip_env_var_prefix("SIDE_INTEGRATION_TEST=true go test ./..."), "go test ./...");
        assert_eq!(strip_env_var_prefix("A=1 B=2 cmd"), "cmd");
        assert_eq!(strip_env_var_prefix("go test"), "go test");
    }
}
