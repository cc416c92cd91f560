//! The absolute-path downgrade heuristic.
//!
//! Applied only to commands that already matched an auto-approve
//! pattern. Conservative by design: it would rather push a legitimate
//! `ls /tmp` into require-approval than let a command reach outside
//! the workspace unnoticed.

use std::collections::HashSet;

const CODE_MARKERS: &[char] = &['|', '<', '>', ';', '`', '\'', '"', '#', '+'];
const TERMINATORS: &[char] = &[':', '=', ',', ';'];
const REGEX_METACHARACTERS: &str = "^$*+?[](){}|\\.";
const SAFE_DEV_PATHS: &[&str] = &["/dev/null", "/dev/stdin", "/dev/stdout", "/dev/stderr"];

/// Whether `command` contains an argument that looks like an absolute
/// filesystem path, once `sed`/`perl` regex arguments are excluded.
pub fn has_absolute_path_argument(command: &str) -> bool {
    let tokens = tokenize(command);
    let skip = sed_or_perl_regex_arg_indices(&tokens);

    for (i, token) in tokens.iter().enumerate() {
        if skip.contains(&i) {
            continue;
        }
        let chars: Vec<char> = token.chars().collect();
        for start in path_starts(&chars) {
            let candidate = extract_candidate(&chars, start);
            if is_real_path_candidate(&candidate) {
                return true;
            }
        }
    }
    false
}

/// Quote-aware splitter that additionally tracks `$(...)` nesting and
/// never splits inside it (a path inside a substitution is evaluated
/// as one argument at runtime, not several tokens).
fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut subst_depth = 0usize;

    let mut chars = command.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            in_token = true;
            if c == q {
                quote = None;
            }
            continue;
        }
        if subst_depth > 0 {
            current.push(c);
            in_token = true;
            match c {
                '(' => subst_depth += 1,
                ')' => subst_depth -= 1,
                _ => {},
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
                in_token = true;
            },
            '$' if chars.peek() == Some(&'(') => {
                current.push(c);
                current.push(chars.next().expect("peeked"));
                subst_depth = 1;
                in_token = true;
            },
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    in_token = true;
                }
            },
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            },
            _ => {
                current.push(c);
                in_token = true;
            },
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

fn basename(token: &str) -> &str {
    token.rsplit('/').next().unwrap_or(token)
}

fn unquoted(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            return &token[1..token.len() - 1];
        }
    }
    token
}

fn sed_or_perl_regex_arg_indices(tokens: &[String]) -> HashSet<usize> {
    let mut skip = HashSet::new();
    let Some(first) = tokens.first() else {
        return skip;
    };

    match basename(first) {
        "sed" => {
            for (i, token) in tokens.iter().enumerate().skip(1) {
                if token.starts_with('-') {
                    continue;
                }
                let inner = unquoted(token);
                if inner.starts_with(['s', 'y', '/']) || inner.starts_with(|c: char| c.is_ascii_digit()) {
                    skip.insert(i);
                }
                break;
            }
        },
        "perl" => {
            for (i, token) in tokens.iter().enumerate() {
                if token == "-e" {
                    if tokens.get(i + 1).is_some() {
                        skip.insert(i + 1);
                    }
                } else if matches!(token.as_str(), "-p" | "-n" | "-pe" | "-ne" | "-pie" | "-pi") {
                    if let Some(next) = tokens.get(i + 1) {
                        let inner = unquoted(next);
                        if inner.starts_with("s/") || inner.starts_with("tr/") || inner.starts_with("y/") {
                            skip.insert(i + 1);
                        }
                    }
                }
            }
        },
        _ => {},
    }
    skip
}

fn path_starts(token: &[char]) -> Vec<usize> {
    let mut starts = Vec::new();
    for i in 0..token.len() {
        if token[i] != '/' {
            continue;
        }
        let at_start = i == 0 || matches!(token[i - 1], '=' | ':' | ')');
        if !at_start {
            continue;
        }
        // `scheme://host` — the '/' immediately follows ':' and is itself
        // followed by another '/'; that's a URL scheme, not a local path.
        if i > 0 && token[i - 1] == ':' && token.get(i + 1) == Some(&'/') {
            continue;
        }
        starts.push(i);
    }
    starts
}

fn extract_candidate(token: &[char], start: usize) -> String {
    let mut end = start;
    while end < token.len() && !TERMINATORS.contains(&token[end]) {
        end += 1;
    }
    token[start..end].iter().collect()
}

fn is_real_path_candidate(candidate: &str) -> bool {
    if candidate.chars().any(|c| CODE_MARKERS.contains(&c)) {
        return false;
    }

    if candidate.len() >= 2 && candidate.starts_with('/') && candidate.ends_with('/') {
        let inner = &candidate[1..candidate.len() - 1];
        if !inner.contains('/') && inner.chars().any(|c| REGEX_METACHARACTERS.contains(c)) {
            return false;
        }
    }

    for safe in SAFE_DEV_PATHS {
        if candidate == *safe || candidate.starts_with(&format!("{safe}/")) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_absolute_path_triggers_downgrade() {
        assert!(has_absolute_path_argument("cat /etc/passwd"));
    }

    #[test]
    fn relative_path_does_not_trigger() {
        assert!(!has_absolute_path_argument("cat ./README.md"));
        assert!(!has_absolute_path_argument("ls -la"));
    }

    #[test]
    fn sed_regex_argument_is_excluded() {
        assert!(!has_absolute_path_argument("sed 's/foo/bar/g' file.txt"));
    }

    #[test]
    fn perl_dash_e_regex_argument_is_excluded() {
        assert!(!has_absolute_path_argument("perl -e 's/foo/bar/'"));
    }

    #[test]
    fn url_scheme_is_not_an_absolute_path() {
        assert!(!has_absolute_path_argument("curl https://example.com/data"));
    }

    #[test]
    fn dev_null_is_whitelisted() {
        assert!(!has_absolute_path_argument("cat file > /dev/null"));
    }

    #[test]
    fn path_after_equals_sign_is_detected() {
        assert!(has_absolute_path_argument("dd if=/dev/sda of=backup.img"));
    }

    #[test]
    fn regex_delimited_slashes_are_not_a_path() {
        assert!(!has_absolute_path_argument("awk /^abc$/ file.txt"));
    }
}
