//! Wrapper-expansion table.
//!
//! Encodes each wrapper command's "kind" as data rather than a long
//! `if`/`else` cascade. Each kind knows how to compute the *inner*
//! command text hidden behind the wrapper; the caller
//! (`extractor::visit`) feeds that text back through `extract_commands`
//! to pick up further layers of wrapping.

use once_cell::sync::Lazy;
use regex::Regex;

/// What a wrapper's expansion produced.
pub enum Expansion {
    /// Recursively extract commands from this inner script/command text.
    Recurse(String),
    /// A script-file path to run as a single additional command, with
    /// no further recursive extraction (it names a file, not inline
    /// shell text).
    EmitPath(String),
}

static ENV_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=").unwrap());

/// Splits `text` into whitespace-separated tokens, honoring `'...'`
/// and `"..."` quoting and backslash escapes. Never fails: malformed
/// quoting just changes where token boundaries land, per spec.
pub fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                for c2 in chars.by_ref() {
                    if c2 == '\'' {
                        break;
                    }
                    current.push(c2);
                }
            },
            '"' => {
                in_token = true;
                while let Some(c2) = chars.next() {
                    match c2 {
                        '"' => break,
                        '\\' => {
                            if let Some(&c3) = chars.peek() {
                                if matches!(c3, '"' | '\\' | '$' | '`') {
                                    current.push(c3);
                                    chars.next();
                                } else {
                                    current.push('\\');
                                }
                            } else {
                                current.push('\\');
                            }
                        },
                        other => current.push(other),
                    }
                }
            },
            '\\' => {
                in_token = true;
                if let Some(c2) = chars.next() {
                    current.push(c2);
                }
            },
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            },
            c => {
                in_token = true;
                current.push(c);
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

/// Strips a single matching pair of outer `'`/`"` quotes, if present.
fn unquote(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'\'' || first == b'"') && first == last {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

fn is_env_assignment(token: &str) -> bool {
    ENV_ASSIGNMENT.is_match(token)
}

/// Scans for a literal `-c` token anywhere in `tokens[1..]` and
/// returns the token right after it, if any.
fn find_dash_c_arg(tokens: &[String]) -> Option<&str> {
    tokens
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, t)| t.as_str() == "-c")
        .and_then(|(i, _)| tokens.get(i + 1))
        .map(String::as_str)
}

/// `capsh -- -c "script"`: only this exact shape is recognised.
fn find_capsh_c_arg(tokens: &[String]) -> Option<&str> {
    let dash_dash = tokens.iter().position(|t| t == "--")?;
    if tokens.get(dash_dash + 1).map(String::as_str) != Some("-c") {
        return None;
    }
    tokens.get(dash_dash + 2).map(String::as_str)
}

/// Skips leading `-*` flags starting at `tokens[1..]`, then reads a
/// script path as the next token. Prepends `./` if the path is not
/// already absolute or explicitly relative.
fn script_file_invocation(tokens: &[String]) -> Option<Expansion> {
    let mut idx = 1;
    while idx < tokens.len() && tokens[idx].starts_with('-') {
        idx += 1;
    }
    let path = tokens.get(idx)?;
    let path = if path.starts_with('/') || path.starts_with("./") || path.starts_with("../") {
        path.clone()
    } else {
        format!("./{path}")
    };
    Some(Expansion::EmitPath(path))
}

/// Generic "skip flags (consuming a value token for known
/// flags-with-args, and also for unknown flags per spec's
/// lean-toward-ambiguity rule), then emit the remainder" wrapper.
fn flagged_wrapper(tokens: &[String], flags_with_args: &[&str]) -> Option<Expansion> {
    let mut idx = 1;
    while idx < tokens.len() {
        let t = &tokens[idx];
        if !t.starts_with('-') {
            break;
        }
        if t.contains('=') {
            // combined --flag=value form consumes only itself
            idx += 1;
        } else if flags_with_args.contains(&t.as_str()) {
            idx += 2;
        } else {
            // unknown -x flags are conservatively assumed to take a value too
            idx += 2;
        }
    }
    if idx >= tokens.len() {
        return None;
    }
    Some(Expansion::Recurse(tokens[idx..].join(" ")))
}

/// Like [`flagged_wrapper`], but after flags, skips `n_positional`
/// plain tokens before the tail begins.
fn positional_wrapper(tokens: &[String], n_positional: usize, flags_with_args: &[&str]) -> Option<Expansion> {
    let mut idx = 1;
    while idx < tokens.len() && tokens[idx].starts_with('-') {
        if tokens[idx].contains('=') {
            idx += 1;
        } else if flags_with_args.contains(&tokens[idx].as_str()) {
            idx += 2;
        } else {
            idx += 1;
        }
    }
    for _ in 0..n_positional {
        if idx < tokens.len() {
            idx += 1;
        }
    }
    if idx >= tokens.len() {
        return None;
    }
    Some(Expansion::Recurse(tokens[idx..].join(" ")))
}

fn simple_wrapper(tokens: &[String]) -> Option<Expansion> {
    if tokens.len() <= 1 {
        return None;
    }
    Some(Expansion::Recurse(tokens[1..].join(" ")))
}

fn env_wrapper(tokens: &[String]) -> Option<Expansion> {
    let mut idx = 1;
    while idx < tokens.len() {
        let t = &tokens[idx];
        if t.starts_with('-') || is_env_assignment(t) {
            idx += 1;
        } else {
            break;
        }
    }
    if idx >= tokens.len() {
        return None;
    }
    Some(Expansion::Recurse(tokens[idx..].join(" ")))
}

fn eval_wrapper(tokens: &[String]) -> Option<Expansion> {
    if tokens.len() <= 1 {
        return None;
    }
    let joined = tokens[1..].join(" ");
    Some(Expansion::Recurse(unquote(&joined)))
}

fn exec_wrapper(tokens: &[String]) -> Option<Expansion> {
    if tokens.len() <= 1 {
        return None;
    }
    Some(Expansion::Recurse(tokens[1..].join(" ")))
}

const XARGS_ARG_FLAGS: &[&str] = &["-I", "-n", "-P", "-L", "-s", "-a", "-E", "-d"];

fn xargs_wrapper(tokens: &[String]) -> Option<Expansion> {
    let mut idx = 1;
    while idx < tokens.len() && tokens[idx].starts_with('-') {
        if XARGS_ARG_FLAGS.contains(&tokens[idx].as_str()) {
            idx += 2;
        } else {
            idx += 1;
        }
    }
    if idx >= tokens.len() {
        return None;
    }
    Some(Expansion::Recurse(tokens[idx..].join(" ")))
}

fn ssh_wrapper(tokens: &[String]) -> Option<Expansion> {
    const SSH_ARG_FLAGS: &[&str] = &["-p", "-i", "-o", "-l", "-F", "-L", "-R"];
    match positional_wrapper(tokens, 1, SSH_ARG_FLAGS)? {
        Expansion::Recurse(tail) => Some(Expansion::Recurse(tail)),
        other => Some(other),
    }
}

fn find_exec_wrapper(tokens: &[String]) -> Option<Expansion> {
    let action_idx = tokens
        .iter()
        .position(|t| matches!(t.as_str(), "-exec" | "-execdir" | "-ok" | "-okdir"))?;
    let start = action_idx + 1;
    let mut end = tokens.len();
    for (i, t) in tokens.iter().enumerate().skip(start) {
        if t == ";" || t == "+" {
            end = i;
            break;
        }
    }
    if start >= end {
        return None;
    }
    Some(Expansion::Recurse(tokens[start..end].join(" ")))
}

fn fd_exec_wrapper(tokens: &[String]) -> Option<Expansion> {
    let idx = tokens.iter().position(|t| t == "-x")?;
    let start = idx + 1;
    if start >= tokens.len() {
        return None;
    }
    Some(Expansion::Recurse(tokens[start..].join(" ")))
}

/// Dispatches on the (basename of the) first token of `tokens` and
/// computes the wrapper's expansion, if any.
pub fn expand(tokens: &[String]) -> Option<Expansion> {
    if tokens.is_empty() {
        return None;
    }
    let head = basename(&tokens[0]);
    match head {
        "sh" | "bash" | "zsh" => {
            if let Some(script) = find_dash_c_arg(tokens) {
                Some(Expansion::Recurse(unquote(script)))
            } else {
                script_file_invocation(tokens)
            }
        },
        "source" | "." => script_file_invocation(tokens),
        "su" => {
            if let Some(script) = find_dash_c_arg(tokens) {
                Some(Expansion::Recurse(unquote(script)))
            } else {
                flagged_wrapper(tokens, &["-u"])
            }
        },
        "capsh" => find_capsh_c_arg(tokens).map(|script| Expansion::Recurse(unquote(script))),
        "flock" => {
            if let Some(script) = find_dash_c_arg(tokens) {
                Some(Expansion::Recurse(unquote(script)))
            } else {
                positional_wrapper(tokens, 1, &["-w"])
            }
        },
        "eval" => eval_wrapper(tokens),
        "exec" => exec_wrapper(tokens),
        "xargs" => xargs_wrapper(tokens),
        "nohup" | "doas" | "command" | "builtin" | "time" | "ltrace" | "dbus-run-session" | "watch" | "entr"
        | "parallel" | "systemd-run" | "lima" => simple_wrapper(tokens),
        "env" => env_wrapper(tokens),
        "sudo" => flagged_wrapper(tokens, &["-u", "-g", "-C", "-p"]),
        "runuser" => flagged_wrapper(tokens, &["-u", "-g"]),
        "nice" => flagged_wrapper(tokens, &["-n"]),
        "ionice" => flagged_wrapper(tokens, &["-c", "-n"]),
        "stdbuf" => flagged_wrapper(tokens, &["-i", "-o", "-e"]),
        "strace" => flagged_wrapper(tokens, &["-p", "-o", "-e"]),
        "setpriv" => flagged_wrapper(tokens, &["--reuid", "--regid", "--bounding-set", "--securebits"]),
        "cgexec" => flagged_wrapper(tokens, &["-g"]),
        "timeout" => positional_wrapper(tokens, 1, &["-k", "-s"]),
        "ssh" => ssh_wrapper(tokens),
        "find" => find_exec_wrapper(tokens),
        "fd" => fd_exec_wrapper(tokens),
        _ => None,
    }
}
