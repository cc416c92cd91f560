//! The hardcoded base ruleset — always the bottom of the merge stack.
//!
//! Reproduces the semantic categories from the external interface
//! contract: read-only tools and build/test invocations auto-approve;
//! secret-exposing, network, and home/parent-traversal commands
//! require approval; catastrophic and privilege-escalating commands
//! are denied outright.

use super::{CommandPattern, PermissionConfig};

fn word(cmd: &str) -> CommandPattern {
    CommandPattern::new(format!(r"^{cmd}(\s|$)"))
}

fn prefix(cmd: &str) -> CommandPattern {
    CommandPattern::new(cmd)
}

fn msg(pattern: &str, message: &str) -> CommandPattern {
    CommandPattern::with_message(pattern, message)
}

const READ_ONLY_TOOLS: &[&str] = &[
    "ls", "cat", "head", "tail", "grep", "find", "wc", "diff", "sort", "uniq", "awk", "sed", "tr", "cut",
    "basename", "dirname", "realpath", "readlink", "pwd", "cd", "tee", "file", "stat", "du", "df", "tree",
    "less", "more", "which", "whoami", "hostname", "uname", "date", "true", "false", "test", "jq", "yq",
    "xxd", "od", "mkdir", "lima",
];

const READ_ONLY_GIT: &[&str] = &[
    "git status",
    "git log",
    "git diff",
    "git branch",
    "git show",
    "git remote",
    "git tag",
    "git describe",
    "git rev-parse",
    "git ls-files",
    "git ls-tree",
    "git cat-file",
    "git blame",
    "git shortlog",
    "git stash list",
];

const BUILD_TEST_INVOCATIONS: &[&str] = &[
    "go test", "go build", "go vet", "go run",
    "npm test", "npm run", "npm install", "npm ci",
    "yarn test", "yarn install",
    "bun test", "bun install",
    "pytest", "pip install", "pip list", "pylint", "flake8", "mypy", "black --check", "isort --check",
    "ruff check",
    "make",
    "cargo build", "cargo test", "cargo check", "cargo run", "cargo clippy",
    "rspec", "rubocop", "bundle list",
    "mvn test", "mvn compile", "mvn verify",
    "gradle test", "gradle build", "gradle check",
];

const NETWORK_FETCHERS: &[&str] = &[
    "curl", "wget", "http", "https", "nc", "netcat", "ncat", "socat", "telnet", "ftp", "sftp", "scp",
    "rsync", "ssh", "ping", "nslookup", "dig", "host",
];

pub fn base_config() -> PermissionConfig {
    let mut auto_approve: Vec<CommandPattern> = READ_ONLY_TOOLS.iter().map(|c| word(c)).collect();
    auto_approve.push(CommandPattern::new(r"^\[(\s|$)"));
    auto_approve.extend(READ_ONLY_GIT.iter().map(|c| prefix(c)));
    auto_approve.extend(BUILD_TEST_INVOCATIONS.iter().map(|c| prefix(c)));

    let mut require_approval: Vec<CommandPattern> = vec![word("env"), word("printenv")];
    require_approval.extend(NETWORK_FETCHERS.iter().map(|c| word(c)));
    require_approval.push(msg(r".*\.envrc?\b", "Reads a .env/.envrc file, which may expose secrets."));
    require_approval.push(CommandPattern::new(r".*system\("));
    require_approval.push(CommandPattern::new(r".*\|\s*getline"));
    require_approval.push(CommandPattern::new(r".*\|&"));
    require_approval.push(CommandPattern::new(r".*/inet/"));
    require_approval.push(CommandPattern::new(r".*print\|"));
    require_approval.push(CommandPattern::new(r".*printf\|"));
    require_approval.push(msg(
        r".*(^|[^a-zA-Z0-9])~($|/| )",
        "Accesses the home directory.",
    ));
    require_approval.push(CommandPattern::new(r".*\$HOME"));
    require_approval.push(CommandPattern::new(r".*\$\{HOME\}"));
    require_approval.push(msg(r".*\.\./", "Traverses outside the current directory."));
    require_approval.push(msg(r".*/dev/(tcp|udp)/", "Opens a raw network socket via shell redirection."));
    require_approval.push(msg(r#".*\bsed\b.*/e(\s|'|"|$)"#, "GNU sed 's///e' executes shell commands."));
    require_approval.push(msg(r".*\bsed\b.*[;\s]e(\s|;|$)", "GNU sed 'e' command executes shell commands."));

    let deny = vec![
        msg(r"^rm\s+-[a-zA-Z]*r[a-zA-Z]*f[a-zA-Z]*\s+/", "Recursively deletes the filesystem root."),
        msg(r"^rm\s+-[a-zA-Z]*f[a-zA-Z]*r[a-zA-Z]*\s+/", "Recursively deletes the filesystem root."),
        msg(r"^rm\s+-[a-zA-Z]*r[a-zA-Z]*f[a-zA-Z]*\s+~", "Recursively deletes the home directory."),
        msg(r"^rm\s+-[a-zA-Z]*f[a-zA-Z]*r[a-zA-Z]*\s+~", "Recursively deletes the home directory."),
        msg("sudo", "Command uses sudo to escalate privileges; refusing to auto-run."),
        msg(r"^su(\s|$)", "Command switches user to escalate privileges; refusing to auto-run."),
        msg(r"^doas(\s|$)", "Command uses doas to escalate privileges; refusing to auto-run."),
        msg("chmod 777", "Grants world-writable permissions."),
        msg("chmod -R 777", "Recursively grants world-writable permissions."),
        msg(r"^mkfs", "Formats a filesystem, destroying its contents."),
        msg("dd if=", "Raw disk write; can destroy data irrecoverably."),
        msg(r"^fdisk", "Modifies disk partition tables."),
        msg(r"^parted", "Modifies disk partition tables."),
        msg(r"^:\(\)\s*\{", "Fork bomb pattern."),
        msg(
            r#".*<<-?\s*['"]?EOF['"]?[\s\S]*>"#,
            "Heredoc-to-file writes; prefer a structured file edit instead.",
        ),
        msg("history -c", "Clears shell history."),
        msg(r".*>\s*~?/?\.bash_history", "Tampers with shell history."),
        word("shutdown"),
        word("reboot"),
        word("poweroff"),
        word("halt"),
        msg("init 0", "Shuts the system down."),
        msg("init 6", "Reboots the system."),
        msg(r"^cd\s+/home/", "Changes into another user's home directory unnecessarily."),
        msg(r"^cd\s+/Users/", "Changes into another user's home directory unnecessarily."),
    ];

    PermissionConfig { auto_approve, require_approval, deny, reset_auto_approve: false, reset_require_approval: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{evaluate_script, EvaluateOptions, PermissionResult};

    #[test]
    fn read_only_tools_auto_approve() {
        let cfg = base_config();
        let (result, _) = evaluate_script(&cfg, "ls -la", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::AutoApprove);
    }

    #[test]
    fn similarly_named_binary_is_not_confused_with_short_tool_name() {
        let cfg = base_config();
        let (result, _) = evaluate_script(&cfg, "lsof -i :8080", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::RequireApproval);
    }

    #[test]
    fn build_invocation_auto_approves() {
        let cfg = base_config();
        let (result, _) = evaluate_script(&cfg, "cargo test", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::AutoApprove);
    }

    #[test]
    fn rm_rf_root_is_denied() {
        let cfg = base_config();
        let (result, message) = evaluate_script(&cfg, "rm -rf /", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::Deny);
        assert!(message.contains("root"));
    }

    #[test]
    fn network_fetch_requires_approval() {
        let cfg = base_config();
        let (result, _) = evaluate_script(&cfg, "curl https://example.com", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::RequireApproval);
    }
}
