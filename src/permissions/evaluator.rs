//! Per-command and per-script policy evaluation.

use super::absolute_path::has_absolute_path_argument;
use super::pattern::{interpolate_message, match_pattern, pattern_references_env_vars, strip_env_var_prefix};
use super::{CommandPattern, EvaluateOptions, PermissionConfig, PermissionResult};
use crate::extractor::extract_commands;

fn subject(command: &str, pattern: &str, opts: EvaluateOptions) -> String {
    if opts.strip_env_var_prefix && !pattern_references_env_vars(pattern) {
        strip_env_var_prefix(command).to_string()
    } else {
        command.to_string()
    }
}

fn first_match<'a>(
    patterns: &'a [CommandPattern],
    command: &str,
    opts: EvaluateOptions,
) -> Option<(&'a CommandPattern, Vec<String>)> {
    patterns.iter().find_map(|p| {
        let target = subject(command, &p.pattern, opts);
        match_pattern(&p.pattern, &target).map(|caps| (p, caps))
    })
}

/// Which list produced a verdict and the exact pattern text that fired,
/// for callers (the `explain` CLI subcommand) that need to show their
/// work rather than just the final verdict.
pub struct Explanation {
    pub result: PermissionResult,
    pub message: String,
    pub matched_list: Option<&'static str>,
    pub matched_pattern: Option<String>,
}

fn explain(cfg: &PermissionConfig, command: &str, opts: EvaluateOptions) -> Explanation {
    if let Some((pattern, caps)) = first_match(&cfg.deny, command, opts) {
        let message = pattern.message.as_deref().map(|m| interpolate_message(m, &caps)).unwrap_or_default();
        return Explanation {
            result: PermissionResult::Deny,
            message,
            matched_list: Some("deny"),
            matched_pattern: Some(pattern.pattern.clone()),
        };
    }

    if let Some((pattern, _)) = first_match(&cfg.require_approval, command, opts) {
        return Explanation {
            result: PermissionResult::RequireApproval,
            message: String::new(),
            matched_list: Some("require_approval"),
            matched_pattern: Some(pattern.pattern.clone()),
        };
    }

    if let Some((pattern, caps)) = first_match(&cfg.auto_approve, command, opts) {
        if has_absolute_path_argument(command) {
            return Explanation {
                result: PermissionResult::RequireApproval,
                message: String::new(),
                matched_list: Some("auto_approve (downgraded: absolute path argument)"),
                matched_pattern: Some(pattern.pattern.clone()),
            };
        }
        let message = pattern.message.as_deref().map(|m| interpolate_message(m, &caps)).unwrap_or_default();
        return Explanation {
            result: PermissionResult::AutoApprove,
            message,
            matched_list: Some("auto_approve"),
            matched_pattern: Some(pattern.pattern.clone()),
        };
    }

    Explanation { result: PermissionResult::RequireApproval, message: String::new(), matched_list: None, matched_pattern: None }
}

/// Evaluates a single already-extracted command against `cfg`.
///
/// Order: deny first (always wins), then require-approval, then
/// auto-approve (subject to the absolute-path downgrade). No match in
/// any list is `RequireApproval` — the engine never auto-approves by
/// omission.
pub fn evaluate_command(
    cfg: &PermissionConfig,
    command: &str,
    opts: EvaluateOptions,
) -> (PermissionResult, String) {
    let e = explain(cfg, command, opts);
    (e.result, e.message)
}

/// Like [`evaluate_command`], but also reports which list and pattern
/// produced the verdict.
pub fn explain_command(cfg: &PermissionConfig, command: &str, opts: EvaluateOptions) -> Explanation {
    explain(cfg, command, opts)
}

/// Extracts the effective commands in `script` and combines their
/// verdicts: any `Deny` short-circuits (carrying that command's
/// message); else any `RequireApproval` wins; else `AutoApprove`. An
/// unparseable or empty script is `RequireApproval`.
pub fn evaluate_script(
    cfg: &PermissionConfig,
    script: &str,
    opts: EvaluateOptions,
) -> (PermissionResult, String) {
    let commands = extract_commands(script);
    if commands.is_empty() {
        return (PermissionResult::RequireApproval, String::new());
    }

    let mut worst = PermissionResult::AutoApprove;
    let mut worst_message = String::new();
    for command in &commands {
        let (result, message) = evaluate_command(cfg, command, opts);
        if result == PermissionResult::Deny {
            return (PermissionResult::Deny, message);
        }
        if result < worst {
            worst = result;
            worst_message = message;
        }
    }
    (worst, worst_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::base::base_config;
    use crate::permissions::merge_configs;

    #[test]
    fn closed_by_default() {
        let cfg = PermissionConfig::default();
        let (result, _) = evaluate_command(&cfg, "anything at all", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::RequireApproval);
    }

    #[test]
    fn deny_wins_over_everything() {
        let cfg = PermissionConfig {
            auto_approve: vec![CommandPattern::new("rm")],
            require_approval: vec![CommandPattern::new("rm")],
            deny: vec![CommandPattern::new("rm -rf /")],
            ..Default::default()
        };
        let (result, _) = evaluate_command(&cfg, "rm -rf /", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::Deny);
    }

    #[test]
    fn capture_group_interpolation_scenario() {
        let cfg = PermissionConfig {
            deny: vec![CommandPattern::with_message("rm -rf (.+)", "X $1 Y")],
            ..Default::default()
        };
        let (result, message) = evaluate_command(&cfg, "rm -rf /data", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::Deny);
        assert_eq!(message, "X /data Y");
    }

    #[test]
    fn scenario_cat_etc_passwd_downgrades() {
        let cfg = base_config();
        let (result, _) = evaluate_script(&cfg, "cat /etc/passwd", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::RequireApproval);
    }

    #[test]
    fn scenario_sudo_apt_get_denied() {
        let cfg = base_config();
        let (result, message) = evaluate_script(&cfg, "sudo apt-get install", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::Deny);
        assert!(message.contains("sudo"));
    }

    #[test]
    fn scenario_sed_regex_argument_auto_approves() {
        let cfg = base_config();
        let (result, _) = evaluate_script(&cfg, "sed 's/foo/bar/g' file.txt", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::AutoApprove);
    }

    #[test]
    fn scenario_env_prefix_stripping_auto_approves() {
        let cfg = base_config();
        let opts = EvaluateOptions { strip_env_var_prefix: true };
        let (result, _) =
            evaluate_command(&cfg, "SIDE_INTEGRATION_TEST=true go test ./...", opts);
        assert_eq!(result, PermissionResult::AutoApprove);
    }

    #[test]
    fn scenario_layered_require_approval_beats_layered_auto_approve() {
        let base = base_config();
        let extra = PermissionConfig {
            auto_approve: vec![CommandPattern::new("curl")],
            ..Default::default()
        };
        let merged = merge_configs(&[base, extra]);
        let (result, _) = evaluate_script(&merged, "curl https://example.com", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::RequireApproval);
    }

    #[test]
    fn script_monotonicity_any_require_approval_beats_auto_approve() {
        let cfg = PermissionConfig {
            auto_approve: vec![CommandPattern::new("go build")],
            require_approval: vec![CommandPattern::new("curl")],
            ..Default::default()
        };
        let (result, _) =
            evaluate_script(&cfg, "go build && curl https://example.com", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::RequireApproval);
    }

    #[test]
    fn empty_script_requires_approval() {
        let cfg = base_config();
        let (result, _) = evaluate_script(&cfg, "   ", EvaluateOptions::default());
        assert_eq!(result, PermissionResult::RequireApproval);
    }
}
