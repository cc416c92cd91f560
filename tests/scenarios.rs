//! End-to-end coverage of the extractor's decomposition rules and the
//! evaluator's layered-policy decisions against concrete scripts.

use pretty_assertions::assert_eq;
use shell_permit::permissions::base::base_config;
use shell_permit::{evaluate_command, evaluate_script, extract_commands, merge_configs, EvaluateOptions, PermissionConfig, PermissionResult};

#[test]
fn scenario_1_simple_list() {
    let cmds = extract_commands("./x.sh && go build && go test -short | jq -x");
    assert_eq!(cmds, vec!["./x.sh", "go build", "go test -short", "jq -x"]);
}

#[test]
fn scenario_2_shell_c() {
    let cmds = extract_commands(r#"sh -c "echo hello && ls""#);
    assert_eq!(cmds, vec![r#"sh -c "echo hello && ls""#, "echo hello", "ls"]);
}

#[test]
fn scenario_3_find_xargs() {
    let cmds = extract_commands("find . | xargs rm");
    assert_eq!(cmds, vec!["find .", "xargs rm", "rm"]);
}

#[test]
fn scenario_4_sudo_env() {
    let cmds = extract_commands("sudo env VAR=1 cmd");
    assert_eq!(cmds, vec!["sudo env VAR=1 cmd", "env VAR=1 cmd", "cmd"]);
}

#[test]
fn scenario_5_ssh_quoted_tail() {
    let cmds = extract_commands("ssh host 'sudo dangerous_cmd'");
    assert_eq!(cmds, vec![
        "ssh host 'sudo dangerous_cmd'",
        "sudo dangerous_cmd",
        "dangerous_cmd"
    ]);
}

#[test]
fn scenario_6_cat_etc_passwd_downgraded_by_absolute_path() {
    let cfg = base_config();
    let (result, _) = evaluate_script(&cfg, "cat /etc/passwd", EvaluateOptions::default());
    assert_eq!(result, PermissionResult::RequireApproval);
}

#[test]
fn scenario_7_sudo_apt_get_denied_with_sudo_in_message() {
    let cfg = base_config();
    let (result, message) = evaluate_script(&cfg, "sudo apt-get install", EvaluateOptions::default());
    assert_eq!(result, PermissionResult::Deny);
    assert!(message.contains("sudo"));
}

#[test]
fn scenario_8_sed_regex_argument_not_a_path() {
    let cfg = base_config();
    let (result, _) = evaluate_script(&cfg, "sed 's/foo/bar/g' file.txt", EvaluateOptions::default());
    assert_eq!(result, PermissionResult::AutoApprove);
}

#[test]
fn scenario_9_env_prefix_stripping() {
    let cfg = base_config();
    let opts = EvaluateOptions { strip_env_var_prefix: true };
    let (result, _) = evaluate_command(&cfg, "SIDE_INTEGRATION_TEST=true go test ./...", opts);
    assert_eq!(result, PermissionResult::AutoApprove);
}

#[test]
fn scenario_10_base_require_approval_beats_layered_auto_approve() {
    let base = base_config();
    let extra = PermissionConfig {
        auto_approve: vec![shell_permit::permissions::CommandPattern::new("curl")],
        ..Default::default()
    };
    let merged = merge_configs(&[base, extra]);
    let (result, _) = evaluate_script(&merged, "curl https://example.com", EvaluateOptions::default());
    assert_eq!(result, PermissionResult::RequireApproval);
}
