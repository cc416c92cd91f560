//! Three-tier policy evaluation with layered configuration merging.
//!
//! [`PermissionConfig`] holds three ordered pattern lists (deny,
//! require-approval, auto-approve). [`merge_configs`] folds a stack of
//! layers — base, repo, workspace, per-invocation — into one, honoring
//! each layer's reset flags; deny never resets. [`evaluator`] applies
//! the merged config to a command or whole script.

pub mod base;
mod absolute_path;
mod evaluator;
mod pattern;

pub use evaluator::{evaluate_command, evaluate_script, explain_command, Explanation};
pub use pattern::match_pattern;

use serde::{Deserialize, Serialize};

/// A single match rule: a literal prefix or anchored regex, with an
/// optional message template (`$0..$9` capture placeholders).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPattern {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), message: None }
    }

    pub fn with_message(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), message: Some(message.into()) }
    }
}

/// An immutable layer in the permission merge stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    #[serde(default)]
    pub auto_approve: Vec<CommandPattern>,
    #[serde(default)]
    pub require_approval: Vec<CommandPattern>,
    #[serde(default)]
    pub deny: Vec<CommandPattern>,
    /// If set, this layer replaces (rather than appends to) the
    /// accumulator's auto-approve list when merged.
    #[serde(default)]
    pub reset_auto_approve: bool,
    /// Same as `reset_auto_approve`, for require-approval.
    #[serde(default)]
    pub reset_require_approval: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionResult {
    Deny,
    RequireApproval,
    AutoApprove,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluateOptions {
    pub strip_env_var_prefix: bool,
}

/// Folds `configs` left-to-right. Deny always concatenates; the softer
/// lists concatenate unless the layer sets its reset flag, in which
/// case the accumulator is replaced with a copy of that layer's list.
pub fn merge_configs(configs: &[PermissionConfig]) -> PermissionConfig {
    let mut acc = PermissionConfig::default();
    for cfg in configs {
        if cfg.reset_auto_approve {
            acc.auto_approve = cfg.auto_approve.clone();
        } else {
            acc.auto_approve.extend(cfg.auto_approve.iter().cloned());
        }
        if cfg.reset_require_approval {
            acc.require_approval = cfg.require_approval.clone();
        } else {
            acc.require_approval.extend(cfg.require_approval.iter().cloned());
        }
        acc.deny.extend(cfg.deny.iter().cloned());
    }
    acc
}
