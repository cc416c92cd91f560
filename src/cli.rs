//! `clap`-derived CLI surface: `check`, `extract`, `explain`.
//!
//! A thin front end over [`crate::permissions`] and
//! [`crate::extractor`] — all three subcommands are read-only and
//! exit non-zero when the verdict isn't `AutoApprove`, so the binary
//! composes into shell pipelines and CI gates.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;

use crate::config::load_layered;
use crate::permissions::{evaluate_script, explain_command, EvaluateOptions, PermissionConfig, PermissionResult};

#[derive(Debug, Parser)]
#[command(name = "shell_permit", version, about = "Shell-command permission engine for an LLM coding agent")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v, -vv, -vvv). Overridden by SHELL_PERMIT_LOG.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a full shell script and print the verdict.
    Check(CheckArgs),
    /// Print the effective commands a script would execute, one per line.
    Extract(ExtractArgs),
    /// Evaluate a single already-extracted command and explain the verdict.
    Explain(ExplainArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config layer file, applied in order over the built-in base ruleset. Repeatable.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Strip leading `VAR=value` tokens before matching patterns that
    /// don't themselves reference environment variables.
    #[arg(long)]
    pub strip_env_var_prefix: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// The shell script to evaluate.
    pub script: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// The shell script to decompose.
    pub script: String,
}

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// The single command to evaluate (not re-extracted).
    pub command: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Runs the selected subcommand; returns the process exit code to use.
pub fn run(cli: Cli) -> eyre::Result<i32> {
    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Extract(args) => run_extract(args),
        Command::Explain(args) => run_explain(args),
    }
}

fn load_cfg(args: &ConfigArgs) -> eyre::Result<PermissionConfig> {
    load_layered(&args.config).map_err(Into::into)
}

fn exit_code(result: PermissionResult) -> i32 {
    match result {
        PermissionResult::AutoApprove => 0,
        PermissionResult::RequireApproval => 1,
        PermissionResult::Deny => 2,
    }
}

fn run_check(args: CheckArgs) -> eyre::Result<i32> {
    let cfg = load_cfg(&args.config)?;
    let opts = EvaluateOptions { strip_env_var_prefix: args.config.strip_env_var_prefix };
    let (result, message) = evaluate_script(&cfg, &args.script, opts);
    tracing::info!(?result, "script evaluated");
    print_verdict(result, &message);
    Ok(exit_code(result))
}

fn run_explain(args: ExplainArgs) -> eyre::Result<i32> {
    let cfg = load_cfg(&args.config)?;
    let opts = EvaluateOptions { strip_env_var_prefix: args.config.strip_env_var_prefix };
    let explanation = explain_command(&cfg, &args.command, opts);
    print_verdict(explanation.result, &explanation.message);
    match (&explanation.matched_list, &explanation.matched_pattern) {
        (Some(list), Some(pattern)) => println!("matched {list}: {pattern}"),
        _ => println!("no pattern matched; default verdict"),
    }
    Ok(exit_code(explanation.result))
}

fn run_extract(args: ExtractArgs) -> eyre::Result<i32> {
    for command in crate::extractor::extract_commands(&args.script) {
        println!("{command}");
    }
    Ok(0)
}

fn print_verdict(result: PermissionResult, message: &str) {
    match result {
        PermissionResult::AutoApprove => println!("{}", "auto-approve".green()),
        PermissionResult::RequireApproval => println!("{}", "require-approval".yellow()),
        PermissionResult::Deny => println!("{}", "deny".red()),
    }
    if !message.is_empty() {
        println!("{message}");
    }
}
