use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::PushError;
use crate::git::SystemRunner;
use crate::push::{PushExecutor, PushOutcome};
use crate::request::{PushRequest, RequestFile, load_request_file};
use crate::ssh::GIT_SSH_COMMAND;

/// Options for [`cmd_push`] as gathered by the CLI.
#[derive(Debug, Default, Clone)]
pub struct PushOptions {
    /// TOML request file providing defaults.
    pub config: Option<PathBuf>,
    /// Values given on the command line; these win over the file.
    pub overrides: RequestFile,
    /// Print the outcome as a JSON object instead of `changed=<bool>`.
    pub json: bool,
    /// Never show the spinner.
    pub quiet: bool,
}

/// CLI command: push the configured branch and report whether it changed.
///
/// Flow:
/// 1. Merge the request file (if any) with command-line overrides.
/// 2. Run [`PushExecutor::execute`] with the caller's `GIT_SSH_COMMAND`
///    as the base for SSH options.
/// 3. Print `changed=true|false` (or `{"changed":...}` with `--json`).
///
/// # Errors
/// Returns an error if the request is incomplete or any push step fails.
pub fn cmd_push(opts: PushOptions) -> Result<()> {
    let base = match &opts.config {
        Some(path) => load_request_file(path)?,
        None => RequestFile::default(),
    };
    let req = base.merge(opts.overrides).into_request()?;

    let pb = spinner(opts.quiet);
    pb.set_message(format!(
        "pushing {}/{} from {}",
        req.remote,
        req.branch,
        req.repo.display()
    ));

    let runner = SystemRunner;
    let result = PushExecutor::new(&runner)
        .with_inherited_ssh_command(env::var(GIT_SSH_COMMAND).ok())
        .execute(&req);

    match result {
        Ok(outcome) => {
            pb.set_style(ok_style());
            pb.finish_with_message(status_line(&req, outcome));
            print_outcome(outcome, opts.json)
        }
        Err(e) => {
            pb.set_style(err_style());
            pb.finish_with_message(format!("push {} failed", req.repo.display()));
            let msg = failure_message(&req, &e);
            if opts.json {
                println!("{}", failure_json(&msg));
            }
            Err(e).context(format!(
                "failed to push {} to {}/{}",
                req.repo.display(),
                req.remote,
                req.branch
            ))
        }
    }
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn status_line(req: &PushRequest, outcome: PushOutcome) -> String {
    let target = format!("{}/{}", req.remote, req.branch);
    match (outcome.changed, req.check_only) {
        (false, _) => format!("{} {} up-to-date", "ok".green(), target),
        (true, true) => format!("{} {} would be pushed", "changed".yellow(), target),
        (true, false) => format!("{} {} pushed", "changed".yellow(), target),
    }
}

fn print_outcome(outcome: PushOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        println!("changed={}", outcome.changed);
    }
    Ok(())
}

/// The error text verbatim, followed by a `known_hosts` hint when a push
/// may have stalled on an unknown host key.
fn failure_message(req: &PushRequest, err: &PushError) -> String {
    match err {
        PushError::PushFailed(_) if req.accept_hostkey != Some(true) => format!(
            "{err} (if the remote host is not in known_hosts, add it with \
             `ssh-keyscan -H <host> >> /etc/ssh/ssh_known_hosts` or pass --accept-hostkey)"
        ),
        _ => err.to_string(),
    }
}

fn failure_json(msg: &str) -> serde_json::Value {
    serde_json::json!({ "failed": true, "msg": msg })
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn err_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
