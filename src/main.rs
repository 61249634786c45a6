//! # git-push
//!
//! Push local commits to a git remote and report whether anything changed.
//!
//! - `git-push --repo <path>` pushes `origin master`
//! - `--check` only reports whether a push would change the remote
//! - `--config push.toml` reads the request from a TOML file
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::{ArgAction, Parser};
use git_push::{PushOptions, RequestFile, cmd_push};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line interface definition.
///
/// Parsed using `clap` derive macros. Unset options fall back to the request
/// file, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(
    name = "git-push",
    version,
    about = "Push local commits to a git remote, reporting whether anything changed"
)]
struct Cli {
    /// Local repository path containing the commits to push
    #[arg(long, visible_alias = "name", value_name = "PATH")]
    repo: Option<PathBuf>,
    /// Name of the remote [default: origin]
    #[arg(long)]
    remote: Option<String>,
    /// Name of the branch [default: master]
    #[arg(long)]
    branch: Option<String>,
    /// Force the push
    #[arg(long, overrides_with = "no_force")]
    force: bool,
    /// Don't force the push, even if the request file says so
    #[arg(long, overrides_with = "force")]
    no_force: bool,
    /// Private key file to hand to ssh
    #[arg(long, value_name = "PATH")]
    key_file: Option<PathBuf>,
    /// Add `-o StrictHostKeyChecking=no` to the ssh options
    #[arg(long, overrides_with = "no_accept_hostkey")]
    accept_hostkey: bool,
    /// Keep strict host key checking, even if the request file disables it
    #[arg(long, overrides_with = "accept_hostkey")]
    no_accept_hostkey: bool,
    /// Extra ssh options, appended to GIT_SSH_COMMAND
    #[arg(long, value_name = "OPTS", allow_hyphen_values = true)]
    ssh_opts: Option<String>,
    /// Path to the git executable [default: git on PATH]
    #[arg(long, value_name = "PATH")]
    executable: Option<PathBuf>,
    /// Only report whether a push would change the remote
    #[arg(long, overrides_with = "no_check")]
    check: bool,
    /// Push for real, even if the request file asks for check mode
    #[arg(long, overrides_with = "check")]
    no_check: bool,
    /// TOML file holding request defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
    /// Don't show a progress spinner
    #[arg(short, long)]
    quiet: bool,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line values as request overrides. A boolean only overrides
    /// when `--x` or `--no-x` is given; otherwise the request file decides.
    fn overrides(&self) -> RequestFile {
        RequestFile {
            repo: self.repo.clone(),
            remote: self.remote.clone(),
            branch: self.branch.clone(),
            force: switch(self.force, self.no_force),
            key_file: self.key_file.clone(),
            accept_hostkey: switch(self.accept_hostkey, self.no_accept_hostkey),
            ssh_opts: self.ssh_opts.clone(),
            executable: self.executable.clone(),
            check_only: switch(self.check, self.no_check),
        }
    }
}

fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI entry point.
///
/// Parses arguments with `clap` and runs the push.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    cmd_push(PushOptions {
        config: cli.config.clone(),
        overrides: cli.overrides(),
        json: cli.json,
        quiet: cli.quiet,
    })
}
