//! Dry-run-then-push flow.
//!
//! A push is a two-phase probe/commit: `git push --dry-run` tells whether
//! the remote branch would move, and only then (and only outside check mode)
//! is the real `git push` issued.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::PushError;
use crate::git::{self, GitRunner, GitVersion, Invocation};
use crate::request::PushRequest;
use crate::ssh::{GIT_SSH_COMMAND, ssh_command};

pub const DRY_RUN_FLAG: &str = "--dry-run";

/// Text git prints when a push would transfer nothing.
///
/// English only: a localized git never matches, so the push is then treated
/// as pending.
pub const UP_TO_DATE_MARKER: &str = "Everything up-to-date";

/// Result of a successful push run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PushOutcome {
    pub changed: bool,
}

/// Runs one [`PushRequest`] against git through a [`GitRunner`].
pub struct PushExecutor<'a> {
    runner: &'a dyn GitRunner,
    inherited_ssh_command: Option<String>,
}

impl<'a> PushExecutor<'a> {
    pub fn new(runner: &'a dyn GitRunner) -> Self {
        Self {
            runner,
            inherited_ssh_command: None,
        }
    }

    /// The caller's own `GIT_SSH_COMMAND`, which request options extend.
    pub fn with_inherited_ssh_command(mut self, cmd: Option<String>) -> Self {
        self.inherited_ssh_command = cmd;
        self
    }

    pub fn resolve_executable(&self, req: &PushRequest) -> Result<PathBuf, PushError> {
        git::resolve_executable(req.executable.as_deref())
    }

    pub fn check_version(&self, git: &Path) -> Result<GitVersion, PushError> {
        git::check_version(self.runner, git)
    }

    /// Directory every git child runs in.
    pub fn change_directory(&self, req: &PushRequest) -> Result<PathBuf, PushError> {
        if req.repo.is_dir() {
            Ok(req.repo.clone())
        } else {
            Err(PushError::RepoNotFound(req.repo.clone()))
        }
    }

    /// Environment entries added to each git child.
    pub fn build_ssh_environment(&self, req: &PushRequest) -> Vec<(String, String)> {
        ssh_command(req, self.inherited_ssh_command.as_deref())
            .map(|cmd| vec![(GIT_SSH_COMMAND.to_string(), cmd)])
            .unwrap_or_default()
    }

    /// Full flow: repository check, git lookup, version gate, then push.
    ///
    /// The repository is checked first so a bad path never spawns anything.
    pub fn execute(&self, req: &PushRequest) -> Result<PushOutcome, PushError> {
        let dir = self.change_directory(req)?;
        let git = self.resolve_executable(req)?;
        self.check_version(&git)?;
        let env = self.build_ssh_environment(req);
        self.push(&git, &dir, &env, req)
    }

    /// Probe with a dry run, then push for real if anything is pending.
    ///
    /// A failing dry run is not an error by itself; only a failing real push
    /// is.
    pub fn push(
        &self,
        git: &Path,
        dir: &Path,
        env: &[(String, String)],
        req: &PushRequest,
    ) -> Result<PushOutcome, PushError> {
        let mut args = push_args(req);
        args.push(DRY_RUN_FLAG);

        let probe = self.runner.run(&invocation(git, dir, env, &args))?;
        if probe.stdout.contains(UP_TO_DATE_MARKER) || probe.stderr.contains(UP_TO_DATE_MARKER) {
            info!(remote = %req.remote, branch = %req.branch, "already up-to-date");
            return Ok(PushOutcome { changed: false });
        }
        debug!(
            success = probe.success,
            stderr = %probe.stderr.trim(),
            "dry run reports pending changes"
        );

        if req.check_only {
            info!("check mode: skipping real push");
            return Ok(PushOutcome { changed: true });
        }

        args.pop();
        let out = self.runner.run(&invocation(git, dir, env, &args))?;
        if !out.success {
            return Err(PushError::PushFailed(out.stderr.trim().to_string()));
        }
        info!(remote = %req.remote, branch = %req.branch, "pushed");
        Ok(PushOutcome { changed: true })
    }
}

/// `push [--force] <remote> <branch>`, without the dry-run flag.
pub fn push_args(req: &PushRequest) -> Vec<&str> {
    let mut args = vec!["push"];
    if req.force {
        args.push("--force");
    }
    args.push(&req.remote);
    args.push(&req.branch);
    args
}

fn invocation(git: &Path, dir: &Path, env: &[(String, String)], args: &[&str]) -> Invocation {
    env.iter().fold(
        Invocation::new(git, args).current_dir(dir),
        |inv, (k, v)| inv.env(k, v),
    )
}
