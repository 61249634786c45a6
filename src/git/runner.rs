use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

use crate::error::PushError;

/// One subprocess call: program, arguments, working directory and the
/// environment entries to add on top of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: &Path, args: &[&str]) -> Self {
        Self {
            program: program.to_path_buf(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Shell-ish rendering for logs and error messages.
    pub fn display(&self) -> String {
        let mut s = self.program.display().to_string();
        for a in &self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs subprocesses to completion.
///
/// The push flow only talks to git through this trait so tests can script
/// git's answers and observe every call that would have been made.
pub trait GitRunner {
    fn run(&self, inv: &Invocation) -> Result<CommandOutput, PushError>;
}

/// [`GitRunner`] backed by `std::process::Command`.
///
/// Working directory and environment overlay are applied to the child only;
/// the calling process is left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl GitRunner for SystemRunner {
    fn run(&self, inv: &Invocation) -> Result<CommandOutput, PushError> {
        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args);
        if let Some(dir) = &inv.cwd {
            cmd.current_dir(dir);
        }
        for (k, v) in &inv.env {
            cmd.env(k, v);
        }

        trace!(cmd = %inv.display(), cwd = ?inv.cwd, "running command");

        let output = cmd.output().map_err(|source| PushError::Spawn {
            program: inv.program.display().to_string(),
            source,
        })?;

        let out = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(cmd = %inv.display(), status = %output.status, "command finished");
        Ok(out)
    }
}
