use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::expand_tilde;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "master";

/// Everything needed to run one push.
///
/// Built either directly (see [`PushRequest::new`]) or from a
/// [`RequestFile`] merged with command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub repo: PathBuf,
    pub remote: String,
    pub branch: String,
    pub force: bool,
    pub key_file: Option<PathBuf>,
    pub accept_hostkey: Option<bool>,
    pub ssh_opts: Option<String>,
    pub executable: Option<PathBuf>,
    pub check_only: bool,
}

impl PushRequest {
    /// A request for `repo` with every other field at its default
    /// (`origin`, `master`, no force, no SSH overrides, not check-only).
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            force: false,
            key_file: None,
            accept_hostkey: None,
            ssh_opts: None,
            executable: None,
            check_only: false,
        }
    }
}

/// Partial request as it appears in a TOML request file.
///
/// Every key is optional so the file can hold shared defaults while the
/// command line supplies the rest.
///
/// Example TOML:
/// ```toml
/// repo           = "/srv/app"
/// branch         = "main"
/// key_file       = "~/deploy_keys/app"
/// accept_hostkey = true
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequestFile {
    #[serde(default, alias = "name")]
    pub repo: Option<PathBuf>,
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub force: Option<bool>,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    #[serde(default)]
    pub accept_hostkey: Option<bool>,
    #[serde(default)]
    pub ssh_opts: Option<String>,
    #[serde(default)]
    pub executable: Option<PathBuf>,
    #[serde(default)]
    pub check_only: Option<bool>,
}

impl RequestFile {
    /// Overlay `other` on top of `self`; any key set in `other` wins.
    pub fn merge(self, other: RequestFile) -> RequestFile {
        RequestFile {
            repo: other.repo.or(self.repo),
            remote: other.remote.or(self.remote),
            branch: other.branch.or(self.branch),
            force: other.force.or(self.force),
            key_file: other.key_file.or(self.key_file),
            accept_hostkey: other.accept_hostkey.or(self.accept_hostkey),
            ssh_opts: other.ssh_opts.or(self.ssh_opts),
            executable: other.executable.or(self.executable),
            check_only: other.check_only.or(self.check_only),
        }
    }

    /// Fill in defaults and expand `~` in path-typed keys.
    ///
    /// # Errors
    /// Returns an error if no repository path was given.
    pub fn into_request(self) -> Result<PushRequest> {
        let repo = self
            .repo
            .ok_or_else(|| anyhow!("missing required argument: repo"))?;
        Ok(PushRequest {
            repo: expand_tilde(&repo),
            remote: self.remote.unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            branch: self.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            force: self.force.unwrap_or(false),
            key_file: self.key_file.as_deref().map(expand_tilde),
            accept_hostkey: self.accept_hostkey,
            ssh_opts: self.ssh_opts,
            executable: self.executable.as_deref().map(expand_tilde),
            check_only: self.check_only.unwrap_or(false),
        })
    }
}

/// Load and parse a TOML request file.
///
/// # Errors
/// - Returns an error if the file cannot be read.
/// - Returns an error if parsing the TOML fails or it contains unknown keys.
pub fn load_request_file(path: &Path) -> Result<RequestFile> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("request file not found: {}", path.display()))?;
    let file: RequestFile = toml::from_str(&txt)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(file)
}
