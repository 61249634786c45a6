use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a push.
///
/// None of these are retried. Where a subprocess produced the failure, its
/// trimmed stderr is carried verbatim.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("git executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("unable to identify version of git: {0}")]
    VersionCheckFailed(String),

    #[error("minimum git version required is {minimum} (found {found})")]
    UnsupportedVersion { found: String, minimum: String },

    #[error("repo {} does not exist", .0.display())]
    RepoNotFound(PathBuf),

    #[error("git push failed: {0}")]
    PushFailed(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
