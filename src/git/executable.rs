use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PushError;

/// Resolve the git binary to run.
///
/// An explicit override must point at an existing file; otherwise `git` is
/// looked up on `PATH`.
///
/// # Errors
/// Returns [`PushError::ExecutableNotFound`] if neither yields a binary.
pub fn resolve_executable(explicit: Option<&Path>) -> Result<PathBuf, PushError> {
    let path = match explicit {
        Some(p) if p.is_file() => p.to_path_buf(),
        Some(p) => return Err(PushError::ExecutableNotFound(p.display().to_string())),
        None => which::which("git")
            .map_err(|e| PushError::ExecutableNotFound(format!("git ({e})")))?,
    };
    debug!(git = %path.display(), "resolved git executable");
    Ok(path)
}
