use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use super::runner::{GitRunner, Invocation};
use crate::error::PushError;

/// Oldest git that honours `GIT_SSH_COMMAND`.
pub const MIN_GIT_VERSION: GitVersion = GitVersion::new(2, 3, 0);

static VERSION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"git version (\S+)").expect("valid version regex"));
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("valid numeric regex")
});

/// `major.minor.patch` of a git build.
///
/// Ordering is numeric per component, so `2.10.1 > 2.3.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the leading numeric part of a version token.
    ///
    /// Vendor suffixes are ignored: `2.41.0.windows.1` → `2.41.0`,
    /// `2.39` → `2.39.0`.
    pub fn parse(token: &str) -> Option<Self> {
        let caps = NUMERIC.captures(token)?;
        let part = |i: usize| -> Option<u32> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };
        Some(Self::new(part(1)?, part(2)?, part(3)?))
    }

    /// Extract the version from `git --version` output.
    pub fn from_version_output(out: &str) -> Option<Self> {
        let caps = VERSION_LINE.captures(out)?;
        Self::parse(caps.get(1)?.as_str())
    }
}

impl fmt::Display for GitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Run `<git> --version` and make sure the binary is new enough.
///
/// # Errors
/// - [`PushError::VersionCheckFailed`] if git cannot be started, exits
///   non-zero, or prints something that is not a version line.
/// - [`PushError::UnsupportedVersion`] if it is older than
///   [`MIN_GIT_VERSION`].
pub fn check_version(runner: &dyn GitRunner, git: &Path) -> Result<GitVersion, PushError> {
    let out = runner
        .run(&Invocation::new(git, &["--version"]))
        .map_err(|e| match e {
            PushError::Spawn { .. } => PushError::VersionCheckFailed(e.to_string()),
            other => other,
        })?;
    if !out.success {
        return Err(PushError::VersionCheckFailed(out.stderr.trim().to_string()));
    }

    let version = GitVersion::from_version_output(&out.stdout).ok_or_else(|| {
        PushError::VersionCheckFailed(format!("unexpected output: {}", out.stdout.trim()))
    })?;
    debug!(%version, "detected git version");

    if version < MIN_GIT_VERSION {
        return Err(PushError::UnsupportedVersion {
            found: version.to_string(),
            minimum: MIN_GIT_VERSION.to_string(),
        });
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::runner::{CommandOutput, SystemRunner};

    struct Fixed(CommandOutput);

    impl GitRunner for Fixed {
        fn run(&self, _inv: &Invocation) -> Result<CommandOutput, PushError> {
            Ok(self.0.clone())
        }
    }

    fn stdout(s: &str) -> Fixed {
        Fixed(CommandOutput {
            success: true,
            stdout: s.to_string(),
            stderr: String::new(),
        })
    }

    #[test]
    fn parse_handles_vendor_suffixes_and_short_forms() {
        assert_eq!(GitVersion::parse("2.41.0.windows.1"), Some(GitVersion::new(2, 41, 0)));
        assert_eq!(GitVersion::parse("2.39"), Some(GitVersion::new(2, 39, 0)));
        assert_eq!(GitVersion::parse("garbage"), None);
    }

    #[test]
    fn comparison_is_numeric_not_lexical() {
        assert!(GitVersion::new(2, 10, 1) > GitVersion::new(2, 3, 0));
        assert!(GitVersion::new(2, 2, 9) < MIN_GIT_VERSION);
    }

    #[test]
    fn from_version_output_reads_apple_builds() {
        let v = GitVersion::from_version_output("git version 2.39.3 (Apple Git-146)\n");
        assert_eq!(v, Some(GitVersion::new(2, 39, 3)));
    }

    #[test]
    fn rejects_versions_below_minimum() {
        let err = check_version(&stdout("git version 2.2.9\n"), Path::new("git")).unwrap_err();
        match err {
            PushError::UnsupportedVersion { found, minimum } => {
                assert_eq!(found, "2.2.9");
                assert_eq!(minimum, "2.3.0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn accepts_minimum_and_newer() {
        for (out, want) in [
            ("git version 2.3.0\n", GitVersion::new(2, 3, 0)),
            ("git version 2.10.1\n", GitVersion::new(2, 10, 1)),
        ] {
            assert_eq!(check_version(&stdout(out), Path::new("git")).unwrap(), want);
        }
    }

    #[test]
    fn unparsable_output_fails_the_check() {
        let err = check_version(&stdout("hg version 6.5\n"), Path::new("git")).unwrap_err();
        assert!(matches!(err, PushError::VersionCheckFailed(_)));
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let runner = Fixed(CommandOutput {
            success: false,
            stdout: String::new(),
            stderr: "fatal: broken install\n".to_string(),
        });
        let err = check_version(&runner, Path::new("git")).unwrap_err();
        match err {
            PushError::VersionCheckFailed(msg) => assert_eq!(msg, "fatal: broken install"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn spawn_failure_is_a_version_check_failure() {
        struct Unstartable;

        impl GitRunner for Unstartable {
            fn run(&self, inv: &Invocation) -> Result<CommandOutput, PushError> {
                Err(PushError::Spawn {
                    program: inv.program.display().to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                })
            }
        }

        let err = check_version(&Unstartable, Path::new("/opt/git")).unwrap_err();
        match err {
            PushError::VersionCheckFailed(msg) => assert!(msg.contains("/opt/git")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_git_file_fails_the_check() {
        use std::os::unix::fs::PermissionsExt;

        let td = tempfile::tempdir().unwrap();
        let fake = td.path().join("git");
        std::fs::write(&fake, "#!/bin/sh\necho 'git version 2.43.0'\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = check_version(&SystemRunner, &fake).unwrap_err();
        assert!(matches!(err, PushError::VersionCheckFailed(_)));
    }
}
