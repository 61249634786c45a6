//! `GIT_SSH_COMMAND` construction.

use crate::request::PushRequest;

pub const GIT_SSH_COMMAND: &str = "GIT_SSH_COMMAND";

const NO_HOST_KEY_CHECK: &str = "-o StrictHostKeyChecking=no";

/// SSH client options implied by the request.
///
/// Starts from `ssh_opts`, then adds host-key acceptance and the identity
/// file unless the exact option text is already present.
pub fn ssh_options(req: &PushRequest) -> String {
    let mut opts = req.ssh_opts.clone().unwrap_or_default().trim().to_string();

    if req.accept_hostkey == Some(true) {
        push_unique(&mut opts, NO_HOST_KEY_CHECK);
    }
    if let Some(key) = &req.key_file {
        push_unique(&mut opts, &format!("-i {}", key.display()));
    }
    opts
}

/// Value to export as `GIT_SSH_COMMAND` for the git children, if any.
///
/// `inherited` is the caller's current `GIT_SSH_COMMAND`. Options are
/// appended to it; with nothing inherited they are appended to plain `ssh`.
/// Returns `None` when there is nothing to add.
pub fn ssh_command(req: &PushRequest, inherited: Option<&str>) -> Option<String> {
    let opts = ssh_options(req);
    if opts.is_empty() {
        return None;
    }
    let base = inherited.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("ssh");
    Some(format!("{base} {opts}"))
}

fn push_unique(opts: &mut String, opt: &str) {
    if opts.contains(opt) {
        return;
    }
    if !opts.is_empty() {
        opts.push(' ');
    }
    opts.push_str(opt);
}
