//! Crate entry point for **git-push**.
//!
//! Pushes local commits to a remote by shelling out to `git`, and reports
//! whether the remote branch changed. A dry run decides whether a real push
//! is needed at all, which also makes check mode possible.
//!
//! The `pub use` re-exports make the request types and the executor
//! accessible directly from the crate root.

mod cmd;
mod error;
pub mod git;
mod paths;
mod push;
mod request;
mod ssh;

pub use cmd::{PushOptions, cmd_push};
pub use error::PushError;
pub use paths::expand_tilde;
pub use push::{DRY_RUN_FLAG, PushExecutor, PushOutcome, UP_TO_DATE_MARKER, push_args};
pub use request::{PushRequest, RequestFile, load_request_file};
pub use ssh::{GIT_SSH_COMMAND, ssh_command, ssh_options};
