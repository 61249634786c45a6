//! Git integration layer.
//!
//! Everything here shells out to the `git` command-line tool. Callers get
//! executable lookup, the version gate and a [`GitRunner`] seam; the push
//! decision itself lives in [`crate::push`].

mod executable;
mod runner;
mod version;

pub use executable::resolve_executable;
pub use runner::{CommandOutput, GitRunner, Invocation, SystemRunner};
pub use version::{GitVersion, MIN_GIT_VERSION, check_version};
