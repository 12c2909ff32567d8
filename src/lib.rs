//! Psh - Process Shell
//!
//! A small interactive shell: a handful of builtins, foreground and background
//! programs, and `>` output redirection. Background jobs are tracked in a
//! [`JobTable`](jobs/struct.JobTable.html) and reported once they finish.

#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]

#[macro_use]
extern crate error_chain;
#[cfg(test)]
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

#[macro_use]
mod util;

mod builtins;
pub mod env;
pub mod errors;
pub mod execute_command;
pub mod jobs;
pub mod parse;
pub mod redirect;
pub mod shell;
#[cfg(test)]
mod test_util;

pub use crate::builtins::{try_builtin, Builtin, BuiltinOutcome};
pub use crate::jobs::{ExitReport, Job, JobTable};
pub use crate::parse::Command;
pub use crate::shell::{Shell, ShellConfig, DEFAULT_PROMPT};
