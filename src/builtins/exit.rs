use crate::builtins::prelude::*;

/// `exit`: leaves immediately with a success status, even if background jobs
/// are still running.
pub fn run(shell: &mut Shell) -> Result<()> {
    shell.exit(0)
}
