use crate::builtins::prelude::*;

/// `jobs`: one line per live background job, oldest first.
pub fn list(shell: &Shell, stdout: &mut dyn Write) -> Result<()> {
    for job in shell.jobs().list() {
        writeln!(stdout, "{}", job)?;
    }

    Ok(())
}
