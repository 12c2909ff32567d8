use nix::unistd;

use crate::builtins::prelude::*;

pub fn pid(stdout: &mut dyn Write) -> Result<()> {
    writeln!(stdout, "{}", unistd::getpid())?;
    Ok(())
}

pub fn ppid(stdout: &mut dyn Write) -> Result<()> {
    writeln!(stdout, "{}", unistd::getppid())?;
    Ok(())
}
