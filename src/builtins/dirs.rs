use crate::builtins::prelude::*;
use crate::env;

/// `cd [dir]`: with no argument, goes to `$HOME`.
pub fn cd(dir: Option<String>) -> Result<()> {
    env::change_dir(dir)
}

/// `pwd`: prints the absolute working directory.
pub fn pwd(stdout: &mut dyn Write) -> Result<()> {
    let cwd = env::get_cwd()?;
    writeln!(stdout, "{}", cwd.display())?;
    Ok(())
}
