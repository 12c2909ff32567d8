use crate::builtins::prelude::*;
use crate::env;

/// `set <var> <value>`
pub fn set(name: &str, value: &str) -> Result<()> {
    env::set_var(name, value)
}

/// `get <var>`: prints the value, or fails if the variable is unset.
pub fn get(name: &str, stdout: &mut dyn Write) -> Result<()> {
    match env::get_var(name) {
        Some(value) => {
            writeln!(stdout, "{}", value)?;
            Ok(())
        }
        None => Err(ErrorKind::NoSuchVariable(name.to_string()).into()),
    }
}
