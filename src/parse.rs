//! Splits one line of input into a `Command`.

use crate::errors::{ErrorKind, Result};

const BACKGROUND_TOKEN: &str = "&";
const REDIRECT_TOKEN: &str = ">";

/// One command line, ready for dispatch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Program or builtin name followed by its arguments. Never empty.
    pub argv: Vec<String>,
    /// Run without waiting; the line ended with a standalone `&`.
    pub background: bool,
    /// File that receives the program's standard output (`> file`).
    pub redirect_target: Option<String>,
}

impl Command {
    /// Tokenizes `input` on whitespace.
    ///
    /// A trailing `&` marks the command as background, then a trailing
    /// `> <file>` pair sets the redirect target, so `cmd > out &` works.
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(input: &str) -> Result<Option<Command>> {
        let mut argv: Vec<String> = input.split_whitespace().map(String::from).collect();
        if argv.is_empty() {
            return Ok(None);
        }

        let background = argv.last().map(String::as_str) == Some(BACKGROUND_TOKEN);
        if background {
            argv.pop();
        }

        let redirect_target = if argv.len() >= 2 && argv[argv.len() - 2] == REDIRECT_TOKEN {
            let target = argv.pop();
            argv.pop();
            target
        } else {
            None
        };

        if argv.last().map(String::as_str) == Some(REDIRECT_TOKEN) {
            bail!(ErrorKind::Syntax(REDIRECT_TOKEN.to_string()));
        }
        if argv.is_empty() {
            let token = if redirect_target.is_some() {
                REDIRECT_TOKEN
            } else {
                BACKGROUND_TOKEN
            };
            bail!(ErrorKind::Syntax(token.to_string()));
        }

        Ok(Some(Command {
            argv,
            background,
            redirect_target,
        }))
    }
}
