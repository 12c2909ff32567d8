//! Output redirection for a single command.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::process::Stdio;

use crate::errors::{ErrorKind, Result, ResultExt};

/// rw-r--r--
const REDIRECT_FILE_MODE: u32 = 0o644;

/// Where a spawned child's standard output goes.
#[derive(Debug)]
pub enum Output {
    /// Share the shell's own standard output.
    Inherit,
    /// Write to an open file.
    File(File),
}

impl From<File> for Output {
    fn from(file: File) -> Self {
        Output::File(file)
    }
}

impl From<Output> for Stdio {
    fn from(stdout: Output) -> Self {
        match stdout {
            Output::Inherit => Self::inherit(),
            Output::File(file) => file.into(),
        }
    }
}

/// Opens `path` (relative paths resolve against the current working directory)
/// and hands it to `body` as the child's standard output.
///
/// The file is created if missing and truncated if present. It is only ever
/// attached to the child, never to the shell, and is closed once `body` and
/// whatever `body` spawned with it are done with the handle.
pub fn with_redirected_stdout<P, F, T>(path: P, body: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(Output) -> T,
{
    let file = open_truncated(path.as_ref())?;
    debug!("redirecting stdout to {}", path.as_ref().display());
    Ok(body(file.into()))
}

fn open_truncated(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(REDIRECT_FILE_MODE)
        .open(path)
        .chain_err(|| ErrorKind::RedirectFailed(path.display().to_string()))
}
