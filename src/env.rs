//! Process environment: variables and the current working directory.
//!
//! Everything here operates on the interpreter's own process state, so a
//! change made by `cd` or `set` is inherited by every child spawned afterwards.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use nix::errno::Errno;

use crate::errors::{Error, ErrorKind, Result};

/// Returns the absolute current working directory.
///
/// A path longer than the platform allows is reported as `PathTooLong`
/// instead of being truncated.
pub fn get_cwd() -> Result<PathBuf> {
    env::current_dir().map_err(cwd_error)
}

fn cwd_error(e: io::Error) -> Error {
    if is_path_too_long(&e) {
        ErrorKind::PathTooLong.into()
    } else {
        e.into()
    }
}

fn is_path_too_long(e: &io::Error) -> bool {
    match e.raw_os_error() {
        Some(code) => code == Errno::ENAMETOOLONG as i32 || code == Errno::ERANGE as i32,
        None => false,
    }
}

/// Changes the working directory to `dir`, or to `$HOME` when `dir` is `None`.
///
/// `~` is passed through untouched; there is no tilde expansion.
pub fn change_dir<P: AsRef<Path>>(dir: Option<P>) -> Result<()> {
    let target: PathBuf = match dir {
        Some(dir) => dir.as_ref().to_path_buf(),
        None => env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .ok_or(ErrorKind::HomeNotSet)?,
    };

    env::set_current_dir(&target).map_err(|e| {
        ErrorKind::DirectoryError(target.display().to_string(), os_error_text(&e)).into()
    })
}

/// Returns the value of `name`, or `None` if it is unset.
pub fn get_var<K: AsRef<str>>(name: K) -> Option<String> {
    env::var_os(name.as_ref()).map(os_string_lossy)
}

/// Sets `name` to `value` in the process environment.
pub fn set_var<K: AsRef<str>, V: AsRef<str>>(name: K, value: V) -> Result<()> {
    let name = name.as_ref();
    let value = value.as_ref();
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        bail!(ErrorKind::InvalidVariableName(name.to_string()));
    }
    if value.contains('\0') {
        bail!(ErrorKind::InvalidVariableValue(name.to_string()));
    }

    env::set_var(name, value);
    Ok(())
}

/// Strips the " (os error N)" suffix std appends, leaving the strerror text.
pub(crate) fn os_error_text(e: &io::Error) -> String {
    match e.raw_os_error() {
        Some(code) => Errno::from_i32(code).desc().to_string(),
        None => e.to_string(),
    }
}

fn os_string_lossy(value: OsString) -> String {
    value
        .into_string()
        .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
}
