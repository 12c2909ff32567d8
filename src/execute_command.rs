//! Launching external programs.
//!
//! Foreground commands are waited on with a single blocking `wait`.
//! Background commands are recorded in the `JobTable` and left for
//! `JobTable::reap_scan` to collect.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::process::{Child, Command};

use nix::errno::Errno;
use nix::unistd::Pid;

use crate::env::os_error_text;
use crate::errors::{Error, ErrorKind, Result};
use crate::jobs::{ExitReport, Job, JobTable};
use crate::redirect::Output;

const BACKGROUND_MARKER: &str = "&";

/// Result of asking the OS to start a program.
enum Launch {
    Started(Child),
    /// A child could not run the program (not found, not executable, ...).
    Failed(String),
}

/// What `run_background` did with a command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BackgroundLaunch {
    /// The child is running and has been added to the job table.
    Started(Job),
    /// The program could not be executed; holds the OS error text.
    Failed(String),
}

/// Runs `argv` and blocks until it terminates.
///
/// The child is announced on `notices` as `[<pid>] <name>` once it is running,
/// and again with its exit status when it finishes.
/// A program that cannot be executed yields `ExitReport::LaunchFailed` after a
/// diagnostic is written to `notices`. Only a failure to create any process
/// at all is returned as an error (`SpawnFailed`).
pub fn run_foreground(argv: Vec<String>, stdout: Output, notices: &mut dyn Write) -> Result<ExitReport> {
    let program = program_name(&argv)?.to_string();
    // The child writes straight to the fd; don't let it overtake our buffer
    notices.flush()?;
    let mut child = match launch(&argv, stdout)? {
        Launch::Started(child) => child,
        Launch::Failed(reason) => return launch_failed(&program, reason, notices),
    };

    let pid = child.id();
    writeln!(notices, "[{}] {}", pid, program)?;
    notices.flush()?;
    debug!("waiting for foreground process {} ({})", pid, program);
    let report = ExitReport::from(child.wait()?);
    writeln!(notices, "[{}] {} {}", pid, program, report)?;
    Ok(report)
}

/// Starts `argv` without waiting and records it in `jobs`.
///
/// The job is announced on `notices` as `[<pid>] <name>`. When the program
/// could not be executed a diagnostic is written and nothing is recorded.
pub fn run_background(
    mut argv: Vec<String>,
    stdout: Output,
    jobs: &mut JobTable,
    notices: &mut dyn Write,
) -> Result<BackgroundLaunch> {
    strip_background_marker(&mut argv);
    let program = program_name(&argv)?.to_string();
    notices.flush()?;
    let child = match launch(&argv, stdout)? {
        Launch::Started(child) => child,
        Launch::Failed(reason) => {
            launch_failed(&program, reason.clone(), notices)?;
            return Ok(BackgroundLaunch::Failed(reason));
        }
    };

    // Dropping `Child` neither waits nor kills; the job table owns the pid now.
    let job = Job::new(Pid::from_raw(child.id() as i32), program);
    writeln!(notices, "[{}] {}", job.pid(), job.name())?;
    jobs.append(job.clone());
    Ok(BackgroundLaunch::Started(job))
}

/// The `&` flag belongs to the shell and is never passed to the program.
fn strip_background_marker(argv: &mut Vec<String>) {
    if argv.last().map(String::as_str) == Some(BACKGROUND_MARKER) {
        argv.pop();
    }
}

fn program_name(argv: &[String]) -> Result<&str> {
    argv.first()
        .map(String::as_str)
        .ok_or_else(|| Error::from("cannot launch an empty command"))
}

fn launch(argv: &[String], stdout: Output) -> Result<Launch> {
    let (program, args) = match argv.split_first() {
        Some(split) => split,
        None => bail!("cannot launch an empty command"),
    };

    let mut command = Command::new(OsStr::new(program));
    command.args(args.iter().map(OsStr::new));
    command.stdout(stdout);

    match command.spawn() {
        Ok(child) => {
            debug!("spawned {} as pid {}", program, child.id());
            Ok(Launch::Started(child))
        }
        Err(e) => classify_spawn_error(program, e),
    }
}

/// Resource exhaustion means no child could be created; anything else is the
/// program failing to execute.
fn classify_spawn_error(program: &str, e: io::Error) -> Result<Launch> {
    match e.raw_os_error().map(Errno::from_i32) {
        Some(Errno::EAGAIN) | Some(Errno::ENOMEM) => {
            error!("unable to create process for {}: {}", program, e);
            Err(Error::with_chain(e, ErrorKind::SpawnFailed(program.to_string())))
        }
        _ => Ok(Launch::Failed(os_error_text(&e))),
    }
}

fn launch_failed(program: &str, reason: String, notices: &mut dyn Write) -> Result<ExitReport> {
    warn!("failed to execute {}: {}", program, reason);
    let diagnostic = ErrorKind::LaunchFailed(program.to_string(), reason.clone());
    writeln!(notices, "{}", diagnostic)?;
    Ok(ExitReport::LaunchFailed(reason))
}
