//! Background job bookkeeping.
//!
//! The `JobTable` holds every background child that has not been reaped yet,
//! in the order the children were started. Reaping removes finished entries
//! and shifts the rest down, so the table never has holes.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::errors::Result;

/// How a child process finished, or why it never ran.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExitReport {
    /// The program exited with this status code.
    Exited(i32),
    /// The program was killed by this signal number.
    Signaled(i32),
    /// The program could not be executed; holds the OS error text.
    LaunchFailed(String),
}

impl ExitReport {
    /// Status the shell records for this outcome, bash style: signals map to
    /// `128 + signal` and launch failures to 127.
    pub fn code(&self) -> i32 {
        match *self {
            ExitReport::Exited(code) => code,
            ExitReport::Signaled(signal) => 128 + signal,
            ExitReport::LaunchFailed(_) => 127,
        }
    }
}

impl From<ExitStatus> for ExitReport {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ExitReport::Exited(code),
            (None, Some(signal)) => ExitReport::Signaled(signal),
            // Stopped/continued statuses are never requested from wait
            (None, None) => ExitReport::Exited(status.into_raw()),
        }
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ExitReport::Exited(code) => write!(f, "Exit {}", code),
            ExitReport::Signaled(signal) => write!(f, "Killed ({})", signal),
            ExitReport::LaunchFailed(ref reason) => write!(f, "Cannot execute: {}", reason),
        }
    }
}

/// A background child process the shell has not reaped yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    pid: Pid,
    name: String,
}

impl Job {
    pub fn new<S: Into<String>>(pid: Pid, name: S) -> Self {
        Job {
            pid,
            name: name.into(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// argv[0] of the command, as it was typed.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID: [{}] Command: \"{}\" running.", self.pid, self.name)
    }
}

/// Ordered collection of live background jobs.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a job after every job already in the table.
    pub fn append(&mut self, job: Job) {
        debug_assert!(
            self.jobs.iter().all(|j| j.pid != job.pid),
            "pid {} is already tracked",
            job.pid
        );
        debug!("tracking background job {} ({})", job.pid, job.name);
        self.jobs.push(job);
    }

    /// Live jobs in the order they were started.
    pub fn list(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Polls every job without blocking and removes the ones that finished.
    ///
    /// Finished jobs are returned in table order together with how they
    /// ended.
    pub fn reap_scan(&mut self) -> Vec<(Job, ExitReport)> {
        self.reap_scan_with(poll_status)
    }

    /// Same as `reap_scan`, but asks `probe` for each job's status.
    ///
    /// `probe` returns `Ok(None)` while the job is still running. A probe error
    /// means the pid can no longer be waited on (e.g. `ECHILD`); such a job is
    /// dropped from the table without a report.
    pub fn reap_scan_with<F>(&mut self, mut probe: F) -> Vec<(Job, ExitReport)>
    where
        F: FnMut(&Job) -> Result<Option<ExitReport>>,
    {
        let mut finished = Vec::new();
        // Only advance when the current slot is kept: after a removal the next
        // job has shifted into slot `i` and still needs to be examined.
        let mut i = 0;
        while i < self.jobs.len() {
            match probe(&self.jobs[i]) {
                Ok(None) => i += 1,
                Ok(Some(report)) => {
                    let job = self.jobs.remove(i);
                    debug!("reaped background job {} ({}): {}", job.pid, job.name, report);
                    finished.push((job, report));
                }
                Err(e) => {
                    let job = self.jobs.remove(i);
                    warn!(
                        "dropping background job {} ({}), status unavailable: {}",
                        job.pid, job.name, e
                    );
                }
            }
        }

        finished
    }
}

/// Non-blocking status query for one child.
fn poll_status(job: &Job) -> Result<Option<ExitReport>> {
    let report = match wait::waitpid(job.pid, Some(WaitPidFlag::WNOHANG))? {
        WaitStatus::Exited(_, code) => Some(ExitReport::Exited(code)),
        WaitStatus::Signaled(_, signal, _) => Some(ExitReport::Signaled(signal as i32)),
        _ => None,
    };
    Ok(report)
}
