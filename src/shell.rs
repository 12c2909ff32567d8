//! Psh - Shell Module
//!
//! The Shell owns the background job table. Each turn of its loop reads a
//! line, reports background jobs that finished since the last turn, and then
//! dispatches the command.

use std::io::{self, BufRead, Write};
use std::process;
use std::str;

use crate::builtins::{self, BuiltinOutcome};
use crate::errors::{Error, ErrorKind, Result};
use crate::execute_command::{run_background, run_foreground, BackgroundLaunch};
use crate::jobs::{ExitReport, JobTable};
use crate::parse::Command;
use crate::redirect::{with_redirected_stdout, Output};

/// Prompt used when none is given on the command line.
pub const DEFAULT_PROMPT: &str = "psh> ";

const FAILURE_EXIT_STATUS: i32 = 1;
const SYNTAX_ERROR_EXIT_STATUS: i32 = 2;

/// Policy object to control a Shell's behavior
#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Printed before reading each line.
    prompt: String,

    /// Treat a program that cannot be executed as fatal to the whole shell,
    /// exiting with a failure status. Off by default: the failure is reported
    /// and the shell keeps reading commands.
    exit_on_launch_failure: bool,

    /// Determines if some messages (e.g. the startup prompt banner) are
    /// displayed.
    display_messages: bool,
}

impl ShellConfig {
    /// Creates an interactive shell configuration using `prompt`.
    pub fn interactive<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            display_messages: true,
            ..Default::default()
        }
    }

    /// Makes a failed program launch terminate the shell.
    pub fn exit_on_launch_failure(mut self, enabled: bool) -> Self {
        self.exit_on_launch_failure = enabled;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            exit_on_launch_failure: false,
            display_messages: false,
        }
    }
}

/// Psh Shell
#[derive(Debug)]
pub struct Shell {
    job_table: JobTable,
    /// Exit status of last command executed.
    last_exit_status: i32,
    config: ShellConfig,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Shell {
        info!("psh started up");
        Shell {
            job_table: JobTable::new(),
            last_exit_status: 0,
            config,
        }
    }

    /// Background jobs that have not been reaped yet.
    pub fn jobs(&self) -> &JobTable {
        &self.job_table
    }

    #[cfg(test)]
    pub(crate) fn jobs_mut(&mut self) -> &mut JobTable {
        &mut self.job_table
    }

    pub fn last_exit_status(&self) -> i32 {
        self.last_exit_status
    }

    /// Reads and runs commands from standard input until `exit` or end of
    /// input.
    pub fn execute_from_stdin(&mut self) -> ! {
        if self.config.display_messages {
            println!("User prompt is: \"{}\"", self.config.prompt);
        }

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            let line = match self.prompt(&mut stdin.lock(), &mut stdout) {
                Ok(Some(line)) => line,
                Ok(None) => self.exit(0),
                Err(e) => {
                    error!("failed to read input: {}", e);
                    eprintln!("psh: could not read from user command line: {}", e);
                    self.exit(FAILURE_EXIT_STATUS);
                }
            };

            let temp_result = self.reap_jobs(&mut stdout);
            log_if_err!(temp_result, "reap_jobs");

            if let Err(e) = self.execute_line(&line, &mut stdout) {
                error!("fatal error: {}", e);
                eprintln!("psh: {}", error_line(&e));
                self.exit(FAILURE_EXIT_STATUS);
            }
        }
    }

    /// Prints the prompt and reads one line as raw bytes. Returns `None` at
    /// end of input.
    fn prompt<R: BufRead>(&self, input: &mut R, stdout: &mut dyn Write) -> Result<Option<Vec<u8>>> {
        write!(stdout, "{}", self.config.prompt)?;
        stdout.flush()?;

        let mut line = Vec::new();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Runs one line of raw input. A line that is not UTF-8 is reported and
    /// skipped.
    pub fn execute_line(&mut self, line: &[u8], stdout: &mut dyn Write) -> Result<()> {
        match str::from_utf8(line) {
            Ok(line) => self.execute_command_string(line, stdout),
            Err(e) => {
                warn!("skipping input line: {}", e);
                writeln!(stdout, "psh: {}", ErrorKind::InvalidInput(e.valid_up_to()))?;
                self.last_exit_status = FAILURE_EXIT_STATUS;
                Ok(())
            }
        }
    }

    /// Reports and forgets background jobs that have finished.
    pub fn reap_jobs(&mut self, stdout: &mut dyn Write) -> Result<()> {
        for (job, report) in self.job_table.reap_scan() {
            writeln!(
                stdout,
                "Background: [{}] \"{}\" {}",
                job.pid(),
                job.name(),
                report
            )?;
        }

        Ok(())
    }

    /// Parses and runs one line of input.
    ///
    /// Only errors that leave the shell unable to continue are returned.
    pub fn execute_command_string(&mut self, input: &str, stdout: &mut dyn Write) -> Result<()> {
        let command = match Command::parse(input) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(e) => {
                writeln!(stdout, "psh: {}", e)?;
                self.last_exit_status = SYNTAX_ERROR_EXIT_STATUS;
                return Ok(());
            }
        };

        self.dispatch(command, stdout)
    }

    /// Runs a builtin in-process, or launches a program.
    ///
    /// Builtin and launch errors are reported on `stdout` here. Only
    /// `SpawnFailed` (and failing to write to `stdout`) is returned.
    pub fn dispatch(&mut self, command: Command, stdout: &mut dyn Write) -> Result<()> {
        debug!("dispatching {:?}", command);
        if let BuiltinOutcome::Handled(status) = builtins::try_builtin(self, &command.argv, stdout) {
            self.last_exit_status = status;
            return Ok(());
        }

        let Command {
            argv,
            background,
            redirect_target,
        } = command;
        let result = match redirect_target {
            Some(path) => with_redirected_stdout(&path, |output| {
                self.launch(argv, background, output, stdout)
            })
            .and_then(|launched| launched),
            None => self.launch(argv, background, Output::Inherit, stdout),
        };
        self.record_launch(result, stdout)
    }

    /// Records the status of a launch. Errors other than `SpawnFailed` are
    /// reported on `stdout` and swallowed.
    fn record_launch(&mut self, result: Result<ExitReport>, stdout: &mut dyn Write) -> Result<()> {
        match result {
            Ok(report) => {
                self.last_exit_status = report.code();
                if let ExitReport::LaunchFailed(_) = report {
                    if self.config.exit_on_launch_failure {
                        self.exit(FAILURE_EXIT_STATUS);
                    }
                }
                Ok(())
            }
            Err(e) => {
                if let ErrorKind::SpawnFailed(_) = *e.kind() {
                    return Err(e);
                }

                warn!("command failed: {}", e);
                writeln!(stdout, "psh: {}", error_line(&e))?;
                self.last_exit_status = FAILURE_EXIT_STATUS;
                Ok(())
            }
        }
    }

    /// Background commands report `Exited(0)` once started.
    fn launch(
        &mut self,
        argv: Vec<String>,
        background: bool,
        output: Output,
        stdout: &mut dyn Write,
    ) -> Result<ExitReport> {
        if !background {
            return run_foreground(argv, output, stdout);
        }

        match run_background(argv, output, &mut self.job_table, stdout)? {
            BackgroundLaunch::Started(_) => Ok(ExitReport::Exited(0)),
            BackgroundLaunch::Failed(reason) => Ok(ExitReport::LaunchFailed(reason)),
        }
    }

    /// Exits the process with `code`; background jobs are left running.
    pub fn exit(&mut self, code: i32) -> ! {
        let temp_result = io::stdout().flush();
        log_if_err!(temp_result, "flush stdout");

        if !self.job_table.is_empty() {
            info!(
                "leaving {} background job(s) running",
                self.job_table.len()
            );
        }
        info!("psh has shut down");
        process::exit(code);
    }
}

/// Error and its causes on one line.
fn error_line(e: &Error) -> String {
    e.iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(": ")
}
