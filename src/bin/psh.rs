extern crate docopt;
extern crate fern;
#[macro_use]
extern crate log;
extern crate nix;
extern crate psh_rs;
#[macro_use]
extern crate serde_derive;

use std::path::PathBuf;

use docopt::Docopt;
use nix::unistd::Pid;
use psh_rs::{Shell, ShellConfig, DEFAULT_PROMPT};

const LOG_FILE_NAME: &str = ".psh_log";

const USAGE: &str = "
psh.

Usage:
    psh [options]
    psh (-h | --help)
    psh --version

Options:
    -h --help                  Show this screen.
    --version                  Show version.
    -p <prompt>                Prompt to display before each command.
    --exit-on-launch-failure   Exit the shell when a program cannot be executed.
    --log=<path>               File to write log to, defaults to ~/.psh_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    flag_p: Option<String>,
    flag_exit_on_launch_failure: bool,
    flag_log: Option<String>,
    flag_version: bool,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logger(&args.flag_log);
    debug!("{:?}", args);

    if args.flag_version {
        println!("psh version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let prompt = args.flag_p.unwrap_or_else(|| DEFAULT_PROMPT.to_string());
    let config =
        ShellConfig::interactive(prompt).exit_on_launch_failure(args.flag_exit_on_launch_failure);
    let mut shell = Shell::new(config);
    shell.execute_from_stdin();
}

/// Logging is best effort: without a writable log file the shell still runs.
fn init_logger(path: &Option<String>) {
    let log_path = match path.clone().map(PathBuf::from).or_else(default_log_path) {
        Some(log_path) => log_path,
        None => return,
    };

    let log_file = match fern::log_file(&log_path) {
        Ok(log_file) => log_file,
        Err(e) => {
            eprintln!("psh: unable to open log file {}: {}", log_path.display(), e);
            return;
        }
    };

    let pid = Pid::this();
    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(log_file)
        .apply();
    if let Err(e) = result {
        eprintln!("psh: unable to initialize logging: {}", e);
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}
