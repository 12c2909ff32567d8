//! Psh builtins
//!
//! Commands that run inside the shell process instead of in a child. The set
//! is fixed: the first token is matched case-sensitively against the names
//! below and anything else falls through to the process launcher.

use self::prelude::*;

pub mod prelude {
    pub use std::io::Write;

    pub use crate::errors::{Error, ErrorKind, Result};
    pub use crate::shell::Shell;
}

mod dirs;
mod env;
mod exit;
mod ids;
mod jobs;

const CD_NAME: &str = "cd";
const EXIT_NAME: &str = "exit";
const GET_NAME: &str = "get";
const JOBS_NAME: &str = "jobs";
const PID_NAME: &str = "pid";
const PPID_NAME: &str = "ppid";
const PWD_NAME: &str = "pwd";
const SET_NAME: &str = "set";

const USAGE_ERROR_EXIT_STATUS: i32 = 2;

/// What `try_builtin` did with a command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuiltinOutcome {
    /// The command was a builtin and has run; holds its exit status.
    Handled(i32),
    /// Not a builtin, the caller should launch a program.
    NotBuiltin,
}

/// A builtin with its arguments already checked.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Builtin {
    Exit,
    Pid,
    Ppid,
    Cd(Option<String>),
    Pwd,
    Set { name: String, value: String },
    Get(String),
    Jobs,
}

impl Builtin {
    /// Returns `None` when `argv[0]` is not a builtin name, otherwise the
    /// parsed builtin or a usage error if the argument count is wrong.
    pub fn parse<S: AsRef<str>>(argv: &[S]) -> Option<Result<Builtin>> {
        let (program, args) = argv.split_first()?;
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

        let builtin = match program.as_ref() {
            EXIT_NAME => check_arity(EXIT_NAME, &args, 0, 0).map(|_| Builtin::Exit),
            PID_NAME => check_arity(PID_NAME, &args, 0, 0).map(|_| Builtin::Pid),
            PPID_NAME => check_arity(PPID_NAME, &args, 0, 0).map(|_| Builtin::Ppid),
            CD_NAME => check_arity(CD_NAME, &args, 0, 1)
                .map(|_| Builtin::Cd(args.first().map(|dir| dir.to_string()))),
            PWD_NAME => check_arity(PWD_NAME, &args, 0, 0).map(|_| Builtin::Pwd),
            SET_NAME => check_arity(SET_NAME, &args, 2, 2).map(|_| Builtin::Set {
                name: args[0].to_string(),
                value: args[1].to_string(),
            }),
            GET_NAME => check_arity(GET_NAME, &args, 1, 1).map(|_| Builtin::Get(args[0].to_string())),
            JOBS_NAME => check_arity(JOBS_NAME, &args, 0, 0).map(|_| Builtin::Jobs),
            _ => return None,
        };

        Some(builtin)
    }

    /// Runs the builtin, writing any output to `stdout`.
    pub fn run(self, shell: &mut Shell, stdout: &mut dyn Write) -> Result<()> {
        debug!("running builtin {:?}", self);
        match self {
            Builtin::Exit => exit::run(shell),
            Builtin::Pid => ids::pid(stdout),
            Builtin::Ppid => ids::ppid(stdout),
            Builtin::Cd(dir) => dirs::cd(dir),
            Builtin::Pwd => dirs::pwd(stdout),
            Builtin::Set { name, value } => env::set(&name, &value),
            Builtin::Get(name) => env::get(&name, stdout),
            Builtin::Jobs => jobs::list(shell, stdout),
        }
    }
}

/// Runs `argv` if it names a builtin.
///
/// Errors are written to `stdout` as a single line and turned into a non-zero
/// exit status; they never reach the caller.
pub fn try_builtin<S: AsRef<str>>(
    shell: &mut Shell,
    argv: &[S],
    stdout: &mut dyn Write,
) -> BuiltinOutcome {
    let result = match Builtin::parse(argv) {
        None => return BuiltinOutcome::NotBuiltin,
        Some(Ok(builtin)) => builtin.run(shell, stdout),
        Some(Err(e)) => Err(e),
    };

    let status = get_builtin_exit_status(&result);
    if let Err(e) = result {
        let temp_result = writeln!(stdout, "{}", e);
        log_if_err!(temp_result, "failed to report builtin error");
    }
    BuiltinOutcome::Handled(status)
}

fn get_builtin_exit_status(result: &Result<()>) -> i32 {
    match *result {
        Ok(()) => 0,
        Err(ref e) => match *e.kind() {
            ErrorKind::BuiltinUsage(_) => USAGE_ERROR_EXIT_STATUS,
            _ => 1,
        },
    }
}

fn usage(name: &str) -> &'static str {
    match name {
        CD_NAME => "cd [dir]",
        GET_NAME => "get <var>",
        SET_NAME => "set <var> <value>",
        EXIT_NAME => "exit",
        JOBS_NAME => "jobs",
        PID_NAME => "pid",
        PPID_NAME => "ppid",
        PWD_NAME => "pwd",
        _ => unreachable!("{} is not a builtin", name),
    }
}

fn check_arity(name: &str, args: &[&str], min: usize, max: usize) -> Result<()> {
    let problem = if args.len() < min {
        "Not enough"
    } else if args.len() > max {
        "Too many"
    } else {
        return Ok(());
    };

    Err(ErrorKind::BuiltinUsage(format!(
        "{} arguments for \"{}\" command. Format should be \"{}\".",
        problem,
        name,
        usage(name)
    ))
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::shell::ShellConfig;

    fn run_line(shell: &mut Shell, argv: &[&str]) -> (BuiltinOutcome, String) {
        let mut stdout = Vec::new();
        let outcome = try_builtin(shell, argv, &mut stdout);
        (outcome, String::from_utf8(stdout).unwrap())
    }

    #[test]
    fn parse_known_builtins() {
        assert_eq!(Builtin::parse(&["pid"]).unwrap().unwrap(), Builtin::Pid);
        assert_eq!(Builtin::parse(&["cd"]).unwrap().unwrap(), Builtin::Cd(None));
        assert_eq!(
            Builtin::parse(&["cd", "/tmp"]).unwrap().unwrap(),
            Builtin::Cd(Some("/tmp".to_string()))
        );
        assert_eq!(
            Builtin::parse(&["set", "A", "b"]).unwrap().unwrap(),
            Builtin::Set {
                name: "A".to_string(),
                value: "b".to_string()
            }
        );
        assert_eq!(
            Builtin::parse(&["get", "A"]).unwrap().unwrap(),
            Builtin::Get("A".to_string())
        );
    }

    #[test]
    fn unknown_and_case_mismatched_names_fall_through() {
        let mut shell = Shell::new(ShellConfig::default());
        assert!(Builtin::parse(&["ls", "-l"]).is_none());
        assert!(Builtin::parse(&["PWD"]).is_none());
        assert!(Builtin::parse::<&str>(&[]).is_none());
        assert_eq!(run_line(&mut shell, &["Exit"]).0, BuiltinOutcome::NotBuiltin);
    }

    #[test]
    fn set_arity_messages() {
        let mut shell = Shell::new(ShellConfig::default());

        let (outcome, text) = run_line(&mut shell, &["set", "ONLY_NAME"]);
        assert_eq!(outcome, BuiltinOutcome::Handled(USAGE_ERROR_EXIT_STATUS));
        assert_eq!(
            text,
            "Not enough arguments for \"set\" command. Format should be \"set <var> <value>\".\n"
        );

        let (_, text) = run_line(&mut shell, &["set", "A", "b", "c"]);
        assert_eq!(
            text,
            "Too many arguments for \"set\" command. Format should be \"set <var> <value>\".\n"
        );
        assert_eq!(crate::env::get_var("ONLY_NAME"), None);
    }

    #[test]
    fn get_arity_messages() {
        let mut shell = Shell::new(ShellConfig::default());

        let (_, text) = run_line(&mut shell, &["get"]);
        assert_eq!(
            text,
            "Not enough arguments for \"get\" command. Format should be \"get <var>\".\n"
        );
        let (_, text) = run_line(&mut shell, &["get", "A", "B"]);
        assert_eq!(
            text,
            "Too many arguments for \"get\" command. Format should be \"get <var>\".\n"
        );
    }

    #[test]
    fn zero_arity_builtins_reject_arguments() {
        let mut shell = Shell::new(ShellConfig::default());
        for name in &["exit", "pid", "ppid", "pwd", "jobs"] {
            let (outcome, text) = run_line(&mut shell, &[*name, "extra"]);
            assert_eq!(outcome, BuiltinOutcome::Handled(USAGE_ERROR_EXIT_STATUS));
            assert!(text.starts_with("Too many arguments"), "{}", text);
        }
        let (_, text) = run_line(&mut shell, &["cd", "a", "b"]);
        assert!(text.starts_with("Too many arguments for \"cd\""), "{}", text);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut shell = Shell::new(ShellConfig::default());
        let key = format!("PSH_BUILTIN_KEY_LINE{}", line!());

        let (outcome, text) = run_line(&mut shell, &["set", key.as_str(), "Y"]);
        assert_eq!(outcome, BuiltinOutcome::Handled(0));
        assert_eq!(text, "");

        let (outcome, text) = run_line(&mut shell, &["get", key.as_str()]);
        assert_eq!(outcome, BuiltinOutcome::Handled(0));
        assert_eq!(text, "Y\n");
    }

    #[test]
    fn get_unset_variable_reports_not_found() {
        let mut shell = Shell::new(ShellConfig::default());
        let (outcome, text) = run_line(&mut shell, &["get", "PSH_SURELY_UNSET_VARIABLE"]);
        assert_eq!(outcome, BuiltinOutcome::Handled(1));
        assert_eq!(
            text,
            "There is no environment variable \"PSH_SURELY_UNSET_VARIABLE\"\n"
        );
    }
}
