//! Error module. See the [error-chain](https://crates.io/crates/error-chain) crate for details.

#![allow(missing_docs)]

error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Nix(::nix::Error);
    }

    errors {
        /// Tokenizer could not make sense of the line
        Syntax(line: String) {
            description("syntax error")
            display("syntax error near: {}", line)
        }
        /// Input line is not UTF-8; holds the length of the valid prefix
        InvalidInput(valid_up_to: usize) {
            description("input is not valid UTF-8")
            display("input is not valid UTF-8 after byte {}, line ignored", valid_up_to)
        }
        /// A builtin was called with the wrong number of arguments
        BuiltinUsage(message: String) {
            description("builtin usage error")
            display("{}", message)
        }
        DirectoryError(dir: String, reason: String) {
            description("unable to change directory")
            display("cd: {}: {}", dir, reason)
        }
        HomeNotSet {
            description("HOME not set")
            display("cd: HOME not set")
        }
        NoSuchVariable(name: String) {
            description("no such environment variable")
            display("There is no environment variable \"{}\"", name)
        }
        PathTooLong {
            description("working directory path is too long")
            display("pwd: working directory path exceeds the platform limit")
        }
        InvalidVariableName(name: String) {
            description("invalid variable name")
            display("set: \"{}\" is not a valid identifier", name)
        }
        InvalidVariableValue(name: String) {
            description("invalid variable value")
            display("set: value for \"{}\" contains a NUL byte", name)
        }
        RedirectFailed(path: String) {
            description("unable to open redirect target")
            display("cannot redirect output to \"{}\"", path)
        }
        /// The child was created but the program could not be executed
        LaunchFailed(command: String, reason: String) {
            description("command could not be executed")
            display("Cannot execute \"{}\": {}", command, reason)
        }
        /// The OS refused to create a child process at all
        SpawnFailed(command: String) {
            description("unable to create child process")
            display("unable to create a process for \"{}\"", command)
        }
    }
}
