// src/system/executor.rs

use crate::{
    core::{
        settings::Settings,
        task::{Task, TaskError},
        task_type::DeclarationError,
    },
    system::{search_path, sudo},
};
use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
    process::{Command as StdCommand, Stdio},
};
use thiserror::Error;

/// Errors raised while spawning a program.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The process could not be spawned or waited on.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    /// A redirection file could not be opened.
    #[error("Could not open '{path}' for redirection: {source}")]
    Redirect {
        /// The redirection target.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The privilege-elevation program is not on the search path.
    #[error("Could not find the \"{0}\" program needed to elevate privileges.")]
    ElevationUnavailable(String),
    /// The built-in elevation task type failed to declare.
    #[error("Invalid elevation task declaration: {0}")]
    ElevationDeclaration(#[from] DeclarationError),
    /// The elevated command line could not be composed.
    #[error("Could not compose the elevated command: {0}")]
    ElevationArguments(#[from] TaskError),
}

/// Where a standard stream of the child process goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Redirect {
    /// Share the stream of the current process.
    #[default]
    Inherit,
    /// Discard (or, for stdin, provide an empty stream).
    Null,
    /// Read from (stdin) or truncate and write to (stdout/stderr) a file.
    File(PathBuf),
}

/// Platform execution options. The composition engine never inspects these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory. Defaults to the current one.
    pub cwd: Option<PathBuf>,
    /// Variables added to the inherited environment.
    pub env: HashMap<String, String>,
    /// Standard input.
    pub stdin: Redirect,
    /// Standard output.
    pub stdout: Redirect,
    /// Standard error.
    pub stderr: Redirect,
}

/// Runs a program with an argument vector and reports whether it exited successfully.
pub trait Executor {
    /// Runs `program` with `argv` and waits for it to exit.
    fn execute(
        &self,
        program: &Path,
        argv: &[String],
        options: &ExecOptions,
    ) -> Result<bool, ExecutionError>;
}

/// Executes programs with [`std::process::Command`], waiting for them to finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor {
    debug: bool,
}

impl SystemExecutor {
    /// Creates an executor honoring the `debug` setting.
    pub fn new(settings: &Settings) -> Self {
        Self {
            debug: settings.debug,
        }
    }

    /// Creates an executor that echoes every command line to stderr when `debug` is set.
    pub fn with_debug(debug: bool) -> Self {
        Self { debug }
    }
}

impl Executor for SystemExecutor {
    fn execute(
        &self,
        program: &Path,
        argv: &[String],
        options: &ExecOptions,
    ) -> Result<bool, ExecutionError> {
        let command_line = display_command(program, argv);
        if self.debug {
            eprintln!(">>> {}", command_line);
        }
        log::debug!("Executing: {}", command_line);

        let mut command = StdCommand::new(program);
        command
            .args(argv)
            .envs(&options.env)
            .stdin(stdio_for(&options.stdin, false)?)
            .stdout(stdio_for(&options.stdout, true)?)
            .stderr(stdio_for(&options.stderr, true)?);
        if let Some(cwd) = &options.cwd {
            command.current_dir(dunce::simplified(cwd));
        }

        let status = command
            .status()
            .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

        log::debug!("Command '{}' finished with {}", command_line, status);
        Ok(status.success())
    }
}

/// Runs `program` through the configured privilege-elevation program.
///
/// The elevation program's own arguments are composed by the built-in `sudo`
/// task type, so a dashed program argument is guarded with `--`.
pub fn execute_elevated(
    executor: &dyn Executor,
    settings: &Settings,
    program: &Path,
    argv: &[String],
    options: &ExecOptions,
) -> Result<bool, ExecutionError> {
    let sudo_name = settings.sudo_program();
    let sudo_path = search_path::find_program(sudo_name, settings)
        .ok_or_else(|| ExecutionError::ElevationUnavailable(sudo_name.to_string()))?;

    let mut command = Vec::with_capacity(argv.len() + 1);
    command.push(program.to_string_lossy().into_owned());
    command.extend(argv.iter().cloned());

    let sudo_type = sudo::sudo_task_type()?;
    let mut sudo_task = Task::new(&sudo_type);
    sudo_task.set("command", command)?;
    let sudo_argv = sudo_task.compose().map_err(TaskError::from)?;

    executor.execute(&sudo_path, &sudo_argv, options)
}

/// A shell-like rendering of a command line, for logs and debug output only.
pub fn display_command(program: &Path, argv: &[String]) -> String {
    let program = program.to_string_lossy();
    let parts = std::iter::once(&*program).chain(argv.iter().map(String::as_str));
    shlex::try_join(parts).unwrap_or_else(|_| {
        let mut line = program.to_string();
        for arg in argv {
            line.push(' ');
            line.push_str(arg);
        }
        line
    })
}

fn stdio_for(redirect: &Redirect, write: bool) -> Result<Stdio, ExecutionError> {
    let open_error = |path: &Path, source| ExecutionError::Redirect {
        path: path.display().to_string(),
        source,
    };
    Ok(match redirect {
        Redirect::Inherit => Stdio::inherit(),
        Redirect::Null => Stdio::null(),
        Redirect::File(path) if write => {
            Stdio::from(File::create(path).map_err(|e| open_error(path, e))?)
        }
        Redirect::File(path) => Stdio::from(File::open(path).map_err(|e| open_error(path, e))?),
    })
}
