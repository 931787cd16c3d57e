// src/system/program.rs

use crate::{
    core::{coercion::FormatError, settings::Settings, task::Task},
    system::{
        executor::{self, ExecOptions, ExecutionError, Executor},
        search_path,
    },
};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while locating or running a program.
#[derive(Error, Debug)]
pub enum ProgramError {
    /// No executable with this name on the search path.
    #[error("Program '{0}' could not be found.")]
    NotFound(String),
    /// None of the candidate names or paths exist.
    #[error("Programs {0} were not found.")]
    NoneFound(String),
    /// The path could not be made absolute.
    #[error("Invalid program path '{path}': {source}")]
    InvalidPath {
        /// The path as given.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Spawning the program failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// The task's values could not be composed.
    #[error("Could not compose the arguments: {0}")]
    Arguments(#[from] FormatError),
}

/// An executable on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    path: PathBuf,
    name: String,
}

impl Program {
    /// Creates a program from a path. `~` is expanded and the path is made absolute.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let raw = path.as_ref().to_string_lossy().into_owned();
        let expanded = shellexpand::tilde(&raw).into_owned();
        let absolute = std::path::absolute(&expanded).map_err(|source| ProgramError::InvalidPath {
            path: raw.clone(),
            source,
        })?;
        let path = dunce::simplified(&absolute).to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { path, name })
    }

    /// Creates a program from `path` only if it names an existing file.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.is_file() { Self::new(path).ok() } else { None }
    }

    /// The first of `paths` that names an existing file.
    pub fn from_paths<I, P>(paths: I) -> Option<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths.into_iter().find_map(Self::from_path)
    }

    /// Finds a program on the search path.
    pub fn find_by_name(name: &str, settings: &Settings) -> Result<Self, ProgramError> {
        let path = search_path::find_program(name, settings)
            .ok_or_else(|| ProgramError::NotFound(name.to_string()))?;
        Self::new(path)
    }

    /// Finds the first program matching one of `names` on the search path.
    pub fn find_by_names<S: AsRef<str>>(names: &[S], settings: &Settings) -> Result<Self, ProgramError> {
        match search_path::find_program_by_names(names, settings) {
            Some(path) => Self::new(path),
            None => Err(ProgramError::NoneFound(
                names
                    .iter()
                    .map(|n| format!("{:?}", n.as_ref()))
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
        }
    }

    /// The absolute path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name of the executable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the program with `args`, inheriting the standard streams.
    pub fn run(&self, executor: &dyn Executor, args: &[String]) -> Result<bool, ProgramError> {
        self.run_with(executor, args, &ExecOptions::default())
    }

    /// Runs the program with `args` and explicit execution options.
    pub fn run_with(
        &self,
        executor: &dyn Executor,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<bool, ProgramError> {
        Ok(executor.execute(&self.path, args, options)?)
    }

    /// Runs the program through the privilege-elevation program.
    pub fn sudo(
        &self,
        executor: &dyn Executor,
        settings: &Settings,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<bool, ProgramError> {
        Ok(executor::execute_elevated(
            executor, settings, &self.path, args, options,
        )?)
    }

    /// Composes `task` and runs the program with the result, elevated when the
    /// task asks for it.
    pub fn run_task(
        &self,
        executor: &dyn Executor,
        settings: &Settings,
        task: &Task,
        options: &ExecOptions,
    ) -> Result<bool, ProgramError> {
        let args = task.compose()?;
        if task.sudo() {
            self.sudo(executor, settings, &args, options)
        } else {
            self.run_with(executor, &args, options)
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// How a program is known: a primary name, aliases and an optional default path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramSpec {
    /// The primary program name.
    pub name: Option<String>,
    /// Alternative names, tried after the primary one.
    pub aliases: Vec<String>,
    /// Tried before any name lookup.
    pub path: Option<PathBuf>,
}

impl ProgramSpec {
    /// A spec with only a primary name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Replaces the aliases.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The primary name followed by the aliases.
    pub fn program_names(&self) -> Vec<&str> {
        self.name
            .iter()
            .chain(self.aliases.iter())
            .map(String::as_str)
            .collect()
    }

    /// The default path if it exists, otherwise the first name found on the search path.
    pub fn find(&self, settings: &Settings) -> Result<Program, ProgramError> {
        if let Some(program) = self.path.as_ref().and_then(Program::from_path) {
            return Ok(program);
        }
        Program::find_by_names(&self.program_names(), settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{option::OptionSpec, task_type::TaskType};
    use std::{cell::RefCell, fs};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingExecutor {
        calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    }

    impl Executor for RecordingExecutor {
        fn execute(
            &self,
            program: &Path,
            argv: &[String],
            _options: &ExecOptions,
        ) -> Result<bool, ExecutionError> {
            self.calls
                .borrow_mut()
                .push((program.to_path_buf(), argv.to_vec()));
            Ok(true)
        }
    }

    fn exe_name(name: &str) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.exe", name)
        } else {
            name.to_string()
        }
    }

    fn fixture(names: &[&str]) -> (TempDir, Settings) {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(exe_name(name)), b"").unwrap();
        }
        let settings = Settings {
            search_paths: Some(vec![dir.path().to_path_buf()]),
            ..Settings::default()
        };
        (dir, settings)
    }

    #[test]
    fn test_new_makes_path_absolute() {
        let program = Program::new("bin/tool").unwrap();
        assert!(program.path().is_absolute());
        assert_eq!(program.name(), "tool");
    }

    #[test]
    fn test_from_path_requires_existing_file() {
        let (dir, _) = fixture(&["cat"]);
        let existing = dir.path().join(exe_name("cat"));

        assert!(Program::from_path(&existing).is_some());
        assert!(Program::from_path(dir.path().join("missing")).is_none());
        assert_eq!(
            Program::from_paths([dir.path().join("missing"), existing.clone()])
                .map(|p| p.path().to_path_buf()),
            Some(dunce::simplified(&existing).to_path_buf())
        );
    }

    #[test]
    fn test_find_by_name() {
        let (_dir, settings) = fixture(&["echo"]);
        let program = Program::find_by_name("echo", &settings).unwrap();
        assert_eq!(program.name(), exe_name("echo"));

        let err = Program::find_by_name("nope", &settings).unwrap_err();
        assert_eq!(err.to_string(), "Program 'nope' could not be found.");
    }

    #[test]
    fn test_find_by_names() {
        let (_dir, settings) = fixture(&["as"]);
        assert!(Program::find_by_names(&["gas", "as"], &settings).is_ok());

        let err = Program::find_by_names(&["gas", "gcc-as"], &settings).unwrap_err();
        assert_eq!(err.to_string(), "Programs \"gas\", \"gcc-as\" were not found.");
    }

    #[test]
    fn test_program_spec_prefers_default_path() {
        let (dir, settings) = fixture(&["vim", "vi"]);
        let default_path = dir.path().join(exe_name("vi"));

        let spec = ProgramSpec::named("vim").with_aliases(["vi"]).with_path(&default_path);
        assert_eq!(spec.program_names(), vec!["vim", "vi"]);
        assert_eq!(spec.find(&settings).unwrap().name(), exe_name("vi"));

        let by_name = ProgramSpec::named("vim").with_path(dir.path().join("gone"));
        assert_eq!(by_name.find(&settings).unwrap().name(), exe_name("vim"));
    }

    #[test]
    fn test_run_task_composes_arguments() {
        let (_dir, settings) = fixture(&["ls", "sudo"]);
        let ls_type = TaskType::builder("ls")
            .short_option(OptionSpec::new("-a").name("all"))
            .unwrap()
            .build()
            .unwrap();
        let mut task = Task::new(&ls_type);
        task.set("all", true).unwrap();

        let program = Program::find_by_name("ls", &settings).unwrap();
        let executor = RecordingExecutor::default();
        assert!(
            program
                .run_task(&executor, &settings, &task, &ExecOptions::default())
                .unwrap()
        );

        task.set_sudo(true);
        program
            .run_task(&executor, &settings, &task, &ExecOptions::default())
            .unwrap();

        let calls = executor.calls.borrow();
        assert_eq!(calls[0].0, program.path());
        assert_eq!(calls[0].1, vec!["-a"]);
        assert_eq!(calls[1].0.file_name().unwrap(), exe_name("sudo").as_str());
        assert_eq!(
            calls[1].1,
            vec!["--".to_string(), program.path().display().to_string(), "-a".to_string()]
        );
    }
}
