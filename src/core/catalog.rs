//! # Task Catalog
//!
//! Task types can be declared in a TOML file instead of code. Each entry names
//! the program it drives, optionally extends another entry, and lists its
//! options, non-options and subtasks:
//!
//! ```toml
//! [tasks.ls]
//! program = "ls"
//! options = [
//!     { flag = "-a", name = "all" },
//!     { flag = "--hide", multiple = true },
//! ]
//! non_options = [{ name = "files", multiple = true }]
//! ```
//!
//! Loading resolves `extends` and `subtasks` references into a graph of shared
//! [`TaskType`]s. Custom formatters can only be declared in code.

use crate::{
    core::{
        non_option::{NonOptionSpec, Placement},
        option::OptionSpec,
        task_type::{DeclarationError, TaskType},
    },
    system::program::ProgramSpec,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

/// Errors raised while loading or resolving a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The catalog file is not valid TOML or has unknown fields.
    #[error("Error parsing TOML in '{path}': {source}")]
    TomlParse {
        /// File path, or `<inline>` for text catalogs.
        path: String,
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },
    /// `extends` names a task the catalog does not declare.
    #[error("Task '{task}' extends unknown task '{parent}'.")]
    UnknownParent {
        /// The extending task.
        task: String,
        /// The missing parent.
        parent: String,
    },
    /// A subtask entry names a task the catalog does not declare.
    #[error("Task '{task}' references unknown subtask type '{subtask}'.")]
    UnknownSubtask {
        /// The task declaring the subtask.
        task: String,
        /// The missing subtask type.
        subtask: String,
    },
    /// `extends` or subtask references form a cycle.
    #[error("Circular task declaration detected: {cycle_path}")]
    CircularDeclaration {
        /// The cycle, rendered as `a -> b -> a`.
        cycle_path: String,
    },
    /// A non-option mixes `placement` with the `leading`/`tailing` hints.
    #[error(
        "Non-option '{non_option}' of task '{task}' sets `placement` together with `leading`/`tailing`."
    )]
    ConflictingPlacement {
        /// The task declaring the non-option.
        task: String,
        /// The offending non-option.
        non_option: String,
    },
    /// The builder rejected a declaration.
    #[error("Invalid declaration in task '{task}': {source}")]
    Declaration {
        /// The task being built.
        task: String,
        /// What the builder rejected.
        #[source]
        source: DeclarationError,
    },
}

// --- TOML MODELS ---

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct TomlCatalog {
    #[serde(default)]
    tasks: HashMap<String, TomlTask>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct TomlTask {
    program: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    path: Option<PathBuf>,
    extends: Option<String>,
    #[serde(default)]
    options: Vec<TomlOption>,
    #[serde(default)]
    non_options: Vec<TomlNonOption>,
    /// Subtask name -> task entry name, in declaration order.
    #[serde(default)]
    subtasks: IndexMap<String, String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct TomlOption {
    flag: String,
    name: Option<String>,
    #[serde(default)]
    equals: bool,
    #[serde(default)]
    multiple: bool,
    separator: Option<String>,
    #[serde(default)]
    sub_options: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct TomlNonOption {
    name: String,
    placement: Option<Placement>,
    leading: Option<bool>,
    tailing: Option<bool>,
    #[serde(default)]
    multiple: bool,
}

impl From<TomlOption> for OptionSpec {
    fn from(option: TomlOption) -> Self {
        Self {
            flag: option.flag,
            name: option.name,
            equals: option.equals,
            multiple: option.multiple,
            separator: option.separator,
            sub_options: option.sub_options,
            formatter: None,
        }
    }
}

impl TomlNonOption {
    /// `placement` and the `leading`/`tailing` hints are alternatives; an entry
    /// may use one form or the other, never both.
    fn into_spec(self, task: &str) -> Result<NonOptionSpec, CatalogError> {
        let (leading, tailing) = match (self.placement, self.leading, self.tailing) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(CatalogError::ConflictingPlacement {
                    task: task.to_string(),
                    non_option: self.name,
                });
            }
            (Some(Placement::Leading), None, None) => (Some(true), None),
            (Some(Placement::Tailing), None, None) => (None, Some(true)),
            (None, leading, tailing) => (leading, tailing),
        };
        Ok(NonOptionSpec {
            name: self.name,
            leading,
            tailing,
            multiple: self.multiple,
        })
    }
}

// --- RESOLVED CATALOG ---

/// A declared task type together with the program it drives.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// The resolved type, parents and subtask types included.
    pub task_type: Arc<TaskType>,
    /// How to locate the program.
    pub program: ProgramSpec,
}

/// All task types declared in a catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    /// Loads and resolves a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        log::debug!("Loading task catalog from '{}'", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Resolves a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, CatalogError> {
        let raw: TomlCatalog = toml::from_str(content).map_err(|source| CatalogError::TomlParse {
            path: origin.to_string(),
            source,
        })?;

        let mut resolver = Resolver {
            raw: &raw.tasks,
            built: HashMap::new(),
            visiting: Vec::new(),
        };
        let mut names: Vec<&String> = raw.tasks.keys().collect();
        names.sort();
        for name in names {
            resolver.build(name, || CatalogError::UnknownParent {
                task: name.clone(),
                parent: name.clone(),
            })?;
        }

        let entries = resolver
            .built
            .into_iter()
            .filter_map(|(name, task_type)| {
                let raw_task = raw.tasks.get(&name)?;
                let program = ProgramSpec {
                    name: Some(raw_task.program.clone().unwrap_or_else(|| name.clone())),
                    aliases: raw_task.aliases.clone(),
                    path: raw_task.path.clone(),
                };
                Some((name, CatalogEntry { task_type, program }))
            })
            .collect();

        Ok(Self { entries })
    }

    /// Looks up an entry by task name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Entry names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of declared tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog declares no tasks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds task types depth-first so parents and subtask types exist before the
/// types referencing them.
struct Resolver<'a> {
    raw: &'a HashMap<String, TomlTask>,
    built: HashMap<String, Arc<TaskType>>,
    visiting: Vec<String>,
}

impl Resolver<'_> {
    fn build(
        &mut self,
        name: &str,
        missing: impl FnOnce() -> CatalogError,
    ) -> Result<Arc<TaskType>, CatalogError> {
        if let Some(task_type) = self.built.get(name) {
            return Ok(Arc::clone(task_type));
        }
        if self.visiting.iter().any(|n| n == name) {
            let mut cycle = self.visiting.clone();
            cycle.push(name.to_string());
            return Err(CatalogError::CircularDeclaration {
                cycle_path: cycle.join(" -> "),
            });
        }
        let raw = self.raw;
        let task = raw.get(name).ok_or_else(missing)?;

        self.visiting.push(name.to_string());
        let result = self.build_entry(name, task);
        self.visiting.pop();

        let task_type = result?;
        self.built.insert(name.to_string(), Arc::clone(&task_type));
        Ok(task_type)
    }

    fn build_entry(&mut self, name: &str, task: &TomlTask) -> Result<Arc<TaskType>, CatalogError> {
        let declaration = |source| CatalogError::Declaration {
            task: name.to_string(),
            source,
        };

        let mut builder = match &task.extends {
            Some(parent) => {
                let parent_type = self.build(parent, || CatalogError::UnknownParent {
                    task: name.to_string(),
                    parent: parent.clone(),
                })?;
                TaskType::extend(name, &parent_type)
            }
            None => TaskType::builder(name),
        };

        for option in &task.options {
            builder = builder.option(option.clone().into()).map_err(declaration)?;
        }
        for non_option in &task.non_options {
            builder = builder
                .non_option(non_option.clone().into_spec(name)?)
                .map_err(declaration)?;
        }

        for (subtask_name, type_name) in &task.subtasks {
            let subtask_type = self.build(type_name, || CatalogError::UnknownSubtask {
                task: name.to_string(),
                subtask: type_name.clone(),
            })?;
            builder = builder
                .subtask(subtask_name.as_str(), &subtask_type)
                .map_err(declaration)?;
        }

        builder.build().map_err(declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::task::Task, models::ValueMap};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LS_CATALOG: &str = r#"
        [tasks.ls]
        program = "ls"
        aliases = ["gls"]
        options = [
            { flag = "-a", name = "all" },
            { flag = "--author" },
            { flag = "--hide", multiple = true },
        ]
        non_options = [{ name = "files", tailing = true, multiple = true }]

        [tasks.ls-long]
        extends = "ls"
        program = "ls"
        options = [{ flag = "-l", name = "long" }]

        [tasks.wrapper]
        program = "env"
        non_options = [{ name = "assignments", placement = "leading", multiple = true }]
        subtasks = { listing = "ls-long" }
    "#;

    #[test]
    fn test_catalog_resolves_declarations() {
        let catalog = Catalog::from_toml_str(LS_CATALOG).unwrap();
        assert_eq!(catalog.names(), vec!["ls", "ls-long", "wrapper"]);

        let ls = catalog.get("ls").unwrap();
        assert_eq!(ls.program.program_names(), vec!["ls", "gls"]);
        let args = ls
            .task_type
            .arguments(
                ValueMap::new()
                    .with("all", true)
                    .with("hide", ["a.txt", "b.txt"])
                    .with("files", ["x", "y"]),
            )
            .unwrap();
        assert_eq!(args, vec!["-a", "--hide", "a.txt", "--hide", "b.txt", "x", "y"]);
    }

    #[test]
    fn test_catalog_inheritance_and_subtasks() {
        let catalog = Catalog::from_toml_str(LS_CATALOG).unwrap();
        let long = &catalog.get("ls-long").unwrap().task_type;
        assert!(long.has_option("all"));
        assert!(long.has_option("long"));

        let wrapper = &catalog.get("wrapper").unwrap().task_type;
        let mut task = Task::new(wrapper);
        task.set("assignments", ["LANG=C"]).unwrap();
        task.subtask("listing").unwrap().set("long", true).unwrap();
        assert_eq!(task.compose().unwrap(), vec!["LANG=C", "-l"]);
    }

    #[test]
    fn test_program_name_defaults_to_entry_name() {
        let catalog = Catalog::from_toml_str("[tasks.git]\n").unwrap();
        assert_eq!(catalog.get("git").unwrap().program.program_names(), vec!["git"]);
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let err = Catalog::from_toml_str("[tasks.a]\nextends = \"missing\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownParent { ref parent, .. } if parent == "missing"));
    }

    #[test]
    fn test_unknown_subtask_is_rejected() {
        let err =
            Catalog::from_toml_str("[tasks.a]\nsubtasks = { x = \"missing\" }\n").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSubtask { .. }));
    }

    #[test]
    fn test_inheritance_cycle_is_rejected() {
        let content = r#"
            [tasks.a]
            extends = "b"
            [tasks.b]
            extends = "a"
        "#;
        let err = Catalog::from_toml_str(content).unwrap_err();
        assert!(matches!(err, CatalogError::CircularDeclaration { .. }));
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_invalid_declaration_is_reported_with_task_name() {
        let err = Catalog::from_toml_str("[tasks.a]\noptions = [{ flag = \"\" }]\n").unwrap_err();
        assert!(matches!(err, CatalogError::Declaration { ref task, .. } if task == "a"));
    }

    #[test]
    fn test_placement_forms() {
        let content = r#"
            [tasks.env]
            non_options = [
                { name = "assignments", placement = "leading" },
                { name = "first", leading = true },
                { name = "command", tailing = false },
                { name = "rest" },
            ]
        "#;
        let catalog = Catalog::from_toml_str(content).unwrap();
        let env = &catalog.get("env").unwrap().task_type;
        let leading = |name: &str| env.resolve_non_option(name).unwrap().is_leading();
        assert!(leading("assignments"));
        assert!(leading("first"));
        assert!(leading("command"));
        assert!(!leading("rest"));
    }

    #[test]
    fn test_placement_with_leading_or_tailing_is_rejected() {
        for entry in [
            r#"{ name = "files", placement = "tailing", leading = true }"#,
            r#"{ name = "files", placement = "leading", tailing = false }"#,
        ] {
            let content = format!("[tasks.ls]\nnon_options = [{}]\n", entry);
            let err = Catalog::from_toml_str(&content).unwrap_err();
            assert!(
                matches!(err, CatalogError::ConflictingPlacement { ref non_option, .. } if non_option == "files"),
                "unexpected error for {}: {}",
                entry,
                err
            );
        }
    }

    #[test]
    fn test_subtasks_compose_in_declaration_order() {
        let content = r#"
            [tasks.verbose]
            options = [{ flag = "-v", name = "verbose" }]
            [tasks.quiet]
            options = [{ flag = "-q", name = "quiet" }]
            [tasks.tool]
            subtasks = { zeta = "verbose", alpha = "quiet" }
        "#;
        let catalog = Catalog::from_toml_str(content).unwrap();
        let tool = &catalog.get("tool").unwrap().task_type;
        assert_eq!(
            tool.own_subtasks().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["zeta", "alpha"]
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = Catalog::from_toml_str("[tasks.a]\noptoins = []\n").unwrap_err();
        assert!(err.to_string().contains("Error parsing TOML"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(LS_CATALOG.as_bytes()).unwrap();
        file.flush().unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
