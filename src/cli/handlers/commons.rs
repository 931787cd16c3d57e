// src/cli/handlers/commons.rs

use crate::core::{
    assignment,
    catalog::{Catalog, CatalogEntry},
    paths,
    settings::Settings,
    task::Task,
};
use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};

/// Everything a handler needs from the environment.
#[derive(Debug)]
pub struct AppContext {
    /// Loaded settings, with the debug override applied.
    pub settings: Settings,
    /// `--catalog`, when given.
    pub catalog_path: Option<PathBuf>,
}

impl AppContext {
    /// Bundles the settings with the `--catalog` override.
    pub fn new(settings: Settings, catalog_path: Option<PathBuf>) -> Self {
        Self {
            settings,
            catalog_path,
        }
    }

    /// Loads the explicit catalog, or the default one when it exists.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let path = match &self.catalog_path {
            Some(path) => path.clone(),
            None => {
                let default = paths::catalog_file()?;
                if !default.is_file() {
                    log::debug!("No catalog at '{}'.", default.display());
                    return Ok(Catalog::default());
                }
                default
            }
        };
        load_catalog_from(&path)
    }
}

fn load_catalog_from(path: &Path) -> Result<Catalog> {
    Catalog::load(path)
        .with_context(|| format!("Failed to load the task catalog '{}'", path.display()))
}

/// Looks up a catalog entry, listing the known names when it is missing.
pub fn find_entry<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a CatalogEntry> {
    catalog.get(name).ok_or_else(|| {
        let known = catalog.names();
        if known.is_empty() {
            anyhow!("Task '{}' not found: the catalog declares no tasks.", name)
        } else {
            anyhow!(
                "Task '{}' not found. Known tasks: {}",
                name,
                known.join(", ")
            )
        }
    })
}

/// Creates a task instance of `entry` with every `--set` assignment applied.
pub fn build_task(entry: &CatalogEntry, assignments: &[String]) -> Result<Task> {
    let mut task = Task::new(&entry.task_type);
    assignment::apply_all(&mut task, assignments)?;
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn catalog_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[tasks.ls]\noptions = [{{ flag = \"-a\", name = \"all\" }}]\nnon_options = [{{ name = \"files\", multiple = true }}]"
        )
        .unwrap();
        file
    }

    #[test]
    fn test_build_task_from_explicit_catalog() {
        let file = catalog_file();
        let context = AppContext::new(Settings::default(), Some(file.path().to_path_buf()));
        let catalog = context.load_catalog().unwrap();
        let entry = find_entry(&catalog, "ls").unwrap();

        let task = build_task(entry, &["all".to_string(), "files=-rf".to_string()]).unwrap();
        assert_eq!(task.compose().unwrap(), vec!["-a", "--", "-rf"]);
    }

    #[test]
    fn test_missing_entry_lists_known_names() {
        let file = catalog_file();
        let catalog = load_catalog_from(file.path()).unwrap();
        let err = find_entry(&catalog, "cp").unwrap_err();
        assert_eq!(err.to_string(), "Task 'cp' not found. Known tasks: ls");
    }

    #[test]
    fn test_missing_explicit_catalog_is_an_error() {
        let context = AppContext::new(
            Settings::default(),
            Some(PathBuf::from("/definitely/not/here.toml")),
        );
        assert!(context.load_catalog().is_err());
    }
}
