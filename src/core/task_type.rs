// src/core/task_type.rs

//! Declared task types: the per-type registry of options, non-options and
//! subtasks, linked to the parent type it extends.

use crate::{
    core::{
        coercion::FormatError,
        non_option::{NonOptionDef, NonOptionSpec},
        option::{OptionDef, OptionSpec},
        task::Task,
    },
    models::ValueMap,
};
use indexmap::IndexMap;
use std::{iter, sync::Arc};
use thiserror::Error;

/// Errors raised while declaring a task type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// The option's flag is blank.
    #[error("An option must be declared with a non-empty flag.")]
    MissingFlag,
    /// A short option was declared without a name, or the flag yields none.
    #[error("Option '{flag}' needs an explicit name.")]
    MissingName {
        /// The offending flag.
        flag: String,
    },
    /// The non-option's name is blank.
    #[error("A non-option must be declared with a non-empty name.")]
    EmptyNonOptionName,
    /// A single-token sub-options option has no way to join its entries.
    #[error(
        "Option '{flag}' holds sub-options in the `flag=value` form and must declare a separator."
    )]
    EqualsWithoutSeparator {
        /// The offending flag.
        flag: String,
    },
    /// A subtask shares its name with a parameter of the same type.
    #[error("Subtask '{name}' of task type '{task}' collides with a parameter of the same name.")]
    SubtaskNameCollision {
        /// The task type being built.
        task: String,
        /// The colliding name.
        name: String,
    },
    /// The subtask name is blank.
    #[error("A subtask must be declared with a non-empty name.")]
    EmptySubtaskName,
}

/// A declared parameter, as found by a registry lookup.
#[derive(Debug, Clone, Copy)]
pub enum Parameter<'a> {
    /// A flag-bearing parameter.
    Option(&'a OptionDef),
    /// A positional parameter.
    NonOption(&'a NonOptionDef),
}

/// A task type: the declarations shared by every instance of the type.
///
/// Lookups walk from this type to its parent, grandparent and so on. The first
/// type declaring a name wins, so a subtype shadows its ancestors without
/// touching their registries.
#[derive(Debug)]
pub struct TaskType {
    name: String,
    parent: Option<Arc<TaskType>>,
    options: IndexMap<String, OptionDef>,
    non_options: IndexMap<String, NonOptionDef>,
    subtasks: IndexMap<String, Arc<TaskType>>,
}

impl TaskType {
    /// Starts declaring a root task type.
    pub fn builder(name: impl Into<String>) -> TaskTypeBuilder {
        TaskTypeBuilder::new(name.into(), None)
    }

    /// Starts declaring a subtype of `parent`.
    pub fn extend(name: impl Into<String>, parent: &Arc<Self>) -> TaskTypeBuilder {
        TaskTypeBuilder::new(name.into(), Some(Arc::clone(parent)))
    }

    /// The type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type this one extends.
    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// This type followed by its ancestors, most derived first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        iter::successors(Some(self), |task_type| task_type.parent.as_deref())
    }

    /// Resolves `name` to the nearest declared option or non-option.
    pub fn resolve(&self, name: &str) -> Option<Parameter<'_>> {
        self.ancestors().find_map(|task_type| {
            task_type
                .options
                .get(name)
                .map(Parameter::Option)
                .or_else(|| task_type.non_options.get(name).map(Parameter::NonOption))
        })
    }

    /// Like [`resolve`](Self::resolve), but only for options.
    pub fn resolve_option(&self, name: &str) -> Option<&OptionDef> {
        match self.resolve(name)? {
            Parameter::Option(option) => Some(option),
            Parameter::NonOption(_) => None,
        }
    }

    /// Like [`resolve`](Self::resolve), but only for non-options.
    pub fn resolve_non_option(&self, name: &str) -> Option<&NonOptionDef> {
        match self.resolve(name)? {
            Parameter::NonOption(non_option) => Some(non_option),
            Parameter::Option(_) => None,
        }
    }

    /// Whether `name` resolves to an option.
    pub fn has_option(&self, name: &str) -> bool {
        self.resolve_option(name).is_some()
    }

    /// Whether `name` resolves to a non-option.
    pub fn has_non_option(&self, name: &str) -> bool {
        self.resolve_non_option(name).is_some()
    }

    /// Whether `name` resolves to any parameter.
    pub fn is_declared(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Resolves a subtask relationship through the type hierarchy.
    pub fn resolve_subtask(&self, name: &str) -> Option<&Arc<Self>> {
        self.ancestors()
            .find_map(|task_type| task_type.subtasks.get(name))
    }

    /// Options declared directly on this type, in declaration order.
    pub fn own_options(&self) -> impl Iterator<Item = &OptionDef> {
        self.options.values()
    }

    /// Non-options declared directly on this type, in declaration order.
    pub fn own_non_options(&self) -> impl Iterator<Item = &NonOptionDef> {
        self.non_options.values()
    }

    /// Subtasks declared directly on this type, in declaration order.
    pub fn own_subtasks(&self) -> impl Iterator<Item = (&str, &Arc<Self>)> {
        self.subtasks.iter().map(|(name, task_type)| (name.as_str(), task_type))
    }

    /// Names of every parameter visible from this type, sorted.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .ancestors()
            .flat_map(|task_type| {
                task_type
                    .options
                    .keys()
                    .chain(task_type.non_options.keys())
                    .map(String::as_str)
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Builds an instance from `values` and composes it.
    pub fn arguments(self: &Arc<Self>, values: ValueMap) -> Result<Vec<String>, FormatError> {
        Task::with_values(self, values).compose()
    }
}

// --- DECLARATION BUILDER ---

/// Collects declarations for a [`TaskType`]. Re-declaring a name replaces the
/// earlier declaration, whichever kind it was.
#[derive(Debug)]
pub struct TaskTypeBuilder {
    name: String,
    parent: Option<Arc<TaskType>>,
    options: IndexMap<String, OptionDef>,
    non_options: IndexMap<String, NonOptionDef>,
    subtasks: IndexMap<String, Arc<TaskType>>,
}

impl TaskTypeBuilder {
    fn new(name: String, parent: Option<Arc<TaskType>>) -> Self {
        Self {
            name,
            parent,
            options: IndexMap::new(),
            non_options: IndexMap::new(),
            subtasks: IndexMap::new(),
        }
    }

    /// Declares an option. The name defaults to the namified flag.
    pub fn option(mut self, spec: OptionSpec) -> Result<Self, DeclarationError> {
        let option = OptionDef::new(spec)?;
        log::trace!(
            "Task type '{}': option '{}' -> {}",
            self.name,
            option.name(),
            option.flag()
        );
        self.non_options.shift_remove(option.name());
        self.options.insert(option.name().to_string(), option);
        Ok(self)
    }

    /// Declares a long option (`--flag`); the name defaults to the namified flag.
    pub fn long_option(self, spec: OptionSpec) -> Result<Self, DeclarationError> {
        self.option(spec)
    }

    /// Declares a short option (`-f`), which must be given an explicit name.
    pub fn short_option(self, spec: OptionSpec) -> Result<Self, DeclarationError> {
        if spec.name.is_none() {
            return Err(DeclarationError::MissingName { flag: spec.flag });
        }
        self.option(spec)
    }

    /// Declares a non-option, replacing any parameter of the same name.
    pub fn non_option(mut self, spec: NonOptionSpec) -> Result<Self, DeclarationError> {
        let non_option = NonOptionDef::new(spec)?;
        self.options.shift_remove(non_option.name());
        self.non_options
            .insert(non_option.name().to_string(), non_option);
        Ok(self)
    }

    /// Declares a named subtask of type `task_type`.
    pub fn subtask(
        mut self,
        name: impl Into<String>,
        task_type: &Arc<TaskType>,
    ) -> Result<Self, DeclarationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeclarationError::EmptySubtaskName);
        }
        self.subtasks.insert(name, Arc::clone(task_type));
        Ok(self)
    }

    /// Validates subtask names and freezes the type.
    pub fn build(self) -> Result<Arc<TaskType>, DeclarationError> {
        if let Some(name) = self
            .subtasks
            .keys()
            .find(|name| self.options.contains_key(*name) || self.non_options.contains_key(*name))
        {
            return Err(DeclarationError::SubtaskNameCollision {
                task: self.name.clone(),
                name: name.clone(),
            });
        }

        log::debug!(
            "Declared task type '{}' ({} options, {} non-options, {} subtasks)",
            self.name,
            self.options.len(),
            self.non_options.len(),
            self.subtasks.len()
        );

        Ok(Arc::new(TaskType {
            name: self.name,
            parent: self.parent,
            options: self.options,
            non_options: self.non_options,
            subtasks: self.subtasks,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ls_task() -> Arc<TaskType> {
        TaskType::builder("ls")
            .short_option(OptionSpec::new("-a").name("all"))
            .unwrap()
            .long_option(OptionSpec::new("--author"))
            .unwrap()
            .long_option(OptionSpec::new("--group-directories-first").name("group_dirs_first"))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolves_declared_options() {
        let ls = ls_task();
        assert_eq!(ls.resolve_option("all").map(OptionDef::flag), Some("-a"));
        assert_eq!(ls.resolve_option("author").map(OptionDef::flag), Some("--author"));
        assert!(ls.has_option("group_dirs_first"));
        assert!(!ls.is_declared("missing"));
    }

    #[test]
    fn test_own_declarations_keep_declaration_order() {
        let ls = ls_task();
        assert_eq!(
            ls.own_options().map(OptionDef::name).collect::<Vec<_>>(),
            vec!["all", "author", "group_dirs_first"]
        );

        let parent = TaskType::builder("parent")
            .subtask("zeta", &ls)
            .unwrap()
            .subtask("alpha", &ls)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            parent.own_subtasks().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["zeta", "alpha"]
        );
    }

    #[test]
    fn test_short_option_requires_name() {
        let result = TaskType::builder("x").short_option(OptionSpec::new("-a"));
        assert!(matches!(result, Err(DeclarationError::MissingName { .. })));
    }

    #[test]
    fn test_subtype_inherits_and_adds() {
        let ls = ls_task();
        let extended = TaskType::extend("ls-long", &ls)
            .short_option(OptionSpec::new("-l").name("long"))
            .unwrap()
            .build()
            .unwrap();

        assert!(extended.has_option("all"));
        assert!(extended.has_option("long"));
        assert!(!ls.has_option("long"));
        assert_eq!(
            extended.ancestors().map(TaskType::name).collect::<Vec<_>>(),
            vec!["ls-long", "ls"]
        );
    }

    #[test]
    fn test_subtype_shadows_parent_declaration() {
        let ls = ls_task();
        let shadowing = TaskType::extend("ls-shadow", &ls)
            .short_option(OptionSpec::new("-A").name("all"))
            .unwrap()
            .non_option(NonOptionSpec::new("author"))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(shadowing.resolve_option("all").map(OptionDef::flag), Some("-A"));
        assert_eq!(ls.resolve_option("all").map(OptionDef::flag), Some("-a"));
        assert!(shadowing.resolve_option("author").is_none());
        assert!(shadowing.has_non_option("author"));
    }

    #[test]
    fn test_redeclaring_a_name_replaces_the_other_kind() {
        let task_type = TaskType::builder("x")
            .long_option(OptionSpec::new("--target"))
            .unwrap()
            .non_option(NonOptionSpec::new("target"))
            .unwrap()
            .build()
            .unwrap();
        assert!(task_type.has_non_option("target"));
        assert!(!task_type.has_option("target"));
        assert_eq!(task_type.parameter_names(), vec!["target"]);
    }

    #[test]
    fn test_subtasks_are_inherited() {
        let ls = ls_task();
        let parent = TaskType::builder("parent")
            .subtask("listing", &ls)
            .unwrap()
            .build()
            .unwrap();
        let child = TaskType::extend("child", &parent).build().unwrap();

        assert!(child.resolve_subtask("listing").is_some());
        assert!(child.resolve_subtask("other").is_none());
    }

    #[test]
    fn test_subtask_name_collision_is_rejected() {
        let ls = ls_task();
        let result = TaskType::builder("x")
            .long_option(OptionSpec::new("--listing"))
            .unwrap()
            .subtask("listing", &ls)
            .unwrap()
            .build();
        assert!(matches!(result, Err(DeclarationError::SubtaskNameCollision { .. })));
    }
}
