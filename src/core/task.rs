// src/core/task.rs

//! Task instances: assigned values, subtasks and the composed argument vector.

use crate::{
    constants::END_OF_OPTIONS,
    core::{
        coercion::FormatError,
        sub_options::{SubOptions, SubOptionsError},
        task_type::{Parameter, TaskType},
    },
    models::{Value, ValueMap},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by task instances.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// No type in the hierarchy declares the parameter.
    #[error("Task type '{task}' does not declare a parameter named '{name}'.")]
    UndeclaredParameter {
        /// The task type that was searched.
        task: String,
        /// The requested parameter.
        name: String,
    },
    /// No type in the hierarchy declares the subtask.
    #[error("Task type '{task}' does not declare a subtask named '{name}'.")]
    UndeclaredSubtask {
        /// The task type that was searched.
        task: String,
        /// The requested subtask.
        name: String,
    },
    /// A list operation hit a parameter that cannot hold a list.
    #[error("Parameter '{name}' is not repeatable and has no list value.")]
    NotRepeatable {
        /// The parameter name.
        name: String,
    },
    /// A sub-option operation hit a plain option or a non-option.
    #[error("Option '{name}' does not hold sub-options.")]
    NotSubOptions {
        /// The parameter name.
        name: String,
    },
    /// A sub-options option was assigned a value that is not a mapping.
    #[error("Option '{name}' holds sub-options and cannot take a {kind} value.")]
    InvalidSubOptionsValue {
        /// The option name.
        name: String,
        /// The kind of the rejected value.
        kind: &'static str,
    },
    /// The sub-options container refused the operation.
    #[error(transparent)]
    SubOptions(#[from] SubOptionsError),
    /// An assigned value could not be rendered.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// An instance of a [`TaskType`] holding assigned values and subtasks.
///
/// Composition is a pure read of the current state: leading non-options of the
/// task and its subtasks, then subtask options followed by the task's own
/// options, then the tailing non-options (subtasks first). A `--` token is
/// inserted before the tailing part when any tailing token starts with `-`.
#[derive(Debug, Clone)]
pub struct Task {
    kind: Arc<TaskType>,
    values: ValueMap,
    subtasks: Vec<(String, Task)>,
    sudo: bool,
}

impl Task {
    /// Creates an empty instance of `kind`.
    pub fn new(kind: &Arc<TaskType>) -> Self {
        Self::with_values(kind, ValueMap::new())
    }

    /// Creates an instance from raw values. Names the type does not declare are
    /// kept but never emitted.
    pub fn with_values(kind: &Arc<TaskType>, values: ValueMap) -> Self {
        Self {
            kind: Arc::clone(kind),
            values,
            subtasks: Vec::new(),
            sudo: false,
        }
    }

    /// The type this task instantiates.
    pub fn kind(&self) -> &Arc<TaskType> {
        &self.kind
    }

    /// Every assigned value, in assignment order.
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// The value assigned to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Assigns a declared parameter.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, TaskError> {
        let value = value.into();
        let value = match self.resolve(name)? {
            Parameter::Option(option) if option.has_sub_options() => {
                Self::into_sub_options(name, value)?
            }
            _ => value,
        };
        self.values.insert(name, value);
        Ok(self)
    }

    /// Removes an assigned value.
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Merges raw values into this task; the last write per key wins.
    pub fn merge(&mut self, values: ValueMap) {
        self.values.merge(values);
    }

    /// The list stored under a repeatable parameter, created on first access.
    pub fn list_mut(&mut self, name: &str) -> Result<&mut Vec<Value>, TaskError> {
        let repeatable = match self.resolve(name)? {
            Parameter::Option(option) => option.is_multiple(),
            Parameter::NonOption(non_option) => non_option.is_multiple(),
        };
        if !repeatable {
            return Err(TaskError::NotRepeatable {
                name: name.to_string(),
            });
        }

        let slot = self
            .values
            .get_or_insert_with(name, || Value::List(Vec::new()));
        // `nil` and booleans carry no value token, so they start an empty list.
        let list = match std::mem::take(slot) {
            Value::List(list) => list,
            Value::Nil | Value::Bool(_) => Vec::new(),
            other => vec![other],
        };
        *slot = Value::List(list);
        match slot {
            Value::List(list) => Ok(list),
            _ => Err(TaskError::NotRepeatable {
                name: name.to_string(),
            }),
        }
    }

    /// The container of a sub-options option, created on first access.
    pub fn sub_options_mut(&mut self, name: &str) -> Result<&mut SubOptions, TaskError> {
        match self.resolve(name)? {
            Parameter::Option(option) if option.has_sub_options() => {}
            _ => {
                return Err(TaskError::NotSubOptions {
                    name: name.to_string(),
                });
            }
        }

        let slot = self
            .values
            .get_or_insert_with(name, || Value::SubOptions(SubOptions::new()));
        if !matches!(slot, Value::SubOptions(_)) {
            let converted = match Self::into_sub_options(name, slot.clone())? {
                Value::SubOptions(sub_options) => sub_options,
                _ => SubOptions::new(),
            };
            *slot = Value::SubOptions(converted);
        }
        match slot {
            Value::SubOptions(sub_options) => Ok(sub_options),
            _ => Err(TaskError::NotSubOptions {
                name: name.to_string(),
            }),
        }
    }

    /// Returns the named subtask, creating it on first access.
    pub fn subtask(&mut self, name: &str) -> Result<&mut Self, TaskError> {
        self.subtask_with(name, ValueMap::new())
    }

    /// Returns the named subtask with `values` merged in. The first access
    /// creates the subtask from `values`.
    pub fn subtask_with(&mut self, name: &str, values: ValueMap) -> Result<&mut Self, TaskError> {
        let undeclared = || TaskError::UndeclaredSubtask {
            task: self.kind.name().to_string(),
            name: name.to_string(),
        };

        if let Some(index) = self.subtasks.iter().position(|(n, _)| n == name) {
            let (_, existing) = self.subtasks.get_mut(index).ok_or_else(undeclared)?;
            existing.merge(values);
            return Ok(existing);
        }

        let kind = self.kind.resolve_subtask(name).ok_or_else(undeclared)?;
        log::trace!("Creating subtask '{}' of type '{}'", name, kind.name());
        let subtask = Self::with_values(kind, values);
        self.subtasks.push((name.to_string(), subtask));
        let (_, created) = self.subtasks.last_mut().ok_or_else(undeclared)?;
        Ok(created)
    }

    /// Subtasks in the order they were first accessed.
    pub fn subtasks(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.subtasks.iter().map(|(name, task)| (name.as_str(), task))
    }

    /// Whether the task should run with elevated privileges.
    pub fn sudo(&self) -> bool {
        self.sudo
    }

    /// Marks the task for elevated execution.
    pub fn set_sudo(&mut self, sudo: bool) -> &mut Self {
        self.sudo = sudo;
        self
    }

    // --- Composition ---

    /// Leading non-options of this task, then of every subtask.
    pub fn leading_non_options(&self) -> Result<Vec<String>, FormatError> {
        let mut args = Vec::new();

        for (name, value) in self.values.iter() {
            if let Some(non_option) = self.kind.resolve_non_option(name) {
                if non_option.is_leading() {
                    args.extend(non_option.format_tokens(value)?);
                }
            }
        }

        for (_, subtask) in &self.subtasks {
            args.extend(subtask.leading_non_options()?);
        }

        Ok(args)
    }

    /// The full output of every subtask, then this task's own options.
    pub fn option_arguments(&self) -> Result<Vec<String>, FormatError> {
        let mut args = Vec::new();

        for (_, subtask) in &self.subtasks {
            args.extend(subtask.compose()?);
        }

        for (name, value) in self.values.iter() {
            if let Some(option) = self.kind.resolve_option(name) {
                args.extend(option.format_tokens(value)?);
            }
        }

        Ok(args)
    }

    /// Tailing non-options of every subtask, then of this task.
    pub fn tailing_non_options(&self) -> Result<Vec<String>, FormatError> {
        let mut args = Vec::new();

        for (_, subtask) in &self.subtasks {
            args.extend(subtask.tailing_non_options()?);
        }

        for (name, value) in self.values.iter() {
            if let Some(non_option) = self.kind.resolve_non_option(name) {
                if non_option.is_tailing() {
                    args.extend(non_option.format_tokens(value)?);
                }
            }
        }

        Ok(args)
    }

    /// Composes the complete argument vector.
    pub fn compose(&self) -> Result<Vec<String>, FormatError> {
        let leading = self.leading_non_options()?;
        let options = self.option_arguments()?;
        let tailing = self.tailing_non_options()?;

        let needs_separator = tailing.iter().any(|arg| arg.starts_with('-'));

        let mut args =
            Vec::with_capacity(leading.len() + options.len() + tailing.len() + usize::from(needs_separator));
        args.extend(leading);
        args.extend(options);
        if needs_separator {
            args.push(END_OF_OPTIONS.to_string());
        }
        args.extend(tailing);

        log::trace!("Composed '{}': {:?}", self.kind.name(), args);
        Ok(args)
    }

    // --- Helpers ---

    fn resolve(&self, name: &str) -> Result<Parameter<'_>, TaskError> {
        self.kind
            .resolve(name)
            .ok_or_else(|| TaskError::UndeclaredParameter {
                task: self.kind.name().to_string(),
                name: name.to_string(),
            })
    }

    fn into_sub_options(name: &str, value: Value) -> Result<Value, TaskError> {
        match value {
            Value::Map(map) => Ok(Value::SubOptions(SubOptions::from_map(map)?)),
            Value::SubOptions(_) | Value::Nil | Value::Bool(_) => Ok(value),
            other => Err(TaskError::InvalidSubOptionsValue {
                name: name.to_string(),
                kind: other.kind(),
            }),
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.kind, &other.kind)
            && self.values == other.values
            && self.subtasks == other.subtasks
            && self.sudo == other.sudo
    }
}
