// src/core/assignment.rs

//! Parses `NAME[=VALUE]` assignments given on the command line and applies them
//! to a [`Task`].
//!
//! - `name` sets a flag-style parameter to `true`.
//! - `name=value` assigns a string; repeatable parameters accumulate values.
//! - `name.key[=value]` sets a sub-option (`true` when no value is given).
//! - `sub/name=value` addresses a parameter of the subtask `sub`; paths nest.

use crate::{
    core::{
        task::{Task, TaskError},
        task_type::Parameter,
    },
    models::Value,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    static ref ASSIGNMENT_RE: Regex =
        Regex::new(r"^((?:[^/=.\s]+/)*)([^/=.\s]+)(?:\.([^=\s]+))?(?:=((?s:.*)))?$").unwrap();
}

/// Errors raised while parsing or applying an assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// The text does not match the assignment grammar.
    #[error("Invalid assignment '{0}'. Expected NAME, NAME=VALUE or NAME.KEY=VALUE.")]
    Syntax(String),
    /// The task refused the assignment.
    #[error("Could not apply '{assignment}': {source}")]
    Task {
        /// The assignment as written.
        assignment: String,
        /// Why the task refused it.
        #[source]
        source: TaskError,
    },
}

/// A parsed command-line assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    raw: String,
    /// Subtask path walked before the parameter is looked up.
    pub subtasks: Vec<String>,
    /// The parameter name.
    pub name: String,
    /// The sub-option key after the `.`, if any.
    pub key: Option<String>,
    /// The text after `=`. `None` means the bare-name form.
    pub value: Option<String>,
}

impl FromStr for Assignment {
    type Err = AssignmentError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let caps = ASSIGNMENT_RE
            .captures(raw)
            .ok_or_else(|| AssignmentError::Syntax(raw.to_string()))?;

        let subtasks = caps
            .get(1)
            .map(|m| {
                m.as_str()
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            raw: raw.to_string(),
            subtasks,
            name: caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            key: caps.get(3).map(|m| m.as_str().to_string()),
            value: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

impl Assignment {
    /// The assignment as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Applies the assignment to `task`, descending into subtasks first.
    pub fn apply(&self, task: &mut Task) -> Result<(), AssignmentError> {
        self.apply_inner(task).map_err(|source| AssignmentError::Task {
            assignment: self.raw.clone(),
            source,
        })
    }

    fn apply_inner(&self, task: &mut Task) -> Result<(), TaskError> {
        let mut target = task;
        for name in &self.subtasks {
            target = target.subtask(name)?;
        }

        let value = match &self.value {
            Some(value) => Value::Str(value.clone()),
            None => Value::Bool(true),
        };

        if let Some(key) = &self.key {
            target
                .sub_options_mut(&self.name)?
                .access(&format!("{}=", key), vec![value])?;
            return Ok(());
        }

        let repeatable = match target.kind().resolve(&self.name) {
            Some(Parameter::Option(option)) => option.is_multiple(),
            Some(Parameter::NonOption(non_option)) => non_option.is_multiple(),
            None => false,
        };
        if repeatable && self.value.is_some() {
            target.list_mut(&self.name)?.push(value);
        } else {
            target.set(&self.name, value)?;
        }
        Ok(())
    }
}

/// Parses and applies every assignment in order.
pub fn apply_all<S: AsRef<str>>(task: &mut Task, assignments: &[S]) -> Result<(), AssignmentError> {
    for raw in assignments {
        let assignment: Assignment = raw.as_ref().parse()?;
        log::debug!(
            "Applying assignment '{}' to task '{}'",
            assignment.as_str(),
            task.kind().name()
        );
        assignment.apply(task)?;
    }
    Ok(())
}
