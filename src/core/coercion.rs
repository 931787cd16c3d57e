// src/core/coercion.rs

//! Normalizes an assigned [`Value`] into the canonical shape the formatters
//! consume: absent, present-without-value, or an ordered list of string tokens.

use crate::models::{Value, ValueMap};
use thiserror::Error;

/// Errors raised while turning assigned values into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A `flag=value` option got several values and has no way to render them.
    #[error(
        "Option '{flag}' uses the `flag=value` form but received {count} values; declare a separator or make it repeatable."
    )]
    AmbiguousEqualsValue {
        /// The option's flag.
        flag: String,
        /// How many values were assigned.
        count: usize,
    },
    /// A mapping entry holds a value that has no `key=value` rendering.
    #[error("A {kind} value cannot be used as the value of mapping key '{key}'.")]
    UnsupportedEntryValue {
        /// The mapping key.
        key: String,
        /// The kind of the rejected value.
        kind: &'static str,
    },
    /// A custom formatter rejected its input.
    #[error("Custom formatter for option '{flag}' failed: {message}")]
    Formatter {
        /// The option's flag.
        flag: String,
        /// The formatter's message.
        message: String,
    },
}

impl FormatError {
    /// Builds the error a custom formatter returns when it rejects a value.
    pub fn formatter(flag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Formatter {
            flag: flag.into(),
            message: message.into(),
        }
    }
}

/// The canonical form of an assigned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    /// `Nil` or `false`.
    Absent,
    /// `true`: the parameter is present but carries no value.
    Present,
    /// Everything else, flattened to tokens. May be empty.
    Tokens(Vec<String>),
}

/// Coerces an assigned value into its canonical form.
pub fn coerce(value: &Value) -> Result<Coerced, FormatError> {
    match value {
        Value::Nil | Value::Bool(false) => Ok(Coerced::Absent),
        Value::Bool(true) => Ok(Coerced::Present),
        other => {
            let mut tokens = Vec::new();
            push_tokens(other, &mut tokens)?;
            Ok(Coerced::Tokens(tokens))
        }
    }
}

/// Converts a mapping into `key` / `key=value` tokens, dropping absent entries.
pub fn map_tokens(map: &ValueMap) -> Result<Vec<String>, FormatError> {
    let mut tokens = Vec::with_capacity(map.len());
    for (key, value) in map.iter() {
        match value {
            Value::Nil | Value::Bool(false) => {}
            Value::Bool(true) => tokens.push(key.to_string()),
            Value::Str(s) => tokens.push(format!("{}={}", key, s)),
            Value::List(_) | Value::Task(_) => {
                let mut parts = Vec::new();
                push_tokens(value, &mut parts)?;
                tokens.push(format!("{}={}", key, parts.join(",")));
            }
            Value::Map(_) | Value::SubOptions(_) => {
                return Err(FormatError::UnsupportedEntryValue {
                    key: key.to_string(),
                    kind: value.kind(),
                });
            }
        }
    }
    Ok(tokens)
}

// Lists are flattened all the way down; only `Nil` elements are dropped.
fn push_tokens(value: &Value, tokens: &mut Vec<String>) -> Result<(), FormatError> {
    match value {
        Value::Nil => {}
        Value::Bool(b) => tokens.push(b.to_string()),
        Value::Str(s) => tokens.push(s.clone()),
        Value::List(items) => {
            for item in items {
                push_tokens(item, tokens)?;
            }
        }
        Value::Map(map) => tokens.extend(map_tokens(map)?),
        Value::SubOptions(sub_options) => tokens.extend(map_tokens(sub_options.as_map())?),
        Value::Task(task) => tokens.extend(task.compose()?),
    }
    Ok(())
}
