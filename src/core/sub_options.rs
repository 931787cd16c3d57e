// src/core/sub_options.rs

use crate::models::{Value, ValueMap};
use thiserror::Error;

/// Errors raised by a [`SubOptions`] container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubOptionsError {
    /// `access` was called with a shape it does not understand.
    #[error("Unsupported operation '{operation}' with {arity} argument(s) on a sub-options container.")]
    Unsupported {
        /// The operation name.
        operation: String,
        /// How many arguments came with it.
        arity: usize,
    },
    /// Entries hold booleans or scalars only.
    #[error("Sub-option '{key}' only accepts a boolean or scalar value, got a {kind}.")]
    InvalidValue {
        /// The entry key.
        key: String,
        /// The kind of the rejected value.
        kind: &'static str,
    },
}

/// The value container of an option whose value is a set of named sub-flags.
///
/// Entries keep insertion order and hold only booleans or scalars. Rendering
/// follows the mapping rules: `true` emits the key, a scalar emits `key=value`,
/// `false`/`Nil` are skipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubOptions {
    entries: ValueMap,
}

impl SubOptions {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a container from a mapping, validating every entry.
    pub fn from_map(map: ValueMap) -> Result<Self, SubOptionsError> {
        let mut sub_options = Self::new();
        for (key, value) in map {
            sub_options.set(key, value)?;
        }
        Ok(sub_options)
    }

    /// Reads a sub-option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Writes a sub-option, returning the previous value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, SubOptionsError> {
        let key = key.into();
        let value = value.into();
        match value {
            Value::Nil | Value::Bool(_) | Value::Str(_) => Ok(self.entries.insert(key, value)),
            other => Err(SubOptionsError::InvalidValue {
                key,
                kind: other.kind(),
            }),
        }
    }

    /// Removes a sub-option.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Iterates sub-options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter()
    }

    /// Number of sub-options.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sub-option is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying ordered mapping.
    pub fn as_map(&self) -> &ValueMap {
        &self.entries
    }

    /// Dynamic, name-based access.
    ///
    /// `"key"` with no arguments reads the key (a missing key reads as `Nil`),
    /// `"key="` with exactly one argument writes it and returns the written value.
    /// Any other shape is rejected with [`SubOptionsError::Unsupported`].
    pub fn access(&mut self, operation: &str, args: Vec<Value>) -> Result<Value, SubOptionsError> {
        let unsupported = |arity| SubOptionsError::Unsupported {
            operation: operation.to_string(),
            arity,
        };

        if let Some(key) = operation.strip_suffix('=') {
            if key.is_empty() || key.ends_with('=') {
                return Err(unsupported(args.len()));
            }
            let arity = args.len();
            let mut args = args.into_iter();
            return match (args.next(), args.next()) {
                (Some(value), None) => {
                    self.set(key, value.clone())?;
                    Ok(value)
                }
                _ => Err(unsupported(arity)),
            };
        }

        if operation.is_empty() || !args.is_empty() {
            return Err(unsupported(args.len()));
        }
        Ok(self.get(operation).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behaves_like_a_map() {
        let mut sub_options = SubOptions::new();
        sub_options.set("bla", "2").unwrap();
        assert_eq!(sub_options.get("bla"), Some(&Value::from("2")));
        assert_eq!(sub_options.len(), 1);
    }

    #[test]
    fn test_provides_reader_and_writer_access() {
        let mut sub_options = SubOptions::new();
        let written = sub_options.access("bla=", vec![Value::from("5")]).unwrap();
        assert_eq!(written, Value::from("5"));
        assert_eq!(sub_options.access("bla", vec![]).unwrap(), Value::from("5"));
        assert_eq!(sub_options.access("missing", vec![]).unwrap(), Value::Nil);
    }

    #[test]
    fn test_rejects_other_operations() {
        let mut sub_options = SubOptions::new();
        let err = sub_options.access("bla", vec![Value::from("5")]).unwrap_err();
        assert_eq!(
            err,
            SubOptionsError::Unsupported {
                operation: "bla".to_string(),
                arity: 1
            }
        );
        assert!(sub_options.access("bla=", vec![]).is_err());
        assert!(sub_options.access("=", vec![Value::from(true)]).is_err());
    }

    #[test]
    fn test_rejects_structured_values() {
        let mut sub_options = SubOptions::new();
        let err = sub_options.set("list", vec!["a"]).unwrap_err();
        assert!(matches!(err, SubOptionsError::InvalidValue { kind: "list", .. }));
        assert!(SubOptions::from_map(ValueMap::new().with("x", ValueMap::new())).is_err());
    }
}
