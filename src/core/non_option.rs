// src/core/non_option.rs

//! Non-options: positional arguments placed before or after the options.

use crate::{
    core::{
        coercion::{self, Coerced, FormatError},
        task_type::DeclarationError,
    },
    models::Value,
};
use serde::{Deserialize, Serialize};

/// Where a non-option's tokens go relative to the options.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Before every option.
    Leading,
    /// After every option.
    #[default]
    Tailing,
}

/// The declaration of a non-option, before validation.
#[derive(Debug, Clone, Default)]
pub struct NonOptionSpec {
    /// The parameter name.
    pub name: String,
    /// `Some(true)` forces leading placement.
    pub leading: Option<bool>,
    /// Honored when `leading` does not force placement.
    pub tailing: Option<bool>,
    /// Accepts several values.
    pub multiple: bool,
}

impl NonOptionSpec {
    /// Starts a tailing, single-valued declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Places the tokens before the options.
    pub fn leading(mut self) -> Self {
        self.leading = Some(true);
        self
    }

    /// Places the tokens after the options. This is the default.
    pub fn tailing(mut self) -> Self {
        self.tailing = Some(true);
        self
    }

    /// Accepts several values.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Resolves the leading/tailing hints into a single placement.
    pub fn placement(&self) -> Placement {
        match (self.leading, self.tailing) {
            (Some(true), _) => Placement::Leading,
            (_, Some(true)) => Placement::Tailing,
            (_, Some(false)) => Placement::Leading,
            _ => Placement::Tailing,
        }
    }
}

/// A positional parameter. Never produces a flag token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonOptionDef {
    name: String,
    placement: Placement,
    multiple: bool,
}

impl NonOptionDef {
    /// Validates a declaration. The name must not be blank.
    pub fn new(spec: NonOptionSpec) -> Result<Self, DeclarationError> {
        let name = spec.name.trim().to_string();
        if name.is_empty() {
            return Err(DeclarationError::EmptyNonOptionName);
        }
        Ok(Self {
            placement: spec.placement(),
            multiple: spec.multiple,
            name,
        })
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Emitted before the options.
    pub fn is_leading(&self) -> bool {
        self.placement == Placement::Leading
    }

    /// Emitted after the options.
    pub fn is_tailing(&self) -> bool {
        self.placement == Placement::Tailing
    }

    /// Accepts several values.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Renders an assigned value into positional tokens.
    pub fn format_tokens(&self, value: &Value) -> Result<Vec<String>, FormatError> {
        match coercion::coerce(value)? {
            Coerced::Absent | Coerced::Present => Ok(Vec::new()),
            Coerced::Tokens(tokens) => {
                if !self.multiple && tokens.len() > 1 {
                    log::debug!(
                        "Non-option '{}' is not repeatable but received {} values.",
                        self.name,
                        tokens.len()
                    );
                }
                Ok(tokens)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValueMap;

    fn files() -> NonOptionDef {
        NonOptionDef::new(NonOptionSpec::new("files")).unwrap()
    }

    fn args(value: impl Into<Value>) -> Vec<String> {
        files().format_tokens(&value.into()).unwrap()
    }

    #[test]
    fn test_leading_and_tailing_are_mutually_exclusive() {
        let leading = NonOptionDef::new(NonOptionSpec::new("files").leading()).unwrap();
        let tailing = NonOptionDef::new(NonOptionSpec::new("files").tailing()).unwrap();

        assert!(leading.is_leading());
        assert!(!leading.is_tailing());
        assert!(!tailing.is_leading());
        assert!(tailing.is_tailing());
    }

    #[test]
    fn test_placement_resolution() {
        let conflicting = NonOptionSpec {
            name: "x".into(),
            leading: Some(true),
            tailing: Some(true),
            multiple: false,
        };
        assert_eq!(conflicting.placement(), Placement::Leading);

        let not_tailing = NonOptionSpec {
            tailing: Some(false),
            ..NonOptionSpec::new("x")
        };
        assert_eq!(not_tailing.placement(), Placement::Leading);

        let not_leading = NonOptionSpec {
            leading: Some(false),
            ..NonOptionSpec::new("x")
        };
        assert_eq!(not_leading.placement(), Placement::Tailing);
        assert_eq!(NonOptionSpec::new("x").placement(), Placement::Tailing);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            NonOptionDef::new(NonOptionSpec::new(" ")),
            Err(DeclarationError::EmptyNonOptionName)
        ));
    }

    #[test]
    fn test_absent_values_give_no_arguments() {
        assert!(args(Value::Nil).is_empty());
        assert!(args(false).is_empty());
        assert!(args(Vec::<String>::new()).is_empty());
        assert!(args(true).is_empty());
    }

    #[test]
    fn test_single_and_multiple_values() {
        assert_eq!(args("foo"), vec!["foo"]);
        assert_eq!(args(["foo", "bar"]), vec!["foo", "bar"]);
    }

    #[test]
    fn test_mapping_values() {
        assert_eq!(args(ValueMap::new().with("foo", true).with("bar", false)), vec!["foo"]);
        assert_eq!(args(ValueMap::new().with("foo", "bar")), vec!["foo=bar"]);
    }
}
