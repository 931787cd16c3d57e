// src/core/option.rs

//! Options: flag-bearing parameters and the rules that render their values.

use crate::{
    core::{
        coercion::{self, Coerced, FormatError},
        naming::flag_namify,
        task_type::DeclarationError,
    },
    models::Value,
};
use std::{fmt, sync::Arc};

/// A custom renderer for an option. It receives the option and the value tokens
/// (one token per call for repeatable options) and returns the tokens to emit.
pub type Formatter =
    Arc<dyn Fn(&OptionDef, &[String]) -> Result<Vec<String>, FormatError> + Send + Sync>;

// --- DECLARATION INPUT ---

/// The declaration of an option, before validation.
///
/// ```
/// use argsmith::core::option::{OptionDef, OptionSpec};
///
/// let exclude = OptionDef::new(OptionSpec::new("--exclude").equals().separator(",")).unwrap();
/// assert_eq!(exclude.name(), "exclude");
/// assert_eq!(
///     exclude.format_tokens(&vec!["a", "b"].into()).unwrap(),
///     vec!["--exclude=a,b"]
/// );
/// ```
#[derive(Clone, Default)]
pub struct OptionSpec {
    /// The literal flag token, e.g. `-f` or `--output`.
    pub flag: String,
    /// The parameter name. Derived from the flag when omitted.
    pub name: Option<String>,
    /// Render as a single `flag=value` token.
    pub equals: bool,
    /// Repeat the flag once per value.
    pub multiple: bool,
    /// Join multiple values into one token with this separator.
    pub separator: Option<String>,
    /// The value is a [`SubOptions`](crate::core::sub_options::SubOptions) container.
    pub sub_options: bool,
    /// Overrides the default rendering.
    pub formatter: Option<Formatter>,
}

impl OptionSpec {
    /// Starts a declaration for `flag`.
    pub fn new(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            ..Self::default()
        }
    }

    /// Sets the parameter name instead of deriving it from the flag.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Renders `flag=value` as one token.
    pub fn equals(mut self) -> Self {
        self.equals = true;
        self
    }

    /// Repeats the flag once per value.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Joins the values with `separator` into a single token.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Holds a [`SubOptions`](crate::core::sub_options::SubOptions) container as its value.
    pub fn sub_options(mut self) -> Self {
        self.sub_options = true;
        self
    }

    /// Replaces the default rendering with `formatter`.
    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&OptionDef, &[String]) -> Result<Vec<String>, FormatError> + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("flag", &self.flag)
            .field("name", &self.name)
            .field("equals", &self.equals)
            .field("multiple", &self.multiple)
            .field("separator", &self.separator)
            .field("sub_options", &self.sub_options)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

// --- VALIDATED DEFINITION ---

/// A flag-bearing parameter. Immutable once declared.
#[derive(Clone)]
pub struct OptionDef {
    name: String,
    flag: String,
    equals: bool,
    multiple: bool,
    separator: Option<String>,
    sub_options: bool,
    formatter: Option<Formatter>,
}

impl OptionDef {
    /// Validates a declaration.
    pub fn new(spec: OptionSpec) -> Result<Self, DeclarationError> {
        let flag = spec.flag.trim().to_string();
        if flag.is_empty() {
            return Err(DeclarationError::MissingFlag);
        }

        let name = match spec.name {
            Some(name) => name.trim().to_string(),
            None => flag_namify(&flag),
        };
        if name.is_empty() {
            return Err(DeclarationError::MissingName { flag });
        }

        if spec.sub_options && spec.equals && !spec.multiple && spec.separator.is_none() {
            return Err(DeclarationError::EqualsWithoutSeparator { flag });
        }

        Ok(Self {
            name,
            flag,
            equals: spec.equals,
            multiple: spec.multiple,
            separator: spec.separator,
            sub_options: spec.sub_options,
            formatter: spec.formatter,
        })
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The literal flag token.
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Renders as `flag=value`.
    pub fn is_equals(&self) -> bool {
        self.equals
    }

    /// Repeats the flag per value.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// The value separator, if declared.
    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// The value is a sub-options container.
    pub fn has_sub_options(&self) -> bool {
        self.sub_options
    }

    /// Renders an assigned value into argument tokens.
    pub fn format_tokens(&self, value: &Value) -> Result<Vec<String>, FormatError> {
        let tokens = match coercion::coerce(value)? {
            Coerced::Absent => return Ok(Vec::new()),
            Coerced::Present => return Ok(vec![self.flag.clone()]),
            Coerced::Tokens(tokens) => tokens,
        };
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        if self.multiple {
            let mut args = Vec::with_capacity(tokens.len() * 2);
            for token in tokens {
                args.extend(self.render(std::slice::from_ref(&token))?);
            }
            return Ok(args);
        }

        match &self.separator {
            Some(separator) => self.render(&[tokens.join(separator)]),
            None => self.render(&tokens),
        }
    }

    fn render(&self, tokens: &[String]) -> Result<Vec<String>, FormatError> {
        if let Some(formatter) = &self.formatter {
            return formatter(self, tokens);
        }

        if self.equals {
            return match tokens {
                [value] => Ok(vec![format!("{}={}", self.flag, value)]),
                _ => Err(FormatError::AmbiguousEqualsValue {
                    flag: self.flag.clone(),
                    count: tokens.len(),
                }),
            };
        }

        let mut args = Vec::with_capacity(tokens.len() + 1);
        args.push(self.flag.clone());
        args.extend_from_slice(tokens);
        Ok(args)
    }
}

impl fmt::Debug for OptionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef")
            .field("name", &self.name)
            .field("flag", &self.flag)
            .field("equals", &self.equals)
            .field("multiple", &self.multiple)
            .field("separator", &self.separator)
            .field("sub_options", &self.sub_options)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}
