// src/models.rs

use crate::core::{sub_options::SubOptions, task::Task};
use indexmap::IndexMap;

// --- ASSIGNED VALUES ---
// What a caller stores on a task instance for a declared parameter. The
// formatting rules in `core::coercion` turn these into tokens.

/// A value assigned to a parameter of a task instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value. Produces no tokens.
    #[default]
    Nil,
    /// `true` marks a bare flag, `false` is the same as `Nil`.
    Bool(bool),
    /// A scalar, already in its string form.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A key/value mapping, iterated in insertion order.
    Map(ValueMap),
    /// The named sub-flags of a sub-options option.
    SubOptions(SubOptions),
    /// A nested task, resolved to its own argument vector.
    Task(Box<Task>),
}

impl Value {
    /// `Nil` and `false` both mean "not given".
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Whether this is the `Nil` value.
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// A short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::SubOptions(_) => "sub-options",
            Self::Task(_) => "task",
        }
    }

    /// Returns the string slice of a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

macro_rules! value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Str(value.to_string())
                }
            }
        )*
    };
}

value_from_display!(i32, i64, u16, u32, u64, usize, f64);

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Self::Map(map)
    }
}

impl From<SubOptions> for Value {
    fn from(sub_options: SubOptions) -> Self {
        Self::SubOptions(sub_options)
    }
}

impl From<Task> for Value {
    fn from(task: Task) -> Self {
        Self::Task(Box::new(task))
    }
}

// --- ORDERED MAPPING ---

/// A key/value mapping that remembers insertion order.
///
/// Re-inserting an existing key replaces its value in place, so the key keeps
/// its original position. Composition output follows this order, so equality
/// is order-sensitive too.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: IndexMap<String, Value>,
}

impl ValueMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns the value under `key`, inserting `default()` first if it is missing.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> Value) -> &mut Value {
        self.entries.entry(key.to_string()).or_insert_with(default)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges `other` into `self`; the last write per key wins.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ValueMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
