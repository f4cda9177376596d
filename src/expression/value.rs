//! Runtime values produced by evaluation and supplied through bindings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A value flowing through the evaluator.
///
/// `Series` and `Mask` are row-aligned: one element per table row.
/// `Number` and `Bool` are scalars and broadcast against row-aligned
/// operands. `Str` and `Record` only appear through bindings and string
/// literals; they participate in `.attr` / `[key]` access, not in
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
    Series(Vec<f64>),
    Mask(Vec<bool>),
    Record(HashMap<String, Value>),
}

impl Value {
    /// Build a record value from key/value pairs
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// Short kind name, used in type error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Series(_) => "series",
            Value::Mask(_) => "mask",
            Value::Record(_) => "record",
        }
    }

    /// Length of a row-aligned value, `None` for scalars
    pub fn row_len(&self) -> Option<usize> {
        match self {
            Value::Series(xs) => Some(xs.len()),
            Value::Mask(bs) => Some(bs.len()),
            _ => None,
        }
    }

    pub fn is_row_aligned(&self) -> bool {
        self.row_len().is_some()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Series(values)
    }
}

impl From<Vec<bool>> for Value {
    fn from(values: Vec<bool>) -> Self {
        Value::Mask(values)
    }
}
