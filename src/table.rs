//! Table and binding environment containers supplied by the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, EvalResult};
use crate::expression::value::Value;

/// Column-oriented table: an ordered mapping from unique column name to a
/// numeric buffer. Every column has the same length, the table's row
/// count. Column order is insertion order and carries no semantic weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: HashMap<String, Vec<f64>>,
    column_order: Vec<String>,
    row_count: usize,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert_column`](Self::insert_column)
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> EvalResult<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Add a column, or replace an existing one in place.
    ///
    /// The first column fixes the table's row count; later columns must
    /// match it or the insert fails with a shape error and the table is
    /// left unchanged.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> EvalResult<()> {
        let name = name.into();
        if self.column_order.is_empty() {
            self.row_count = values.len();
        } else if values.len() != self.row_count {
            return Err(Error::Shape {
                left: values.len(),
                right: self.row_count,
            });
        }

        if !self.columns.contains_key(&name) {
            self.column_order.push(name.clone());
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Get a column buffer by name
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.column_order.iter().map(|s| s.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.column_order.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

/// External name-to-value bindings, referenced from expressions as
/// `@name`. A separate namespace from columns: a binding and a column may
/// share a name without collision. Read-only during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Create a new empty environment
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
