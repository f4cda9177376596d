//! Two-namespace name resolution.
//!
//! Bare identifiers resolve against table columns only; `@`-prefixed
//! names resolve against the binding environment only. There is no
//! fallback between the namespaces, so a column and a binding sharing a
//! name never collide.

use crate::error::{Error, EvalResult};
use crate::expression::value::Value;
use crate::table::{Environment, Table};

/// Which namespace a name is looked up in, decided by the `@` sigil at
/// parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Column,
    Binding,
}

/// Tagged resolution result
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    Column(&'a [f64]),
    Binding(&'a Value),
}

pub struct Resolver<'a> {
    table: &'a Table,
    env: &'a Environment,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a Table, env: &'a Environment) -> Self {
        Self { table, env }
    }

    /// Resolve a name in the given namespace, failing with a positioned
    /// name error if it is absent.
    pub fn resolve(
        &self,
        namespace: Namespace,
        name: &str,
        offset: usize,
    ) -> EvalResult<Resolved<'a>> {
        let resolved = match namespace {
            Namespace::Column => self.table.column(name).map(Resolved::Column),
            Namespace::Binding => self.env.get(name).map(Resolved::Binding),
        };
        resolved.ok_or_else(|| Error::name(name, offset))
    }
}
