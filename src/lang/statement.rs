//! Top-level statement forms.

use std::fmt;

use super::ast::Expr;

/// A parsed statement: either a plain expression or a single assignment.
///
/// Assignment exists only at statement level. The parser rejects `=`
/// anywhere inside an expression, so `a = b = c` and `(d = a + b)` are
/// both syntax errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A non-assignment expression
    Expr(Expr),

    /// `target = value`; the target names a column to create or overwrite
    Assign {
        target: String,
        target_offset: usize,
        value: Expr,
    },
}

impl Statement {
    pub fn is_assignment(&self) -> bool {
        matches!(self, Statement::Assign { .. })
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Expr(expr) => write!(f, "{}", expr),
            Statement::Assign { target, value, .. } => write!(f, "{} = {}", target, value),
        }
    }
}
