//! Expression AST definitions.

use std::fmt;

use crate::expression::operator::{BinaryOperator, CompareOp, UnaryOperator};

/// Expression tree node.
///
/// Built once per evaluation call by the parser and discarded afterwards.
/// `Column` and `Binding` carry the character offset of the name in the
/// source string so unresolved names report a position.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),

    /// Boolean literal (`true` / `false`)
    Bool(bool),

    /// String literal, used as a record index key
    Str(String),

    /// Bare identifier, resolved against the column namespace only
    Column { name: String, offset: usize },

    /// `@name`, resolved against the binding environment only
    Binding { name: String, offset: usize },

    /// Binary operation (arithmetic or logical)
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    /// Chained comparison: `first op0 rest0 op1 rest1 ...`.
    ///
    /// `a < b <= c` is one node with two pairs; evaluation AND-combines
    /// the pairwise results and evaluates each operand exactly once.
    Compare {
        first: Box<Expr>,
        rest: Vec<(CompareOp, Expr)>,
    },

    /// Attribute access `base.attr`
    Attribute { base: Box<Expr>, attr: String },

    /// Indexing `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },
}

impl Expr {
    /// Create a numeric literal expression
    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    /// Create a boolean literal expression
    pub fn boolean(value: bool) -> Self {
        Expr::Bool(value)
    }

    /// Create a column reference (offset 0, for programmatic construction)
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column {
            name: name.into(),
            offset: 0,
        }
    }

    /// Create a binding reference (offset 0, for programmatic construction)
    pub fn binding(name: impl Into<String>) -> Self {
        Expr::Binding {
            name: name.into(),
            offset: 0,
        }
    }

    /// Create a binary operation expression
    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary operation expression
    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a comparison chain
    pub fn compare(first: Expr, rest: Vec<(CompareOp, Expr)>) -> Self {
        Expr::Compare {
            first: Box::new(first),
            rest,
        }
    }

    /// Create an attribute access expression
    pub fn attribute(base: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            base: Box::new(base),
            attr: attr.into(),
        }
    }

    /// Create an indexing expression
    pub fn index(base: Expr, index: Expr) -> Self {
        Expr::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    /// Check if this expression is constant (references no columns or bindings)
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Number(_) | Expr::Bool(_) | Expr::Str(_) => true,
            Expr::Column { .. } | Expr::Binding { .. } => false,
            Expr::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
            Expr::Unary { operand, .. } => operand.is_constant(),
            Expr::Compare { first, rest } => {
                first.is_constant() && rest.iter().all(|(_, e)| e.is_constant())
            }
            Expr::Attribute { base, .. } => base.is_constant(),
            Expr::Index { base, index } => base.is_constant() && index.is_constant(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Str(s) => write!(f, "{:?}", s),
            Expr::Column { name, .. } => write!(f, "{}", name),
            Expr::Binding { name, .. } => write!(f, "@{}", name),
            Expr::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            Expr::Unary { op, operand } => match op {
                UnaryOperator::Neg => write!(f, "(-{})", operand),
                UnaryOperator::Not => write!(f, "(not {})", operand),
            },
            Expr::Compare { first, rest } => {
                write!(f, "({}", first)?;
                for (op, operand) in rest {
                    write!(f, " {} {}", op.as_str(), operand)?;
                }
                write!(f, ")")
            }
            Expr::Attribute { base, attr } => write!(f, "{}.{}", base, attr),
            Expr::Index { base, index } => write!(f, "{}[{}]", base, index),
        }
    }
}
