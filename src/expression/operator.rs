//! Operator definitions for expressions.

/// Binary operators: elementwise arithmetic and vectorized logic.
///
/// The surface forms `&`/`|` and `and`/`or` both map to `And`/`Or`; the
/// two spellings are deliberately equivalent over boolean operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Logical
    And,
    Or,
}

impl BinaryOperator {
    /// Apply an arithmetic operator to two numbers.
    ///
    /// Division follows IEEE 754: dividing by zero yields an infinity or
    /// NaN rather than an error. Logical operators are not defined on
    /// numbers; callers route them separately.
    pub fn apply_numeric(&self, left: f64, right: f64) -> Option<f64> {
        match self {
            BinaryOperator::Add => Some(left + right),
            BinaryOperator::Sub => Some(left - right),
            BinaryOperator::Mul => Some(left * right),
            BinaryOperator::Div => Some(left / right),
            BinaryOperator::And | BinaryOperator::Or => None,
        }
    }

    /// Apply a logical operator to two booleans.
    pub fn apply_logical(&self, left: bool, right: bool) -> Option<bool> {
        match self {
            BinaryOperator::And => Some(left && right),
            BinaryOperator::Or => Some(left || right),
            _ => None,
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

/// Comparison operators, kept separate from [`BinaryOperator`] because
/// comparisons chain: `a < b <= c` is one AST node with two operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Whether the comparison holds for a pair of numbers.
    ///
    /// NaN compares the IEEE way: unequal to everything, unordered.
    pub fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
        }
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Unary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Numeric negation
    Neg,
    /// Logical negation
    Not,
}

impl UnaryOperator {
    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
            UnaryOperator::Not => "not",
        }
    }
}
