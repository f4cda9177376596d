//! Expression evaluation framework.
//!
//! This module provides:
//! - Operator semantics (elementwise arithmetic, vectorized logic)
//! - Two-namespace name resolution (columns vs. `@` bindings)
//! - The runtime value model
//! - Evaluation with fused (blockwise) and unfused paths

pub mod eval;
pub mod operator;
pub mod resolve;
pub mod value;

pub use eval::{
    evaluate_expression, evaluate_statement, evaluate_statement_in_place, Evaluator, BLOCK_ROWS,
    FUSED_MIN_ROWS,
};
pub use operator::{BinaryOperator, CompareOp, UnaryOperator};
pub use resolve::{Namespace, Resolved, Resolver};
pub use value::Value;
