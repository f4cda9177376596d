//! tabexpr - string expression evaluation over tabular columns.
//!
//! Parses a restricted arithmetic/boolean/comparison language over named
//! numeric columns and caller-supplied `@` bindings, then evaluates it
//! with elementwise semantics. Large tables are evaluated in row blocks
//! so a compound expression does not materialize one full-length buffer
//! per operator.
//!
//! ```
//! use tabexpr::{evaluate_expression, Environment, Table, Value};
//!
//! let table = Table::new()
//!     .with_column("a", vec![1.0, 2.0, 3.0])
//!     .unwrap()
//!     .with_column("b", vec![4.0, 5.0, 6.0])
//!     .unwrap();
//! let mut env = Environment::new();
//! env.insert("k", 2.0);
//!
//! let sum = evaluate_expression("a + b", &table, &env).unwrap();
//! assert_eq!(sum, Value::Series(vec![5.0, 7.0, 9.0]));
//!
//! let mask = evaluate_expression("a > @k", &table, &env).unwrap();
//! assert_eq!(mask, Value::Mask(vec![false, false, true]));
//! ```

pub mod error;
pub mod expression;
pub mod lang;
pub mod table;

pub use error::{Error, EvalResult};
pub use expression::{
    evaluate_expression, evaluate_statement, evaluate_statement_in_place, Evaluator, Value,
};
pub use table::{Environment, Table};
