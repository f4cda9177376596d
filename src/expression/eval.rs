//! Expression evaluation implementation.
//!
//! Two functionally equivalent paths exist. The unfused path walks the
//! tree once over whole columns, materializing one full-length buffer
//! per node. The fused path walks the tree once per row block, so
//! intermediates stay block-sized and peak memory is bounded by the
//! result plus O(block) per operator. Blockwise evaluation only pays off
//! once intermediates stop fitting in cache, so tables below
//! [`FUSED_MIN_ROWS`] rows take the unfused path.

use log::{debug, trace};

use crate::error::{Error, EvalResult};
use crate::expression::operator::{BinaryOperator, CompareOp, UnaryOperator};
use crate::expression::resolve::{Namespace, Resolved, Resolver};
use crate::expression::value::Value;
use crate::lang::ast::Expr;
use crate::lang::parser::Parser;
use crate::lang::statement::Statement;
use crate::table::{Environment, Table};

/// Row count at or above which compound expressions are evaluated in
/// row blocks instead of whole columns.
pub const FUSED_MIN_ROWS: usize = 65_536;

/// Rows per block on the fused path.
pub const BLOCK_ROWS: usize = 8_192;

/// Evaluator for parsed expressions against a table and bindings.
pub struct Evaluator<'a> {
    resolver: Resolver<'a>,
    rows: usize,
    has_columns: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a Table, env: &'a Environment) -> Self {
        Self {
            resolver: Resolver::new(table, env),
            rows: table.row_count(),
            has_columns: table.column_count() > 0,
        }
    }

    /// Evaluate an expression, choosing the fused path for large tables.
    pub fn evaluate(&self, expr: &Expr) -> EvalResult<Value> {
        if expr.is_constant() || self.rows < FUSED_MIN_ROWS {
            trace!("evaluating `{}` unfused over {} rows", expr, self.rows);
            self.eval_node(expr, None)
        } else {
            trace!("evaluating `{}` fused over {} rows", expr, self.rows);
            self.evaluate_fused(expr)
        }
    }

    /// Blockwise evaluation: run the whole tree per row block and append
    /// block results into one output buffer.
    fn evaluate_fused(&self, expr: &Expr) -> EvalResult<Value> {
        let first_end = BLOCK_ROWS.min(self.rows);
        let first = self.eval_node(expr, Some((0, first_end)))?;

        match first {
            Value::Series(mut out) => {
                out.reserve(self.rows - out.len());
                let mut start = first_end;
                while start < self.rows {
                    let end = (start + BLOCK_ROWS).min(self.rows);
                    match self.eval_node(expr, Some((start, end)))? {
                        Value::Series(block) => out.extend_from_slice(&block),
                        other => {
                            return Err(Error::type_error(format!(
                                "expression produced a {} for one row block and a series for another",
                                other.kind()
                            )))
                        }
                    }
                    start = end;
                }
                Ok(Value::Series(out))
            }
            Value::Mask(mut out) => {
                out.reserve(self.rows - out.len());
                let mut start = first_end;
                while start < self.rows {
                    let end = (start + BLOCK_ROWS).min(self.rows);
                    match self.eval_node(expr, Some((start, end)))? {
                        Value::Mask(block) => out.extend_from_slice(&block),
                        other => {
                            return Err(Error::type_error(format!(
                                "expression produced a {} for one row block and a mask for another",
                                other.kind()
                            )))
                        }
                    }
                    start = end;
                }
                Ok(Value::Mask(out))
            }
            // All elementwise operators preserve row shape and scalar
            // subtrees are window-independent, so a scalar first block
            // means a scalar result.
            scalar => Ok(scalar),
        }
    }

    /// Evaluate one node, restricted to a row window on the fused path.
    ///
    /// Postfix forms (`.attr`, `[index]`) produce scalars, so their
    /// subtrees always evaluate over the full table regardless of the
    /// window.
    fn eval_node(&self, expr: &Expr, window: Option<(usize, usize)>) -> EvalResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),

            Expr::Column { name, offset } => {
                let resolved = self.resolver.resolve(Namespace::Column, name, *offset)?;
                self.leaf_value(resolved, window)
            }

            Expr::Binding { name, offset } => {
                let resolved = self.resolver.resolve(Namespace::Binding, name, *offset)?;
                self.leaf_value(resolved, window)
            }

            Expr::Binary { op, left, right } => {
                let left_val = self.eval_node(left, window)?;
                let right_val = self.eval_node(right, window)?;
                if op.is_logical() {
                    Self::logical_binary(*op, left_val, right_val)
                } else {
                    Self::numeric_binary(*op, left_val, right_val)
                }
            }

            Expr::Unary { op, operand } => {
                let operand_val = self.eval_node(operand, window)?;
                Self::unary(*op, operand_val)
            }

            Expr::Compare { first, rest } => self.compare_chain(first, rest, window),

            Expr::Attribute { base, attr } => {
                let base_val = self.eval_node(base, None)?;
                Self::attribute(base_val, attr)
            }

            Expr::Index { base, index } => {
                let base_val = self.eval_node(base, None)?;
                let index_val = self.eval_node(index, None)?;
                Self::index(base_val, index_val)
            }
        }
    }

    /// Turn a resolved name into a value, applying the row window.
    ///
    /// A row-shaped binding must match the table's row count whenever the
    /// table has columns; otherwise windowed and whole-column evaluation
    /// could disagree.
    fn leaf_value(&self, resolved: Resolved<'_>, window: Option<(usize, usize)>) -> EvalResult<Value> {
        match resolved {
            Resolved::Column(col) => Ok(Value::Series(Self::windowed(col, window).to_vec())),
            Resolved::Binding(value) => match value {
                Value::Series(xs) => {
                    self.check_binding_len(xs.len())?;
                    Ok(Value::Series(Self::windowed(xs, window).to_vec()))
                }
                Value::Mask(bs) => {
                    self.check_binding_len(bs.len())?;
                    Ok(Value::Mask(Self::windowed(bs, window).to_vec()))
                }
                scalar => Ok(scalar.clone()),
            },
        }
    }

    fn windowed<'v, T>(values: &'v [T], window: Option<(usize, usize)>) -> &'v [T] {
        match window {
            Some((start, end)) => &values[start..end],
            None => values,
        }
    }

    fn check_binding_len(&self, len: usize) -> EvalResult<()> {
        if self.has_columns && len != self.rows {
            return Err(Error::Shape {
                left: len,
                right: self.rows,
            });
        }
        Ok(())
    }

    /// Evaluate a comparison chain as the conjunction of pairwise
    /// comparisons, evaluating each operand exactly once.
    fn compare_chain(
        &self,
        first: &Expr,
        rest: &[(CompareOp, Expr)],
        window: Option<(usize, usize)>,
    ) -> EvalResult<Value> {
        let mut prev = self.eval_node(first, window)?;
        let mut result: Option<Value> = None;

        for (op, operand) in rest {
            let next = self.eval_node(operand, window)?;
            let pair = Self::compare_values(*op, &prev, &next)?;
            result = Some(match result {
                None => pair,
                Some(acc) => Self::logical_binary(BinaryOperator::And, acc, pair)?,
            });
            prev = next;
        }

        match result {
            Some(value) => Ok(value),
            // The parser never builds an empty chain; treat it as the
            // bare first operand.
            None => Ok(prev),
        }
    }

    /// Elementwise arithmetic with scalar broadcast
    fn numeric_binary(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        let apply = |a: f64, b: f64| {
            // arithmetic route only; op is never logical here
            op.apply_numeric(a, b).unwrap_or(f64::NAN)
        };

        match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(apply(*a, *b))),
            (Value::Series(xs), Value::Number(b)) => {
                Ok(Value::Series(xs.iter().map(|a| apply(*a, *b)).collect()))
            }
            (Value::Number(a), Value::Series(ys)) => {
                Ok(Value::Series(ys.iter().map(|b| apply(*a, *b)).collect()))
            }
            (Value::Series(xs), Value::Series(ys)) => {
                if xs.len() != ys.len() {
                    return Err(Error::Shape {
                        left: xs.len(),
                        right: ys.len(),
                    });
                }
                Ok(Value::Series(
                    xs.iter().zip(ys).map(|(a, b)| apply(*a, *b)).collect(),
                ))
            }
            _ => Err(Error::type_error(format!(
                "operator `{}` requires numeric operands, found {} and {}",
                op.as_str(),
                left.kind(),
                right.kind()
            ))),
        }
    }

    /// Vectorized logical operators over booleans and masks
    fn logical_binary(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        let apply = |a: bool, b: bool| op.apply_logical(a, b).unwrap_or(false);

        match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(apply(*a, *b))),
            (Value::Mask(xs), Value::Bool(b)) => {
                Ok(Value::Mask(xs.iter().map(|a| apply(*a, *b)).collect()))
            }
            (Value::Bool(a), Value::Mask(ys)) => {
                Ok(Value::Mask(ys.iter().map(|b| apply(*a, *b)).collect()))
            }
            (Value::Mask(xs), Value::Mask(ys)) => {
                if xs.len() != ys.len() {
                    return Err(Error::Shape {
                        left: xs.len(),
                        right: ys.len(),
                    });
                }
                Ok(Value::Mask(
                    xs.iter().zip(ys).map(|(a, b)| apply(*a, *b)).collect(),
                ))
            }
            _ => Err(Error::type_error(format!(
                "operator `{}` requires boolean operands, found {} and {}",
                op.as_str(),
                left.kind(),
                right.kind()
            ))),
        }
    }

    /// One pairwise comparison of a chain, numeric operands only
    fn compare_values(op: CompareOp, left: &Value, right: &Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(op.holds(*a, *b))),
            (Value::Series(xs), Value::Number(b)) => {
                Ok(Value::Mask(xs.iter().map(|a| op.holds(*a, *b)).collect()))
            }
            (Value::Number(a), Value::Series(ys)) => {
                Ok(Value::Mask(ys.iter().map(|b| op.holds(*a, *b)).collect()))
            }
            (Value::Series(xs), Value::Series(ys)) => {
                if xs.len() != ys.len() {
                    return Err(Error::Shape {
                        left: xs.len(),
                        right: ys.len(),
                    });
                }
                Ok(Value::Mask(
                    xs.iter().zip(ys).map(|(a, b)| op.holds(*a, *b)).collect(),
                ))
            }
            _ => Err(Error::type_error(format!(
                "operator `{}` requires numeric operands, found {} and {}",
                op.as_str(),
                left.kind(),
                right.kind()
            ))),
        }
    }

    fn unary(op: UnaryOperator, operand: Value) -> EvalResult<Value> {
        match op {
            UnaryOperator::Neg => match operand {
                Value::Number(n) => Ok(Value::Number(-n)),
                Value::Series(xs) => Ok(Value::Series(xs.iter().map(|x| -x).collect())),
                other => Err(Error::type_error(format!(
                    "operator `-` requires a numeric operand, found {}",
                    other.kind()
                ))),
            },
            UnaryOperator::Not => match operand {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                Value::Mask(bs) => Ok(Value::Mask(bs.iter().map(|b| !b).collect())),
                other => Err(Error::type_error(format!(
                    "operator `not` requires a boolean operand, found {}",
                    other.kind()
                ))),
            },
        }
    }

    /// `base.attr`: field access on a record binding
    fn attribute(base: Value, attr: &str) -> EvalResult<Value> {
        match base {
            Value::Record(fields) => fields.get(attr).cloned().ok_or_else(|| {
                Error::type_error(format!("record has no field `{}`", attr))
            }),
            other => Err(Error::type_error(format!(
                "value of kind {} has no attribute `{}`",
                other.kind(),
                attr
            ))),
        }
    }

    /// `base[index]`: element of a series/mask, or field of a record
    fn index(base: Value, index: Value) -> EvalResult<Value> {
        match (&base, &index) {
            (Value::Series(xs), Value::Number(i)) => {
                Self::element_index(*i, xs.len()).map(|i| Value::Number(xs[i]))
            }
            (Value::Mask(bs), Value::Number(i)) => {
                Self::element_index(*i, bs.len()).map(|i| Value::Bool(bs[i]))
            }
            (Value::Record(fields), Value::Str(key)) => {
                fields.get(key).cloned().ok_or_else(|| {
                    Error::type_error(format!("record has no field `{}`", key))
                })
            }
            _ => Err(Error::type_error(format!(
                "cannot index {} with {}",
                base.kind(),
                index.kind()
            ))),
        }
    }

    fn element_index(index: f64, len: usize) -> EvalResult<usize> {
        if index.fract() != 0.0 || index < 0.0 {
            return Err(Error::type_error(format!(
                "index must be a non-negative integer, found {}",
                index
            )));
        }
        let i = index as usize;
        if i >= len {
            return Err(Error::type_error(format!(
                "index {} out of range for length {}",
                i, len
            )));
        }
        Ok(i)
    }
}

/// Evaluate a non-assignment expression string against a table and
/// bindings, producing a scalar or a row-aligned value.
pub fn evaluate_expression(
    source: &str,
    table: &Table,
    env: &Environment,
) -> EvalResult<Value> {
    match Parser::new(source)?.parse()? {
        Statement::Expr(expr) => Evaluator::new(table, env).evaluate(&expr),
        Statement::Assign { target_offset, .. } => Err(Error::syntax(
            "expected an expression, found an assignment",
            target_offset,
        )),
    }
}

/// Evaluate an assignment statement, returning a new table with the one
/// column added or replaced. The input table is not modified.
pub fn evaluate_statement(source: &str, table: &Table, env: &Environment) -> EvalResult<Table> {
    let mut result = table.clone();
    evaluate_statement_in_place(source, &mut result, env)?;
    Ok(result)
}

/// Evaluate an assignment statement, mutating the table in place.
///
/// The column value is computed in full before the table is touched, so
/// on any failure the table is left exactly as it was.
pub fn evaluate_statement_in_place(
    source: &str,
    table: &mut Table,
    env: &Environment,
) -> EvalResult<()> {
    let (target, value) = match Parser::new(source)?.parse()? {
        Statement::Assign { target, value, .. } => (target, value),
        Statement::Expr(_) => {
            return Err(Error::syntax("expected an assignment statement", 0));
        }
    };

    let result = Evaluator::new(table, env).evaluate(&value)?;
    let column = column_from_value(result, table.row_count(), table.column_count())?;
    debug!("assigning column `{}` = {}", target, value);
    table.insert_column(target, column)
}

/// Convert an evaluation result into a column buffer. Masks store as
/// 1.0/0.0; scalars broadcast to the row count.
fn column_from_value(value: Value, rows: usize, column_count: usize) -> EvalResult<Vec<f64>> {
    match value {
        Value::Series(xs) => Ok(xs),
        Value::Mask(bs) => Ok(bs
            .into_iter()
            .map(|b| if b { 1.0 } else { 0.0 })
            .collect()),
        Value::Number(x) if column_count > 0 => Ok(vec![x; rows]),
        Value::Bool(b) if column_count > 0 => Ok(vec![if b { 1.0 } else { 0.0 }; rows]),
        Value::Number(_) | Value::Bool(_) => Err(Error::type_error(
            "cannot broadcast a scalar into a table with no columns",
        )),
        other => Err(Error::type_error(format!(
            "cannot assign a {} to a column",
            other.kind()
        ))),
    }
}
