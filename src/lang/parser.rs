// Expression parser - converts tokens to AST

use super::ast::Expr;
use super::lexer::Lexer;
use super::statement::Statement;
use super::token::{SpannedToken, Token};
use crate::error::{Error, EvalResult};
use crate::expression::operator::{BinaryOperator, CompareOp, UnaryOperator};

/// Recursive-descent parser with one function per precedence level,
/// low to high: or, and, comparison, additive, multiplicative, unary,
/// postfix, atom.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl Parser {
    pub fn new(source: &str) -> EvalResult<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Parser {
            tokens,
            position: 0,
        })
    }

    /// Parse a complete statement: an assignment or a plain expression.
    pub fn parse(&mut self) -> EvalResult<Statement> {
        let statement = if let (Token::Identifier(_), Some(Token::Assign)) =
            (self.current_token(), self.peek_token())
        {
            let (target, target_offset) = match self.current().clone() {
                SpannedToken {
                    token: Token::Identifier(name),
                    offset,
                } => (name, offset),
                _ => unreachable!(),
            };
            self.advance(); // target
            self.advance(); // `=`
            let value = self.parse_expression()?;
            Statement::Assign {
                target,
                target_offset,
                value,
            }
        } else {
            Statement::Expr(self.parse_expression()?)
        };

        self.expect_end()?;
        Ok(statement)
    }

    /// Parse expression
    fn parse_expression(&mut self) -> EvalResult<Expr> {
        self.parse_or()
    }

    /// Parse OR expression (`or` / `|`)
    fn parse_or(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_and()?;

        while matches!(self.current_token(), Token::Or | Token::Pipe) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOperator::Or, left, right);
        }

        Ok(left)
    }

    /// Parse AND expression (`and` / `&`)
    fn parse_and(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_comparison()?;

        while matches!(self.current_token(), Token::And | Token::Amp) {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::binary(BinaryOperator::And, left, right);
        }

        Ok(left)
    }

    /// Parse a comparison chain.
    ///
    /// Consecutive comparison operators collapse into a single `Compare`
    /// node: `a < b <= c` keeps all three operands so each is evaluated
    /// once when the chain desugars to pairwise conjunction.
    fn parse_comparison(&mut self) -> EvalResult<Expr> {
        let first = self.parse_additive()?;

        let mut rest = Vec::new();
        while let Some(op) = self.comparison_op() {
            self.advance();
            rest.push((op, self.parse_additive()?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::compare(first, rest))
        }
    }

    fn comparison_op(&self) -> Option<CompareOp> {
        match self.current_token() {
            Token::Eq => Some(CompareOp::Eq),
            Token::Ne => Some(CompareOp::Ne),
            Token::Lt => Some(CompareOp::Lt),
            Token::Le => Some(CompareOp::Le),
            Token::Gt => Some(CompareOp::Gt),
            Token::Ge => Some(CompareOp::Ge),
            _ => None,
        }
    }

    /// Parse addition/subtraction expression
    fn parse_additive(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();

            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplication/division expression
    fn parse_multiplicative(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Mul,
                Token::Slash => BinaryOperator::Div,
                _ => break,
            };
            self.advance();

            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse unary expression (`-`, `not`)
    fn parse_unary(&mut self) -> EvalResult<Expr> {
        match self.current_token() {
            Token::Minus => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::unary(UnaryOperator::Neg, operand))
            }
            Token::Not => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::unary(UnaryOperator::Not, operand))
            }
            _ => self.parse_postfix(),
        }
    }

    /// Parse postfix forms: `.attr` and `[index]`
    fn parse_postfix(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_atom()?;

        loop {
            match self.current_token() {
                Token::Dot => {
                    self.advance();
                    let attr = match self.current_token().clone() {
                        Token::Identifier(name) => {
                            self.advance();
                            name
                        }
                        _ => {
                            return Err(Error::syntax(
                                "expected attribute name after `.`",
                                self.current_offset(),
                            ))
                        }
                    };
                    expr = Expr::attribute(expr, attr);
                }
                Token::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect_token(Token::RightBracket)?;
                    expr = Expr::index(expr, index);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parse atom: literal, identifier, `@name`, parenthesized expression
    fn parse_atom(&mut self) -> EvalResult<Expr> {
        let offset = self.current_offset();
        match self.current_token().clone() {
            Token::Number(n) => {
                self.advance();
                match n.parse::<f64>() {
                    Ok(value) => Ok(Expr::Number(value)),
                    Err(_) => Err(Error::syntax(
                        format!("malformed numeric literal `{}`", n),
                        offset,
                    )),
                }
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expr::Str(s))
            }
            Token::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Token::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::Column { name, offset })
            }
            Token::BindingRef(name) => {
                self.advance();
                Ok(Expr::Binding { name, offset })
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(Token::RightParen)?;
                Ok(expr)
            }
            token => Err(Error::syntax(
                format!("unexpected token {:?}", token),
                offset,
            )),
        }
    }

    /// Require that all input has been consumed.
    fn expect_end(&self) -> EvalResult<()> {
        match self.current_token() {
            Token::Eof => Ok(()),
            Token::Assign => Err(Error::syntax(
                "assignment is only allowed at the top level of a statement",
                self.current_offset(),
            )),
            token => Err(Error::syntax(
                format!("unexpected token {:?}", token),
                self.current_offset(),
            )),
        }
    }

    fn current(&self) -> &SpannedToken {
        &self.tokens[self.position]
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.position].token
    }

    fn current_offset(&self) -> usize {
        self.tokens[self.position].offset
    }

    /// Peek at the token after the current one
    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1).map(|s| &s.token)
    }

    /// Advance to the next token (Eof is sticky)
    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    fn expect_token(&mut self, expected: Token) -> EvalResult<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(Error::syntax(
                format!(
                    "expected {:?}, found {:?}",
                    expected,
                    self.current_token()
                ),
                self.current_offset(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(source: &str) -> Expr {
        match Parser::new(source).unwrap().parse().unwrap() {
            Statement::Expr(expr) => expr,
            stmt => panic!("expected expression, got {:?}", stmt),
        }
    }

    fn parse_err(source: &str) -> Error {
        Parser::new(source).unwrap().parse().unwrap_err()
    }

    #[test]
    fn test_precedence() {
        // * binds tighter than +
        assert_eq!(parse_expr("a + b * c").to_string(), "(a + (b * c))");
        // comparison above additive
        assert_eq!(parse_expr("a + b < c").to_string(), "((a + b) < c)");
        // and above or
        assert_eq!(
            parse_expr("a < b or c < d and e < f").to_string(),
            "((a < b) or ((c < d) and (e < f)))"
        );
        // parentheses override
        assert_eq!(parse_expr("(a + b) * c").to_string(), "((a + b) * c)");
    }

    #[test]
    fn test_sigil_operators_match_keywords() {
        assert_eq!(
            parse_expr("a & b | c").to_string(),
            parse_expr("a and b or c").to_string()
        );
    }

    #[test]
    fn test_chained_comparison() {
        let expr = parse_expr("a < b <= c");
        match expr {
            Expr::Compare { first, rest } => {
                assert_eq!(first.to_string(), "a");
                assert_eq!(rest.len(), 2);
                assert_eq!(rest[0].0, CompareOp::Lt);
                assert_eq!(rest[1].0, CompareOp::Le);
            }
            other => panic!("expected comparison chain, got {:?}", other),
        }
    }

    #[test]
    fn test_unary() {
        assert_eq!(parse_expr("-a + b").to_string(), "((-a) + b)");
        assert_eq!(parse_expr("--a").to_string(), "(-(-a))");
        assert_eq!(parse_expr("not a & b").to_string(), "((not a) and b)");
    }

    #[test]
    fn test_postfix() {
        assert_eq!(parse_expr("@env.limit").to_string(), "@env.limit");
        assert_eq!(parse_expr("a[0]").to_string(), "a[0]");
        assert_eq!(parse_expr("@env['my col']").to_string(), "@env[\"my col\"]");
        // postfix binds tighter than unary
        assert_eq!(parse_expr("-a[0]").to_string(), "(-a[0])");
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_expr("2.5e2"), Expr::Number(250.0));
        assert_eq!(parse_expr("true"), Expr::Bool(true));
        assert_eq!(parse_expr("false"), Expr::Bool(false));
    }

    #[test]
    fn test_column_and_binding_offsets() {
        let expr = parse_expr("a + @k");
        match expr {
            Expr::Binary { left, right, .. } => {
                assert_eq!(
                    *left,
                    Expr::Column {
                        name: "a".to_string(),
                        offset: 0
                    }
                );
                assert_eq!(
                    *right,
                    Expr::Binding {
                        name: "k".to_string(),
                        offset: 4
                    }
                );
            }
            other => panic!("expected binary op, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment() {
        let stmt = Parser::new("d = a + b").unwrap().parse().unwrap();
        match stmt {
            Statement::Assign {
                target,
                target_offset,
                value,
            } => {
                assert_eq!(target, "d");
                assert_eq!(target_offset, 0);
                assert_eq!(value.to_string(), "(a + b)");
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_equality_is_not_assignment() {
        let stmt = Parser::new("a == b").unwrap().parse().unwrap();
        assert!(!stmt.is_assignment());
    }

    #[test]
    fn test_nested_assignment_rejected() {
        assert!(matches!(parse_err("a = b = c"), Error::Syntax { .. }));
        assert!(matches!(parse_err("(d = a + b)"), Error::Syntax { .. }));
        assert!(matches!(parse_err("a + b = c"), Error::Syntax { .. }));
    }

    #[test]
    fn test_unbalanced_parens() {
        let err = parse_err("(a + b");
        match err {
            Error::Syntax { message, position } => {
                assert!(message.contains("RightParen"), "message: {}", message);
                assert_eq!(position, 6);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
        assert!(matches!(parse_err("a[0"), Error::Syntax { .. }));
    }

    #[test]
    fn test_trailing_input() {
        assert!(matches!(parse_err("a b"), Error::Syntax { position: 2, .. }));
        assert!(matches!(parse_err("1 2"), Error::Syntax { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_err(""), Error::Syntax { .. }));
        assert!(matches!(parse_err("a +"), Error::Syntax { .. }));
    }

    #[test]
    fn test_attribute_requires_name() {
        assert!(matches!(parse_err("@env."), Error::Syntax { .. }));
        assert!(matches!(parse_err("@env.[0]"), Error::Syntax { .. }));
    }
}
