// Expression language - lexing, parsing, and AST representation

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod statement;
pub mod token;

pub use ast::Expr;
pub use lexer::Lexer;
pub use parser::Parser;
pub use statement::Statement;
pub use token::{SpannedToken, Token};
