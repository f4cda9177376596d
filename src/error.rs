//! Error taxonomy for parsing and evaluation.

use thiserror::Error;

/// Errors surfaced by parsing, name resolution, and evaluation.
///
/// Offsets are character positions into the source string. `Type` and
/// `Shape` errors arise during evaluation, after the source has been
/// consumed, so they carry no position.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("syntax error at offset {position}: {message}")]
    Syntax { message: String, position: usize },

    #[error("name `{name}` at offset {position} is not defined")]
    Name { name: String, position: usize },

    #[error("type error: {message}")]
    Type { message: String },

    #[error("shape mismatch: operand lengths {left} and {right} differ")]
    Shape { left: usize, right: usize },
}

impl Error {
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            position,
        }
    }

    pub fn name(name: impl Into<String>, position: usize) -> Self {
        Error::Name {
            name: name.into(),
            position,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Error::Type {
            message: message.into(),
        }
    }
}

/// Result type for parsing and evaluation.
pub type EvalResult<T> = Result<T, Error>;
