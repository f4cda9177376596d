// Expression tokens for lexical analysis

/// A single token of the expression language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Identifier(String),
    /// `@name` reference into the binding environment
    BindingRef(String),
    Number(String),
    Str(String),

    // Keywords (case-sensitive, lowercase)
    And,
    Or,
    Not,
    True,
    False,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    /// `=` - assignment, only valid at the top level of a statement
    Assign,
    /// `==`
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `&` - same meaning as `and`
    Amp,
    /// `|` - same meaning as `or`
    Pipe,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,

    // Special
    Eof,
}

impl Token {
    /// Check if the token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::And | Token::Or | Token::Not | Token::True | Token::False
        )
    }

    /// Convert a string to a keyword token if it matches.
    ///
    /// Keywords are lowercase only: `And` is an identifier, `and` is not.
    pub fn keyword_from_str(s: &str) -> Option<Token> {
        match s {
            "and" => Some(Token::And),
            "or" => Some(Token::Or),
            "not" => Some(Token::Not),
            "true" => Some(Token::True),
            "false" => Some(Token::False),
            _ => None,
        }
    }
}

/// A token together with its character offset in the source string.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

impl SpannedToken {
    pub fn new(token: Token, offset: usize) -> Self {
        Self { token, offset }
    }
}
