// Expression lexer - tokenizes expression source strings

use super::token::{SpannedToken, Token};
use crate::error::{Error, EvalResult};

pub struct Lexer {
    input: String,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Self {
        let mut lexer = Lexer {
            input: input.into(),
            position: 0,
            current_char: None,
        };
        lexer.current_char = lexer.input.chars().next();
        lexer
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> EvalResult<SpannedToken> {
        self.skip_whitespace();

        let offset = self.position;
        let ch = match self.current_char {
            Some(ch) => ch,
            None => return Ok(SpannedToken::new(Token::Eof, offset)),
        };

        let token = match ch {
            '+' => {
                self.advance();
                Token::Plus
            }
            '-' => {
                self.advance();
                Token::Minus
            }
            '*' => {
                self.advance();
                Token::Star
            }
            '/' => {
                self.advance();
                Token::Slash
            }
            '&' => {
                self.advance();
                Token::Amp
            }
            '|' => {
                self.advance();
                Token::Pipe
            }
            '=' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::Eq
                } else {
                    Token::Assign
                }
            }
            '!' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::Ne
                } else {
                    return Err(Error::syntax("expected `=` after `!`", offset));
                }
            }
            '<' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            '[' => {
                self.advance();
                Token::LeftBracket
            }
            ']' => {
                self.advance();
                Token::RightBracket
            }
            '.' => {
                self.advance();
                Token::Dot
            }
            '@' => {
                self.advance();
                let name = self.read_identifier_chars();
                if name.is_empty() {
                    return Err(Error::syntax("expected name after `@`", offset));
                }
                Token::BindingRef(name)
            }
            '\'' | '"' => self.read_string(ch, offset)?,
            c if c.is_alphabetic() || c == '_' => {
                let identifier = self.read_identifier_chars();
                Token::keyword_from_str(&identifier).unwrap_or(Token::Identifier(identifier))
            }
            c if c.is_ascii_digit() => self.read_number(offset)?,
            c => {
                return Err(Error::syntax(format!("unexpected character `{}`", c), offset));
            }
        };

        Ok(SpannedToken::new(token, offset))
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> EvalResult<Vec<SpannedToken>> {
        let mut tokens = Vec::new();

        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.chars().nth(self.position);
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.input.chars().nth(self.position + 1)
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read a run of identifier characters (possibly empty)
    fn read_identifier_chars(&mut self) -> String {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        identifier
    }

    /// Read a string literal delimited by `quote`
    fn read_string(&mut self, quote: char, offset: usize) -> EvalResult<Token> {
        self.advance(); // Skip opening quote
        let mut string = String::new();

        loop {
            match self.current_char {
                Some(ch) if ch == quote => {
                    self.advance(); // Skip closing quote
                    return Ok(Token::Str(string));
                }
                Some(ch) => {
                    string.push(ch);
                    self.advance();
                }
                None => return Err(Error::syntax("unterminated string literal", offset)),
            }
        }
    }

    /// Read a number: integer or decimal, with an optional exponent
    fn read_number(&mut self, offset: usize) -> EvalResult<Token> {
        let mut number = String::new();
        let mut has_dot = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot && self.peek().map_or(false, |c| c.is_ascii_digit()) {
                has_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.current_char, Some('e') | Some('E')) {
            number.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char {
                number.push(sign);
                self.advance();
            }
            let mut saw_digit = false;
            while let Some(ch) = self.current_char {
                if ch.is_ascii_digit() {
                    number.push(ch);
                    self.advance();
                    saw_digit = true;
                } else {
                    break;
                }
            }
            if !saw_digit {
                return Err(Error::syntax(
                    format!("malformed numeric literal `{}`", number),
                    offset,
                ));
            }
        }

        Ok(Token::Number(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            tokens("price * 2"),
            vec![
                Token::Identifier("price".to_string()),
                Token::Star,
                Token::Number("2".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("+ - * / < > <= >= == != & |"),
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Lt,
                Token::Gt,
                Token::Le,
                Token::Ge,
                Token::Eq,
                Token::Ne,
                Token::Amp,
                Token::Pipe,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_assign_vs_equality() {
        assert_eq!(
            tokens("d = a == b"),
            vec![
                Token::Identifier("d".to_string()),
                Token::Assign,
                Token::Identifier("a".to_string()),
                Token::Eq,
                Token::Identifier("b".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            tokens("a and not b or true"),
            vec![
                Token::Identifier("a".to_string()),
                Token::And,
                Token::Not,
                Token::Identifier("b".to_string()),
                Token::Or,
                Token::True,
                Token::Eof,
            ]
        );
        // Keywords are case-sensitive
        assert_eq!(
            tokens("AND"),
            vec![Token::Identifier("AND".to_string()), Token::Eof]
        );
    }

    #[test]
    fn test_binding_refs() {
        assert_eq!(
            tokens("a > @threshold"),
            vec![
                Token::Identifier("a".to_string()),
                Token::Gt,
                Token::BindingRef("threshold".to_string()),
                Token::Eof,
            ]
        );
        assert!(matches!(
            Lexer::new("@ x").tokenize(),
            Err(Error::Syntax { position: 0, .. })
        ));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("123 456.789 0.5 1e6 2.5e-3"),
            vec![
                Token::Number("123".to_string()),
                Token::Number("456.789".to_string()),
                Token::Number("0.5".to_string()),
                Token::Number("1e6".to_string()),
                Token::Number("2.5e-3".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_exponent() {
        assert!(matches!(
            Lexer::new("1e+").tokenize(),
            Err(Error::Syntax { position: 0, .. })
        ));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            tokens(r#"'hello' "my col""#),
            vec![
                Token::Str("hello".to_string()),
                Token::Str("my col".to_string()),
                Token::Eof,
            ]
        );
        assert!(matches!(
            Lexer::new("'oops").tokenize(),
            Err(Error::Syntax { position: 0, .. })
        ));
    }

    #[test]
    fn test_postfix_delimiters() {
        assert_eq!(
            tokens("@env.limit[0]"),
            vec![
                Token::BindingRef("env".to_string()),
                Token::Dot,
                Token::Identifier("limit".to_string()),
                Token::LeftBracket,
                Token::Number("0".to_string()),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let spanned = Lexer::new("a + bb").tokenize().unwrap();
        let offsets: Vec<usize> = spanned.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_unexpected_character() {
        assert!(matches!(
            Lexer::new("a # b").tokenize(),
            Err(Error::Syntax { position: 2, .. })
        ));
        assert!(matches!(
            Lexer::new("a ! b").tokenize(),
            Err(Error::Syntax { position: 2, .. })
        ));
    }
}
