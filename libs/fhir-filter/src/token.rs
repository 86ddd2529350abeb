//! Token types for the filter lexer
//!
//! Tokens represent the lexical elements of filter expressions.

use std::fmt;

/// Token types for the filter lexer
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum TokenType {
    // Keywords
    And,
    Or,
    Not,

    // Structural
    Has,          // _has:
    Colon,        // :
    OpenBracket,  // [
    CloseBracket, // ]
    Dot,          // .
    OpenParen,    // (
    CloseParen,   // )

    // Operators
    CompareOp, // eq, ne, gt, ...

    // Names and values
    ParamName,
    StringLiteral, // "..." (quotes retained)
    NumberOrDate,
    TokenLiteral, // system|code, urls, ...

    // End of input
    Eof,

    // Error
    Error, // For lexical errors
}

impl TokenType {
    /// Human readable name used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenType::And => "'and'",
            TokenType::Or => "'or'",
            TokenType::Not => "'not'",
            TokenType::Has => "'_has:'",
            TokenType::Colon => "':'",
            TokenType::OpenBracket => "'['",
            TokenType::CloseBracket => "']'",
            TokenType::Dot => "'.'",
            TokenType::OpenParen => "'('",
            TokenType::CloseParen => "')'",
            TokenType::CompareOp => "compare operator",
            TokenType::ParamName => "parameter name",
            TokenType::StringLiteral => "string",
            TokenType::NumberOrDate => "number or date",
            TokenType::TokenLiteral => "token",
            TokenType::Eof => "end of input",
            TokenType::Error => "invalid input",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token in the filter expression
///
/// `value` is the exact source text of the token, except for `Error`
/// tokens where it holds the lexer's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub position: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, position: usize) -> Self {
        Self {
            token_type,
            value: value.into(),
            position,
        }
    }

    pub fn eof(position: usize) -> Self {
        Self {
            token_type: TokenType::Eof,
            value: String::new(),
            position,
        }
    }

    pub fn error(message: String, position: usize) -> Self {
        Self {
            token_type: TokenType::Error,
            value: message,
            position,
        }
    }

    /// Whether this token ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self.token_type, TokenType::Eof | TokenType::Error)
    }
}
