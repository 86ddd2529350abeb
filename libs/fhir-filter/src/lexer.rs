//! Filter lexer - tokenizes filter strings
//!
//! Converts filter expression strings into a stream of tokens. The lexer
//! never fails: characters it cannot place produce an `Error` token that the
//! parser rejects.
//!
//! Lexing is modal. A word directly after a parameter path is checked
//! against the configured compare-operator vocabulary, and whatever follows
//! a compare operator is read as a single value chunk (a quoted string, or
//! everything up to whitespace, `)` or `]`). This is what lets values such as
//! `http://loinc.org|1234-5` or `2021-03-01T10:00:00Z` reach the parser as
//! one token even though they contain `:` and `.`.

use crate::config::FilterConfig;
use crate::token::{Token, TokenType};

/// Tokens of one filter string, terminated by `Eof` or `Error`
pub type TokenStream = Vec<Token>;

const HAS_PREFIX: &str = "_has:";

/// Tokenize the whole input
pub fn tokenize(input: &str, config: &FilterConfig) -> TokenStream {
    let mut lexer = Lexer::new(input, config);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_terminal = token.is_terminal();
        tokens.push(token);
        if is_terminal {
            break;
        }
    }
    tokens
}

/// The filter lexer
pub struct Lexer<'a> {
    config: &'a FilterConfig,
    position: usize,
    chars: Vec<char>,
    current_char: Option<char>,
    previous: Option<TokenType>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &str, config: &'a FilterConfig) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            config,
            position: 0,
            chars,
            current_char,
            previous: None,
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        prefix
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.position + i) == Some(&c))
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.position].iter().collect()
    }

    /// A word right after a parameter path may be a compare operator
    fn in_operator_position(&self) -> bool {
        matches!(
            self.previous,
            Some(TokenType::ParamName | TokenType::CloseBracket)
        )
    }

    /// Read a parameter name: [A-Za-z_][A-Za-z0-9_-]*
    fn read_identifier(&mut self) -> String {
        let start = self.position;

        while let Some(c) = self.current_char {
            if is_name_char(c) {
                self.advance();
            } else {
                break;
            }
        }

        self.text_from(start)
    }

    /// Read a double-quoted string, keeping quotes and escapes verbatim
    fn read_string(&mut self) -> Result<String, String> {
        let start = self.position;
        self.advance(); // Skip opening quote

        while let Some(c) = self.current_char {
            match c {
                '\\' => {
                    self.advance(); // Skip backslash
                    if self.current_char.is_none() {
                        return Err("Incomplete escape sequence in string literal".into());
                    }
                    self.advance();
                }
                '"' => {
                    self.advance(); // Skip closing quote
                    return Ok(self.text_from(start));
                }
                _ => self.advance(),
            }
        }

        Err("Unterminated string literal".into())
    }

    /// Read digits with an optional fractional part
    fn read_number(&mut self) -> String {
        let start = self.position;

        while let Some(c) = self.current_char {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        // Only consume the dot when digits follow; otherwise it is a path separator
        if self.current_char == Some('.') && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // Skip '.'
            while let Some(c) = self.current_char {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.text_from(start)
    }

    /// Read the right-hand side of a comparison
    fn read_value(&mut self, position: usize) -> Token {
        if self.current_char == Some('"') {
            return match self.read_string() {
                Ok(value) => Token::new(TokenType::StringLiteral, value, position),
                Err(message) => Token::error(message, position),
            };
        }

        while let Some(c) = self.current_char {
            if c.is_whitespace() || c == ')' || c == ']' {
                break;
            }
            self.advance();
        }

        let value = self.text_from(position);
        let token_type = match keyword(&value) {
            Some(keyword) => keyword,
            None if is_number_or_date(&value) => TokenType::NumberOrDate,
            None if is_name(&value) => TokenType::ParamName,
            None => TokenType::TokenLiteral,
        };
        Token::new(token_type, value, position)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let position = self.position;
        let Some(c) = self.current_char else {
            return Token::eof(position);
        };

        let token = if self.previous == Some(TokenType::CompareOp) && c != ')' && c != ']' {
            self.read_value(position)
        } else {
            self.read_structural(c, position)
        };

        self.previous = Some(token.token_type);
        token
    }

    fn read_structural(&mut self, c: char, position: usize) -> Token {
        let single = match c {
            ':' => Some(TokenType::Colon),
            '[' => Some(TokenType::OpenBracket),
            ']' => Some(TokenType::CloseBracket),
            '.' => Some(TokenType::Dot),
            '(' => Some(TokenType::OpenParen),
            ')' => Some(TokenType::CloseParen),
            _ => None,
        };
        if let Some(token_type) = single {
            self.advance();
            return Token::new(token_type, c.to_string(), position);
        }

        if c == '_' && self.starts_with(HAS_PREFIX) {
            for _ in 0..HAS_PREFIX.len() {
                self.advance();
            }
            return Token::new(TokenType::Has, HAS_PREFIX, position);
        }

        if is_name_start(c) {
            let ident = self.read_identifier();
            let token_type = match keyword(&ident) {
                Some(keyword) => keyword,
                None if self.in_operator_position() && self.config.is_compare_operator(&ident) => {
                    TokenType::CompareOp
                }
                None => TokenType::ParamName,
            };
            return Token::new(token_type, ident, position);
        }

        if c.is_ascii_digit() {
            let number = self.read_number();
            return Token::new(TokenType::NumberOrDate, number, position);
        }

        if c == '"' {
            return match self.read_string() {
                Ok(value) => Token::new(TokenType::StringLiteral, value, position),
                Err(message) => Token::error(message, position),
            };
        }

        Token::error(format!("Unexpected character: {}", c), position)
    }
}

fn keyword(word: &str) -> Option<TokenType> {
    match word {
        "and" => Some(TokenType::And),
        "or" => Some(TokenType::Or),
        "not" => Some(TokenType::Not),
        _ => None,
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_name_start) && chars.all(is_name_char)
}

fn all_digits(text: &str, len: Option<usize>) -> bool {
    !text.is_empty()
        && len.map_or(true, |len| text.len() == len)
        && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_number(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    match unsigned.split_once('.') {
        Some((int, frac)) => all_digits(int, None) && all_digits(frac, None),
        None => all_digits(unsigned, None),
    }
}

/// YYYY(-MM(-DD)?)?
fn is_date(text: &str) -> bool {
    let mut parts = text.split('-');
    let Some(year) = parts.next() else {
        return false;
    };
    let rest: Vec<&str> = parts.collect();
    all_digits(year, Some(4)) && rest.len() <= 2 && rest.iter().all(|p| all_digits(p, Some(2)))
}

/// HH:MM(:SS(.fff)?)? followed by an optional Z or +/-HH:MM offset
fn is_time(text: &str) -> bool {
    let local = if let Some(stripped) = text.strip_suffix('Z') {
        stripped
    } else if let Some(idx) = text.rfind(|c| c == '+' || c == '-') {
        let offset = &text[idx + 1..];
        match offset.split_once(':') {
            Some((h, m)) if all_digits(h, Some(2)) && all_digits(m, Some(2)) => &text[..idx],
            _ => return false,
        }
    } else {
        text
    };

    let (clock, fraction) = match local.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (local, None),
    };
    let fields: Vec<&str> = clock.split(':').collect();
    (2..=3).contains(&fields.len())
        && fields.iter().all(|f| all_digits(f, Some(2)))
        && fraction.map_or(true, |f| fields.len() == 3 && all_digits(f, None))
}

fn is_number_or_date(text: &str) -> bool {
    if is_number(text) {
        return true;
    }
    match text.split_once('T') {
        Some((date, time)) => date.len() == 10 && is_date(date) && is_time(time),
        None => is_date(text),
    }
}
