//! Filter parser - converts token streams to AST
//!
//! Predictive recursive descent parser with one token of lookahead at each
//! choice point. Unlike most boolean languages there is no precedence
//! between `and` and `or`: a chain is parsed flat and left to right, and
//! parentheses are the only way to group.
//!
//! Any mismatch is a recognition fault. The parser never returns a partial
//! tree.

use crate::ast::*;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};
use crate::lexer::TokenStream;
use crate::token::{Token, TokenType};

/// Parser for filter expressions
pub struct Parser {
    tokens: TokenStream,
    index: usize,
    recursion_depth: usize,
    max_depth: usize,
}

impl Parser {
    /// Create a new parser over a token stream produced by [`crate::lexer::tokenize`]
    pub fn new(tokens: TokenStream) -> Self {
        Self {
            tokens,
            index: 0,
            recursion_depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Get the current token
    ///
    /// The stream always ends with `Eof` or `Error`, and the parser never
    /// advances past such a token, so this only falls back for an empty
    /// stream.
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.index)
            .cloned()
            .unwrap_or_else(|| Token::eof(0))
    }

    fn current_type(&self) -> TokenType {
        self.tokens
            .get(self.index)
            .map(|t| t.token_type)
            .unwrap_or(TokenType::Eof)
    }

    /// Check if current token matches the given type
    fn current_token_is(&self, token_type: TokenType) -> bool {
        self.current_type() == token_type
    }

    /// Check if current token is one of the given types
    fn current_token_is_one_of(&self, types: &[TokenType]) -> bool {
        types.contains(&self.current_type())
    }

    /// Consume the current token
    fn advance(&mut self) -> Token {
        let token = self.current_token();
        if !token.is_terminal() {
            self.index += 1;
        }
        token
    }

    /// Build the fault for an unexpected current token
    fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        match token.token_type {
            TokenType::Eof => Error::UnexpectedEof {
                expected: expected.to_string(),
            },
            TokenType::Error => Error::Lex {
                message: token.value,
                position: token.position,
            },
            _ => Error::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{} '{}'", token.token_type, token.value),
                position: token.position,
            },
        }
    }

    /// Expect a specific token type and advance
    fn expect(&mut self, token_type: TokenType) -> Result<Token> {
        if self.current_token_is(token_type) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(token_type.describe()))
        }
    }

    /// Parse the entire token stream (top-level entry point)
    pub fn parse(&mut self) -> Result<Expression> {
        let expr = self.parse_expression()?;

        // Ensure we've consumed all input
        if !self.current_token_is(TokenType::Eof) {
            return Err(self.unexpected("'and', 'or' or end of input"));
        }

        Ok(expr)
    }

    /// Check recursion depth and increment
    fn check_recursion_depth(&mut self) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > self.max_depth {
            return Err(Error::TooDeep {
                max: self.max_depth,
            });
        }
        Ok(())
    }

    /// Decrement recursion depth
    fn decrement_recursion_depth(&mut self) {
        self.recursion_depth -= 1;
    }

    /// expression: baseExpression | logicalExpression
    ///
    /// The first base expression becomes the head of the chain when an
    /// `and`/`or` follows it.
    fn parse_expression(&mut self) -> Result<Expression> {
        self.check_recursion_depth()?;
        let head = self.parse_base_expression()?;

        let expr = if self.current_token_is_one_of(&[TokenType::And, TokenType::Or]) {
            Expression::Logical(self.parse_logical_expression(head)?)
        } else {
            Expression::Base(head)
        };

        self.decrement_recursion_depth();
        Ok(expr)
    }

    /// logicalExpression: baseExpression (('and' | 'or') baseExpression)+
    fn parse_logical_expression(&mut self, head: BaseExpression) -> Result<LogicalExpression> {
        let mut rest = Vec::new();

        while self.current_token_is_one_of(&[TokenType::And, TokenType::Or]) {
            let connective = match self.advance().token_type {
                TokenType::And => Connective::And,
                _ => Connective::Or,
            };
            let right = self.parse_base_expression()?;
            rest.push((connective, right));
        }

        if rest.is_empty() {
            return Err(self.unexpected("'and' or 'or'"));
        }

        Ok(LogicalExpression { head, rest })
    }

    /// baseExpression: notExpression | baseFilter
    fn parse_base_expression(&mut self) -> Result<BaseExpression> {
        match self.current_type() {
            TokenType::Not => Ok(BaseExpression::Not(self.parse_not_expression()?)),
            TokenType::Has | TokenType::ParamName | TokenType::OpenParen => {
                Ok(BaseExpression::Filter(self.parse_base_filter()?))
            }
            _ => Err(self.unexpected("'not', '(', '_has:' or parameter name")),
        }
    }

    /// notExpression: 'not' groupExpression
    ///
    /// The operand must be parenthesized; `not a eq b` is rejected.
    fn parse_not_expression(&mut self) -> Result<NotExpression> {
        self.expect(TokenType::Not)?;
        let group = self.parse_group_expression()?;
        Ok(NotExpression { group })
    }

    /// baseFilter: paramExp | groupExpression
    fn parse_base_filter(&mut self) -> Result<BaseFilter> {
        match self.current_type() {
            TokenType::Has | TokenType::ParamName => Ok(BaseFilter::Param(self.parse_param_exp()?)),
            TokenType::OpenParen => Ok(BaseFilter::Group(self.parse_group_expression()?)),
            _ => Err(self.unexpected("'(', '_has:' or parameter name")),
        }
    }

    /// groupExpression: '(' expression ')'
    fn parse_group_expression(&mut self) -> Result<GroupExpression> {
        self.expect(TokenType::OpenParen)?;
        let expression = self.parse_expression()?;
        self.expect(TokenType::CloseParen)?;
        Ok(GroupExpression {
            expression: Box::new(expression),
        })
    }

    /// paramExp: paramValue COMPARE_OP compValue
    fn parse_param_exp(&mut self) -> Result<ParamExp> {
        let left = self.parse_param_value()?;
        let operator = CompareOp::new(self.expect(TokenType::CompareOp)?.value);
        let right = self.parse_comp_value()?;
        Ok(ParamExp {
            left,
            operator,
            right,
        })
    }

    /// compValue: NUMBER_OR_DATE | STRING | token
    fn parse_comp_value(&mut self) -> Result<CompValue> {
        match self.current_type() {
            TokenType::NumberOrDate => Ok(CompValue::NumberOrDate(self.advance().value)),
            TokenType::StringLiteral => Ok(CompValue::StringLiteral(self.advance().value)),
            TokenType::ParamName | TokenType::TokenLiteral => {
                Ok(CompValue::Token(self.advance().value))
            }
            _ => Err(self.unexpected("comparison value")),
        }
    }

    /// paramValue: hasSpecifier | paramPath
    fn parse_param_value(&mut self) -> Result<ParamValue> {
        if self.current_token_is(TokenType::Has) {
            Ok(ParamValue::Has(self.parse_has_specifier()?))
        } else {
            Ok(ParamValue::Path(self.parse_param_path()?))
        }
    }

    /// hasSpecifier: '_has:' resource ':' index ':' index
    fn parse_has_specifier(&mut self) -> Result<HasSpecifier> {
        self.expect(TokenType::Has)?;

        // resource: one or more name/number tokens, concatenated
        let mut resource = String::new();
        while self.current_token_is_one_of(&[TokenType::ParamName, TokenType::NumberOrDate]) {
            resource.push_str(&self.advance().value);
        }
        if resource.is_empty() {
            return Err(self.unexpected("resource type after '_has:'"));
        }

        self.expect(TokenType::Colon)?;
        let index_a = self.parse_has_index()?;
        self.expect(TokenType::Colon)?;
        let index_b = self.parse_has_index()?;

        Ok(HasSpecifier {
            resource,
            index_a,
            index_b,
        })
    }

    /// index: PARAM_NAME ('.' PARAM_NAME)*
    fn parse_has_index(&mut self) -> Result<String> {
        let mut index = self.expect(TokenType::ParamName)?.value;
        while self.current_token_is(TokenType::Dot) {
            self.advance(); // Skip '.'
            index.push('.');
            index.push_str(&self.expect(TokenType::ParamName)?.value);
        }
        Ok(index)
    }

    /// paramPath: PARAM_NAME ('[' expression ']')? ('.' paramValue)?
    ///
    /// Dotted continuations are read in a loop and linked back to front, so
    /// a long path is not nesting. Only bracket predicates re-enter
    /// `expression` and count towards the depth limit.
    fn parse_param_path(&mut self) -> Result<ParamPath> {
        let mut segments = Vec::new();
        let mut tail = None;

        loop {
            let name = self.expect(TokenType::ParamName)?.value;

            let index_expr = if self.current_token_is(TokenType::OpenBracket) {
                self.advance(); // Skip '['
                let expr = self.parse_expression()?;
                self.expect(TokenType::CloseBracket)?;
                Some(Box::new(expr))
            } else {
                None
            };
            segments.push((name, index_expr));

            if !self.current_token_is(TokenType::Dot) {
                break;
            }
            self.advance(); // Skip '.'

            if self.current_token_is(TokenType::Has) {
                tail = Some(ParamValue::Has(self.parse_has_specifier()?));
                break;
            }
        }

        let mut path: Option<ParamPath> = None;
        for (name, index_expr) in segments.into_iter().rev() {
            let child = match path.take() {
                Some(inner) => Some(Box::new(ParamValue::Path(inner))),
                None => tail.take().map(Box::new),
            };
            path = Some(ParamPath {
                name,
                index_expr,
                child,
            });
        }

        path.ok_or_else(|| self.unexpected("parameter name"))
    }
}
