//! Filter engine
//!
//! Orchestrates the pipeline: Lex → Parse → AST → (optional) Extraction.
//! The engine only holds immutable configuration, so one instance can be
//! shared freely between threads; every call builds its own tokens and tree.

use crate::ast::Expression;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::extract::{self, ExtractOptions, FhirFilter};
use crate::identifying;
use crate::lexer::{self, TokenStream};
use crate::parser::Parser;

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: FilterConfig,
}

impl Engine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Tokenize a filter string
    pub fn tokenize(&self, input: &str) -> TokenStream {
        lexer::tokenize(input, &self.config)
    }

    /// Parse a filter string, keeping the recognition fault
    pub fn try_parse(&self, input: &str) -> Result<Expression> {
        let tokens = self.tokenize(input);
        tracing::trace!(tokens = tokens.len(), "Tokenized filter");
        Parser::new(tokens)
            .with_max_depth(self.config.max_depth)
            .parse()
    }

    /// Parse a filter string
    ///
    /// Returns `None` for any lexical or grammatical fault; the fault is
    /// logged at debug level.
    pub fn parse(&self, input: &str) -> Option<Expression> {
        match self.try_parse(input) {
            Ok(expr) => Some(expr),
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    position = ?err.position(),
                    filter = input,
                    "Rejected filter expression"
                );
                None
            }
        }
    }

    /// Parse a filter string and extract its parameter constraints
    ///
    /// `None` means the filter did not parse. A filter that parses always
    /// yields at least one entry.
    pub fn extract(&self, input: &str, options: &ExtractOptions) -> Option<Vec<FhirFilter>> {
        let expr = self.parse(input)?;
        let filters = extract::extract(&expr, options);
        tracing::trace!(params = filters.len(), "Extracted filter parameters");
        Some(filters)
    }

    /// Whether a serialized `key=value&...` query names an identifying field
    pub fn is_identifying(&self, query: &str) -> bool {
        identifying::has_identifying_fields(query, &self.config.identifying_fields)
    }
}
