//! FHIR-style filter expressions: parsing and parameter extraction
//!
//! Filters are small boolean queries over search parameters:
//!
//! ```text
//! item.linkId eq F_MATER_001101 and (item.answer.valueInteger lt 28 or item.answer.valueInteger gt 26)
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! Filter String
//!      |
//!   Lexer -> Tokens
//!      |
//!   Parser -> AST (or None)
//!      |
//!   Extraction -> [{param, values: [{operator?, value}]}]
//! ```
//!
//! Parse failure is a value: [`parse_filter`] returns `None` and
//! [`extract_filter_params`] returns `None`, never an empty list.
//!
//! # Example
//!
//! ```rust
//! use fhir_filter::{extract_filter_params, ExtractOptions};
//!
//! let filters = extract_filter_params(
//!     "item.linkId eq F_MATER_001101 and (item.answer.valueInteger lt 28 or item.answer.valueInteger gt 26)",
//!     &ExtractOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(filters.len(), 2);
//! assert_eq!(filters[1].param, "item.answer.valueInteger");
//! assert_eq!(filters[1].values.len(), 2);
//!
//! assert!(extract_filter_params("item.linkId eq eq F_MATER_001101", &ExtractOptions::default()).is_none());
//! ```

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod identifying;
mod lexer;
mod parser;
pub mod token;

// Re-export main types
pub use ast::Expression;
pub use config::FilterConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use extract::{ExtractOptions, FhirFilter, FhirFilterValue};
pub use identifying::has_identifying_fields;
pub use lexer::TokenStream;
pub use token::{Token, TokenType};

use std::sync::OnceLock;

static DEFAULT_ENGINE: OnceLock<Engine> = OnceLock::new();

fn default_engine() -> &'static Engine {
    DEFAULT_ENGINE.get_or_init(Engine::default)
}

/// Parse a filter string with the default operator vocabulary
pub fn parse_filter(input: &str) -> Option<Expression> {
    default_engine().parse(input)
}

/// Parse a filter string, keeping the recognition fault for diagnostics
pub fn try_parse_filter(input: &str) -> Result<Expression> {
    default_engine().try_parse(input)
}

/// Parse a filter string and extract its parameter constraints
pub fn extract_filter_params(input: &str, options: &ExtractOptions) -> Option<Vec<FhirFilter>> {
    default_engine().extract(input, options)
}
