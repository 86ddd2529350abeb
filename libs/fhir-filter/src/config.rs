//! Filter language configuration
//!
//! The compare-operator vocabulary is configuration rather than grammar: the
//! lexer only consults it to decide whether a word in operator position is a
//! `CompareOp` token.

use phf::phf_ordered_set;
use serde::{Deserialize, Serialize};

/// Compare operators of the FHIR `_filter` parameter
pub static DEFAULT_COMPARE_OPERATORS: phf::OrderedSet<&'static str> = phf_ordered_set! {
    "eq", "ne", "co", "sw", "ew", "gt", "lt", "ge", "le", "ap",
    "sa", "eb", "pr", "po", "ss", "sb", "in", "ni", "re",
};

/// Default nesting limit for `(...)`, `not(...)` and `[...]`
pub const DEFAULT_MAX_DEPTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Words recognized as compare operators after a parameter path
    pub compare_operators: Vec<String>,
    /// Parameter names considered personally identifying
    pub identifying_fields: Vec<String>,
    /// Maximum nesting depth accepted by the parser
    pub max_depth: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            compare_operators: DEFAULT_COMPARE_OPERATORS
                .iter()
                .map(|op| op.to_string())
                .collect(),
            identifying_fields: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FilterConfig {
    pub fn is_compare_operator(&self, word: &str) -> bool {
        self.compare_operators.iter().any(|op| op == word)
    }

    pub fn with_identifying_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifying_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}
