//! Identifying-field classifier
//!
//! Works on an already serialized `key=value&key=value` criteria string, not
//! on the filter AST.

/// Whether any key of `query` is one of `identifying_fields`
///
/// The query is split on `&`, and each part on its first `=`; a part without
/// `=` is all key. Keys are compared exactly.
pub fn has_identifying_fields<S: AsRef<str>>(query: &str, identifying_fields: &[S]) -> bool {
    query
        .split('&')
        .map(|pair| pair.split_once('=').map_or(pair, |(key, _)| key))
        .any(|key| identifying_fields.iter().any(|field| field.as_ref() == key))
}
