//! Token list to query string

use super::Token;

/// Join each token's original surface text with single spaces.
///
/// Spacing of the source query is not preserved, so the output is the
/// whitespace-normalized form of the query. Serializing, re-tokenizing and
/// serializing again yields the same string.
pub fn serialize(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.original.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
