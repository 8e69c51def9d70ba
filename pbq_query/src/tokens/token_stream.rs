//! Token list with its source text
//!
//! `TokenStream` is what the lexical analyzer hands out: the tokens plus a
//! source map of the query they came from, so structure violations can be
//! rendered against the original text.

use super::serialize::serialize;
use super::token::{Token, TokenId, TokenKind};
use crate::utils::SourceMap;
use crate::validation::{check_structure, StructureViolation};
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    source_map: Option<SourceMap>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            source_map: None,
        }
    }

    pub fn with_source_map(tokens: Vec<Token>, source_map: SourceMap) -> Self {
        Self {
            tokens,
            source_map: Some(source_map),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn source_map(&self) -> Option<&SourceMap> {
        self.source_map.as_ref()
    }

    /// Id to assign to the next token appended to this list
    pub fn next_id(&self) -> TokenId {
        next_token_id(&self.tokens)
    }

    pub fn count_kind(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|t| t.kind == kind).count()
    }

    pub fn check_structure(&self) -> Vec<StructureViolation> {
        check_structure(&self.tokens)
    }

    pub fn is_well_formed(&self) -> bool {
        self.check_structure().is_empty()
    }

    /// Render each structure violation, underlined in the source when the
    /// stream was produced from query text
    pub fn describe_violations(&self) -> Vec<String> {
        self.check_structure()
            .iter()
            .map(|violation| match (&self.source_map, violation.span()) {
                (Some(map), Some(span)) => map.format_message(&span, &violation.to_string()),
                _ => violation.to_string(),
            })
            .collect()
    }
}

/// `max(id) + 1`, or `0` for an empty list
pub fn next_token_id(tokens: &[Token]) -> TokenId {
    tokens
        .iter()
        .map(|t| t.id)
        .max()
        .map(TokenId::next)
        .unwrap_or_default()
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(&self.tokens))
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
