//! Token types for boolean search queries
//!
//! A token keeps both its semantic payload (`value`) and the exact surface
//! text it was produced from (`original`), so a token list can always be
//! re-emitted as a query string.

use crate::config::compile_time::qualifiers::{
    CANONICAL_MESH_QUALIFIER, CANONICAL_TEXT_QUALIFIER, FILTER_QUALIFIERS, MESH_QUALIFIERS,
    TEXT_QUALIFIERS,
};
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a token, unique within one token list
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenId(pub u32);

impl TokenId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Controlled-vocabulary (MeSH) term
    Mesh,
    /// Free-text term, tagged or untagged
    Text,
    /// AND / OR / NOT
    Operator,
    /// Author, language, date, publication type or subset restriction
    Filter,
    /// `(` or `)`
    Group,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Mesh => "mesh",
            TokenKind::Text => "text",
            TokenKind::Operator => "operator",
            TokenKind::Filter => "filter",
            TokenKind::Group => "group",
        }
    }

    /// Kinds that carry a search term
    pub fn is_term(&self) -> bool {
        matches!(self, TokenKind::Mesh | TokenKind::Text | TokenKind::Filter)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown token kind '{0}' (expected mesh, text, operator, filter or group)")]
pub struct UnknownTokenKind(pub String);

impl FromStr for TokenKind {
    type Err = UnknownTokenKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mesh" => Ok(TokenKind::Mesh),
            "text" => Ok(TokenKind::Text),
            "operator" => Ok(TokenKind::Operator),
            "filter" => Ok(TokenKind::Filter),
            "group" => Ok(TokenKind::Group),
            _ => Err(UnknownTokenKind(s.to_string())),
        }
    }
}

/// Boolean operator keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BooleanOperator {
    And,
    Or,
    Not,
}

impl BooleanOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
            BooleanOperator::Not => "NOT",
        }
    }
}

impl Default for BooleanOperator {
    fn default() -> Self {
        crate::config::compile_time::mutation::DEFAULT_JOIN_OPERATOR
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown boolean operator '{0}' (expected AND, OR or NOT)")]
pub struct UnknownOperator(pub String);

impl FromStr for BooleanOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(BooleanOperator::And),
            "OR" => Ok(BooleanOperator::Or),
            "NOT" => Ok(BooleanOperator::Not),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

/// Map a field qualifier to the kind of token it produces.
///
/// Accepts the qualifier with or without brackets; matching is
/// case-insensitive and ignores surrounding whitespace. Qualifiers outside
/// the known tables search free text.
pub fn classify_qualifier(qualifier: &str) -> TokenKind {
    let normalized = normalize_qualifier(qualifier);

    if MESH_QUALIFIERS.contains(&normalized.as_str()) {
        TokenKind::Mesh
    } else if FILTER_QUALIFIERS.contains(&normalized.as_str()) {
        TokenKind::Filter
    } else {
        TokenKind::Text
    }
}

/// Whether the qualifier appears in any of the known qualifier tables
pub fn is_known_qualifier(qualifier: &str) -> bool {
    let normalized = normalize_qualifier(qualifier);
    [MESH_QUALIFIERS, TEXT_QUALIFIERS, FILTER_QUALIFIERS]
        .iter()
        .any(|table| table.contains(&normalized.as_str()))
}

fn normalize_qualifier(qualifier: &str) -> String {
    qualifier
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_lowercase()
}

/// A single query token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    /// Bare term, uppercase operator keyword, or parenthesis
    pub value: String,
    pub kind: TokenKind,
    /// Field qualifier as written, brackets included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Exact substring that produced this token
    pub original: String,
    #[serde(default)]
    pub span: Span,
}

impl Token {
    pub fn new(
        id: TokenId,
        value: impl Into<String>,
        kind: TokenKind,
        tag: Option<String>,
        original: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            id,
            value: value.into(),
            kind,
            tag,
            original: original.into(),
            span,
        }
    }

    /// Operator token created outside the tokenizer
    pub fn operator(id: TokenId, operator: BooleanOperator) -> Self {
        Self::new(
            id,
            operator.as_str(),
            TokenKind::Operator,
            None,
            operator.as_str(),
            Span::dummy(),
        )
    }

    /// The value as written between the canonical quotes: embedded double
    /// quotes removed, surrounding whitespace trimmed.
    pub fn canonical_value(value: &str) -> String {
        value.replace('"', "").trim().to_string()
    }

    /// Term token in canonical quoted form.
    ///
    /// `Mesh` terms get the controlled-vocabulary qualifier; every other kind
    /// is written as a title/abstract term and typed accordingly. The value
    /// goes through `canonical_value` first.
    pub fn canonical_term(id: TokenId, value: &str, kind: TokenKind) -> Self {
        let value = Self::canonical_value(value);
        let (tag, kind) = match kind {
            TokenKind::Mesh => (CANONICAL_MESH_QUALIFIER, TokenKind::Mesh),
            _ => (CANONICAL_TEXT_QUALIFIER, TokenKind::Text),
        };
        let original = format!("\"{}\"{}", value, tag);

        Self::new(id, value, kind, Some(tag.to_string()), original, Span::dummy())
    }

    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }

    pub fn is_open_group(&self) -> bool {
        self.kind == TokenKind::Group && self.value == "("
    }

    pub fn is_close_group(&self) -> bool {
        self.kind == TokenKind::Group && self.value == ")"
    }

    /// Whether the token carries a bracketed field qualifier
    pub fn is_tagged(&self) -> bool {
        self.tag.is_some()
    }

    /// The `(kind, value, tag)` triple, which survives re-tokenization
    pub fn signature(&self) -> (TokenKind, &str, Option<&str>) {
        (self.kind, self.value.as_str(), self.tag.as_deref())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_classify_qualifier_tables() {
        assert_eq!(classify_qualifier("[Mesh]"), TokenKind::Mesh);
        assert_eq!(classify_qualifier("[MeSH Terms]"), TokenKind::Mesh);
        assert_eq!(classify_qualifier("mh:noexp"), TokenKind::Mesh);
        assert_eq!(classify_qualifier("[tiab]"), TokenKind::Text);
        assert_eq!(classify_qualifier("[Title/Abstract]"), TokenKind::Text);
        assert_eq!(classify_qualifier("[ la ]"), TokenKind::Filter);
        assert_eq!(classify_qualifier("[pt]"), TokenKind::Filter);
        assert_eq!(classify_qualifier("[Author]"), TokenKind::Filter);
    }

    #[test]
    fn test_unknown_qualifier_is_text() {
        assert_eq!(classify_qualifier("[nm]"), TokenKind::Text);
        assert_eq!(classify_qualifier(""), TokenKind::Text);
        assert!(!is_known_qualifier("[nm]"));
        assert!(is_known_qualifier("[TIAB]"));
    }

    #[test]
    fn test_canonical_term_forms() {
        let mesh = Token::canonical_term(TokenId(0), "metformin", TokenKind::Mesh);
        assert_eq!(mesh.original, "\"metformin\"[Mesh]");
        assert_eq!(mesh.tag.as_deref(), Some("[Mesh]"));
        assert_eq!(mesh.kind, TokenKind::Mesh);

        let filter = Token::canonical_term(TokenId(1), "english", TokenKind::Filter);
        assert_eq!(filter.original, "\"english\"[tiab]");
        assert_eq!(filter.kind, TokenKind::Text);
    }

    #[test]
    fn test_canonical_term_strips_quotes_and_whitespace() {
        let term = Token::canonical_term(TokenId(0), "  type \"2\" diabetes ", TokenKind::Text);
        assert_eq!(term.value, "type 2 diabetes");
        assert_eq!(term.original, "\"type 2 diabetes\"[tiab]");

        assert_eq!(Token::canonical_value(" \"\" "), "");
    }

    #[test]
    fn test_operator_parsing() {
        assert_eq!("and".parse::<BooleanOperator>(), Ok(BooleanOperator::And));
        assert_eq!(" Not ".parse::<BooleanOperator>(), Ok(BooleanOperator::Not));
        assert_matches!("XOR".parse::<BooleanOperator>(), Err(UnknownOperator(op)) if op == "XOR");
        assert_eq!(BooleanOperator::default(), BooleanOperator::Or);
    }

    #[test]
    fn test_token_kind_serde_names() {
        let json = serde_json::to_string(&TokenKind::Operator).unwrap();
        assert_eq!(json, "\"operator\"");
        assert_matches!("MESH".parse::<TokenKind>(), Ok(TokenKind::Mesh));
        assert_matches!("chip".parse::<TokenKind>(), Err(_));
    }
}
