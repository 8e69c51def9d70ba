//! Lexical analysis of boolean search queries
//!
//! `tokenize` is total: every input, however malformed, produces a token
//! list covering all of its non-whitespace characters.

pub mod analyzer;
pub mod rules;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::{Token, TokenStream};

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};
pub use rules::{LexRule, RULE_ORDER};

/// Tokenize a query into a plain token list
pub fn tokenize(query: &str) -> Vec<Token> {
    tokenize_stream(query).into_tokens()
}

/// Tokenize a query, keeping the source map for diagnostics
pub fn tokenize_stream(query: &str) -> TokenStream {
    LexicalAnalyzer::new().tokenize(query)
}

pub fn tokenize_with_preferences(query: &str, preferences: LexicalPreferences) -> TokenStream {
    LexicalAnalyzer::with_preferences(preferences).tokenize(query)
}

pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}
