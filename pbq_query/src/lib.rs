//! Boolean search query toolkit
//!
//! Tokenizes PubMed-style boolean queries into typed, re-emittable tokens,
//! serializes them back, applies structural edits that keep the token list
//! well-formed, and validates query text.

pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod mutation;
pub mod tokens;
pub mod utils;
pub mod validation;

pub use lexical::{tokenize, tokenize_stream, LexicalAnalyzer};
pub use mutation::{add_term, add_term_with_operator, remove_term};
pub use tokens::{serialize, BooleanOperator, Token, TokenId, TokenKind, TokenStream};
pub use validation::{
    check_structure, validate_query, QueryWarning, StructureViolation, ValidationReport,
};
