//! Token system for boolean search queries
//!
//! - [`Token`] carries a semantic value, a [`TokenKind`], the optional field
//!   qualifier tag and the exact original text.
//! - [`serialize`] re-emits a token list as a query string.
//! - [`TokenStream`] pairs a token list with the source it was read from.

pub mod serialize;
pub mod token;
pub mod token_stream;

pub use serialize::serialize;
pub use token::{
    classify_qualifier, is_known_qualifier, BooleanOperator, Token, TokenId, TokenKind,
    UnknownOperator, UnknownTokenKind,
};
pub use token_stream::{next_token_id, TokenStream};
