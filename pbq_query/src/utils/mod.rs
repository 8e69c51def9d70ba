//! Shared primitive types used by the tokenizer, validator and mutators.

pub mod span;

pub use span::{Position, SourceMap, Span};
