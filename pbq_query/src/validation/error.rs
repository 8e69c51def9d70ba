//! Advisory warnings about query text

use crate::logging::{codes, Code};
use crate::utils::Span;
use thiserror::Error;

/// A problem in a query that would likely make it fail or misbehave when run.
///
/// Warnings never block an operation; they are surfaced for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryWarning {
    #[error("Missing {count} closing parenthes{}", plural_es(.count))]
    MissingClosingParenthesis { count: usize },

    #[error("Missing {count} opening parenthes{}", plural_es(.count))]
    MissingOpeningParenthesis { count: usize },

    #[error("Empty quoted term before a field qualifier at byte {offset}")]
    EmptyQuotedTerm { offset: usize },

    #[error("Missing operator between {left} and {right}")]
    MissingOperator {
        left: String,
        right: String,
        span: Span,
    },
}

fn plural_es(count: &usize) -> &'static str {
    if *count == 1 {
        "is"
    } else {
        "es"
    }
}

impl QueryWarning {
    pub fn error_code(&self) -> Code {
        match self {
            QueryWarning::MissingClosingParenthesis { .. } => {
                codes::validation::MISSING_CLOSING_PARENTHESIS
            }
            QueryWarning::MissingOpeningParenthesis { .. } => {
                codes::validation::MISSING_OPENING_PARENTHESIS
            }
            QueryWarning::EmptyQuotedTerm { .. } => codes::validation::EMPTY_QUOTED_TERM,
            QueryWarning::MissingOperator { .. } => codes::validation::MISSING_OPERATOR,
        }
    }

    pub fn missing_operator(left: &str, right: &str, span: Span) -> Self {
        Self::MissingOperator {
            left: left.to_string(),
            right: right.to_string(),
            span,
        }
    }
}
