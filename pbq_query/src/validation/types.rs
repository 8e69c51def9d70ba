//! Validation result types

use super::error::QueryWarning;
use crate::logging::{codes, Code};
use crate::utils::Span;
use thiserror::Error;

/// Result of `validate_query`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<QueryWarning>,
}

impl ValidationReport {
    pub fn from_warnings(warnings: Vec<QueryWarning>) -> Self {
        Self {
            is_valid: warnings.is_empty(),
            warnings,
        }
    }

    /// Warning messages in detection order
    pub fn messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// A break of token list well-formedness
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureViolation {
    #[error("Query starts with operator {operator}")]
    LeadingOperator { operator: String, span: Span },

    #[error("Query ends with operator {operator}")]
    TrailingOperator { operator: String, span: Span },

    #[error("Operators {first} and {second} are adjacent (token {index})")]
    ConsecutiveOperators {
        index: usize,
        first: String,
        second: String,
        span: Span,
    },

    #[error("Closing parenthesis without an opening one (token {index})")]
    UnmatchedClosingGroup { index: usize, span: Span },

    #[error("{count} parenthesis group(s) left open")]
    UnclosedGroups { count: usize },
}

impl StructureViolation {
    pub fn error_code(&self) -> Code {
        match self {
            StructureViolation::LeadingOperator { .. } => codes::structure::LEADING_OPERATOR,
            StructureViolation::TrailingOperator { .. } => codes::structure::TRAILING_OPERATOR,
            StructureViolation::ConsecutiveOperators { .. } => {
                codes::structure::CONSECUTIVE_OPERATORS
            }
            StructureViolation::UnmatchedClosingGroup { .. } => {
                codes::structure::UNMATCHED_CLOSING_GROUP
            }
            StructureViolation::UnclosedGroups { .. } => codes::structure::UNCLOSED_GROUP,
        }
    }

    /// Source span of the offending token, when there is one
    pub fn span(&self) -> Option<Span> {
        match self {
            StructureViolation::LeadingOperator { span, .. }
            | StructureViolation::TrailingOperator { span, .. }
            | StructureViolation::ConsecutiveOperators { span, .. }
            | StructureViolation::UnmatchedClosingGroup { span, .. } => Some(*span),
            StructureViolation::UnclosedGroups { .. } => None,
        }
    }
}
