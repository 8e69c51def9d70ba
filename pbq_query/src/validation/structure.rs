//! Token list well-formedness
//!
//! A token list is well-formed when it neither starts nor ends with an
//! operator, has no two adjacent operators, and its parenthesis tokens keep a
//! non-negative running balance that ends at zero.

use super::types::StructureViolation;
use crate::tokens::Token;

/// Report every well-formedness violation in `tokens`, in token order
pub fn check_structure(tokens: &[Token]) -> Vec<StructureViolation> {
    let mut violations = Vec::new();

    if let Some(first) = tokens.first().filter(|t| t.is_operator()) {
        violations.push(StructureViolation::LeadingOperator {
            operator: first.value.clone(),
            span: first.span,
        });
    }

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 && token.is_operator() && tokens[index - 1].is_operator() {
            violations.push(StructureViolation::ConsecutiveOperators {
                index,
                first: tokens[index - 1].value.clone(),
                second: token.value.clone(),
                span: token.span,
            });
        }

        if token.is_open_group() {
            depth += 1;
        } else if token.is_close_group() {
            if depth == 0 {
                violations.push(StructureViolation::UnmatchedClosingGroup {
                    index,
                    span: token.span,
                });
            } else {
                depth -= 1;
            }
        }
    }

    // A lone operator is reported once, as leading
    if tokens.len() > 1 {
        if let Some(last) = tokens.last().filter(|t| t.is_operator()) {
            violations.push(StructureViolation::TrailingOperator {
                operator: last.value.clone(),
                span: last.span,
            });
        }
    }

    if depth > 0 {
        violations.push(StructureViolation::UnclosedGroups { count: depth });
    }

    violations
}

pub fn is_well_formed(tokens: &[Token]) -> bool {
    check_structure(tokens).is_empty()
}
