//! Query validation
//!
//! `validate_query` scans query text for problems a user should see before
//! running the search. `check_structure` verifies token list invariants.
//! Both are advisory and never modify their input.

pub mod error;
pub mod structure;
pub mod types;

pub use error::QueryWarning;
pub use structure::{check_structure, is_well_formed};
pub use types::{StructureViolation, ValidationReport};

use crate::lexical::tokenize;
use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_success};

/// Check parenthesis balance, empty quoted terms and missing operators
pub fn validate_query(query: &str) -> ValidationReport {
    let mut warnings = Vec::new();

    check_parentheses(query, &mut warnings);
    check_empty_quoted_terms(query, &mut warnings);
    check_missing_operators(&tokenize(query), &mut warnings);

    for warning in &warnings {
        log_debug!("Query warning",
            "code" => warning.error_code(),
            "warning" => warning
        );
    }

    log_success!(
        codes::success::VALIDATION_COMPLETE,
        "Query validation completed",
        "warnings" => warnings.len()
    );

    ValidationReport::from_warnings(warnings)
}

/// Parentheses inside double quotes are part of a phrase and not counted
fn check_parentheses(query: &str, warnings: &mut Vec<QueryWarning>) {
    let mut in_quotes = false;
    let mut open = 0usize;
    let mut unmatched_closing = 0usize;

    for ch in query.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => open += 1,
            ')' if !in_quotes => {
                if open == 0 {
                    unmatched_closing += 1;
                } else {
                    open -= 1;
                }
            }
            _ => {}
        }
    }

    if open > 0 {
        warnings.push(QueryWarning::MissingClosingParenthesis { count: open });
    }
    if unmatched_closing > 0 {
        warnings.push(QueryWarning::MissingOpeningParenthesis {
            count: unmatched_closing,
        });
    }
}

fn check_empty_quoted_terms(query: &str, warnings: &mut Vec<QueryWarning>) {
    for (offset, _) in query.match_indices("\"\"[") {
        warnings.push(QueryWarning::EmptyQuotedTerm { offset });
    }
}

/// Two qualified terms with only parentheses between them
fn check_missing_operators(tokens: &[Token], warnings: &mut Vec<QueryWarning>) {
    let mut previous_term: Option<&Token> = None;

    for token in tokens {
        if token.is_operator() {
            previous_term = None;
        } else if token.is_tagged() {
            if let Some(left) = previous_term {
                warnings.push(QueryWarning::missing_operator(
                    &left.original,
                    &token.original,
                    left.span.merge(token.span),
                ));
            }
            previous_term = Some(token);
        } else if token.kind.is_term() {
            previous_term = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_clean_query_is_valid() {
        let report = validate_query("\"diabetes\"[tiab] AND \"insulin\"[Mesh]");
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_lone_open_parenthesis() {
        let report = validate_query("(");
        assert!(!report.is_valid);
        assert_eq!(
            report.warnings,
            vec![QueryWarning::MissingClosingParenthesis { count: 1 }]
        );
    }

    #[test]
    fn test_missing_opening_parenthesis_counted() {
        let report = validate_query("a) OR b))");
        assert_eq!(
            report.warnings,
            vec![QueryWarning::MissingOpeningParenthesis { count: 3 }]
        );
    }

    #[test]
    fn test_parentheses_inside_quotes_ignored() {
        let report = validate_query("\"vitamin (D\"[tiab] AND x");
        assert!(report.is_valid);
    }

    #[test]
    fn test_empty_quoted_term() {
        let report = validate_query("\"\"[tiab] OR a");
        assert_matches!(
            report.warnings.as_slice(),
            [QueryWarning::EmptyQuotedTerm { offset: 0 }]
        );
    }

    #[test]
    fn test_missing_operator_between_tagged_terms() {
        let report = validate_query("\"a\"[tiab] \"b\"[Mesh] OR c[tiab]");
        assert_eq!(report.warnings.len(), 1);
        assert_matches!(
            &report.warnings[0],
            QueryWarning::MissingOperator { left, right, .. }
                if left == "\"a\"[tiab]" && right == "\"b\"[Mesh]"
        );
    }

    #[test]
    fn test_missing_operator_across_groups() {
        let report = validate_query("(a[tiab]) (b[tiab])");
        assert_matches!(
            report.warnings.as_slice(),
            [QueryWarning::MissingOperator { .. }]
        );
    }

    #[test]
    fn test_untagged_term_between_resets() {
        let report = validate_query("a[tiab] plain b[tiab]");
        assert!(report.is_valid);
    }
}
