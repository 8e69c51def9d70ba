//! Structural edits on token lists
//!
//! Both operations return a new list and keep a well-formed list free of
//! dangling or doubled operators. Parenthesis groups are never rebalanced.

use crate::logging::codes;
use crate::tokens::{next_token_id, BooleanOperator, Token, TokenKind};
use crate::{log_success, log_warning};

/// Append a term joined with the default operator (`OR`)
pub fn add_term(tokens: &[Token], value: &str, kind: TokenKind) -> Vec<Token> {
    add_term_with_operator(tokens, value, kind, BooleanOperator::default())
}

/// Append a term in canonical quoted form.
///
/// An operator is inserted first unless the list is empty or already ends
/// with an operator or an opening parenthesis. A value that is empty once
/// quotes and whitespace are removed leaves the list unchanged.
pub fn add_term_with_operator(
    tokens: &[Token],
    value: &str,
    kind: TokenKind,
    operator: BooleanOperator,
) -> Vec<Token> {
    if Token::canonical_value(value).is_empty() {
        log_warning!(
            codes::validation::EMPTY_QUOTED_TERM,
            "Blank term not added",
            "value" => value
        );
        return tokens.to_vec();
    }

    let mut result = tokens.to_vec();
    let mut next_id = next_token_id(tokens);

    let needs_operator = result
        .last()
        .is_some_and(|last| !last.is_operator() && !last.is_open_group());

    if needs_operator {
        result.push(Token::operator(next_id, operator));
        next_id = next_id.next();
    }

    result.push(Token::canonical_term(next_id, value, kind));

    log_success!(
        codes::success::TERM_ADDED,
        "Term added to query",
        "kind" => kind,
        "joined_with" => if needs_operator { operator.as_str() } else { "-" },
        "tokens" => result.len()
    );

    result
}

/// Remove the token at `index` and repair operators around the gap.
///
/// Leading and trailing operators are stripped repeatedly, then each
/// remaining pair of adjacent operators loses its second member. An index
/// past the end returns an unchanged copy.
pub fn remove_term(tokens: &[Token], index: usize) -> Vec<Token> {
    if index >= tokens.len() {
        return tokens.to_vec();
    }

    let mut result = tokens.to_vec();
    let removed = result.remove(index);

    while result.first().is_some_and(Token::is_operator) {
        result.remove(0);
    }
    while result.last().is_some_and(Token::is_operator) {
        result.pop();
    }

    let mut i = 1;
    while i < result.len() {
        if result[i].is_operator() && result[i - 1].is_operator() {
            result.remove(i);
        } else {
            i += 1;
        }
    }

    log_success!(
        codes::success::TERM_REMOVED,
        "Term removed from query",
        "removed" => removed.original,
        "tokens" => result.len()
    );

    result
}
