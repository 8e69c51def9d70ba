//! String-level application of filter clauses to the query text
//!
//! Removal deletes the clause text by substring match, so it is best-effort
//! once the text has been edited by hand. Callers should re-run validation
//! on the result.

use super::catalog::FilterCatalog;
use crate::builder::BuilderState;
use crate::types::Filter;
use pbq_query::logging::codes;
use pbq_query::{log_success, log_warning};
use regex::Regex;
use std::sync::OnceLock;

const AND_PREFIX: &str = "AND ";

fn redundant_parens() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\(\(([^()]*)\)\)\s*$").expect("redundant parenthesis pattern is valid")
    })
}

fn strip_leading_and(text: &str) -> &str {
    let trimmed = text.trim_start();
    trimmed.strip_prefix(AND_PREFIX).unwrap_or(trimmed)
}

/// Append a filter clause; false if its label is already applied
pub fn add_filter(state: &mut BuilderState, filter: &Filter) -> bool {
    if state.has_filter(&filter.label) {
        return false;
    }

    state.current_query_text = if state.current_query_text.trim().is_empty() {
        strip_leading_and(&filter.query).to_string()
    } else {
        format!("{} {}", state.current_query_text, filter.query)
    };
    state.applied_filters.push(filter.label.clone());

    log_success!(
        codes::success::FILTER_APPLIED,
        "Filter applied",
        "label" => filter.label,
        "category" => filter.category.as_str()
    );
    true
}

/// Remove an applied filter's clause from the text.
///
/// Unknown labels and labels that are not applied leave the state untouched
/// and return false. A leading `AND ` left behind is stripped only when the
/// removed clause opened the text. When the clause text can no longer be
/// found the text is kept as is and the label is still dropped from the
/// applied list.
pub fn remove_filter(state: &mut BuilderState, label: &str, catalog: &FilterCatalog) -> bool {
    let Some(filter) = catalog.find(label) else {
        log_warning!(
            codes::builder::UNKNOWN_FILTER,
            "Cannot remove unknown filter",
            "label" => label
        );
        return false;
    };

    if !state.has_filter(label) {
        return false;
    }

    let candidates = [
        format!(" {}", filter.query),
        filter.query.clone(),
        strip_leading_and(&filter.query).to_string(),
    ];

    let text = &state.current_query_text;
    let found = candidates
        .iter()
        .filter(|fragment| !fragment.trim().is_empty())
        .find_map(|fragment| text.find(fragment.as_str()).map(|at| (at, fragment)));

    match found {
        Some((at, fragment)) => {
            let first_clause = text[..at].trim().is_empty();
            let mut patched = String::with_capacity(text.len());
            patched.push_str(&text[..at]);
            patched.push_str(&text[at + fragment.len()..]);

            let collapsed = redundant_parens().replace(&patched, "($1)");
            let remaining = if first_clause {
                strip_leading_and(&collapsed)
            } else {
                &*collapsed
            };
            state.current_query_text = remaining.trim().to_string();
        }
        None => {
            log_warning!(
                codes::builder::FILTER_FRAGMENT_NOT_FOUND,
                "Filter clause no longer present in query text",
                "label" => label,
                "fragment" => filter.query
            );
        }
    }
    state.applied_filters.retain(|l| l != label);

    log_success!(
        codes::success::FILTER_REMOVED,
        "Filter removed",
        "label" => label,
        "remaining" => state.applied_filters.len()
    );
    true
}

/// Reset the text to `base_query` and drop every applied filter
pub fn clear_all_filters(state: &mut BuilderState, base_query: &str) {
    let cleared = state.applied_filters.len();
    state.current_query_text = base_query.to_string();
    state.applied_filters.clear();

    log_success!(
        codes::success::FILTERS_CLEARED,
        "All filters cleared",
        "cleared" => cleared
    );
}

/// Add the filter if it is not applied, otherwise remove it
pub fn toggle_filter(state: &mut BuilderState, filter: &Filter, catalog: &FilterCatalog) -> bool {
    if state.has_filter(&filter.label) {
        remove_filter(state, &filter.label, catalog)
    } else {
        add_filter(state, filter)
    }
}
