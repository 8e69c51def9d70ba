//! Canned filter clauses

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    Species,
    Language,
    Date,
    StudyDesign,
    Age,
    #[default]
    #[serde(other)]
    Other,
}

impl FilterCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCategory::Species => "species",
            FilterCategory::Language => "language",
            FilterCategory::Date => "date",
            FilterCategory::StudyDesign => "study_design",
            FilterCategory::Age => "age",
            FilterCategory::Other => "other",
        }
    }
}

/// A labeled boolean clause toggled on and off against the query text.
///
/// `label` is the filter's identity for add, remove and persistence.
/// `query` normally starts with `AND ` so it can be appended to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub label: String,
    pub query: String,
    #[serde(default)]
    pub category: FilterCategory,
}

impl Filter {
    pub fn new(label: impl Into<String>, query: impl Into<String>, category: FilterCategory) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_is_other() {
        let filter: Filter = serde_json::from_str(
            r#"{"label": "Free Full Text", "query": "AND free full text[sb]", "category": "availability"}"#,
        )
        .unwrap();
        assert_eq!(filter.category, FilterCategory::Other);
    }

    #[test]
    fn test_known_and_missing_category() {
        let filter: Filter = serde_json::from_str(
            r#"{"label": "Cohort", "query": "AND cohort studies[mh]", "category": "study_design"}"#,
        )
        .unwrap();
        assert_eq!(filter.category, FilterCategory::StudyDesign);

        let filter: Filter =
            serde_json::from_str(r#"{"label": "X", "query": "AND x[tiab]"}"#).unwrap();
        assert_eq!(filter.category, FilterCategory::Other);
    }
}
