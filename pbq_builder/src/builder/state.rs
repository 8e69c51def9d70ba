use crate::types::{Concept, StrategyKey};
use serde::Serialize;
use std::fmt;

/// Whether the concept vocabularies are being curated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderMode {
    #[default]
    Viewing,
    Editing,
}

impl fmt::Display for BuilderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderMode::Viewing => f.write_str("viewing"),
            BuilderMode::Editing => f.write_str("editing"),
        }
    }
}

/// The live, mutable aggregate behind a builder.
///
/// Only `strategy` and `applied_filters` survive through the state codec.
/// The query text and concept edits are local to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuilderState {
    pub strategy: StrategyKey,
    /// Ordered, unique filter labels
    pub applied_filters: Vec<String>,
    pub current_query_text: String,
    pub edit_mode: BuilderMode,
    pub edited_concepts: Vec<Concept>,
}

impl BuilderState {
    pub fn new(strategy: StrategyKey, query_text: impl Into<String>) -> Self {
        Self {
            strategy,
            applied_filters: Vec::new(),
            current_query_text: query_text.into(),
            edit_mode: BuilderMode::Viewing,
            edited_concepts: Vec::new(),
        }
    }

    pub fn has_filter(&self, label: &str) -> bool {
        self.applied_filters.iter().any(|l| l == label)
    }

    pub fn is_editing(&self) -> bool {
        self.edit_mode == BuilderMode::Editing
    }
}
