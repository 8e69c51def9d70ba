//! Research question concepts and their curated vocabularies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a vocabulary term came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermSource {
    Mesh,
    EntryTerm,
    AiGenerated,
    Derived,
    UserAdded,
}

/// One vocabulary item of a concept, distinct from a query token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    pub source: TermSource,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl Term {
    pub fn new(term: impl Into<String>, source: TermSource) -> Self {
        Self {
            term: term.into(),
            source,
            selected: true,
        }
    }

    pub fn user_added(term: impl Into<String>) -> Self {
        Self::new(term, TermSource::UserAdded)
    }
}

/// Which term array of a concept an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vocabulary {
    Mesh,
    FreeText,
    Entry,
}

impl Vocabulary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vocabulary::Mesh => "mesh",
            Vocabulary::FreeText => "free_text",
            Vocabulary::Entry => "entry",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural component of the research question (Population, Intervention, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub original_value: String,
    #[serde(default)]
    pub mesh_terms: Vec<Term>,
    #[serde(default)]
    pub free_text_terms: Vec<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_terms: Option<Vec<Term>>,
}

impl Concept {
    /// Terms of one vocabulary; a missing entry term list reads as empty
    pub fn terms(&self, vocabulary: Vocabulary) -> &[Term] {
        match vocabulary {
            Vocabulary::Mesh => &self.mesh_terms,
            Vocabulary::FreeText => &self.free_text_terms,
            Vocabulary::Entry => self.entry_terms.as_deref().unwrap_or(&[]),
        }
    }

    /// Mutable terms of one vocabulary, creating the entry term list on demand
    pub fn terms_mut(&mut self, vocabulary: Vocabulary) -> &mut Vec<Term> {
        match vocabulary {
            Vocabulary::Mesh => &mut self.mesh_terms,
            Vocabulary::FreeText => &mut self.free_text_terms,
            Vocabulary::Entry => self.entry_terms.get_or_insert_with(Vec::new),
        }
    }

    pub fn selected_terms(&self, vocabulary: Vocabulary) -> impl Iterator<Item = &Term> {
        self.terms(vocabulary).iter().filter(|t| t.selected)
    }
}
