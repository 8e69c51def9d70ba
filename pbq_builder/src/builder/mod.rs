//! Interactive builder state machine
//!
//! A `QueryBuilder` owns the live query text, the applied filter labels and
//! the concept edit session. Strategy and filter changes are written through
//! the state codec into the injected `StateStore` after every change.
//!
//! Editing the query text directly does not touch the applied filter list.
//! A hand edit can therefore leave a label applied whose clause is gone, or
//! remove a clause whose label is still listed.

pub mod state;

pub use state::{BuilderMode, BuilderState};

use crate::codec::{to_query_string, StateCodec, StateStore};
use crate::filters::{patcher, FilterCatalog};
use crate::session::SessionData;
use crate::types::{Concept, Strategy, StrategyKey, Term, Vocabulary};
use pbq_query::config::LexicalPreferences;
use pbq_query::lexical::tokenize_with_preferences;
use pbq_query::logging::codes;
use pbq_query::{check_structure, validate_query, StructureViolation, Token, TokenStream, ValidationReport};
use pbq_query::{log_debug, log_success, log_warning};
use std::collections::HashMap;

pub struct QueryBuilder<S: StateStore> {
    session: SessionData,
    catalog: FilterCatalog,
    codec: StateCodec,
    store: S,
    lexical: LexicalPreferences,
    state: BuilderState,
    saved_concepts: Vec<Concept>,
    staged_inputs: HashMap<(String, Vocabulary), String>,
    show_more_filters: bool,
}

impl<S: StateStore> QueryBuilder<S> {
    /// Restore state from `store`, activate the initial strategy and write
    /// the normalised encoding back.
    ///
    /// A persisted strategy is used only if the session supplies it.
    /// Persisted filter labels unknown to the catalog are dropped.
    pub fn new(session: SessionData, catalog: FilterCatalog, codec: StateCodec, store: S) -> Self {
        let persisted = codec.decode(&store.load());
        let strategy = persisted
            .strategy
            .filter(|key| session.strategies.contains_key(key))
            .unwrap_or_else(|| session.default_strategy());

        let mut builder = Self {
            session,
            catalog,
            codec,
            store,
            lexical: LexicalPreferences::default(),
            state: BuilderState::new(strategy, ""),
            saved_concepts: Vec::new(),
            staged_inputs: HashMap::new(),
            show_more_filters: false,
        };

        builder.activate(strategy);
        for label in &persisted.filters {
            match builder.catalog.find(label) {
                Some(filter) => {
                    patcher::add_filter(&mut builder.state, filter);
                }
                None => {
                    log_warning!(
                        codes::builder::UNKNOWN_FILTER,
                        "Dropping persisted filter",
                        "label" => label
                    );
                }
            }
        }
        builder.persist();

        log_success!(
            codes::success::BUILDER_INITIALIZED,
            "Query builder initialized",
            "strategy" => builder.state.strategy,
            "filters" => builder.state.applied_filters.len()
        );
        builder
    }

    /// Builder with the default codec and the session's toolbox behind the built-in quick filters
    pub fn with_defaults(session: SessionData, store: S) -> Self {
        let catalog = FilterCatalog::with_toolbox(session.toolbox.clone());
        Self::new(session, catalog, StateCodec::default(), store)
    }

    /// Tokenizer preferences used by the token views
    pub fn with_lexical_preferences(mut self, preferences: LexicalPreferences) -> Self {
        self.lexical = preferences;
        self
    }

    fn activate(&mut self, key: StrategyKey) {
        let base = match self.session.strategy(key) {
            Some(strategy) => strategy.query,
            None => {
                log_warning!(
                    codes::builder::UNAVAILABLE_STRATEGY,
                    "Strategy not supplied by session, starting from an empty query",
                    "strategy" => key
                );
                String::new()
            }
        };

        self.state.strategy = key;
        self.state.current_query_text = base;
        self.state.applied_filters.clear();

        log_success!(
            codes::success::STRATEGY_SELECTED,
            "Strategy selected",
            "strategy" => key
        );
    }

    fn persist(&mut self) {
        let params = self
            .codec
            .encode(self.state.strategy, &self.state.applied_filters);
        self.store.store(&params);

        log_success!(
            codes::success::STATE_PERSISTED,
            "Builder state persisted",
            "state" => to_query_string(&params)
        );
    }

    fn base_query(&self) -> String {
        self.session
            .strategy(self.state.strategy)
            .map(|strategy| strategy.query)
            .unwrap_or_default()
    }

    /// Switch strategy, resetting the text to its base query and clearing
    /// filters. Concept edits, saved or in progress, are dropped as well.
    pub fn set_strategy(&mut self, key: StrategyKey) {
        self.activate(key);
        self.reset_concept_edits();
        self.persist();
    }

    fn reset_concept_edits(&mut self) {
        self.state.edit_mode = BuilderMode::Viewing;
        self.state.edited_concepts.clear();
        self.saved_concepts.clear();
        self.staged_inputs.clear();
    }

    /// Replace the query text by hand; applied filters are left as they are
    pub fn set_current_query_text(&mut self, text: impl Into<String>) {
        self.state.current_query_text = text.into();
    }

    pub fn add_filter(&mut self, label: &str) -> bool {
        let Some(filter) = self.catalog.find(label) else {
            log_warning!(
                codes::builder::UNKNOWN_FILTER,
                "Cannot apply unknown filter",
                "label" => label
            );
            return false;
        };

        let changed = patcher::add_filter(&mut self.state, filter);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn remove_filter(&mut self, label: &str) -> bool {
        let changed = patcher::remove_filter(&mut self.state, label, &self.catalog);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn toggle_filter(&mut self, label: &str) -> bool {
        if self.state.has_filter(label) {
            self.remove_filter(label)
        } else {
            self.add_filter(label)
        }
    }

    pub fn clear_all_filters(&mut self) {
        let base = self.base_query();
        patcher::clear_all_filters(&mut self.state, &base);
        self.persist();
    }

    pub fn toggle_more_filters(&mut self) -> bool {
        self.show_more_filters = !self.show_more_filters;
        self.show_more_filters
    }

    // ------------------------------------------------------------------
    // Concept editing
    // ------------------------------------------------------------------

    /// Enter edit mode on a copy of the concepts currently displayed.
    ///
    /// After a save this is the saved edit set rather than the session's
    /// concept list, so repeated edit sessions build on each other until the
    /// next strategy switch.
    pub fn start_edit(&mut self) {
        self.state.edited_concepts = self.display_concepts().to_vec();
        self.state.edit_mode = BuilderMode::Editing;
        self.staged_inputs.clear();
        log_debug!("Concept edit started",
            "concepts" => self.state.edited_concepts.len()
        );
    }

    /// Discard edits since the last save and return to viewing
    pub fn cancel_edit(&mut self) {
        self.state.edited_concepts = self.saved_concepts.clone();
        self.state.edit_mode = BuilderMode::Viewing;
        self.staged_inputs.clear();
        log_debug!("Concept edit cancelled");
    }

    /// Keep the edited concepts as the displayed view and return to viewing.
    /// The query text is not recompiled from them.
    pub fn save_edit(&mut self) {
        self.saved_concepts = self.state.edited_concepts.clone();
        self.state.edit_mode = BuilderMode::Viewing;
        self.staged_inputs.clear();
        log_debug!("Concept edit saved",
            "concepts" => self.saved_concepts.len()
        );
    }

    fn require_editing(&self, operation: &str) -> bool {
        if !self.state.is_editing() {
            log_warning!(
                codes::builder::NOT_EDITING,
                "Concept edit ignored outside edit mode",
                "operation" => operation
            );
            return false;
        }
        true
    }

    fn edited_concept_mut(&mut self, key: &str) -> Option<&mut Concept> {
        let concept = self
            .state
            .edited_concepts
            .iter_mut()
            .find(|concept| concept.key == key);
        if concept.is_none() {
            log_warning!(
                codes::builder::CONCEPT_NOT_FOUND,
                "Concept not found",
                "key" => key
            );
        }
        concept
    }

    /// Remove every term equal to `term` from one vocabulary of a concept
    pub fn remove_term_from_concept(&mut self, key: &str, vocabulary: Vocabulary, term: &str) -> bool {
        if !self.require_editing("remove_term_from_concept") {
            return false;
        }
        let Some(concept) = self.edited_concept_mut(key) else {
            return false;
        };

        let terms = concept.terms_mut(vocabulary);
        let before = terms.len();
        terms.retain(|t| t.term != term);
        terms.len() != before
    }

    pub fn set_staged_input(&mut self, key: &str, vocabulary: Vocabulary, text: impl Into<String>) {
        if !self.require_editing("set_staged_input") {
            return;
        }
        self.staged_inputs
            .insert((key.to_string(), vocabulary), text.into());
    }

    pub fn staged_input(&self, key: &str, vocabulary: Vocabulary) -> &str {
        self.staged_inputs
            .get(&(key.to_string(), vocabulary))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Append the trimmed staged input as a selected user-added term.
    /// Blank input is a no-op. The staged input is cleared on success.
    pub fn add_new_term(&mut self, key: &str, vocabulary: Vocabulary) -> bool {
        if !self.require_editing("add_new_term") {
            return false;
        }

        let value = self.staged_input(key, vocabulary).trim().to_string();
        if value.is_empty() {
            return false;
        }
        let Some(concept) = self.edited_concept_mut(key) else {
            return false;
        };

        concept.terms_mut(vocabulary).push(Term::user_added(value));
        self.staged_inputs.remove(&(key.to_string(), vocabulary));
        true
    }

    /// Flip `selected` on the first term equal to `term`
    pub fn toggle_term_selection(&mut self, key: &str, vocabulary: Vocabulary, term: &str) -> bool {
        if !self.require_editing("toggle_term_selection") {
            return false;
        }
        let Some(concept) = self.edited_concept_mut(key) else {
            return false;
        };

        match concept.terms_mut(vocabulary).iter_mut().find(|t| t.term == term) {
            Some(found) => {
                found.selected = !found.selected;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn tokens(&self) -> Vec<Token> {
        self.token_stream().into_tokens()
    }

    pub fn token_stream(&self) -> TokenStream {
        tokenize_with_preferences(&self.state.current_query_text, self.lexical.clone())
    }

    pub fn lexical_preferences(&self) -> &LexicalPreferences {
        &self.lexical
    }

    pub fn query_text(&self) -> &str {
        &self.state.current_query_text
    }

    pub fn applied_filters(&self) -> &[String] {
        &self.state.applied_filters
    }

    pub fn warnings(&self) -> ValidationReport {
        validate_query(&self.state.current_query_text)
    }

    pub fn structure(&self) -> Vec<StructureViolation> {
        check_structure(&self.tokens())
    }

    /// Edited concepts once there are any, otherwise the session's
    pub fn display_concepts(&self) -> &[Concept] {
        if self.state.edited_concepts.is_empty() {
            &self.session.concepts
        } else {
            &self.state.edited_concepts
        }
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn mode(&self) -> BuilderMode {
        self.state.edit_mode
    }

    pub fn show_more_filters(&self) -> bool {
        self.show_more_filters
    }

    pub fn active_strategy(&self) -> Option<Strategy> {
        self.session.strategy(self.state.strategy)
    }

    pub fn session(&self) -> &SessionData {
        &self.session
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{MemoryStateStore, ParamMap, QueryStringStore};
    use crate::types::{Filter, FilterCategory, TermSource};
    use assert_matches::assert_matches;
    use pbq_query::QueryWarning;

    const COMPREHENSIVE: &str = "(\"diabetes mellitus\"[Mesh] OR diabetes[tiab]) AND metformin[tiab]";
    const DIRECT: &str = "\"diabetes\"[tiab] AND \"metformin\"[tiab]";

    fn session() -> SessionData {
        SessionData::from_json_str(&format!(
            r#"{{
                "strategies": {{
                    "comprehensive": {{"label": "Comprehensive", "query": {comprehensive}}},
                    "direct": {{"label": "Direct", "query": {direct}}}
                }},
                "concepts": [
                    {{"key": "P", "label": "Population", "original_value": "type 2 diabetes",
                      "mesh_terms": [{{"term": "Diabetes Mellitus, Type 2", "source": "mesh", "selected": true}}],
                      "free_text_terms": [{{"term": "T2DM", "source": "ai_generated", "selected": true}}]}},
                    {{"key": "I", "label": "Intervention", "original_value": "metformin",
                      "mesh_terms": [{{"term": "Metformin", "source": "mesh", "selected": true}}],
                      "free_text_terms": []}}
                ],
                "toolbox": [{{"label": "French", "query": "AND french[la]", "category": "language"}}]
            }}"#,
            comprehensive = serde_json::to_string(COMPREHENSIVE).unwrap(),
            direct = serde_json::to_string(DIRECT).unwrap(),
        ))
        .unwrap()
    }

    fn store(pairs: &[(&str, &str)]) -> MemoryStateStore {
        MemoryStateStore::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<ParamMap>(),
        )
    }

    fn builder() -> QueryBuilder<MemoryStateStore> {
        QueryBuilder::with_defaults(session(), MemoryStateStore::default())
    }

    #[test]
    fn test_initial_strategy_defaults_to_first_supplied() {
        let b = builder();
        assert_eq!(b.state().strategy, StrategyKey::Comprehensive);
        assert_eq!(b.query_text(), COMPREHENSIVE);
        assert_eq!(b.mode(), BuilderMode::Viewing);
        assert_eq!(b.store().params().get("strategy").map(String::as_str), Some("comprehensive"));
        assert_eq!(b.store().writes(), 1);
    }

    #[test]
    fn test_restores_persisted_strategy_and_filters() {
        let b = QueryBuilder::with_defaults(
            session(),
            store(&[("strategy", "direct"), ("filters", "Humans Only,Bogus,French")]),
        );

        assert_eq!(b.state().strategy, StrategyKey::Direct);
        assert_eq!(b.applied_filters(), ["Humans Only", "French"]);
        assert_eq!(
            b.query_text(),
            format!("{DIRECT} AND \"humans\"[Mesh] AND french[la]")
        );
        assert_eq!(
            b.store().params().get("filters").map(String::as_str),
            Some("Humans Only,French")
        );
    }

    #[test]
    fn test_unknown_or_unsupplied_strategy_falls_back() {
        let b = QueryBuilder::with_defaults(session(), store(&[("strategy", "nonsense")]));
        assert_eq!(b.state().strategy, StrategyKey::Comprehensive);

        let b = QueryBuilder::with_defaults(session(), store(&[("strategy", "clinical")]));
        assert_eq!(b.state().strategy, StrategyKey::Comprehensive);
    }

    #[test]
    fn test_strategy_switch_resets_filters() {
        let mut b = builder();
        assert!(b.add_filter("Humans Only"));
        assert!(b.add_filter("English Only"));

        b.set_strategy(StrategyKey::Direct);
        assert_eq!(b.query_text(), DIRECT);
        assert!(b.applied_filters().is_empty());
        assert_eq!(b.store().params().get("filters"), None);
        assert_eq!(b.store().params().get("strategy").map(String::as_str), Some("direct"));
    }

    #[test]
    fn test_strategy_switch_resets_concept_edits() {
        let mut b = builder();
        b.start_edit();
        assert!(b.remove_term_from_concept("I", Vocabulary::Mesh, "Metformin"));
        b.save_edit();
        assert_ne!(b.display_concepts(), session().concepts.as_slice());

        b.set_strategy(StrategyKey::Direct);
        assert_eq!(b.mode(), BuilderMode::Viewing);
        assert!(b.state().edited_concepts.is_empty());
        assert_eq!(b.display_concepts(), session().concepts.as_slice());

        b.start_edit();
        assert_eq!(b.display_concepts()[1].mesh_terms.len(), 1);
        b.set_staged_input("P", Vocabulary::FreeText, "NIDDM");
        b.set_strategy(StrategyKey::Comprehensive);
        assert_eq!(b.mode(), BuilderMode::Viewing);
        assert_eq!(b.staged_input("P", Vocabulary::FreeText), "");
        assert!(!b.add_new_term("P", Vocabulary::FreeText));
    }

    #[test]
    fn test_switch_to_unsupplied_strategy_gives_empty_text() {
        let mut b = builder();
        b.set_strategy(StrategyKey::Clinical);
        assert_eq!(b.query_text(), "");
        assert!(b.active_strategy().is_none());

        assert!(b.add_filter("Adults"));
        assert_eq!(b.query_text(), "\"adult\"[Mesh]");
    }

    #[test]
    fn test_filter_changes_persist() {
        let mut b = builder();
        let writes = b.store().writes();

        assert!(b.add_filter("RCTs Only"));
        assert!(!b.add_filter("RCTs Only"));
        assert!(!b.add_filter("Unknown"));
        assert_eq!(b.store().writes(), writes + 1);

        assert!(b.remove_filter("RCTs Only"));
        assert_eq!(b.query_text(), COMPREHENSIVE);
        assert_eq!(b.store().writes(), writes + 2);
    }

    #[test]
    fn test_toggle_and_clear_filters() {
        let mut b = builder();
        assert!(b.toggle_filter("French"));
        assert_eq!(b.applied_filters(), ["French"]);
        assert!(b.toggle_filter("French"));
        assert!(b.applied_filters().is_empty());

        b.add_filter("Last 5 Years");
        b.add_filter("Adults");
        b.clear_all_filters();
        assert_eq!(b.query_text(), COMPREHENSIVE);
        assert!(b.applied_filters().is_empty());
    }

    #[test]
    fn test_free_text_edit_does_not_reconcile_filters() {
        let mut b = builder();
        b.add_filter("Humans Only");
        let writes = b.store().writes();

        b.set_current_query_text("metformin[tiab]");
        assert_eq!(b.applied_filters(), ["Humans Only"]);
        assert_eq!(b.store().writes(), writes);

        b.set_current_query_text("metformin[tiab] AND english[la]");
        assert!(b.applied_filters().iter().all(|l| l != "English Only"));

        assert!(b.remove_filter("Humans Only"));
        assert_eq!(b.query_text(), "metformin[tiab] AND english[la]");
        assert!(b.applied_filters().is_empty());
    }

    #[test]
    fn test_views_follow_current_text() {
        let mut b = builder();
        assert!(b.warnings().is_valid);
        assert!(b.structure().is_empty());
        assert_eq!(b.tokens().len(), b.token_stream().len());

        b.set_current_query_text("(\"a\"[tiab] \"b\"[tiab] AND");
        let report = b.warnings();
        assert!(!report.is_valid);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, QueryWarning::MissingClosingParenthesis { count: 1 })));
        assert_matches!(b.structure().as_slice(), [StructureViolation::TrailingOperator { .. }, ..]);
    }

    #[test]
    fn test_more_filters_flag() {
        let mut b = builder();
        assert!(!b.show_more_filters());
        assert!(b.toggle_more_filters());
        assert!(!b.toggle_more_filters());
    }

    #[test]
    fn test_concept_edits_require_edit_mode() {
        let mut b = builder();
        assert!(!b.remove_term_from_concept("P", Vocabulary::Mesh, "Diabetes Mellitus, Type 2"));
        b.set_staged_input("P", Vocabulary::FreeText, "NIDDM");
        assert_eq!(b.staged_input("P", Vocabulary::FreeText), "");
        assert!(!b.add_new_term("P", Vocabulary::FreeText));
        assert_eq!(b.display_concepts(), session().concepts.as_slice());
    }

    #[test]
    fn test_edit_save_cycle() {
        let mut b = builder();
        let text_before = b.query_text().to_string();

        b.start_edit();
        assert_eq!(b.mode(), BuilderMode::Editing);
        assert!(b.remove_term_from_concept("P", Vocabulary::FreeText, "T2DM"));
        b.set_staged_input("P", Vocabulary::FreeText, "  NIDDM  ");
        assert!(b.add_new_term("P", Vocabulary::FreeText));
        assert_eq!(b.staged_input("P", Vocabulary::FreeText), "");
        assert!(b.toggle_term_selection("I", Vocabulary::Mesh, "Metformin"));
        b.save_edit();

        assert_eq!(b.mode(), BuilderMode::Viewing);
        assert_eq!(b.query_text(), text_before);

        let population = &b.display_concepts()[0];
        assert_eq!(
            population.free_text_terms,
            vec![Term {
                term: "NIDDM".to_string(),
                source: TermSource::UserAdded,
                selected: true
            }]
        );
        assert!(!b.display_concepts()[1].mesh_terms[0].selected);
    }

    #[test]
    fn test_cancel_discards_unsaved_edits() {
        let mut b = builder();
        b.start_edit();
        b.remove_term_from_concept("I", Vocabulary::Mesh, "Metformin");
        b.cancel_edit();
        assert_eq!(b.display_concepts(), session().concepts.as_slice());

        b.start_edit();
        b.set_staged_input("I", Vocabulary::Entry, "Glucophage");
        assert!(b.add_new_term("I", Vocabulary::Entry));
        b.save_edit();

        b.start_edit();
        b.remove_term_from_concept("I", Vocabulary::Entry, "Glucophage");
        b.cancel_edit();
        assert_eq!(b.display_concepts()[1].terms(Vocabulary::Entry).len(), 1);
    }

    #[test]
    fn test_blank_input_and_unknown_concept() {
        let mut b = builder();
        b.start_edit();
        b.set_staged_input("P", Vocabulary::Mesh, "   ");
        assert!(!b.add_new_term("P", Vocabulary::Mesh));
        b.set_staged_input("X", Vocabulary::Mesh, "term");
        assert!(!b.add_new_term("X", Vocabulary::Mesh));
        assert_eq!(b.staged_input("X", Vocabulary::Mesh), "term");
        assert!(!b.toggle_term_selection("P", Vocabulary::Mesh, "missing"));
    }

    #[test]
    fn test_query_string_store_round_trip() {
        let mut b = QueryBuilder::with_defaults(session(), QueryStringStore::new("?strategy=direct"));
        b.add_filter("Humans Only");
        let query = b.into_store().query().to_string();
        assert_eq!(query, "filters=Humans+Only&strategy=direct");

        let restored = QueryBuilder::with_defaults(session(), QueryStringStore::new(query));
        assert_eq!(restored.state().strategy, StrategyKey::Direct);
        assert_eq!(restored.applied_filters(), ["Humans Only"]);
    }

    #[test]
    fn test_custom_catalog_and_codec() {
        let catalog = FilterCatalog::new(
            vec![Filter::new("Mice", "AND mice[mh]", FilterCategory::Species)],
            vec![],
        );
        let codec = StateCodec {
            strategy_param: "s".to_string(),
            filters_param: "f".to_string(),
            delimiter: '|',
        };
        let mut b = QueryBuilder::new(session(), catalog, codec, store(&[("f", "Mice|Humans Only")]));

        assert_eq!(b.applied_filters(), ["Mice"]);
        assert!(!b.add_filter("Humans Only"));
        assert_eq!(b.store().params().get("f").map(String::as_str), Some("Mice"));
    }
}
