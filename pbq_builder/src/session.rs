//! Session data supplied by the upstream service
//!
//! Strategies, concepts and the filter toolbox arrive as one JSON document.
//! Strategy entries under unknown keys are dropped with a warning.

use crate::errors::BuilderError;
use crate::types::{Concept, Filter, Strategy, StrategyDefinition, StrategyKey};
use pbq_query::logging::codes;
use pbq_query::{log_success, log_warning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SessionFile {
    #[serde(default)]
    strategies: BTreeMap<String, StrategyDefinition>,
    #[serde(default)]
    concepts: Vec<Concept>,
    #[serde(default)]
    toolbox: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "SessionFile")]
pub struct SessionData {
    pub strategies: BTreeMap<StrategyKey, StrategyDefinition>,
    pub concepts: Vec<Concept>,
    pub toolbox: Vec<Filter>,
}

impl From<SessionFile> for SessionData {
    fn from(file: SessionFile) -> Self {
        let mut strategies = BTreeMap::new();
        for (raw_key, definition) in file.strategies {
            match raw_key.parse::<StrategyKey>() {
                Ok(key) => {
                    strategies.insert(key, definition);
                }
                Err(err) => {
                    log_warning!(
                        codes::builder::UNKNOWN_STRATEGY,
                        "Dropping session strategy",
                        "error" => err
                    );
                }
            }
        }

        Self {
            strategies,
            concepts: file.concepts,
            toolbox: file.toolbox,
        }
    }
}

impl SessionData {
    pub fn from_json_str(json: &str) -> Result<Self, BuilderError> {
        let session: SessionData = serde_json::from_str(json)?;

        log_success!(
            codes::success::SESSION_LOADED,
            "Session data loaded",
            "strategies" => session.strategies.len(),
            "concepts" => session.concepts.len(),
            "toolbox" => session.toolbox.len()
        );
        Ok(session)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| BuilderError::SessionRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn strategy(&self, key: StrategyKey) -> Option<Strategy> {
        self.strategies
            .get(&key)
            .map(|definition| Strategy::new(key, definition))
    }

    /// Supplied strategy keys in canonical order
    pub fn available_strategies(&self) -> Vec<StrategyKey> {
        self.strategies.keys().copied().collect()
    }

    /// The first supplied strategy in canonical order, or `Comprehensive`
    pub fn default_strategy(&self) -> StrategyKey {
        self.strategies
            .keys()
            .next()
            .copied()
            .unwrap_or(StrategyKey::Comprehensive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SESSION: &str = r#"{
        "strategies": {
            "direct": {"label": "Direct", "query": "\"metformin\"[tiab]"},
            "clinical": {"label": "Clinical", "query": "\"metformin\"[tiab] AND trial[pt]"},
            "exhaustive": {"label": "Nope", "query": "x"}
        },
        "concepts": [
            {"key": "I", "label": "Intervention", "original_value": "metformin",
             "mesh_terms": [{"term": "Metformin", "source": "mesh", "selected": true}],
             "free_text_terms": [], "entry_terms": []}
        ],
        "toolbox": [{"label": "French", "query": "AND french[la]", "category": "language"}]
    }"#;

    #[test]
    fn test_unknown_strategy_keys_dropped() {
        let session = SessionData::from_json_str(SESSION).unwrap();
        assert_eq!(
            session.available_strategies(),
            vec![StrategyKey::Direct, StrategyKey::Clinical]
        );
        assert_eq!(session.default_strategy(), StrategyKey::Direct);
        assert_eq!(session.concepts.len(), 1);
        assert_eq!(session.toolbox[0].label, "French");
    }

    #[test]
    fn test_strategy_lookup() {
        let session = SessionData::from_json_str(SESSION).unwrap();
        let direct = session.strategy(StrategyKey::Direct).unwrap();
        assert_eq!(direct.label, "Direct");
        assert!(session.strategy(StrategyKey::Comprehensive).is_none());
    }

    #[test]
    fn test_empty_document_defaults() {
        let session = SessionData::from_json_str("{}").unwrap();
        assert!(session.strategies.is_empty());
        assert_eq!(session.default_strategy(), StrategyKey::Comprehensive);
    }

    #[test]
    fn test_malformed_json() {
        assert_matches!(
            SessionData::from_json_str("{\"strategies\": 3}"),
            Err(BuilderError::SessionParse(_))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();

        let session = SessionData::load(file.path()).unwrap();
        assert_eq!(session.strategies.len(), 2);

        let missing = file.path().with_extension("missing");
        assert_matches!(
            SessionData::load(&missing),
            Err(BuilderError::SessionRead { path, .. }) if path == missing
        );
    }
}
