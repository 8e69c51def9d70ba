//! Persisted form of the builder's strategy and filter selection
//!
//! Only the strategy key and the applied filter labels are encoded. Decoding
//! never fails: unrecognised values fall back to "no strategy" and an empty
//! filter list.

pub mod store;

pub use store::{MemoryStateStore, QueryStringStore, StateStore};

use crate::types::StrategyKey;
use pbq_query::config::compile_time::codec;
use pbq_query::log_warning;
use pbq_query::logging::codes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Flat key/value parameters, ordered for stable encoding
pub type ParamMap = BTreeMap<String, String>;

/// What the codec recovers from a parameter map
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedState {
    pub strategy: Option<StrategyKey>,
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateCodec {
    pub strategy_param: String,
    pub filters_param: String,
    pub delimiter: char,
}

impl Default for StateCodec {
    fn default() -> Self {
        Self {
            strategy_param: codec::STRATEGY_PARAM.to_string(),
            filters_param: codec::FILTERS_PARAM.to_string(),
            delimiter: codec::FILTER_DELIMITER,
        }
    }
}

impl StateCodec {
    pub fn encode(&self, strategy: StrategyKey, filters: &[String]) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert(self.strategy_param.clone(), strategy.as_str().to_string());

        if !filters.is_empty() {
            params.insert(
                self.filters_param.clone(),
                filters.join(&self.delimiter.to_string()),
            );
        }
        params
    }

    pub fn decode(&self, params: &ParamMap) -> PersistedState {
        let strategy = params
            .get(&self.strategy_param)
            .and_then(|raw| match raw.parse::<StrategyKey>() {
                Ok(key) => Some(key),
                Err(err) => {
                    log_warning!(
                        codes::builder::UNKNOWN_STRATEGY,
                        "Ignoring persisted strategy",
                        "error" => err
                    );
                    None
                }
            });

        let filters = params
            .get(&self.filters_param)
            .map(|raw| self.split_filters(raw))
            .unwrap_or_default();

        PersistedState { strategy, filters }
    }

    /// Split on the delimiter, trim, drop empties and keep first occurrences
    pub fn split_filters(&self, raw: &str) -> Vec<String> {
        let mut filters: Vec<String> = Vec::new();
        for label in raw.split(self.delimiter).map(str::trim) {
            if !label.is_empty() && !filters.iter().any(|f| f == label) {
                filters.push(label.to_string());
            }
        }
        filters
    }
}

/// Render parameters as an `application/x-www-form-urlencoded` string
pub fn to_query_string(params: &ParamMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// Parse a query string, with or without its leading `?`. Later duplicates win.
pub fn parse_query_string(query: &str) -> ParamMap {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
