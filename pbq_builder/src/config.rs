//! TOML configuration for the builder
//!
//! ```toml
//! [codec]
//! strategy_param = "s"
//! filters_param = "f"
//! delimiter = "|"
//!
//! [[quick_filters]]
//! label = "Humans Only"
//! query = "AND humans[mh]"
//! category = "species"
//!
//! [lexical]
//! log_fallback_fragments = false
//!
//! [logging]
//! min_log_level = "debug"
//! ```
//!
//! Every table is optional. Omitted `quick_filters` keeps the built-in set.

use crate::builder::QueryBuilder;
use crate::codec::{StateCodec, StateStore};
use crate::errors::BuilderError;
use crate::filters::FilterCatalog;
use crate::session::SessionData;
use crate::types::Filter;
use pbq_query::config::{LexicalPreferences, LoggingPreferences};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Codec parameter '{0}' must not be empty")]
    EmptyParamName(&'static str),

    #[error("Codec parameters must differ, both are '{0}'")]
    DuplicateParamName(String),

    #[error("Quick filter at position {0} has an empty label")]
    EmptyFilterLabel(usize),

    #[error("Quick filter label '{0}' appears more than once")]
    DuplicateFilterLabel(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub codec: StateCodec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_filters: Option<Vec<Filter>>,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl BuilderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BuilderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_toml_str(&text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: BuilderConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.codec.strategy_param.trim().is_empty() {
            return Err(ConfigError::EmptyParamName("strategy_param"));
        }
        if self.codec.filters_param.trim().is_empty() {
            return Err(ConfigError::EmptyParamName("filters_param"));
        }
        if self.codec.strategy_param == self.codec.filters_param {
            return Err(ConfigError::DuplicateParamName(
                self.codec.strategy_param.clone(),
            ));
        }

        if let Some(filters) = &self.quick_filters {
            let mut seen = HashSet::new();
            for (index, filter) in filters.iter().enumerate() {
                if filter.label.trim().is_empty() {
                    return Err(ConfigError::EmptyFilterLabel(index));
                }
                if !seen.insert(filter.label.as_str()) {
                    return Err(ConfigError::DuplicateFilterLabel(filter.label.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn codec(&self) -> StateCodec {
        self.codec.clone()
    }

    /// Catalog of the configured (or built-in) quick filters plus `toolbox`
    pub fn catalog(&self, toolbox: Vec<Filter>) -> FilterCatalog {
        let quick_filters = self
            .quick_filters
            .clone()
            .unwrap_or_else(FilterCatalog::builtin_quick_filters);
        FilterCatalog::new(quick_filters, toolbox)
    }

    /// Builder over `session` using the configured catalog, codec and lexical preferences
    pub fn builder<S: StateStore>(&self, session: SessionData, store: S) -> QueryBuilder<S> {
        let catalog = self.catalog(session.toolbox.clone());
        QueryBuilder::new(session, catalog, self.codec(), store)
            .with_lexical_preferences(self.lexical.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MemoryStateStore;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BuilderConfig::from_toml_str("").unwrap();
        assert_eq!(config.codec, StateCodec::default());
        assert_eq!(config.catalog(vec![]).quick_filters().len(), 7);
    }

    #[test]
    fn test_codec_and_quick_filter_overrides() {
        let config = BuilderConfig::from_toml_str(
            r#"
            [codec]
            strategy_param = "s"
            filters_param = "f"
            delimiter = "|"

            [[quick_filters]]
            label = "Mice"
            query = "AND mice[mh]"
            category = "species"
            "#,
        )
        .unwrap();

        assert_eq!(config.codec().strategy_param, "s");
        assert_eq!(config.codec().delimiter, '|');
        let catalog = config.catalog(vec![]);
        assert!(catalog.contains("Mice"));
        assert!(!catalog.contains("Humans Only"));
    }

    #[test]
    fn test_partial_codec_table_keeps_other_defaults() {
        let config = BuilderConfig::from_toml_str("[codec]\nfilters_param = \"f\"\n").unwrap();
        assert_eq!(config.codec.strategy_param, "strategy");
        assert_eq!(config.codec.delimiter, ',');
    }

    #[test]
    fn test_validation_failures() {
        assert_matches!(
            BuilderConfig::from_toml_str("[codec]\nstrategy_param = \" \"\n"),
            Err(ConfigError::EmptyParamName("strategy_param"))
        );
        assert_matches!(
            BuilderConfig::from_toml_str("[codec]\nfilters_param = \"strategy\"\n"),
            Err(ConfigError::DuplicateParamName(name)) if name == "strategy"
        );
        assert_matches!(
            BuilderConfig::from_toml_str(
                "[[quick_filters]]\nlabel = \"A\"\nquery = \"AND a\"\n\n[[quick_filters]]\nlabel = \"A\"\nquery = \"AND b\"\n"
            ),
            Err(ConfigError::DuplicateFilterLabel(label)) if label == "A"
        );
        assert_matches!(
            BuilderConfig::from_toml_str("[codec\n"),
            Err(ConfigError::Toml(_))
        );
    }

    #[test]
    fn test_builder_carries_configured_preferences() {
        let config = BuilderConfig::from_toml_str(
            "[codec]\nstrategy_param = \"s\"\n\n[lexical]\ncollect_detailed_metrics = false\nlog_fallback_fragments = false\n",
        )
        .unwrap();
        let session = SessionData::from_json_str(
            r#"{"strategies": {"direct": {"label": "Direct", "query": "a[tiab] OR b[tiab]"}}}"#,
        )
        .unwrap();

        let builder = config.builder(session, MemoryStateStore::default());
        assert!(!builder.lexical_preferences().collect_detailed_metrics);
        assert!(!builder.lexical_preferences().log_fallback_fragments);
        assert_eq!(builder.token_stream().len(), 3);
        assert_eq!(builder.tokens().len(), 3);
        assert_eq!(builder.store().params().get("s").map(String::as_str), Some("direct"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nmin_log_level = \"debug\"").unwrap();
        assert!(BuilderConfig::load(file.path()).is_ok());

        let missing = file.path().with_extension("absent");
        assert_matches!(
            BuilderConfig::load(&missing),
            Err(BuilderError::ConfigRead { .. })
        );
    }
}
