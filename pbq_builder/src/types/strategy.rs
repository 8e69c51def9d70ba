//! Search strategies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of strategy variants, in canonical order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKey {
    /// Broad, high-recall search
    Comprehensive,
    /// Narrow search on the core concepts
    Direct,
    /// Search restricted to clinical study designs
    Clinical,
}

impl StrategyKey {
    pub const ALL: [StrategyKey; 3] = [
        StrategyKey::Comprehensive,
        StrategyKey::Direct,
        StrategyKey::Clinical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKey::Comprehensive => "comprehensive",
            StrategyKey::Direct => "direct",
            StrategyKey::Clinical => "clinical",
        }
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown strategy '{0}' (expected comprehensive, direct or clinical)")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKey {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comprehensive" => Ok(StrategyKey::Comprehensive),
            "direct" => Ok(StrategyKey::Direct),
            "clinical" => Ok(StrategyKey::Clinical),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Label and base query of one strategy as supplied in session data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    #[serde(default)]
    pub label: String,
    pub query: String,
}

/// A strategy resolved against its key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    pub key: StrategyKey,
    pub label: String,
    pub query: String,
}

impl Strategy {
    pub fn new(key: StrategyKey, definition: &StrategyDefinition) -> Self {
        Self {
            key,
            label: definition.label.clone(),
            query: definition.query.clone(),
        }
    }
}
