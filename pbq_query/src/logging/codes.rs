//! Consolidated event codes and classification
//!
//! Single source of truth for every code the toolkit logs, together with its
//! behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl CodeMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Tokenizer codes
pub mod lexical {
    use super::Code;

    pub const FALLBACK_FRAGMENT: Code = Code::new("W020");
}

/// Advisory query validation codes
pub mod validation {
    use super::Code;

    pub const MISSING_CLOSING_PARENTHESIS: Code = Code::new("W030");
    pub const MISSING_OPENING_PARENTHESIS: Code = Code::new("W031");
    pub const EMPTY_QUOTED_TERM: Code = Code::new("W032");
    pub const MISSING_OPERATOR: Code = Code::new("W033");
}

/// Token list well-formedness codes
pub mod structure {
    use super::Code;

    pub const LEADING_OPERATOR: Code = Code::new("W040");
    pub const TRAILING_OPERATOR: Code = Code::new("W041");
    pub const CONSECUTIVE_OPERATORS: Code = Code::new("W042");
    pub const UNMATCHED_CLOSING_GROUP: Code = Code::new("W043");
    pub const UNCLOSED_GROUP: Code = Code::new("W044");
}

/// Builder and filter bookkeeping codes
pub mod builder {
    use super::Code;

    pub const UNKNOWN_FILTER: Code = Code::new("W050");
    pub const FILTER_FRAGMENT_NOT_FOUND: Code = Code::new("W051");
    pub const UNKNOWN_STRATEGY: Code = Code::new("W052");
    pub const UNAVAILABLE_STRATEGY: Code = Code::new("W053");
    pub const CONCEPT_NOT_FOUND: Code = Code::new("W054");
    pub const NOT_EDITING: Code = Code::new("W055");
}

/// Configuration and session input codes
pub mod input {
    use super::Code;

    pub const CONFIG_READ_FAILED: Code = Code::new("E060");
    pub const CONFIG_PARSE_FAILED: Code = Code::new("E061");
    pub const SESSION_READ_FAILED: Code = Code::new("E062");
    pub const SESSION_PARSE_FAILED: Code = Code::new("E063");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I100");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I101");
    pub const VALIDATION_COMPLETE: Code = Code::new("I102");
    pub const TERM_ADDED: Code = Code::new("I103");
    pub const TERM_REMOVED: Code = Code::new("I104");
    pub const FILTER_APPLIED: Code = Code::new("I110");
    pub const FILTER_REMOVED: Code = Code::new("I111");
    pub const FILTERS_CLEARED: Code = Code::new("I112");
    pub const STRATEGY_SELECTED: Code = Code::new("I113");
    pub const STATE_PERSISTED: Code = Code::new("I114");
    pub const BUILDER_INITIALIZED: Code = Code::new("I115");
    pub const SESSION_LOADED: Code = Code::new("I116");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

const REGISTRY_ENTRIES: &[CodeMetadata] = &[
    CodeMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        "Internal toolkit error",
        "Report the query and the operation that triggered it",
    ),
    CodeMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        "Logging or configuration initialization failed",
        "Check PBQ_* environment variables and the configuration file",
    ),
    CodeMetadata::new(
        "W020",
        "Lexical",
        Severity::Low,
        true,
        "Fragment was tokenized by the fallback rule",
        "Check for stray brackets or unterminated quotes",
    ),
    CodeMetadata::new(
        "W030",
        "Validation",
        Severity::Medium,
        true,
        "Query has an opening parenthesis without a matching closing one",
        "Add the missing ')' or remove the extra '('",
    ),
    CodeMetadata::new(
        "W031",
        "Validation",
        Severity::Medium,
        true,
        "Query has a closing parenthesis without a matching opening one",
        "Add the missing '(' or remove the extra ')'",
    ),
    CodeMetadata::new(
        "W032",
        "Validation",
        Severity::Medium,
        true,
        "Empty quoted term before a field qualifier",
        "Type a term between the quotes or remove the qualifier",
    ),
    CodeMetadata::new(
        "W033",
        "Validation",
        Severity::Medium,
        true,
        "Two qualified terms with no boolean operator between them",
        "Insert AND, OR or NOT between the terms",
    ),
    CodeMetadata::new(
        "W040",
        "Structure",
        Severity::Low,
        true,
        "Token list starts with an operator",
        "Remove the leading operator",
    ),
    CodeMetadata::new(
        "W041",
        "Structure",
        Severity::Low,
        true,
        "Token list ends with an operator",
        "Remove the trailing operator or add a term after it",
    ),
    CodeMetadata::new(
        "W042",
        "Structure",
        Severity::Low,
        true,
        "Two operators are adjacent",
        "Remove one of the operators",
    ),
    CodeMetadata::new(
        "W043",
        "Structure",
        Severity::Low,
        true,
        "Closing group token without a matching opening group",
        "Remove the closing parenthesis or add an opening one",
    ),
    CodeMetadata::new(
        "W044",
        "Structure",
        Severity::Low,
        true,
        "Opening group tokens left unclosed",
        "Close the open parenthesis groups",
    ),
    CodeMetadata::new(
        "W050",
        "Builder",
        Severity::Low,
        true,
        "Filter label is not in the quick filter set or the toolbox",
        "Use a label offered by the session",
    ),
    CodeMetadata::new(
        "W051",
        "Builder",
        Severity::Medium,
        true,
        "Filter fragment is no longer present in the query text",
        "Review the query text; it was edited after the filter was applied",
    ),
    CodeMetadata::new(
        "W052",
        "Builder",
        Severity::Low,
        true,
        "Encoded strategy key is not recognized",
        "The default strategy is used instead",
    ),
    CodeMetadata::new(
        "W053",
        "Builder",
        Severity::Medium,
        true,
        "Strategy was not supplied by the session",
        "The strategy base query is treated as empty",
    ),
    CodeMetadata::new(
        "W054",
        "Builder",
        Severity::Low,
        true,
        "Concept key not found among edited concepts",
        "Use a concept key supplied by the session",
    ),
    CodeMetadata::new(
        "W055",
        "Builder",
        Severity::Low,
        true,
        "Concept edit operation outside edit mode",
        "Call start_edit before editing concept terms",
    ),
    CodeMetadata::new(
        "E060",
        "Input",
        Severity::High,
        true,
        "Configuration file could not be read",
        "Check the configuration path and permissions",
    ),
    CodeMetadata::new(
        "E061",
        "Input",
        Severity::High,
        true,
        "Configuration file is not valid TOML",
        "Fix the reported TOML syntax error",
    ),
    CodeMetadata::new(
        "E062",
        "Input",
        Severity::High,
        true,
        "Session data file could not be read",
        "Check the session path and permissions",
    ),
    CodeMetadata::new(
        "E063",
        "Input",
        Severity::High,
        true,
        "Session data is not valid JSON for strategies, concepts and toolbox",
        "Fix the reported JSON error",
    ),
];

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_code_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown code")
}

pub fn get_action(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
