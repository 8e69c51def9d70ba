//! Configuration module for the query toolkit
//!
//! `constants` holds the fixed vocabulary (qualifier tables, canonical
//! qualifiers, codec parameter names); `runtime` holds user preferences that
//! default from `PBQ_*` environment variables.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{LexicalPreferences, LogLevel, LoggingPreferences, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the crate version the query toolkit was built from
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!(
            "pbq_query {} (preferences from PBQ_* environment variables)",
            version()
        )
    }
}
