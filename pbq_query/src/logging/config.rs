//! Logging configuration
//!
//! Compile-time limits come from `config::compile_time::logging`; user
//! preferences are set once at startup and fall back to environment defaults.

use crate::config::compile_time::logging::LOG_BUFFER_SIZE;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();
static DEFAULT_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences. Can only succeed once per process.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Preferences set at startup, else the environment defaults read once
fn get_runtime_preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES
        .get()
        .unwrap_or_else(|| DEFAULT_PREFERENCES.get_or_init(LoggingPreferences::default))
}

pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn get_log_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn validate_config() -> Result<(), String> {
    if !(100..=100_000).contains(&LOG_BUFFER_SIZE) {
        return Err(format!("Log buffer size out of range: {}", LOG_BUFFER_SIZE));
    }
    Ok(())
}

/// Configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         - Log buffer size: {}\n\
         - Min log level: {}\n\
         - Structured logging: {}\n\
         - Console logging: {}",
        LOG_BUFFER_SIZE,
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_preferences_resolve_to_one_instance() {
        let first = get_runtime_preferences();
        let second = get_runtime_preferences();
        assert!(std::ptr::eq(first, second));
        assert_eq!(get_min_log_level(), first.min_log_level.to_events_log_level());
    }

    #[test]
    fn test_summary_lists_preferences() {
        let summary = get_config_summary();
        assert!(summary.contains("Log buffer size: 10000"));
        assert!(summary.contains("Min log level"));
    }
}
