//! Structured logging setup for dalec-mapper
//!
//! Logs always go to stderr so a generated spec written to stdout stays
//! clean. The subscriber can only be installed once per process.
//!
//! Configuration:
//! - `DALEC_MAPPER_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
//! - `DALEC_MAPPER_LOG_JSON` - Use JSON output (true/false)
//! - `RUST_LOG` - Standard filtering, replaces the built-in directives

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// HTTP stack crates that are only interesting when something breaks
const NOISY_TARGETS: &[&str] = &["h2", "hyper", "reqwest"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for this crate's events
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., dalec_mapper::transform) in logs
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Level and format from the environment
    pub fn from_env() -> Self {
        let level = env::var("DALEC_MAPPER_LOG_LEVEL")
            .map(|s| parse_level(&s))
            .unwrap_or(Level::INFO);

        let use_json = env::var("DALEC_MAPPER_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }
}

/// Parses a log level, defaulting to INFO for unknown input
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Directives applied when `RUST_LOG` is not set
fn default_directives(level: Level) -> Vec<Directive> {
    std::iter::once(format!("dalec_mapper={}", level))
        .chain(NOISY_TARGETS.iter().map(|target| format!("{}=warn", target)))
        .filter_map(|directive| directive.parse().ok())
        .collect()
}

pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            for directive in default_directives(config.level) {
                filter = filter.add_directive(directive);
            }
        }

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_default_directives() {
        let directives: Vec<String> = default_directives(Level::DEBUG)
            .iter()
            .map(|directive| directive.to_string().to_lowercase())
            .collect();

        assert_eq!(
            directives,
            vec!["dalec_mapper=debug", "h2=warn", "hyper=warn", "reqwest=warn"]
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("DALEC_MAPPER_LOG_LEVEL", "trace");
        env::set_var("DALEC_MAPPER_LOG_JSON", "true");

        let config = LoggingConfig::from_env();

        env::remove_var("DALEC_MAPPER_LOG_LEVEL");
        env::remove_var("DALEC_MAPPER_LOG_JSON");

        assert_eq!(config.level, Level::TRACE);
        assert!(config.use_json);
        assert!(config.include_target);
    }
}
