//! Configuration management for dalec-mapper
//!
//! Settings are loaded from environment variables with defaults. Command-line
//! flags override the log level; everything else lives here.
//!
//! # Environment Variables
//!
//! - `DALEC_MAPPER_GITHUB_API`: GitHub API base URL - default: "https://api.github.com"
//! - `DALEC_MAPPER_GITHUB_TOKEN`: API token, falls back to `GITHUB_TOKEN` - optional
//! - `DALEC_MAPPER_REQUEST_TIMEOUT`: Timeout in seconds - default: "10"
//! - `DALEC_MAPPER_FRONTEND`: Frontend image for the `# syntax=` line
//! - `DALEC_MAPPER_PACKAGER`: Packager field - default: "Azure Container Upstream"
//! - `DALEC_MAPPER_VENDOR`: Vendor field - default: "Microsoft Corporation"
//! - `DALEC_MAPPER_LOG_LEVEL`: Logging level - default: "info"

use crate::document::DEFAULT_FRONTEND;
use crate::github::client::DEFAULT_API_URL;
use crate::github::{GitHubClient, GitHubError};
use crate::transform::{TransformOptions, DEFAULT_PACKAGER, DEFAULT_VENDOR};
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("GitHub client initialization failed: {0}")]
    ClientInitError(#[from] GitHubError),
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub request_timeout_secs: u64,
    pub frontend: String,
    pub packager: String,
    pub vendor: String,
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneratorConfig {
    /// Load from `DALEC_MAPPER_*` environment variables with fallbacks
    fn default() -> Self {
        let github_api_url =
            env::var("DALEC_MAPPER_GITHUB_API").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let github_token = env::var("DALEC_MAPPER_GITHUB_TOKEN")
            .or_else(|_| env::var("GITHUB_TOKEN"))
            .ok()
            .filter(|token| !token.is_empty());

        let request_timeout_secs = env::var("DALEC_MAPPER_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let frontend =
            env::var("DALEC_MAPPER_FRONTEND").unwrap_or_else(|_| DEFAULT_FRONTEND.to_string());
        let packager =
            env::var("DALEC_MAPPER_PACKAGER").unwrap_or_else(|_| DEFAULT_PACKAGER.to_string());
        let vendor =
            env::var("DALEC_MAPPER_VENDOR").unwrap_or_else(|_| DEFAULT_VENDOR.to_string());

        let log_level = env::var("DALEC_MAPPER_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            github_api_url,
            github_token,
            request_timeout_secs,
            frontend,
            packager,
            vendor,
            log_level,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.github_api_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "GitHub API URL cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            frontend: self.frontend.clone(),
            packager: self.packager.clone(),
            vendor: self.vendor.clone(),
        }
    }

    pub fn create_client(&self) -> Result<GitHubClient, ConfigError> {
        let client = GitHubClient::new(
            self.github_api_url.as_str(),
            self.github_token.as_deref(),
            self.request_timeout(),
        )?;
        Ok(client)
    }
}

impl fmt::Display for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dalec-mapper Configuration:")?;
        writeln!(f, "  GitHub API: {}", self.github_api_url)?;
        writeln!(
            f,
            "  GitHub Token: {}",
            if self.github_token.is_some() { "****" } else { "(not set)" }
        )?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Frontend: {}", self.frontend)?;
        writeln!(f, "  Packager: {}", self.packager)?;
        writeln!(f, "  Vendor: {}", self.vendor)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets or clears an environment variable, restoring it on drop
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clear_all() -> Vec<EnvGuard> {
        [
            "DALEC_MAPPER_GITHUB_API",
            "DALEC_MAPPER_GITHUB_TOKEN",
            "GITHUB_TOKEN",
            "DALEC_MAPPER_REQUEST_TIMEOUT",
            "DALEC_MAPPER_FRONTEND",
            "DALEC_MAPPER_PACKAGER",
            "DALEC_MAPPER_VENDOR",
            "DALEC_MAPPER_LOG_LEVEL",
        ]
        .iter()
        .map(|key| EnvGuard::unset(key))
        .collect()
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clear_all();

        let config = GeneratorConfig::default();

        assert_eq!(config.github_api_url, DEFAULT_API_URL);
        assert_eq!(config.github_token, None);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.frontend, DEFAULT_FRONTEND);
        assert_eq!(config.packager, DEFAULT_PACKAGER);
        assert_eq!(config.vendor, DEFAULT_VENDOR);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let mut guards = clear_all();
        guards.extend([
            EnvGuard::set("DALEC_MAPPER_GITHUB_API", "https://ghe.example.com/api/v3"),
            EnvGuard::set("DALEC_MAPPER_REQUEST_TIMEOUT", "30"),
            EnvGuard::set("DALEC_MAPPER_PACKAGER", "Example Packager"),
            EnvGuard::set("DALEC_MAPPER_LOG_LEVEL", "DEBUG"),
        ]);

        let config = GeneratorConfig::default();

        assert_eq!(config.github_api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.packager, "Example Packager");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.transform_options().packager, "Example Packager");
    }

    #[test]
    #[serial]
    fn test_token_fallback() {
        let mut guards = clear_all();
        guards.push(EnvGuard::set("GITHUB_TOKEN", "fallback"));
        assert_eq!(GeneratorConfig::default().github_token.as_deref(), Some("fallback"));

        guards.push(EnvGuard::set("DALEC_MAPPER_GITHUB_TOKEN", "primary"));
        assert_eq!(GeneratorConfig::default().github_token.as_deref(), Some("primary"));
    }

    #[test]
    #[serial]
    fn test_validation_failures() {
        let _guards = clear_all();

        let mut config = GeneratorConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.github_api_url = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_display_masks_token() {
        let _guards = clear_all();

        let mut config = GeneratorConfig::default();
        config.github_token = Some("ghp_secret".to_string());
        let display = config.to_string();

        assert!(display.contains("dalec-mapper Configuration:"));
        assert!(display.contains("****"));
        assert!(!display.contains("ghp_secret"));
    }
}
