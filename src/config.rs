//! Enumeration configuration
//!
//! Settings for a [`JoinEnumerator`](crate::JoinEnumerator) run: worker pool
//! sizing, search-space verification and progress reporting. Configuration can
//! be loaded from a JSON file, from environment variables or from an inline
//! JSON string, and is validated before use.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_WORKER_THREADS: &str = "JOIN_ENUM_WORKER_THREADS";
pub const ENV_VERIFY_SEARCH_SPACE: &str = "JOIN_ENUM_VERIFY_SEARCH_SPACE";
pub const ENV_THREAD_PREFIX: &str = "JOIN_ENUM_THREAD_PREFIX";

/// Configuration source types
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Configuration from a JSON file
    File(PathBuf),
    /// Configuration from environment variables
    Environment,
    /// Inline JSON configuration
    Inline(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumeratorConfig {
    /// Dedicated worker pool size. `None` runs on the global rayon pool,
    /// which is sized to the available hardware parallelism.
    pub worker_threads: Option<usize>,
    pub thread_name_prefix: String,
    /// Check that the generated orders and templates have exactly
    /// n! and Catalan(n-1) elements before dispatching work.
    pub verify_search_space: bool,
    /// Emit an `info!` event roughly every tenth of the leaf orders.
    pub log_progress: bool,
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name_prefix: "join-enum".to_string(),
            verify_search_space: true,
            log_progress: true,
        }
    }
}

impl EnumeratorConfig {
    /// Load configuration from source
    pub fn load(source: &ConfigSource) -> Result<Self> {
        let config = match source {
            ConfigSource::File(path) => Self::load_from_file(path)?,
            ConfigSource::Environment => Self::load_from_env()?,
            ConfigSource::Inline(content) => Self::parse(content)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Io(e.to_string()))?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Config(format!("JSON parse error: {}", e)))
    }

    fn load_from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(threads) = std::env::var(ENV_WORKER_THREADS) {
            let threads = threads
                .parse()
                .map_err(|_| Error::Config(format!("Invalid {}: {}", ENV_WORKER_THREADS, threads)))?;
            config.worker_threads = Some(threads);
        }

        if let Ok(verify) = std::env::var(ENV_VERIFY_SEARCH_SPACE) {
            config.verify_search_space = verify
                .parse()
                .map_err(|_| Error::Config(format!("Invalid {}: {}", ENV_VERIFY_SEARCH_SPACE, verify)))?;
        }

        if let Ok(prefix) = std::env::var(ENV_THREAD_PREFIX) {
            config.thread_name_prefix = prefix;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == Some(0) {
            return Err(Error::Config(
                "Worker pool must have at least 1 thread".into(),
            ));
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::Config("Thread name prefix must not be empty".into()));
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Configuration builder for fluent API
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: EnumeratorConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run on a dedicated pool of `threads` workers
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = Some(threads);
        self
    }

    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn verify_search_space(mut self, enabled: bool) -> Self {
        self.config.verify_search_space = enabled;
        self
    }

    pub fn log_progress(mut self, enabled: bool) -> Self {
        self.config.log_progress = enabled;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<EnumeratorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .worker_threads(4)
            .thread_name_prefix("enum-worker")
            .verify_search_space(false)
            .build()
            .unwrap();

        assert_eq!(config.worker_threads, Some(4));
        assert_eq!(config.thread_name_prefix, "enum-worker");
        assert!(!config.verify_search_space);
        assert!(config.log_progress);
    }

    #[test]
    fn test_config_validation() {
        assert!(EnumeratorConfig::default().validate().is_ok());

        let zero_threads = ConfigBuilder::new().worker_threads(0).build();
        assert!(matches!(zero_threads, Err(Error::Config(_))));

        let mut empty_prefix = EnumeratorConfig::default();
        empty_prefix.thread_name_prefix.clear();
        assert!(empty_prefix.validate().is_err());
    }

    #[test]
    fn test_inline_config_uses_defaults_for_missing_fields() {
        let config =
            EnumeratorConfig::load(&ConfigSource::Inline(r#"{"worker_threads": 2}"#.into()))
                .unwrap();

        assert_eq!(config.worker_threads, Some(2));
        assert!(config.verify_search_space);
        assert_eq!(config.thread_name_prefix, "join-enum");
    }

    #[test]
    fn test_inline_config_rejects_garbage() {
        let result = EnumeratorConfig::load(&ConfigSource::Inline("not json".into()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_file_config_round_trip() {
        let config = ConfigBuilder::new().worker_threads(3).build().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = EnumeratorConfig::load(&ConfigSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EnumeratorConfig::load(&ConfigSource::File(dir.path().join("absent.json")));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
