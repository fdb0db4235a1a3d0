//! Host configuration loading
//!
//! This module loads the embedding host's TOML configuration: the log
//! level, named environment defaults (base URL, API key), and the chat
//! adapter's configuration. Everything is validated at load so adapters
//! can trust the values they receive.

use crate::core::env::HostEnv;
use crate::models::chat::ChatCompletionsConfiguration;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

/// Host configuration loaded from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// HTTP request timeout in seconds for the completions client
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Named environment values (endpoint defaults, API keys)
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Chat-completion adapter configuration
    #[serde(default)]
    pub chat_completions: ChatCompletionsConfiguration,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

impl HostConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// chat-completion section fails its bounds validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;

        let config: HostConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        config
            .chat_completions
            .validate()
            .context("Invalid [chat_completions] configuration")?;

        Ok(config)
    }

    /// Load configuration from the path in `CONFIG_PATH`, falling back to
    /// `config.toml` in the current directory.
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_file(config_path)
    }

    /// The `[env]` table as a `HostEnv` ready to hand to adapters
    pub fn host_env(&self) -> HostEnv {
        self.env
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::env_key;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = write_config(
            r#"
            log_level = "debug"

            [env]
            localai_base_url = "http://localhost:8080/v1"
            localai_api_key = "sk-local"

            [chat_completions]
            model = "ggml-gpt4all-j"
            max_tokens = 512
            temperature = 0.2
            stream = true
        "#,
        );
        let config = HostConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout, 90);
        assert_eq!(config.chat_completions.max_tokens, 512);
        assert!(config.chat_completions.stream);
        assert_eq!(
            config.host_env().get(env_key::BASE_URL),
            Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let file = write_config("");
        let config = HostConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.chat_completions.model, "ggml-gpt4all-j");
        assert!(config.host_env().get(env_key::BASE_URL).is_none());
    }

    #[test]
    fn test_out_of_bounds_chat_section_is_rejected() {
        let file = write_config(
            r#"
            [chat_completions]
            temperature = 3.5
        "#,
        );
        assert!(HostConfig::from_file(file.path()).is_err());
    }
}
