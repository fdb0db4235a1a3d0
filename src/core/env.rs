//! Host-supplied environment values
//!
//! The host hands each adapter a bag of named values (endpoint defaults,
//! API keys) resolved from its own secret store. Lookups are
//! case-sensitive and a missing key is not an error at this layer.

use std::collections::HashMap;

/// Named environment values for one adapter invocation
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    values: HashMap<String, String>,
}

impl HostEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the process environment, loading a `.env` file first if
    /// one is present. Intended for standalone use outside a full host.
    pub fn from_process_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            values: std::env::vars().collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for HostEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let env = HostEnv::new().with("localai_api_key", "sk-local");
        assert_eq!(env.get("localai_api_key"), Some("sk-local"));
        assert_eq!(env.get("localai_base_url"), None);
    }
}
