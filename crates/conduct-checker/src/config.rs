// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the LLM-backed conduct checker
//!
//! The configuration is fixed once a checker is constructed: endpoint, API key,
//! model, request timeout, redirect limit and prompt template location.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;
use url::Url;

use crate::error::{CheckerError, CheckerResult};

/// Default chat completion endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Default number of 307 redirects followed before giving up
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Upper bound accepted for `max_redirects`
pub const MAX_REDIRECTS_LIMIT: u32 = 20;

/// An API key that is guaranteed to contain at least one non-whitespace character
///
/// The key never appears in `Debug` output or serialized configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Box<str>);

impl ApiKey {
    /// Create a new API key, rejecting blank values
    pub fn new(key: impl Into<String>) -> CheckerResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(CheckerError::config("apiKey must not be blank"));
        }
        Ok(Self(key.into_boxed_str()))
    }

    /// Get the raw key
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl Serialize for ApiKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("***")
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        Self::new(key).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

/// Checker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Chat completion endpoint the prompt is posted to
    pub endpoint: Url,
    /// Bearer token for the endpoint
    pub api_key: ApiKey,
    /// Model identifier sent with every request
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Maximum number of 307 redirects followed for a single check
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
    /// Prompt template file overriding the bundled one
    #[serde(default)]
    pub prompt_path: Option<PathBuf>,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_max_redirects() -> u32 {
    DEFAULT_MAX_REDIRECTS
}

impl CheckerConfig {
    /// Create a configuration for the given endpoint, key and model
    pub fn new(endpoint: Url, api_key: ApiKey, model: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_key,
            model: model.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            prompt_path: None,
        }
    }

    /// Create a configuration targeting the default OpenAI endpoint
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> CheckerResult<Self> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|e| CheckerError::config(format!("Invalid default endpoint: {e}")))?;
        Ok(Self::new(endpoint, ApiKey::new(api_key)?, model))
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the maximum number of redirects followed per check
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Load the prompt template from a file instead of the bundled one
    pub fn with_prompt_path(mut self, path: impl AsRef<Path>) -> Self {
        self.prompt_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> CheckerResult<()> {
        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(CheckerError::config(format!(
                "Invalid endpoint scheme '{}' (must be http or https)",
                self.endpoint.scheme()
            )));
        }

        if self.model.trim().is_empty() {
            return Err(CheckerError::config("model must not be blank"));
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(CheckerError::config(format!(
                "Invalid timeout: {} seconds (must be 1-300)",
                self.timeout_seconds
            )));
        }

        if self.max_redirects > MAX_REDIRECTS_LIMIT {
            return Err(CheckerError::config(format!(
                "Invalid max_redirects: {} (must be 0-{MAX_REDIRECTS_LIMIT})",
                self.max_redirects
            )));
        }

        if let Some(path) = &self.prompt_path
            && !path.is_file()
        {
            return Err(CheckerError::config(format!(
                "Prompt template file not found: {}",
                path.display()
            )));
        }

        if self.endpoint.scheme() == "http" {
            warn!(
                endpoint = %self.endpoint,
                "Endpoint uses plain http, the API key will be sent unencrypted"
            );
        }

        Ok(())
    }
}
