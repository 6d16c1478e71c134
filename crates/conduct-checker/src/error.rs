// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for conduct checking operations
//!
//! Every failure is terminal for the check that raised it. The variants are
//! grouped into configuration, unsupported input, transport, and protocol
//! failures; see the `is_*_error` classifiers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared_types::{TextfileType, ViolationStateParseError};
use thiserror::Error;

/// Result type alias for conduct checking operations
pub type CheckerResult<T> = Result<T, CheckerError>;

/// Error context with request correlation
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request ID for correlation across logs
    pub request_id: Option<String>,
    /// Operation that failed
    pub operation: Option<String>,
    /// Timestamp when error occurred
    pub timestamp: Option<DateTime<Utc>>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
}

impl ErrorContext {
    /// Create new error context
    pub fn new() -> Self {
        Self {
            request_id: None,
            operation: None,
            timestamp: Some(Utc::now()),
            metadata: HashMap::new(),
        }
    }

    /// Set request ID for correlation
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set operation name
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Add metadata key-value pair
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    fn suffix(&self) -> String {
        let mut suffix = String::new();

        if let Some(request_id) = &self.request_id {
            suffix.push_str(&format!(" [request_id: {request_id}]"));
        }

        if let Some(operation) = &self.operation {
            suffix.push_str(&format!(" [operation: {operation}]"));
        }

        let mut metadata: Vec<_> = self.metadata.iter().collect();
        metadata.sort();
        for (key, value) in metadata {
            suffix.push_str(&format!(" [{key}: {value}]"));
        }

        suffix
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types for conduct checking operations
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Invalid or incomplete checker configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The code of conduct is not available in a format the checker understands
    #[error("Unsupported code of conduct format: {format}")]
    UnsupportedFormat { format: String },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// Request timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// The endpoint answered with a status other than 200 or 307
    #[error("Error calling chat completion endpoint (HTTP {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// A 307 redirect was received without a `Location` header
    #[error("No Location header found in 307 response from {url}")]
    MissingLocation { url: String },

    /// The endpoint kept redirecting past the configured limit
    #[error("Too many redirects: gave up after {limit} hops")]
    TooManyRedirects { limit: u32 },

    /// The response body does not have the expected structure
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// The model named a violation state that is not known
    #[error("Unknown violation state in model reply: '{value}'")]
    UnknownViolationState { value: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {message}")]
    Json { message: String },

    /// I/O error (file operations)
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl CheckerError {
    /// Create a configuration error
    pub fn config<T: ToString>(message: T) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(format: TextfileType) -> Self {
        Self::UnsupportedFormat {
            format: format.to_string(),
        }
    }

    /// Create an HTTP error
    pub fn http<T: ToString>(message: T) -> Self {
        Self::Http {
            message: message.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Create an unexpected status error carrying the raw response body
    pub fn unexpected_status<T: ToString>(status: u16, body: T) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.to_string(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response<T: ToString>(message: T) -> Self {
        Self::InvalidResponse {
            message: message.to_string(),
        }
    }

    /// Create an I/O error
    pub fn io<T: ToString>(message: T) -> Self {
        Self::Io {
            message: message.to_string(),
        }
    }

    /// Create an HTTP error with context
    pub fn http_with_context<T: ToString>(message: T, context: &ErrorContext) -> Self {
        Self::Http {
            message: format!("{}{}", message.to_string(), context.suffix()),
        }
    }

    /// Create an invalid response error with context
    pub fn invalid_response_with_context<T: ToString>(message: T, context: &ErrorContext) -> Self {
        Self::InvalidResponse {
            message: format!("{}{}", message.to_string(), context.suffix()),
        }
    }

    /// Check if this error was raised while validating configuration or loading resources
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CheckerError::Configuration { .. } | CheckerError::Io { .. }
        )
    }

    /// Check if this error indicates the code of conduct format is not supported
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, CheckerError::UnsupportedFormat { .. })
    }

    /// Check if this error happened while talking to the endpoint
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            CheckerError::Http { .. }
                | CheckerError::Timeout { .. }
                | CheckerError::UnexpectedStatus { .. }
        )
    }

    /// Check if the endpoint answered with something that could not be interpreted
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            CheckerError::MissingLocation { .. }
                | CheckerError::TooManyRedirects { .. }
                | CheckerError::InvalidResponse { .. }
                | CheckerError::UnknownViolationState { .. }
                | CheckerError::Json { .. }
        )
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            CheckerError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convert from JSON errors
impl From<serde_json::Error> for CheckerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

impl From<ViolationStateParseError> for CheckerError {
    fn from(err: ViolationStateParseError) -> Self {
        Self::UnknownViolationState { value: err.0 }
    }
}
