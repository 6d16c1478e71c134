// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Chat completion client for conduct checks
//!
//! This module posts a single user message to an OpenAI-compatible chat
//! completion endpoint and returns the text content of the first choice. 307
//! redirects are followed explicitly, up to a configured number of hops, with
//! the identical request body.

use std::time::{Duration, Instant};

use reqwest::{
    Client, ClientBuilder, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, LOCATION},
    redirect::Policy,
};
use serde::{Deserialize, Serialize};
use tracing::{Span, debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::{
    config::CheckerConfig,
    error::{CheckerError, CheckerResult, ErrorContext},
};

/// Chat Completion API request
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    /// The model to use for completion
    model: &'a str,
    /// List of messages for the conversation
    messages: Vec<ChatMessage<'a>>,
}

/// A single message in the chat conversation
#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    /// Role of the message sender
    role: &'a str,
    /// Content of the message
    content: &'a str,
}

/// Chat Completion API response
///
/// Every level is optional so that missing pieces are reported individually.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    /// Shared HTTP client with auth headers and timeout applied
    client: Client,
    /// Endpoint requests are first posted to
    endpoint: Url,
    /// Model identifier sent with every request
    model: String,
    /// Request timeout
    timeout: Duration,
    /// Maximum number of 307 redirects followed per request
    max_redirects: u32,
}

impl ChatCompletionClient {
    /// Create a new client from a checker configuration
    pub fn new(config: &CheckerConfig) -> CheckerResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let mut headers = HeaderMap::new();
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose())).map_err(|e| {
                CheckerError::config(format!("Invalid API key format: {e}"))
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Redirects are handled by `complete` so the hop limit and logging stay ours
        let client = ClientBuilder::new()
            .timeout(timeout)
            .default_headers(headers)
            .redirect(Policy::none())
            .user_agent(concat!("conduct-checker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckerError::http(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Created chat completion client for {} with timeout: {}s",
            config.endpoint, config.timeout_seconds
        );

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            timeout,
            max_redirects: config.max_redirects,
        })
    }

    /// Endpoint requests are first posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt as a single user message and return the reply content
    #[instrument(skip(self, prompt), fields(model = %self.model, request_id))]
    pub async fn complete(&self, prompt: &str) -> CheckerResult<String> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", request_id.to_string());

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let body = serde_json::to_string(&request)?;

        debug!(
            request_id = %request_id,
            body = %body,
            "Request to chat completion endpoint"
        );

        let start_time = Instant::now();
        let response_text = self.post_following_redirects(&body, request_id).await?;

        debug!(
            request_id = %request_id,
            duration_ms = start_time.elapsed().as_millis(),
            body = %response_text,
            "Response from chat completion endpoint"
        );

        Self::extract_content(&response_text, request_id)
    }

    /// POST the body, following 307 redirects up to the configured limit
    async fn post_following_redirects(
        &self,
        body: &str,
        request_id: Uuid,
    ) -> CheckerResult<String> {
        let mut url = self.endpoint.clone();
        let mut hops = 0;

        loop {
            let response = self
                .client
                .post(url.clone())
                .body(body.to_owned())
                .send()
                .await
                .map_err(|e| self.transport_error(&e, &url, request_id))?;

            let status = response.status();

            if status == StatusCode::TEMPORARY_REDIRECT {
                if hops >= self.max_redirects {
                    warn!(
                        request_id = %request_id,
                        limit = self.max_redirects,
                        "Giving up after too many redirects"
                    );
                    return Err(CheckerError::TooManyRedirects {
                        limit: self.max_redirects,
                    });
                }

                let next = Self::redirect_target(&url, response.headers())?;
                info!(
                    request_id = %request_id,
                    from = %url,
                    to = %next,
                    "Received 307 redirect from chat completion endpoint"
                );
                url = next;
                hops += 1;
                continue;
            }

            let response_text = response
                .text()
                .await
                .map_err(|e| self.transport_error(&e, &url, request_id))?;

            if status != StatusCode::OK {
                warn!(
                    request_id = %request_id,
                    status = status.as_u16(),
                    "Chat completion endpoint returned an error status"
                );
                return Err(CheckerError::unexpected_status(
                    status.as_u16(),
                    response_text,
                ));
            }

            return Ok(response_text);
        }
    }

    /// Resolve the `Location` header of a 307 response against the current URL
    fn redirect_target(current: &Url, headers: &HeaderMap) -> CheckerResult<Url> {
        let missing = || CheckerError::MissingLocation {
            url: current.to_string(),
        };

        let location = headers
            .get(LOCATION)
            .ok_or_else(missing)?
            .to_str()
            .map_err(|_| missing())?;

        current.join(location).map_err(|e| {
            CheckerError::invalid_response(format!("Invalid Location header '{location}': {e}"))
        })
    }

    fn transport_error(&self, err: &reqwest::Error, url: &Url, request_id: Uuid) -> CheckerError {
        if err.is_timeout() {
            return CheckerError::timeout(self.timeout.as_secs());
        }

        let context = ErrorContext::new()
            .with_request_id(request_id.to_string())
            .with_operation("chat_completion")
            .with_metadata("url", url.as_str());
        warn!(
            request_id = %request_id,
            url = %url,
            failed_at = ?context.timestamp,
            error = %err,
            "Chat completion request failed"
        );
        CheckerError::http_with_context(err, &context)
    }

    /// Pull the first choice's message content out of a response body
    fn extract_content(response_text: &str, request_id: Uuid) -> CheckerResult<String> {
        let context = ErrorContext::new().with_request_id(request_id.to_string());

        let response: Option<ChatCompletionResponse> = serde_json::from_str(response_text)
            .map_err(|e| {
                CheckerError::invalid_response_with_context(
                    format!("Failed to parse response: {e}"),
                    &context,
                )
            })?;

        let response = response.ok_or_else(|| {
            CheckerError::invalid_response_with_context("Response is null", &context)
        })?;

        let choices = response.choices.ok_or_else(|| {
            CheckerError::invalid_response_with_context(
                "Response does not contain 'choices'",
                &context,
            )
        })?;

        if choices.len() > 1 {
            warn!(
                request_id = %request_id,
                choices = choices.len(),
                "More than one choice found in the response. Using the first one."
            );
        }

        let first = choices.into_iter().next().ok_or_else(|| {
            CheckerError::invalid_response_with_context(
                "Response does not contain valid 'choices'",
                &context,
            )
        })?;

        let message = first.message.ok_or_else(|| {
            CheckerError::invalid_response_with_context(
                "Response does not contain 'message'",
                &context,
            )
        })?;

        message.content.ok_or_else(|| {
            CheckerError::invalid_response_with_context(
                "Response does not contain 'content'",
                &context,
            )
        })
    }
}
