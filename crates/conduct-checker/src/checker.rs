// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! LLM-backed conduct checker
//!
//! [`OpenAiConductChecker`] renders the prompt template with the message and
//! the current code of conduct, sends it to a chat completion endpoint and
//! turns the model's reply into a [`CheckResult`].

use std::{sync::Arc, time::Instant};

use shared_types::{CheckResult, Message, TextfileType};
use tracing::{debug, info, instrument};

use crate::{
    config::CheckerConfig,
    error::{CheckerError, CheckerResult},
    openai::ChatCompletionClient,
    prompt::PromptTemplate,
    provider::CodeOfConductProvider,
    verdict::parse_verdict,
};

/// Checks messages against a code of conduct
pub trait ConductChecker: Send + Sync {
    /// Judge whether the message violates the code of conduct
    ///
    /// # Errors
    ///
    /// Returns an error if the code of conduct is unavailable in a supported
    /// format, the endpoint call fails, or the verdict cannot be parsed
    fn check(&self, message: &Message) -> impl Future<Output = CheckerResult<CheckResult>> + Send;

    /// Get the name/identifier of this checker
    fn name(&self) -> &'static str;
}

/// Conduct checker backed by an OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConductChecker<P> {
    client: ChatCompletionClient,
    prompt: Arc<PromptTemplate>,
    provider: Arc<P>,
}

impl<P: CodeOfConductProvider> OpenAiConductChecker<P> {
    /// Code of conduct formats the prompt can embed, in order of preference
    pub const SUPPORTED_FORMATS: &'static [TextfileType] = &[TextfileType::Markdown];

    /// Create a checker, loading the prompt template named by the configuration
    ///
    /// Falls back to the bundled template when no `prompt_path` is configured.
    #[instrument(skip_all, fields(model = %config.model, endpoint = %config.endpoint))]
    pub async fn new(config: CheckerConfig, provider: P) -> CheckerResult<Self> {
        config.validate()?;

        let prompt = match &config.prompt_path {
            Some(path) => PromptTemplate::from_file(path).await?,
            None => PromptTemplate::bundled()?,
        };

        Self::build(&config, prompt, provider)
    }

    /// Create a checker with an already parsed prompt template
    pub fn with_prompt(
        config: &CheckerConfig,
        prompt: PromptTemplate,
        provider: P,
    ) -> CheckerResult<Self> {
        config.validate()?;
        Self::build(config, prompt, provider)
    }

    // Expects a validated configuration
    fn build(config: &CheckerConfig, prompt: PromptTemplate, provider: P) -> CheckerResult<Self> {
        info!("Using chat completion API with model: {}", config.model);
        info!("Using chat completion API with endpoint: {}", config.endpoint);

        Ok(Self {
            client: ChatCompletionClient::new(config)?,
            prompt: Arc::new(prompt),
            provider: Arc::new(provider),
        })
    }

    /// The code of conduct provider used by this checker
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build the prompt for a message from the current code of conduct
    pub fn create_prompt(&self, message: &Message) -> CheckerResult<String> {
        let format = Self::SUPPORTED_FORMATS
            .iter()
            .copied()
            .find(|format| self.provider.supports(*format))
            .ok_or_else(|| CheckerError::unsupported_format(TextfileType::Markdown))?;

        let code_of_conduct = self.provider.code_of_conduct(format)?;
        debug!(
            format = %format,
            code_of_conduct_bytes = code_of_conduct.len(),
            "Rendering conduct prompt"
        );

        Ok(self
            .prompt
            .render(message.title(), message.message(), &code_of_conduct))
    }
}

impl<P: CodeOfConductProvider> ConductChecker for OpenAiConductChecker<P> {
    #[instrument(skip_all, fields(title = %message.title()))]
    async fn check(&self, message: &Message) -> CheckerResult<CheckResult> {
        let start_time = Instant::now();

        let prompt = self.create_prompt(message)?;
        let content = self.client.complete(&prompt).await?;
        let verdict = parse_verdict(&content)?;

        info!(
            violation_state = %verdict.state,
            reason = %verdict.reason,
            duration_ms = start_time.elapsed().as_millis(),
            "Conduct check completed"
        );

        Ok(CheckResult::new(message.clone(), verdict.state, verdict.reason))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
