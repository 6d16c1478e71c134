// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Code of conduct checker command line tool
//!
//! Loads the checker configuration, reads the message and the code of conduct
//! from the command line and prints the verdict as JSON.

pub mod cli;
pub mod config;

use anyhow::{Context, Result};
use conduct_checker::{
    CheckResult, ConductChecker, FileCodeOfConduct, Message, OpenAiConductChecker,
};
use ::config::Map;
use tokio::fs;
use tracing::info;

pub use cli::Cli;
pub use self::config::{CONFIG_FILE, ENV_PREFIX, load_config};

/// Run one check as described by the command line
///
/// `env` replaces the process environment when given.
///
/// # Errors
///
/// Returns an error if the configuration, message body, or code of conduct
/// cannot be loaded, or if the check itself fails
pub async fn run(cli: &Cli, env: Option<Map<String, String>>) -> Result<CheckResult> {
    let checker_config = load_config(cli.config.as_deref(), cli.model.as_deref(), env)?;

    let body = match (&cli.body, &cli.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read message body from {}", path.display()))?,
        (None, None) => anyhow::bail!("either --body or --body-file must be given"),
    };

    let provider = FileCodeOfConduct::from_file(&cli.code_of_conduct)
        .await
        .context("failed to load code of conduct")?;
    let checker = OpenAiConductChecker::new(checker_config, provider)
        .await
        .context("failed to create conduct checker")?;

    info!("Checking message '{}' with {} checker", cli.title, checker.name());

    let result = checker.check(&Message::new(cli.title.clone(), body)).await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use conduct_checker::ViolationState;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use super::*;

    const CHAT_PATH: &str = "/v1/chat/completions";

    fn env(server_uri: &str) -> Option<Map<String, String>> {
        Some(
            [
                ("CONDUCT_API_KEY", "sk-test-key".to_string()),
                ("CONDUCT_ENDPOINT", format!("{server_uri}{CHAT_PATH}")),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        )
    }

    async fn code_of_conduct(dir: &TempDir) -> String {
        let path = dir.path().join("CODE_OF_CONDUCT.md");
        tokio::fs::write(&path, "# Code of Conduct\n\nBe respectful.")
            .await
            .unwrap();
        path.display().to_string()
    }

    fn verdict(result: &str, reason: &str) -> ResponseTemplate {
        let content = json!({"result": result, "reason": reason}).to_string();
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": content}}]
        }))
    }

    #[tokio::test]
    async fn run_uses_model_from_command_line() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(body_partial_json(json!({"model": "gpt-4o"})))
            .respond_with(verdict("NONE", "friendly greeting"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        let coc = code_of_conduct(&dir).await;
        let cli = Cli::try_parse_from([
            "conduct-check",
            "--title",
            "Hello",
            "--body",
            "Nice to meet you all",
            "--code-of-conduct",
            &coc,
            "--model",
            "gpt-4o",
        ])
        .unwrap();

        let result = run(&cli, env(&mock_server.uri())).await.unwrap();

        assert_eq!(result.violation_state(), ViolationState::None);
        assert_eq!(result.reason(), "friendly greeting");
        assert_eq!(result.message().title(), "Hello");
        assert_eq!(result.message().message(), "Nice to meet you all");
    }

    #[tokio::test]
    async fn run_reads_body_file() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(verdict("SEVERE", "insults"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        let coc = code_of_conduct(&dir).await;
        let body_path = dir.path().join("message.txt");
        tokio::fs::write(&body_path, "You are all idiots").await.unwrap();
        let body_path = body_path.display().to_string();

        let cli = Cli::try_parse_from([
            "conduct-check",
            "--title",
            "Rant",
            "--body-file",
            &body_path,
            "--code-of-conduct",
            &coc,
            "--model",
            "gpt-4o-mini",
        ])
        .unwrap();

        let result = run(&cli, env(&mock_server.uri())).await.unwrap();

        assert_eq!(result.violation_state(), ViolationState::Severe);
        assert_eq!(result.message().message(), "You are all idiots");
    }

    #[tokio::test]
    async fn run_without_model_fails_before_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(verdict("NONE", "unused"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        let coc = code_of_conduct(&dir).await;
        let cli = Cli::try_parse_from([
            "conduct-check",
            "--title",
            "Hello",
            "--body",
            "Hi",
            "--code-of-conduct",
            &coc,
        ])
        .unwrap();

        let err = run(&cli, env(&mock_server.uri())).await.unwrap_err();
        assert!(format!("{err:#}").contains("model"));
    }
}
