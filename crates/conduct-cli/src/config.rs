// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Layered checker configuration
//!
//! Sources, later ones overriding earlier ones:
//! 1. Default values
//! 2. Configuration file (`conduct.json`, or the path given with `--config`)
//! 3. Environment variables with the `CONDUCT_` prefix, e.g. `CONDUCT_API_KEY`
//! 4. The `--model` command line override

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use conduct_checker::{
    CheckerConfig,
    config::{DEFAULT_ENDPOINT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECONDS},
};
use tracing::debug;

/// Configuration file looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "conduct.json";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "CONDUCT";

/// Load and validate the checker configuration
///
/// `model` overrides every other source. `env` replaces the process
/// environment when given.
///
/// # Errors
///
/// Returns an error if an explicitly named file is missing, a source cannot be
/// parsed, a required value is absent, or the result fails validation
pub fn load_config(
    path: Option<&Path>,
    model: Option<&str>,
    env: Option<Map<String, String>>,
) -> Result<CheckerConfig> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(CONFIG_FILE).required(false),
    };

    let config = Config::builder()
        .set_default("endpoint", DEFAULT_ENDPOINT)?
        .set_default("timeout_seconds", DEFAULT_TIMEOUT_SECONDS)?
        .set_default("max_redirects", u64::from(DEFAULT_MAX_REDIRECTS))?
        .add_source(file)
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true).source(env))
        .set_override_option("model", model)?
        .build()
        .context("failed to load configuration")?;

    let checker_config: CheckerConfig = config.try_deserialize().with_context(|| {
        format!("invalid configuration (api_key and model are required, e.g. {ENV_PREFIX}_API_KEY)")
    })?;
    checker_config.validate()?;

    debug!(
        endpoint = %checker_config.endpoint,
        model = %checker_config.model,
        timeout_seconds = checker_config.timeout_seconds,
        max_redirects = checker_config.max_redirects,
        "Loaded checker configuration"
    );

    Ok(checker_config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_with_environment() {
        let config = load_config(
            None,
            None,
            env(&[("CONDUCT_API_KEY", "sk-env"), ("CONDUCT_MODEL", "gpt-4o-mini")]),
        )
        .unwrap();

        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.api_key.expose(), "sk-env");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert!(config.prompt_path.is_none());
    }

    #[test]
    fn file_values_are_loaded() {
        let file = json_file(
            r#"{
                "endpoint": "https://llm.internal/v1/chat/completions",
                "api_key": "sk-file",
                "model": "gpt-4o",
                "timeout_seconds": 15,
                "max_redirects": 2
            }"#,
        );

        let config = load_config(Some(file.path()), None, env(&[])).unwrap();

        assert_eq!(
            config.endpoint.as_str(),
            "https://llm.internal/v1/chat/completions"
        );
        assert_eq!(config.api_key.expose(), "sk-file");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_seconds, 15);
        assert_eq!(config.max_redirects, 2);
    }

    #[test]
    fn environment_overrides_file() {
        let file = json_file(r#"{"api_key": "sk-file", "model": "gpt-4o", "timeout_seconds": 15}"#);

        let config = load_config(
            Some(file.path()),
            None,
            env(&[("CONDUCT_MODEL", "gpt-4o-mini"), ("CONDUCT_TIMEOUT_SECONDS", "90")]),
        )
        .unwrap();

        assert_eq!(config.api_key.expose(), "sk-file");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_seconds, 90);
    }

    #[test]
    fn model_from_command_line_only() {
        let config =
            load_config(None, Some("gpt-4o"), env(&[("CONDUCT_API_KEY", "sk-env")])).unwrap();

        assert_eq!(config.api_key.expose(), "sk-env");
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn model_from_command_line_overrides_file_and_environment() {
        let file = json_file(r#"{"api_key": "sk-file", "model": "gpt-4o"}"#);

        let config = load_config(
            Some(file.path()),
            Some("gpt-4.1"),
            env(&[("CONDUCT_MODEL", "gpt-4o-mini")]),
        )
        .unwrap();

        assert_eq!(config.model, "gpt-4.1");
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let result = load_config(None, None, env(&[("API_KEY", "sk-env"), ("MODEL", "gpt-4o")]));
        assert!(result.is_err());
    }

    #[test]
    fn missing_api_key_fails() {
        let err = load_config(None, None, env(&[("CONDUCT_MODEL", "gpt-4o")])).unwrap_err();
        assert!(format!("{err:#}").contains("CONDUCT_API_KEY"));
    }

    #[test]
    fn blank_api_key_fails() {
        let err = load_config(
            None,
            None,
            env(&[("CONDUCT_API_KEY", "  "), ("CONDUCT_MODEL", "gpt-4o")]),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("apiKey must not be blank"));
    }

    #[test]
    fn out_of_range_timeout_fails() {
        let err = load_config(
            None,
            None,
            env(&[
                ("CONDUCT_API_KEY", "sk-env"),
                ("CONDUCT_MODEL", "gpt-4o"),
                ("CONDUCT_TIMEOUT_SECONDS", "0"),
            ]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid timeout"));
    }

    #[test]
    fn missing_explicit_file_fails() {
        let result = load_config(Some(Path::new("/non/existent/conduct.json")), None, env(&[]));
        assert!(result.is_err());
    }
}
