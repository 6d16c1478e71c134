// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

/// Check a message against a code of conduct with an LLM
#[derive(Debug, Clone, Parser)]
#[command(name = "conduct-check", version, about)]
pub struct Cli {
    /// Title of the message
    #[arg(long)]
    pub title: String,

    /// Message body
    #[arg(long, conflicts_with = "body_file", required_unless_present = "body_file")]
    pub body: Option<String>,

    /// Read the message body from a file
    #[arg(long, value_name = "PATH")]
    pub body_file: Option<PathBuf>,

    /// Code of conduct document (format inferred from the extension)
    #[arg(long, value_name = "PATH")]
    pub code_of_conduct: PathBuf,

    /// Configuration file, replaces the optional `conduct.json` lookup
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_inline_body() {
        let cli = Cli::try_parse_from([
            "conduct-check",
            "--title",
            "Hello",
            "--body",
            "Nice to meet you",
            "--code-of-conduct",
            "CODE_OF_CONDUCT.md",
        ])
        .unwrap();

        assert_eq!(cli.title, "Hello");
        assert_eq!(cli.body.as_deref(), Some("Nice to meet you"));
        assert!(cli.body_file.is_none());
        assert_eq!(cli.code_of_conduct, PathBuf::from("CODE_OF_CONDUCT.md"));
    }

    #[test]
    fn parses_body_file_and_overrides() {
        let cli = Cli::try_parse_from([
            "conduct-check",
            "--title",
            "Hello",
            "--body-file",
            "message.txt",
            "--code-of-conduct",
            "CODE_OF_CONDUCT.md",
            "--config",
            "prod.json",
            "--model",
            "gpt-4o",
        ])
        .unwrap();

        assert_eq!(cli.body_file, Some(PathBuf::from("message.txt")));
        assert_eq!(cli.config, Some(PathBuf::from("prod.json")));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn body_is_required() {
        let result = Cli::try_parse_from([
            "conduct-check",
            "--title",
            "Hello",
            "--code-of-conduct",
            "CODE_OF_CONDUCT.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn body_and_body_file_conflict() {
        let result = Cli::try_parse_from([
            "conduct-check",
            "--title",
            "Hello",
            "--body",
            "inline",
            "--body-file",
            "message.txt",
            "--code-of-conduct",
            "CODE_OF_CONDUCT.md",
        ]);
        assert!(result.is_err());
    }
}
