// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prompt template with title, message and code of conduct slots
//!
//! A template is plain text containing the placeholders `{{title}}`,
//! `{{message}}` and `{{code_of_conduct}}`, each exactly once and in that
//! order. The template is split into literal segments when it is parsed, so
//! rendering never rescans substituted text for placeholders.

use std::{fmt, path::Path, sync::LazyLock};

use regex::Regex;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{CheckerError, CheckerResult};

/// Prompt template shipped with the crate
pub const BUNDLED_PROMPT: &str = include_str!("../assets/prompt.txt");

static SLOT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").expect("slot regex is valid"));

/// Substitution points of a prompt template, in the order they must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Title of the checked message
    Title,
    /// Body of the checked message
    Message,
    /// Code of conduct text
    CodeOfConduct,
}

impl Slot {
    const ORDER: [Slot; 3] = [Slot::Title, Slot::Message, Slot::CodeOfConduct];

    /// Placeholder name as written inside `{{ }}`
    pub const fn name(self) -> &'static str {
        match self {
            Slot::Title => "title",
            Slot::Message => "message",
            Slot::CodeOfConduct => "code_of_conduct",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|slot| slot.name() == name)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.name())
    }
}

/// A parsed prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Literal text around the slots: before title, between title and message,
    /// between message and code of conduct, after code of conduct
    segments: [String; 4],
}

impl PromptTemplate {
    /// Parse the template bundled with the crate
    pub fn bundled() -> CheckerResult<Self> {
        Self::parse(BUNDLED_PROMPT)
    }

    /// Read and parse a template from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> CheckerResult<Self> {
        let path = path.as_ref();
        debug!("Loading prompt template from: {}", path.display());

        let content = fs::read_to_string(path).await.map_err(|e| {
            CheckerError::config(format!(
                "Error loading prompt file {}: {}",
                path.display(),
                e
            ))
        })?;

        let template = Self::parse(&content)?;
        info!(
            "Loaded prompt template with {} bytes from {}",
            content.len(),
            path.display()
        );
        Ok(template)
    }

    /// Parse template text, validating that every slot appears exactly once in order
    pub fn parse(text: &str) -> CheckerResult<Self> {
        let mut segments: [String; 4] = Default::default();
        let mut cursor = 0;
        let mut found = 0;

        for captures in SLOT_REGEX.captures_iter(text) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            let slot = Slot::from_name(name.as_str()).ok_or_else(|| {
                CheckerError::config(format!(
                    "Unknown placeholder '{}' in prompt template",
                    whole.as_str()
                ))
            })?;

            match Slot::ORDER.get(found) {
                Some(expected) if *expected == slot => {}
                Some(expected) => {
                    return Err(CheckerError::config(format!(
                        "Prompt template placeholder {slot} found where {expected} was expected"
                    )));
                }
                None => {
                    return Err(CheckerError::config(format!(
                        "Prompt template contains placeholder {slot} more than once"
                    )));
                }
            }

            segments[found] = text[cursor..whole.start()].to_string();
            cursor = whole.end();
            found += 1;
        }

        if let Some(missing) = Slot::ORDER.get(found) {
            return Err(CheckerError::config(format!(
                "Prompt template is missing placeholder {missing}"
            )));
        }

        segments[3] = text[cursor..].to_string();
        Ok(Self { segments })
    }

    /// Substitute title, message body and code of conduct into the template
    pub fn render(&self, title: &str, message: &str, code_of_conduct: &str) -> String {
        let capacity = self.segments.iter().map(String::len).sum::<usize>()
            + title.len()
            + message.len()
            + code_of_conduct.len();

        let mut prompt = String::with_capacity(capacity);
        prompt.push_str(&self.segments[0]);
        prompt.push_str(title);
        prompt.push_str(&self.segments[1]);
        prompt.push_str(message);
        prompt.push_str(&self.segments[2]);
        prompt.push_str(code_of_conduct);
        prompt.push_str(&self.segments[3]);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn bundled_template_parses() {
        let template = PromptTemplate::bundled().unwrap();
        let prompt = template.render("TITLE-X", "BODY-Y", "COC-Z");

        assert_eq!(prompt.matches("TITLE-X").count(), 1);
        assert_eq!(prompt.matches("BODY-Y").count(), 1);
        assert_eq!(prompt.matches("COC-Z").count(), 1);
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn render_keeps_slot_order() {
        let template = PromptTemplate::bundled().unwrap();
        let prompt = template.render("TITLE-X", "BODY-Y", "COC-Z");

        let title = prompt.find("TITLE-X").unwrap();
        let body = prompt.find("BODY-Y").unwrap();
        let coc = prompt.find("COC-Z").unwrap();
        assert!(title < body && body < coc);
    }

    #[test]
    fn render_does_not_expand_placeholders_in_values() {
        let template = PromptTemplate::parse("T={{title}} M={{message}} C={{code_of_conduct}}")
            .unwrap();
        let prompt = template.render("{{message}}", "{{code_of_conduct}}", "rules");

        assert_eq!(prompt, "T={{message}} M={{code_of_conduct}} C=rules");
    }

    #[test]
    fn parse_tolerates_inner_whitespace() {
        let template =
            PromptTemplate::parse("{{ title }}|{{message}}|{{  code_of_conduct }}").unwrap();
        assert_eq!(template.render("a", "b", "c"), "a|b|c");
    }

    #[test]
    fn parse_rejects_missing_slot() {
        let err = PromptTemplate::parse("{{title}} {{message}}").unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("{{code_of_conduct}}"));
    }

    #[test]
    fn parse_rejects_wrong_order() {
        let err = PromptTemplate::parse("{{message}} {{title}} {{code_of_conduct}}").unwrap_err();
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn parse_rejects_duplicate_slot() {
        let err =
            PromptTemplate::parse("{{title}} {{message}} {{code_of_conduct}} {{title}}")
                .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn parse_rejects_unknown_slot() {
        let err = PromptTemplate::parse("{{title}} {{author}} {{message}} {{code_of_conduct}}")
            .unwrap_err();
        assert!(err.to_string().contains("{{author}}"));
    }

    #[test]
    fn single_braces_are_literal() {
        let template =
            PromptTemplate::parse("{\"a\": 1} {{title}} {{message}} {{code_of_conduct}}").unwrap();
        assert_eq!(template.render("t", "m", "c"), "{\"a\": 1} t m c");
    }

    #[tokio::test]
    async fn load_from_file() {
        let file = NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), "<{{title}}><{{message}}><{{code_of_conduct}}>")
            .await
            .unwrap();

        let template = PromptTemplate::from_file(file.path()).await.unwrap();
        assert_eq!(template.render("1", "2", "3"), "<1><2><3>");
    }

    #[tokio::test]
    async fn load_missing_file_fails() {
        let err = PromptTemplate::from_file("/non/existent/prompt.txt")
            .await
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("Error loading prompt file"));
    }
}
