// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Document formats a code of conduct can be supplied in

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Text formats a code of conduct document can be provided in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextfileType {
    /// Markdown document
    Markdown,
    /// Plain text document
    PlainText,
    /// HTML document
    Html,
}

impl TextfileType {
    /// Returns the identifier of this format
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PlainText => "plain_text",
            Self::Html => "html",
        }
    }

    /// Returns all known formats
    pub const fn all() -> &'static [Self] {
        &[Self::Markdown, Self::PlainText, Self::Html]
    }

    /// Returns the file extensions conventionally used for this format
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Markdown => &["md", "markdown"],
            Self::PlainText => &["txt"],
            Self::Html => &["html", "htm"],
        }
    }

    /// Infer the format from a file path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }
}

impl fmt::Display for TextfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextfileType {
    type Err = TextfileTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "plain_text" | "text" | "txt" => Ok(Self::PlainText),
            "html" => Ok(Self::Html),
            _ => Err(TextfileTypeParseError(s.to_string())),
        }
    }
}

/// Error type for format parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported text format: {0}. Supported formats are: markdown, plain_text, html")]
pub struct TextfileTypeParseError(pub String);
