// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Sources of code of conduct documents
//!
//! The checker asks a [`CodeOfConductProvider`] for the current code of conduct
//! in a format it understands. [`StaticCodeOfConduct`] serves an in-memory
//! document and [`FileCodeOfConduct`] serves a document read from disk.

use std::path::{Path, PathBuf};

use shared_types::TextfileType;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{CheckerError, CheckerResult};

/// Source of the code of conduct text a message is checked against
#[cfg_attr(test, mockall::automock)]
pub trait CodeOfConductProvider: Send + Sync {
    /// Check whether the code of conduct can be provided in the given format
    fn supports(&self, format: TextfileType) -> bool;

    /// Get the current code of conduct in the given format
    ///
    /// # Errors
    ///
    /// Returns [`CheckerError::UnsupportedFormat`] if the format is not supported
    fn code_of_conduct(&self, format: TextfileType) -> CheckerResult<String>;
}

/// A code of conduct held in memory in a single format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCodeOfConduct {
    format: TextfileType,
    content: String,
}

impl StaticCodeOfConduct {
    /// Create a provider for a document in the given format
    pub fn new(format: TextfileType, content: impl Into<String>) -> Self {
        Self {
            format,
            content: content.into(),
        }
    }

    /// Create a provider for a markdown document
    pub fn markdown(content: impl Into<String>) -> Self {
        Self::new(TextfileType::Markdown, content)
    }

    /// The format of the held document
    pub fn format(&self) -> TextfileType {
        self.format
    }
}

impl CodeOfConductProvider for StaticCodeOfConduct {
    fn supports(&self, format: TextfileType) -> bool {
        self.format == format
    }

    fn code_of_conduct(&self, format: TextfileType) -> CheckerResult<String> {
        if !self.supports(format) {
            return Err(CheckerError::unsupported_format(format));
        }
        Ok(self.content.clone())
    }
}

/// A code of conduct read once from a file
#[derive(Debug, Clone)]
pub struct FileCodeOfConduct {
    path: PathBuf,
    document: StaticCodeOfConduct,
}

impl FileCodeOfConduct {
    /// Load a code of conduct, inferring the format from the file extension
    pub async fn from_file<P: AsRef<Path>>(path: P) -> CheckerResult<Self> {
        let path = path.as_ref();
        let format = TextfileType::from_path(path).ok_or_else(|| {
            CheckerError::config(format!(
                "Cannot infer code of conduct format from {}",
                path.display()
            ))
        })?;
        Self::from_file_with_format(path, format).await
    }

    /// Load a code of conduct stored in the given format
    pub async fn from_file_with_format<P: AsRef<Path>>(
        path: P,
        format: TextfileType,
    ) -> CheckerResult<Self> {
        let path = path.as_ref();
        debug!("Loading code of conduct from: {}", path.display());

        let content = fs::read_to_string(path).await.map_err(|e| {
            CheckerError::io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Err(CheckerError::config(format!(
                "Code of conduct file {} is empty",
                path.display()
            )));
        }

        info!(
            format = %format,
            bytes = content.len(),
            "Loaded code of conduct from {}",
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            document: StaticCodeOfConduct::new(format, content),
        })
    }

    /// Path the document was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The format of the loaded document
    pub fn format(&self) -> TextfileType {
        self.document.format()
    }
}

impl CodeOfConductProvider for FileCodeOfConduct {
    fn supports(&self, format: TextfileType) -> bool {
        self.document.supports(format)
    }

    fn code_of_conduct(&self, format: TextfileType) -> CheckerResult<String> {
        self.document.code_of_conduct(format)
    }
}
