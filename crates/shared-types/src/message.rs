// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Messages submitted for a conduct check and the resulting verdicts

use serde::{Deserialize, Serialize};

use crate::ViolationState;

/// A message to be checked against a code of conduct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    title: String,
    message: String,
}

impl Message {
    /// Create a new message from its title and body
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Get the message title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the message body
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of checking a message against a code of conduct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    message: Message,
    violation_state: ViolationState,
    reason: String,
}

impl CheckResult {
    /// Create a check result for the given message
    pub fn new(
        message: Message,
        violation_state: ViolationState,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            message,
            violation_state,
            reason: reason.into(),
        }
    }

    /// The message that was checked
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The verdict for the message
    pub fn violation_state(&self) -> ViolationState {
        self.violation_state
    }

    /// Free-text explanation of the verdict
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Check if the message violates the code of conduct
    pub fn is_violation(&self) -> bool {
        self.violation_state.is_violation()
    }
}
