// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Code of conduct violation verdicts

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Verdict describing whether, and how severely, a message violates a code of conduct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationState {
    /// The message does not violate the code of conduct
    None,
    /// The message is borderline or contains a minor violation
    Minor,
    /// The message clearly violates the code of conduct
    Severe,
}

impl ViolationState {
    /// Returns the canonical name used on the wire and in model replies
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Minor => "MINOR",
            Self::Severe => "SEVERE",
        }
    }

    /// Returns all known violation states
    pub const fn all() -> &'static [Self] {
        &[Self::None, Self::Minor, Self::Severe]
    }

    /// Check if the state represents any kind of violation
    pub const fn is_violation(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for ViolationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationState {
    type Err = ViolationStateParseError;

    /// Parses a violation state by exact name; casing variants are rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ViolationStateParseError(s.to_string()))
    }
}

impl Serialize for ViolationState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ViolationState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when text does not name a known violation state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown violation state: '{0}'. Known states are: NONE, MINOR, SEVERE")]
pub struct ViolationStateParseError(pub String);
