// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Parsing of the model's verdict reply
//!
//! Models answer with a JSON object `{"result": ..., "reason": ...}`, often
//! wrapped in a fenced ```` ```json ```` block and sometimes surrounded by prose.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use shared_types::ViolationState;
use tracing::debug;

use crate::error::{CheckerError, CheckerResult};

// Whole reply is a single fenced block with an empty or `json` info string
static WHOLE_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A\s*```[ \t]*([A-Za-z0-9_+-]*)[ \t]*\r?\n?(.*?)```\s*\z")
        .expect("fence regex is valid")
});

// First `json` fenced block anywhere in the reply
static EMBEDDED_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*(?i:json)[ \t]*\r?\n(.*?)```").expect("fence regex is valid")
});

/// The model's judgement of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Parsed violation state
    pub state: ViolationState,
    /// Free-text reason given by the model
    pub reason: String,
}

/// Locate the JSON text inside a model reply
///
/// Returns the trimmed inner text of a fenced block when the reply is one, the
/// first embedded `json` block otherwise, and the whole reply as a fallback.
pub fn extract_json(content: &str) -> &str {
    if let Some(captures) = WHOLE_FENCE_REGEX.captures(content)
        && let Some(inner) = captures.get(2)
    {
        let info = captures.get(1).map_or("", |m| m.as_str());
        if info.is_empty() || info.eq_ignore_ascii_case("json") {
            return inner.as_str().trim();
        }
    }

    if let Some(inner) = EMBEDDED_FENCE_REGEX
        .captures(content)
        .and_then(|captures| captures.get(1))
    {
        debug!("Using fenced JSON block embedded in model reply");
        return inner.as_str().trim();
    }

    content.trim()
}

/// Parse a model reply into a [`Verdict`]
///
/// `result` must name a [`ViolationState`] exactly; any other value is an error.
pub fn parse_verdict(content: &str) -> CheckerResult<Verdict> {
    let json = extract_json(content);

    let value: Value = serde_json::from_str(json).map_err(|e| {
        CheckerError::invalid_response(format!("Model reply is not a JSON verdict: {e}"))
    })?;
    let object = value
        .as_object()
        .ok_or_else(|| CheckerError::invalid_response("Model reply is not a JSON object"))?;

    let result = text_field(object, "result")?;
    let reason = text_field(object, "reason")?.to_string();

    let state = result.parse::<ViolationState>()?;

    Ok(Verdict { state, reason })
}

fn text_field<'a>(object: &'a Map<String, Value>, field: &str) -> CheckerResult<&'a str> {
    match object.get(field) {
        Some(Value::String(text)) => Ok(text),
        None | Some(Value::Null) => Err(CheckerError::invalid_response(format!(
            "Model reply does not contain '{field}'"
        ))),
        Some(other) => Err(CheckerError::invalid_response(format!(
            "Model reply field '{field}' is not text: {other}"
        ))),
    }
}
