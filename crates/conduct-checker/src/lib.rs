// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! LLM-backed code of conduct checks
//!
//! This crate judges whether a message violates a code of conduct by asking an
//! OpenAI-compatible chat completion endpoint and parsing its verdict.
//!
//! # Architecture
//!
//! - [`checker`]: the [`ConductChecker`] trait and its LLM-backed implementation
//! - [`config`]: endpoint, credentials, model, timeout and redirect settings
//! - [`prompt`]: the prompt template and its substitution slots
//! - [`provider`]: sources of the code of conduct document
//! - [`openai`]: chat completion transport with explicit 307 handling
//! - [`verdict`]: tolerant parsing of the model's JSON reply
//! - [`error`]: error types shared by all of the above
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use conduct_checker::{
//!     CheckerConfig, ConductChecker, Message, OpenAiConductChecker, StaticCodeOfConduct,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CheckerConfig::openai("sk-your-api-key", "gpt-4o-mini")?;
//! let provider = StaticCodeOfConduct::markdown("# Code of Conduct\n\nBe kind.");
//!
//! let checker = OpenAiConductChecker::new(config, provider).await?;
//! let result = checker
//!     .check(&Message::new("Release date?", "When is the next release?"))
//!     .await?;
//!
//! println!("{}: {}", result.violation_state(), result.reason());
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod config;
pub mod error;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod verdict;

// Re-export main types for convenience
pub use checker::{ConductChecker, OpenAiConductChecker};
pub use config::{ApiKey, CheckerConfig};
pub use error::{CheckerError, CheckerResult};
pub use openai::ChatCompletionClient;
pub use prompt::PromptTemplate;
pub use provider::{CodeOfConductProvider, FileCodeOfConduct, StaticCodeOfConduct};
pub use shared_types::{CheckResult, Message, TextfileType, ViolationState};
pub use verdict::{Verdict, parse_verdict};
