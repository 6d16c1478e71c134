// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for conduct checking
//!
//! This crate provides the data carriers exchanged between code of conduct
//! checkers and their callers: the checked [`Message`], the resulting
//! [`CheckResult`] with its [`ViolationState`], and the [`TextfileType`]
//! formats a code of conduct can be supplied in.

pub mod message;
pub mod textfile_type;
pub mod violation_state;

pub use message::{CheckResult, Message};
pub use textfile_type::{TextfileType, TextfileTypeParseError};
pub use violation_state::{ViolationState, ViolationStateParseError};
