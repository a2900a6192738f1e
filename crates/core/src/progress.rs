// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress messages exposed to whoever renders an operation.

use serde::{Deserialize, Serialize};

/// Final result of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// One message on the progress channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Step { message: String },
    Finished { outcome: Outcome },
}

impl ProgressEvent {
    pub fn step(message: impl Into<String>) -> Self {
        ProgressEvent::Step { message: message.into() }
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressEvent::Step { message } => f.write_str(message),
            ProgressEvent::Finished { outcome: Outcome::Succeeded } => f.write_str("done"),
            ProgressEvent::Finished { outcome: Outcome::Failed { message } } => {
                write!(f, "failed: {}", message)
            }
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
