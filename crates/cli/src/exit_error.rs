// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, so `main()` can drop the log guard before terminating.

use std::fmt;

/// Exit code of an operation that ran and failed.
pub const OPERATION_FAILED: i32 = 1;
/// Exit code when the requested checkpoint does not exist.
pub const NOT_FOUND: i32 = 2;
/// Exit code when another operation holds the session.
pub const BUSY: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// The failure was already reported on the progress stream.
    pub fn silent(code: i32) -> Self {
        Self::new(code, "")
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
