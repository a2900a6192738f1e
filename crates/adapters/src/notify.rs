// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Telling the user that a teardown or a repository removal finished.

use async_trait::async_trait;
use dvo_core::Outcome;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification not delivered: {0}")]
    Undelivered(String),
}

/// Operations that announce their completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Teardown,
    Removal,
}

dvo_core::simple_display! {
    Operation {
        Teardown => "Undeploy from cloud",
        Removal => "Remove repository",
    }
}

impl Operation {
    fn verb(&self) -> &'static str {
        match self {
            Operation::Teardown => "undeploy",
            Operation::Removal => "remove",
        }
    }
}

/// A finished operation: what ran, on what, and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub operation: Operation,
    /// Folders torn down, or the repository removed
    pub subject: String,
    pub outcome: Outcome,
    summary: String,
}

impl Completion {
    pub fn succeeded(operation: Operation, subject: impl Into<String>, summary: impl Into<String>) -> Self {
        Self { operation, subject: subject.into(), outcome: Outcome::Succeeded, summary: summary.into() }
    }

    pub fn failed(operation: Operation, subject: impl Into<String>, message: impl Into<String>) -> Self {
        let subject = subject.into();
        let message = message.into();
        let summary = format!("Failed to {} {subject}: {message}", operation.verb());
        Self { operation, subject, outcome: Outcome::Failed { message }, summary }
    }

    pub fn title(&self) -> String {
        self.operation.to_string()
    }

    /// One-line body shown under the title.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, completion: &Completion) -> Result<(), NotifyError>;
}

/// Desktop notifications through `notify-rust`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        let title = completion.title();
        let body = completion.summary().to_string();
        let failed = !completion.outcome.is_success();
        // show() can block on the notification daemon; the teardown result
        // does not wait for it
        tokio::task::spawn_blocking(move || {
            let shown = notify_rust::Notification::new()
                .appname("dvo")
                .summary(&title)
                .body(&body)
                .show();
            match shown {
                Ok(_) => tracing::debug!(%title, failed, "desktop notification shown"),
                Err(e) => tracing::warn!(%title, error = %e, "desktop notification failed"),
            }
        });
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Completion, NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use dvo_core::Outcome;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NotifyCall {
        pub title: String,
        pub message: String,
        pub outcome: Outcome,
    }

    /// Records completions instead of showing them.
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        calls: Arc<Mutex<Vec<NotifyCall>>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<NotifyCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
            self.calls.lock().push(NotifyCall {
                title: completion.title(),
                message: completion.summary().to_string(),
                outcome: completion.outcome.clone(),
            });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
