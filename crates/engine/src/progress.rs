// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress reporting to the caller.

use dvo_core::{Outcome, ProgressEvent};
use tokio::sync::mpsc;

/// Sends progress messages to whoever renders the operation.
///
/// Messages are best effort: a caller that stopped listening does not fail
/// the operation.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl Progress {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A reporter that drops every message.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Reporter plus the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn step(&self, message: impl Into<String>) {
        self.send(ProgressEvent::step(message));
    }

    pub fn finish(&self, outcome: Outcome) {
        self.send(ProgressEvent::Finished { outcome });
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
