// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color;
use clap::ValueEnum;
use dvo_core::{Outcome, ProgressEvent};
use serde::Serialize;
use std::io::Write;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render a list as text or JSON. Handles the empty check and format branch.
pub fn handle_list<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    render_text: impl FnOnce(&[T], &mut dyn Write),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_msg);
            } else {
                render_text(items, &mut std::io::stdout());
            }
        }
    }
    Ok(())
}

/// Format-branch helper for non-list commands.
///
/// Renders as JSON when `format` is `Json`, otherwise calls `text_fn`.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}

/// One progress line. JSON output is one event object per line.
pub fn progress_line(event: &ProgressEvent, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(event)?,
        OutputFormat::Text => match event {
            ProgressEvent::Step { message } => message.clone(),
            ProgressEvent::Finished { outcome: Outcome::Succeeded } => color::header(&event.to_string()),
            ProgressEvent::Finished { outcome: Outcome::Failed { .. } } => color::failed(&event.to_string()),
        },
    })
}

/// Print progress until every sender is gone. Returns the final outcome,
/// if one was reported.
pub async fn print_progress(
    mut rx: UnboundedReceiver<ProgressEvent>,
    format: OutputFormat,
) -> anyhow::Result<Option<Outcome>> {
    let mut outcome = None;
    while let Some(event) = rx.recv().await {
        println!("{}", progress_line(&event, format)?);
        if let ProgressEvent::Finished { outcome: finished } = event {
            outcome = Some(finished);
        }
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
