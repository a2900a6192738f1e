// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dvo teardown`: undeploy folders from their checkpoints.

use super::{operation_failed, Context, Workspace};
use crate::color;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use dvo_engine::{LocalFolder, Progress, TeardownReport};
use std::path::PathBuf;

#[derive(Args)]
pub struct TeardownArgs {
    /// Deployed folders; each folder's name is its checkpoint key
    pub folders: Vec<PathBuf>,
}

pub async fn handle(args: TeardownArgs, ctx: &Context) -> Result<()> {
    let folders: Vec<LocalFolder> = args.folders.iter().map(|path| LocalFolder::from_path(path)).collect();
    let workspace = Workspace::open(ctx)?;

    let (progress, rx) = Progress::channel();
    let printer = tokio::spawn(output::print_progress(rx, ctx.format));
    let result = workspace.session.teardown(&folders, &progress).await;
    drop(progress);
    workspace.finish(printer).await?;

    let reports = result.map_err(operation_failed)?;
    if ctx.format == OutputFormat::Text {
        for report in &reports {
            println!("{}", summary(report));
        }
    }
    Ok(())
}

fn summary(report: &TeardownReport) -> String {
    if !report.found {
        return format!("{}: {}", color::header(&report.key), color::muted("no checkpoint"));
    }
    let mut line = format!("{}: {} deleted", color::header(&report.key), report.deleted);
    if !report.sweeps.is_empty() {
        let kinds: Vec<String> = report.sweeps.iter().map(ToString::to_string).collect();
        line.push_str(&format!(", swept {}", kinds.join(", ")));
    }
    line
}

#[cfg(test)]
#[path = "teardown_tests.rs"]
mod tests;
