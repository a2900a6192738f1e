// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dvo remove-repo`: remove one repository from a deployed project.

use super::{operation_failed, Context, Workspace};
use crate::color;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use dvo_core::ScopeRef;
use dvo_engine::{LocalFolder, Progress, RemovalRequest};
use std::path::PathBuf;

#[derive(Args)]
pub struct RemoveArgs {
    /// Folder of the repository; its name is the repository name
    pub folder: PathBuf,

    /// Compartment holding the project
    #[arg(long)]
    pub compartment: String,

    /// Project identifier
    #[arg(long)]
    pub project: String,

    /// Project name (default: looked up in the inventory)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Sub-project of the repository's build (repeatable)
    #[arg(long = "sub", value_name = "SUB")]
    pub subs: Vec<String>,
}

pub async fn handle(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let workspace = Workspace::open(ctx)?;
    let project_name = args
        .project_name
        .or_else(|| workspace.provider.get(&args.project).map(|project| project.display_name))
        .unwrap_or_default();
    let request = RemovalRequest::new(
        args.compartment,
        ScopeRef::new(args.project, project_name),
        LocalFolder::from_path(&args.folder),
    )
    .subs(args.subs);

    let (progress, rx) = Progress::channel();
    let printer = tokio::spawn(output::print_progress(rx, ctx.format));
    let result = workspace.session.remove_repository(&request, &progress).await;
    drop(progress);
    workspace.finish(printer).await?;

    let report = result.map_err(operation_failed)?;
    if ctx.format == OutputFormat::Text {
        println!(
            "{}: {} resources deleted{}",
            color::header(&report.repository),
            report.deleted.len(),
            if report.project_removed { ", project removed" } else { "" }
        );
    }
    Ok(())
}
