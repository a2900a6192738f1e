// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dvo show`: inspect checkpoints.

use super::{folder_key, Context};
use crate::color;
use crate::exit_error::{self, ExitError};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use dvo_core::ProgressRecord;
use dvo_storage::CheckpointStore;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct ShowArgs {
    /// Folder to show; lists every checkpoint when omitted
    pub folder: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CheckpointEntry {
    key: String,
    pending: usize,
}

pub fn handle(args: ShowArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let Some(folder) = args.folder else {
        let mut entries = Vec::new();
        for key in store.keys()? {
            let pending = store.load(&key)?.map_or(0, |record| record.pending().len());
            entries.push(CheckpointEntry { key, pending });
        }
        return output::handle_list(ctx.format, &entries, "No checkpoints", render_entries);
    };

    let key = folder_key(&folder)?;
    let Some(record) = store.load(&key)? else {
        return Err(ExitError::new(exit_error::NOT_FOUND, format!("No checkpoint for {key}")).into());
    };
    output::format_or_json(ctx.format, &record, || print_record(&key, &record))
}

fn render_entries(entries: &[CheckpointEntry], out: &mut dyn Write) {
    let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    for entry in entries {
        let key = format!("{:width$}", entry.key, width = width);
        let _ = writeln!(out, "{}  {} pending", color::header(&key), entry.pending);
    }
}

fn print_record(key: &str, record: &ProgressRecord) {
    println!("{}", color::header(key));
    if let Some(compartment) = &record.compartment {
        println!("  compartment  {}", compartment.label());
    }
    if let Some(project) = &record.project {
        println!("  project      {} {}", project.label(), color::context(&project.ocid));
    }
    if let Some(tag) = &record.tag {
        println!("  tag          {}", tag);
    }
    let pending = record.pending();
    if pending.is_empty() {
        println!("  {}", color::muted("nothing left to delete"));
        return;
    }
    println!("  pending:");
    for path in pending {
        let handle = record.get(&path).map(|h| h.to_string()).unwrap_or_default();
        println!("    {} {}", path, color::literal(&handle));
    }
}
