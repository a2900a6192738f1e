// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dvo order`: the tiers a teardown of a folder would visit.

use super::{folder_key, Context};
use crate::color;
use crate::exit_error::{self, ExitError};
use crate::output;
use anyhow::Result;
use clap::Args;
use dvo_core::ProgressRecord;
use dvo_engine::tier_plan;
use dvo_storage::CheckpointStore;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct OrderArgs {
    /// Folder whose checkpoint to plan
    pub folder: PathBuf,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct PlannedTier {
    tier: usize,
    name: String,
    slots: Vec<PlannedSlot>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct PlannedSlot {
    slot: String,
    id: String,
}

pub fn handle(args: OrderArgs, ctx: &Context) -> Result<()> {
    let key = folder_key(&args.folder)?;
    let Some(record) = ctx.store().load(&key)? else {
        return Err(ExitError::new(exit_error::NOT_FOUND, format!("No checkpoint for {key}")).into());
    };
    let planned = plan(&record);
    output::handle_list(ctx.format, &planned, "Nothing left to delete", |tiers, out| {
        for tier in tiers {
            let _ = writeln!(out, "{}", color::header(&format!("{}. {}", tier.tier, tier.name)));
            for slot in &tier.slots {
                let _ = writeln!(out, "   {} {}", slot.slot, color::literal(&slot.id));
            }
        }
    })
}

pub(crate) fn plan(record: &ProgressRecord) -> Vec<PlannedTier> {
    tier_plan(record)
        .into_iter()
        .map(|(tier, paths)| PlannedTier {
            tier: tier.number(),
            name: tier.to_string(),
            slots: paths
                .into_iter()
                .map(|path| PlannedSlot {
                    id: record.get(&path).map(|h| h.to_string()).unwrap_or_default(),
                    slot: path.to_string(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
