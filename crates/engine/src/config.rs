// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Teardown settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When the tag sweep for stages runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageSweep {
    /// Sweep stages at the end of their own tier, and again before pipelines.
    #[default]
    PerTier,
    /// No stage-only sweep; a stage flag is carried into the pipeline tier.
    Folded,
}

dvo_core::simple_display! {
    StageSweep {
        PerTier => "per-tier",
        Folded => "folded",
    }
}

impl std::str::FromStr for StageSweep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-tier" => Ok(StageSweep::PerTier),
            "folded" => Ok(StageSweep::Folded),
            other => Err(format!("unknown stage sweep policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownConfig {
    /// Interval between work request status queries.
    pub poll_interval: Duration,
    /// Interval of the bounded poll used to resolve created resources.
    pub bootstrap_interval: Duration,
    /// Ceiling of the bounded poll.
    pub bootstrap_timeout: Duration,
    pub stage_sweep: StageSweep,
    /// Sweep stage and pipeline remnants by tag before deleting the project.
    pub remnant_sweep: bool,
}

impl Default for TeardownConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            bootstrap_interval: Duration::from_secs(2),
            bootstrap_timeout: Duration::from_secs(60),
            stage_sweep: StageSweep::PerTier,
            remnant_sweep: true,
        }
    }
}

impl TeardownConfig {
    dvo_core::setters! {
        set {
            poll_interval: Duration,
            bootstrap_interval: Duration,
            bootstrap_timeout: Duration,
            stage_sweep: StageSweep,
            remnant_sweep: bool,
        }
    }
}
