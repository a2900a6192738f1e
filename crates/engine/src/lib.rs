// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dvo-engine: waits on provider operations and deletes resource graphs
//! in dependency order, resumable from checkpoints.

pub mod config;
mod error;
pub mod gate;
pub mod poller;
mod progress;
pub mod removal;
pub mod session;
pub mod stage_order;
pub mod teardown;

pub use config::{StageSweep, TeardownConfig};
pub use error::{PollError, StructuralError, TeardownError};
pub use gate::{GateError, GateGuard, OperationGate};
pub use poller::{await_bootstrap, await_completion, WorkRequestWaiter};
pub use progress::Progress;
pub use removal::{
    container_repository_names, generated_artifact_names, Removal, RemovalReport, RemovalRequest,
};
pub use session::{Session, SessionDeps, SessionError};
pub use stage_order::deletion_order;
pub use teardown::{tier_plan, LocalFolder, Teardown, TeardownReport, Tier};
