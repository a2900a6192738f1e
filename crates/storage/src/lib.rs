// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dvo-storage: checkpoint persistence for progress records

mod checkpoint;
mod legacy;
mod migration;

pub use checkpoint::{
    checkpoint_key, Checkpoint, CheckpointError, CheckpointStore, FileCheckpointStore,
    MemoryCheckpointStore, CURRENT_CHECKPOINT_VERSION,
};
pub use legacy::LegacyFlatToV2;
pub use migration::{version_of, Migration, MigrationError, MigrationRegistry};
