// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dvo-adapters: collaborators of the orchestrator (cloud provider,
//! local folder cleanup, desktop notifications)

pub mod local;
pub mod memory;
pub mod notify;
pub mod provider;

pub use local::{FsLocalArtifacts, LocalArtifacts};
pub use memory::{Inventory, InventoryError, MemoryProvider};
pub use notify::{Completion, DesktopNotifyAdapter, NotifyAdapter, NotifyError, Operation};
pub use provider::{CloudProvider, Created, ProviderError};

#[cfg(any(test, feature = "test-support"))]
pub use local::FakeLocalArtifacts;
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use provider::{FakeProvider, ProviderCall};
