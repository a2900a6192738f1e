// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dvo-tree: lazily populated tree of provider resources
//!
//! Nodes live in an arena and are addressed by generational [`NodeId`]s.
//! A lazy node fetches its children the first time they are asked for;
//! until then it shows a shared loading placeholder. Changes are
//! broadcast as [`TreeChange`] events to every subscriber.

mod arena;
pub mod fetch;
pub mod listing;
pub mod node;
pub mod tree;

pub use arena::NodeId;
pub use fetch::{ChildFetcher, FetchError};
#[cfg(any(test, feature = "test-support"))]
pub use fetch::ScriptedFetcher;
pub use listing::{Group, ListingFetcher};
pub use node::{Capabilities, ChildState, NodeSpec, NodeView, LOADING_LABEL, NO_ITEMS_LABEL};
pub use tree::{Tree, TreeChange, TreeError};
