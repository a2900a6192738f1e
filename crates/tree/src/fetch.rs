// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child fetching capability of lazy nodes.

use crate::node::NodeSpec;
use async_trait::async_trait;
use dvo_adapters::ProviderError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("{0}")]
    Other(String),
}

/// Computes the children of a lazy node. Runs on its own task, so it must
/// not assume the node still exists when it returns.
#[async_trait]
pub trait ChildFetcher: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Vec<NodeSpec>, FetchError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ChildFetcher, FetchError};
    use crate::node::NodeSpec;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    /// Fetcher handing out scripted results. Each call takes the next
    /// result, then waits for a permit when gated.
    #[derive(Clone, Default)]
    pub struct ScriptedFetcher {
        results: Arc<Mutex<VecDeque<Result<Vec<NodeSpec>, FetchError>>>>,
        gate: Option<Arc<Semaphore>>,
        calls: Arc<Mutex<usize>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Calls block until [`ScriptedFetcher::release`] hands out a permit.
        pub fn gated() -> Self {
            Self { gate: Some(Arc::new(Semaphore::new(0))), ..Self::default() }
        }

        pub fn then(self, result: Result<Vec<NodeSpec>, FetchError>) -> Self {
            self.results.lock().push_back(result);
            self
        }

        pub fn release(&self, permits: usize) {
            if let Some(gate) = &self.gate {
                gate.add_permits(permits);
            }
        }

        pub fn calls(&self) -> usize {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl ChildFetcher for ScriptedFetcher {
        async fn fetch(&self) -> Result<Vec<NodeSpec>, FetchError> {
            *self.calls.lock() += 1;
            let result = self.results.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()));
            if let Some(gate) = &self.gate {
                let permit = gate.acquire().await.map_err(|e| FetchError::Other(e.to_string()))?;
                permit.forget();
            }
            result
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::ScriptedFetcher;
