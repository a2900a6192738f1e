// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waiting for provider-side long-running operations.
//!
//! [`await_completion`] has no iteration bound: deletes may take many
//! minutes. [`await_bootstrap`] is used to confirm a creation and gives up
//! after a fixed ceiling.

use crate::error::{PollError, TeardownError};
use dvo_adapters::CloudProvider;
use dvo_core::{OperationStatus, WorkRequest, WorkRequestId};
use std::future::Future;
use std::time::Duration;

/// Something carrying an operation status.
pub trait Polled {
    fn status(&self) -> &OperationStatus;
}

impl Polled for OperationStatus {
    fn status(&self) -> &OperationStatus {
        self
    }
}

impl Polled for WorkRequest {
    fn status(&self) -> &OperationStatus {
        &self.status
    }
}

/// Sleep `interval`, query, repeat until the status is no longer in flight.
///
/// Errors from `status_fn` propagate unchanged; they are not retried.
pub async fn await_completion<T, E, F, Fut>(interval: Duration, mut status_fn: F) -> Result<T, E>
where
    T: Polled,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    loop {
        tokio::time::sleep(interval).await;
        let polled = status_fn().await?;
        if !polled.status().is_in_flight() {
            return Ok(polled);
        }
    }
}

/// Like [`await_completion`], but gives up after `ceiling / interval` polls
/// (at least one). `CREATING` counts as in flight.
pub async fn await_bootstrap<T, E, F, Fut>(
    interval: Duration,
    ceiling: Duration,
    mut status_fn: F,
) -> Result<T, PollError<E>>
where
    T: Polled,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let polls = bootstrap_polls(interval, ceiling);
    for _ in 0..polls {
        tokio::time::sleep(interval).await;
        let polled = status_fn().await.map_err(PollError::Status)?;
        if !polled.status().is_in_flight_or_creating() {
            return Ok(polled);
        }
    }
    Err(PollError::Timeout { polls, ceiling })
}

fn bootstrap_polls(interval: Duration, ceiling: Duration) -> u32 {
    if interval.is_zero() {
        return 1;
    }
    let polls = ceiling.as_millis() / interval.as_millis().max(1);
    u32::try_from(polls).unwrap_or(u32::MAX).max(1)
}

/// Waits on provider work requests.
#[derive(Clone)]
pub struct WorkRequestWaiter<P> {
    provider: P,
    interval: Duration,
    bootstrap_interval: Duration,
    bootstrap_ceiling: Duration,
}

impl<P: CloudProvider> WorkRequestWaiter<P> {
    pub fn new(provider: P, interval: Duration) -> Self {
        Self {
            provider,
            interval,
            bootstrap_interval: Duration::from_secs(2),
            bootstrap_ceiling: Duration::from_secs(60),
        }
    }

    pub fn with_bootstrap(mut self, interval: Duration, ceiling: Duration) -> Self {
        self.bootstrap_interval = interval;
        self.bootstrap_ceiling = ceiling;
        self
    }

    /// Wait for a terminal status. Anything but `SUCCEEDED` is an error.
    pub async fn wait(&self, id: &WorkRequestId) -> Result<WorkRequest, TeardownError> {
        let request =
            await_completion(self.interval, || self.provider.work_request_status(id)).await?;
        if !request.status.is_success() {
            tracing::warn!(work_request = %id, status = %request.status, "work request did not succeed");
            return Err(TeardownError::TerminalStatus { id: id.clone(), status: request.status });
        }
        Ok(request)
    }

    /// Wait (bounded) for a creation work request and return the id of the
    /// first resource it affected.
    pub async fn resolve_resource(&self, id: &WorkRequestId) -> Result<Option<String>, TeardownError> {
        let polled = await_bootstrap(self.bootstrap_interval, self.bootstrap_ceiling, || {
            self.provider.work_request_status(id)
        })
        .await;
        let request = match polled {
            Ok(request) => request,
            Err(PollError::Status(e)) => return Err(e.into()),
            Err(PollError::Timeout { .. }) => {
                return Err(TeardownError::Timeout { id: id.clone(), ceiling: self.bootstrap_ceiling })
            }
        };
        if !request.status.is_success() {
            return Err(TeardownError::TerminalStatus { id: id.clone(), status: request.status });
        }
        Ok(request.resources.into_iter().next())
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
