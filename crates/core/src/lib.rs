// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dvo-core: shared types for the dvo resource lifecycle orchestrator

pub mod macros;

pub mod id;
pub mod progress;
pub mod record;
pub mod resource;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use id::{short, WorkRequestId};
pub use progress::{Outcome, ProgressEvent};
pub use record::{
    BuildFlavor, BuildPart, DeployFlavor, DeployPart, FieldPath, Handle, ProgressRecord,
    RepoField, RepoScope, RepositoryRecord, ScopeRef, SharedField,
};
#[cfg(any(test, feature = "test-support"))]
pub use resource::SummaryBuilder;
pub use resource::{
    Lifecycle, ListFilter, ResourceKind, ResourceSpec, Summary, Target, UnknownKind,
    AUDIT_USAGE, BUILD_PIPELINE_TAG_KEY, CODE_REPOSITORY_TAG_KEY, DEPLOY_TAG_KEY,
    PROJECT_RESOURCES_TAG_KEY, PROJECT_TAG_KEY, REPOSITORY_RESOURCES_TAG_KEY, USAGE_TAG_KEY,
};
pub use status::{OperationStatus, WorkRequest};
