// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local derivative state of a deployed folder.

use async_trait::async_trait;
use std::path::Path;

/// Registration file written into a folder when it is deployed.
pub const REGISTRATION_FILE: &str = ".vscode/devops.json";
/// Generated resource files.
pub const RESOURCES_DIR: &str = ".devops";
/// Local clone created for the code repository.
pub const GIT_DIR: &str = ".git";

/// Adapter cleaning up what a deployment left inside a local folder.
#[async_trait]
pub trait LocalArtifacts: Clone + Send + Sync + 'static {
    /// Remove local artifacts of `folder`. Failures are logged, never returned.
    async fn clean(&self, folder: &Path);
}

/// Deletes the registration file, generated resources and local clone.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLocalArtifacts;

impl FsLocalArtifacts {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LocalArtifacts for FsLocalArtifacts {
    async fn clean(&self, folder: &Path) {
        let registration = folder.join(REGISTRATION_FILE);
        if tokio::fs::try_exists(&registration).await.unwrap_or(false) {
            match tokio::fs::remove_file(&registration).await {
                Ok(()) => tracing::info!(path = %registration.display(), "deleted registration"),
                Err(e) => {
                    tracing::warn!(path = %registration.display(), error = %e, "failed to delete registration")
                }
            }
        }
        for dir in [RESOURCES_DIR, GIT_DIR] {
            let path = folder.join(dir);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => tracing::info!(path = %path.display(), "deleted local directory"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to delete local directory")
                }
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::LocalArtifacts;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Fake local artifacts adapter recording cleaned folders
    #[derive(Clone, Default)]
    pub struct FakeLocalArtifacts {
        cleaned: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl FakeLocalArtifacts {
        pub fn new() -> Self {
            Self::default()
        }

        /// Folders passed to `clean`, in order
        pub fn cleaned(&self) -> Vec<PathBuf> {
            self.cleaned.lock().clone()
        }
    }

    #[async_trait]
    impl LocalArtifacts for FakeLocalArtifacts {
        async fn clean(&self, folder: &Path) {
            self.cleaned.lock().push(folder.to_path_buf());
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLocalArtifacts;

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
