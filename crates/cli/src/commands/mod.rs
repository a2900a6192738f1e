// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod order;
pub mod remove;
pub mod show;
pub mod teardown;
pub mod tree;

use crate::config::Config;
use crate::exit_error::{self, ExitError};
use crate::output::OutputFormat;
use async_trait::async_trait;
use dvo_adapters::{
    Completion, DesktopNotifyAdapter, FsLocalArtifacts, MemoryProvider, NotifyAdapter, NotifyError,
};
use dvo_core::Outcome;
use dvo_engine::{LocalFolder, Session, SessionDeps, SessionError};
use dvo_storage::FileCheckpointStore;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared by every command.
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    /// Send a desktop notification when an operation finishes
    pub notify: bool,
}

impl Context {
    pub fn store(&self) -> FileCheckpointStore {
        FileCheckpointStore::new(self.config.checkpoint_dir.clone())
    }
}

/// Desktop notifications, unless disabled with `--no-notify`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Notifier(Option<DesktopNotifyAdapter>);

#[async_trait]
impl NotifyAdapter for Notifier {
    async fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        match &self.0 {
            Some(desktop) => desktop.notify(completion).await,
            None => {
                tracing::debug!(summary = completion.summary(), "notifications disabled");
                Ok(())
            }
        }
    }
}

pub type CliSession = Session<MemoryProvider, FileCheckpointStore, FsLocalArtifacts, Notifier>;

/// A session over the inventory file and the checkpoint directory.
///
/// Holds an exclusive lock on the state directory until closed, so one
/// operation runs at a time across processes.
pub struct Workspace {
    pub session: CliSession,
    pub provider: MemoryProvider,
    inventory_path: PathBuf,
    _lock: File,
}

impl Workspace {
    pub fn open(ctx: &Context) -> anyhow::Result<Self> {
        let lock = lock_state_dir(&ctx.config.state_dir, &ctx.config.lock_path)?;
        let provider = MemoryProvider::load(&ctx.config.inventory_path)?;
        tracing::debug!(
            inventory = %ctx.config.inventory_path.display(),
            resources = provider.live_ids().len(),
            "opened workspace"
        );
        let notifier = Notifier(ctx.notify.then(DesktopNotifyAdapter::new));
        let deps = SessionDeps {
            provider: provider.clone(),
            store: Arc::new(ctx.store()),
            local: FsLocalArtifacts::new(),
            notifier,
        };
        let session = Session::new(deps, ctx.config.teardown.clone());
        Ok(Self { session, provider, inventory_path: ctx.config.inventory_path.clone(), _lock: lock })
    }

    /// Persist the inventory and discard the tree.
    pub fn close(self) -> anyhow::Result<()> {
        self.session.close();
        self.provider.save(&self.inventory_path)?;
        Ok(())
    }

    /// Close once the progress printer is done. The inventory is saved
    /// before a printer failure is reported.
    pub async fn finish(self, printer: JoinHandle<anyhow::Result<Option<Outcome>>>) -> anyhow::Result<()> {
        let printed = printer.await;
        self.close()?;
        printed??;
        Ok(())
    }
}

/// Take the state directory lock and record our pid in it. Another
/// process holding it maps to the busy exit code.
fn lock_state_dir(state_dir: &Path, lock_path: &Path) -> anyhow::Result<File> {
    std::fs::create_dir_all(state_dir)?;
    // Open without truncating so the holder's pid survives a failed attempt
    let mut lock = OpenOptions::new().write(true).create(true).truncate(false).open(lock_path)?;
    if let Err(e) = lock.try_lock_exclusive() {
        tracing::debug!(lock = %lock_path.display(), error = %e, "state directory is locked");
        let message = format!("another dvo operation is using {}", state_dir.display());
        return Err(ExitError::new(exit_error::BUSY, message).into());
    }
    lock.set_len(0)?;
    writeln!(lock, "{}", std::process::id())?;
    Ok(lock)
}

/// Checkpoint key of a folder given on the command line.
pub fn folder_key(path: &Path) -> anyhow::Result<String> {
    Ok(LocalFolder::from_path(path).key()?)
}

/// Map a failed session operation to an exit code. The failure itself was
/// already printed with the progress stream.
pub fn operation_failed(error: SessionError) -> anyhow::Error {
    match error {
        SessionError::Busy(e) => ExitError::new(exit_error::BUSY, e.to_string()).into(),
        SessionError::Teardown(e) => {
            tracing::error!(error = %e, "operation failed");
            ExitError::silent(exit_error::OPERATION_FAILED).into()
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
