// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

/// Version string shown by `dvo --version`
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

/// Resolve state directory: DVO_STATE_DIR > XDG_STATE_HOME/dvo > ~/.local/state/dvo
pub fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DVO_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("dvo"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/dvo"))
}

/// Work request poll interval override
pub fn poll_interval() -> Option<Duration> {
    duration_ms("DVO_POLL_INTERVAL_MS")
}

/// Ceiling of the bootstrap poll
pub fn bootstrap_timeout() -> Option<Duration> {
    duration_ms("DVO_BOOTSTRAP_TIMEOUT_MS")
}

/// Log filter directives (default `info`).
pub fn log_filter() -> String {
    std::env::var("DVO_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

fn duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}
