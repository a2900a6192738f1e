// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log setup: a daily-rolled file in the state directory, plus compact
//! stderr output with `--verbose`. Filter directives come from `DVO_LOG`.

use crate::config::Config;
use crate::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "dvo.log";

/// Install the global subscriber. Keep the guard alive until exit or the
/// tail of the file log is lost.
pub fn init(config: &Config, verbose: bool) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
    let stderr_layer = verbose.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });
    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(file_layer).with(stderr_layer).try_init()?;
    Ok(guard)
}
