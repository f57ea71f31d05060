//! Tracing setup.

use crate::access_log::ACCESS_LOG_TARGET;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, filter::filter_fn, fmt, fmt::MakeWriter, layer::SubscriberExt,
    registry::LookupSpan, util::SubscriberInitExt,
};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "kubeboard=info,tower_http=info";

/// Install the global subscriber.
///
/// - stdout: every event allowed by `RUST_LOG` (default [`DEFAULT_FILTER`])
/// - `access_log`: access log events only, appended without colours
///
/// # Errors
///
/// Returns an error if the access log file cannot be opened or a global
/// subscriber is already installed.
pub fn init(access_log: &Path) -> anyhow::Result<()> {
    if let Some(dir) = access_log.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(access_log)
        .with_context(|| format!("opening access log {}", access_log.display()))?;

    let stdout = fmt::layer().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    );

    tracing_subscriber::registry()
        .with(stdout)
        .with(access_log_layer(Mutex::new(file)))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(())
}

/// Layer writing access log events, and nothing else, to `writer`.
///
/// Lines carry no ANSI colouring and no target.
pub fn access_log_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter_fn(|metadata| metadata.target() == ACCESS_LOG_TARGET))
}
