mod cli;
mod commands;
mod config;

use std::{io, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use wbtags_core::prelude::*;
use wbtags_host::{DirRecordSource, FileLegacyStore, FileSettingsHost};
use wbtags_observe::init_logging;
use wbtags_prometheus::{Encoder, PrometheusMetrics, TextEncoder};

use crate::{cli::Cli, config::AppConfig};

// Single-threaded so local offset detection in the logger stays reliable.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1) config + logger
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?.apply_overrides(&cli);
    init_logging(&cfg.log)?;
    debug!(settings = %cfg.host.settings_path.display(), "logger initialized");

    // 2) host adapters
    let settings = Arc::new(
        FileSettingsHost::open(&cfg.host.settings_path)
            .with_context(|| format!("opening settings {}", cfg.host.settings_path.display()))?
            .with_debounce(cfg.host.debounce())?,
    );
    let source = cfg.host.worlds_dir.as_ref().map(DirRecordSource::new);

    // 3) store
    let metrics = PrometheusMetrics::new()?;
    let mut store = TagStore::new(settings.clone()).with_metrics(Arc::new(metrics.clone()));
    if let Some(path) = &cfg.host.legacy_path {
        store = store.with_legacy(Arc::new(FileLegacyStore::new(path)));
    }
    let store = store.open();

    // 4) command
    let result = commands::execute(
        &cli.command,
        &store,
        source.as_ref().map(|s| s as &dyn RecordSource),
        &mut io::stdout().lock(),
    );

    // 5) persist whatever the command changed
    if let Err(e) = settings.close().await {
        warn!(error = %e, "final settings save failed");
        if result.is_ok() {
            return Err(e).context("saving settings");
        }
    }

    if cli.metrics {
        TextEncoder::new().encode(&metrics.gather(), &mut io::stderr().lock())?;
    }
    result
}
