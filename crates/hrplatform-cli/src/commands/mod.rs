pub mod build;
pub mod init;
pub mod quiz;
pub mod search;
pub mod stats;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use hrplatform_core::config::{load_config_from, SiteConfig};
use hrplatform_core::loader::{try_load, DataSet, FsFetcher, HttpFetcher, ResourceFetcher};
use hrplatform_core::notify::Notifier;

/// Load config and apply a `--data` override.
pub(crate) fn load_config(path: Option<&Path>, data: Option<PathBuf>) -> Result<SiteConfig> {
    let mut config = load_config_from(path)?;
    if let Some(dir) = data {
        config.data_dir = dir;
        config.data_url = None;
    }
    Ok(config)
}

/// Fetcher for the configured data source: the URL when set, else the directory.
pub(crate) fn fetcher_for(config: &SiteConfig) -> Box<dyn ResourceFetcher> {
    match &config.data_url {
        Some(url) => Box::new(HttpFetcher::new(url)),
        None => Box::new(FsFetcher::new(config.data_dir.clone())),
    }
}

/// Load every resource, failing with context on the first error.
pub(crate) async fn load_data(config: &SiteConfig) -> Result<DataSet> {
    let fetcher = fetcher_for(config);
    try_load(fetcher.as_ref())
        .await
        .with_context(|| format!("failed to load data from {}", fetcher.describe()))
}

/// Prints notifications to stderr.
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}
