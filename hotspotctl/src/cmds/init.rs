use std::path::PathBuf;

use eyre::Result;
use tracing::info;

use poshan_common::ConfigFile;
use poshan_sources::Sources;

use crate::{Config, DEFAULT_CONFIG};

/// Install `config.hcl` and `sources.hcl` in the configuration directory, existing files are
/// left alone.
///
#[tracing::instrument]
pub fn install_defaults() -> Result<Vec<PathBuf>> {
    let cfg = ConfigFile::<Config>::install_default(DEFAULT_CONFIG)?;
    let srcs = Sources::install_defaults()?;
    info!("installed {cfg:?} and {srcs:?}");
    Ok(vec![cfg, srcs])
}
