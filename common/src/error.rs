//! Error module
//!

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bad file version {found} in {file:?}, want {want}")]
    BadFileVersion {
        file: PathBuf,
        found: usize,
        want: usize,
    },
    #[error("Unknown config file {0:?} and no default in {1:?}")]
    MissingConfig(PathBuf, PathBuf),
    #[error("No HOME or LOCALAPPDATA variable defined, can not continue")]
    NoHome,
}
