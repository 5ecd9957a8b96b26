//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the various configuration files of
//! `poshan`.  This is a configuration file/struct neutral loading engine, storing only the
//! base directory and with `load()` read the proper file or the default one.
//!
//! Every configuration struct carries a `version` field which must match the one the code
//! knows about, see [`IntoConfig`].
//!
//! This encapsulates the configuration file, available with `.inner()` or `.inner_mut()`.
//!

use std::env;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{makepath, ConfigError};

/// Main name for the directory base
const TAG: &str = "poshan";

/// Link a configuration struct to its on-disk file.
///
pub trait IntoConfig: Debug + DeserializeOwned {
    /// Default filename inside the configuration directory.
    const FILENAME: &'static str;
    /// File version this code is able to read.
    const VERSION: usize;

    /// Version read from the file.
    fn version(&self) -> usize;
}

/// A loaded configuration file of type `T`.
///
#[derive(Debug)]
pub struct ConfigFile<T: IntoConfig> {
    /// This is the base directory for all files.
    basedir: PathBuf,
    /// Full path of the file we loaded.
    fname: PathBuf,
    inner: T,
}

/// Find the base directory for all configuration files, `~/.config/poshan` on UNIX systems and
/// `%LOCALAPPDATA%\poshan` on Windows.
///
#[tracing::instrument]
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    match BaseDirs::new() {
        Some(base) => {
            #[cfg(unix)]
            let base = base.home_dir().join(".config");

            #[cfg(windows)]
            let base = base.data_local_dir().to_path_buf();

            debug!("base = {base:?}");
            Ok(makepath!(base, TAG))
        }
        None => {
            #[cfg(unix)]
            let homedir = env::var("HOME").map_err(|_| ConfigError::NoHome)?;

            #[cfg(windows)]
            let homedir = env::var("LOCALAPPDATA").map_err(|_| ConfigError::NoHome)?;

            debug!("base = {homedir}");

            #[cfg(unix)]
            let base = makepath!(homedir, ".config", TAG);

            #[cfg(windows)]
            let base = makepath!(homedir, TAG);

            Ok(base)
        }
    }
}

/// Parse the content of a configuration file and check its version.
///
#[tracing::instrument(skip(data))]
pub fn parse_config<T: IntoConfig>(data: &str, file: &Path) -> Result<T> {
    let data: T = hcl::from_str(data)?;
    debug!("struct data = {data:?}");

    if data.version() != T::VERSION {
        return Err(ConfigError::BadFileVersion {
            file: file.to_path_buf(),
            found: data.version(),
            want: T::VERSION,
        }
        .into());
    }
    Ok(data)
}

impl<T: IntoConfig> ConfigFile<T> {
    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the path of the file that was actually loaded
    ///
    pub fn file(&self) -> &Path {
        &self.fname
    }

    /// Returns the path of the default config file
    ///
    #[tracing::instrument]
    pub fn default_file() -> Result<PathBuf> {
        let cfg = config_dir()?.join(T::FILENAME);
        debug!("default = {cfg:?}");
        Ok(cfg)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI, as-is
    /// - file specified on CLI, inside the default basedir
    /// - default file in the basedir (based on $HOME or $LOCALAPPDATA)
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>) -> Result<ConfigFile<T>> {
        let basedir = config_dir()?;
        let default = basedir.join(T::FILENAME);

        let fname = match fname {
            Some(fname) => {
                let fname = PathBuf::from(fname);
                if fname.exists() {
                    fname
                } else {
                    basedir.join(fname)
                }
            }
            None => default.clone(),
        };

        // Use a full path
        //
        let fname = if fname.exists() {
            fname.canonicalize()?
        } else {
            return Err(ConfigError::MissingConfig(fname, default).into());
        };

        trace!("Loading config file {fname:?} from {basedir:?}");

        let data = fs::read_to_string(&fname)?;
        debug!("string data = {data}");

        let inner = parse_config::<T>(&data, &fname)?;
        Ok(ConfigFile {
            basedir,
            fname,
            inner,
        })
    }

    /// Write `content` as the default file if there is none yet.  Returns the path of the
    /// default file.
    ///
    #[tracing::instrument(skip(content))]
    pub fn install_default(content: &str) -> Result<PathBuf> {
        let dir = config_dir()?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let fname = dir.join(T::FILENAME);
        if !fname.exists() {
            trace!("installing {fname:?}");
            fs::write(&fname, content)?;
        }
        Ok(fname)
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Return the inner configuration file as mutable
    ///
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the wrapper
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}
