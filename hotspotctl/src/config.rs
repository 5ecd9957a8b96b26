//! Configuration of the `hotspotctl` driver.
//!
//! It names the geocoder and the backend to use (both defined in `sources.hcl`), the pacing of
//! geocoder calls and the view to fall back to when nothing can be mapped.
//!

use std::time::Duration;

use eyre::Result;
use serde::Deserialize;
use tracing::debug;

use poshan_common::{ConfigFile, IntoConfig};
use poshan_engine::{DefaultView, DEF_INTERVAL, DEF_TIMEOUT};

use crate::Status;

/// Config filename
pub const CONFIG: &str = "config.hcl";
/// Current version
pub const CVERSION: usize = 1;

/// Shipped with the binary, installed by `init`.
pub const DEFAULT_CONFIG: &str = include_str!("config.hcl");

/// Configuration for the CLI tool.
///
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub version: usize,
    /// Geocoder site
    #[serde(default = "def_geocoder")]
    pub geocoder: String,
    /// Backend site
    #[serde(default = "def_backend")]
    pub backend: String,
    /// Minimum delay between two geocoder calls, e.g. "1s"
    #[serde(default)]
    pub interval: Option<String>,
    /// Bound on a single geocoder call, e.g. "10s"
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub default_view: DefaultView,
}

fn def_geocoder() -> String {
    "nominatim".to_string()
}

fn def_backend() -> String {
    "dashboard".to_string()
}

impl IntoConfig for Config {
    const FILENAME: &'static str = CONFIG;
    const VERSION: usize = CVERSION;

    fn version(&self) -> usize {
        self.version
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: CVERSION,
            geocoder: def_geocoder(),
            backend: def_backend(),
            interval: None,
            timeout: None,
            default_view: DefaultView::default(),
        }
    }
}

impl Config {
    /// Load the given file or the default one.  Without both, use built-in defaults.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>) -> Result<Self> {
        if fname.is_none() && !ConfigFile::<Config>::default_file()?.exists() {
            debug!("no {CONFIG}, using defaults");
            return Ok(Config::default());
        }
        Ok(ConfigFile::<Config>::load(fname)?.into_inner())
    }

    pub fn interval(&self) -> Result<Duration> {
        parse_duration("interval", self.interval.as_deref(), DEF_INTERVAL)
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration("timeout", self.timeout.as_deref(), DEF_TIMEOUT)
    }
}

fn parse_duration(name: &str, value: Option<&str>, def: Duration) -> Result<Duration> {
    match value {
        Some(s) => match humantime::parse_duration(s) {
            Ok(d) => Ok(d),
            Err(e) => {
                Err(Status::BadDuration(name.to_string(), s.to_string(), e.to_string()).into())
            }
        },
        None => Ok(def),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use rstest::rstest;
    use tempfile::tempdir;

    use poshan_common::parse_config;

    use super::*;

    #[test]
    fn test_default_config_file() -> Result<()> {
        let cfg = parse_config::<Config>(DEFAULT_CONFIG, Path::new(CONFIG))?;

        assert_eq!("nominatim", cfg.geocoder);
        assert_eq!("dashboard", cfg.backend);
        assert_eq!(Duration::from_secs(1), cfg.interval()?);
        assert_eq!(Duration::from_secs(10), cfg.timeout()?);
        assert_eq!(DefaultView::default(), cfg.default_view);
        Ok(())
    }

    #[test]
    fn test_config_minimal() -> Result<()> {
        let cfg = parse_config::<Config>("version = 1\ngeocoder = \"local\"\n", Path::new(CONFIG))?;

        assert_eq!("local", cfg.geocoder);
        assert_eq!(DEF_INTERVAL, cfg.interval()?);
        assert_eq!(5, cfg.default_view.zoom);
        Ok(())
    }

    #[rstest]
    #[case("500ms", Duration::from_millis(500))]
    #[case("2s", Duration::from_secs(2))]
    #[case("1m", Duration::from_secs(60))]
    fn test_config_interval(#[case] s: &str, #[case] want: Duration) {
        let cfg = Config {
            interval: Some(s.to_string()),
            ..Default::default()
        };
        assert_eq!(want, cfg.interval().unwrap());
    }

    #[test]
    fn test_config_bad_duration() {
        let cfg = Config {
            timeout: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(cfg.timeout().is_err());
    }

    #[test]
    fn test_config_bad_version() {
        let cfg = parse_config::<Config>("version = 2\n", Path::new(CONFIG));
        assert!(cfg.is_err());
    }

    #[test]
    fn test_config_load_file() -> Result<()> {
        let dir = tempdir()?;
        let fname = dir.path().join("hotspot.hcl");
        fs::write(
            &fname,
            "version = 1\nbackend = \"staging\"\ndefault_view {\n  zoom = 7\n}\n",
        )?;

        let cfg = Config::load(fname.to_str())?;
        assert_eq!("staging", cfg.backend);
        assert_eq!(7, cfg.default_view.zoom);
        Ok(())
    }
}
