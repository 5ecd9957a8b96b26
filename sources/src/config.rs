//! This is the exposed part of the `poshan-sources` API.
//!
//! `Sources` is the catalogue of sites read from `sources.hcl`, it is also the factory turning
//! a site name into a ready-to-use geocoder or backend client.
//!

use std::collections::btree_map::{Iter, Keys};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::Result;
use serde::Deserialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, trace};

use poshan_common::{config_dir, parse_config, ConfigFile, IntoConfig};

use crate::{AccessError, Backend, Geocoder, Nominatim, Site, SiteKind, Table, SOURCES_CONFIG};

/// Built-in catalogue, used when there is no `sources.hcl` around.
const DEFAULT_SOURCES: &str = include_str!("sources.hcl");

/// On-disk form of `sources.hcl`.
///
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SourcesConfig {
    version: usize,
    #[serde(default)]
    site: BTreeMap<String, Site>,
}

impl IntoConfig for SourcesConfig {
    const FILENAME: &'static str = SOURCES_CONFIG;
    const VERSION: usize = 1;

    fn version(&self) -> usize {
        self.version
    }
}

/// List of sites, keyed by name.
///
#[derive(Clone, Debug)]
pub struct Sources {
    /// Directory relative data files (e.g. tables) are looked up in
    basedir: PathBuf,
    site: BTreeMap<String, Site>,
}

impl Sources {
    /// Load either the specified file or the default one.  Without a file name and without a
    /// default file, the built-in catalogue is used.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>) -> Result<Self> {
        let default = ConfigFile::<SourcesConfig>::default_file()?;

        if fname.is_none() && !default.exists() {
            debug!("no {default:?}, using built-in sources");
            return Sources::from_str(DEFAULT_SOURCES, &config_dir()?);
        }

        let cfg = ConfigFile::<SourcesConfig>::load(fname)?;
        let basedir = match cfg.file().parent() {
            Some(dir) => dir.to_path_buf(),
            None => cfg.config_path(),
        };
        Ok(Sources::from_config(cfg.into_inner(), basedir))
    }

    /// Parse a catalogue from HCL content.
    ///
    pub fn from_str(data: &str, basedir: &Path) -> Result<Self> {
        let cfg = parse_config::<SourcesConfig>(data, Path::new(SOURCES_CONFIG))?;
        Ok(Sources::from_config(cfg, basedir.to_path_buf()))
    }

    fn from_config(cfg: SourcesConfig, basedir: PathBuf) -> Self {
        // Sites get their name from their block label.
        //
        let site = cfg
            .site
            .into_iter()
            .map(|(n, mut s)| {
                s.name = n.clone();
                (n, s)
            })
            .collect();
        Sources { basedir, site }
    }

    /// Install the built-in catalogue as the default file.
    ///
    #[tracing::instrument]
    pub fn install_defaults() -> Result<PathBuf> {
        ConfigFile::<SourcesConfig>::install_default(DEFAULT_SOURCES)
    }

    /// Instantiate the geocoder `name`, with `timeout` for every request.
    ///
    #[tracing::instrument(skip(self))]
    pub fn as_geocoder(&self, name: &str, timeout: Duration) -> Result<Box<dyn Geocoder>> {
        let site = self
            .site
            .get(name)
            .ok_or(AccessError::UnknownSite(name.to_string()))?;
        trace!("site={}", site);

        match site.kind {
            SiteKind::Nominatim => {
                let mut s = Nominatim::new();
                s.load(site)?.timeout(timeout)?;
                Ok(Box::new(s))
            }
            SiteKind::Table => {
                let mut s = Table::new();
                s.load(site, &self.basedir)?;
                Ok(Box::new(s))
            }
            kind => Err(AccessError::InvalidSite(name.to_string(), kind, "geocoder").into()),
        }
    }

    /// Instantiate the case-data backend `name`.
    ///
    #[tracing::instrument(skip(self))]
    pub fn as_backend(&self, name: &str, timeout: Duration) -> Result<Backend> {
        let site = self
            .site
            .get(name)
            .ok_or(AccessError::UnknownSite(name.to_string()))?;
        trace!("site={}", site);

        let mut b = Backend::new();
        b.load(site)?.timeout(timeout)?;
        Ok(b)
    }

    /// List all sites as a table
    ///
    #[tracing::instrument(skip(self))]
    pub fn list(&self) -> Result<String> {
        let header = vec!["Name", "Type", "Base URL", "Country", "Auth", "Routes"];

        let mut builder = Builder::default();
        builder.push_record(header);

        self.site.iter().for_each(|(n, s)| {
            let country = s.country.clone().unwrap_or_else(|| "-".to_string());
            let auth = match &s.auth {
                Some(auth) => auth.to_string(),
                None => "anon".to_string(),
            };
            let routes = match &s.routes {
                Some(r) => r
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
                None => s.file.clone().unwrap_or_default(),
            };
            builder.push_record([
                n.to_owned(),
                s.kind.to_string(),
                s.base_url.to_owned(),
                country,
                auth,
                routes,
            ]);
        });

        let allf = builder.build().with(Style::modern()).to_string();
        Ok(format!("List all sources:\n{allf}"))
    }

    /// Wrap `get`
    ///
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Site> {
        self.site.get(name)
    }

    /// Wrap `is_empty()`
    ///
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.site.is_empty()
    }

    /// Wrap `len()`
    ///
    #[inline]
    pub fn len(&self) -> usize {
        self.site.len()
    }

    /// Wrap `keys()`
    ///
    #[inline]
    pub fn keys(&self) -> Keys<'_, String, Site> {
        self.site.keys()
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, String, Site> {
        self.site.iter()
    }
}
