//! Offline geocoder backed by a postal code table.
//!
//! The table is an HCL file:
//!
//! ```hcl
//! version = 1
//!
//! postcode "110001" {
//!   lat = 28.6328
//!   lon = 77.2197
//! }
//! ```
//!

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use eyre::{eyre, Result};
use serde::Deserialize;
use tracing::{debug, trace};

use poshan_common::Coord;

use crate::{AccessError, Geocoder, Site, SiteKind};

/// Current table file version
const TABLE_FILE_VER: usize = 1;

/// On-disk structure for the table file
///
#[derive(Debug, Deserialize)]
struct TableFile {
    /// Version number for safety
    version: usize,
    /// Postal code to coordinates
    #[serde(default)]
    postcode: BTreeMap<String, Coord>,
}

#[derive(Clone, Debug, Default)]
pub struct Table {
    /// Name of the site
    pub site: String,
    postcodes: BTreeMap<String, Coord>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Load the table file named by the site, relative paths are taken from `basedir`.
    ///
    #[tracing::instrument]
    pub fn load(&mut self, site: &Site, basedir: &Path) -> Result<&mut Self> {
        trace!("table::load");

        if site.kind != SiteKind::Table {
            return Err(AccessError::InvalidSite(site.name.clone(), site.kind, "table").into());
        }
        let file = site
            .file
            .as_ref()
            .ok_or(AccessError::MissingFile(site.name.clone()))?;
        let fname = basedir.join(file);
        debug!("reading {fname:?}");

        let data = fs::read_to_string(&fname)?;
        self.site = site.name.clone();
        self.postcodes = Table::parse(&data)?;
        Ok(self)
    }

    /// Build a table straight from HCL content.
    ///
    pub fn from_str(name: &str, data: &str) -> Result<Self> {
        Ok(Table {
            site: name.to_string(),
            postcodes: Table::parse(data)?,
        })
    }

    fn parse(data: &str) -> Result<BTreeMap<String, Coord>> {
        let table: TableFile = hcl::from_str(data)?;
        if table.version != TABLE_FILE_VER {
            return Err(eyre!("Bad table file version {}, aborting…", table.version));
        }
        if let Some((code, _)) = table.postcode.iter().find(|(_, c)| !c.is_valid()) {
            return Err(eyre!("Bad coordinates for {code} in table"));
        }
        Ok(table.postcode)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.postcodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.postcodes.is_empty()
    }
}

#[async_trait]
impl Geocoder for Table {
    fn name(&self) -> String {
        self.site.to_string()
    }

    async fn geocode(&self, postal_code: &str) -> Option<Coord> {
        let res = self.postcodes.get(postal_code.trim()).copied();
        trace!("{} -> {:?}", postal_code, res);
        res
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    const TABLE: &str = r#"
version = 1

postcode "110001" {
  lat = 28.6328
  lon = 77.2197
}

postcode "400001" {
  lat = 18.9388
  lon = 72.8354
}
"#;

    #[tokio::test]
    async fn test_table_geocode() -> Result<()> {
        let t = Table::from_str("local", TABLE)?;
        assert_eq!(2, t.len());
        assert_eq!(Some(Coord::new(28.6328, 77.2197)), t.geocode("110001").await);
        assert_eq!(Some(Coord::new(18.9388, 72.8354)), t.geocode(" 400001 ").await);
        assert_eq!(None, t.geocode("000000").await);
        Ok(())
    }

    #[test]
    fn test_table_bad_version() {
        let t = Table::from_str("local", "version = 3\n");
        assert!(t.is_err());
    }

    #[test]
    fn test_table_bad_coordinates() {
        let t = Table::from_str(
            "local",
            "version = 1\npostcode \"1\" {\n  lat = 120.0\n  lon = 0.0\n}\n",
        );
        assert!(t.is_err());
    }

    #[test]
    fn test_table_load_from_site() -> Result<()> {
        let dir = tempdir()?;
        let mut f = fs::File::create(dir.path().join("postcodes.hcl"))?;
        f.write_all(TABLE.as_bytes())?;

        let site = Site {
            kind: SiteKind::Table,
            name: "local".to_string(),
            file: Some("postcodes.hcl".to_string()),
            ..Site::default()
        };
        let mut t = Table::new();
        t.load(&site, dir.path())?;
        assert_eq!(2, t.len());
        Ok(())
    }
}
