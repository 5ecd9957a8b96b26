//!  Module that defines what is a site (website, API endpoint, local table, etc.)
//!
//! This is used to configure the list of possible sources through `sources.hcl`.
//!
//! A site is either a geocoder (turning a postal code into coordinates) or the backend
//! serving the malnutrition case records.  Sites can have different ways to authenticate
//! (or not) the request.
//!
//! You can define a set of possible routes for a site depending on how the API/site is
//! designed.
//!

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Auth, Routes};

/// What a site is for.
///
#[derive(
    Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SiteKind {
    /// Nominatim-compatible search API
    #[default]
    Nominatim,
    /// Local postal code table
    Table,
    /// Case-data REST API
    Backend,
}

impl SiteKind {
    #[inline]
    pub fn is_geocoder(&self) -> bool {
        matches!(self, SiteKind::Nominatim | SiteKind::Table)
    }
}

/// Describe what a site is and associated credentials.
///
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Site {
    /// Kind of site
    #[serde(rename = "type")]
    pub kind: SiteKind,
    /// Name of the site, the block label in `sources.hcl`
    #[serde(skip_deserializing)]
    pub name: String,
    /// Base URL (to avoid repeating)
    #[serde(default)]
    pub base_url: String,
    /// Country the geocoder is scoped to
    pub country: Option<String>,
    /// Data file for table-based sites, relative to the configuration directory
    pub file: Option<String>,
    /// Credentials
    pub auth: Option<Auth>,
    /// Different URLs available
    pub routes: Option<Routes>,
}

impl Site {
    /// Basic `new()`
    ///
    #[inline]
    pub fn new() -> Self {
        Site::default()
    }

    /// Return the list of routes
    ///
    #[inline]
    pub fn list(&self) -> Vec<&String> {
        match &self.routes {
            Some(routes) => routes.keys().collect::<Vec<_>>(),
            _ => vec![],
        }
    }

    /// Check whether site has the mentioned route
    ///
    #[inline]
    pub fn has(&self, meth: &str) -> bool {
        match &self.routes {
            Some(routes) => routes.contains_key(meth),
            _ => false,
        }
    }

    /// Retrieve a route
    ///
    #[inline]
    pub fn route(&self, key: &str) -> Option<&String> {
        match &self.routes {
            Some(routes) => routes.get(key),
            _ => None,
        }
    }
}

impl Display for Site {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let auth = self.auth.clone().unwrap_or_default();
        write!(
            f,
            "{{ type={} url={} auth={} routes={:?} }}",
            self.kind, self.base_url, auth, self.routes
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn site() -> Site {
        let mut s: Site = hcl::from_str(
            r#"
type     = "nominatim"
base_url = "https://nominatim.openstreetmap.org"
country  = "India"
routes = {
  search = "/search"
}
"#,
        )
        .unwrap();
        s.name = "osm".to_string();
        s
    }

    #[test]
    fn test_site_list() {
        let s = site();
        assert_eq!(vec!["search"], s.list());
    }

    #[test]
    fn test_site_route() {
        let s = site();
        assert_eq!(Some(&"/search".to_string()), s.route("search"));
        assert!(s.route("cases").is_none());
    }

    #[test]
    fn test_site_has() {
        let s = site();
        assert!(s.has("search"));
        assert!(!s.has("get"));
    }

    #[test]
    fn test_site_display() {
        let s = site();
        let str = s.to_string();
        assert!(str.contains("type=nominatim"));
        assert!(str.contains("Anon"));
    }

    #[rstest]
    #[case("nominatim", SiteKind::Nominatim, true)]
    #[case("table", SiteKind::Table, true)]
    #[case("backend", SiteKind::Backend, false)]
    fn test_sitekind_from_str(#[case] s: &str, #[case] kind: SiteKind, #[case] geo: bool) {
        let k = SiteKind::from_str(s).unwrap();
        assert_eq!(kind, k);
        assert_eq!(geo, k.is_geocoder());
    }
}
