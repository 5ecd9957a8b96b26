//! Nominatim (OpenStreetMap) specific code
//!
//! We use the structured search endpoint with `postalcode` and `country` and only look at the
//! first answer.  The usage policy asks for an identifying `user-agent` and at most one request
//! per second; the former is done here, the latter by the caller.
//!
//! Every request is bounded by the client timeout, a request that times out is just another
//! way of not finding the postal code.
//!

use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use tracing::{debug, trace, warn};

use poshan_common::Coord;

use crate::{http_get, AccessError, GeocodeError, Geocoder, Site, SiteKind};

/// Default per-request timeout
pub const DEF_TIMEOUT: Duration = Duration::from_secs(10);

/// Default country
const DEF_COUNTRY: &str = "India";

/// One answer from `/search?format=json`, Nominatim sends coordinates as strings.
///
#[serde_as]
#[derive(Debug, Deserialize)]
struct Place {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    lat: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    lon: f64,
}

/// Nominatim represent what is needed to query a Nominatim-compatible search API.
///
#[derive(Clone, Debug)]
pub struct Nominatim {
    /// Name of the site
    pub site: String,
    /// Base site url taken from config
    pub base_url: String,
    /// Add this to `base_url` to search
    pub search: String,
    /// Every lookup is scoped to this country
    pub country: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// reqwest async client
    pub client: Client,
}

impl Nominatim {
    #[tracing::instrument]
    pub fn new() -> Self {
        trace!("nominatim::new");

        Nominatim {
            site: "nominatim".to_string(),
            base_url: "".to_owned(),
            search: "/search".to_owned(),
            country: DEF_COUNTRY.to_owned(),
            timeout: DEF_TIMEOUT,
            client: Client::new(),
        }
    }

    /// Load some data from the configuration file
    ///
    #[tracing::instrument]
    pub fn load(&mut self, site: &Site) -> Result<&mut Self> {
        trace!("nominatim::load");

        if site.kind != SiteKind::Nominatim {
            return Err(AccessError::InvalidSite(site.name.clone(), site.kind, "nominatim").into());
        }
        self.site = site.name.clone();
        self.base_url = site.base_url.to_owned();
        if let Some(country) = &site.country {
            self.country = country.to_owned();
        }
        self.search = site
            .route("search")
            .ok_or(AccessError::MissingRoute(site.name.clone(), "search".to_string()))?
            .to_owned();
        Ok(self)
    }

    /// Override the country from the site definition
    ///
    pub fn country(&mut self, country: &str) -> &mut Self {
        self.country = country.to_owned();
        self
    }

    /// Set the per-request timeout, this rebuilds the client.
    ///
    #[tracing::instrument(skip(self))]
    pub fn timeout(&mut self, timeout: Duration) -> Result<&mut Self> {
        self.timeout = timeout;
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Do the actual lookup, keeping the reason for failure.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, postal_code: &str) -> Result<Coord, GeocodeError> {
        let url = format!("{}{}", self.base_url, self.search);
        trace!("Searching {} through {}…", postal_code, url);

        let query = [
            ("postalcode", postal_code),
            ("country", self.country.as_str()),
            ("format", "json"),
            ("limit", "1"),
        ];
        let resp = http_get!(self, url, &query).await?;

        debug!("raw resp={:?}", &resp);

        // Check status
        //
        match resp.status() {
            StatusCode::OK => {}
            code => return Err(GeocodeError::Status(code.as_u16())),
        }

        let resp = resp.text().await?;
        trace!("resp={}", resp);

        let places: Vec<Place> =
            serde_json::from_str(&resp).map_err(|e| GeocodeError::Decoding(e.to_string()))?;

        // Only the first match matters
        //
        let place = places
            .into_iter()
            .next()
            .ok_or(GeocodeError::NoMatch(postal_code.to_string()))?;

        let coord = Coord::new(place.lat, place.lon);
        if !coord.is_valid() {
            return Err(GeocodeError::BadCoord(postal_code.to_string()));
        }
        Ok(coord)
    }
}

impl Default for Nominatim {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    fn name(&self) -> String {
        self.site.to_string()
    }

    #[tracing::instrument(skip(self))]
    async fn geocode(&self, postal_code: &str) -> Option<Coord> {
        match self.lookup(postal_code).await {
            Ok(coord) => {
                debug!("{} -> {}", postal_code, coord);
                Some(coord)
            }
            Err(GeocodeError::NoMatch(code)) => {
                debug!("no match for {}", code);
                None
            }
            Err(e) => {
                warn!("{}: can not resolve {}: {}", self.site, postal_code, e);
                None
            }
        }
    }
}
