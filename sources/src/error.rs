use thiserror::Error;

use crate::SiteKind;

/// Errors related to finding & instantiating a site from `sources.hcl`.
///
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Unknown site {0}")]
    UnknownSite(String),
    #[error("Site {0} is a {1} site, not a {2}")]
    InvalidSite(String, SiteKind, &'static str),
    #[error("Site {0} has no route {1}")]
    MissingRoute(String, String),
    #[error("Site {0} has no data file")]
    MissingFile(String),
}

/// Why a postal code could not be resolved.  This never leaves the geocoders, callers only
/// see "not found".
///
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    HTTP(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Bad status {0}")]
    Status(u16),
    #[error("Decoding: {0}")]
    Decoding(String),
    #[error("No match for {0}")]
    NoMatch(String),
    #[error("Bad coordinates for {0}")]
    BadCoord(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeocodeError::Timeout
        } else {
            GeocodeError::HTTP(e.to_string())
        }
    }
}

/// Errors from the case-data backend.
///
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    HTTP(String),
    #[error("Bad status {0} from {1}")]
    Status(u16, String),
    #[error("Error retrieving token for {0}")]
    Retrieval(String),
    #[error("Decoding token: {0}")]
    Decoding(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::HTTP(e.to_string())
    }
}
