//! Module to deal with the different kind of sources we talk to.
//!
//! There are two families:
//!
//! - geocoders, turning a postal code into a `Coord` (`Nominatim`, `Table`), all behind the
//!   [`Geocoder`] trait,
//! - the case-data backend (`Backend`), returning the raw JSON batch of case records.
//!
//! Sites are described in `sources.hcl`, see [`Sources`].
//!

use std::fmt::Debug;

use async_trait::async_trait;

use poshan_common::Coord;

// Re-export these modules for a shorted import path.
//
pub use access::*;
pub use auth::*;
pub use config::*;
pub use error::*;
pub use route::*;
pub use site::*;

mod access;
mod auth;
mod config;
mod error;
mod route;
mod site;

#[macro_use]
mod macros;

/// This trait enables us to manage different ways of resolving a postal code under a single
/// interface.
///
/// One call is one lookup: no retries, no queuing, pacing the calls is the caller's job.
/// Whatever goes wrong (no match, network error, timeout, bad payload) collapses into `None`.
///
#[async_trait]
pub trait Geocoder: Debug + Send + Sync {
    /// Return site's name
    fn name(&self) -> String;
    /// Resolve one postal code
    async fn geocode(&self, postal_code: &str) -> Option<Coord>;
}

/// Default configuration filename
pub const SOURCES_CONFIG: &str = "sources.hcl";

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
