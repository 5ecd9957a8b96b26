//! Hotspot engine.
//!
//! Turns a batch of case records into map-ready locations:
//!
//! - `dedupe()` keeps one record per postal code,
//! - `Resolver` geocodes what needs to be, through a `Pacer`,
//! - `Session` makes sure only the latest pass is ever published,
//! - `Synchronizer` shares the hover state between `MapLayer` and `TableLayer`.
//!

mod dedup;
mod error;
mod model;
mod pacer;
mod resolver;
mod session;
mod stats;
mod sync;
mod view;
mod viewport;

pub use dedup::*;
pub use error::*;
pub use model::*;
pub use pacer::*;
pub use resolver::*;
pub use session::*;
pub use stats::*;
pub use sync::*;
pub use view::*;
pub use viewport::*;

const NAME: &str = env!("CARGO_PKG_NAME");
const EVERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    format!("{}/{}", NAME, EVERSION)
}
