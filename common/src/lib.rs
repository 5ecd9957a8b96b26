//! This library is there to share some common code amongst all poshan modules.
//!
//! - `ConfigFile<T>` finds and loads the versioned HCL configuration files,
//! - `init_logging()` sets up `tracing` for the binaries,
//! - `Coord` and `BB` are the small geographic primitives used by both the geocoders and the
//!   hotspot engine.
//!

mod config;
mod error;
mod location;
mod logging;
mod macros;

use clap::{crate_name, crate_version};
pub use config::*;
pub use error::*;
pub use location::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
