//! Access methods for every kind of site.
//!

pub use backend::*;
pub use nominatim::*;
pub use table::*;

mod backend;
mod nominatim;
mod table;
