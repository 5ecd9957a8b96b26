//! Library part of the `hotspotctl` utility.
//!
//! The binary only parses options, loads the configuration and dispatches to the commands found
//! here.  Sites (geocoders and the case backend) come from the `poshan-sources` crate, the
//! resolution itself from `poshan-engine`.
//!

pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use error::*;

mod cli;
mod cmds;
mod config;
mod error;
