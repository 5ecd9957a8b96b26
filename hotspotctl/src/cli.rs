//! Module describing all possible commands and sub-commands to the `hotspotctl` main driver
//!
//! We have three main commands:
//!
//! - `resolve`
//! - `geocode`
//! - `list`
//!
//! `resolve` takes a batch of case records, either from a JSON file or from the dashboard
//! backend, geocodes every distinct postal code and displays the resulting table, viewport and
//! statistics.  The map view can be saved as JSON.
//!
//! `geocode` looks up a single postal code, mostly to check a geocoder configuration.
//!
//! `init` installs the default configuration files, `completion` is here just to configure the
//! various shells completion system.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser, ValueEnum};
use clap_complete::shells::Shell;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<String>,
    /// Sources file.
    #[clap(short = 'S', long)]
    pub sources: Option<String>,
    /// debug mode (hierarchical traces).
    #[clap(short = 'D', long = "debug")]
    pub debug: bool,
    /// Also log into this directory.
    #[clap(short = 'L', long)]
    pub log_dir: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `geocode [-g geocoder] CODE`
/// `init`
/// `list sources`
/// `resolve [-i FILE | -s SITE] [-g geocoder] [--hover CODE] [-o FILE]`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// Look up a single postal code
    Geocode(GeocodeOpts),
    /// Install default configuration files
    Init,
    /// List things
    List(ListOpts),
    /// Resolve a batch of cases into hotspots
    Resolve(ResolveOpts),
    /// List all package versions
    Version,
}

// ------

/// Options for `resolve`, the input is either a file or a backend site.
///
#[derive(Debug, Parser)]
pub struct ResolveOpts {
    /// JSON file with case records.
    #[clap(short = 'i', long, conflicts_with = "site")]
    pub input: Option<PathBuf>,
    /// Backend site to fetch cases from.
    #[clap(short = 's', long)]
    pub site: Option<String>,
    /// Geocoder to use instead of the configured one.
    #[clap(short = 'g', long)]
    pub geocoder: Option<String>,
    /// Highlight this postal code.
    #[clap(long)]
    pub hover: Option<String>,
    /// Save the map view as JSON.
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
}

// ------

#[derive(Debug, Parser)]
pub struct GeocodeOpts {
    /// Geocoder to use instead of the configured one.
    #[clap(short = 'g', long)]
    pub geocoder: Option<String>,
    /// Postal code
    pub code: String,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}

// ------

/// All  list` sub-commands:
///
/// `list sources`
///
#[derive(Debug, Parser)]
pub struct ListOpts {
    #[clap(value_parser)]
    pub cmd: ListSubCommand,
}

/// These are the sub-commands for `list`
///
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, ValueEnum)]
pub enum ListSubCommand {
    /// List all sources from `sources.hcl`
    Sources,
}
