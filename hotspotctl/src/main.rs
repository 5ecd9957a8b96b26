use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace};

use hotspotctl::{
    geocode_one, install_defaults, list_sources, resolve_cases, Config, ListSubCommand, Opts,
    SubCommand,
};
use poshan_common::init_logging;
use poshan_sources::Sources;

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    init_logging(NAME, opts.debug, opts.log_dir.clone())?;

    // Banner
    //
    banner()?;

    let cfg = Config::load(opts.config.as_deref())?;
    trace!("cfg = {cfg:?}");

    let srcs = Sources::load(opts.sources.as_deref())?;

    handle_subcmd(&cfg, &srcs, &opts.subcmd).await
}

pub async fn handle_subcmd(cfg: &Config, srcs: &Sources, subcmd: &SubCommand) -> Result<()> {
    match subcmd {
        // Handle `resolve`
        //
        SubCommand::Resolve(ropts) => {
            trace!("resolve");

            let str = resolve_cases(cfg, srcs, ropts).await?;
            println!("{}", str);
        }

        // Handle `geocode code`
        //
        SubCommand::Geocode(gopts) => {
            trace!("geocode");

            let str = geocode_one(cfg, srcs, gopts).await?;
            println!("{}", str);
        }

        SubCommand::Init => {
            for fname in install_defaults()? {
                eprintln!("{}", fname.display());
            }
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `list` command
        //
        SubCommand::List(lopts) => match lopts.cmd {
            ListSubCommand::Sources => {
                info!("Listing all sources:");

                let str = list_sources(srcs)?;
                eprintln!("{}", str);
            }
        },

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", poshan_common::version());
            eprintln!("\t{}", poshan_sources::version());
            eprintln!("\t{}", poshan_engine::version());
        }
    }
    Ok(())
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
