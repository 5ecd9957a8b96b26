use eyre::Result;
use tracing::trace;

use poshan_engine::Resolver;
use poshan_sources::Sources;

use crate::{Config, GeocodeOpts};

/// Look up one postal code with the chosen geocoder.
///
#[tracing::instrument(skip(cfg, srcs))]
pub async fn geocode_one(cfg: &Config, srcs: &Sources, opts: &GeocodeOpts) -> Result<String> {
    let name = opts.geocoder.as_deref().unwrap_or(&cfg.geocoder);
    trace!("using {name}");

    let geocoder = srcs.as_geocoder(name, cfg.timeout()?)?;
    let resolver = Resolver::new(geocoder).timeout(cfg.timeout()?);

    let code = opts.code.trim();
    Ok(match resolver.geocode(code).await {
        Some(at) => format!("{code}: {at}"),
        None => format!("{code}: not found"),
    })
}
