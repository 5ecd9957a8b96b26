//! `resolve` command.
//!
//! Get a batch of cases, run one resolution pass and render both layers.
//!

use std::fs;

use eyre::Result;
use serde::Serialize;
use tracing::{info, trace};

use poshan_engine::{
    CaseRecord, MapView, Resolver, Row, Session, Stats, Synchronizer, TableLayer,
};
use poshan_sources::Sources;

use crate::{Config, ResolveOpts, Status};

/// What `-o` saves.
///
#[derive(Debug, Serialize)]
struct Export<'a> {
    map: &'a MapView,
    rows: &'a [Row],
    stats: &'a Stats,
}

/// Read the batch either from the given file or from the backend.
///
#[tracing::instrument(skip(cfg, srcs))]
async fn read_batch(cfg: &Config, srcs: &Sources, opts: &ResolveOpts) -> Result<String> {
    match &opts.input {
        Some(fname) => {
            trace!("reading {fname:?}");
            Ok(fs::read_to_string(fname)?)
        }
        None => {
            let name = opts.site.as_deref().unwrap_or(&cfg.backend);
            info!("fetching cases from {name}");

            let backend = srcs.as_backend(name, cfg.timeout()?)?;
            Ok(backend.fetch().await?)
        }
    }
}

#[tracing::instrument(skip(cfg, srcs))]
pub async fn resolve_cases(cfg: &Config, srcs: &Sources, opts: &ResolveOpts) -> Result<String> {
    let data = read_batch(cfg, srcs, opts).await?;
    let batch = CaseRecord::parse_batch(&data)?;

    let name = opts.geocoder.as_deref().unwrap_or(&cfg.geocoder);
    let geocoder = srcs.as_geocoder(name, cfg.timeout()?)?;
    let resolver = Resolver::new(geocoder)
        .interval(cfg.interval()?)
        .timeout(cfg.timeout()?);

    let session = Session::new();
    let ticket = session.request();
    let res = resolver.resolve_batch(batch).await;
    session.publish(ticket, res);

    let sync = Synchronizer::new();
    let map = sync.map_layer(cfg.default_view);
    let table = sync.table_layer();
    if let Some(code) = &opts.hover {
        sync.enter(code);
    }

    let current = session.current();
    let view = map.render(&current);
    let rows = table.render(&current);

    if let Some(fname) = &opts.output {
        let export = Export {
            map: &view,
            rows: &rows,
            stats: &current.stats,
        };
        let json = serde_json::to_string_pretty(&export)?;
        fs::write(fname, json)
            .map_err(|e| Status::Output(fname.display().to_string(), e.to_string()))?;
        info!("map view saved in {fname:?}");
    }

    let mut out = vec![
        TableLayer::to_table(&rows),
        format!("viewport: {}", view.viewport),
        format!("stats: {}", current.stats),
    ];
    if let Some(summary) = current.stats.summary() {
        out.push(summary);
    }
    Ok(out.join("\n"))
}
