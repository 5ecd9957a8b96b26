//! The hotspot resolver.
//!
//! One pass takes a batch of case records and produces every location we can put on the map:
//!
//! 1. dedup per postal code,
//! 2. records already carrying coordinates are accepted as-is,
//! 3. the others go through the geocoder, one call at a time, paced and bounded by a timeout,
//! 4. the bounds of everything resolved are computed at the end.
//!
//! A failed lookup only loses that one location.
//!

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, trace};

use poshan_common::Coord;
use poshan_sources::Geocoder;

use crate::{
    dedupe_counted, Batch, CaseRecord, DefaultView, Entry, Pacer, ResolvedLocation, Stats, Viewport,
    ViewportBounds, DEF_INTERVAL,
};

/// Upper bound of a single geocoder call
pub const DEF_TIMEOUT: Duration = Duration::from_secs(10);

/// Output of a pass.
///
#[derive(Clone, Debug, Default, Serialize)]
pub struct Resolution {
    pub locations: Vec<ResolvedLocation>,
    pub bounds: Option<ViewportBounds>,
    pub stats: Stats,
}

impl Resolution {
    /// Fit the bounds, or use `default` when nothing resolved.
    ///
    pub fn viewport(&self, default: &DefaultView) -> Viewport {
        Viewport::new(self.bounds, default)
    }

    pub fn get(&self, postal_code: &str) -> Option<&ResolvedLocation> {
        self.locations.iter().find(|l| l.postal_code == postal_code)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }
}

/// Runs passes against one geocoder.
///
/// The pacer sits behind a lock so that every pass going through this resolver, or through any
/// resolver sharing its pacer, waits for its turn: there is never more than one geocoder call in
/// flight, even when a new pass starts before the previous one is done.
///
#[derive(Debug)]
pub struct Resolver {
    geocoder: Box<dyn Geocoder>,
    pacer: Arc<Mutex<Pacer>>,
    timeout: Duration,
}

impl Resolver {
    pub fn new(geocoder: Box<dyn Geocoder>) -> Self {
        Resolver {
            geocoder,
            pacer: Arc::new(Mutex::new(Pacer::new(DEF_INTERVAL))),
            timeout: DEF_TIMEOUT,
        }
    }

    /// Minimum delay between the end of a call and the start of the next one.
    ///
    pub fn interval(mut self, interval: Duration) -> Self {
        self.pacer = Arc::new(Mutex::new(Pacer::new(interval)));
        self
    }

    /// Use the same pacer as another resolver.
    ///
    pub fn with_pacer(mut self, pacer: Arc<Mutex<Pacer>>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn pacer(&self) -> Arc<Mutex<Pacer>> {
        Arc::clone(&self.pacer)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[inline]
    pub fn name(&self) -> String {
        self.geocoder.name()
    }

    /// One paced, bounded lookup.  A stalled call is the same as no match.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn geocode(&self, postal_code: &str) -> Option<Coord> {
        let limit = self.timeout;
        let geocoder = &self.geocoder;

        let mut pacer = self.pacer.lock().await;
        // The deadline only starts once our slot is reached.
        let res = pacer
            .run(async move { timeout(limit, geocoder.geocode(postal_code)).await })
            .await;
        drop(pacer);

        match res {
            Ok(Some(at)) if at.is_valid() => Some(at),
            Ok(Some(at)) => {
                debug!("{postal_code}: invalid position {at}");
                None
            }
            Ok(None) => None,
            Err(_) => {
                debug!("{postal_code}: no answer after {:?}", limit);
                None
            }
        }
    }

    /// Resolve a parsed batch, its malformed elements are accounted for in the stats.
    ///
    pub async fn resolve_batch(&self, batch: Batch) -> Resolution {
        let mut res = self.resolve(batch.records).await;
        res.stats.input += batch.malformed;
        res.stats.malformed += batch.malformed;
        res
    }

    /// Run a full pass over `records`.
    ///
    #[tracing::instrument(skip(self, records), fields(geocoder = %self.geocoder.name()))]
    pub async fn resolve(&self, records: Vec<CaseRecord>) -> Resolution {
        let mut stats = Stats {
            input: records.len(),
            ..Default::default()
        };
        let (records, missing) = dedupe_counted(records);
        stats.malformed = missing;
        stats.unique = records.len();

        let mut locations = Vec::with_capacity(records.len());

        for rec in records {
            match Entry::from(rec) {
                Entry::Resolved(loc) => {
                    trace!("{}: preset at {}", loc.postal_code, loc.coord());
                    stats.preset += 1;
                    locations.push(loc);
                }
                Entry::Unresolved(rec) => {
                    let Some(code) = rec.postal_code().map(str::to_owned) else {
                        continue;
                    };
                    stats.calls += 1;
                    match self.geocode(&code).await {
                        Some(at) => match ResolvedLocation::new(rec, at) {
                            Some(loc) => {
                                trace!("{code}: found at {at}");
                                stats.geocoded += 1;
                                locations.push(loc);
                            }
                            None => stats.dropped += 1,
                        },
                        None => {
                            debug!("{code}: not found, dropped");
                            stats.dropped += 1;
                        }
                    }
                }
            }
        }

        let bounds = ViewportBounds::from_coords(locations.iter().map(ResolvedLocation::coord));
        info!("{stats}");

        Resolution {
            locations,
            bounds,
            stats,
        }
    }
}
