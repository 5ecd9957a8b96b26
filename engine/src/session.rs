//! Supersession of resolution passes.
//!
//! Every pass gets a `Ticket` when it is requested.  When it completes, its result is only
//! published if no other pass was requested in the meantime, so a slow pass over an old batch
//! can never overwrite the map of a newer one.
//!
//! Passes are not cancelled.  Overlapping passes going through the same `Resolver` (or resolvers
//! sharing a pacer) take turns at the geocoder, one call at a time.
//!

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace};

use crate::{CaseRecord, Resolution, Resolver};

/// Generation number of a pass.
///
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Session {
    /// Latest ticket handed out
    latest: AtomicU64,
    current: watch::Sender<Arc<Resolution>>,
}

impl Session {
    pub fn new() -> Self {
        let (current, _) = watch::channel(Arc::new(Resolution::default()));
        Session {
            latest: AtomicU64::new(0),
            current,
        }
    }

    /// Start a new pass, it supersedes all the previous ones.
    ///
    pub fn request(&self) -> Ticket {
        let t = Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        trace!("new pass {:?}", t);
        t
    }

    #[inline]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Install `res` if `ticket` is still the latest request, otherwise discard it.
    ///
    pub fn publish(&self, ticket: Ticket, res: Resolution) -> bool {
        if !self.is_current(ticket) {
            debug!("pass {:?} superseded, result discarded", ticket);
            return false;
        }
        self.current.send_replace(Arc::new(res));
        true
    }

    /// Request, resolve and publish in one go.
    ///
    #[tracing::instrument(skip_all)]
    pub async fn run(&self, resolver: &Resolver, records: Vec<CaseRecord>) -> bool {
        let ticket = self.request();
        let res = resolver.resolve(records).await;
        self.publish(ticket, res)
    }

    /// Latest published result.
    ///
    pub fn current(&self) -> Arc<Resolution> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Resolution>> {
        self.current.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::{sleep, Instant};

    use poshan_common::Coord;
    use poshan_sources::Geocoder;

    use crate::{Severity, DEF_INTERVAL};

    use super::*;

    type CallLog = Arc<Mutex<Vec<(Instant, Instant)>>>;

    /// Answers everything after `delay`, records when each call starts and ends.
    ///
    #[derive(Debug, Default)]
    struct Slow {
        delay: Duration,
        log: CallLog,
    }

    impl Slow {
        fn new(delay: Duration) -> Self {
            Slow {
                delay,
                ..Default::default()
            }
        }

        fn log(mut self, log: CallLog) -> Self {
            self.log = log;
            self
        }
    }

    #[async_trait]
    impl Geocoder for Slow {
        fn name(&self) -> String {
            "slow".to_string()
        }

        async fn geocode(&self, _postal_code: &str) -> Option<Coord> {
            let start = Instant::now();
            sleep(self.delay).await;
            self.log.lock().unwrap().push((start, Instant::now()));
            Some(Coord::new(10., 10.))
        }
    }

    /// Calls never overlap and are at least `interval` apart.
    ///
    fn assert_paced(log: &CallLog, interval: Duration) {
        let mut calls = log.lock().unwrap().clone();
        calls.sort();
        for w in calls.windows(2) {
            let (_, end) = w[0];
            let (start, _) = w[1];
            assert!(start >= end + interval, "{:?} starts too early", w[1]);
        }
    }

    fn batch(codes: &[&str]) -> Vec<CaseRecord> {
        codes
            .iter()
            .map(|c| CaseRecord {
                child_id: c.to_string(),
                postal_code: Some(c.to_string()),
                severity: Severity::Severe,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_session_tickets() {
        let s = Session::new();
        let t1 = s.request();
        let t2 = s.request();

        assert!(t1 < t2);
        assert!(!s.is_current(t1));
        assert!(s.is_current(t2));
        assert!(!s.publish(t1, Resolution::default()));
        assert!(s.publish(t2, Resolution::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_stale_pass_discarded() {
        let s = Session::new();
        let mut rx = s.subscribe();
        let log = CallLog::default();
        let old = Resolver::new(Box::new(Slow::new(Duration::from_secs(5)).log(log.clone())));
        let new = Resolver::new(Box::new(Slow::new(Duration::from_millis(10)).log(log.clone())))
            .with_pacer(old.pacer());

        // The old pass is requested first but completes last.
        let (a, b) = tokio::join!(
            s.run(&old, batch(&["1", "2", "3"])),
            s.run(&new, batch(&["4"])),
        );

        assert!(!a);
        assert!(b);
        assert!(rx.has_changed().unwrap());
        let cur = rx.borrow_and_update().clone();
        assert_eq!(1, cur.len());
        assert_eq!("4", cur.locations[0].postal_code);
        assert_eq!(1, s.current().len());

        assert_eq!(4, log.lock().unwrap().len());
        assert_paced(&log, DEF_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_overlapping_passes_take_turns() {
        let s = Session::new();
        let log = CallLog::default();
        let interval = Duration::from_millis(500);
        let r = Resolver::new(Box::new(Slow::new(Duration::from_millis(300)).log(log.clone())))
            .interval(interval);

        let (a, b) = tokio::join!(
            s.run(&r, batch(&["1", "2", "3"])),
            s.run(&r, batch(&["4", "5"])),
        );

        assert!(!a);
        assert!(b);
        assert_eq!(2, s.current().len());
        assert_eq!(5, log.lock().unwrap().len());
        assert_paced(&log, interval);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_sequential_passes() {
        let s = Session::new();
        let r = Resolver::new(Box::new(Slow::new(Duration::from_millis(10))));

        assert!(s.run(&r, batch(&["1"])).await);
        assert!(s.run(&r, batch(&["2", "3"])).await);
        assert_eq!(2, s.current().len());
    }
}
