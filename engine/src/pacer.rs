//! Minimal-interval pacing of calls to an external service.
//!
//! The geocoding service tolerates one request per interval: a call may only start `interval`
//! after the previous one has *completed*.  The pacer keeps the completion instant of the last
//! call and sleeps until the next slot before starting a new one.
//!
//! `run()` takes `&mut self`, so callers wanting several tasks to share one pacer put it behind
//! a `tokio::sync::Mutex` and hold the guard for the whole call.
//!

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Default interval, the public Nominatim policy is one request per second
pub const DEF_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct Pacer {
    interval: Duration,
    /// Completion of the last call
    last: Option<Instant>,
    calls: usize,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Pacer {
            interval,
            last: None,
            calls: 0,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Calls made so far
    ///
    #[inline]
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Earliest instant the next call may start.
    ///
    pub fn next_slot(&self) -> Option<Instant> {
        self.last.map(|last| last + self.interval)
    }

    /// Wait for the next slot, run `call` then record its completion.  `call` is not polled
    /// before the slot is reached.
    ///
    pub async fn run<F>(&mut self, call: F) -> F::Output
    where
        F: Future,
    {
        if let Some(slot) = self.next_slot() {
            trace!("pacing until {:?}", slot);
            sleep_until(slot).await;
        }
        let res = call.await;
        self.last = Some(Instant::now());
        self.calls += 1;
        res
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Pacer::new(DEF_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pacer_first_call_is_immediate() {
        let mut p = Pacer::default();
        let start = Instant::now();

        p.run(async {}).await;
        assert_eq!(start, Instant::now());
        assert_eq!(1, p.calls());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacer_spacing_after_completion() {
        let mut p = Pacer::new(Duration::from_millis(1000));
        let mut starts = vec![];

        for _ in 0..3 {
            p.run(async {
                starts.push(Instant::now());
                sleep(Duration::from_millis(300)).await;
            })
            .await;
        }

        // Each call lasts 300ms, the next one starts 1s after that.
        assert_eq!(Duration::from_millis(1300), starts[1] - starts[0]);
        assert_eq!(Duration::from_millis(1300), starts[2] - starts[1]);
        assert_eq!(3, p.calls());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacer_no_wait_when_slot_passed() {
        let mut p = Pacer::new(Duration::from_millis(500));

        p.run(async {}).await;
        sleep(Duration::from_secs(2)).await;

        let before = Instant::now();
        p.run(async {}).await;
        assert_eq!(before, Instant::now());
    }
}
