//! All about `Stats`.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Counters for one resolution pass.
///
/// - `input`: records handed to the pass (including malformed elements of the batch)
/// - `malformed`: records dropped before dedup (bad shape or no postal code)
/// - `unique`: distinct postal codes
/// - `preset`: records that already carried coordinates
/// - `geocoded`: records resolved by a geocoder call
/// - `dropped`: records the geocoder could not resolve
/// - `calls`: geocoder calls made
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    pub input: usize,
    pub malformed: usize,
    pub unique: usize,
    pub preset: usize,
    pub geocoded: usize,
    pub dropped: usize,
    pub calls: usize,
}

impl Stats {
    /// Locations we could not put on the map.
    ///
    #[inline]
    pub fn unmapped(&self) -> usize {
        self.dropped
    }

    /// Locations on the map.
    ///
    #[inline]
    pub fn mapped(&self) -> usize {
        self.preset + self.geocoded
    }

    /// One-line notice for the user, only when something is missing.
    ///
    pub fn summary(&self) -> Option<String> {
        match self.dropped {
            0 => None,
            n => Some(format!(
                "{n} of {} locations could not be mapped",
                self.unique
            )),
        }
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "records={} malformed={} unique={} preset={} geocoded={} dropped={} calls={}",
            self.input,
            self.malformed,
            self.unique,
            self.preset,
            self.geocoded,
            self.dropped,
            self.calls
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_display() {
        let s = Stats {
            input: 5,
            malformed: 1,
            unique: 3,
            preset: 1,
            geocoded: 1,
            dropped: 1,
            calls: 2,
        };
        assert_eq!(
            "records=5 malformed=1 unique=3 preset=1 geocoded=1 dropped=1 calls=2",
            s.to_string()
        );
        assert_eq!(2, s.mapped());
        assert_eq!(
            Some("1 of 3 locations could not be mapped".to_string()),
            s.summary()
        );
    }

    #[test]
    fn test_stats_nothing_missing() {
        let s = Stats {
            unique: 2,
            geocoded: 2,
            ..Default::default()
        };
        assert!(s.summary().is_none());
        assert_eq!(0, s.unmapped());
    }
}
