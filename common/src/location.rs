//! Location related module
//!
//! `Coord` is a plain WGS84 point, `BB` the bounding box of a set of points.
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Actual location
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Coord {
    /// Latitude
    #[serde(alias = "latitude")]
    pub lat: f64,
    /// Longitude
    #[serde(alias = "longitude")]
    pub lon: f64,
}

impl Coord {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Coord { lat, lon }
    }

    /// Finite and inside [-90, 90] x [-180, 180].
    ///
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Midpoint of two points, no great-circle business.
    ///
    #[inline]
    pub fn midpoint(&self, other: &Coord) -> Coord {
        Coord {
            lat: (self.lat + other.lat) / 2.,
            lon: (self.lon + other.lon) / 2.,
        }
    }
}

impl From<(f64, f64)> for Coord {
    fn from((lat, lon): (f64, f64)) -> Self {
        Coord { lat, lon }
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Bounding box
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BB {
    /// Longitude - X0
    pub min_lon: f64,
    /// Latitude - Y0
    pub min_lat: f64,
    /// Longitude - X1
    pub max_lon: f64,
    /// Latitude - Y1
    pub max_lat: f64,
}

impl BB {
    /// Degenerate box around a single point.
    ///
    pub fn from_point(c: Coord) -> Self {
        BB {
            min_lon: c.lon,
            min_lat: c.lat,
            max_lon: c.lon,
            max_lat: c.lat,
        }
    }

    /// Smallest box holding every point, `None` if there are none.
    ///
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;

        Some(points.fold(BB::from_point(first), |mut bb, c| {
            bb.extend(c);
            bb
        }))
    }

    /// Grow the box to include `c`.
    ///
    pub fn extend(&mut self, c: Coord) {
        self.min_lat = self.min_lat.min(c.lat);
        self.max_lat = self.max_lat.max(c.lat);
        self.min_lon = self.min_lon.min(c.lon);
        self.max_lon = self.max_lon.max(c.lon);
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat)
            && (self.min_lon..=self.max_lon).contains(&c.lon)
    }

    #[inline]
    pub fn south_west(&self) -> Coord {
        Coord::new(self.min_lat, self.min_lon)
    }

    #[inline]
    pub fn north_east(&self) -> Coord {
        Coord::new(self.max_lat, self.max_lon)
    }

    /// Center of the box is the midpoint of the extremes.
    ///
    #[inline]
    pub fn center(&self) -> Coord {
        self.south_west().midpoint(&self.north_east())
    }
}
