//! What part of the map to show.
//!
//! Either fit the bounds of every resolved location or, when there is nothing to show, fall back
//! to a configured default view.
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use poshan_common::{Coord, BB};

/// Default center, roughly the middle of India
pub const DEF_CENTER: Coord = Coord {
    lat: 20.5937,
    lon: 78.9629,
};
/// Country-level zoom
pub const DEF_ZOOM: u8 = 5;

/// Bounds of a set of locations.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportBounds {
    pub south_west: Coord,
    pub north_east: Coord,
    pub center: Coord,
}

impl ViewportBounds {
    /// `None` on an empty set.
    ///
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        BB::from_points(coords).map(ViewportBounds::from)
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        BB::from_points([self.south_west, self.north_east]).is_some_and(|bb| bb.contains(c))
    }
}

impl From<BB> for ViewportBounds {
    fn from(bb: BB) -> Self {
        ViewportBounds {
            south_west: bb.south_west(),
            north_east: bb.north_east(),
            center: bb.center(),
        }
    }
}

/// Fallback view, configurable.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct DefaultView {
    #[serde(default = "def_lat")]
    pub lat: f64,
    #[serde(default = "def_lon")]
    pub lon: f64,
    #[serde(default = "def_zoom")]
    pub zoom: u8,
}

fn def_lat() -> f64 {
    DEF_CENTER.lat
}

fn def_lon() -> f64 {
    DEF_CENTER.lon
}

fn def_zoom() -> u8 {
    DEF_ZOOM
}

impl DefaultView {
    #[inline]
    pub fn center(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }
}

impl Default for DefaultView {
    fn default() -> Self {
        DefaultView {
            lat: DEF_CENTER.lat,
            lon: DEF_CENTER.lon,
            zoom: DEF_ZOOM,
        }
    }
}

/// The view handed to the map.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Viewport {
    Fit { bounds: ViewportBounds },
    Default { center: Coord, zoom: u8 },
}

impl Viewport {
    pub fn new(bounds: Option<ViewportBounds>, default: &DefaultView) -> Self {
        match bounds {
            Some(bounds) => Viewport::Fit { bounds },
            None => Viewport::Default {
                center: default.center(),
                zoom: default.zoom,
            },
        }
    }

    #[inline]
    pub fn center(&self) -> Coord {
        match self {
            Viewport::Fit { bounds } => bounds.center,
            Viewport::Default { center, .. } => *center,
        }
    }
}

impl Display for Viewport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Viewport::Fit { bounds } => write!(
                f,
                "fit sw=({}) ne=({}) center=({})",
                bounds.south_west, bounds.north_east, bounds.center
            ),
            Viewport::Default { center, zoom } => {
                write!(f, "default center=({}) zoom={}", center, zoom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_empty() {
        assert!(ViewportBounds::from_coords(vec![]).is_none());
    }

    #[test]
    fn test_bounds_json() {
        let b = ViewportBounds::from_coords([Coord::new(10., 70.), Coord::new(20., 80.)]).unwrap();
        let v = serde_json::to_value(b).unwrap();

        assert_eq!(10., v["southWest"]["lat"]);
        assert_eq!(80., v["northEast"]["lon"]);
        assert_eq!(15., v["center"]["lat"]);
        assert_eq!(75., v["center"]["lon"]);
        assert!(b.contains(Coord::new(12., 71.)));
        assert!(!b.contains(Coord::new(21., 71.)));
    }

    #[test]
    fn test_viewport_fallback() {
        let v = Viewport::new(None, &DefaultView::default());
        assert_eq!(
            Viewport::Default {
                center: DEF_CENTER,
                zoom: 5
            },
            v
        );
        assert_eq!("default center=(20.5937, 78.9629) zoom=5", v.to_string());
    }

    #[test]
    fn test_viewport_fit() {
        let b = ViewportBounds::from_coords([Coord::new(10., 70.)]);
        let v = Viewport::new(b, &DefaultView::default());
        assert!(matches!(v, Viewport::Fit { .. }));
        assert_eq!(Coord::new(10., 70.), v.center());

        let j = serde_json::to_value(v).unwrap();
        assert_eq!("fit", j["mode"]);
    }

    #[test]
    fn test_default_view_partial() {
        let d: DefaultView = serde_json::from_str(r#"{"zoom": 7}"#).unwrap();
        assert_eq!(7, d.zoom);
        assert_eq!(DEF_CENTER, d.center());
    }
}
