//! Map and table layers.
//!
//! Both render the same `Resolution` and read the same hover state, the only difference is the
//! shape of what they produce.  Neither of them ever modifies the resolution.
//!

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::sync::watch;

use poshan_common::Coord;

use crate::{DefaultView, Resolution, ResolvedLocation, Severity, Viewport};

/// One marker on the map.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub postal_code: String,
    pub position: Coord,
    pub severity: Severity,
    /// Popup text
    pub label: String,
    pub highlighted: bool,
}

/// What the map needs to draw.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
}

/// One line of the table.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    pub child_id: String,
    pub village: String,
    pub district: String,
    pub postal_code: String,
    pub severity: Severity,
    pub position: Coord,
    pub highlighted: bool,
}

fn label(loc: &ResolvedLocation) -> String {
    let place = [loc.village.as_str(), loc.district.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    match place.is_empty() {
        true => format!("{} ({})", loc.postal_code, loc.severity),
        false => format!("{place} {} ({})", loc.postal_code, loc.severity),
    }
}

#[inline]
fn is_hovered(hover: &watch::Receiver<Option<String>>, postal_code: &str) -> bool {
    hover.borrow().as_deref() == Some(postal_code)
}

#[derive(Debug)]
pub struct MapLayer {
    hover: watch::Receiver<Option<String>>,
    default: DefaultView,
}

impl MapLayer {
    pub fn new(hover: watch::Receiver<Option<String>>, default: DefaultView) -> Self {
        MapLayer { hover, default }
    }

    pub fn render(&self, res: &Resolution) -> MapView {
        let markers = res
            .locations
            .iter()
            .map(|loc| Marker {
                postal_code: loc.postal_code.clone(),
                position: loc.coord(),
                severity: loc.severity,
                label: label(loc),
                highlighted: is_hovered(&self.hover, &loc.postal_code),
            })
            .collect();
        MapView {
            viewport: res.viewport(&self.default),
            markers,
        }
    }

    /// Wait for the hover state to change.
    ///
    pub async fn changed(&mut self) -> bool {
        self.hover.changed().await.is_ok()
    }
}

#[derive(Debug)]
pub struct TableLayer {
    hover: watch::Receiver<Option<String>>,
}

impl TableLayer {
    pub fn new(hover: watch::Receiver<Option<String>>) -> Self {
        TableLayer { hover }
    }

    pub fn render(&self, res: &Resolution) -> Vec<Row> {
        res.locations
            .iter()
            .map(|loc| Row {
                child_id: loc.child_id.clone(),
                village: loc.village.clone(),
                district: loc.district.clone(),
                postal_code: loc.postal_code.clone(),
                severity: loc.severity,
                position: loc.coord(),
                highlighted: is_hovered(&self.hover, &loc.postal_code),
            })
            .collect()
    }

    /// Wait for the hover state to change.
    ///
    pub async fn changed(&mut self) -> bool {
        self.hover.changed().await.is_ok()
    }

    /// Text rendering, highlighted rows are flagged in the first column.
    ///
    pub fn to_table(rows: &[Row]) -> String {
        let header = vec![
            "", "Child", "Village", "District", "Postal code", "Severity", "Position",
        ];

        let mut builder = Builder::default();
        builder.push_record(header);

        rows.iter().for_each(|r| {
            builder.push_record([
                if r.highlighted { "*" } else { "" }.to_string(),
                r.child_id.clone(),
                r.village.clone(),
                r.district.clone(),
                r.postal_code.clone(),
                r.severity.to_string(),
                r.position.to_string(),
            ]);
        });

        builder.build().with(Style::modern()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Synchronizer, ViewportBounds};

    use super::*;

    fn loc(code: &str, lat: f64, lon: f64) -> ResolvedLocation {
        ResolvedLocation {
            postal_code: code.to_string(),
            child_id: format!("c{code}"),
            village: "Rampur".to_string(),
            district: "Bareilly".to_string(),
            severity: Severity::Severe,
            latitude: lat,
            longitude: lon,
        }
    }

    fn resolution() -> Resolution {
        let locations = vec![loc("560001", 12.97, 77.59), loc("110001", 28.63, 77.21)];
        let bounds = ViewportBounds::from_coords(locations.iter().map(ResolvedLocation::coord));
        Resolution {
            locations,
            bounds,
            ..Default::default()
        }
    }

    #[test]
    fn test_layers_follow_hover() {
        let s = Synchronizer::new();
        let map = s.map_layer(DefaultView::default());
        let table = s.table_layer();
        let res = resolution();

        s.enter("560001");
        let m = map.render(&res);
        let t = table.render(&res);
        assert!(m.markers[0].highlighted);
        assert!(!m.markers[1].highlighted);
        assert!(t[0].highlighted);
        assert!(!t[1].highlighted);

        s.leave("560001");
        assert!(map.render(&res).markers.iter().all(|m| !m.highlighted));
        assert!(table.render(&res).iter().all(|r| !r.highlighted));
    }

    #[test]
    fn test_map_render() {
        let s = Synchronizer::new();
        let map = s.map_layer(DefaultView::default());
        let res = resolution();

        let m = map.render(&res);
        assert_eq!(2, m.markers.len());
        assert_eq!("Rampur, Bareilly 560001 (severe)", m.markers[0].label);
        assert!(matches!(m.viewport, Viewport::Fit { .. }));

        let empty = map.render(&Resolution::default());
        assert!(empty.markers.is_empty());
        assert!(matches!(empty.viewport, Viewport::Default { .. }));
    }

    #[test]
    fn test_table_text() {
        let s = Synchronizer::new();
        let table = s.table_layer();
        s.hover(Some("110001"));

        let rows = table.render(&resolution());
        let txt = TableLayer::to_table(&rows);
        assert!(txt.contains("Postal code"));
        assert!(txt.contains("560001"));
        assert!(txt.contains("Bareilly"));
        assert!(txt.contains('*'));
    }

    #[tokio::test]
    async fn test_layer_wakes_up_on_hover() {
        let s = Synchronizer::new();
        let mut map = s.map_layer(DefaultView::default());

        s.enter("110001");
        assert!(map.changed().await);
        assert!(map.render(&resolution()).markers[1].highlighted);
    }
}
