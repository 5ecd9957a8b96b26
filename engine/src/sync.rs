//! Hover synchronisation between the map and the table.
//!
//! There is exactly one hover state, an optional postal code.  Both layers observe it and
//! highlight the item with that postal code, so hovering a marker highlights the matching row
//! and vice versa.
//!

use tokio::sync::watch;
use tracing::trace;

use crate::{DefaultView, MapLayer, TableLayer};

#[derive(Debug)]
pub struct Synchronizer {
    hover: watch::Sender<Option<String>>,
}

impl Synchronizer {
    pub fn new() -> Self {
        let (hover, _) = watch::channel(None);
        Synchronizer { hover }
    }

    /// Set or clear the hover state.  Subscribers are only woken up on an actual change.
    ///
    pub fn hover(&self, postal_code: Option<&str>) {
        let code = postal_code.map(str::trim).filter(|c| !c.is_empty());
        self.hover.send_if_modified(|cur| {
            if cur.as_deref() == code {
                return false;
            }
            trace!("hover {:?} -> {:?}", cur, code);
            *cur = code.map(str::to_owned);
            true
        });
    }

    /// Pointer entered the item for `postal_code`, on either layer.
    ///
    pub fn enter(&self, postal_code: &str) {
        self.hover(Some(postal_code));
    }

    /// Pointer left the item for `postal_code`.  Ignored if something else is hovered by now.
    ///
    pub fn leave(&self, postal_code: &str) {
        let code = postal_code.trim();
        self.hover.send_if_modified(|cur| {
            if cur.as_deref() != Some(code) {
                return false;
            }
            *cur = None;
            true
        });
    }

    #[inline]
    pub fn hovered(&self) -> Option<String> {
        self.hover.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.hover.subscribe()
    }

    pub fn map_layer(&self, default: DefaultView) -> MapLayer {
        MapLayer::new(self.subscribe(), default)
    }

    pub fn table_layer(&self) -> TableLayer {
        TableLayer::new(self.subscribe())
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Synchronizer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_hover_and_clear() {
        let s = Synchronizer::new();
        assert!(s.hovered().is_none());

        s.hover(Some("560001"));
        assert_eq!(Some("560001".to_string()), s.hovered());
        s.hover(None);
        assert!(s.hovered().is_none());
    }

    #[test]
    fn test_sync_stale_leave() {
        let s = Synchronizer::new();

        s.enter("110001");
        s.enter("400001");
        s.leave("110001");
        assert_eq!(Some("400001".to_string()), s.hovered());

        s.leave("400001");
        assert!(s.hovered().is_none());
    }

    #[test]
    fn test_sync_no_spurious_change() {
        let s = Synchronizer::new();
        let mut rx = s.subscribe();

        s.enter("110001");
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        s.enter("110001");
        s.leave("999999");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_sync_subscribers_see_same_state() {
        let s = Synchronizer::new();
        let mut a = s.subscribe();
        let mut b = s.subscribe();

        s.enter("560001");
        a.changed().await.unwrap();
        b.changed().await.unwrap();
        assert_eq!(*a.borrow(), *b.borrow());
    }
}
