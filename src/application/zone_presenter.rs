// Zone overlay presenter - Draws the currently selected zones
use crate::application::map_surface::MapSurface;
use crate::application::selection_state::{SelectionChange, SelectionObserver, SelectionSnapshot};
use crate::application::zone_index::ZoneIndex;
use crate::domain::render::{Overlay, OverlayId, ZoneOverlay, ZoneStyle};
use std::sync::{Arc, Mutex, PoisonError};

/// Keeps the zone layer in sync with the selected zone names. Purely visual:
/// it has no influence on which tracks are fetched.
pub struct ZoneOverlayPresenter {
    zones: Arc<ZoneIndex>,
    surface: Arc<dyn MapSurface>,
    style: ZoneStyle,
    drawn: Mutex<Vec<OverlayId>>,
}

impl ZoneOverlayPresenter {
    pub fn new(zones: Arc<ZoneIndex>, surface: Arc<dyn MapSurface>, style: ZoneStyle) -> Self {
        Self {
            zones,
            surface,
            style,
            drawn: Mutex::new(Vec::new()),
        }
    }

    pub fn redraw(&self, selected: &[String]) {
        let mut drawn = self.drawn.lock().unwrap_or_else(PoisonError::into_inner);
        for id in drawn.drain(..) {
            self.surface.remove_overlay(id);
        }

        for zone in self.zones.geometries_for(selected) {
            let overlay = Overlay::Zone(ZoneOverlay::from_zone(zone, self.style.clone()));
            drawn.push(self.surface.add_overlay(overlay));
        }

        let bounds = self.zones.bounds_for(selected);
        if bounds.is_framable() {
            self.surface.fit_bounds(&bounds);
        }
    }
}

impl SelectionObserver for ZoneOverlayPresenter {
    fn selection_changed(&self, change: SelectionChange, snapshot: &SelectionSnapshot) {
        if change == SelectionChange::Zones {
            self.redraw(&snapshot.zones);
        }
    }
}
