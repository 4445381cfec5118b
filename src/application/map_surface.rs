// Drawable map surface port
use crate::domain::geo::GeoBounds;
use crate::domain::render::{Overlay, OverlayId};

/// The rendering surface the viewer draws onto.
pub trait MapSurface: Send + Sync {
    fn add_overlay(&self, overlay: Overlay) -> OverlayId;

    /// Removing an unknown id is a no-op.
    fn remove_overlay(&self, id: OverlayId);

    fn fit_bounds(&self, bounds: &GeoBounds);
}
