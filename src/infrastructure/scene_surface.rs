// In-memory scene - MapSurface implementation served to HTTP clients
use crate::application::map_surface::MapSurface;
use crate::domain::geo::GeoBounds;
use crate::domain::render::{Overlay, OverlayId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Scene {
    next_id: u64,
    overlays: BTreeMap<OverlayId, Overlay>,
    view: Option<GeoBounds>,
    view_changes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneOverlay {
    pub id: OverlayId,
    #[serde(flatten)]
    pub overlay: Overlay,
}

/// Point-in-time copy of the scene, overlays in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub overlays: Vec<SceneOverlay>,
    pub view: Option<GeoBounds>,
    pub view_changes: u64,
}

#[derive(Debug, Default)]
pub struct SceneSurface {
    scene: Mutex<Scene>,
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let scene = self.lock();
        SceneSnapshot {
            overlays: scene
                .overlays
                .iter()
                .map(|(id, overlay)| SceneOverlay {
                    id: *id,
                    overlay: overlay.clone(),
                })
                .collect(),
            view: scene.view,
            view_changes: scene.view_changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapSurface for SceneSurface {
    fn add_overlay(&self, overlay: Overlay) -> OverlayId {
        let mut scene = self.lock();
        scene.next_id += 1;
        let id = OverlayId(scene.next_id);
        scene.overlays.insert(id, overlay);
        id
    }

    fn remove_overlay(&self, id: OverlayId) {
        self.lock().overlays.remove(&id);
    }

    fn fit_bounds(&self, bounds: &GeoBounds) {
        let mut scene = self.lock();
        scene.view = Some(*bounds);
        scene.view_changes += 1;
    }
}
