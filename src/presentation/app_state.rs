// Application state for HTTP handlers
use crate::application::selection_state::SelectionState;
use crate::application::track_aggregator::TrackAggregator;
use crate::application::zone_index::ZoneIndex;
use crate::domain::device::DeviceRegistry;
use crate::infrastructure::report_client::ReportRequester;
use crate::infrastructure::scene_surface::SceneSurface;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<DeviceRegistry>,
    pub zones: Arc<ZoneIndex>,
    pub selection: Arc<SelectionState>,
    pub aggregator: TrackAggregator,
    pub scene: Arc<SceneSurface>,
    pub reports: Option<ReportRequester>,
}
