// HTTP request handlers
use crate::application::selection_state::SelectionSnapshot;
use crate::application::track_aggregator::PassState;
use crate::domain::calendar::DateRange;
use crate::domain::device::Device;
use crate::domain::error::ViewerError;
use crate::domain::render::BatchSummary;
use crate::infrastructure::report_client::ReportOutcome;
use crate::infrastructure::scene_surface::SceneSnapshot;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::Stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

/// JSON error body with a status derived from the domain error.
#[derive(Debug)]
pub struct ApiError(ViewerError);

impl From<ViewerError> for ApiError {
    fn from(e: ViewerError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            ViewerError::UnresolvedDevice(_) | ViewerError::UnknownZone(_) => StatusCode::NOT_FOUND,
            ViewerError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            ViewerError::Report(_) => StatusCode::BAD_GATEWAY,
            ViewerError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            ViewerError::Feed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct DeviceRequest {
    pub device: Option<String>,
}

#[derive(Deserialize)]
pub struct RangeRequest {
    pub start: String,
    pub end: String,
}

#[derive(Deserialize)]
pub struct ZoneRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct ZoneListing {
    pub selectable: Vec<String>,
    pub selected: Vec<String>,
}

#[derive(Serialize)]
pub struct SceneView {
    pub aggregation: PassState,
    pub scene: SceneSnapshot,
    pub batch: Option<BatchSummary>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all registered devices
pub async fn list_devices(State(state): State<Arc<AppState>>) -> Json<Vec<Device>> {
    Json(state.registry.devices().cloned().collect())
}

pub async fn list_zones(State(state): State<Arc<AppState>>) -> Json<ZoneListing> {
    Json(ZoneListing {
        selectable: state.selection.selectable_zones(),
        selected: state.selection.selected_zones(),
    })
}

pub async fn get_selection(State(state): State<Arc<AppState>>) -> Json<SelectionSnapshot> {
    Json(state.selection.snapshot())
}

pub async fn set_device(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeviceRequest>,
) -> Result<Json<SelectionSnapshot>, ApiError> {
    if let Some(id) = request.device.as_deref() {
        state.registry.resolve(id)?;
    }
    state.selection.set_device(request.device);
    Ok(Json(state.selection.snapshot()))
}

pub async fn set_range(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RangeRequest>,
) -> Result<Json<SelectionSnapshot>, ApiError> {
    let range = DateRange::parse(&request.start, &request.end)?;
    state.selection.set_range(range);
    Ok(Json(state.selection.snapshot()))
}

pub async fn add_zone(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ZoneRequest>,
) -> Result<Json<SelectionSnapshot>, ApiError> {
    let name = request.name.trim();
    if !name.is_empty() && !state.zones.contains(name) {
        return Err(ViewerError::UnknownZone(name.to_string()).into());
    }
    state.selection.add_zone(name);
    Ok(Json(state.selection.snapshot()))
}

pub async fn remove_zone(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<SelectionSnapshot> {
    state.selection.remove_zone(&name);
    Json(state.selection.snapshot())
}

/// Current overlays, view and aggregation progress
pub async fn get_scene(State(state): State<Arc<AppState>>) -> Json<SceneView> {
    Json(SceneView {
        aggregation: state.aggregator.state(),
        scene: state.scene.snapshot(),
        batch: state.aggregator.current_batch().map(|b| b.summary()),
    })
}

/// Stream aggregation state changes as server-sent events
pub async fn scene_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.aggregator.subscribe())
        .map(|pass| Event::default().event("aggregation").json_data(pass));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn request_report(State(state): State<Arc<AppState>>) -> Result<Json<ReportOutcome>, ApiError> {
    let Some(reports) = state.reports.as_ref() else {
        return Err(ViewerError::Config("no report endpoint configured".to_string()).into());
    };
    Ok(Json(reports.request().await?))
}
