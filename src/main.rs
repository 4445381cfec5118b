// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::resource_locator::ResourceLocator;
use crate::application::selection_state::SelectionState;
use crate::application::track_aggregator::TrackAggregator;
use crate::application::track_fetcher::TrackFetcher;
use crate::application::track_repository::TrackRepository;
use crate::application::zone_presenter::ZoneOverlayPresenter;
use crate::domain::calendar::DateRange;
use crate::domain::render::StylePalette;
use crate::infrastructure::config::{load_viewer_config, TrackSourceSettings};
use crate::infrastructure::feeds::{load_device_registry, load_zone_index};
use crate::infrastructure::file_repository::FileTrackRepository;
use crate::infrastructure::http_repository::HttpTrackRepository;
use crate::infrastructure::report_client::ReportRequester;
use crate::infrastructure::scene_surface::SceneSurface;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_zone, get_scene, get_selection, health_check, list_devices, list_zones, remove_zone,
    request_report, scene_events, set_device, set_range,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("track_viewer=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_viewer_config()?;
    let initial_range = DateRange::parse(&config.selection.start, &config.selection.end)
        .context("Invalid default selection range")?;

    // Load read-only feeds
    let registry = Arc::new(load_device_registry(&config.data.devices).await?);
    let zones = Arc::new(load_zone_index(&config.data.zones).await?);

    // Create repository (infrastructure layer)
    let repository: Arc<dyn TrackRepository> = match config.tracks.clone() {
        TrackSourceSettings::File { root } => {
            tracing::info!("Reading tracks from {}", root.display());
            Arc::new(FileTrackRepository::new(root))
        }
        TrackSourceSettings::Http { base_url } => {
            tracing::info!("Fetching tracks from {}", base_url);
            Arc::new(HttpTrackRepository::new(base_url))
        }
    };

    // Create services (application layer)
    let palette: StylePalette = config.style.clone().into();
    let scene = Arc::new(SceneSurface::new());
    let locator = Arc::new(ResourceLocator::new(registry.clone(), config.layout.clone()));
    let aggregator = TrackAggregator::new(
        locator,
        TrackFetcher::new(repository),
        scene.clone(),
        palette.clone(),
    );
    let zone_presenter = Arc::new(ZoneOverlayPresenter::new(
        zones.clone(),
        scene.clone(),
        palette.zone.clone(),
    ));

    let initial_device = config
        .selection
        .device
        .clone()
        .or_else(|| registry.first().map(|d| d.id.clone()));
    let selection = Arc::new(SelectionState::new(zones.clone(), initial_device, initial_range));
    selection.subscribe(zone_presenter);
    selection.subscribe(Arc::new(aggregator.clone()));

    // Initial kickoff
    selection.refresh();

    // Create application state
    let state = Arc::new(AppState {
        registry,
        zones,
        selection,
        aggregator,
        scene,
        reports: config.report.endpoint.clone().map(ReportRequester::new),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/devices", get(list_devices))
        .route("/zones", get(list_zones))
        .route("/selection", get(get_selection))
        .route("/selection/device", put(set_device))
        .route("/selection/range", put(set_range))
        .route("/selection/zones", post(add_zone))
        .route("/selection/zones/:name", delete(remove_zone))
        .route("/scene", get(get_scene))
        .route("/scene/events", get(scene_events))
        .route("/reports", post(request_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting track-viewer service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
