// Track aggregator - Progressive, cancellable per-day loading into one render batch
use crate::application::map_surface::MapSurface;
use crate::application::resource_locator::{ResourceId, ResourceLocator};
use crate::application::selection_state::{SelectionChange, SelectionObserver, SelectionSnapshot};
use crate::application::track_fetcher::TrackFetcher;
use crate::domain::calendar::DayKey;
use crate::domain::render::{Overlay, PassId, RenderBatch, RenderEntry, RouteOverlay, StylePalette};
use crate::domain::track::DayOutcome;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "pass", rename_all = "snake_case")]
pub enum PassState {
    Idle,
    Aggregating(PassId),
    Settled(PassId),
}

struct ActivePass {
    id: PassId,
    zones_selected: bool,
    batch: RenderBatch,
    task: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct AggregatorInner {
    last_pass: u64,
    active: Option<ActivePass>,
}

impl AggregatorInner {
    fn active_for(&mut self, pass: PassId) -> Option<&mut ActivePass> {
        self.active.as_mut().filter(|a| a.id == pass)
    }
}

/// Runs aggregation passes: one fetch per day, all days concurrently, each
/// result drawn as soon as it arrives. Only the most recent pass may touch
/// the map surface; starting a pass cancels the previous one.
#[derive(Clone)]
pub struct TrackAggregator {
    locator: Arc<ResourceLocator>,
    fetcher: TrackFetcher,
    surface: Arc<dyn MapSurface>,
    palette: Arc<StylePalette>,
    inner: Arc<Mutex<AggregatorInner>>,
    state: Arc<watch::Sender<PassState>>,
}

impl TrackAggregator {
    pub fn new(
        locator: Arc<ResourceLocator>,
        fetcher: TrackFetcher,
        surface: Arc<dyn MapSurface>,
        palette: StylePalette,
    ) -> Self {
        let (state, _) = watch::channel(PassState::Idle);
        Self {
            locator,
            fetcher,
            surface,
            palette: Arc::new(palette),
            inner: Arc::new(Mutex::new(AggregatorInner::default())),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PassState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PassState {
        *self.state.borrow()
    }

    /// The batch of the current pass, complete or not.
    pub fn current_batch(&self) -> Option<RenderBatch> {
        self.lock().active.as_ref().map(|a| a.batch.clone())
    }

    /// Start a new pass for `snapshot`, superseding any pass in flight.
    /// Must be called from within a tokio runtime.
    pub fn run_aggregation(&self, snapshot: &SelectionSnapshot) -> PassId {
        let mut inner = self.lock();
        inner.last_pass += 1;
        let pass = PassId(inner.last_pass);

        // Drop the previous pass: stop its fetches and clear what it drew
        if let Some(previous) = inner.active.take() {
            if let Some(task) = previous.task {
                task.abort();
            }
            for overlay in previous.batch.overlay_ids() {
                self.surface.remove_overlay(overlay);
            }
        }

        inner.active = Some(ActivePass {
            id: pass,
            zones_selected: snapshot.has_zones(),
            batch: RenderBatch::new(pass),
            task: None,
        });
        self.state.send_replace(PassState::Aggregating(pass));

        let Some(device) = snapshot.device.as_deref() else {
            tracing::debug!("Pass {} has no device selected", pass.0);
            self.settle(&mut inner, pass);
            return pass;
        };

        let resources = match self.locator.locate_range(device, &snapshot.range) {
            Ok(resources) => resources,
            Err(e) => {
                tracing::warn!("Pass {} aborted: {}", pass.0, e);
                self.settle(&mut inner, pass);
                return pass;
            }
        };

        tracing::info!(
            "Starting pass {} for {} over {} days ({} to {})",
            pass.0,
            device,
            resources.len(),
            snapshot.range.start,
            snapshot.range.end
        );

        if resources.is_empty() {
            self.settle(&mut inner, pass);
            return pass;
        }

        let this = self.clone();
        let task = tokio::spawn(async move { this.drive(pass, resources).await });
        if let Some(active) = inner.active_for(pass) {
            active.task = Some(task);
        }
        pass
    }

    /// Wait until `pass` settles. Returns its batch, or `None` if a newer pass replaced it.
    #[cfg(test)]
    pub async fn wait_settled(&self, pass: PassId) -> Option<RenderBatch> {
        let mut rx = self.state.subscribe();
        let reached = rx
            .wait_for(|s| match *s {
                PassState::Settled(p) => p >= pass,
                PassState::Aggregating(p) => p > pass,
                PassState::Idle => false,
            })
            .await
            .ok()
            .map(|s| *s)?;

        match reached {
            PassState::Settled(p) if p == pass => self.current_batch().filter(|b| b.pass == pass),
            _ => None,
        }
    }

    async fn drive(self, pass: PassId, resources: Vec<(DayKey, ResourceId)>) {
        let mut pending: FuturesUnordered<_> = resources
            .into_iter()
            .map(|(day, resource)| {
                let fetcher = self.fetcher.clone();
                async move {
                    let outcome = fetcher.fetch(&resource, day).await;
                    (day, outcome)
                }
            })
            .collect();

        while let Some((day, outcome)) = pending.next().await {
            self.commit(pass, day, outcome);
        }

        let mut inner = self.lock();
        if inner.active_for(pass).is_some() {
            self.settle(&mut inner, pass);
        }
    }

    /// Apply one day's outcome to `pass`. Results for any pass other than the
    /// current one are discarded. Returns whether the result was applied.
    fn commit(&self, pass: PassId, day: DayKey, outcome: DayOutcome) -> bool {
        let mut inner = self.lock();
        let Some(active) = inner.active_for(pass) else {
            tracing::debug!("Discarding stale result for {} from pass {}", day, pass.0);
            return false;
        };

        match outcome {
            DayOutcome::Present(track) => {
                let style = self.palette.track_style(active.zones_selected);
                let overlay = Overlay::Route(RouteOverlay::from_track(pass, &track, style.clone()));
                let overlay = self.surface.add_overlay(overlay);
                active.batch.push(RenderEntry {
                    day,
                    track,
                    style,
                    overlay,
                });

                if active.batch.bounds.is_framable() {
                    self.surface.fit_bounds(&active.batch.bounds);
                } else {
                    tracing::debug!("Bounds for pass {} are degenerate, keeping the view", pass.0);
                }
            }
            DayOutcome::Absent(reason) => {
                tracing::debug!("Skipping {} in pass {}: {:?}", day, pass.0, reason);
                active.batch.skip(day, reason);
            }
        }
        true
    }

    fn settle(&self, inner: &mut AggregatorInner, pass: PassId) {
        if let Some(active) = inner.active_for(pass) {
            active.task = None;
            tracing::info!(
                "Pass {} settled: {} overlays, {} days skipped",
                pass.0,
                active.batch.entries.len(),
                active.batch.skipped.len()
            );
        }
        self.state.send_replace(PassState::Settled(pass));
    }

    fn lock(&self) -> MutexGuard<'_, AggregatorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SelectionObserver for TrackAggregator {
    fn selection_changed(&self, _change: SelectionChange, snapshot: &SelectionSnapshot) {
        self.run_aggregation(snapshot);
    }
}
