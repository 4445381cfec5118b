// Track fetcher - One fetch attempt per day, folding every failure into absence
use crate::application::resource_locator::ResourceId;
use crate::application::track_repository::TrackRepository;
use crate::domain::calendar::DayKey;
use crate::domain::track::{AbsenceReason, DayOutcome};
use std::sync::Arc;

#[derive(Clone)]
pub struct TrackFetcher {
    repository: Arc<dyn TrackRepository>,
}

impl TrackFetcher {
    pub fn new(repository: Arc<dyn TrackRepository>) -> Self {
        Self { repository }
    }

    /// Fetch one day. Never fails: missing, empty and broken resources all
    /// come back as `DayOutcome::Absent` and are only logged.
    pub async fn fetch(&self, resource: &ResourceId, day: DayKey) -> DayOutcome {
        match self.repository.fetch_track(resource, day).await {
            Ok(Some(track)) if !track.is_empty() => DayOutcome::Present(track),
            Ok(Some(_)) => {
                tracing::debug!("Track for {} at {} has no points, skipping", day, resource);
                DayOutcome::Absent(AbsenceReason::Empty)
            }
            Ok(None) => {
                tracing::debug!("No data for {} at {}", day, resource);
                DayOutcome::Absent(AbsenceReason::NotFound)
            }
            Err(e) => {
                tracing::warn!("Failed to load track for {} from {}: {:#}", day, resource, e);
                DayOutcome::Absent(AbsenceReason::Failed(e.to_string()))
            }
        }
    }
}
