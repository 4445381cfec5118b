// Repository trait for per-day track access
use crate::application::resource_locator::ResourceId;
use crate::domain::calendar::DayKey;
use crate::domain::track::Track;
use async_trait::async_trait;

#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// Load the track stored at `resource` for `day`.
    /// Returns `Ok(None)` when no resource exists; errors cover transport and payload failures.
    async fn fetch_track(&self, resource: &ResourceId, day: DayKey) -> anyhow::Result<Option<Track>>;
}
