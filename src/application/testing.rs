// Test doubles shared by application tests
use crate::application::resource_locator::ResourceId;
use crate::application::track_repository::TrackRepository;
use crate::domain::calendar::DayKey;
use crate::domain::geo::LatLon;
use crate::domain::track::{SegmentProperties, Track, TrackPoint, TrackSegment};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn track(day: DayKey, coords: &[(f64, f64)]) -> Track {
    let points = coords
        .iter()
        .map(|(lat, lon)| TrackPoint::new(LatLon::new(*lat, *lon)))
        .collect();
    Track::new(day, vec![TrackSegment::new(points, SegmentProperties::default())])
}

#[derive(Clone)]
pub enum StubDay {
    Track(Track),
    Fail(String),
}

/// In-memory repository keyed by resource path. Unknown resources are "not found".
#[derive(Default)]
pub struct StubRepository {
    days: HashMap<String, StubDay>,
    delays: HashMap<String, Duration>,
    fetches: AtomicUsize,
}

impl StubRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: &str, day: StubDay) -> Self {
        self.days.insert(resource.to_string(), day);
        self
    }

    pub fn with_delay(mut self, resource: &str, millis: u64) -> Self {
        self.delays
            .insert(resource.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackRepository for StubRepository {
    async fn fetch_track(&self, resource: &ResourceId, _day: DayKey) -> anyhow::Result<Option<Track>> {
        let key = resource.to_string();
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.days.get(&key) {
            Some(StubDay::Track(track)) => Ok(Some(track.clone())),
            Some(StubDay::Fail(message)) => anyhow::bail!("{}", message),
            None => Ok(None),
        }
    }
}
