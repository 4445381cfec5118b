// File-backed track repository
use crate::application::resource_locator::ResourceId;
use crate::application::track_repository::TrackRepository;
use crate::domain::calendar::DayKey;
use crate::domain::track::Track;
use crate::infrastructure::geojson::parse_track;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileTrackRepository {
    root: PathBuf,
}

impl FileTrackRepository {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl TrackRepository for FileTrackRepository {
    async fn fetch_track(&self, resource: &ResourceId, day: DayKey) -> Result<Option<Track>> {
        let path = resource.to_path(&self.root);

        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let track = parse_track(day, &body).with_context(|| format!("Invalid track file {}", path.display()))?;
        Ok(Some(track))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: &str = r#"{"type": "FeatureCollection", "features": [{"type": "Feature",
        "properties": {"date": "2023-01-01"},
        "geometry": {"type": "LineString", "coordinates": [[77.6, 12.9], [77.7, 13.0]]}}]}"#;

    fn resource(segments: &[&str]) -> ResourceId {
        ResourceId::new(segments.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_reads_present_missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let device_dir = dir.path().join("V1");
        std::fs::create_dir_all(&device_dir).unwrap();
        std::fs::write(device_dir.join("2023-01-01.geojson"), TRACK).unwrap();
        std::fs::write(device_dir.join("2023-01-02.geojson"), "{not json").unwrap();

        let repo = FileTrackRepository::new(dir.path().to_path_buf());
        let day: DayKey = "2023-01-01".parse().unwrap();

        let track = repo
            .fetch_track(&resource(&["V1", "2023-01-01.geojson"]), day)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(track.segments[0].points.len(), 2);

        let missing = repo
            .fetch_track(&resource(&["V1", "2023-01-03.geojson"]), day)
            .await
            .unwrap();
        assert!(missing.is_none());

        let broken = repo
            .fetch_track(&resource(&["V1", "2023-01-02.geojson"]), day)
            .await;
        assert!(broken.is_err());
    }
}
