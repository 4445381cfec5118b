// HTTP-backed track repository
use crate::application::resource_locator::ResourceId;
use crate::application::track_repository::TrackRepository;
use crate::domain::calendar::DayKey;
use crate::domain::track::Track;
use crate::infrastructure::geojson::parse_track;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub struct HttpTrackRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTrackRepository {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url_for(&self, resource: &ResourceId) -> String {
        resource.to_url(&self.base_url)
    }
}

#[async_trait]
impl TrackRepository for HttpTrackRepository {
    async fn fetch_track(&self, resource: &ResourceId, day: DayKey) -> Result<Option<Track>> {
        let url = self.url_for(resource);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/geo+json, application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        // Sparse data is normal: a missing day is not an error
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Track request {} failed with status {}: {}", url, status, body);
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response from {}", url))?;

        let track = parse_track(day, &body).with_context(|| format!("Invalid track payload from {}", url))?;
        Ok(Some(track))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let repo = HttpTrackRepository::new("http://localhost:8000/data/exported_geojson/".to_string());
        let resource = ResourceId::new(vec![
            "Sweeper 1".to_string(),
            "2023".to_string(),
            "01".to_string(),
            "2023-01-02.geojson".to_string(),
        ]);

        assert_eq!(
            repo.url_for(&resource),
            "http://localhost:8000/data/exported_geojson/Sweeper%201/2023/01/2023-01-02.geojson"
        );
    }
}
