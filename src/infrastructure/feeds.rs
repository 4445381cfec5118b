// Startup feeds - Device registry and zone geometry, loaded once
use crate::application::zone_index::ZoneIndex;
use crate::domain::device::{Device, DeviceRegistry};
use crate::domain::error::ViewerError;
use crate::infrastructure::geojson::parse_zones;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RegistryRecord {
    #[serde(default)]
    imei: Option<String>,
    #[serde(default)]
    vehicle_name: Option<String>,
    #[serde(default)]
    equipment_type: Option<String>,
}

/// Parse a registry object keyed by device id.
pub fn parse_device_registry(body: &[u8]) -> Result<DeviceRegistry, ViewerError> {
    let records: BTreeMap<String, RegistryRecord> =
        serde_json::from_slice(body).map_err(|e| ViewerError::Feed(e.to_string()))?;

    let devices = records.into_iter().map(|(id, record)| {
        if let Some(imei) = record.imei.as_deref() {
            if imei != id {
                tracing::debug!("Registry entry {} carries a different imei {}", id, imei);
            }
        }
        Device::new(id, record.vehicle_name, record.equipment_type)
    });

    Ok(DeviceRegistry::new(devices))
}

pub async fn load_device_registry(location: &str) -> Result<DeviceRegistry> {
    let body = read_feed(location).await?;
    let registry = parse_device_registry(&body)
        .with_context(|| format!("Invalid device registry at {}", location))?;
    tracing::info!("Loaded {} devices from {}", registry.len(), location);
    Ok(registry)
}

pub async fn load_zone_index(location: &str) -> Result<ZoneIndex> {
    let body = read_feed(location).await?;
    let zones = parse_zones(&body).with_context(|| format!("Invalid zone feed at {}", location))?;
    let index = ZoneIndex::new(zones);
    tracing::info!("Loaded {} zones from {}", index.len(), location);
    Ok(index)
}

/// Read a feed from an http(s) URL or a local path.
async fn read_feed(location: &str) -> Result<Vec<u8>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let response = reqwest::get(location)
            .await
            .with_context(|| format!("Failed to request feed {}", location))?;

        if !response.status().is_success() {
            anyhow::bail!("Feed {} returned status {}", location, response.status());
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read feed {}", location))?;
        Ok(bytes.to_vec())
    } else {
        tokio::fs::read(location)
            .await
            .with_context(|| format!("Failed to read feed {}", location))
    }
}
