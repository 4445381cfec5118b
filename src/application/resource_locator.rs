// Resource locator - Maps (device, day) to the track resource for that day
use crate::domain::calendar::{DateRange, DayKey};
use crate::domain::device::{Device, DeviceRegistry};
use crate::domain::error::ViewerError;
use crate::infrastructure::config::{prepare_template, DeviceKey, LayoutSettings};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Relative location of one day's track, kept as path segments so that
/// file and HTTP repositories can each render it their own way.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    segments: Vec<String>,
}

impl ResourceId {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.segments);
        path
    }

    /// Join onto `base_url`, percent-encoding each segment.
    pub fn to_url(&self, base_url: &str) -> String {
        let encoded: Vec<String> = self
            .segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{}/{}", base_url.trim_end_matches('/'), encoded.join("/"))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

pub struct ResourceLocator {
    registry: Arc<DeviceRegistry>,
    layout: LayoutSettings,
}

impl ResourceLocator {
    pub fn new(registry: Arc<DeviceRegistry>, layout: LayoutSettings) -> Self {
        Self { registry, layout }
    }

    pub fn locate(&self, device_id: &str, day: DayKey) -> Result<ResourceId, ViewerError> {
        let device = self.registry.resolve(device_id)?;
        Ok(self.locate_for(device, day))
    }

    /// Resource ids for every day of `range`. The device is resolved first, so an
    /// unknown device fails even when the range is empty.
    pub fn locate_range(
        &self,
        device_id: &str,
        range: &DateRange,
    ) -> Result<Vec<(DayKey, ResourceId)>, ViewerError> {
        self.registry.resolve(device_id)?;
        range
            .days()
            .map(|day| Ok((day, self.locate(device_id, day)?)))
            .collect()
    }

    fn locate_for(&self, device: &Device, day: DayKey) -> ResourceId {
        let device_part = match self.layout.device_key {
            DeviceKey::Id => &device.id,
            DeviceKey::Name => &device.display_name,
        };

        let mut vars = HashMap::new();
        vars.insert("device".to_string(), sanitize_segment(device_part));
        vars.insert("date".to_string(), day.to_string());
        vars.insert("year".to_string(), day.year());
        vars.insert("month".to_string(), day.month());
        vars.insert("day".to_string(), day.day());

        // Substituted values cannot contain '/', so splitting after substitution is safe
        let segments = prepare_template(&self.layout.template, &vars)
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        ResourceId::new(segments)
    }
}

/// Keep a device identifier inside a single path segment.
fn sanitize_segment(value: &str) -> String {
    let cleaned = value.trim().replace(['/', '\\'], "_");
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn registry() -> Arc<DeviceRegistry> {
        Arc::new(DeviceRegistry::new(vec![
            Device::new("861234".to_string(), Some("Sweeper 1".to_string()), None),
            Device::new("865555".to_string(), Some("Truck A/B".to_string()), None),
        ]))
    }

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_flat_layout_by_id() {
        let locator = ResourceLocator::new(registry(), LayoutSettings::default());
        let id = locator.locate("861234", day("2023-01-02")).unwrap();
        assert_eq!(id.to_string(), "861234/2023-01-02.geojson");
        assert_eq!(
            id.to_path(Path::new("/data")),
            PathBuf::from("/data/861234/2023-01-02.geojson")
        );
    }

    #[test]
    fn test_partitioned_layout_by_name() {
        let layout = LayoutSettings {
            template: "${device}/${year}/${month}/${date}.geojson".to_string(),
            device_key: DeviceKey::Name,
        };
        let locator = ResourceLocator::new(registry(), layout);

        let id = locator.locate("861234", day("2023-03-09")).unwrap();
        assert_eq!(id.to_string(), "Sweeper 1/2023/03/2023-03-09.geojson");
        assert_eq!(
            id.to_url("https://host/tracks/"),
            "https://host/tracks/Sweeper%201/2023/03/2023-03-09.geojson"
        );

        let slashed = locator.locate("865555", day("2023-03-09")).unwrap();
        assert_eq!(slashed.to_string(), "Truck A_B/2023/03/2023-03-09.geojson");
    }

    #[test]
    fn test_locate_is_deterministic() {
        let locator = ResourceLocator::new(registry(), LayoutSettings::default());
        let a = locator.locate("861234", day("2023-01-02")).unwrap();
        let b = locator.locate("861234", day("2023-01-02")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_placeholder_text_in_name_is_kept_literally() {
        let registry = Arc::new(DeviceRegistry::new(vec![Device::new(
            "861234".to_string(),
            Some("Unit ${year}".to_string()),
            None,
        )]));
        let layout = LayoutSettings {
            template: "${device}/${date}.geojson".to_string(),
            device_key: DeviceKey::Name,
        };
        let locator = ResourceLocator::new(registry, layout);

        let ids: HashSet<String> = (0..200)
            .map(|_| locator.locate("861234", day("2023-01-02")).unwrap().to_string())
            .collect();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("Unit ${year}/2023-01-02.geojson"));
    }

    #[test]
    fn test_unknown_device_fails_whole_range() {
        let locator = ResourceLocator::new(registry(), LayoutSettings::default());
        let range = DateRange::new(day("2023-01-01"), day("2023-01-03"));
        assert_eq!(
            locator.locate_range("nope", &range),
            Err(ViewerError::UnresolvedDevice("nope".to_string()))
        );

        let inverted = DateRange::new(day("2023-01-03"), day("2023-01-01"));
        assert!(locator.locate_range("nope", &inverted).is_err());
        assert!(locator.locate_range("861234", &inverted).unwrap().is_empty());
    }

    #[test]
    fn test_locate_range_covers_each_day() {
        let locator = ResourceLocator::new(registry(), LayoutSettings::default());
        let range = DateRange::new(day("2023-01-30"), day("2023-02-02"));
        let located = locator.locate_range("861234", &range).unwrap();
        assert_eq!(located.len(), 4);
        assert_eq!(located[3].1.to_string(), "861234/2023-02-02.geojson");
    }
}
