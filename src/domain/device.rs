// Device domain model - Tracked vehicles and the registry they are loaded into
use crate::domain::error::ViewerError;
use serde::Serialize;
use std::collections::BTreeMap;

const DEFAULT_EQUIPMENT_TYPE: &str = "Vehicle";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub id: String,
    pub display_name: String,
    pub equipment_type: String,
}

impl Device {
    pub fn new(id: String, display_name: Option<String>, equipment_type: Option<String>) -> Self {
        let display_name = display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.clone());
        let equipment_type = equipment_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EQUIPMENT_TYPE.to_string());

        Self {
            id,
            display_name,
            equipment_type,
        }
    }
}

/// Immutable set of known devices, keyed by device id.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<String, Device>,
}

impl DeviceRegistry {
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Self {
        Self {
            devices: devices.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    pub fn resolve(&self, id: &str) -> Result<&Device, ViewerError> {
        self.devices
            .get(id)
            .ok_or_else(|| ViewerError::UnresolvedDevice(id.to_string()))
    }

    /// Devices in id order, as offered by the device selector.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn first(&self) -> Option<&Device> {
        self.devices.values().next()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let device = Device::new("861234".to_string(), None, Some("  ".to_string()));
        assert_eq!(device.display_name, "861234");
        assert_eq!(device.equipment_type, "Vehicle");
    }

    #[test]
    fn test_resolve() {
        let registry = DeviceRegistry::new(vec![
            Device::new("b".to_string(), Some("Sweeper 2".to_string()), None),
            Device::new("a".to_string(), Some("Sweeper 1".to_string()), None),
        ]);

        assert_eq!(registry.resolve("a").unwrap().display_name, "Sweeper 1");
        assert_eq!(
            registry.resolve("zzz"),
            Err(ViewerError::UnresolvedDevice("zzz".to_string()))
        );
        assert_eq!(registry.first().map(|d| d.id.as_str()), Some("a"));
        assert_eq!(registry.len(), 2);
    }
}
