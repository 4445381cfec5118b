// Zone index - Read-only set of selectable zones, loaded once
use crate::domain::geo::GeoBounds;
use crate::domain::zone::Zone;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ZoneIndex {
    zones: Vec<Zone>,
    by_name: HashMap<String, usize>,
}

impl ZoneIndex {
    /// Builds the index in feed order. Zone names are unique; later duplicates are dropped.
    pub fn new(zones: impl IntoIterator<Item = Zone>) -> Self {
        let mut index = Self::default();
        for zone in zones {
            if index.by_name.contains_key(&zone.name) {
                tracing::warn!("Duplicate zone '{}' in zone feed, keeping the first", zone.name);
                continue;
            }
            index.by_name.insert(zone.name.clone(), index.zones.len());
            index.zones.push(zone);
        }
        index
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.name.as_str())
    }

    /// Zone names still available to the selector.
    pub fn selectable(&self, selected: &[String]) -> Vec<String> {
        self.names()
            .filter(|name| !selected.iter().any(|s| s == name))
            .map(str::to_string)
            .collect()
    }

    /// Geometry of the named zones in index order. Unknown names are ignored.
    pub fn geometries_for(&self, names: &[String]) -> Vec<&Zone> {
        let mut indices: Vec<usize> = names
            .iter()
            .filter_map(|n| self.by_name.get(n).copied())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| &self.zones[i]).collect()
    }

    pub fn bounds_for(&self, names: &[String]) -> GeoBounds {
        let mut bounds = GeoBounds::empty();
        for zone in self.geometries_for(names) {
            bounds.union(&zone.bounds());
        }
        bounds
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::LatLon;
    use crate::domain::zone::Polygon;

    fn square(name: &str, lat: f64, lon: f64) -> Zone {
        let ring = vec![
            LatLon::new(lat, lon),
            LatLon::new(lat + 1.0, lon),
            LatLon::new(lat + 1.0, lon + 1.0),
            LatLon::new(lat, lon),
        ];
        Zone::new(name.to_string(), vec![Polygon::new(vec![ring])])
    }

    fn index() -> ZoneIndex {
        ZoneIndex::new(vec![
            square("Koramangala", 12.0, 77.0),
            square("Indiranagar", 13.0, 77.5),
            square("Koramangala", 50.0, 50.0),
            square("Jayanagar", 11.0, 76.0),
        ])
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicates_keep_first() {
        let index = index();
        assert_eq!(index.len(), 3);
        let zones = index.geometries_for(&names(&["Koramangala"]));
        assert_eq!(zones[0].bounds().south_west(), Some(LatLon::new(12.0, 77.0)));
    }

    #[test]
    fn test_selectable_excludes_selected() {
        let index = index();
        assert_eq!(
            index.selectable(&names(&["Indiranagar"])),
            names(&["Koramangala", "Jayanagar"])
        );
        assert_eq!(index.selectable(&[]).len(), 3);
    }

    #[test]
    fn test_geometries_for_ignores_unknown_and_repeats() {
        let index = index();
        let zones = index.geometries_for(&names(&["Jayanagar", "Atlantis", "Koramangala", "Jayanagar"]));
        let found: Vec<&str> = zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(found, vec!["Koramangala", "Jayanagar"]);
    }

    #[test]
    fn test_bounds_for_selection() {
        let index = index();
        let bounds = index.bounds_for(&names(&["Koramangala", "Indiranagar"]));
        assert_eq!(bounds.south_west(), Some(LatLon::new(12.0, 77.0)));
        assert_eq!(bounds.north_east(), Some(LatLon::new(14.0, 78.5)));
        assert!(index.bounds_for(&[]).is_empty());
    }
}
