// Selection state - Single source of truth for device, date range and selected zones
use crate::application::zone_index::ZoneIndex;
use crate::domain::calendar::DateRange;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Immutable copy of the selection, emitted once per accepted mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSnapshot {
    pub revision: u64,
    pub device: Option<String>,
    pub range: DateRange,
    /// Selected zone names in the order they were added.
    pub zones: Vec<String>,
}

impl SelectionSnapshot {
    pub fn has_zones(&self) -> bool {
        !self.zones.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Device,
    Range,
    Zones,
    Refresh,
}

pub trait SelectionObserver: Send + Sync {
    /// Called synchronously while the selection is locked; implementations must
    /// not mutate the selection from here.
    fn selection_changed(&self, change: SelectionChange, snapshot: &SelectionSnapshot);
}

pub struct SelectionState {
    zones: Arc<ZoneIndex>,
    current: Mutex<SelectionSnapshot>,
    observers: RwLock<Vec<Arc<dyn SelectionObserver>>>,
}

impl SelectionState {
    pub fn new(zones: Arc<ZoneIndex>, device: Option<String>, range: DateRange) -> Self {
        Self {
            zones,
            current: Mutex::new(SelectionSnapshot {
                revision: 0,
                device,
                range,
                zones: Vec::new(),
            }),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn SelectionObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        self.lock().clone()
    }

    pub fn set_device(&self, device: Option<String>) -> bool {
        self.apply(SelectionChange::Device, |s| {
            if s.device == device {
                return false;
            }
            s.device = device;
            true
        })
    }

    pub fn set_range(&self, range: DateRange) -> bool {
        self.apply(SelectionChange::Range, |s| {
            if s.range == range {
                return false;
            }
            s.range = range;
            true
        })
    }

    /// Adds a zone to the selection. Empty, unknown and already selected names are ignored.
    pub fn add_zone(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || !self.zones.contains(name) {
            return false;
        }
        self.apply(SelectionChange::Zones, |s| {
            if s.zones.iter().any(|z| z == name) {
                return false;
            }
            s.zones.push(name.to_string());
            true
        })
    }

    /// Removes a zone, making it selectable again.
    pub fn remove_zone(&self, name: &str) -> bool {
        let name = name.trim();
        self.apply(SelectionChange::Zones, |s| {
            let before = s.zones.len();
            s.zones.retain(|z| z != name);
            s.zones.len() != before
        })
    }

    /// Re-runs everything downstream without changing the selection.
    pub fn refresh(&self) {
        self.apply(SelectionChange::Refresh, |_| true);
    }

    pub fn selected_zones(&self) -> Vec<String> {
        self.lock().zones.clone()
    }

    pub fn selectable_zones(&self) -> Vec<String> {
        self.zones.selectable(&self.lock().zones)
    }

    /// Runs `mutate` and, when it reports a change, notifies every observer
    /// with the new snapshot before releasing the lock.
    fn apply(&self, change: SelectionChange, mutate: impl FnOnce(&mut SelectionSnapshot) -> bool) -> bool {
        let mut current = self.lock();
        if !mutate(&mut *current) {
            return false;
        }
        current.revision += 1;
        let snapshot = current.clone();

        tracing::debug!("Selection changed ({:?}), revision {}", change, snapshot.revision);

        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer.selection_changed(change, &snapshot);
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, SelectionSnapshot> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::zone::Zone;

    #[derive(Default)]
    struct CountingObserver {
        seen: Mutex<Vec<(SelectionChange, SelectionSnapshot)>>,
    }

    impl CountingObserver {
        fn count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn last(&self) -> (SelectionChange, SelectionSnapshot) {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl SelectionObserver for CountingObserver {
        fn selection_changed(&self, change: SelectionChange, snapshot: &SelectionSnapshot) {
            self.seen.lock().unwrap().push((change, snapshot.clone()));
        }
    }

    fn state() -> (SelectionState, Arc<CountingObserver>) {
        let zones = ZoneIndex::new(
            ["North", "South", "East"]
                .into_iter()
                .map(|n| Zone::new(n.to_string(), Vec::new())),
        );
        let range = DateRange::parse("2023-01-01", "2023-01-07").unwrap();
        let state = SelectionState::new(Arc::new(zones), Some("V1".to_string()), range);
        let observer = Arc::new(CountingObserver::default());
        state.subscribe(observer.clone());
        (state, observer)
    }

    #[test]
    fn test_each_mutation_notifies_once() {
        let (state, observer) = state();

        assert!(state.set_device(Some("V2".to_string())));
        assert_eq!(observer.count(), 1);
        assert_eq!(observer.last().0, SelectionChange::Device);

        assert!(state.set_range(DateRange::parse("2023-02-01", "2023-02-03").unwrap()));
        assert_eq!(observer.count(), 2);

        state.refresh();
        assert_eq!(observer.count(), 3);
        assert_eq!(observer.last().1.revision, 3);
    }

    #[test]
    fn test_unchanged_values_do_not_notify() {
        let (state, observer) = state();
        assert!(!state.set_device(Some("V1".to_string())));
        assert!(!state.set_range(DateRange::parse("2023-01-01", "2023-01-07").unwrap()));
        assert_eq!(observer.count(), 0);
        assert_eq!(state.snapshot().revision, 0);
    }

    #[test]
    fn test_add_zone_rules() {
        let (state, observer) = state();

        assert!(!state.add_zone(""));
        assert!(!state.add_zone("   "));
        assert!(!state.add_zone("Atlantis"));
        assert_eq!(observer.count(), 0);

        assert!(state.add_zone("South"));
        assert!(!state.add_zone("South"));
        assert!(state.add_zone("North"));
        assert_eq!(observer.count(), 2);

        assert_eq!(state.selected_zones(), vec!["South", "North"]);
        assert_eq!(state.selectable_zones(), vec!["East"]);
        assert!(observer.last().1.has_zones());
    }

    #[test]
    fn test_remove_zone_restores_selectable_once() {
        let (state, observer) = state();
        state.add_zone("East");
        let before = observer.count();

        assert!(state.remove_zone("East"));
        assert_eq!(observer.count(), before + 1);
        assert_eq!(observer.last().0, SelectionChange::Zones);

        assert!(!state.remove_zone("East"));
        assert_eq!(observer.count(), before + 1);

        state.add_zone("North");
        assert!(state.remove_zone("  North "));
        assert!(state.selected_zones().is_empty());

        let selectable = state.selectable_zones();
        assert_eq!(selectable.iter().filter(|z| *z == "East").count(), 1);
        assert_eq!(selectable.len(), 3);
    }
}
