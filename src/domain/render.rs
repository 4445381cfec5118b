// Render domain models - Overlay styles, overlays and per-pass render batches
use crate::domain::calendar::DayKey;
use crate::domain::geo::{GeoBounds, LatLon};
use crate::domain::track::{AbsenceReason, Marker, Track};
use crate::domain::zone::{Polygon, Zone};
use serde::{Deserialize, Serialize};

/// Identity of one aggregation pass. Later passes compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PassId(pub u64);

/// Handle returned by the map surface for an added overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OverlayId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStyle {
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
    pub dash_array: Option<String>,
}

/// Colors and stroke settings for everything drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct StylePalette {
    pub route: TrackStyle,
    pub highlight_color: String,
    pub zone: ZoneStyle,
}

impl StylePalette {
    /// Route style for the current zone selection: highlighted while any zone is selected.
    pub fn track_style(&self, zones_selected: bool) -> TrackStyle {
        if zones_selected {
            TrackStyle {
                color: self.highlight_color.clone(),
                ..self.route.clone()
            }
        } else {
            self.route.clone()
        }
    }
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            route: TrackStyle {
                color: "#1565c0".to_string(),
                weight: 4.0,
                opacity: 0.8,
            },
            highlight_color: "#f57c00".to_string(),
            zone: ZoneStyle {
                color: "#4caf50".to_string(),
                weight: 2.0,
                fill_opacity: 0.1,
                dash_array: Some("5, 5".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub pass: PassId,
    pub day: DayKey,
    pub paths: Vec<Vec<LatLon>>,
    pub markers: Vec<Marker>,
    pub popup: Option<String>,
    pub style: TrackStyle,
}

impl RouteOverlay {
    pub fn from_track(pass: PassId, track: &Track, style: TrackStyle) -> Self {
        Self {
            pass,
            day: track.day,
            paths: track
                .segments
                .iter()
                .map(|s| s.points.iter().map(|p| p.position).collect())
                .collect(),
            markers: track.markers(),
            popup: track.summary(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneOverlay {
    pub name: String,
    pub polygons: Vec<Polygon>,
    pub style: ZoneStyle,
}

impl ZoneOverlay {
    pub fn from_zone(zone: &Zone, style: ZoneStyle) -> Self {
        Self {
            name: zone.name.clone(),
            polygons: zone.polygons.clone(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Route(RouteOverlay),
    Zone(ZoneOverlay),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntry {
    pub day: DayKey,
    pub track: Track,
    pub style: TrackStyle,
    pub overlay: OverlayId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedDay {
    pub day: DayKey,
    pub reason: AbsenceReason,
}

/// Everything one aggregation pass has drawn so far, plus the running bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBatch {
    pub pass: PassId,
    pub entries: Vec<RenderEntry>,
    pub skipped: Vec<SkippedDay>,
    pub bounds: GeoBounds,
}

impl RenderBatch {
    pub fn new(pass: PassId) -> Self {
        Self {
            pass,
            entries: Vec::new(),
            skipped: Vec::new(),
            bounds: GeoBounds::empty(),
        }
    }

    /// Adds a drawn day and merges its bounds into the running total.
    pub fn push(&mut self, entry: RenderEntry) {
        self.bounds.union(&entry.track.bounds());
        self.entries.push(entry);
    }

    pub fn skip(&mut self, day: DayKey, reason: AbsenceReason) {
        self.skipped.push(SkippedDay { day, reason });
    }

    pub fn overlay_ids(&self) -> Vec<OverlayId> {
        self.entries.iter().map(|e| e.overlay).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut days_present: Vec<DayKey> = self.entries.iter().map(|e| e.day).collect();
        days_present.sort();
        let mut skipped = self.skipped.clone();
        skipped.sort_by_key(|s| s.day);

        BatchSummary {
            pass: self.pass,
            overlay_count: self.entries.len(),
            days_present,
            skipped,
            bounds: self.bounds,
        }
    }
}

/// Serializable view of a batch, with days in calendar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub pass: PassId,
    pub overlay_count: usize,
    pub days_present: Vec<DayKey>,
    pub skipped: Vec<SkippedDay>,
    pub bounds: GeoBounds,
}
