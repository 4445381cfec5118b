// Track domain models - One device's recorded path for one day
use crate::domain::calendar::DayKey;
use crate::domain::geo::{GeoBounds, LatLon};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub position: LatLon,
    pub timestamp: Option<DateTime<Utc>>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
}

impl TrackPoint {
    pub fn new(position: LatLon) -> Self {
        Self {
            position,
            timestamp: None,
            speed: None,
            heading: None,
        }
    }
}

/// Optional descriptive fields carried by a segment. Deployments differ in
/// which of these they populate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentProperties {
    pub date: Option<String>,
    pub distance_km: Option<String>,
    pub vehicle: Option<String>,
    pub point_count: Option<u64>,
}

/// A continuous, chronologically ordered run of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSegment {
    pub points: Vec<TrackPoint>,
    pub properties: SegmentProperties,
}

impl TrackSegment {
    pub fn new(points: Vec<TrackPoint>, properties: SegmentProperties) -> Self {
        Self { points, properties }
    }

    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::from_points(self.points.iter().map(|p| &p.position))
    }

    pub fn start(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    pub fn end(&self) -> Option<&TrackPoint> {
        self.points.last()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub segment: usize,
    pub position: LatLon,
    pub timestamp: Option<DateTime<Utc>>,
}

/// One day of movement for a device, split into one or more segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub day: DayKey,
    pub segments: Vec<TrackSegment>,
}

impl Track {
    /// Builds a track, dropping segments without points.
    pub fn new(day: DayKey, segments: Vec<TrackSegment>) -> Self {
        let segments = segments
            .into_iter()
            .filter(|s| !s.points.is_empty())
            .collect();
        Self { day, segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn bounds(&self) -> GeoBounds {
        let mut bounds = GeoBounds::empty();
        for segment in &self.segments {
            bounds.union(&segment.bounds());
        }
        bounds
    }

    /// Start and end markers for every segment, in segment order.
    pub fn markers(&self) -> Vec<Marker> {
        let mut markers = Vec::with_capacity(self.segments.len() * 2);
        for (index, segment) in self.segments.iter().enumerate() {
            let ends = [
                (MarkerKind::Start, segment.start()),
                (MarkerKind::End, segment.end()),
            ];
            for (kind, point) in ends {
                if let Some(p) = point {
                    markers.push(Marker {
                        kind,
                        segment: index,
                        position: p.position,
                        timestamp: p.timestamp,
                    });
                }
            }
        }
        markers
    }

    /// Popup text for the day, built from the first segment carrying the fields.
    pub fn summary(&self) -> Option<String> {
        self.segments.iter().find_map(|s| {
            let p = &s.properties;
            match (&p.date, &p.distance_km) {
                (Some(date), Some(km)) => Some(format!("Date: {}<br>Dist: {} km", date, km)),
                (Some(date), None) => Some(format!("Date: {}", date)),
                _ => None,
            }
        })
    }
}

/// Why a day contributed nothing to a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum AbsenceReason {
    NotFound,
    Empty,
    Failed(String),
}

/// Result of fetching one day. Absence is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Present(Track),
    Absent(AbsenceReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(coords: &[(f64, f64)]) -> TrackSegment {
        TrackSegment::new(
            coords
                .iter()
                .map(|(lat, lon)| TrackPoint::new(LatLon::new(*lat, *lon)))
                .collect(),
            SegmentProperties::default(),
        )
    }

    fn day() -> DayKey {
        "2023-01-01".parse().unwrap()
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let track = Track::new(day(), vec![segment(&[]), segment(&[(1.0, 2.0)])]);
        assert_eq!(track.segments.len(), 1);
        assert!(!track.is_empty());
        assert!(Track::new(day(), vec![segment(&[])]).is_empty());
    }

    #[test]
    fn test_markers_per_segment() {
        let track = Track::new(
            day(),
            vec![
                segment(&[(1.0, 1.0), (1.5, 1.5), (2.0, 2.0)]),
                segment(&[(5.0, 5.0), (6.0, 6.0)]),
            ],
        );

        let markers = track.markers();
        assert_eq!(markers.len(), 4);
        assert_eq!(markers[1].kind, MarkerKind::End);
        assert_eq!(markers[1].position, LatLon::new(2.0, 2.0));
        assert_eq!(markers[2].segment, 1);
        assert_eq!(markers[2].position, LatLon::new(5.0, 5.0));
    }

    #[test]
    fn test_bounds_span_all_segments() {
        let track = Track::new(
            day(),
            vec![segment(&[(1.0, 1.0), (2.0, 2.0)]), segment(&[(-3.0, 7.0)])],
        );
        let bounds = track.bounds();
        assert_eq!(bounds.south_west(), Some(LatLon::new(-3.0, 1.0)));
        assert_eq!(bounds.north_east(), Some(LatLon::new(2.0, 7.0)));
        assert_eq!(track.segments.iter().map(|s| s.points.len()).sum::<usize>(), 3);
    }

    #[test]
    fn test_summary() {
        let mut s = segment(&[(1.0, 1.0)]);
        s.properties.date = Some("2023-01-01".to_string());
        s.properties.distance_km = Some("12.40".to_string());
        let track = Track::new(day(), vec![segment(&[(0.0, 0.0)]), s]);
        assert_eq!(track.summary().as_deref(), Some("Date: 2023-01-01<br>Dist: 12.40 km"));
    }
}
