// GeoJSON mapper - Converts track and zone feature collections to domain types
use crate::domain::calendar::DayKey;
use crate::domain::geo::LatLon;
use crate::domain::track::{SegmentProperties, Track, TrackPoint, TrackSegment};
use crate::domain::zone::{Polygon, Zone};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

/// Parse one day's track payload.
///
/// Every LineString feature and every part of a MultiLineString becomes its own
/// segment. Consecutive Point features (one fix per feature, properties holding
/// `timestamp`/`speed`/`heading`) are collected into a single segment.
pub fn parse_track(day: DayKey, body: &[u8]) -> Result<Track> {
    let collection: FeatureCollection =
        serde_json::from_slice(body).context("Failed to parse track GeoJSON")?;

    let mut segments = Vec::new();
    let mut fixes: Vec<TrackPoint> = Vec::new();

    for feature in collection.features {
        let properties = feature.properties.unwrap_or_default();
        match feature.geometry {
            Some(Geometry::Point { coordinates }) => {
                if let Some(position) = to_lat_lon(&coordinates) {
                    fixes.push(TrackPoint {
                        position,
                        timestamp: properties.get("timestamp").and_then(parse_timestamp),
                        speed: properties.get("speed").and_then(Value::as_f64),
                        heading: properties.get("heading").and_then(Value::as_f64),
                    });
                }
            }
            Some(Geometry::LineString { coordinates }) => {
                flush_fixes(&mut fixes, &mut segments);
                let points = line_points(&coordinates, Some(&properties));
                segments.push(TrackSegment::new(points, segment_properties(&properties)));
            }
            Some(Geometry::MultiLineString { coordinates }) => {
                flush_fixes(&mut fixes, &mut segments);
                for line in &coordinates {
                    let points = line_points(line, None);
                    segments.push(TrackSegment::new(points, segment_properties(&properties)));
                }
            }
            _ => {}
        }
    }
    flush_fixes(&mut fixes, &mut segments);

    Ok(Track::new(day, segments))
}

/// Parse the zone feed. Features need a `name` property and Polygon or
/// MultiPolygon geometry; anything else is skipped.
pub fn parse_zones(body: &[u8]) -> Result<Vec<Zone>> {
    let collection: FeatureCollection =
        serde_json::from_slice(body).context("Failed to parse zone GeoJSON")?;

    let mut zones = Vec::new();
    for feature in collection.features {
        let name = feature
            .properties
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let Some(name) = name else {
            tracing::warn!("Skipping zone feature without a name");
            continue;
        };

        let polygons = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => vec![to_polygon(&coordinates)],
            Some(Geometry::MultiPolygon { coordinates }) => {
                coordinates.iter().map(|p| to_polygon(p)).collect()
            }
            _ => {
                tracing::warn!("Skipping zone '{}' without polygon geometry", name);
                continue;
            }
        };

        zones.push(Zone::new(name.to_string(), polygons));
    }

    Ok(zones)
}

fn flush_fixes(fixes: &mut Vec<TrackPoint>, segments: &mut Vec<TrackSegment>) {
    if fixes.is_empty() {
        return;
    }
    let mut points = std::mem::take(fixes);
    if points.iter().all(|p| p.timestamp.is_some()) {
        points.sort_by_key(|p| p.timestamp);
    }
    segments.push(TrackSegment::new(points, SegmentProperties::default()));
}

/// GeoJSON positions are `[lon, lat, ...]`. Per-point arrays in `properties`
/// (`timestamps`, `speeds`, `headings`) are applied when present.
fn line_points(coordinates: &[Position], properties: Option<&Map<String, Value>>) -> Vec<TrackPoint> {
    let column = |key: &str| properties.and_then(|p| p.get(key)).and_then(Value::as_array);
    let timestamps = column("timestamps");
    let speeds = column("speeds");
    let headings = column("headings");

    coordinates
        .iter()
        .enumerate()
        .filter_map(|(i, position)| {
            let position = to_lat_lon(position)?;
            Some(TrackPoint {
                position,
                timestamp: timestamps.and_then(|t| t.get(i)).and_then(parse_timestamp),
                speed: speeds.and_then(|s| s.get(i)).and_then(Value::as_f64),
                heading: headings.and_then(|h| h.get(i)).and_then(Value::as_f64),
            })
        })
        .collect()
}

fn segment_properties(properties: &Map<String, Value>) -> SegmentProperties {
    SegmentProperties {
        date: properties.get("date").and_then(as_text),
        distance_km: properties.get("distance_km").and_then(as_text),
        vehicle: properties.get("vehicle").and_then(as_text),
        point_count: properties.get("points").and_then(Value::as_u64),
    }
}

fn to_polygon(rings: &[Vec<Position>]) -> Polygon {
    Polygon::new(
        rings
            .iter()
            .map(|ring| ring.iter().filter_map(|p| to_lat_lon(p)).collect())
            .collect(),
    )
}

fn to_lat_lon(position: &[f64]) -> Option<LatLon> {
    match position {
        [lon, lat, ..] => Some(LatLon::new(*lat, *lon)).filter(LatLon::is_finite),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// RFC 3339 strings, or numbers as Unix epoch seconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => DateTime::from_timestamp(n.as_i64()?, 0),
        _ => None,
    }
}
