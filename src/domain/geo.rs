// Geographic primitives - Coordinates and accumulated bounding boxes
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Axis-aligned bounding box that grows as coordinates are merged into it.
///
/// An empty box has no extent at all; a box built from a single location (or
/// from repeated identical locations) has zero extent. Neither can be used to
/// frame a view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeoBounds {
    #[serde(flatten)]
    extent: Option<Extent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Extent {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl GeoBounds {
    pub fn empty() -> Self {
        Self { extent: None }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLon>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.extend(point);
        }
        bounds
    }

    /// Grow the box to include `point`. Non-finite coordinates are ignored.
    pub fn extend(&mut self, point: &LatLon) {
        if !point.is_finite() {
            return;
        }
        self.extent = Some(match self.extent {
            None => Extent {
                south: point.lat,
                west: point.lon,
                north: point.lat,
                east: point.lon,
            },
            Some(e) => Extent {
                south: e.south.min(point.lat),
                west: e.west.min(point.lon),
                north: e.north.max(point.lat),
                east: e.east.max(point.lon),
            },
        });
    }

    pub fn union(&mut self, other: &GeoBounds) {
        if let Some(e) = other.extent {
            self.extend(&LatLon::new(e.south, e.west));
            self.extend(&LatLon::new(e.north, e.east));
        }
    }

    /// True when the box covers some area or line, i.e. a view can be fitted to it.
    pub fn is_framable(&self) -> bool {
        match self.extent {
            Some(e) => e.north > e.south || e.east > e.west,
            None => false,
        }
    }
}

#[cfg(test)]
impl GeoBounds {
    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    pub fn south_west(&self) -> Option<LatLon> {
        self.extent.map(|e| LatLon::new(e.south, e.west))
    }

    pub fn north_east(&self) -> Option<LatLon> {
        self.extent.map(|e| LatLon::new(e.north, e.east))
    }
}
