// Zone domain model - Named polygonal localities
use crate::domain::geo::{GeoBounds, LatLon};
use serde::Serialize;

/// A polygon as an exterior ring followed by optional holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    pub rings: Vec<Vec<LatLon>>,
}

impl Polygon {
    pub fn new(rings: Vec<Vec<LatLon>>) -> Self {
        Self { rings }
    }

    pub fn exterior(&self) -> &[LatLon] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::from_points(self.exterior())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub name: String,
    pub polygons: Vec<Polygon>,
}

impl Zone {
    pub fn new(name: String, polygons: Vec<Polygon>) -> Self {
        Self { name, polygons }
    }

    pub fn bounds(&self) -> GeoBounds {
        let mut bounds = GeoBounds::empty();
        for polygon in &self.polygons {
            bounds.union(&polygon.bounds());
        }
        bounds
    }
}
