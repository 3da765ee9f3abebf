//! Geo-shape values used by the geospatial constraints of
//! [`Expression`](crate::Expression).

use bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

/// A shape that can be rendered as a `GeoJSON` geometry object.
pub trait Geometry {
    fn to_geojson(&self) -> Document;
}

/// A longitude/latitude pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// The `[longitude, latitude]` pair used by both `GeoJSON` and legacy
    /// coordinate operators.
    pub fn position(self) -> Bson {
        Bson::Array(vec![
            Bson::Double(self.longitude),
            Bson::Double(self.latitude),
        ])
    }
}

impl From<[f64; 2]> for Point {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<(f64, f64)> for Point {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

impl Geometry for Point {
    fn to_geojson(&self) -> Document {
        doc! {
            "type": "Point",
            "coordinates": self.position(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineString(pub Vec<Point>);

impl LineString {
    pub fn new<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Self {
        Self(points.into_iter().map(Into::into).collect())
    }
}

impl Geometry for LineString {
    fn to_geojson(&self) -> Document {
        doc! {
            "type": "LineString",
            "coordinates": positions(&self.0),
        }
    }
}

/// A polygon made of an exterior ring followed by optional holes.
///
/// Rings are passed through as given. `MongoDB` expects each of them to be
/// closed (first point equal to the last one).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    rings: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new<P: Into<Point>>(exterior: impl IntoIterator<Item = P>) -> Self {
        Self {
            rings: vec![exterior.into_iter().map(Into::into).collect()],
        }
    }

    pub fn with_hole<P: Into<Point>>(mut self, interior: impl IntoIterator<Item = P>) -> Self {
        self.rings.push(interior.into_iter().map(Into::into).collect());
        self
    }

    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }
}

impl Geometry for Polygon {
    fn to_geojson(&self) -> Document {
        doc! {
            "type": "Polygon",
            "coordinates": self.rings.iter().map(|ring| positions(ring)).collect::<Vec<_>>(),
        }
    }
}

fn positions(points: &[Point]) -> Bson {
    Bson::Array(points.iter().map(|point| point.position()).collect())
}

/// Distance bounds of a `$near`/`$nearSphere` constraint.
///
/// A bound equal to zero is treated as absent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Distance {
    #[default]
    Unbounded,
    Max(f64),
    Range { min: Option<f64>, max: Option<f64> },
}

impl Distance {
    /// Returns the `(min, max)` bounds that should be rendered.
    pub fn bounds(self) -> (Option<f64>, Option<f64>) {
        match self {
            Self::Unbounded => (None, None),
            Self::Max(max) => (None, non_zero(Some(max))),
            Self::Range { min, max } => (non_zero(min), non_zero(max)),
        }
    }
}

#[allow(clippy::float_cmp)]
fn non_zero(bound: Option<f64>) -> Option<f64> {
    bound.filter(|bound| *bound != 0.0)
}

impl From<f64> for Distance {
    fn from(value: f64) -> Self {
        Self::Max(value)
    }
}

impl From<Option<f64>> for Distance {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unbounded, Self::Max)
    }
}

impl From<[f64; 2]> for Distance {
    fn from([min, max]: [f64; 2]) -> Self {
        Self::Range {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl From<(Option<f64>, Option<f64>)> for Distance {
    fn from((min, max): (Option<f64>, Option<f64>)) -> Self {
        Self::Range { min, max }
    }
}
