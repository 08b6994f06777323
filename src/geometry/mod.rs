//! The three geometry kinds a fixture feature can carry, with the ring rules enforced at
//! construction.

use geo::{BoundingRect, Coord, LineString, Point, Polygon, Rect};

use crate::error::{GeoFixtureError, Result};

mod wkt;

/// The geometry kinds stored in fixture tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

impl GeometryType {
    /// PostGIS type modifier name.
    pub fn postgis_name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
        }
    }
}

/// A validated geometry.
///
/// Use [`Geometry::line_string`] and [`Geometry::polygon`] to build one from raw coordinates;
/// both reject inputs that would produce degenerate shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
}

impl Geometry {
    pub fn point(coord: Coord) -> Self {
        Geometry::Point(Point::from(coord))
    }

    /// Build a line string from at least two coordinates.
    pub fn line_string(coords: Vec<Coord>) -> Result<Self> {
        if coords.len() < 2 {
            return Err(GeoFixtureError::InvalidGeometryConfig(format!(
                "line string needs at least 2 points, got {}",
                coords.len()
            )));
        }
        check_no_repeats(&coords)?;
        Ok(Geometry::LineString(LineString::new(coords)))
    }

    /// Build a polygon from a closed exterior ring.
    ///
    /// The ring must have at least four coordinates, repeat its first coordinate last, and
    /// contain no consecutive duplicates.
    pub fn polygon(ring: Vec<Coord>) -> Result<Self> {
        if ring.len() < 4 {
            return Err(GeoFixtureError::InvalidGeometryConfig(format!(
                "polygon ring needs at least 4 points, got {}",
                ring.len()
            )));
        }
        if ring.first() != ring.last() {
            return Err(GeoFixtureError::InvalidGeometryConfig(
                "polygon ring is not closed".to_string(),
            ));
        }
        check_no_repeats(&ring)?;
        Ok(Geometry::Polygon(Polygon::new(LineString::new(ring), vec![])))
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
        }
    }

    /// All coordinates in order. For polygons this is the exterior ring including the closing
    /// coordinate.
    pub fn coords(&self) -> Vec<Coord> {
        match self {
            Geometry::Point(point) => vec![point.0],
            Geometry::LineString(line) => line.0.clone(),
            Geometry::Polygon(polygon) => polygon.exterior().0.clone(),
        }
    }

    pub fn first_coord(&self) -> Option<Coord> {
        self.coords().first().copied()
    }

    pub fn last_coord(&self) -> Option<Coord> {
        self.coords().last().copied()
    }

    pub fn bounding_rect(&self) -> Option<Rect> {
        match self {
            Geometry::Point(point) => Some(point.bounding_rect()),
            Geometry::LineString(line) => line.bounding_rect(),
            Geometry::Polygon(polygon) => polygon.bounding_rect(),
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(point) => Some(point),
            _ => None,
        }
    }
}

fn check_no_repeats(coords: &[Coord]) -> Result<()> {
    if let Some(i) = coords.windows(2).position(|pair| pair[0] == pair[1]) {
        return Err(GeoFixtureError::InvalidGeometryConfig(format!(
            "duplicate consecutive point at index {}",
            i + 1
        )));
    }
    Ok(())
}
