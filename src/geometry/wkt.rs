use std::str::FromStr;

use ::wkt::types::{
    Coord as WktCoord, LineString as WktLineString, Point as WktPoint, Polygon as WktPolygon,
};
use ::wkt::Wkt;
use geo::Coord;

use super::Geometry;
use crate::error::{GeoFixtureError, Result};

fn coord_to_wkt(coord: &Coord) -> WktCoord<f64> {
    WktCoord {
        x: coord.x,
        y: coord.y,
        z: None,
        m: None,
    }
}

fn coords_to_wkt(coords: &[Coord]) -> WktLineString<f64> {
    WktLineString(coords.iter().map(coord_to_wkt).collect())
}

fn wkt_to_coords(line_string: &WktLineString<f64>) -> Vec<Coord> {
    line_string
        .0
        .iter()
        .map(|c| Coord { x: c.x, y: c.y })
        .collect()
}

impl Geometry {
    /// Encode as well-known text, e.g. `POLYGON((0 0,10 0,10 15,0 15,0 0))`.
    pub fn to_wkt(&self) -> String {
        let wkt: Wkt<f64> = match self {
            Geometry::Point(point) => Wkt::Point(WktPoint(Some(coord_to_wkt(&point.0)))),
            Geometry::LineString(line) => Wkt::LineString(coords_to_wkt(&line.0)),
            Geometry::Polygon(polygon) => {
                let mut rings = vec![coords_to_wkt(&polygon.exterior().0)];
                rings.extend(polygon.interiors().iter().map(|ring| coords_to_wkt(&ring.0)));
                Wkt::Polygon(WktPolygon(rings))
            }
        };
        wkt.to_string()
    }

    /// Parse well-known text produced by [`Geometry::to_wkt`].
    ///
    /// Only points, line strings and single-ring polygons are accepted; the usual construction
    /// checks apply to the parsed coordinates.
    pub fn from_wkt(text: &str) -> Result<Self> {
        let wkt = Wkt::<f64>::from_str(text).map_err(GeoFixtureError::WktStrError)?;
        match wkt {
            Wkt::Point(WktPoint(Some(c))) => Ok(Geometry::point(Coord { x: c.x, y: c.y })),
            Wkt::Point(WktPoint(None)) => Err(GeoFixtureError::General(
                "empty point is not a valid fixture geometry".to_string(),
            )),
            Wkt::LineString(line) => Geometry::line_string(wkt_to_coords(&line)),
            Wkt::Polygon(WktPolygon(rings)) => match rings.as_slice() {
                [exterior] => Geometry::polygon(wkt_to_coords(exterior)),
                _ => Err(GeoFixtureError::General(format!(
                    "expected a polygon with exactly one ring, got {}",
                    rings.len()
                ))),
            },
            _ => Err(GeoFixtureError::General(format!(
                "unsupported geometry in WKT: {}",
                text
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn polygon_text() {
        let polygon = Geometry::polygon(vec![
            coord! { x: 2697000., y: 1262000. },
            coord! { x: 2697010., y: 1262000. },
            coord! { x: 2697010., y: 1262015. },
            coord! { x: 2697000., y: 1262015. },
            coord! { x: 2697000., y: 1262000. },
        ])
        .unwrap();
        let text = polygon.to_wkt();
        assert!(text.starts_with("POLYGON(("));
        assert!(text.contains("2697010 1262015"));
        assert_eq!(Geometry::from_wkt(&text).unwrap(), polygon);
    }

    #[test]
    fn fractional_coordinates_survive_parsing() {
        let line = Geometry::line_string(vec![
            coord! { x: 2683012.345678, y: 1248001.5 },
            coord! { x: 2683100.987654321, y: 1247999.25 },
        ])
        .unwrap();
        let parsed = Geometry::from_wkt(&line.to_wkt()).unwrap();
        for (a, b) in line.coords().iter().zip(parsed.coords()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn point_text() {
        let point = Geometry::point(coord! { x: 5., y: -3. });
        assert!(point.to_wkt().starts_with("POINT"));
        assert_eq!(Geometry::from_wkt("POINT(5 -3)").unwrap(), point);
    }

    #[test]
    fn rejects_unsupported_kinds() {
        assert!(Geometry::from_wkt("MULTIPOINT((0 0),(1 1))").is_err());
        assert!(Geometry::from_wkt("not wkt").is_err());
    }
}
