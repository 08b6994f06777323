use std::f64::consts::TAU;

use geo::{coord, Coord};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GeoFixtureError, Result};
use crate::geometry::Geometry;

/// Bounds for the per-vertex radius multiplier of a synthesized polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterRange {
    pub lo: f64,
    pub hi: f64,
}

impl JitterRange {
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        let range = Self { lo, hi };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.lo.is_finite() && self.hi.is_finite()) || self.lo <= 0. || self.lo > self.hi {
            return Err(GeoFixtureError::InvalidGeometryConfig(format!(
                "jitter range must satisfy 0 < lo <= hi, got [{}, {}]",
                self.lo, self.hi
            )));
        }
        Ok(())
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.lo == self.hi {
            self.lo
        } else {
            rng.gen_range(self.lo..=self.hi)
        }
    }
}

impl Default for JitterRange {
    fn default() -> Self {
        Self { lo: 0.8, hi: 1.2 }
    }
}

/// Generates building, parcel and zone outlines.
///
/// # Examples
///
/// ```
/// use geo::coord;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// use geofixture::algorithm::PolygonSynthesizer;
///
/// let synthesizer = PolygonSynthesizer::default();
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let outline = synthesizer
///     .irregular(&mut rng, coord! { x: 0., y: 0. }, 20., 6)
///     .unwrap();
/// assert_eq!(outline.coords().len(), 7);
///
/// let footprint = PolygonSynthesizer::rectangle(coord! { x: 0., y: 0. }, 10., 15.).unwrap();
/// assert_eq!(footprint.coords().len(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolygonSynthesizer {
    jitter: JitterRange,
}

impl PolygonSynthesizer {
    /// Vertex count for outlines that do not pick their own.
    pub const DEFAULT_VERTICES: usize = 8;

    pub fn new(jitter: JitterRange) -> Result<Self> {
        jitter.validate()?;
        Ok(Self { jitter })
    }

    pub fn jitter(&self) -> JitterRange {
        self.jitter
    }

    /// An irregular ring approximating a circle of `radius` around `center`.
    ///
    /// Vertex `i` sits at angle `2πi/n` and at distance `radius * k` where `k` is drawn
    /// uniformly from the jitter range. The returned polygon has `n + 1` ring coordinates.
    pub fn irregular<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center: Coord,
        radius: f64,
        vertices: usize,
    ) -> Result<Geometry> {
        if vertices < 3 {
            return Err(GeoFixtureError::InvalidGeometryConfig(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices
            )));
        }
        if !radius.is_finite() || radius <= 0. {
            return Err(GeoFixtureError::InvalidGeometryConfig(format!(
                "polygon radius must be positive, got {}",
                radius
            )));
        }

        let mut ring = Vec::with_capacity(vertices + 1);
        for i in 0..vertices {
            let theta = TAU * i as f64 / vertices as f64;
            let r = radius * self.jitter.sample(rng);
            ring.push(coord! {
                x: center.x + r * theta.cos(),
                y: center.y + r * theta.sin(),
            });
        }
        ring.push(ring[0]);
        Geometry::polygon(ring)
    }

    /// An axis-aligned rectangle with its lower-left corner at `corner`.
    ///
    /// The ring runs counter-clockwise starting and ending at `corner`.
    pub fn rectangle(corner: Coord, width: f64, height: f64) -> Result<Geometry> {
        if !(width.is_finite() && height.is_finite()) || width <= 0. || height <= 0. {
            return Err(GeoFixtureError::InvalidGeometryConfig(format!(
                "rectangle needs positive width and height, got {} x {}",
                width, height
            )));
        }
        let Coord { x, y } = corner;
        Geometry::polygon(vec![
            coord! { x: x, y: y },
            coord! { x: x + width, y: y },
            coord! { x: x + width, y: y + height },
            coord! { x: x, y: y + height },
            coord! { x: x, y: y },
        ])
    }

    /// An axis-aligned rectangle centered on `center`.
    pub fn rectangle_around(center: Coord, width: f64, height: f64) -> Result<Geometry> {
        Self::rectangle(
            coord! { x: center.x - width / 2., y: center.y - height / 2. },
            width,
            height,
        )
    }
}
