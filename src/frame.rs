//! Local planar frames that fixtures are placed in.

use std::f64::consts::TAU;

use geo::{coord, Coord};
use rand::Rng;

/// A fixed origin in a projected coordinate system plus a nominal spread radius.
///
/// All placement is expressed as offsets from the origin:
///
/// ```
/// use geofixture::frame::CoordinateFrame;
///
/// let frame = CoordinateFrame::new(2697000., 1262000., 3000.);
/// let p = frame.offset(40., -3.);
/// assert_eq!((p.x, p.y), (2697040., 1261997.));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    origin: Coord,
    spread: f64,
}

impl CoordinateFrame {
    pub fn new(x0: f64, y0: f64, spread: f64) -> Self {
        Self {
            origin: coord! { x: x0, y: y0 },
            spread,
        }
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Coord {
        coord! { x: self.origin.x + dx, y: self.origin.y + dy }
    }

    /// A new frame whose origin is shifted by `(dx, dy)` from this one, keeping the spread.
    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        let origin = self.offset(dx, dy);
        Self::new(origin.x, origin.y, self.spread)
    }

    /// A point drawn uniformly from the disc of radius [`spread`](Self::spread) around the
    /// origin.
    pub fn random_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Coord {
        self.random_offset_within(rng, self.spread)
    }

    /// Like [`random_offset`](Self::random_offset) with an explicit radius.
    pub fn random_offset_within<R: Rng + ?Sized>(&self, rng: &mut R, radius: f64) -> Coord {
        // sqrt keeps the density uniform over the disc area
        let r = radius * rng.gen::<f64>().sqrt();
        let theta = rng.gen_range(0.0..TAU);
        self.offset(r * theta.cos(), r * theta.sin())
    }

    /// Whether `point` lies within the spread radius of the origin.
    pub fn contains(&self, point: Coord) -> bool {
        let dx = point.x - self.origin.x;
        let dy = point.y - self.origin.y;
        dx.hypot(dy) <= self.spread
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::seeded_rng;

    #[test]
    fn offset_is_relative_to_origin() {
        let frame = CoordinateFrame::new(100., 200., 10.);
        assert_eq!(frame.offset(0., 0.), frame.origin());
        assert_eq!(frame.offset(-5., 2.5), coord! { x: 95., y: 202.5 });
    }

    #[test]
    fn shifted_frame_keeps_spread() {
        let frame = CoordinateFrame::new(0., 0., 50.).shifted(500., 200.);
        assert_eq!(frame.origin(), coord! { x: 500., y: 200. });
        assert_eq!(frame.spread(), 50.);
    }

    #[test]
    fn random_offsets_stay_in_radius() {
        let frame = CoordinateFrame::new(2683000., 1248000., 3000.);
        let mut rng = seeded_rng(7);
        for _ in 0..1000 {
            assert!(frame.contains(frame.random_offset(&mut rng)));
        }
    }
}
