use crate::math::{
    ArcLengthMap, CubicBezier2d, ParametricCurve2d, Point2d, QuadraticBezier2d, Vector2d,
    ARC_LENGTH_SUBDIVISIONS,
};
use crate::VehicleId;
use cgmath::prelude::*;
use once_cell::unsync::OnceCell;
use std::collections::VecDeque;

/// A directed piece of road, straight or curved, that vehicles traverse
/// from arc length zero towards [length](Self::length).
///
/// Each segment owns the queue of vehicles currently on it, ordered by
/// progress: the front entry is the most advanced vehicle. Only back-push
/// and front-pop are permitted, which keeps per-tick queue work
/// proportional to the number of boundary crossings rather than the number
/// of vehicles.
#[derive(Clone)]
pub struct Segment {
    geometry: SegmentGeometry,
    /// Arc-length table for the curved variants, built on first query and
    /// immutable afterwards.
    arclen: OnceCell<ArcLengthMap>,
    /// IDs of the vehicles on the segment, front-most first.
    vehicles: VecDeque<VehicleId>,
}

/// The shape of a segment's centre line.
#[derive(Clone, Debug)]
enum SegmentGeometry {
    Straight { start: Point2d, end: Point2d },
    Quadratic(QuadraticBezier2d),
    Cubic(CubicBezier2d),
}

impl Segment {
    /// Creates a straight segment between two points.
    pub fn straight(start: Point2d, end: Point2d) -> Self {
        Self::from_geometry(SegmentGeometry::Straight { start, end })
    }

    /// Creates a quadratic bezier segment from three control points.
    pub fn quadratic(start: Point2d, control: Point2d, end: Point2d) -> Self {
        Self::from_geometry(SegmentGeometry::Quadratic(QuadraticBezier2d::new(&[
            start, control, end,
        ])))
    }

    /// Creates a cubic bezier segment from four control points.
    pub fn cubic(start: Point2d, control1: Point2d, control2: Point2d, end: Point2d) -> Self {
        Self::from_geometry(SegmentGeometry::Cubic(CubicBezier2d::new(&[
            start, control1, control2, end,
        ])))
    }

    fn from_geometry(geometry: SegmentGeometry) -> Self {
        Self {
            geometry,
            arclen: OnceCell::new(),
            vehicles: VecDeque::new(),
        }
    }

    /// The arc length of the segment in m.
    pub fn length(&self) -> f64 {
        match &self.geometry {
            SegmentGeometry::Straight { start, end } => (end - start).magnitude(),
            SegmentGeometry::Quadratic(curve) => self.arclen(curve).length(),
            SegmentGeometry::Cubic(curve) => self.arclen(curve).length(),
        }
    }

    /// Samples the segment's centre line at the given arc length.
    /// Out-of-range arc lengths clamp to the nearest endpoint.
    pub fn position_at(&self, s: f64) -> Point2d {
        match &self.geometry {
            SegmentGeometry::Straight { start, end } => {
                let length = (end - start).magnitude();
                let frac = if length > 0.0 {
                    (s / length).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                start + frac * (end - start)
            }
            SegmentGeometry::Quadratic(curve) => curve.sample(self.arclen(curve).t_at(s)),
            SegmentGeometry::Cubic(curve) => curve.sample(self.arclen(curve).t_at(s)),
        }
    }

    /// The heading of the segment at the given arc length, in radians.
    pub fn heading_at(&self, s: f64) -> f64 {
        let dir = self.direction_at(s);
        dir.y.atan2(dir.x)
    }

    fn direction_at(&self, s: f64) -> Vector2d {
        match &self.geometry {
            SegmentGeometry::Straight { start, end } => end - start,
            SegmentGeometry::Quadratic(curve) => curve.sample_dt(self.arclen(curve).t_at(s)),
            SegmentGeometry::Cubic(curve) => curve.sample_dt(self.arclen(curve).t_at(s)),
        }
    }

    fn arclen(&self, curve: &impl ParametricCurve2d) -> &ArcLengthMap {
        self.arclen
            .get_or_init(|| ArcLengthMap::from_curve(curve, ARC_LENGTH_SUBDIVISIONS))
    }

    /// The IDs of the vehicles on the segment, front-most first.
    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.vehicles.iter().copied()
    }

    /// The number of vehicles on the segment.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// The most advanced vehicle on the segment.
    pub fn front_vehicle(&self) -> Option<VehicleId> {
        self.vehicles.front().copied()
    }

    /// The most recently entered vehicle on the segment.
    pub fn back_vehicle(&self) -> Option<VehicleId> {
        self.vehicles.back().copied()
    }

    pub(crate) fn push_vehicle(&mut self, id: VehicleId) {
        self.vehicles.push_back(id);
    }

    pub(crate) fn pop_front_vehicle(&mut self) -> Option<VehicleId> {
        self.vehicles.pop_front()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn straight_length_and_position() {
        let segment = Segment::straight(Point2d::new(0.0, 0.0), Point2d::new(30.0, 40.0));
        assert_approx_eq!(segment.length(), 50.0);

        let mid = segment.position_at(25.0);
        assert_approx_eq!(mid.x, 15.0);
        assert_approx_eq!(mid.y, 20.0);
    }

    #[test]
    fn straight_heading_is_constant() {
        let segment = Segment::straight(Point2d::new(0.0, 0.0), Point2d::new(100.0, 100.0));
        let expected = std::f64::consts::FRAC_PI_4;
        assert_approx_eq!(segment.heading_at(0.0), expected);
        assert_approx_eq!(segment.heading_at(70.0), expected);
    }

    #[test]
    fn position_clamps_outside_bounds() {
        let segment = Segment::straight(Point2d::new(0.0, 0.0), Point2d::new(100.0, 0.0));
        assert_approx_eq!(segment.position_at(-10.0).x, 0.0);
        assert_approx_eq!(segment.position_at(250.0).x, 100.0);
    }

    #[test]
    fn quadratic_length_of_collinear_controls() {
        // Collinear control points collapse the bezier to a straight line.
        let segment = Segment::quadratic(
            Point2d::new(0.0, 0.0),
            Point2d::new(50.0, 0.0),
            Point2d::new(100.0, 0.0),
        );
        assert_approx_eq!(segment.length(), 100.0);
    }

    #[test]
    fn cubic_length_of_collinear_controls() {
        let segment = Segment::cubic(
            Point2d::new(0.0, 0.0),
            Point2d::new(100.0 / 3.0, 0.0),
            Point2d::new(200.0 / 3.0, 0.0),
            Point2d::new(100.0, 0.0),
        );
        assert_approx_eq!(segment.length(), 100.0);
    }

    #[test]
    fn curve_length_exceeds_chord() {
        let segment = Segment::quadratic(
            Point2d::new(0.0, 0.0),
            Point2d::new(100.0, 0.0),
            Point2d::new(100.0, 100.0),
        );
        let chord = (100.0f64 * 100.0 + 100.0 * 100.0).sqrt();
        assert!(segment.length() > chord);
    }

    #[test]
    fn curve_endpoints_are_exact() {
        let segment = Segment::quadratic(
            Point2d::new(0.0, 0.0),
            Point2d::new(100.0, 0.0),
            Point2d::new(100.0, 100.0),
        );
        let start = segment.position_at(0.0);
        let end = segment.position_at(segment.length());
        assert_approx_eq!(start.x, 0.0);
        assert_approx_eq!(start.y, 0.0);
        assert_approx_eq!(end.x, 100.0);
        assert_approx_eq!(end.y, 100.0);
    }

    #[test]
    fn curve_heading_follows_tangent() {
        let segment = Segment::quadratic(
            Point2d::new(0.0, 0.0),
            Point2d::new(100.0, 0.0),
            Point2d::new(100.0, 100.0),
        );
        // Starts heading along +x, ends heading along +y.
        assert_approx_eq!(segment.heading_at(0.0), 0.0, 1e-6);
        assert_approx_eq!(
            segment.heading_at(segment.length()),
            std::f64::consts::FRAC_PI_2,
            1e-6
        );
    }
}
