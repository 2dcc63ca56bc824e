/// Snapshot of something a vehicle may need to follow: the vehicle ahead
/// of it on the same segment, or a signal's phantom at a stop line.
///
/// The car-following model only ever sees this view, so it cannot tell a
/// real leader from a synthetic one.
#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    /// The longitudinal position along the segment in m.
    pub pos: f64,
    /// The obstacle's length in m. Zero for stop lines.
    pub len: f64,
    /// The obstacle's velocity in m/s.
    pub vel: f64,
}
