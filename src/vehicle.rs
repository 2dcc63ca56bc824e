use crate::obstacle::Obstacle;
use crate::VehicleId;
use smallvec::SmallVec;

pub(crate) use kinematics::braking_distance;

mod kinematics;

/// A simulated vehicle.
///
/// Position is measured as arc length along the segment the vehicle is
/// currently on; the segment is `path[path_idx]`. The position is allowed
/// to exceed the segment length until the stepper processes the boundary
/// crossing at the end of the tick.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID.
    pub(crate) id: VehicleId,
    /// Ordered segment indices the vehicle will traverse.
    path: SmallVec<[usize; 8]>,
    /// Index into `path` of the segment currently occupied.
    path_idx: usize,
    /// Longitudinal position along the current segment in m.
    pos: f64,
    /// Velocity in m/s.
    vel: f64,
    /// Acceleration computed on the last update in m/s^2.
    acc: f64,
    /// Vehicle length in m.
    len: f64,
    /// Minimum standstill gap to the leader in m.
    min_gap: f64,
    /// Desired time headway in s.
    headway: f64,
    /// Desired velocity in m/s.
    max_vel: f64,
    /// Maximum acceleration in m/s^2.
    max_acc: f64,
    /// Maximum braking deceleration in m/s^2, as a positive number.
    max_dec: f64,
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleAttributes {
    /// Initial position along the first path segment in m.
    pub pos: f64,
    /// Initial velocity in m/s.
    pub vel: f64,
    /// Vehicle length in m.
    pub len: f64,
    /// Minimum standstill gap to the leader in m.
    pub min_gap: f64,
    /// Desired time headway in s.
    pub headway: f64,
    /// Desired velocity in m/s.
    pub max_vel: f64,
    /// Maximum acceleration in m/s^2.
    pub max_acc: f64,
    /// Maximum braking deceleration in m/s^2, as a positive number.
    pub max_dec: f64,
}

impl Default for VehicleAttributes {
    fn default() -> Self {
        Self {
            pos: 0.0,
            vel: 0.0,
            len: 4.0,
            min_gap: 4.0,
            headway: 1.0,
            max_vel: 16.6,
            max_acc: 1.44,
            max_dec: 4.61,
        }
    }
}

impl Vehicle {
    /// Creates a new vehicle on the given path.
    pub(crate) fn new(id: VehicleId, attributes: &VehicleAttributes, path: &[usize]) -> Self {
        Self {
            id,
            path: SmallVec::from_slice(path),
            path_idx: 0,
            pos: attributes.pos,
            vel: attributes.vel,
            acc: 0.0,
            len: attributes.len,
            min_gap: attributes.min_gap,
            headway: attributes.headway,
            max_vel: attributes.max_vel,
            max_acc: attributes.max_acc,
            max_dec: attributes.max_dec,
        }
    }

    /// Creates the degenerate stationary vehicle a signal plants at its stop
    /// line. It has no extent, no gap requirement, no speed and no path; it
    /// exists only to be somebody's leader and is never itself updated.
    pub(crate) fn phantom(pos: f64) -> Self {
        Self {
            id: VehicleId::default(),
            path: SmallVec::new(),
            path_idx: 0,
            pos,
            vel: 0.0,
            acc: 0.0,
            len: 0.0,
            min_gap: 0.0,
            headway: 0.0,
            max_vel: 0.0,
            max_acc: 0.0,
            max_dec: 0.0,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The longitudinal position along the current segment in m.
    pub fn pos(&self) -> f64 {
        self.pos
    }

    /// The vehicle's velocity in m/s.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    /// The acceleration computed on the last update in m/s^2.
    pub fn acc(&self) -> f64 {
        self.acc
    }

    /// The vehicle's length in m.
    pub fn length(&self) -> f64 {
        self.len
    }

    /// The minimum standstill gap in m.
    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    /// The desired velocity in m/s.
    pub fn max_vel(&self) -> f64 {
        self.max_vel
    }

    /// The maximum braking deceleration in m/s^2.
    pub fn max_dec(&self) -> f64 {
        self.max_dec
    }

    /// The ordered segment indices the vehicle traverses.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// The index of the segment the vehicle is currently on, or `None` for
    /// the pathless phantom.
    pub fn current_segment(&self) -> Option<usize> {
        self.path.get(self.path_idx).copied()
    }

    /// The vehicle as seen by a follower.
    pub fn obstacle(&self) -> Obstacle {
        Obstacle {
            pos: self.pos,
            len: self.len,
            vel: self.vel,
        }
    }

    /// Advances the vehicle by one time step, following the given leader.
    ///
    /// The velocity is integrated before the position so the position
    /// update already sees the new velocity; the coupled acceleration
    /// feedback stays stable that way even with zero-gap convoys.
    pub(crate) fn update(&mut self, leader: Option<Obstacle>, dt: f64) {
        self.acc = self.acceleration(leader);
        self.vel = (self.vel + self.acc * dt).min(self.max_vel).max(0.0);
        self.pos += self.vel * dt;
    }

    /// Moves the vehicle onto the next segment of its path, resetting its
    /// position to the segment start. Returns the new segment index, or
    /// `None` when the path is exhausted.
    pub(crate) fn advance_path(&mut self) -> Option<usize> {
        self.pos = 0.0;
        if self.path_idx + 1 < self.path.len() {
            self.path_idx += 1;
            Some(self.path[self.path_idx])
        } else {
            None
        }
    }

    /// Scales the vehicle's desired velocity by the given factor.
    pub(crate) fn scale_desired_speed(&mut self, factor: f64) {
        self.max_vel *= factor;
    }

    #[cfg(test)]
    pub(crate) fn set_vel(&mut self, vel: f64) {
        self.vel = vel;
    }
}
