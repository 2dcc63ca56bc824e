//! The car-following model.
//!
//! Accelerations follow the intelligent driver model: a free-road term that
//! drives the velocity towards the desired velocity, and an interaction
//! term that opens a dynamic safety gap to the leader. The leader may be a
//! real vehicle or a signal's phantom; the model cannot tell the difference.

use super::Vehicle;
use crate::obstacle::Obstacle;

impl Vehicle {
    /// Computes the vehicle's acceleration towards the given leader.
    pub(crate) fn acceleration(&self, leader: Option<Obstacle>) -> f64 {
        let free = self.max_acc * (1.0 - (self.vel / self.max_vel).powi(4));
        let Some(leader) = leader else {
            return free;
        };

        let gap = leader.pos - leader.len - self.pos;
        if gap <= 0.0 {
            // The gap has fully closed; brake as hard as the vehicle can
            // rather than computing an acceleration that would reverse it
            // through the leader.
            return -self.max_dec;
        }

        let approach = self.vel - leader.vel;
        let desired_gap = self.min_gap
            + self.vel * self.headway
            + self.vel * approach / (2.0 * (self.max_acc * self.max_dec).sqrt());
        free - self.max_acc * (desired_gap / gap).powi(2)
    }
}

/// Distance needed to brake from `vel` to a standstill at `max_dec`.
///
/// A non-positive `max_dec` means the entity cannot brake at all and
/// contributes no braking distance; only the phantom vehicle is configured
/// that way, real vehicles are rejected at creation.
pub(crate) fn braking_distance(vel: f64, max_dec: f64) -> f64 {
    if max_dec > 0.0 {
        vel * vel / (2.0 * max_dec)
    } else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vehicle::VehicleAttributes;
    use crate::VehicleId;
    use assert_approx_eq::assert_approx_eq;

    fn vehicle(vel: f64) -> Vehicle {
        Vehicle::new(
            VehicleId::default(),
            &VehicleAttributes {
                vel,
                ..Default::default()
            },
            &[0],
        )
    }

    #[test]
    fn free_road_accelerates_at_maximum_from_rest() {
        assert_approx_eq!(vehicle(0.0).acceleration(None), 1.44);
    }

    #[test]
    fn free_road_term_vanishes_at_desired_velocity() {
        assert_approx_eq!(vehicle(16.6).acceleration(None), 0.0);
    }

    #[test]
    fn free_road_acceleration_is_positive_below_desired_velocity() {
        for vel in [1.0, 5.0, 10.0, 16.0, 16.59] {
            assert!(vehicle(vel).acceleration(None) > 0.0);
        }
    }

    #[test]
    fn closed_gap_forces_maximum_braking() {
        let leader = Obstacle {
            pos: 10.0,
            len: 4.0,
            vel: 0.0,
        };
        let follower = Vehicle::new(
            VehicleId::default(),
            &VehicleAttributes {
                pos: 6.0,
                vel: 5.0,
                ..Default::default()
            },
            &[0],
        );
        assert_approx_eq!(follower.acceleration(Some(leader)), -4.61);
    }

    #[test]
    fn stationary_leader_brakes_harder_than_moving_leader() {
        let own = vehicle(15.0);
        let stopped = Obstacle {
            pos: 60.0,
            len: 4.0,
            vel: 0.0,
        };
        let rolling = Obstacle {
            pos: 60.0,
            len: 4.0,
            vel: 15.0,
        };
        assert!(own.acceleration(Some(stopped)) < own.acceleration(Some(rolling)));
    }

    #[test]
    fn far_leader_barely_disturbs_free_flow() {
        let own = vehicle(10.0);
        let leader = Obstacle {
            pos: 10_000.0,
            len: 4.0,
            vel: 0.0,
        };
        let free = own.acceleration(None);
        let followed = own.acceleration(Some(leader));
        assert!(followed <= free);
        assert_approx_eq!(followed, free, 1e-3);
    }

    #[test]
    fn braking_distance_from_velocity() {
        assert_approx_eq!(braking_distance(10.0, 5.0), 10.0);
        assert_approx_eq!(braking_distance(0.0, 5.0), 0.0);
    }

    #[test]
    fn braking_distance_without_brakes_is_zero() {
        assert_approx_eq!(braking_distance(10.0, 0.0), 0.0);
    }
}
