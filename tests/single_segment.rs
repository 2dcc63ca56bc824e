//! Tests that involve the simulation of vehicles on plain segments.

use roadsim::math::Point2d;
use roadsim::{Segment, Simulation, SimulationError, VehicleAttributes};

fn straight(length: f64) -> Segment {
    Segment::straight(Point2d::new(0.0, 0.0), Point2d::new(length, 0.0))
}

/// Test that a vehicle's position increases monotonically.
#[test]
fn vehicle_drives_forward() {
    let mut sim = Simulation::new();
    let segment = sim.add_segment(straight(500.0));
    let id = sim
        .add_vehicle(&VehicleAttributes::default(), &[segment])
        .unwrap();

    let mut pos = sim.get_vehicle(id).unwrap().pos();
    for _ in 0..600 {
        sim.step();
        let next_pos = sim.get_vehicle(id).unwrap().pos();
        assert!(next_pos > pos);
        pos = next_pos;
    }
}

/// A lone vehicle accelerates while below its desired velocity and never
/// exceeds it.
#[test]
fn free_road_acceleration() {
    let mut sim = Simulation::new();
    let segment = sim.add_segment(straight(5000.0));
    let attributes = VehicleAttributes::default();
    let id = sim.add_vehicle(&attributes, &[segment]).unwrap();

    for _ in 0..3600 {
        sim.step();
        let vehicle = sim.get_vehicle(id).unwrap();
        assert!(vehicle.vel() <= attributes.max_vel);
        if vehicle.vel() < attributes.max_vel {
            assert!(vehicle.acc() > 0.0);
        }
    }

    // A minute is plenty of time to reach the desired velocity.
    let vehicle = sim.get_vehicle(id).unwrap();
    assert!(vehicle.vel() > 0.99 * attributes.max_vel);
}

/// Queue positions are non-increasing from front to back at every tick.
#[test]
fn queue_order_is_monotone() {
    let mut sim = Simulation::new();
    let segment = sim.add_segment(straight(2000.0));
    // Front-most first, as the queue contract requires.
    for pos in [50.0, 30.0, 10.0] {
        sim.add_vehicle(
            &VehicleAttributes {
                pos,
                vel: 15.0,
                ..Default::default()
            },
            &[segment],
        )
        .unwrap();
    }

    for _ in 0..600 {
        sim.step();
        let positions: Vec<f64> = sim
            .get_segment(segment)
            .unwrap()
            .vehicle_ids()
            .map(|id| sim.get_vehicle(id).unwrap().pos())
            .collect();
        for pair in positions.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }
}

/// A vehicle that reaches the end of a segment continues on the next
/// segment of its path with its position reset to the segment start.
#[test]
fn vehicle_crosses_segment_boundary() {
    let mut sim = Simulation::new();
    let first = sim.add_segment(straight(50.0));
    let second = sim.add_segment(Segment::straight(
        Point2d::new(50.0, 0.0),
        Point2d::new(100.0, 0.0),
    ));
    let id = sim
        .add_vehicle(
            &VehicleAttributes {
                pos: 45.0,
                vel: 10.0,
                ..Default::default()
            },
            &[first, second],
        )
        .unwrap();

    // Half a second covers the remaining five metres.
    sim.run(60);

    let vehicle = sim.get_vehicle(id).unwrap();
    assert_eq!(vehicle.current_segment(), Some(second));
    assert!(vehicle.pos() < 45.0);
    assert_eq!(sim.get_segment(first).unwrap().vehicle_count(), 0);
    assert_eq!(sim.get_segment(second).unwrap().front_vehicle(), Some(id));
}

/// A vehicle that exhausts its path leaves the simulation entirely.
#[test]
fn vehicle_exits_at_end_of_path() {
    let mut sim = Simulation::new();
    let first = sim.add_segment(straight(50.0));
    let second = sim.add_segment(Segment::straight(
        Point2d::new(50.0, 0.0),
        Point2d::new(100.0, 0.0),
    ));
    let id = sim
        .add_vehicle(
            &VehicleAttributes {
                vel: 10.0,
                ..Default::default()
            },
            &[first, second],
        )
        .unwrap();

    // 100 m at up to 16.6 m/s is comfortably done within 20 s.
    sim.run(1200);

    assert!(sim.get_vehicle(id).is_none());
    assert_eq!(sim.iter_vehicles().count(), 0);
    assert_eq!(sim.get_segment(first).unwrap().vehicle_count(), 0);
    assert_eq!(sim.get_segment(second).unwrap().vehicle_count(), 0);
}

/// World-space poses are sampled from the segment geometry.
#[test]
fn vehicle_pose_follows_geometry() {
    let mut sim = Simulation::new();
    let segment = sim.add_segment(Segment::straight(
        Point2d::new(0.0, 0.0),
        Point2d::new(0.0, 100.0),
    ));
    let id = sim
        .add_vehicle(
            &VehicleAttributes {
                pos: 25.0,
                ..Default::default()
            },
            &[segment],
        )
        .unwrap();

    let (position, heading) = sim.vehicle_pose(id).unwrap();
    assert!((position.x - 0.0).abs() < 1e-9);
    assert!((position.y - 25.0).abs() < 1e-9);
    assert!((heading - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn vehicle_with_unknown_segment_is_rejected() {
    let mut sim = Simulation::new();
    sim.add_segment(straight(100.0));

    let result = sim.add_vehicle(&VehicleAttributes::default(), &[0, 5]);
    assert_eq!(
        result,
        Err(SimulationError::InvalidPath { index: 5, len: 1 })
    );
    assert_eq!(sim.iter_vehicles().count(), 0);
    assert_eq!(sim.get_segment(0).unwrap().vehicle_count(), 0);
}

#[test]
fn vehicle_with_empty_path_is_rejected() {
    let mut sim = Simulation::new();
    let result = sim.add_vehicle(&VehicleAttributes::default(), &[]);
    assert_eq!(result, Err(SimulationError::EmptyPath));
}

#[test]
fn vehicle_without_brakes_is_rejected() {
    let mut sim = Simulation::new();
    sim.add_segment(straight(100.0));

    let attributes = VehicleAttributes {
        max_dec: 0.0,
        ..Default::default()
    };
    let result = sim.add_vehicle(&attributes, &[0]);
    assert_eq!(
        result,
        Err(SimulationError::InvalidDeceleration { max_dec: 0.0 })
    );
    assert_eq!(sim.iter_vehicles().count(), 0);
}
