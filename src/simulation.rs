use crate::generator::VehicleGenerator;
use crate::math::Point2d;
use crate::obstacle::Obstacle;
use crate::segment::Segment;
use crate::signal::{SignalAttributes, TrafficSignal};
use crate::vehicle::{Vehicle, VehicleAttributes};
use crate::{SimulationError, VehicleId, VehicleSet};
use rand_distr::Distribution;
use std::collections::BTreeMap;

/// The default step size in s (60 ticks per simulated second).
const DEFAULT_TIME_STEP: f64 = 1.0 / 60.0;

/// A road traffic simulation.
///
/// Owns every segment, vehicle, signal and generator, and advances them
/// with a fixed time step. All tick-time mutation happens inside
/// [step](Self::step) in a fixed order: signals first, then vehicles front
/// to back per segment, then boundary crossings, then generators. That
/// ordering is a correctness requirement, not an implementation detail:
/// every vehicle must see the phantom state of the tick it is updated in,
/// and every follower must see its leader's already-updated state.
pub struct Simulation {
    /// The segments in the network. Indices are stable identities.
    segments: Vec<Segment>,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The traffic signals, keyed by the segment index they guard.
    signals: BTreeMap<usize, TrafficSignal>,
    /// The vehicle generators.
    generators: Vec<VehicleGenerator>,
    /// Elapsed simulated time in s.
    time: f64,
    /// The number of completed steps.
    frame: usize,
    /// The fixed step size in s.
    dt: f64,
}

impl Simulation {
    /// Creates a new, empty simulation.
    pub fn new() -> Self {
        Self {
            segments: vec![],
            vehicles: VehicleSet::default(),
            signals: BTreeMap::new(),
            generators: vec![],
            time: 0.0,
            frame: 0,
            dt: DEFAULT_TIME_STEP,
        }
    }

    /// Adds a segment to the network and returns its index.
    pub fn add_segment(&mut self, segment: Segment) -> usize {
        self.segments.push(segment);
        self.segments.len() - 1
    }

    /// Adds a vehicle to the simulation on the given path of segment
    /// indices. The vehicle enters the back of its first segment's queue,
    /// so callers adding several vehicles to one segment must add them
    /// front-most first.
    pub fn add_vehicle(
        &mut self,
        attributes: &VehicleAttributes,
        path: &[usize],
    ) -> Result<VehicleId, SimulationError> {
        if attributes.max_dec <= 0.0 {
            return Err(SimulationError::InvalidDeceleration {
                max_dec: attributes.max_dec,
            });
        }
        if path.is_empty() {
            return Err(SimulationError::EmptyPath);
        }
        if let Some(&index) = path.iter().find(|&&index| index >= self.segments.len()) {
            return Err(SimulationError::InvalidPath {
                index,
                len: self.segments.len(),
            });
        }

        let id = self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, attributes, path));
        self.segments[path[0]].push_vehicle(id);
        log::debug!("vehicle {:?} entered segment {}", id, path[0]);
        Ok(id)
    }

    /// Adds a traffic signal guarding the given segment, replacing any
    /// signal already guarding it. Fails without mutating anything if the
    /// segment index does not exist.
    pub fn add_signal(
        &mut self,
        segment: usize,
        attributes: &SignalAttributes,
    ) -> Result<(), SimulationError> {
        if segment >= self.segments.len() {
            return Err(SimulationError::SegmentOutOfRange {
                index: segment,
                len: self.segments.len(),
            });
        }
        if self
            .signals
            .insert(segment, TrafficSignal::new(segment, attributes))
            .is_some()
        {
            log::debug!("replaced the signal on segment {segment}");
        }
        Ok(())
    }

    /// Adds a vehicle generator.
    pub fn add_generator(&mut self, generator: VehicleGenerator) {
        self.generators.push(generator);
    }

    /// Sets the fixed step size in s.
    pub fn set_time_step(&mut self, dt: f64) {
        self.dt = dt;
    }

    /// Randomly scales each vehicle's desired velocity by a factor sampled
    /// from a normal distribution with a mean of 1 (no adjustment) and
    /// standard deviation `stddev`, clamped to [0.75, 1.25].
    pub fn randomize_desired_speeds(&mut self, stddev: f64) {
        let Ok(distr) = rand_distr::Normal::new(1.0, stddev) else {
            log::warn!("invalid desired speed standard deviation {stddev}");
            return;
        };
        let mut rng = rand::thread_rng();
        for (_, vehicle) in &mut self.vehicles {
            let factor = distr.sample(&mut rng).clamp(0.75, 1.25);
            vehicle.scale_desired_speed(factor);
        }
    }

    /// Advances the simulation by one time step.
    pub fn step(&mut self) {
        self.update_signals();
        self.update_vehicles();
        self.advance_boundaries();
        self.run_generators();
        self.time += self.dt;
        self.frame += 1;
    }

    /// Advances the simulation by the given number of steps.
    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// The elapsed simulated time in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The number of completed steps.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The fixed step size in s.
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Returns an iterator over all the segments in the simulation.
    pub fn iter_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Returns an iterator over all the traffic signals in the simulation.
    pub fn iter_signals(&self) -> impl Iterator<Item = &TrafficSignal> {
        self.signals.values()
    }

    /// Gets a reference to the segment with the given index.
    pub fn get_segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    /// Gets a reference to the signal guarding the given segment.
    pub fn get_signal(&self, segment: usize) -> Option<&TrafficSignal> {
        self.signals.get(&segment)
    }

    /// Samples the world-space position and heading of a vehicle from its
    /// segment's geometry. Intended for presentation layers; reading poses
    /// has no effect on the simulation.
    pub fn vehicle_pose(&self, id: VehicleId) -> Option<(Point2d, f64)> {
        let vehicle = self.vehicles.get(id)?;
        let segment = self.segments.get(vehicle.current_segment()?)?;
        Some((
            segment.position_at(vehicle.pos()),
            segment.heading_at(vehicle.pos()),
        ))
    }

    /// Advances every signal's clock, phase and phantom.
    fn update_signals(&mut self) {
        for signal in self.signals.values_mut() {
            signal.update(&self.segments, &self.vehicles, self.dt);
        }
    }

    /// Updates every vehicle, walking each segment's queue front to back.
    /// The front vehicle follows the guarding signal's phantom if there is
    /// one; every other vehicle follows its immediate predecessor.
    fn update_vehicles(&mut self) {
        for (index, segment) in self.segments.iter().enumerate() {
            let mut leader: Option<Obstacle> = self
                .signals
                .get(&index)
                .and_then(|signal| signal.phantom_obstacle());
            for id in segment.vehicle_ids() {
                let vehicle = &mut self.vehicles[id];
                vehicle.update(leader, self.dt);
                leader = Some(vehicle.obstacle());
            }
        }
    }

    /// Moves each segment's front vehicle across the boundary once it has
    /// reached the end of the segment: onto the next segment of its path,
    /// or out of the simulation entirely. Only the front vehicle of a
    /// segment can cross per tick, so callers must choose a time step small
    /// enough that a vehicle cannot clear a whole segment in one tick.
    fn advance_boundaries(&mut self) {
        let mut advanced = vec![];
        let mut exited = vec![];

        for segment in &mut self.segments {
            let Some(id) = segment.front_vehicle() else {
                continue;
            };
            let vehicle = &mut self.vehicles[id];
            if vehicle.pos() < segment.length() {
                continue;
            }
            segment.pop_front_vehicle();
            match vehicle.advance_path() {
                Some(next) => advanced.push((id, next)),
                None => exited.push(id),
            }
        }

        for (id, index) in advanced {
            self.segments[index].push_vehicle(id);
        }
        for id in exited {
            self.vehicles.remove(id);
            log::debug!("vehicle {id:?} exited the simulation");
        }
    }

    /// Runs every vehicle generator.
    fn run_generators(&mut self) {
        if self.generators.is_empty() {
            return;
        }
        let mut generators = std::mem::take(&mut self.generators);
        for generator in &mut generators {
            generator.update(self);
        }
        self.generators = generators;
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
