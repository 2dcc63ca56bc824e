use crate::segment::Segment;
use crate::vehicle::{braking_distance, Vehicle};
use crate::{Obstacle, VehicleSet};

/// Velocity below which a blocked vehicle counts as stopped, in m/s.
const STOPPED_THRESHOLD: f64 = 0.05;

/// The phase of a traffic signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

/// The configuration of a traffic signal.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalAttributes {
    /// Duration of the green phase in s.
    pub green: f64,
    /// Duration of the yellow phase in s.
    pub yellow: f64,
    /// Duration of the red phase in s.
    pub red: f64,
    /// Arc-length offset of the stop line on the guarded segment.
    /// `None` resolves to the end of the segment on the first update.
    pub stop_position: Option<f64>,
}

impl Default for SignalAttributes {
    fn default() -> Self {
        Self {
            green: 10.0,
            yellow: 3.0,
            red: 10.0,
            stop_position: None,
        }
    }
}

/// A traffic signal guarding a single segment.
///
/// The signal never touches vehicle state directly. When it needs traffic
/// to stop it plants a phantom vehicle at the stop line; the ordinary
/// car-following model then brakes the approaching vehicles. During yellow
/// the phantom only appears once some vehicle can no longer brake to a halt
/// before the line, and a hold latch keeps it in place until every vehicle
/// behind the line has actually stopped, so the phantom cannot flicker
/// on and off around the braking-distance boundary.
#[derive(Clone)]
pub struct TrafficSignal {
    /// Index of the guarded segment.
    segment: usize,
    green: f64,
    yellow: f64,
    red: f64,
    /// The stop line, resolved on the first update and fixed afterwards.
    stop_position: Option<f64>,
    /// Clock into the current cycle; wraps at the cycle duration.
    cycle_time: f64,
    state: SignalState,
    phantom: Option<Vehicle>,
    /// Latched during yellow while triggered vehicles are still moving.
    yellow_hold: bool,
}

impl TrafficSignal {
    pub(crate) fn new(segment: usize, attributes: &SignalAttributes) -> Self {
        Self {
            segment,
            green: attributes.green,
            yellow: attributes.yellow,
            red: attributes.red,
            stop_position: attributes.stop_position,
            cycle_time: 0.0,
            state: SignalState::Green,
            phantom: None,
            yellow_hold: false,
        }
    }

    /// The index of the segment the signal guards.
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// The current phase.
    pub fn state(&self) -> SignalState {
        self.state
    }

    /// Total duration of one green, yellow, red cycle in s.
    pub fn cycle_duration(&self) -> f64 {
        self.green + self.yellow + self.red
    }

    /// The stop line position in m, once resolved.
    pub fn stop_position(&self) -> Option<f64> {
        self.stop_position
    }

    /// The phantom vehicle at the stop line, while the signal blocks traffic.
    pub fn phantom(&self) -> Option<&Vehicle> {
        self.phantom.as_ref()
    }

    pub(crate) fn phantom_obstacle(&self) -> Option<Obstacle> {
        self.phantom.as_ref().map(Vehicle::obstacle)
    }

    /// Advances the cycle clock and recomputes the phantom. Runs before any
    /// vehicle updates so followers always see this tick's phantom state.
    pub(crate) fn update(&mut self, segments: &[Segment], vehicles: &VehicleSet, dt: f64) {
        let segment = &segments[self.segment];
        let stop = *self.stop_position.get_or_insert_with(|| segment.length());

        self.cycle_time += dt;
        if self.cycle_time >= self.cycle_duration() {
            self.cycle_time -= self.cycle_duration();
        }
        self.state = if self.cycle_time < self.green {
            SignalState::Green
        } else if self.cycle_time < self.green + self.yellow {
            SignalState::Yellow
        } else {
            SignalState::Red
        };

        self.update_phantom(stop, segment, vehicles);
    }

    fn update_phantom(&mut self, stop: f64, segment: &Segment, vehicles: &VehicleSet) {
        match self.state {
            SignalState::Green => {
                self.phantom = None;
                self.yellow_hold = false;
            }
            SignalState::Red => {
                self.phantom = Some(Vehicle::phantom(stop));
                self.yellow_hold = false;
            }
            SignalState::Yellow => {
                if self.yellow_hold {
                    if Self::all_blocked_stopped(stop, segment, vehicles) {
                        self.yellow_hold = false;
                        self.phantom = None;
                    } else {
                        self.phantom = Some(Vehicle::phantom(stop));
                    }
                } else if Self::any_vehicle_must_stop(stop, segment, vehicles) {
                    self.yellow_hold = true;
                    self.phantom = Some(Vehicle::phantom(stop));
                } else {
                    self.phantom = None;
                }
            }
        }
    }

    /// Whether some vehicle still behind the stop line can no longer brake
    /// to a halt before reaching it. Vehicles past the line are not the
    /// signal's concern.
    fn any_vehicle_must_stop(stop: f64, segment: &Segment, vehicles: &VehicleSet) -> bool {
        segment
            .vehicle_ids()
            .map(|id| &vehicles[id])
            .filter(|vehicle| vehicle.pos() < stop)
            .any(|vehicle| braking_distance(vehicle.vel(), vehicle.max_dec()) > stop - vehicle.pos())
    }

    /// Whether every vehicle still behind the stop line has come to a stop.
    fn all_blocked_stopped(stop: f64, segment: &Segment, vehicles: &VehicleSet) -> bool {
        segment
            .vehicle_ids()
            .map(|id| &vehicles[id])
            .filter(|vehicle| vehicle.pos() < stop)
            .all(|vehicle| vehicle.vel() <= STOPPED_THRESHOLD)
    }
}
