pub use cgmath;
pub use error::SimulationError;
pub use generator::{VehicleGenerator, VehicleTemplate};
pub use obstacle::Obstacle;
pub use segment::Segment;
pub use signal::{SignalAttributes, SignalState, TrafficSignal};
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use vehicle::{Vehicle, VehicleAttributes};

mod error;
mod generator;
pub mod math;
mod obstacle;
mod segment;
mod signal;
mod simulation;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
