use crate::simulation::Simulation;
use crate::vehicle::VehicleAttributes;
use rand::distributions::{Distribution, WeightedIndex};

/// A weighted vehicle template for a [VehicleGenerator].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleTemplate {
    /// Relative weight of this template among the generator's choices.
    pub weight: u32,
    /// Attributes of spawned vehicles. The initial position is ignored;
    /// generated vehicles always enter at the start of their first segment.
    pub attributes: VehicleAttributes,
    /// The path assigned to spawned vehicles.
    pub path: Vec<usize>,
}

/// Periodically injects vehicles at the start of their configured paths.
///
/// At most one vehicle spawns per elapsed `60 / rate` seconds, and only
/// when the entry of the target segment is clear, so the generator can
/// never violate the queue ordering invariant.
pub struct VehicleGenerator {
    /// Spawn rate in vehicles per minute.
    rate: f64,
    templates: Vec<VehicleTemplate>,
    /// Weighted chooser over `templates`; `None` when the weights are unusable.
    chooser: Option<WeightedIndex<u32>>,
    /// Simulation time of the last successful spawn.
    last_spawn: f64,
}

impl VehicleGenerator {
    /// Creates a generator spawning `rate` vehicles per minute, choosing
    /// among the given templates by weight.
    pub fn new(rate: f64, templates: Vec<VehicleTemplate>) -> Self {
        let chooser = WeightedIndex::new(templates.iter().map(|t| t.weight)).ok();
        if chooser.is_none() {
            log::warn!("vehicle generator has no usable templates and will never spawn");
        }
        Self {
            rate,
            templates,
            chooser,
            last_spawn: 0.0,
        }
    }

    /// Attempts one spawn if the configured interval has elapsed and the
    /// entry of the target segment is clear.
    pub(crate) fn update(&mut self, sim: &mut Simulation) {
        let Some(chooser) = &self.chooser else { return };
        if self.rate <= 0.0 || sim.time() - self.last_spawn < 60.0 / self.rate {
            return;
        }

        let template = &self.templates[chooser.sample(&mut rand::thread_rng())];
        if !entry_clear(sim, template) {
            return;
        }

        let attributes = VehicleAttributes {
            pos: 0.0,
            ..template.attributes
        };
        match sim.add_vehicle(&attributes, &template.path) {
            Ok(_) => self.last_spawn = sim.time(),
            Err(err) => {
                // Consume the spawn slot anyway so a misconfigured template
                // warns once per interval instead of every tick.
                self.last_spawn = sim.time();
                log::warn!("vehicle generator skipped a spawn: {err}");
            }
        }
    }
}

/// Whether the entry of the template's first segment has room for a new
/// vehicle: the most recently entered vehicle must have moved at least a
/// standstill gap plus a vehicle length downstream.
fn entry_clear(sim: &Simulation, template: &VehicleTemplate) -> bool {
    // Missing or empty paths pass through; vehicle creation rejects them
    // with a proper error.
    let Some(segment) = template.path.first().and_then(|&idx| sim.get_segment(idx)) else {
        return true;
    };
    match segment.back_vehicle().and_then(|id| sim.get_vehicle(id)) {
        Some(back) => back.pos() > template.attributes.min_gap + template.attributes.len,
        None => true,
    }
}
