use roadsim::math::Point2d;
use roadsim::{
    Segment, SignalAttributes, SignalState, Simulation, VehicleAttributes, VehicleGenerator,
    VehicleTemplate,
};

fn main() {
    env_logger::init();

    let mut sim = Simulation::new();

    // A short network: a signalled approach, a corner and an exit road.
    let approach = sim.add_segment(Segment::straight(
        Point2d::new(0.0, 0.0),
        Point2d::new(250.0, 0.0),
    ));
    let corner = sim.add_segment(Segment::quadratic(
        Point2d::new(250.0, 0.0),
        Point2d::new(300.0, 0.0),
        Point2d::new(300.0, 50.0),
    ));
    let exit = sim.add_segment(Segment::straight(
        Point2d::new(300.0, 50.0),
        Point2d::new(300.0, 300.0),
    ));

    sim.add_signal(approach, &SignalAttributes::default())
        .expect("the approach segment exists");
    sim.add_generator(VehicleGenerator::new(
        30.0,
        vec![VehicleTemplate {
            weight: 1,
            attributes: VehicleAttributes::default(),
            path: vec![approach, corner, exit],
        }],
    ));

    for _ in 0..10 {
        sim.run(600);
        let state = match sim.get_signal(approach).map(|s| s.state()) {
            Some(SignalState::Green) => "green",
            Some(SignalState::Yellow) => "yellow",
            Some(SignalState::Red) => "red",
            None => "-",
        };
        println!(
            "t = {:5.1} s  frame = {:5}  signal = {:6}  vehicles = {}",
            sim.time(),
            sim.frame(),
            state,
            sim.iter_vehicles().count(),
        );
    }
}
