//! Headless delivery run: draws a few roads through the input API, runs the
//! simulation, and prints the route, the score and a restored-snapshot check.
//!
//! Run with: `cargo run -p courier-core --example headless_delivery`

use courier_core::geometry::Point;
use courier_core::input::InputEvent;
use courier_core::sim::Simulation;

const TICKS: u64 = 1_000;

fn main() {
    let mut sim = Simulation::default();
    let origin = sim.config().origin;
    let destination = sim.config().destination;

    // --- Step 1: draw roads the way a player would ---

    // A bend through the middle of the board, plus a dead-end spur.
    let bend = Point::new(300.0, 80.0);
    let strokes = [
        (origin, bend),
        (Point::new(302.0, 83.0), destination),
        (bend, Point::new(300.0, 250.0)),
        // Too short to count as a road.
        (Point::new(400.0, 200.0), Point::new(402.0, 201.0)),
    ];
    for (from, to) in strokes {
        sim.handle_input(InputEvent::PointerDown(from));
        sim.handle_input(InputEvent::PointerMove(to));
        match sim.handle_input(InputEvent::PointerUp(to)) {
            Some(id) => println!("road {} drawn", id.0),
            None => println!("stroke too short, ignored"),
        }
    }

    // --- Step 2: run ---

    let first = sim.advance();
    println!(
        "graph: {} nodes, {} edges, route: {}",
        first.node_count,
        first.edge_count,
        if first.has_path { "yes" } else { "no" }
    );
    for p in sim.frame().path {
        println!("  waypoint ({:.0}, {:.0})", p.x, p.y);
    }

    let deliveries = sim.advance_by(TICKS - 1);
    println!("{deliveries} deliveries in {TICKS} ticks (score {})", sim.score());

    // --- Step 3: snapshot, restore, and check both copies stay in step ---

    let bytes = sim.serialize().expect("snapshot encodes");
    let mut restored = Simulation::deserialize(&bytes).expect("snapshot decodes");
    sim.advance_by(100);
    restored.advance_by(100);
    assert_eq!(sim.score(), restored.score());
    assert_eq!(sim.vehicle_position(), restored.vehicle_position());
    println!(
        "snapshot: {} bytes, restored copy matches after 100 more ticks",
        bytes.len()
    );
}
