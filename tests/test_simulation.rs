use eframe::egui::{Vec2, vec2};
use force_plot::data::bubbles::{GROUP_COUNT, bubble_simulation};
use force_plot::sim::{
    DragCommand, EdgeSpec, Forces, LinkForce, ManyBody, NodeId, NodeSpec, Simulation,
    SimulationConfig,
};

fn run_until_cool(simulation: &mut Simulation, limit: usize) -> usize {
    let mut ticks = 0;
    while ticks < limit && simulation.step() {
        ticks += 1;
    }
    ticks
}

fn pair_forces() -> Forces {
    Forces {
        charge: Some(ManyBody {
            strength: -30.0,
            theta: 0.9,
        }),
        link: Some(LinkForce {
            distance: 30.0,
            weighted: false,
        }),
        center: Some(Vec2::ZERO),
        ..Forces::default()
    }
}

fn linked_pair() -> Simulation {
    let nodes = vec![NodeSpec::new(1.0, 4.0, 0), NodeSpec::new(1.0, 4.0, 0)];
    let edges = vec![EdgeSpec {
        source: 0,
        target: 1,
        weight: 1.0,
    }];
    Simulation::new(nodes, edges, pair_forces(), &SimulationConfig::default())
}

#[test]
fn linked_pair_settles_near_link_distance() {
    let mut simulation = linked_pair();
    run_until_cool(&mut simulation, 400);
    assert!(!simulation.is_running());

    let nodes = simulation.nodes();
    let distance = (nodes[0].position - nodes[1].position).length();
    // Link pull balances charge push slightly beyond the rest length.
    assert!(
        (25.0..40.0).contains(&distance),
        "pair settled {distance} apart"
    );

    let midpoint = (nodes[0].position + nodes[1].position) * 0.5;
    assert!(midpoint.length() < 1e-2);
}

#[test]
fn link_and_charge_alone_converge_to_a_stable_distance() {
    let nodes = vec![NodeSpec::new(1.0, 4.0, 0), NodeSpec::new(1.0, 4.0, 0)];
    let edges = vec![EdgeSpec {
        source: 0,
        target: 1,
        weight: 1.0,
    }];
    let forces = Forces {
        center: None,
        ..pair_forces()
    };
    let mut simulation = Simulation::new(nodes, edges, forces, &SimulationConfig::default());

    let mut previous = f32::NAN;
    let mut last_change = f32::INFINITY;
    while simulation.step() {
        let nodes = simulation.nodes();
        let distance = (nodes[0].position - nodes[1].position).length();
        last_change = (distance - previous).abs();
        previous = distance;
    }

    assert!(
        (25.0..40.0).contains(&previous),
        "pair settled {previous} apart"
    );
    assert!(last_change < 1e-3, "distance still moving by {last_change}");
}

#[test]
fn coincident_pair_separates_around_its_shared_position() {
    let start = vec2(5.0, 5.0);
    let nodes = vec![
        NodeSpec::new(1.0, 4.0, 0).at(start),
        NodeSpec::new(1.0, 4.0, 0).at(start),
    ];
    let forces = Forces {
        charge: Some(ManyBody {
            strength: -30.0,
            theta: 0.9,
        }),
        ..Forces::default()
    };
    let mut simulation = Simulation::new(nodes, Vec::new(), forces, &SimulationConfig::default());
    for _ in 0..50 {
        simulation.tick();
    }

    let nodes = simulation.nodes();
    assert!((nodes[0].position - nodes[1].position).length() > 1.0);
    let midpoint = (nodes[0].position + nodes[1].position) * 0.5;
    assert!(
        (midpoint - start).length() < 1e-2,
        "midpoint drifted to {midpoint:?}"
    );
}

#[test]
fn default_cooling_finishes_around_three_hundred_ticks() {
    let mut simulation = linked_pair();
    let ticks = run_until_cool(&mut simulation, 1000);
    assert!((295..=305).contains(&ticks), "cooled after {ticks} ticks");
}

#[test]
fn layout_without_edges_stays_finite() {
    let config = SimulationConfig::default();
    let nodes = (0..40).map(|_| NodeSpec::new(1.0, 3.0, 0)).collect();
    let mut simulation = Simulation::new(
        nodes,
        Vec::new(),
        Forces::network(&config, Vec2::ZERO, 3.0),
        &config,
    );
    run_until_cool(&mut simulation, 400);

    assert!(!simulation.is_running());
    for node in simulation.nodes() {
        assert!(node.position.is_finite());
    }
}

#[test]
fn coincident_seeds_are_pushed_apart() {
    let config = SimulationConfig::default();
    let nodes = (0..4)
        .map(|_| NodeSpec::new(1.0, 3.0, 0).at(vec2(5.0, 5.0)))
        .collect();
    let mut simulation = Simulation::new(
        nodes,
        Vec::new(),
        Forces::network(&config, Vec2::ZERO, 3.0),
        &config,
    );
    for _ in 0..50 {
        simulation.tick();
    }

    let positions = simulation
        .nodes()
        .iter()
        .map(|node| node.position)
        .collect::<Vec<_>>();
    for (index, position) in positions.iter().enumerate() {
        assert!(position.is_finite());
        for other in &positions[index + 1..] {
            assert!((*position - *other).length() > 1.0);
        }
    }
}

#[test]
fn drag_pins_node_under_pointer_and_reheats() {
    let mut simulation = linked_pair();
    run_until_cool(&mut simulation, 400);
    assert!(!simulation.is_running());

    let grabbed = simulation.nodes()[0].position;
    simulation.apply(DragCommand::Start(NodeId(0), grabbed));
    assert!(simulation.is_running());
    assert!(simulation.is_dragging(NodeId(0)));
    assert_eq!(simulation.alpha_target(), 0.3);

    let pointer = vec2(80.0, -45.0);
    simulation.apply(DragCommand::Move(NodeId(0), pointer));
    for _ in 0..20 {
        simulation.step();
        assert_eq!(simulation.nodes()[0].position, pointer);
    }
    assert!(simulation.alpha() > 0.001);

    simulation.apply(DragCommand::End(NodeId(0)));
    assert!(!simulation.is_dragging(NodeId(0)));
    assert_eq!(simulation.alpha_target(), 0.0);
    assert_eq!(simulation.nodes()[0].fixed, None);

    run_until_cool(&mut simulation, 1000);
    assert!(!simulation.is_running());
}

#[test]
fn grab_offset_is_kept_while_moving() {
    let mut simulation = linked_pair();
    let start = simulation.nodes()[1].position;
    let pointer = start + vec2(2.0, 1.0);

    simulation.apply(DragCommand::Start(NodeId(1), pointer));
    simulation.apply(DragCommand::Move(NodeId(1), pointer + vec2(10.0, 0.0)));
    simulation.tick();

    let moved = simulation.nodes()[1].position;
    assert!((moved - (start + vec2(10.0, 0.0))).length() < 1e-4);
}

#[test]
fn concurrent_drags_keep_simulation_warm_until_the_last_release() {
    let mut simulation = linked_pair();
    simulation.apply(DragCommand::Start(NodeId(0), vec2(0.0, 0.0)));
    simulation.apply(DragCommand::Start(NodeId(1), vec2(40.0, 0.0)));
    assert_eq!(simulation.active_drag_count(), 2);

    simulation.apply(DragCommand::End(NodeId(0)));
    assert_eq!(simulation.alpha_target(), 0.3);
    assert!(simulation.is_dragging(NodeId(1)));

    simulation.apply(DragCommand::End(NodeId(1)));
    assert_eq!(simulation.alpha_target(), 0.0);
    assert_eq!(simulation.active_drag_count(), 0);
}

#[test]
fn unknown_and_repeated_drag_commands_are_ignored() {
    let mut simulation = linked_pair();
    simulation.apply(DragCommand::Start(NodeId(9), Vec2::ZERO));
    simulation.apply(DragCommand::Move(NodeId(0), vec2(3.0, 3.0)));
    simulation.apply(DragCommand::End(NodeId(0)));

    assert_eq!(simulation.active_drag_count(), 0);
    assert_eq!(simulation.alpha_target(), 0.0);
    assert!(simulation.nodes().iter().all(|node| node.fixed.is_none()));
}

#[test]
fn edge_helpers_report_endpoints() {
    let simulation = linked_pair();
    let edge = simulation.edges()[0];
    assert!(edge.touches(NodeId(0)));
    assert!(edge.touches(NodeId(1)));
    assert!(!edge.touches(NodeId(2)));
    assert_eq!(edge.other(NodeId(0)), NodeId(1));
    assert_eq!(edge.other(NodeId(1)), NodeId(0));
}

#[test]
fn bubbles_gather_by_group() {
    let mut simulation = bubble_simulation(60, 11, &SimulationConfig::default());
    run_until_cool(&mut simulation, 400);

    let mut sums = [0.0_f32; GROUP_COUNT];
    let mut counts = [0usize; GROUP_COUNT];
    for node in simulation.nodes() {
        sums[node.group] += node.position.x;
        counts[node.group] += 1;
    }
    let means = [0, 1, 2].map(|group| sums[group] / counts[group] as f32);
    assert!(means[0] < means[1], "group means {means:?}");
    assert!(means[1] < means[2], "group means {means:?}");
}

#[test]
fn retuning_keeps_positions_and_reheats() {
    let config = SimulationConfig::default();
    let mut simulation = linked_pair();
    run_until_cool(&mut simulation, 400);
    let before = simulation.nodes()[0].position;

    let stronger = SimulationConfig {
        link_distance: 60.0,
        ..config
    };
    let mut forces = pair_forces();
    forces.link = Some(LinkForce {
        distance: stronger.link_distance,
        weighted: false,
    });
    simulation.retune(forces, &stronger);

    assert_eq!(simulation.nodes()[0].position, before);
    assert!(simulation.is_running());
    run_until_cool(&mut simulation, 1000);
    let nodes = simulation.nodes();
    let distance = (nodes[0].position - nodes[1].position).length();
    assert!(distance > 45.0, "pair settled {distance} apart after retune");
}
