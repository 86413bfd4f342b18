use std::collections::HashSet;

use force_plot::select::{
    AdjacencyHighlight, EMPHASIS_SCALE, Highlight, HoverTarget, NEIGHBOR_COUNT, Quadrant,
    SelectAction, SelectionState, nearest_neighbors,
};
use force_plot::sim::{EdgeId, EdgeSpec, Forces, NodeId, NodeSpec, Simulation, SimulationConfig};

fn scattered() -> Vec<[f64; 2]> {
    vec![
        [0.0, 0.0],
        [4.0, 4.0],
        [-1.0, 0.5],
        [2.0, -2.0],
        [-6.0, -1.0],
        [0.5, 0.5],
        [9.0, 0.0],
        [-3.0, 3.0],
    ]
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

#[test]
fn neighbor_selection_marks_five_nearest_in_order() {
    let positions = scattered();
    let neighbors = nearest_neighbors(&positions, 0, NEIGHBOR_COUNT);
    assert_eq!(neighbors.len(), NEIGHBOR_COUNT);
    assert!(!neighbors.contains(&0));

    let distances = neighbors
        .iter()
        .map(|&index| distance(positions[0], positions[index]))
        .collect::<Vec<_>>();
    assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));

    let farthest_marked = distances[NEIGHBOR_COUNT - 1];
    for (index, &position) in positions.iter().enumerate() {
        if index != 0 && !neighbors.contains(&index) {
            assert!(distance(positions[0], position) >= farthest_marked);
        }
    }

    let highlights = SelectionState::None
        .apply(SelectAction::Secondary(0))
        .highlights(&positions);
    assert_eq!(highlights[0], Highlight::Reference);
    assert_eq!(
        highlights
            .iter()
            .filter(|&&highlight| highlight == Highlight::Neighbor)
            .count(),
        NEIGHBOR_COUNT
    );
}

#[test]
fn selecting_the_same_point_twice_restores_defaults() {
    let positions = scattered();
    for action in [SelectAction::Primary(3), SelectAction::Secondary(3)] {
        let state = SelectionState::None.apply(action).apply(action);
        assert_eq!(state, SelectionState::None);
        assert!(
            state
                .highlights(&positions)
                .iter()
                .all(|&highlight| highlight == Highlight::Default)
        );
    }
}

#[test]
fn modes_replace_each_other() {
    let state = SelectionState::None
        .apply(SelectAction::Primary(1))
        .apply(SelectAction::Secondary(1));
    assert_eq!(state, SelectionState::NeighborRef(1));

    let state = state.apply(SelectAction::Primary(2));
    assert_eq!(state, SelectionState::QuadrantRef(2));
    assert_eq!(state.apply(SelectAction::Clear), SelectionState::None);
}

#[test]
fn every_point_gets_exactly_one_quadrant() {
    let positions = scattered();
    let highlights = SelectionState::QuadrantRef(0).highlights(&positions);
    assert_eq!(highlights.len(), positions.len());
    assert_eq!(highlights[0], Highlight::Reference);

    for (highlight, &[x, y]) in highlights.iter().zip(&positions).skip(1) {
        assert_eq!(*highlight, Highlight::Quadrant(Quadrant::classify(x, y)));
    }
    assert_eq!(highlights[1], Highlight::Quadrant(Quadrant::UpperRight));
    assert_eq!(highlights[3], Highlight::Quadrant(Quadrant::LowerRight));
    assert_eq!(highlights[4], Highlight::Quadrant(Quadrant::LowerLeft));
    assert_eq!(highlights[7], Highlight::Quadrant(Quadrant::UpperLeft));
}

#[test]
fn zero_offsets_count_as_non_negative() {
    assert_eq!(Quadrant::classify(0.0, 0.0), Quadrant::UpperRight);
    assert_eq!(Quadrant::classify(0.0, -1.0), Quadrant::LowerRight);
    assert_eq!(Quadrant::classify(-1.0, 0.0), Quadrant::UpperLeft);

    let labels = Quadrant::ALL
        .iter()
        .map(|quadrant| quadrant.label())
        .collect::<HashSet<_>>();
    assert_eq!(labels.len(), 4);
}

#[test]
fn out_of_range_reference_leaves_defaults() {
    let positions = scattered();
    let highlights = SelectionState::NeighborRef(42).highlights(&positions);
    assert!(highlights.iter().all(|&highlight| highlight == Highlight::Default));
}

/// 0 - 1 - 2 and 1 - 3, plus an isolated node 4.
fn star() -> Simulation {
    let nodes = (0..5).map(|_| NodeSpec::new(1.0, 3.0, 0)).collect();
    let edges = [(0, 1), (1, 2), (1, 3)]
        .into_iter()
        .map(|(source, target)| EdgeSpec {
            source,
            target,
            weight: 1.0,
        })
        .collect();
    Simulation::new(nodes, edges, Forces::default(), &SimulationConfig::default())
}

#[test]
fn hovering_a_node_highlights_incident_edges() {
    let simulation = star();

    let highlight = AdjacencyHighlight::for_node(&simulation, NodeId(1), false)
        .expect("node 1 exists");
    assert_eq!(highlight.related_nodes, HashSet::from([NodeId(1)]));
    assert_eq!(
        highlight.related_edges,
        HashSet::from([EdgeId(0), EdgeId(1), EdgeId(2)])
    );

    let with_neighbors = AdjacencyHighlight::for_node(&simulation, NodeId(1), true)
        .expect("node 1 exists");
    assert_eq!(
        with_neighbors.related_nodes,
        HashSet::from([NodeId(0), NodeId(1), NodeId(2), NodeId(3)])
    );
    assert!(!with_neighbors.contains_node(NodeId(4)));
}

#[test]
fn hovering_an_edge_highlights_both_endpoints() {
    let simulation = star();
    let highlight = AdjacencyHighlight::for_target(&simulation, HoverTarget::Edge(EdgeId(1)), true)
        .expect("edge 1 exists");
    assert_eq!(highlight.related_nodes, HashSet::from([NodeId(1), NodeId(2)]));
    assert!(highlight.contains_edge(EdgeId(1)));
    assert!(!highlight.contains_edge(EdgeId(0)));

    assert_eq!(highlight.edge_width(EdgeId(1), 0.5), 0.5 * EMPHASIS_SCALE);
    assert_eq!(highlight.edge_width(EdgeId(2), 0.5), 0.5);
}

#[test]
fn isolated_and_missing_targets() {
    let simulation = star();
    let isolated = AdjacencyHighlight::for_node(&simulation, NodeId(4), true)
        .expect("node 4 exists");
    assert_eq!(isolated.related_nodes, HashSet::from([NodeId(4)]));
    assert!(isolated.related_edges.is_empty());

    assert!(AdjacencyHighlight::for_node(&simulation, NodeId(10), false).is_none());
    assert!(AdjacencyHighlight::for_edge(&simulation, EdgeId(10)).is_none());
}
