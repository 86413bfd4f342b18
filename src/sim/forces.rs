use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;
use super::{Edge, SimNode};

const MIN_DISTANCE_SQ: f32 = 1.0;
const SEPARATION_NUDGE: f32 = 0.001;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) theta: f32,
    pub(super) alpha: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) max_collision_distance_sq: f32,
}

// Swapping the pair flips the direction, so both nodes get opposite pushes.
fn separation_direction(from: usize, to: usize) -> Vec2 {
    let (low, high) = (from.min(to), from.max(to));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if from <= to { direction } else { -direction }
}

fn charge_between(index: usize, other: usize, delta: Vec2, params: ChargeParams) -> Vec2 {
    let mut delta = delta;
    let mut distance_sq = delta.length_sq();
    if distance_sq <= f32::EPSILON {
        delta = separation_direction(index, other) * SEPARATION_NUDGE;
        distance_sq = delta.length_sq();
    }
    if distance_sq < MIN_DISTANCE_SQ {
        distance_sq = (MIN_DISTANCE_SQ * distance_sq).sqrt();
    }
    delta * (params.strength * params.alpha / distance_sq)
}

pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *velocity += charge_between(index, other_index, positions[other_index] - point, params);
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let distance_sq = delta.length_sq().max(0.0001);
    let distance = distance_sq.sqrt();
    let can_approximate = !node.square.contains(point)
        && ((node.square.size / distance) < params.theta)
        && node.mass > 1.0;

    if can_approximate {
        let distance_sq = distance_sq.max(MIN_DISTANCE_SQ);
        *velocity += delta * (params.strength * node.mass * params.alpha / distance_sq);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, params, velocity);
    }
}

pub(super) struct LinkCoefficients {
    pub(super) strengths: Vec<f32>,
    pub(super) biases: Vec<f32>,
}

impl LinkCoefficients {
    pub(super) fn new(edges: &[Edge], degrees: &[usize], weighted: bool) -> Self {
        let max_weight = edges
            .iter()
            .map(|edge| edge.weight)
            .fold(0.0_f32, f32::max);

        let mut strengths = Vec::with_capacity(edges.len());
        let mut biases = Vec::with_capacity(edges.len());
        for edge in edges {
            let source_degree = degrees[edge.source.0].max(1) as f32;
            let target_degree = degrees[edge.target.0].max(1) as f32;

            let mut strength = 1.0 / source_degree.min(target_degree);
            if weighted && max_weight > 0.0 {
                strength *= 0.5 + 0.5 * (edge.weight / max_weight).clamp(0.0, 1.0);
            }
            strengths.push(strength);
            biases.push(source_degree / (source_degree + target_degree));
        }

        Self { strengths, biases }
    }
}

pub(super) fn apply_links(
    nodes: &mut [SimNode],
    edges: &[Edge],
    coefficients: &LinkCoefficients,
    distance: f32,
    alpha: f32,
) {
    for (edge_index, edge) in edges.iter().enumerate() {
        let (source, target) = (edge.source.0, edge.target.0);
        if source == target {
            continue;
        }

        let mut delta = (nodes[target].position + nodes[target].velocity)
            - (nodes[source].position + nodes[source].velocity);
        if delta.length_sq() <= f32::EPSILON {
            delta = separation_direction(source, target) * SEPARATION_NUDGE;
        }

        let length = delta.length();
        let pull = (length - distance) / length * alpha * coefficients.strengths[edge_index];
        let correction = delta * pull;
        let bias = coefficients.biases[edge_index];

        nodes[target].velocity -= correction * bias;
        nodes[source].velocity += correction * (1.0 - bias);
    }
}

pub(super) fn apply_group_x(nodes: &mut [SimNode], targets: &[f32], strength: f32, alpha: f32) {
    for node in nodes {
        let Some(&target) = targets.get(node.group) else {
            continue;
        };
        node.velocity.x += (target - node.position.x) * strength * alpha;
    }
}

pub(super) fn apply_center(nodes: &mut [SimNode], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mut mean = Vec2::ZERO;
    for node in nodes.iter() {
        mean += node.position;
    }
    mean /= nodes.len() as f32;

    let shift = mean - center;
    if shift.length_sq() <= f32::EPSILON {
        return;
    }
    for node in nodes {
        node.position -= shift;
    }
}

fn resolve_overlap(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut delta = predicted[from] - predicted[to];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq <= f32::EPSILON {
        delta = separation_direction(from, to) * SEPARATION_NUDGE;
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((reach - distance) / distance * strength);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = if from_sq + to_sq > 0.0 {
        to_sq / (from_sq + to_sq)
    } else {
        0.5
    };

    deltas[from] += push * share;
    deltas[to] -= push * (1.0 - share);
}

pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    if node_a.square.gap_sq(node_b.square) > params.max_collision_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for i in 0..node_a.indices.len() {
                for j in (i + 1)..node_a.indices.len() {
                    resolve_overlap(
                        node_a.indices[i],
                        node_a.indices[j],
                        predicted,
                        radii,
                        params.strength,
                        deltas,
                    );
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_overlap(from, to, predicted, radii, params.strength, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, predicted, radii, params, deltas);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a, child_b, false, predicted, radii, params, deltas,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.square.size >= node_b.square.size
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, predicted, radii, params, deltas);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, predicted, radii, params, deltas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_charge_stays_finite() {
        let positions = vec![vec2(10.0, 10.0), vec2(10.0, 10.0)];
        let tree = QuadNode::build(&positions).expect("finite points");
        let params = ChargeParams {
            strength: -30.0,
            theta: 0.9,
            alpha: 1.0,
        };

        let mut velocity = Vec2::ZERO;
        accumulate_charge_for_node(&tree, 0, &positions, params, &mut velocity);
        assert!(velocity.x.is_finite() && velocity.y.is_finite());
        assert!(velocity.length() > 0.0);
    }

    #[test]
    fn coincident_charge_pushes_pair_apart_symmetrically() {
        let positions = vec![vec2(5.0, 5.0), vec2(5.0, 5.0)];
        let tree = QuadNode::build(&positions).expect("finite points");
        let params = ChargeParams {
            strength: -30.0,
            theta: 0.9,
            alpha: 1.0,
        };

        let mut first = Vec2::ZERO;
        let mut second = Vec2::ZERO;
        accumulate_charge_for_node(&tree, 0, &positions, params, &mut first);
        accumulate_charge_for_node(&tree, 1, &positions, params, &mut second);
        assert!(first.length() > 0.0);
        assert!((first + second).length() < 1e-6);
    }

    #[test]
    fn separation_direction_flips_with_order() {
        let forward = separation_direction(3, 7);
        let backward = separation_direction(7, 3);
        assert!((forward + backward).length() < 1e-6);
        assert!((forward.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn overlap_push_is_split_by_radius() {
        let predicted = vec![vec2(0.0, 0.0), vec2(2.0, 0.0)];
        let radii = vec![2.0, 2.0];
        let mut deltas = vec![Vec2::ZERO; 2];

        resolve_overlap(0, 1, &predicted, &radii, 1.0, &mut deltas);
        assert!(deltas[0].x < 0.0);
        assert!(deltas[1].x > 0.0);
        assert!((deltas[0].x + deltas[1].x).abs() < 1e-5);
    }

    #[test]
    fn separated_nodes_do_not_collide() {
        let predicted = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let radii = vec![2.0, 3.0];
        let mut deltas = vec![Vec2::ZERO; 2];

        resolve_overlap(0, 1, &predicted, &radii, 1.0, &mut deltas);
        assert_eq!(deltas, vec![Vec2::ZERO; 2]);
    }
}
