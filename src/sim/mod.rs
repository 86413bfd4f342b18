//! Force-directed layout engine.
//!
//! A [`Simulation`] owns its nodes and edges and advances them one tick per
//! animation frame. Forces accumulate into node velocities, scaled by the
//! decaying `alpha`; integration then applies velocity decay and moves every
//! node that is not pinned by an active drag.

mod adjacency;
mod forces;
mod quadtree;

use std::collections::BTreeMap;

use eframe::egui::{Vec2, vec2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use adjacency::Adjacency;
use forces::{
    ChargeParams, CollisionParams, LinkCoefficients, accumulate_charge_for_node,
    accumulate_collision_pairs, apply_center, apply_group_x, apply_links,
};
use quadtree::QuadNode;

const SPIRAL_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub usize);

/// Input description of a node; `position` seeds the layout when known.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSpec {
    pub weight: f32,
    pub radius: f32,
    pub group: usize,
    pub position: Option<Vec2>,
}

impl NodeSpec {
    pub fn new(weight: f32, radius: f32, group: usize) -> Self {
        Self {
            weight,
            radius,
            group,
            position: None,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }
}

/// Edge between two node indices. Out-of-range endpoints are dropped when
/// the simulation is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSpec {
    pub source: usize,
    pub target: usize,
    pub weight: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
    pub weight: f32,
    pub radius: f32,
    pub group: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    pub fixed: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f32,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    pub fn other(&self, node: NodeId) -> NodeId {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }
}

/// Pointer interactions that pin and move a single node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragCommand {
    Start(NodeId, Vec2),
    Move(NodeId, Vec2),
    End(NodeId),
}

/// Tuning shared by every preset. Missing keys fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub drag_alpha_target: f32,
    pub charge_strength: f32,
    pub theta: f32,
    pub link_distance: f32,
    pub weighted_links: bool,
    pub collide_strength: f32,
    pub collide_iterations: usize,
    pub group_strength: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            alpha_min,
            // Reaches alpha_min from 1.0 in 300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            charge_strength: -30.0,
            theta: 0.9,
            link_distance: 30.0,
            weighted_links: true,
            collide_strength: 1.0,
            collide_iterations: 1,
            group_strength: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManyBody {
    pub strength: f32,
    pub theta: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkForce {
    pub distance: f32,
    pub weighted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupX {
    pub targets: Vec<f32>,
    pub strength: f32,
}

/// Collision radius is `node.radius * radius_scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collide {
    pub radius_scale: f32,
    pub strength: f32,
    pub iterations: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Forces {
    pub charge: Option<ManyBody>,
    pub link: Option<LinkForce>,
    pub group_x: Option<GroupX>,
    pub collide: Option<Collide>,
    pub center: Option<Vec2>,
}

impl Forces {
    /// Category bubbles: nodes drift toward their group's x target and
    /// bounce off each other.
    pub fn grouped(config: &SimulationConfig, targets: Vec<f32>) -> Self {
        Self {
            charge: Some(ManyBody {
                strength: config.charge_strength,
                theta: config.theta,
            }),
            link: None,
            group_x: Some(GroupX {
                targets,
                strength: config.group_strength,
            }),
            collide: Some(Collide {
                radius_scale: 1.0,
                strength: config.collide_strength,
                iterations: config.collide_iterations,
            }),
            center: None,
        }
    }

    /// Weighted interaction network kept centered on `center`.
    pub fn network(config: &SimulationConfig, center: Vec2, collide_scale: f32) -> Self {
        Self {
            charge: Some(ManyBody {
                strength: config.charge_strength,
                theta: config.theta,
            }),
            link: Some(LinkForce {
                distance: config.link_distance,
                weighted: config.weighted_links,
            }),
            group_x: None,
            collide: Some(Collide {
                radius_scale: collide_scale,
                strength: config.collide_strength,
                iterations: config.collide_iterations,
            }),
            center: Some(center),
        }
    }
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

pub struct Simulation {
    nodes: Vec<SimNode>,
    edges: Vec<Edge>,
    adjacency: Adjacency,
    forces: Forces,
    link_coefficients: LinkCoefficients,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    drag_alpha_target: f32,
    running: bool,
    active_drags: BTreeMap<NodeId, Vec2>,
    dropped_edges: usize,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub fn new(
        nodes: Vec<NodeSpec>,
        edges: Vec<EdgeSpec>,
        forces: Forces,
        config: &SimulationConfig,
    ) -> Self {
        let origin = forces.center.unwrap_or(Vec2::ZERO);
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        let nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                let position = spec
                    .position
                    .filter(|position| position.is_finite())
                    .unwrap_or_else(|| {
                        let radius = SPIRAL_RADIUS * (0.5 + index as f32).sqrt();
                        let angle = index as f32 * golden_angle;
                        origin + vec2(angle.cos(), angle.sin()) * radius
                    });
                SimNode {
                    weight: spec.weight,
                    radius: spec.radius.max(0.0),
                    group: spec.group,
                    position,
                    velocity: Vec2::ZERO,
                    fixed: None,
                }
            })
            .collect::<Vec<_>>();

        let node_count = nodes.len();
        let mut dropped_edges = 0usize;
        let edges = edges
            .into_iter()
            .filter_map(|spec| {
                if spec.source >= node_count || spec.target >= node_count {
                    dropped_edges += 1;
                    return None;
                }
                Some(Edge {
                    source: NodeId(spec.source),
                    target: NodeId(spec.target),
                    weight: spec.weight,
                })
            })
            .collect::<Vec<_>>();
        if dropped_edges > 0 {
            warn!("dropped {dropped_edges} edges with endpoints outside the node set");
        }

        let adjacency = Adjacency::build(node_count, &edges);
        let link_coefficients = LinkCoefficients::new(
            &edges,
            &adjacency.degrees(),
            forces.link.is_some_and(|link| link.weighted),
        );

        debug!(
            "simulation built with {} nodes and {} edges",
            node_count,
            edges.len()
        );

        Self {
            nodes,
            edges,
            adjacency,
            forces,
            link_coefficients,
            alpha: 1.0,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay.clamp(0.0, 1.0),
            alpha_target: 0.0,
            velocity_decay: config.velocity_decay.clamp(0.0, 1.0),
            drag_alpha_target: config.drag_alpha_target,
            running: true,
            active_drags: BTreeMap::new(),
            dropped_edges,
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&SimNode> {
        self.nodes.get(id.0)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    pub fn is_dragging(&self, id: NodeId) -> bool {
        self.active_drags.contains_key(&id)
    }

    pub fn active_drag_count(&self) -> usize {
        self.active_drags.len()
    }

    pub fn restart(&mut self) {
        self.running = true;
    }

    /// Raises alpha to at least `alpha` and resumes ticking.
    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
        self.restart();
    }

    /// Swaps in new forces and decay tuning, keeping positions, then reheats
    /// so the layout adapts.
    pub fn retune(&mut self, forces: Forces, config: &SimulationConfig) {
        self.link_coefficients = LinkCoefficients::new(
            &self.edges,
            &self.adjacency.degrees(),
            forces.link.is_some_and(|link| link.weighted),
        );
        self.forces = forces;
        self.alpha_min = config.alpha_min;
        self.alpha_decay = config.alpha_decay.clamp(0.0, 1.0);
        self.velocity_decay = config.velocity_decay.clamp(0.0, 1.0);
        self.drag_alpha_target = config.drag_alpha_target;
        if !self.active_drags.is_empty() {
            self.alpha_target = self.drag_alpha_target;
        }
        self.reheat(self.drag_alpha_target);
    }

    /// Advances one frame if the simulation is still hot.
    ///
    /// Returns whether it should keep being stepped.
    pub fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.tick();
        if self.alpha < self.alpha_min {
            debug!("simulation cooled below alpha {}", self.alpha_min);
            self.running = false;
        }
        self.running
    }

    /// Runs one integration step regardless of the running state.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;

        if let Some(link) = self.forces.link {
            apply_links(
                &mut self.nodes,
                &self.edges,
                &self.link_coefficients,
                link.distance,
                alpha,
            );
        }

        if let Some(charge) = self.forces.charge {
            self.apply_charge(charge, alpha);
        }

        if let Some(group_x) = &self.forces.group_x {
            apply_group_x(&mut self.nodes, &group_x.targets, group_x.strength, alpha);
        }

        if let Some(collide) = self.forces.collide {
            for _ in 0..collide.iterations.max(1) {
                self.apply_collision(collide);
            }
        }

        if let Some(center) = self.forces.center {
            apply_center(&mut self.nodes, center);
        }

        let keep = 1.0 - self.velocity_decay;
        for node in &mut self.nodes {
            if let Some(fixed) = node.fixed {
                node.position = fixed;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= keep;
            let next = node.position + node.velocity;
            if next.is_finite() {
                node.position = next;
            } else {
                node.velocity = Vec2::ZERO;
            }
        }
    }

    fn apply_charge(&mut self, charge: ManyBody, alpha: f32) {
        if self.nodes.len() < 2 || charge.strength == 0.0 {
            return;
        }

        self.scratch.positions.clear();
        self.scratch
            .positions
            .extend(self.nodes.iter().map(|node| node.position));
        let positions = &self.scratch.positions;

        let Some(tree) = QuadNode::build(positions) else {
            return;
        };
        let params = ChargeParams {
            strength: charge.strength,
            theta: charge.theta,
            alpha,
        };
        for (index, node) in self.nodes.iter_mut().enumerate() {
            accumulate_charge_for_node(&tree, index, positions, params, &mut node.velocity);
        }
    }

    fn apply_collision(&mut self, collide: Collide) {
        let node_count = self.nodes.len();
        if node_count < 2 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.radii.clear();
        let mut max_radius = 0.0_f32;
        for node in &self.nodes {
            scratch.positions.push(node.position + node.velocity);
            let radius = node.radius * collide.radius_scale;
            scratch.radii.push(radius);
            max_radius = max_radius.max(radius);
        }
        if max_radius <= 0.0 {
            return;
        }

        let Some(tree) = QuadNode::build(&scratch.positions) else {
            return;
        };
        scratch.deltas.clear();
        scratch.deltas.resize(node_count, Vec2::ZERO);

        let max_collision_distance = max_radius * 2.0;
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &scratch.positions,
            &scratch.radii,
            CollisionParams {
                strength: collide.strength,
                max_collision_distance_sq: max_collision_distance * max_collision_distance,
            },
            &mut scratch.deltas,
        );

        for (node, delta) in self.nodes.iter_mut().zip(&scratch.deltas) {
            node.velocity += *delta;
        }
    }

    /// Applies a drag command. The first active drag heats the simulation
    /// to the drag alpha target; releasing the last one lets it cool again.
    pub fn apply(&mut self, command: DragCommand) {
        match command {
            DragCommand::Start(id, pointer) => {
                if id.0 >= self.nodes.len() {
                    debug!("ignoring drag start for unknown node {id:?}");
                    return;
                }

                if self.active_drags.is_empty() {
                    self.alpha_target = self.drag_alpha_target;
                    self.restart();
                }

                let node = &mut self.nodes[id.0];
                node.fixed = Some(node.position);
                let offset = node.position - pointer;
                self.active_drags.insert(id, offset);
            }
            DragCommand::Move(id, pointer) => {
                let Some(&offset) = self.active_drags.get(&id) else {
                    return;
                };
                if let Some(node) = self.nodes.get_mut(id.0)
                    && (pointer + offset).is_finite()
                {
                    node.fixed = Some(pointer + offset);
                }
            }
            DragCommand::End(id) => {
                if self.active_drags.remove(&id).is_none() {
                    return;
                }
                if let Some(node) = self.nodes.get_mut(id.0) {
                    node.fixed = None;
                }
                if self.active_drags.is_empty() {
                    self.alpha_target = 0.0;
                }
            }
        }
    }
}
