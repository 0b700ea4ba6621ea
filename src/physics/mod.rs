mod config;
mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};

use crate::graph::{Link, Node};
pub use config::LayoutConfig;
use forces::{
    Bodies, ChargeParams, apply_axis_centering, apply_charge, apply_collisions, apply_links,
    centering_shift, link_counts,
};
use quadtree::QuadNode;

const SEED_RADIUS: f32 = 10.0;

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

pub struct Simulation {
    config: LayoutConfig,
    alpha: f32,
    alpha_target: f32,
    center: Vec2,
    link_counts: Vec<usize>,
    stopped: bool,
    scratch: Scratch,
}

fn seed_positions(nodes: &mut [Node], center: Vec2) {
    if let [only] = nodes {
        if only.position.is_none() {
            only.position = Some(center);
        }
        return;
    }

    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    for (index, node) in nodes.iter_mut().enumerate() {
        if node.position.is_some() {
            continue;
        }
        let radius = SEED_RADIUS * (0.5 + index as f32).sqrt();
        let angle = index as f32 * golden_angle;
        node.position = Some(center + vec2(angle.cos(), angle.sin()) * radius);
    }
}

impl Simulation {
    pub fn new(config: LayoutConfig, nodes: &mut [Node], links: &[Link], center: Vec2) -> Self {
        seed_positions(nodes, center);
        // A lone node is seeded on the center and has nothing to relax against.
        let alpha = if nodes.len() > 1 { 1.0 } else { 0.0 };
        Self {
            config,
            alpha,
            alpha_target: 0.0,
            center,
            link_counts: link_counts(nodes.len(), links),
            stopped: false,
            scratch: Scratch::default(),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_idle(&self) -> bool {
        self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn reheat(&mut self, target: f32) {
        self.alpha_target = target;
        self.alpha = self.alpha.max(target);
    }

    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn tick(&mut self, nodes: &mut [Node], links: &[Link]) -> bool {
        if self.stopped || self.is_idle() || nodes.is_empty() {
            return false;
        }
        self.step(nodes, links);
        true
    }

    pub fn step(&mut self, nodes: &mut [Node], links: &[Link]) {
        let node_count = nodes.len();
        if node_count == 0 {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.velocities.clear();
        scratch.radii.clear();
        scratch.predicted.clear();
        for node in nodes.iter() {
            let position = node.world_pos();
            scratch.positions.push(position);
            scratch.velocities.push(node.velocity);
            scratch.radii.push(node.radius);
            scratch.predicted.push(position + node.velocity);
        }
        scratch.deltas.clear();
        scratch.deltas.resize(node_count, Vec2::ZERO);

        let bodies = Bodies {
            positions: &scratch.positions,
            velocities: &scratch.velocities,
        };
        let deltas = &mut scratch.deltas;

        apply_links(
            bodies,
            links,
            &self.link_counts,
            self.config.link_distance,
            alpha,
            deltas,
        );

        if let Some(tree) = QuadNode::build(&scratch.positions, &scratch.radii) {
            apply_charge(
                &tree,
                bodies,
                ChargeParams {
                    strength: self.config.charge_strength,
                    theta: self.config.barnes_hut_theta,
                },
                alpha,
                deltas,
            );
        }

        apply_axis_centering(bodies, self.config.axis_strength, alpha, deltas);

        if self.config.collision_strength > 0.0
            && let Some(tree) = QuadNode::build(&scratch.predicted, &scratch.radii)
        {
            apply_collisions(
                &tree,
                &scratch.predicted,
                &scratch.radii,
                self.config.collision_strength,
                deltas,
            );
        }

        let retain = 1.0 - self.config.velocity_decay;
        for (node, delta) in nodes.iter_mut().zip(deltas.iter()) {
            if let Some(pin) = node.pin {
                node.position = Some(pin);
                node.velocity = Vec2::ZERO;
                continue;
            }
            node.velocity = (node.velocity + *delta) * retain;
            node.position = Some(node.world_pos() + node.velocity);
        }

        scratch.positions.clear();
        scratch
            .positions
            .extend(nodes.iter().map(|node| node.world_pos()));
        let shift = centering_shift(&scratch.positions, self.center, self.config.center_strength);
        if shift.length_sq() > 0.0 {
            for node in nodes.iter_mut().filter(|node| node.pin.is_none()) {
                node.position = Some(node.world_pos() + shift);
            }
        }
    }
}
