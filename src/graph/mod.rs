mod filter;

use std::collections::HashMap;

use eframe::egui::Vec2;

pub use filter::{ALL_TYPES, FilterResult, Query, TypeFilter, filter};

const MIN_NODE_RADIUS: f32 = 6.0;
const MAX_NODE_RADIUS: f32 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub entity_type: String,
    pub position: Option<Vec2>,
    pub velocity: Vec2,
    /// User-authoritative position; overrides the forces while set.
    pub pin: Option<Vec2>,
    pub degree: usize,
    pub radius: f32,
}

impl Node {
    pub(crate) fn fresh(id: String, entity_type: String) -> Self {
        Self {
            id,
            entity_type,
            position: None,
            velocity: Vec2::ZERO,
            pin: None,
            degree: 0,
            radius: MIN_NODE_RADIUS,
        }
    }

    pub fn world_pos(&self) -> Vec2 {
        self.position.unwrap_or(Vec2::ZERO)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub relation_type: String,
}

impl Link {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug)]
pub struct Generation {
    pub number: u64,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub index_by_id: HashMap<String, usize>,
}

impl Generation {
    pub fn new(number: u64, result: FilterResult) -> Self {
        let index_by_id = result
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();

        Self {
            number,
            nodes: result.nodes,
            links: result.links,
            index_by_id,
        }
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub(crate) fn node_radius(degree: usize, min_degree: usize, max_degree: usize) -> f32 {
    if max_degree <= min_degree {
        return (MIN_NODE_RADIUS + MAX_NODE_RADIUS) * 0.5;
    }

    let t = (degree.saturating_sub(min_degree)) as f32 / (max_degree - min_degree) as f32;
    MIN_NODE_RADIUS + (t.clamp(0.0, 1.0) * (MAX_NODE_RADIUS - MIN_NODE_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_scale_spans_observed_range() {
        assert_eq!(node_radius(1, 1, 5), 6.0);
        assert_eq!(node_radius(5, 1, 5), 20.0);
        assert_eq!(node_radius(3, 1, 5), 13.0);
    }

    #[test]
    fn degenerate_degree_range_uses_midpoint() {
        assert_eq!(node_radius(2, 2, 2), 13.0);
    }
}
