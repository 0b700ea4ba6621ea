use std::f32::consts::{FRAC_PI_2, PI};

use eframe::egui::{Vec2, vec2};

use crate::graph::{Generation, Link, Node};
use crate::history::HistoryState;
use crate::interaction::ViewTransform;

const SELF_LOOP_LABEL_GAP: f32 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode {
    pub id: String,
    pub entity_type: String,
    pub position: Vec2,
    pub radius: f32,
    pub degree: usize,
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameLink {
    pub source: usize,
    pub target: usize,
    pub start: Vec2,
    pub end: Vec2,
    pub label: String,
    pub label_anchor: Vec2,
    pub label_rotation: f32,
    pub self_loop: bool,
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub nodes: Vec<FrameNode>,
    pub links: Vec<FrameLink>,
    pub history: HistoryState,
    pub transform: ViewTransform,
    pub needs_repaint: bool,
}

fn upright_rotation(direction: Vec2) -> f32 {
    let mut angle = direction.y.atan2(direction.x);
    if angle > FRAC_PI_2 {
        angle -= PI;
    } else if angle <= -FRAC_PI_2 {
        angle += PI;
    }
    angle
}

fn frame_link(link: &Link, nodes: &[Node]) -> FrameLink {
    let source = &nodes[link.source];
    let target = &nodes[link.target];
    let from = source.world_pos();
    let to = target.world_pos();

    if link.is_self_loop() {
        return FrameLink {
            source: link.source,
            target: link.target,
            start: from,
            end: from,
            label: link.relation_type.clone(),
            label_anchor: from - vec2(0.0, source.radius * 2.0 + SELF_LOOP_LABEL_GAP),
            label_rotation: 0.0,
            self_loop: true,
        };
    }

    let delta = to - from;
    let distance = delta.length();
    let (start, end) = if distance > source.radius + target.radius {
        let direction = delta / distance;
        (from + direction * source.radius, to - direction * target.radius)
    } else {
        (from, to)
    };

    FrameLink {
        source: link.source,
        target: link.target,
        start,
        end,
        label: link.relation_type.clone(),
        label_anchor: from + delta * 0.5,
        label_rotation: upright_rotation(delta),
        self_loop: false,
    }
}

pub(super) fn build_frame(
    generation: &Generation,
    history: &HistoryState,
    transform: ViewTransform,
    needs_repaint: bool,
) -> Frame {
    let nodes = generation
        .nodes
        .iter()
        .map(|node| FrameNode {
            id: node.id.clone(),
            entity_type: node.entity_type.clone(),
            position: node.world_pos(),
            radius: node.radius,
            degree: node.degree,
            pinned: node.pin.is_some(),
        })
        .collect();

    let links = generation
        .links
        .iter()
        .map(|link| frame_link(link, &generation.nodes))
        .collect();

    Frame {
        nodes,
        links,
        history: history.clone(),
        transform,
        needs_repaint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: &str, position: Vec2, radius: f32) -> Node {
        let mut node = Node::fresh(id.to_owned(), "Thing".to_owned());
        node.position = Some(position);
        node.radius = radius;
        node
    }

    fn link(source: usize, target: usize) -> Link {
        Link {
            source,
            target,
            relation_type: "knows".to_owned(),
        }
    }

    #[test]
    fn endpoints_are_offset_by_radius() {
        let nodes = [
            placed("A", vec2(0.0, 0.0), 10.0),
            placed("B", vec2(100.0, 0.0), 20.0),
        ];
        let geometry = frame_link(&link(0, 1), &nodes);

        assert_eq!(geometry.start, vec2(10.0, 0.0));
        assert_eq!(geometry.end, vec2(80.0, 0.0));
        assert_eq!(geometry.label_anchor, vec2(50.0, 0.0));
        assert_eq!(geometry.label_rotation, 0.0);
    }

    #[test]
    fn leftward_labels_are_flipped_upright() {
        assert_eq!(upright_rotation(vec2(-1.0, 0.0)), 0.0);
        let down_left = upright_rotation(vec2(-1.0, 1.0));
        assert!((down_left - (-PI / 4.0)).abs() < 1e-5);
        assert!((upright_rotation(vec2(0.0, -1.0)) - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn self_loop_label_sits_above_node() {
        let nodes = [placed("A", vec2(5.0, 5.0), 8.0)];
        let geometry = frame_link(&link(0, 0), &nodes);

        assert!(geometry.self_loop);
        assert_eq!(geometry.start, geometry.end);
        assert!(geometry.label_anchor.y < 5.0);
    }
}
