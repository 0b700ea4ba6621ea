use eframe::egui::Vec2;

use crate::graph::Link;
use crate::util::separation_direction;

use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct Bodies<'a> {
    pub(super) positions: &'a [Vec2],
    pub(super) velocities: &'a [Vec2],
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) theta: f32,
}

pub(super) fn link_counts(node_count: usize, links: &[Link]) -> Vec<usize> {
    let mut counts = vec![0; node_count];
    for link in links.iter().filter(|link| !link.is_self_loop()) {
        counts[link.source] += 1;
        counts[link.target] += 1;
    }
    counts
}

pub(super) fn apply_links(
    bodies: Bodies<'_>,
    links: &[Link],
    counts: &[usize],
    distance: f32,
    alpha: f32,
    deltas: &mut [Vec2],
) {
    for link in links {
        // A self-loop is a spring between a body and itself: no net force.
        if link.is_self_loop() {
            continue;
        }
        let (source, target) = (link.source, link.target);

        let mut delta = (bodies.positions[target] + bodies.velocities[target])
            - (bodies.positions[source] + bodies.velocities[source]);
        let mut length = delta.length();
        if length <= 1e-6 {
            delta = separation_direction(source, target) * 1e-3;
            length = 1e-3;
        }

        let source_count = counts[source].max(1) as f32;
        let target_count = counts[target].max(1) as f32;
        let strength = 1.0 / source_count.min(target_count);
        let bias = source_count / (source_count + target_count);

        let correction = delta * ((length - distance) / length * alpha * strength);
        deltas[target] -= correction * bias;
        deltas[source] += correction * (1.0 - bias);
    }
}

pub(super) fn apply_charge(
    tree: &QuadNode,
    bodies: Bodies<'_>,
    params: ChargeParams,
    alpha: f32,
    deltas: &mut [Vec2],
) {
    let scale = params.strength * alpha;
    for (index, delta) in deltas.iter_mut().enumerate() {
        accumulate_charge(tree, index, bodies.positions, params.theta, scale, delta);
    }
}

fn charge_between(offset: Vec2, mass: f32, scale: f32, fallback: Vec2) -> Vec2 {
    let mut offset = offset;
    let mut distance_sq = offset.length_sq();
    if distance_sq <= 1e-9 {
        offset = fallback;
        distance_sq = 1.0;
    }
    // Soften very close bodies the way an n-body minimum distance does.
    if distance_sq < 1.0 {
        distance_sq = distance_sq.sqrt();
    }
    offset * (scale * mass / distance_sq)
}

fn accumulate_charge(
    cell: &QuadNode,
    index: usize,
    positions: &[Vec2],
    theta: f32,
    scale: f32,
    delta: &mut Vec2,
) {
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.indices {
            if other == index {
                continue;
            }
            *delta += charge_between(
                positions[other] - point,
                1.0,
                scale,
                separation_direction(index, other),
            );
        }
        return;
    }

    let offset = cell.center_of_mass - point;
    let distance = offset.length().max(1e-3);
    let far_enough =
        !cell.bounds.contains(point) && (cell.bounds.side_length() / distance) < theta;
    if far_enough {
        *delta += charge_between(offset, cell.mass, scale, separation_direction(index, 0));
        return;
    }

    for child in cell.children() {
        accumulate_charge(child, index, positions, theta, scale, delta);
    }
}

pub(super) fn apply_axis_centering(
    bodies: Bodies<'_>,
    strength: f32,
    alpha: f32,
    deltas: &mut [Vec2],
) {
    if bodies.positions.is_empty() {
        return;
    }

    let mut mean = Vec2::ZERO;
    for position in bodies.positions {
        mean += *position;
    }
    mean /= bodies.positions.len() as f32;

    for (position, delta) in bodies.positions.iter().zip(deltas.iter_mut()) {
        *delta += (mean - *position) * (strength * alpha);
    }
}

pub(super) fn centering_shift(positions: &[Vec2], center: Vec2, strength: f32) -> Vec2 {
    if positions.is_empty() {
        return Vec2::ZERO;
    }

    let mut mean = Vec2::ZERO;
    for position in positions {
        mean += *position;
    }
    mean /= positions.len() as f32;
    (center - mean) * strength
}

pub(super) fn apply_collisions(
    tree: &QuadNode,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    collide_cells(tree, tree, true, predicted, radii, strength, deltas);
}

fn collide_pair(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut offset = predicted[from] - predicted[to];
    let mut distance = offset.length();
    if distance >= reach {
        return;
    }
    if distance <= 1e-6 {
        offset = separation_direction(from, to) * 1e-3;
        distance = 1e-3;
    }

    let push = offset * ((reach - distance) / distance * strength);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = to_sq / (from_sq + to_sq);
    deltas[from] += push * share;
    deltas[to] -= push * (1.0 - share);
}

fn collide_cells(
    cell_a: &QuadNode,
    cell_b: &QuadNode,
    same_cell: bool,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = cell_a.max_radius + cell_b.max_radius;
    if cell_a.bounds.gap_sq(cell_b.bounds) > reach * reach {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &from) in cell_a.indices.iter().enumerate() {
                for &to in &cell_a.indices[offset + 1..] {
                    collide_pair(from, to, predicted, radii, strength, deltas);
                }
            }
        } else {
            for &from in &cell_a.indices {
                for &to in &cell_b.indices {
                    collide_pair(from, to, predicted, radii, strength, deltas);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (offset, child_a) in children.iter().enumerate() {
            collide_cells(child_a, child_a, true, predicted, radii, strength, deltas);
            for child_b in &children[offset + 1..] {
                collide_cells(child_a, child_b, false, predicted, radii, strength, deltas);
            }
        }
        return;
    }

    let split_a = if cell_a.is_leaf() {
        false
    } else if cell_b.is_leaf() {
        true
    } else {
        cell_a.bounds.half_extent >= cell_b.bounds.half_extent
    };

    if split_a {
        for child in cell_a.children() {
            collide_cells(child, cell_b, false, predicted, radii, strength, deltas);
        }
    } else {
        for child in cell_b.children() {
            collide_cells(cell_a, child, false, predicted, radii, strength, deltas);
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn link(source: usize, target: usize) -> Link {
        Link {
            source,
            target,
            relation_type: "r".to_owned(),
        }
    }

    #[test]
    fn stretched_link_pulls_endpoints_together() {
        let positions = [vec2(0.0, 0.0), vec2(400.0, 0.0)];
        let velocities = [Vec2::ZERO; 2];
        let bodies = Bodies {
            positions: &positions,
            velocities: &velocities,
        };
        let links = [link(0, 1)];
        let counts = link_counts(2, &links);
        let mut deltas = [Vec2::ZERO; 2];

        apply_links(bodies, &links, &counts, 160.0, 1.0, &mut deltas);

        assert!(deltas[0].x > 0.0);
        assert!(deltas[1].x < 0.0);
        assert!((deltas[0] + deltas[1]).length() < 1e-3);
    }

    #[test]
    fn self_loop_contributes_nothing() {
        let positions = [vec2(3.0, 4.0)];
        let velocities = [Vec2::ZERO];
        let bodies = Bodies {
            positions: &positions,
            velocities: &velocities,
        };
        let links = [link(0, 0)];
        let counts = link_counts(1, &links);
        let mut deltas = [Vec2::ZERO];

        apply_links(bodies, &links, &counts, 160.0, 1.0, &mut deltas);

        assert_eq!(counts, vec![0]);
        assert_eq!(deltas[0], Vec2::ZERO);
    }

    #[test]
    fn charge_pushes_bodies_apart() {
        let positions = [vec2(-10.0, 0.0), vec2(10.0, 0.0)];
        let radii = [6.0; 2];
        let tree = QuadNode::build(&positions, &radii).expect("finite positions");
        let bodies = Bodies {
            positions: &positions,
            velocities: &[Vec2::ZERO; 2],
        };
        let mut deltas = [Vec2::ZERO; 2];

        apply_charge(
            &tree,
            bodies,
            ChargeParams {
                strength: -600.0,
                theta: 0.9,
            },
            1.0,
            &mut deltas,
        );

        assert!(deltas[0].x < 0.0);
        assert!(deltas[1].x > 0.0);
    }

    #[test]
    fn overlapping_circles_separate() {
        let predicted = [vec2(0.0, 0.0), vec2(5.0, 0.0)];
        let radii = [10.0, 10.0];
        let tree = QuadNode::build(&predicted, &radii).expect("finite positions");
        let mut deltas = [Vec2::ZERO; 2];

        apply_collisions(&tree, &predicted, &radii, 1.0, &mut deltas);

        assert!(deltas[0].x < 0.0);
        assert!(deltas[1].x > 0.0);
        assert!((deltas[1].x - deltas[0].x - 15.0).abs() < 1e-3);
    }

    #[test]
    fn centering_shift_targets_the_centroid() {
        let positions = [vec2(10.0, 10.0), vec2(30.0, 10.0)];
        let shift = centering_shift(&positions, vec2(0.0, 0.0), 1.0);
        assert_eq!(shift, vec2(-20.0, -10.0));
    }
}
