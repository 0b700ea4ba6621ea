use std::collections::HashSet;

use eframe::egui::emath::Rot2;
use eframe::egui::epaint::TextShape;
use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2,
};

use crate::engine::{Command, Frame, FrameLink};
use crate::util::truncate_label;

use super::ViewModel;
use super::render_utils::{
    blend_color, circle_visible, dim_color, draw_arrowhead, draw_background, edge_visible,
    type_color,
};

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const NEIGHBOR_COLOR: Color32 = Color32::from_rgb(241, 146, 94);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(96, 104, 116, 200);
const LABEL_CHARS: usize = 28;

fn to_screen(rect: Rect, frame: &Frame, world: Vec2) -> Pos2 {
    rect.min + frame.transform.to_screen(world).to_vec2()
}

fn draw_link_label(ui: &Ui, painter: &egui::Painter, link: &FrameLink, anchor: Pos2) {
    let galley = painter.layout_no_wrap(
        link.label.clone(),
        FontId::proportional(11.0),
        Color32::from_gray(190),
    );
    let rotation = Rot2::from_angle(link.label_rotation);
    let lift = rotation * vec2(0.0, -8.0);
    let top_left = anchor + lift - rotation * (galley.size() * 0.5);
    painter.add(
        TextShape::new(top_left, galley, ui.visuals().text_color()).with_angle(link.label_rotation),
    );
}

impl ViewModel {
    fn handle_canvas_input(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let (pressed, released, pointer, scroll) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.interact_pos(),
                input.raw_scroll_delta.y,
            )
        });
        let local = pointer.map(|position| (position - rect.min).to_pos2());

        if response.hovered() && scroll.abs() > f32::EPSILON {
            let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
            let anchor = local.unwrap_or_else(|| (rect.size() * 0.5).to_pos2());
            self.engine.apply(Command::ZoomAt {
                pointer: anchor,
                factor,
            });
        }

        if pressed
            && response.hovered()
            && let Some(local) = local
        {
            self.pointer_captured = true;
            self.engine.pointer_pressed(local);
        }

        if !self.pointer_captured {
            return;
        }

        if let Some(local) = local {
            self.engine.pointer_moved(local);
        }
        if released {
            self.pointer_captured = false;
            self.engine.pointer_released();
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.engine.apply(Command::SetViewport(rect.size()));
        self.handle_canvas_input(ui, rect, &response);

        let now = ui.input(|input| input.time);
        let frame = self.engine.frame(now);
        if frame.needs_repaint || self.pointer_captured {
            ui.ctx().request_repaint();
        }

        draw_background(&painter, rect, frame.transform.translate, frame.transform.scale);

        if frame.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entities match the current filters.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            self.visible_node_count = 0;
            self.visible_link_count = 0;
            return;
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|position| rect.contains(*position))
            .and_then(|position| self.engine.hit_test((position - rect.min).to_pos2()))
            .map(str::to_owned);
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::PointingHand);
        }

        let selected_index = frame
            .history
            .selected()
            .and_then(|id| frame.nodes.iter().position(|node| node.id == id));
        let mut neighbors = HashSet::new();
        if let Some(selected) = selected_index {
            for link in &frame.links {
                if link.source == selected {
                    neighbors.insert(link.target);
                }
                if link.target == selected {
                    neighbors.insert(link.source);
                }
            }
        }
        let matches = self
            .engine
            .search_suggestions(frame.nodes.len())
            .into_iter()
            .map(|suggestion| suggestion.id)
            .collect::<HashSet<_>>();

        let scale = frame.transform.scale;
        let zoom_sqrt = scale.sqrt();
        let mut visible_link_count = 0usize;
        for link in &frame.links {
            let start = to_screen(rect, &frame, link.start);
            let end = to_screen(rect, &frame, link.end);
            let incident = selected_index.is_some_and(|selected| {
                link.source == selected || link.target == selected
            });
            let color = if incident {
                NEIGHBOR_COLOR
            } else if selected_index.is_some() {
                dim_color(LINK_COLOR, 0.55)
            } else {
                LINK_COLOR
            };
            let width = if incident { 2.2 } else { 1.2 } * zoom_sqrt.clamp(0.6, 2.0);

            if link.self_loop {
                let node = &frame.nodes[link.source];
                let radius = node.radius * scale;
                let center = start - vec2(0.0, radius);
                if !circle_visible(rect, center, radius) {
                    continue;
                }
                painter.circle_stroke(center, radius, Stroke::new(width, color));
            } else {
                if !edge_visible(rect, start, end, 4.0) {
                    continue;
                }
                painter.line_segment([start, end], Stroke::new(width, color));
                draw_arrowhead(&painter, start, end, (7.0 * zoom_sqrt).clamp(4.0, 12.0), color);
            }

            if self.show_link_labels && (scale > 0.6 || incident) {
                draw_link_label(ui, &painter, link, to_screen(rect, &frame, link.label_anchor));
            }
            visible_link_count += 1;
        }
        self.visible_link_count = visible_link_count;

        let mut visible_node_count = 0usize;
        for (index, node) in frame.nodes.iter().enumerate() {
            let position = to_screen(rect, &frame, node.position);
            let radius = node.radius * scale;
            if !circle_visible(rect, position, radius + 4.0) {
                continue;
            }
            visible_node_count += 1;

            let is_selected = selected_index == Some(index);
            let is_neighbor = neighbors.contains(&index);
            let is_hovered = hovered.as_deref() == Some(node.id.as_str());
            let is_match = matches.contains(&node.id);

            let base_color = type_color(&node.entity_type);
            let color = if is_selected {
                SELECTED_COLOR
            } else if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.35)
            } else if is_neighbor {
                blend_color(base_color, NEIGHBOR_COLOR, 0.55)
            } else if is_match {
                blend_color(base_color, MATCH_COLOR, 0.6)
            } else if selected_index.is_some() {
                dim_color(base_color, 0.5)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, color);
            let stroke_width = if is_selected || node.pinned { 2.4 } else { 1.0 };
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(stroke_width, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );

            let should_draw_label =
                is_selected || is_hovered || is_neighbor || is_match || radius > 12.0 || scale > 1.35;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(&node.id, LABEL_CHARS),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }
        self.visible_node_count = visible_node_count;

        if let Some(id) = &hovered
            && let Some(node) = frame.nodes.iter().find(|node| &node.id == id)
        {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}  |  degree {}", node.id, node.entity_type, node.degree),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
