mod animation;
mod gesture;
mod transform;

use eframe::egui::{Pos2, Vec2, vec2};

use crate::graph::Node;
pub use animation::RecenterAnimation;
pub use gesture::{GestureEvent, PointerGesture, PressTarget};
pub use transform::ViewTransform;

const DEFAULT_VIEWPORT: Vec2 = vec2(960.0, 720.0);

pub struct ViewController {
    transform: ViewTransform,
    viewport: Vec2,
    animation: Option<RecenterAnimation>,
    dragging: Option<String>,
    pub gesture: PointerGesture,
}

impl Default for ViewController {
    fn default() -> Self {
        Self {
            transform: ViewTransform::default(),
            viewport: DEFAULT_VIEWPORT,
            animation: None,
            dragging: None,
            gesture: PointerGesture::default(),
        }
    }
}

impl ViewController {
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn viewport_center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport.max(vec2(1.0, 1.0));
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn zoom_pan_to(&mut self, transform: ViewTransform) {
        self.animation = None;
        self.transform = ViewTransform::new(transform.translate, transform.scale);
    }

    pub fn zoom_at(&mut self, pointer: Pos2, factor: f32) {
        self.zoom_pan_to(self.transform.zoomed_at(pointer, factor));
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.zoom_pan_to(self.transform.panned_by(delta));
    }

    pub fn reset(&mut self) {
        self.transform = ViewTransform::default();
        self.animation = None;
        self.dragging = None;
        self.gesture = PointerGesture::default();
    }

    pub fn recenter_on(&mut self, world: Vec2, now: f64) {
        let target = self.transform.centering_translate(world, self.viewport);
        self.animation = Some(RecenterAnimation::new(self.transform.translate, target, now));
    }

    pub fn advance(&mut self, now: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        self.transform.translate = animation.sample(now);
        if animation.is_finished(now) {
            self.animation = None;
        }
        true
    }

    pub fn start_drag(&mut self, id: &str, node: &mut Node) {
        node.pin = Some(node.world_pos());
        self.dragging = Some(id.to_owned());
    }

    pub fn drag_to(&mut self, screen: Pos2, node: &mut Node) {
        if self.dragging.as_deref() == Some(node.id.as_str()) {
            node.pin = Some(self.transform.to_world(screen));
        }
    }

    pub fn end_drag(&mut self, node: Option<&mut Node>) -> Option<String> {
        if let Some(node) = node {
            node.pin = None;
        }
        self.dragging.take()
    }
}
