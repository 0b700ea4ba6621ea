use eframe::egui::{Pos2, Vec2, pos2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn new(translate: Vec2, scale: f32) -> Self {
        Self {
            translate,
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
        }
    }

    pub fn to_screen(self, world: Vec2) -> Pos2 {
        pos2(0.0, 0.0) + (world * self.scale) + self.translate
    }

    pub fn to_world(self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translate) / self.scale
    }

    pub fn zoomed_at(self, pointer: Pos2, factor: f32) -> Self {
        let anchor = self.to_world(pointer);
        let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        Self {
            translate: pointer.to_vec2() - (anchor * scale),
            scale,
        }
    }

    pub fn panned_by(self, delta: Vec2) -> Self {
        Self {
            translate: self.translate + delta,
            scale: self.scale,
        }
    }

    pub fn centering_translate(self, world: Vec2, viewport: Vec2) -> Vec2 {
        (viewport * 0.5) - (world * self.scale)
    }
}
