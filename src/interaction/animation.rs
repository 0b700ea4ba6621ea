use eframe::egui::Vec2;

pub const RECENTER_SECONDS: f64 = 0.75;

fn ease_cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecenterAnimation {
    from: Vec2,
    to: Vec2,
    started_at: f64,
    duration: f64,
}

impl RecenterAnimation {
    pub fn new(from: Vec2, to: Vec2, now: f64) -> Self {
        Self {
            from,
            to,
            started_at: now,
            duration: RECENTER_SECONDS,
        }
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.started_at >= self.duration
    }

    pub fn sample(&self, now: f64) -> Vec2 {
        let t = ((now - self.started_at) / self.duration).clamp(0.0, 1.0) as f32;
        self.from + (self.to - self.from) * ease_cubic_in_out(t)
    }
}
