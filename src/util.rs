use eframe::egui::{Vec2, vec2};

pub fn separation_direction(from: usize, to: usize) -> Vec2 {
    let angle =
        ((from as f32) * 0.618_034 + (to as f32) * 0.414_214 + 0.11) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let mut shortened = label
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    shortened.push('…');
    shortened
}
