#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub barnes_hut_theta: f32,
    pub center_strength: f32,
    pub axis_strength: f32,
    pub collision_strength: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub drag_alpha_target: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            link_distance: 160.0,
            charge_strength: -600.0,
            barnes_hut_theta: 0.9,
            center_strength: 1.0,
            axis_strength: 0.1,
            collision_strength: 0.7,
            alpha_min,
            // Cools from 1.0 to alpha_min in 300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
        }
    }
}

impl LayoutConfig {
    pub fn with_overrides(mut self, link_distance: Option<f32>, charge: Option<f32>) -> Self {
        if let Some(link_distance) = link_distance {
            self.link_distance = link_distance.max(0.0);
        }
        if let Some(charge) = charge {
            // Accept either sign on the command line; the force always repels.
            self.charge_strength = -charge.abs();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_decay_reaches_alpha_min_in_300_ticks() {
        let config = LayoutConfig::default();
        let alpha = (1.0 - config.alpha_decay).powi(300);
        assert!((alpha - config.alpha_min).abs() < 1e-5);
    }

    #[test]
    fn overrides_keep_charge_repulsive() {
        let config = LayoutConfig::default().with_overrides(Some(180.0), Some(700.0));
        assert_eq!(config.link_distance, 180.0);
        assert_eq!(config.charge_strength, -700.0);

        let untouched = LayoutConfig::default().with_overrides(None, None);
        assert_eq!(untouched, LayoutConfig::default());
    }
}
