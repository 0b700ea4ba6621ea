use eframe::egui::Vec2;

use crate::graph::{FilterResult, Generation};
use crate::physics::{LayoutConfig, Simulation};

/// Permission to advance one specific generation by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Idle,
    /// The ticket belongs to a superseded generation; nothing was written.
    Stale,
}

/// Frame scheduler for the layout. Holds exactly one generation at a time and
/// refuses ticks issued for any other.
pub struct LayoutDriver {
    config: LayoutConfig,
    current: u64,
    generation: Generation,
    simulation: Option<Simulation>,
}

impl LayoutDriver {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            current: 0,
            generation: Generation::new(0, FilterResult::default()),
            simulation: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn generation_mut(&mut self) -> &mut Generation {
        &mut self.generation
    }

    /// Stops the running simulation and installs a new generation in the
    /// same call, so no tick of the old one can land after this returns.
    pub fn replace(&mut self, result: FilterResult, center: Vec2) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.stop();
        }
        self.simulation = None;

        let retired = self.current;
        self.current = self.current.wrapping_add(1);
        self.generation = Generation::new(self.current, result);

        if !self.generation.is_empty() {
            self.simulation = Some(Simulation::new(
                self.config,
                &mut self.generation.nodes,
                &self.generation.links,
                center,
            ));
        }

        tracing::debug!(
            retired,
            generation = self.current,
            nodes = self.generation.nodes.len(),
            links = self.generation.links.len(),
            "layout generation replaced"
        );
    }

    pub fn schedule(&self) -> FrameTicket {
        FrameTicket {
            generation: self.current,
        }
    }

    pub fn tick(&mut self, ticket: FrameTicket) -> TickOutcome {
        if ticket.generation != self.current {
            tracing::trace!(
                ticket = ticket.generation,
                current = self.current,
                "dropping stale layout tick"
            );
            return TickOutcome::Stale;
        }

        let Some(simulation) = self.simulation.as_mut() else {
            return TickOutcome::Idle;
        };

        if simulation.tick(&mut self.generation.nodes, &self.generation.links) {
            TickOutcome::Moved
        } else {
            TickOutcome::Idle
        }
    }

    pub fn reheat(&mut self) {
        let target = self.config.drag_alpha_target;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.reheat(target);
        }
    }

    pub fn cool(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.cool();
        }
    }

    pub fn set_center(&mut self, center: Vec2) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_center(center);
        }
    }

    pub fn alpha(&self) -> Option<f32> {
        self.simulation.as_ref().map(Simulation::alpha)
    }

    pub fn is_running(&self) -> bool {
        self.simulation
            .as_ref()
            .is_some_and(|simulation| !simulation.is_stopped() && !simulation.is_idle())
    }
}
