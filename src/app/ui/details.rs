use eframe::egui::{self, RichText, Ui};

use crate::engine::Command;
use crate::util::truncate_label;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let mut commands = Vec::new();
        let history = self.engine.history();

        match history.selected() {
            None => {
                ui.label("Click a node to select it.");
            }
            Some(selected) => {
                ui.label(RichText::new(selected).strong());
                match self
                    .engine
                    .dataset()
                    .entities
                    .iter()
                    .find(|entity| entity.name == selected)
                {
                    Some(entity) => {
                        ui.small(format!("type: {}", entity.entity_type));
                        ui.add_space(6.0);
                        if entity.observations.is_empty() {
                            ui.label("No observations.");
                        } else {
                            ui.label(RichText::new("Observations").strong());
                            egui::ScrollArea::vertical()
                                .id_salt("observations_scroll")
                                .max_height(260.0)
                                .auto_shrink([false, true])
                                .show(ui, |ui| {
                                    for observation in &entity.observations {
                                        ui.label(format!("- {observation}"));
                                    }
                                });
                        }
                    }
                    None => {
                        ui.label("No entity record carries this name.");
                    }
                }

                ui.separator();
                match self.engine.degree_counts(selected) {
                    Some(counts) => {
                        ui.label(format!("Incoming links: {}", counts.inbound));
                        ui.label(format!("Outgoing links: {}", counts.outbound));
                    }
                    None => {
                        ui.label("Hidden by the current filters.");
                    }
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("History").strong());
        if history.stack().is_empty() {
            ui.label("Nothing selected yet.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("history_scroll")
                .max_height(240.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for (index, id) in history.stack().iter().enumerate() {
                        let current = history.cursor() == Some(index);
                        let text = RichText::new(truncate_label(id, 40));
                        let text = if current { text.strong() } else { text };
                        if ui.selectable_label(current, text).clicked() && !current {
                            commands.push(Command::SelectNode(id.clone()));
                        }
                    }
                });
        }

        self.engine.apply_all(commands);
    }
}
