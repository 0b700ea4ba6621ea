use eframe::egui::{self, RichText, Ui};

use crate::engine::Command;
use crate::graph::ALL_TYPES;
use crate::util::truncate_label;

use super::super::ViewModel;

const SUGGESTION_ROWS: usize = 12;

fn type_picker(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &str,
    options: &[String],
) -> Option<String> {
    let mut picked = None;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            let all = std::iter::once(ALL_TYPES).chain(options.iter().map(String::as_str));
            for option in all {
                if ui.selectable_label(option == current, option).clicked() && option != current {
                    picked = Some(option.to_owned());
                }
            }
        });
    picked
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut commands = Vec::new();

        ui.label("Search")
            .on_hover_text("Case-insensitive match on names, types and observations.");
        let search_response = ui.text_edit_singleline(&mut self.search);
        if search_response.changed() {
            commands.push(Command::SetSearchTerm(self.search.clone()));
        }
        search_response.on_hover_text("Only matching entities and links between them stay visible.");

        ui.add_space(6.0);
        let query = self.engine.query();
        if let Some(value) = type_picker(
            ui,
            "entity_type_filter",
            "Entity type",
            query.entity_type.label(),
            self.engine.entity_types(),
        ) {
            commands.push(Command::SetEntityTypeFilter(value));
        }
        if let Some(value) = type_picker(
            ui,
            "relation_type_filter",
            "Relation type",
            query.relation_type.label(),
            self.engine.relation_types(),
        ) {
            commands.push(Command::SetRelationTypeFilter(value));
        }

        ui.separator();

        let history = self.engine.history();
        ui.horizontal_wrapped(|ui| {
            if ui
                .add_enabled(history.can_go_back(), egui::Button::new("Back"))
                .clicked()
            {
                commands.push(Command::HistoryBack);
            }
            if ui
                .add_enabled(history.can_go_forward(), egui::Button::new("Forward"))
                .clicked()
            {
                commands.push(Command::HistoryForward);
            }
            if ui
                .add_enabled(history.selected().is_some(), egui::Button::new("Clear"))
                .clicked()
            {
                commands.push(Command::ClearSelection);
            }
            if ui
                .button("Reset")
                .on_hover_text("Clear filters, selection history and view.")
                .clicked()
            {
                commands.push(Command::ResetAll);
            }
        });

        ui.checkbox(&mut self.show_link_labels, "Show relation labels");

        ui.separator();
        ui.label(RichText::new("Matches").strong());
        let suggestions = self.engine.search_suggestions(SUGGESTION_ROWS);
        if self.search.trim().is_empty() {
            ui.label("Type to list matching entities.");
        } else if suggestions.is_empty() {
            ui.label("No visible entity name matches.");
        } else {
            for suggestion in &suggestions {
                let label = format!(
                    "{}  ({})",
                    truncate_label(&suggestion.id, 36),
                    suggestion.entity_type
                );
                if ui.link(label).on_hover_text(suggestion.id.as_str()).clicked() {
                    commands.push(Command::SelectNode(suggestion.id.clone()));
                }
            }
        }

        ui.separator();
        let config = self.engine.layout().config();
        ui.collapsing("Layout", |ui| {
            ui.label(format!("Link distance: {:.0}", config.link_distance));
            ui.label(format!("Charge: {:.0}", config.charge_strength));
            ui.label(format!("Collision strength: {:.2}", config.collision_strength));
        });

        if commands.is_empty() {
            return;
        }
        self.engine.apply_all(commands);
        // Reset/load may have cleared the term.
        if self.engine.query().search_term != self.search {
            self.search = self.engine.query().search_term.clone();
        }
    }
}
