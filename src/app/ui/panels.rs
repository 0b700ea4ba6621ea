use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        path: &Path,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("graph-lens");
                    ui.separator();
                    ui.label(format!("file: {}", path.display()));
                    ui.label(format!("entities: {}", self.engine.dataset().entities.len()));
                    ui.label(format!("relations: {}", self.engine.dataset().relations.len()));
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload file"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.layout_status_text());
                        ui.label(format!(
                            "visible: {} nodes / {} links",
                            self.visible_node_count, self.visible_link_count
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn layout_status_text(&self) -> String {
        let layout = self.engine.layout();
        let generation = layout.generation().number;
        match layout.alpha() {
            Some(alpha) if layout.is_running() => {
                format!("generation {generation} | settling (alpha {alpha:.3})")
            }
            Some(_) => format!("generation {generation} | settled"),
            None => format!("generation {generation} | empty"),
        }
    }
}
