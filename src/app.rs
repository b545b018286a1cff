use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StatZoneApp {
    pub state: AppState,
}

impl StatZoneApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for StatZoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            ui.separator();
            panels::tab_bar(ui, &mut self.state);
        });

        // ---- Left side panel: comparison type + selections ----
        egui::SidePanel::left("selection_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &self.state;
            let Some(bundle) = &state.bundle else {
                ui.centered_and_justified(|ui| {
                    let msg = state
                        .comparison_error
                        .as_deref()
                        .unwrap_or("Pick a selection in the side panel");
                    ui.heading(msg);
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match state.tab {
                    Tab::Overview => tables::overview(ui, bundle),
                    Tab::Trends => plot::trends(ui, bundle),
                    Tab::Results => plot::results(ui, bundle),
                    Tab::Compare => tables::compare(ui, bundle),
                    Tab::Records => tables::records(ui, bundle),
                });
        });
    }
}
