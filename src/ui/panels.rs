use eframe::egui::{self, Color32, RichText, Ui};

use ipl_statzone::analysis::compare::ComparisonKind;
use ipl_statzone::data::loader::load_dataset;

use crate::color;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – comparison type and selections
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("IPL StatZone").color(color::PRIMARY).strong());
        ui.label(RichText::new("Match analytics").italics());
    });
    ui.separator();

    ui.strong("Comparison type");
    let mut kind = state.kind;
    for k in ComparisonKind::ALL {
        ui.radio_value(&mut kind, k, k.label());
    }
    state.set_kind(kind);
    ui.separator();

    if state.choices.is_empty() {
        ui.label(format!("No {} in this dataset.", state.kind));
        return;
    }

    // Clone what we need so we can mutate state inside the combo boxes.
    let choices = state.choices.clone();

    ui.strong(format!("Select {}", state.kind));
    let current1 = state.selection1.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("selection1")
        .width(ui.available_width())
        .selected_text(&current1)
        .show_ui(ui, |ui: &mut Ui| {
            for choice in &choices {
                if ui.selectable_label(current1 == *choice, choice).clicked() {
                    state.set_selection1(choice.clone());
                }
            }
        });

    ui.add_space(6.0);
    ui.strong(format!("Compare with {} (optional)", state.kind));
    let current2 = state.selection2.clone();
    egui::ComboBox::from_id_salt("selection2")
        .width(ui.available_width())
        .selected_text(current2.as_deref().unwrap_or("None"))
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current2.is_none(), "None").clicked() {
                state.set_selection2(None);
            }
            for choice in &choices {
                if Some(choice) == state.selection1.as_ref() {
                    continue;
                }
                if ui
                    .selectable_label(current2.as_ref() == Some(choice), choice)
                    .clicked()
                {
                    state.set_selection2(Some(choice.clone()));
                }
            }
        });

    ui.separator();
    dataset_summary(ui, state);
}

fn dataset_summary(ui: &mut Ui, state: &AppState) {
    let ds = &state.dataset;
    let report = ds.report();
    egui::CollapsingHeader::new(RichText::new("Dataset").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("dataset_summary").num_columns(2).show(ui, |ui: &mut Ui| {
                let seasons = match (ds.seasons().first(), ds.seasons().last()) {
                    (Some(first), Some(last)) => format!("{first}–{last}"),
                    _ => "-".to_string(),
                };
                let rows = [
                    ("Matches", ds.len().to_string()),
                    ("Seasons", seasons),
                    ("Teams", ds.teams().len().to_string()),
                    ("Venues", ds.venues().len().to_string()),
                    ("Rows read", report.rows_read.to_string()),
                    ("Duplicates", report.duplicates.to_string()),
                    ("Rejected", report.rejected.len().to_string()),
                    ("No venue", report.missing_venue.to_string()),
                    ("No winner", report.missing_winner.to_string()),
                ];
                for (label, value) in rows {
                    ui.label(label);
                    ui.label(value);
                    ui.end_row();
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let source = state
            .dataset
            .source()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ui.label(format!("{} matches loaded  {source}", state.dataset.len()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Pick and load another match table. A failed load keeps the current data.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open IPL match data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_dataset(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
