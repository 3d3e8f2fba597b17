use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Attribute;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one multiselect per filterable attribute.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🛒 Choose required attribute");
    ui.separator();

    // The Arc keeps the dataset alive while `state` is mutated below.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for attr in Attribute::FILTERABLE {
                let all_values = dataset.distinct_values(attr);

                // Show count of selected / total in the header
                let n_selected = state.selection.selected_count(attr);
                let n_total = all_values.len();
                let header_text = format!("{}  ({n_selected}/{n_total})", attr.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(attr.column_name())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(attr);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(attr);
                            }
                        });

                        for val in all_values {
                            let mut checked = state.selection.is_selected(attr, val);
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                state.toggle_filter_value(attr, val);
                            }
                        }
                    });
            }
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

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_path(path);
    }
}
