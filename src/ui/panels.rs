use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Left side panel – data entry and transform configuration
// ---------------------------------------------------------------------------

/// Render the left configuration panel.
pub fn side_panel(ui: &mut Ui, state: &mut SessionState) {
    ui.heading("Data");
    ui.separator();

    let status = RichText::new(&state.status);
    if state.status.starts_with("Error") {
        ui.label(status.color(Color32::RED));
    } else {
        ui.label(status);
    }
    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Open…").clicked() {
            open_file_dialog(state);
        }
        if ui
            .add_enabled(state.original.is_some(), egui::Button::new("Reset"))
            .clicked()
        {
            state.reset();
        }
    });

    let Some(working) = &state.working else {
        ui.separator();
        ui.label("No dataset loaded.");
        return;
    };

    let numeric_columns = working.numeric_column_names();

    ui.separator();
    ui.heading("Configuration");
    ui.add_space(4.0);

    if numeric_columns.is_empty() {
        ui.label(RichText::new("The dataset has no numeric columns.").color(Color32::RED));
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Column selection ----
            ui.strong("Columns to clip");
            for col in &numeric_columns {
                let mut checked = state.selected_columns.contains(col);
                if ui.checkbox(&mut checked, col).changed() {
                    state.toggle_column(col);
                }
            }
            if state.selected_columns.is_empty() {
                ui.label("Select at least one column.");
            }
            ui.separator();

            // ---- Sensitivity factor ----
            ui.strong("Sensitivity factor k");
            let mut k = state.k;
            if ui
                .add(egui::Slider::new(&mut k, 0.5..=5.0).step_by(0.25))
                .changed()
            {
                state.set_k(k);
            }
            ui.separator();

            // ---- Histogram column ----
            ui.strong("Histogram column");
            let current = state.preview_column.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("preview_column")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &numeric_columns {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.set_preview_column(col.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Impact report ----
            ui.strong("Impact");
            if let Some(preview) = &state.preview {
                report_table(ui, preview);
            } else {
                ui.label("No preview available.");
            }
            ui.add_space(8.0);

            if ui
                .add_enabled(
                    state.preview.is_some(),
                    egui::Button::new(RichText::new("Apply to dataset").strong()),
                )
                .clicked()
            {
                state.apply();
            }
        });
}

/// Per-column table of out-of-bounds counts for the current preview.
fn report_table(ui: &mut Ui, preview: &crate::state::Preview) {
    TableBuilder::new(ui)
        .striped(true)
        .column(TableColumn::remainder())
        .column(TableColumn::auto())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("Column");
            });
            header.col(|ui| {
                ui.strong("Affected");
            });
        })
        .body(|mut body| {
            for record in &preview.report {
                body.row(16.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&record.column);
                    });
                    row.col(|ui| {
                        ui.label(record.affected.to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut SessionState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.working.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.working {
            ui.label(format!(
                "{} rows × {} columns",
                ds.n_rows(),
                ds.n_columns()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut SessionState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.n_rows(),
                    dataset.column_names()
                );
                state.load_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status = format!("Error: {e:#}");
            }
        }
    }
}

pub fn export_file_dialog(state: &mut SessionState) {
    let Some(working) = &state.working else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export working dataset")
        .set_file_name("cleaned.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::data::loader::export_csv(working, &path) {
            Ok(()) => {
                log::info!("Exported working dataset to {}", path.display());
                state.status = format!("Exported to {}", path.display());
            }
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                state.status = format!("Error: {e:#}");
            }
        }
    }
}
