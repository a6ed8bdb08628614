use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use oil_spectra::data::model::SampleMeta;
use oil_spectra::report::Technique;

use super::{color32, export};
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – samples and view options
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Samples");
    ui.separator();

    let Some(analysis) = &state.analysis else {
        ui.label("No analysis loaded.");
        return;
    };

    let ftir: Vec<SampleMeta> = analysis
        .ftir
        .iter()
        .flat_map(|a| a.samples.metas().cloned())
        .collect();
    let nmr: Vec<SampleMeta> = analysis
        .nmr
        .iter()
        .flat_map(|a| a.samples.metas().cloned())
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if !ftir.is_empty() {
                ui.strong("FTIR");
                for (i, meta) in ftir.iter().enumerate() {
                    let text = RichText::new(meta.to_string()).color(color32(meta.color));
                    if ui
                        .selectable_label(state.selected_sample == i, text)
                        .on_hover_text(&meta.full_name)
                        .clicked()
                    {
                        state.selected_sample = i;
                        state.view = View::Spectrum;
                    }
                }
                ui.separator();
            }

            if !nmr.is_empty() {
                ui.strong("1H-NMR");
                for meta in &nmr {
                    ui.label(RichText::new(meta.to_string()).color(color32(meta.color)))
                        .on_hover_text(&meta.full_name);
                }
                ui.separator();
            }

            if state.view == View::Table {
                ui.strong("Table");
                ui.horizontal(|ui: &mut Ui| {
                    ui.selectable_value(&mut state.table_technique, Technique::Ftir, "FTIR");
                    ui.selectable_value(&mut state.table_technique, Technique::Nmr, "1H-NMR");
                });
                ui.checkbox(&mut state.significant_only, "Significant only (p < 5%)");
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
            if ui.button("Open manifest…").clicked() {
                open_manifest_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.analysis.is_some(), egui::Button::new("Export view as PNG…"))
                .clicked()
            {
                export::request_png(ui.ctx(), state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.analysis.is_some(), egui::Button::new("Export tables as CSV…"))
                .clicked()
            {
                export_tables_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            ui.selectable_value(&mut state.view, view, view.title());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_manifest_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open analysis manifest")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_manifest(&path);
    }
}

pub fn export_tables_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Export correlation tables")
        .pick_folder();

    if let Some(dir) = dir {
        state.export_tables(&dir);
    }
}
