use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{export, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct OilSpectraApp {
    pub state: AppState,
}

impl eframe::App for OilSpectraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Screenshot requested on a previous frame ----
        export::take_screenshot(ctx, &mut self.state);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: samples and view options ----
        egui::SidePanel::left("sample_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plots / table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(analysis) = &self.state.analysis else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a manifest to run the analysis  (File → Open manifest…)");
                });
                return;
            };
            match self.state.view {
                View::Spectrum => plot::spectrum_view(ui, analysis, self.state.selected_sample),
                View::Stacked => plot::stacked_view(ui, analysis),
                View::RelativeHeights => plot::relative_height_bars(ui, analysis),
                View::PeakAreas => plot::peak_area_bars(ui, analysis),
                View::ProtonRatios => plot::proton_ratio_bars(ui, analysis),
                View::Table => match self.state.current_table() {
                    Some(t) => table::correlation_table(ui, &t),
                    None => {
                        ui.label("No correlation table for this technique.");
                    }
                },
            }
        });
    }
}
