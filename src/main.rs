mod app;
mod state;
mod ui;

use std::path::PathBuf;

use app::OilSpectraApp;
use eframe::egui;
use oil_spectra::config::Manifest;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::default();
    let manifest_path = std::env::args_os().nth(1).map(PathBuf::from);
    match Manifest::discover(manifest_path.as_deref()) {
        Ok(manifest) => state.load_manifest(manifest),
        Err(e) => {
            log::error!("{e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Oil Spectra – FTIR / 1H-NMR Correlation",
        options,
        Box::new(|_cc| Ok(Box::new(OilSpectraApp { state }))),
    )
}
