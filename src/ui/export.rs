use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, ColorImage};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// PNG export via viewport screenshot
// ---------------------------------------------------------------------------

/// Ask for a PNG path and request a screenshot of the next frame.
pub fn request_png(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export view as PNG")
        .add_filter("PNG image", &["png"])
        .set_file_name(format!("{}.png", state.view.title()))
        .save_file();

    if let Some(path) = file {
        state.pending_screenshot = Some(path);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }
}

/// Save a screenshot delivered this frame, if one was requested.
pub fn take_screenshot(ctx: &egui::Context, state: &mut AppState) {
    let image = ctx.input(|i| {
        i.raw.events.iter().find_map(|e| match e {
            egui::Event::Screenshot { image, .. } => Some(image.clone()),
            _ => None,
        })
    });
    let (Some(image), Some(path)) = (image, state.pending_screenshot.take()) else {
        return;
    };
    state.status_message = Some(match save_png(&path, &image) {
        Ok(()) => {
            log::info!("Saved {}", path.display());
            format!("Saved {}", path.display())
        }
        Err(e) => {
            log::error!("PNG export failed: {e:#}");
            format!("Error: {e:#}")
        }
    });
}

pub fn save_png(path: &Path, image: &ColorImage) -> Result<()> {
    let [width, height] = image.size;
    let rgba: Vec<u8> = image.pixels.iter().flat_map(|c| c.to_array()).collect();
    image::save_buffer(
        path,
        &rgba,
        width as u32,
        height as u32,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("writing {}", path.display()))
}
