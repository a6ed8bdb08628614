pub mod export;
pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::Color32;
use palette::Srgb;

pub fn color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}
