use eframe::egui::{Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use oil_spectra::analysis::correlation::Trend;
use oil_spectra::report::{CorrelationRow, CorrelationTable};

const ROW_HEIGHT: f32 = 18.0;

fn trend_color(trend: Trend) -> Color32 {
    match trend {
        Trend::Positive => Color32::from_rgb(0x2e, 0x8b, 0x57),
        Trend::Negative => Color32::from_rgb(0xc0, 0x39, 0x2b),
        Trend::NotSignificant => Color32::GRAY,
    }
}

/// Cells as shown on screen; the CSV export keeps full precision.
fn display_cells(row: &CorrelationRow) -> Vec<String> {
    let mut cells = vec![
        row.number.to_string(),
        row.range.clone(),
        row.label.clone(),
        format!("{:.2}", row.average_location),
    ];
    cells.extend(row.values.iter().map(|v| format!("{v:.4}")));
    match row.correlation {
        Some(c) => {
            cells.push(format!("{:.4}", c.coefficient));
            cells.push(format!("{:.3e}", c.p_value));
        }
        None => cells.extend(["–".to_string(), "–".to_string()]),
    }
    cells.push(if row.significant { "Yes" } else { "No" }.to_string());
    cells
}

/// Render `table` with one column per exported header.
pub fn correlation_table(ui: &mut Ui, table: &CorrelationTable) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(format!(
            "{} Peak Correlations against {} Fraction",
            table.technique.name(),
            table.reference_oil
        ));
    });

    if table.rows.is_empty() {
        ui.label("No rows to show.");
        return;
    }

    let headers = table.headers();
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), headers.len())
            .header(2.5 * ROW_HEIGHT, |mut header| {
                for name in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in &table.rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        for cell in display_cells(row) {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                        table_row.col(|ui: &mut Ui| {
                            ui.label(
                                RichText::new(row.trend.to_string()).color(trend_color(row.trend)),
                            );
                        });
                    });
                }
            });
    });
}
