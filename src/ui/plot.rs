use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};
use oil_spectra::data::model::FtirSample;
use oil_spectra::pipeline::Analysis;

use super::color32;

/// Fraction of the y range added above and below a spectrum.
const Y_PADDING: f64 = 0.15;

// ---------------------------------------------------------------------------
// Spectra
// ---------------------------------------------------------------------------

/// Negated so that wavenumbers decrease to the right, as on the instrument.
fn spectrum_line(sample: &FtirSample) -> Line {
    let points: PlotPoints = sample.spectrum.points().map(|(x, y)| [-x, y]).collect();
    Line::new(points)
        .name(&sample.meta.short_name)
        .color(color32(sample.meta.color))
        .width(0.8)
}

fn peak_markers(sample: &FtirSample) -> Points {
    let points: PlotPoints = sample
        .peaks
        .iter()
        .map(|p| [-p.wavenumber, p.transmittance])
        .collect();
    Points::new(points)
        .name("peaks")
        .color(Color32::DARK_GRAY)
        .radius(3.0)
}

fn spectrum_plot(id: impl std::hash::Hash, sample: &FtirSample, height: f32) -> Plot<'static> {
    let mut plot = Plot::new(id)
        .height(height)
        .x_axis_label("Wavenumber [cm⁻¹]")
        .y_axis_label(format!("{}\nTransmittance (%)", sample.meta.short_name))
        .x_axis_formatter(|mark: GridMark, _range| format!("{}", -mark.value))
        .label_formatter(|_name, value| format!("{:.1} cm⁻¹\n{:.2} %", -value.x, value.y))
        .allow_scroll(false);

    if let Some((xmin, xmax)) = sample.spectrum.x_bounds() {
        plot = plot.include_x(-xmax).include_x(-xmin);
    }
    if let Some((ymin, ymax)) = sample.spectrum.y_bounds() {
        let pad = Y_PADDING * (ymax - ymin);
        plot = plot.include_y(ymin - pad).include_y(ymax + pad);
    }
    plot
}

/// One sample, with its extracted peaks marked.
pub fn spectrum_view(ui: &mut Ui, analysis: &Analysis, index: usize) {
    let Some(sample) = analysis.ftir.as_ref().and_then(|a| a.samples.get(index)) else {
        ui.label("No FTIR spectra loaded.");
        return;
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(format!(
            "{} in {} – Infrared Spectrum",
            sample.meta.full_name, sample.meta.medium
        ));
    });
    let height = ui.available_height();
    spectrum_plot("spectrum", sample, height)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.line(spectrum_line(sample));
            plot_ui.points(peak_markers(sample));
        });
}

/// Every sample in its own panel, in sample-set order.
pub fn stacked_view(ui: &mut Ui, analysis: &Analysis) {
    let Some(ftir) = &analysis.ftir else {
        ui.label("No FTIR spectra loaded.");
        return;
    };
    ui.vertical_centered(|ui: &mut Ui| {
        let medium = ftir.samples.get(0).map(|s| s.meta.medium.as_str()).unwrap_or("");
        ui.heading(format!("FTIR Spectra of Cooking Oils in {medium}"));
    });
    let n = ftir.samples.len().max(1) as f32;
    let height = (ui.available_height() / n - ui.spacing().item_spacing.y).max(80.0);
    for (i, sample) in ftir.samples.iter().enumerate() {
        spectrum_plot(("stacked", i), sample, height).show(ui, |plot_ui| {
            plot_ui.line(spectrum_line(sample));
        });
    }
}

// ---------------------------------------------------------------------------
// Grouped bar charts
// ---------------------------------------------------------------------------

struct Series {
    name: String,
    color: Color32,
    values: Vec<f64>,
}

/// One bar group per category, one bar per series within a group.
fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    title: &str,
    y_label: &str,
    categories: Vec<String>,
    series: &[Series],
    log_scale: bool,
) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(title);
    });

    let group_width = 0.8;
    let bar_width = group_width / series.len().max(1) as f64;
    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(j, s)| {
            let offset = -group_width / 2.0 + bar_width * (j as f64 + 0.5);
            let bars = s
                .values
                .iter()
                .enumerate()
                .filter(|&(_, &v)| !log_scale || v > 0.0)
                .map(|(i, &v)| {
                    let height = if log_scale { v.log10() } else { v };
                    Bar::new(i as f64 + offset, height)
                        .width(bar_width)
                        .name(format!("{}: {v:.3}", s.name))
                })
                .collect();
            BarChart::new(bars).color(s.color).name(&s.name)
        })
        .collect();

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            categories.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_scroll(false);
    if log_scale {
        plot = plot.y_axis_formatter(|mark: GridMark, _range| format!("{:.3}", 10f64.powf(mark.value)));
    } else {
        plot = plot.include_y(0.0);
    }

    plot.show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// FTIR relative peak heights, grouped by peak.
pub fn relative_height_bars(ui: &mut Ui, analysis: &Analysis) {
    let Some(ftir) = &analysis.ftir else {
        ui.label("No FTIR spectra loaded.");
        return;
    };
    let categories = ftir
        .table
        .rows
        .iter()
        .map(|r| format!("Peak #{} ({:.0})", r.number, r.average_location))
        .collect();
    let series: Vec<Series> = ftir
        .samples
        .iter()
        .enumerate()
        .map(|(j, s)| Series {
            name: legend_name(&s.meta.short_name, s.meta.fraction, &ftir.table.reference_oil),
            color: color32(s.meta.color),
            values: ftir.table.rows.iter().map(|r| r.values[j]).collect(),
        })
        .collect();
    grouped_bars(
        ui,
        "relative_heights",
        "Variation of FTIR Relative Peak Heights with Oil Type",
        "Relative Peak Height",
        categories,
        &series,
        false,
    );
}

/// NMR %peak area per group on a log axis.
pub fn peak_area_bars(ui: &mut Ui, analysis: &Analysis) {
    let Some(nmr) = &analysis.nmr else {
        ui.label("No 1H-NMR data loaded.");
        return;
    };
    let categories = nmr.groups.iter().map(|g| g.short_range_label()).collect();
    let series: Vec<Series> = nmr
        .samples
        .iter()
        .enumerate()
        .map(|(j, s)| Series {
            name: s.meta.short_name.clone(),
            color: color32(s.meta.color),
            values: nmr.groups.iter().map(|g| g.areas[j]).collect(),
        })
        .collect();
    grouped_bars(
        ui,
        "peak_areas",
        "Variation of H-NMR Peak Areas with Oil Type",
        "% Peak Area",
        categories,
        &series,
        true,
    );
}

/// NMR areas relative to the smallest area of each group.
pub fn proton_ratio_bars(ui: &mut Ui, analysis: &Analysis) {
    let Some(nmr) = &analysis.nmr else {
        ui.label("No 1H-NMR data loaded.");
        return;
    };
    let ratios = match nmr
        .groups
        .iter()
        .map(|g| g.proton_ratios())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(r) => r,
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
            return;
        }
    };
    let categories = nmr.groups.iter().map(|g| g.short_range_label()).collect();
    let series: Vec<Series> = nmr
        .samples
        .iter()
        .enumerate()
        .map(|(j, s)| Series {
            name: s.meta.short_name.clone(),
            color: color32(s.meta.color),
            values: ratios.iter().map(|r| r[j]).collect(),
        })
        .collect();
    grouped_bars(
        ui,
        "proton_ratios",
        "Variation of Proton Ratios per Peak with Oil Type",
        "Relative Ratio",
        categories,
        &series,
        false,
    );
}

fn legend_name(short_name: &str, fraction: f64, reference_oil: &str) -> String {
    format!("{short_name} ({:.1}% {reference_oil})", fraction * 100.0)
}
