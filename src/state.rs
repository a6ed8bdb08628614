use std::path::{Path, PathBuf};

use oil_spectra::config::Manifest;
use oil_spectra::pipeline::{self, Analysis};
use oil_spectra::report::{CorrelationTable, Technique};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Spectrum,
    Stacked,
    RelativeHeights,
    PeakAreas,
    ProtonRatios,
    Table,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Spectrum,
        View::Stacked,
        View::RelativeHeights,
        View::PeakAreas,
        View::ProtonRatios,
        View::Table,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Spectrum => "Spectrum",
            View::Stacked => "All spectra",
            View::RelativeHeights => "FTIR peak heights",
            View::PeakAreas => "NMR peak areas",
            View::ProtonRatios => "NMR proton ratios",
            View::Table => "Correlations",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub manifest: Option<Manifest>,

    /// Result of the last pipeline run.
    pub analysis: Option<Analysis>,

    pub view: View,

    /// Index into the FTIR sample set for the single-spectrum view.
    pub selected_sample: usize,

    /// Which correlation table the table view shows.
    pub table_technique: Technique,

    pub significant_only: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Destination of a requested viewport screenshot.
    pub pending_screenshot: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            manifest: None,
            analysis: None,
            view: View::Stacked,
            selected_sample: 0,
            table_technique: Technique::Ftir,
            significant_only: false,
            status_message: None,
            pending_screenshot: None,
        }
    }
}

impl AppState {
    /// Run the pipeline for `manifest` and write its reports.
    pub fn load_manifest(&mut self, manifest: Manifest) {
        let result = pipeline::run(&manifest).and_then(|analysis| {
            let written = analysis.write_reports(&manifest)?;
            Ok((analysis, written))
        });
        match result {
            Ok((analysis, written)) => {
                log::info!("Analysis complete, {} report(s) written", written.len());
                if analysis.ftir.is_none() && analysis.nmr.is_some() {
                    self.table_technique = Technique::Nmr;
                }
                self.analysis = Some(analysis);
                self.selected_sample = 0;
                self.status_message = Some(format!("{} report(s) written", written.len()));
            }
            Err(e) => {
                log::error!("Analysis failed: {e:#}");
                self.analysis = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
        self.manifest = Some(manifest);
    }

    pub fn open_manifest(&mut self, path: &Path) {
        match Manifest::load(path) {
            Ok(manifest) => self.load_manifest(manifest),
            Err(e) => {
                log::error!("Failed to load manifest: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// The table the table view currently shows, filtered if requested.
    pub fn current_table(&self) -> Option<CorrelationTable> {
        let analysis = self.analysis.as_ref()?;
        let table = match self.table_technique {
            Technique::Ftir => &analysis.ftir.as_ref()?.table,
            Technique::Nmr => &analysis.nmr.as_ref()?.table,
        };
        Some(if self.significant_only {
            table.significant_only()
        } else {
            table.clone()
        })
    }

    /// Write every correlation table (all and significant-only) into `dir`.
    pub fn export_tables(&mut self, dir: &Path) {
        let Some(analysis) = &self.analysis else {
            return;
        };
        let result: anyhow::Result<usize> = analysis.tables().iter().try_fold(0, |n, table| {
            table.write_csv(&dir.join(table.technique.all_peaks_file()))?;
            table
                .significant_only()
                .write_csv(&dir.join(table.technique.significant_peaks_file()))?;
            Ok(n + 2)
        });
        self.status_message = Some(match result {
            Ok(n) => format!("Exported {n} table(s) to {}", dir.display()),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                format!("Error: {e:#}")
            }
        });
    }
}
