use crate::data::model::{FtirSample, Peak, Spectrum};
use crate::error::{AnalysisError, AnalysisResult};

use super::window::{PeakWindow, PeakWindowSet};

/// Lowest-transmittance point of `spectrum` within `window` (bounds inclusive).
///
/// Ties resolve to the first point in scan order.
pub fn extract_point(spectrum: &Spectrum, window: &PeakWindow) -> AnalysisResult<(f64, f64)> {
    spectrum
        .points()
        .filter(|&(x, _)| window.contains(x))
        .reduce(|best, p| if p.1 < best.1 { p } else { best })
        .ok_or(AnalysisError::EmptyRange {
            low: window.low,
            high: window.high,
        })
}

/// Extract one peak per window and normalise heights against the reference window.
pub fn extract_peaks(spectrum: &Spectrum, windows: &PeakWindowSet) -> AnalysisResult<Vec<Peak>> {
    let points = windows
        .windows()
        .iter()
        .map(|w| extract_point(spectrum, w))
        .collect::<AnalysisResult<Vec<_>>>()?;

    let reference = windows.reference();
    let Some(baseline) = spectrum.baseline() else {
        return Err(AnalysisError::EmptyRange {
            low: reference.low,
            high: reference.high,
        });
    };

    let heights: Vec<f64> = points.iter().map(|&(_, y)| baseline - y).collect();
    let reference_height = heights[windows.reference_index()];
    if reference_height == 0.0 {
        return Err(AnalysisError::DivideByZero {
            window: reference.label.clone(),
        });
    }

    Ok(points
        .iter()
        .zip(&heights)
        .map(|(&(wavenumber, transmittance), &height)| Peak {
            wavenumber,
            transmittance,
            height,
            relative_height: height / reference_height,
        })
        .collect())
}

impl FtirSample {
    /// Replace this sample's peak list with a fresh extraction.
    pub fn generate_peaks(&mut self, windows: &PeakWindowSet) -> AnalysisResult<()> {
        self.peaks = extract_peaks(&self.spectrum, windows)?;
        for (w, p) in windows.windows().iter().zip(&self.peaks) {
            log::debug!(
                "{}: {} at {} cm⁻¹, height {:.3}, relative {:.3}",
                self.meta.short_name,
                w.label,
                p.wavenumber,
                p.height,
                p.relative_height
            );
        }
        Ok(())
    }
}
