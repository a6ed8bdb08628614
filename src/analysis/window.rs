use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// A wavenumber range `[low, high]` in which one vibration band is searched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub low: f64,
    pub high: f64,
    /// Vibration assignment, e.g. "Carbonyl C=O Stretch".
    pub label: String,
}

impl PeakWindow {
    pub fn new(low: f64, high: f64, label: impl Into<String>) -> Self {
        PeakWindow {
            low,
            high,
            label: label.into(),
        }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.low && x <= self.high
    }

    /// `"650-800"`, as printed in report tables.
    pub fn range_label(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

/// Ordered windows plus the index of the normalisation anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakWindowSet {
    windows: Vec<PeakWindow>,
    reference: usize,
}

impl PeakWindowSet {
    /// The last window becomes the reference.
    pub fn new(windows: Vec<PeakWindow>) -> AnalysisResult<Self> {
        let reference = windows.len().checked_sub(1).ok_or(AnalysisError::NoWindows)?;
        Ok(PeakWindowSet { windows, reference })
    }

    /// Use `reference` as the anchor instead of the last window. Out-of-range
    /// indices fall back to the last window.
    pub fn with_reference(windows: Vec<PeakWindow>, reference: usize) -> AnalysisResult<Self> {
        let mut set = Self::new(windows)?;
        if reference < set.windows.len() {
            set.reference = reference;
        } else {
            log::warn!(
                "reference window {reference} out of range, using window {}",
                set.reference
            );
        }
        Ok(set)
    }

    /// The six FTIR bands used for cooking oils, alkene C-H stretch last.
    pub fn ftir_default() -> Self {
        PeakWindowSet {
            windows: default_ftir_windows(),
            reference: 5,
        }
    }

    pub fn windows(&self) -> &[PeakWindow] {
        &self.windows
    }

    pub fn reference_index(&self) -> usize {
        self.reference
    }

    pub fn reference(&self) -> &PeakWindow {
        &self.windows[self.reference]
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

pub fn default_ftir_windows() -> Vec<PeakWindow> {
    vec![
        PeakWindow::new(650.0, 800.0, "C-H Rocking"),
        PeakWindow::new(1100.0, 1250.0, "Ester C-O Stretch"),
        PeakWindow::new(1400.0, 1500.0, "Alkane C-H Bend"),
        PeakWindow::new(1700.0, 1800.0, "Carbonyl C=O Stretch"),
        PeakWindow::new(2800.0, 2880.0, "Alkane C-H Stretch"),
        PeakWindow::new(2900.0, 3050.0, "Alkene C-H Stretch"),
    ]
}
