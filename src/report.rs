use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::correlation::{pearson, Correlation, Trend};
use crate::analysis::nmr::PeakGroup;
use crate::analysis::window::PeakWindowSet;
use crate::data::model::{FtirSample, NmrSample, SampleMeta, SampleSet};
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Technique – decides file names and column wording
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technique {
    Ftir,
    Nmr,
}

impl Technique {
    pub fn name(&self) -> &'static str {
        match self {
            Technique::Ftir => "FTIR",
            Technique::Nmr => "1H-NMR",
        }
    }

    pub fn all_peaks_file(&self) -> String {
        format!("{}_AllPeakCorrelations.csv", self.name())
    }

    pub fn significant_peaks_file(&self) -> String {
        format!("{}_SigPeakCorrelations.csv", self.name())
    }

    fn range_header(&self) -> &'static str {
        match self {
            Technique::Ftir => "Peak Range (cm⁻¹)",
            Technique::Nmr => "Range of Chemical Shift (δ)",
        }
    }

    fn label_header(&self) -> &'static str {
        match self {
            Technique::Ftir => "Type of Vibration",
            Technique::Nmr => "Assignment",
        }
    }

    fn location_header(&self) -> &'static str {
        match self {
            Technique::Ftir => "Average Peak Wavenumber (cm⁻¹)",
            Technique::Nmr => "Average Shift (δ)",
        }
    }

    fn metric_header(&self, column: &SampleColumn, reference_oil: &str) -> String {
        let pct = column.fraction * 100.0;
        match self {
            Technique::Ftir => format!(
                "Relative Height in {} ({pct:.1}% {reference_oil})",
                column.short_name
            ),
            Technique::Nmr => format!("{} ({pct:.1}% {reference_oil})", column.short_name),
        }
    }
}

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SampleColumn {
    pub short_name: String,
    pub fraction: f64,
}

impl From<&SampleMeta> for SampleColumn {
    fn from(meta: &SampleMeta) -> Self {
        SampleColumn {
            short_name: meta.short_name.clone(),
            fraction: meta.fraction,
        }
    }
}

/// Correlation of one window (FTIR) or peak group (NMR) across all samples.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRow {
    /// 1-based.
    pub number: usize,
    pub range: String,
    pub label: String,
    pub average_location: f64,
    /// Relative height or peak area per sample, in sample-set order.
    pub values: Vec<f64>,
    /// `None` when the values are constant across samples.
    pub correlation: Option<Correlation>,
    pub significant: bool,
    pub trend: Trend,
}

impl CorrelationRow {
    /// Correlate `values` against `fractions`. A constant metric yields a row
    /// without a correlation instead of an error.
    pub fn correlate(
        number: usize,
        range: String,
        label: String,
        average_location: f64,
        fractions: &[f64],
        values: Vec<f64>,
    ) -> AnalysisResult<Self> {
        let correlation = match pearson(fractions, &values) {
            Ok(c) => Some(c),
            Err(AnalysisError::ZeroVariance) => {
                log::warn!("peak {number} ({range}) is constant across samples, not correlated");
                None
            }
            Err(e) => return Err(e),
        };
        let significant = correlation.is_some_and(|c| c.is_significant());
        let trend = correlation.map_or(Trend::NotSignificant, |c| c.trend());
        Ok(CorrelationRow {
            number,
            range,
            label,
            average_location,
            values,
            correlation,
            significant,
            trend,
        })
    }
}

/// One correlation row per peak, sample columns in sample-set order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationTable {
    pub technique: Technique,
    pub reference_oil: String,
    pub samples: Vec<SampleColumn>,
    pub rows: Vec<CorrelationRow>,
}

impl CorrelationTable {
    pub fn headers(&self) -> Vec<String> {
        let t = self.technique;
        let mut headers = vec![
            "Peak Number".to_string(),
            t.range_header().to_string(),
            t.label_header().to_string(),
            t.location_header().to_string(),
        ];
        headers.extend(
            self.samples
                .iter()
                .map(|c| t.metric_header(c, &self.reference_oil)),
        );
        headers.extend(
            ["Pearson Coefficient", "p-value", "Significant? (p < 5%)", "Trend"]
                .map(String::from),
        );
        headers
    }

    /// Cells of `row` formatted for export.
    pub fn record(row: &CorrelationRow) -> Vec<String> {
        let mut record = vec![
            row.number.to_string(),
            row.range.clone(),
            row.label.clone(),
            fmt_float(row.average_location),
        ];
        record.extend(row.values.iter().map(|&v| fmt_float(v)));
        match row.correlation {
            Some(c) => {
                record.push(fmt_float(c.coefficient));
                record.push(fmt_float(c.p_value));
            }
            None => record.extend([String::new(), String::new()]),
        }
        record.push(if row.significant { "True" } else { "False" }.to_string());
        record.push(row.trend.to_string());
        record
    }

    /// The rows whose correlation is significant, unchanged.
    pub fn significant_only(&self) -> CorrelationTable {
        CorrelationTable {
            rows: self.rows.iter().filter(|r| r.significant).cloned().collect(),
            ..self.clone()
        }
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.headers()).context("writing CSV header")?;
        for row in &self.rows {
            wtr.write_record(Self::record(row))
                .with_context(|| format!("writing row for peak {}", row.number))?;
        }
        wtr.flush().context("flushing CSV")?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        self.write_to(file)?;
        log::info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}

/// Shortest round-trip text, switching to exponent notation for tiny magnitudes.
fn fmt_float(v: f64) -> String {
    if v != 0.0 && v.abs() < 1e-4 {
        format!("{v:e}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Relative heights per window, correlated against composition.
///
/// Every sample must already carry one peak per window.
pub fn build_ftir_table(
    samples: &SampleSet<FtirSample>,
    windows: &PeakWindowSet,
    reference_oil: &str,
) -> AnalysisResult<CorrelationTable> {
    for s in samples {
        if s.peaks.len() != windows.len() {
            return Err(AnalysisError::InconsistentPeakCount {
                sample: s.meta.short_name.clone(),
                expected: windows.len(),
                found: s.peaks.len(),
            });
        }
    }

    let fractions = samples.fractions();
    let n = samples.len() as f64;
    let rows = windows
        .windows()
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let values: Vec<f64> = samples.iter().map(|s| s.peaks[i].relative_height).collect();
            let average = samples.iter().map(|s| s.peaks[i].wavenumber).sum::<f64>() / n;
            CorrelationRow::correlate(
                i + 1,
                w.range_label(),
                w.label.clone(),
                average,
                &fractions,
                values,
            )
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(CorrelationTable {
        technique: Technique::Ftir,
        reference_oil: reference_oil.to_string(),
        samples: samples.metas().map(SampleColumn::from).collect(),
        rows,
    })
}

/// Peak areas per group, correlated against composition.
pub fn build_nmr_table(
    samples: &SampleSet<NmrSample>,
    groups: &[PeakGroup],
    labels: &[String],
    reference_oil: &str,
) -> AnalysisResult<CorrelationTable> {
    let fractions = samples.fractions();
    let rows = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            CorrelationRow::correlate(
                g.number,
                g.range_label(),
                labels.get(i).cloned().unwrap_or_default(),
                g.midpoint(),
                &fractions,
                g.areas.clone(),
            )
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(CorrelationTable {
        technique: Technique::Nmr,
        reference_oil: reference_oil.to_string(),
        samples: samples.metas().map(SampleColumn::from).collect(),
        rows,
    })
}
