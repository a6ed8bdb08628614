use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::nmr::{group_peaks, PeakGroup};
use crate::analysis::window::PeakWindowSet;
use crate::config::{sample_metas, FtirConfig, Manifest, NmrConfig};
use crate::data::cleanup::cleanup_file;
use crate::data::loader::{load_nmr_peaks, load_spectrum};
use crate::data::model::{FtirSample, NmrSample, SampleSet};
use crate::report::{build_ftir_table, build_nmr_table, CorrelationTable};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FtirAnalysis {
    pub samples: SampleSet<FtirSample>,
    pub windows: PeakWindowSet,
    pub table: CorrelationTable,
}

#[derive(Debug, Clone)]
pub struct NmrAnalysis {
    pub samples: SampleSet<NmrSample>,
    pub groups: Vec<PeakGroup>,
    pub table: CorrelationTable,
}

/// Everything one run produces; either technique may be absent from the manifest.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub ftir: Option<FtirAnalysis>,
    pub nmr: Option<NmrAnalysis>,
}

impl Analysis {
    pub fn tables(&self) -> Vec<&CorrelationTable> {
        let ftir = self.ftir.as_ref().map(|a| &a.table);
        let nmr = self.nmr.as_ref().map(|a| &a.table);
        ftir.into_iter().chain(nmr).collect()
    }

    /// Write the all-peaks and significant-only tables of each technique.
    pub fn write_reports(&self, manifest: &Manifest) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for table in self.tables() {
            let all = manifest.output_path(&table.technique.all_peaks_file());
            table.write_csv(&all)?;
            written.push(all);

            let sig = manifest.output_path(&table.technique.significant_peaks_file());
            table.significant_only().write_csv(&sig)?;
            written.push(sig);
        }
        Ok(written)
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Load → extract → correlate for every technique in the manifest.
pub fn run(manifest: &Manifest) -> Result<Analysis> {
    let ftir = manifest
        .ftir
        .as_ref()
        .map(|cfg| run_ftir(manifest, cfg))
        .transpose()
        .context("FTIR analysis")?;
    let nmr = manifest
        .nmr
        .as_ref()
        .map(|cfg| run_nmr(manifest, cfg))
        .transpose()
        .context("1H-NMR analysis")?;
    Ok(Analysis { ftir, nmr })
}

pub fn load_ftir(manifest: &Manifest, cfg: &FtirConfig) -> Result<SampleSet<FtirSample>> {
    let metas = sample_metas(&cfg.samples, &cfg.medium)?;
    let samples = cfg
        .samples
        .iter()
        .zip(metas)
        .map(|(s, meta)| {
            let spectrum = load_spectrum(&manifest.resolve(&s.file))
                .with_context(|| format!("sample '{}'", s.short_name))?;
            Ok(FtirSample::new(meta, spectrum))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SampleSet::new(samples))
}

pub fn run_ftir(manifest: &Manifest, cfg: &FtirConfig) -> Result<FtirAnalysis> {
    let windows = cfg.window_set()?;
    let mut samples = load_ftir(manifest, cfg)?;
    for sample in samples.iter_mut() {
        let name = sample.meta.short_name.clone();
        sample
            .generate_peaks(&windows)
            .with_context(|| format!("extracting FTIR peaks of sample '{name}'"))?;
    }
    let table = build_ftir_table(&samples, &windows, &manifest.reference_oil)
        .context("correlating FTIR peaks")?;
    log::info!(
        "FTIR: {} samples, {} windows, {} significant",
        samples.len(),
        windows.len(),
        table.significant_only().rows.len()
    );
    Ok(FtirAnalysis {
        samples,
        windows,
        table,
    })
}

pub fn load_nmr(manifest: &Manifest, cfg: &NmrConfig) -> Result<SampleSet<NmrSample>> {
    let metas = sample_metas(&cfg.samples, &cfg.medium)?;
    let samples = cfg
        .samples
        .iter()
        .zip(metas)
        .map(|(s, meta)| {
            let peaks = load_nmr_peaks(&manifest.resolve(&s.file))
                .with_context(|| format!("sample '{}'", s.short_name))?;
            Ok(NmrSample { meta, peaks })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SampleSet::new(samples))
}

pub fn run_nmr(manifest: &Manifest, cfg: &NmrConfig) -> Result<NmrAnalysis> {
    let samples = load_nmr(manifest, cfg)?;
    let groups = group_peaks(&samples).context("grouping NMR peaks")?;
    let table = build_nmr_table(&samples, &groups, &cfg.labels, &manifest.reference_oil)
        .context("correlating NMR peak areas")?;
    log::info!(
        "1H-NMR: {} samples, {} peak groups, {} significant",
        samples.len(),
        groups.len(),
        table.significant_only().rows.len()
    );
    Ok(NmrAnalysis {
        samples,
        groups,
        table,
    })
}

/// Convert every NMR sample's `raw_file` into its `file`. Returns the number converted.
pub fn cleanup_nmr(manifest: &Manifest) -> Result<usize> {
    let Some(cfg) = &manifest.nmr else {
        return Ok(0);
    };
    let mut converted = 0;
    for s in &cfg.samples {
        match &s.raw_file {
            Some(raw) => {
                cleanup_file(&manifest.resolve(raw), &manifest.resolve(&s.file))
                    .with_context(|| format!("sample '{}'", s.short_name))?;
                converted += 1;
            }
            None => log::debug!("{}: no raw_file, skipping", s.short_name),
        }
    }
    Ok(converted)
}
