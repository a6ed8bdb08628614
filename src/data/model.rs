use std::cmp::Ordering;
use std::fmt;

use anyhow::{bail, Result};
use palette::Srgb;

// ---------------------------------------------------------------------------
// Spectrum – one instrument scan
// ---------------------------------------------------------------------------

/// An FTIR scan in instrument order.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Wavenumber axis (x), cm⁻¹.
    pub x: Vec<f64>,
    /// Percent transmittance (y) – same length as `x`.
    pub y: Vec<f64>,
}

impl Spectrum {
    /// Build a spectrum from parallel axes. Both must be non-empty and of equal length.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            bail!("x has {} values but y has {}", x.len(), y.len());
        }
        if x.is_empty() {
            bail!("spectrum has no data points");
        }
        Ok(Spectrum { x, y })
    }

    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        Self::new(x, y)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(x, y)` pairs in scan order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Transmittance of the first scanned point, used as the peak baseline.
    pub fn baseline(&self) -> Option<f64> {
        self.y.first().copied()
    }

    /// Whether x never changes direction (ascending or descending, repeats allowed).
    pub fn is_monotonic(&self) -> bool {
        let ascending = self.x.windows(2).all(|w| w[0] <= w[1]);
        let descending = self.x.windows(2).all(|w| w[0] >= w[1]);
        ascending || descending
    }

    /// `(min, max)` of the x axis.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(&self.x)
    }

    /// `(min, max)` of the y axis.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(&self.y)
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

// ---------------------------------------------------------------------------
// Sample metadata
// ---------------------------------------------------------------------------

/// Display and composition metadata shared by FTIR and NMR samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMeta {
    /// Short label used in plot legends and table headers ("PO", "1C:2P").
    pub short_name: String,
    pub full_name: String,
    /// Sample medium, e.g. "KBr, liquid".
    pub medium: String,
    pub color: Srgb<u8>,
    /// Mass fraction of the reference oil, in [0, 1].
    pub fraction: f64,
}

impl fmt::Display for SampleMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}%)", self.short_name, self.fraction * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Peaks
// ---------------------------------------------------------------------------

/// A transmittance minimum found in one window of one FTIR spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub wavenumber: f64,
    pub transmittance: f64,
    /// Baseline transmittance minus `transmittance`.
    pub height: f64,
    /// `height` divided by the reference window's height.
    pub relative_height: f64,
}

/// One row of an integrated 1H-NMR peak table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratedPeak {
    pub number: u32,
    pub shift_high: f64,
    pub shift_low: f64,
    pub area_percent: f64,
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FtirSample {
    pub meta: SampleMeta,
    pub spectrum: Spectrum,
    /// One peak per window, filled by [`crate::analysis::peaks`].
    pub peaks: Vec<Peak>,
}

impl FtirSample {
    pub fn new(meta: SampleMeta, spectrum: Spectrum) -> Self {
        FtirSample {
            meta,
            spectrum,
            peaks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NmrSample {
    pub meta: SampleMeta,
    pub peaks: Vec<IntegratedPeak>,
}

impl AsRef<SampleMeta> for FtirSample {
    fn as_ref(&self) -> &SampleMeta {
        &self.meta
    }
}

impl AsRef<SampleMeta> for NmrSample {
    fn as_ref(&self) -> &SampleMeta {
        &self.meta
    }
}

// ---------------------------------------------------------------------------
// SampleSet – the ordered collection handed to every analysis stage
// ---------------------------------------------------------------------------

/// Owned, ordered collection of samples.
///
/// The order is fixed at construction and shared by every table column, bar
/// group and stacked plot built from the set. [`SampleSet::new`] orders by
/// ascending composition fraction; ties keep their input order.
#[derive(Debug, Clone)]
pub struct SampleSet<S> {
    samples: Vec<S>,
}

impl<S: AsRef<SampleMeta>> SampleSet<S> {
    pub fn new(samples: Vec<S>) -> Self {
        Self::with_order(samples, by_fraction)
    }

    /// Order the samples with an explicit comparator (stable sort).
    pub fn with_order<F>(mut samples: Vec<S>, compare: F) -> Self
    where
        F: FnMut(&S, &S) -> Ordering,
    {
        samples.sort_by(compare);
        SampleSet { samples }
    }

    /// Composition fractions in set order.
    pub fn fractions(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.as_ref().fraction).collect()
    }

    pub fn metas(&self) -> impl Iterator<Item = &SampleMeta> {
        self.samples.iter().map(AsRef::as_ref)
    }
}

impl<S> SampleSet<S> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.samples.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, S> {
        self.samples.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.samples.get(index)
    }
}

impl<'a, S> IntoIterator for &'a SampleSet<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Default ordering: ascending composition fraction.
pub fn by_fraction<S: AsRef<SampleMeta>>(a: &S, b: &S) -> Ordering {
    a.as_ref().fraction.total_cmp(&b.as_ref().fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, fraction: f64) -> SampleMeta {
        SampleMeta {
            short_name: name.to_string(),
            full_name: name.to_string(),
            medium: String::new(),
            color: Srgb::new(0, 0, 0),
            fraction,
        }
    }

    fn nmr(name: &str, fraction: f64) -> NmrSample {
        NmrSample {
            meta: meta(name, fraction),
            peaks: Vec::new(),
        }
    }

    fn names(set: &SampleSet<NmrSample>) -> Vec<&str> {
        set.metas().map(|m| m.short_name.as_str()).collect()
    }

    #[test]
    fn default_order_is_ascending_fraction() {
        let set = SampleSet::new(vec![nmr("CO", 1.0), nmr("PO", 0.0), nmr("2C:1P", 0.67)]);
        assert_eq!(names(&set), ["PO", "2C:1P", "CO"]);
        assert_eq!(set.fractions(), vec![0.0, 0.67, 1.0]);
    }

    #[test]
    fn equal_fractions_keep_input_order() {
        let set = SampleSet::new(vec![nmr("b", 0.5), nmr("a", 0.5), nmr("c", 0.1)]);
        assert_eq!(names(&set), ["c", "b", "a"]);
    }

    #[test]
    fn custom_comparator_is_honoured() {
        let set = SampleSet::with_order(vec![nmr("PO", 0.0), nmr("CO", 1.0)], |a, b| {
            b.meta.fraction.total_cmp(&a.meta.fraction)
        });
        assert_eq!(names(&set), ["CO", "PO"]);
    }

    #[test]
    fn spectrum_rejects_mismatched_axes() {
        assert!(Spectrum::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(Spectrum::new(Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn spectrum_bounds_and_baseline() {
        let sp = Spectrum::from_points(&[(3000.0, 50.0), (2000.0, 20.0), (1000.0, 70.0)]).unwrap();
        assert_eq!(sp.baseline(), Some(50.0));
        assert_eq!(sp.x_bounds(), Some((1000.0, 3000.0)));
        assert_eq!(sp.y_bounds(), Some((20.0, 70.0)));
        assert!(sp.is_monotonic());
    }

    #[test]
    fn detects_non_monotonic_axis() {
        let sp = Spectrum::from_points(&[(3000.0, 1.0), (1000.0, 1.0), (2000.0, 1.0)]).unwrap();
        assert!(!sp.is_monotonic());
    }
}
