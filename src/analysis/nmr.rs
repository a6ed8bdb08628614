use crate::data::model::{NmrSample, SampleSet};
use crate::error::{AnalysisError, AnalysisResult};

/// The k-th integrated peak of every sample, treated as one chemical environment.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakGroup {
    /// 1-based.
    pub number: usize,
    /// Sample-averaged upper shift, rounded to 2 decimals.
    pub shift_high: f64,
    /// Sample-averaged lower shift, rounded to 2 decimals.
    pub shift_low: f64,
    /// `%Peak Area` per sample, in set order.
    pub areas: Vec<f64>,
}

impl PeakGroup {
    pub fn midpoint(&self) -> f64 {
        (self.shift_low + self.shift_high) / 2.0
    }

    /// `"0.87-0.91"`
    pub fn range_label(&self) -> String {
        format!("{:.2}-{:.2}", self.shift_low, self.shift_high)
    }

    /// One-decimal variant used for bar chart categories.
    pub fn short_range_label(&self) -> String {
        format!("{:.1}-{:.1}", self.shift_low, self.shift_high)
    }

    /// Each area relative to the smallest area of the group.
    pub fn proton_ratios(&self) -> AnalysisResult<Vec<f64>> {
        let min = self.areas.iter().copied().fold(f64::INFINITY, f64::min);
        if min == 0.0 || !min.is_finite() {
            return Err(AnalysisError::DivideByZero {
                window: self.range_label(),
            });
        }
        Ok(self.areas.iter().map(|a| a / min).collect())
    }
}

/// Align the peak tables of all samples by position.
pub fn group_peaks(samples: &SampleSet<NmrSample>) -> AnalysisResult<Vec<PeakGroup>> {
    let Some(first) = samples.get(0) else {
        return Ok(Vec::new());
    };
    let expected = first.peaks.len();
    for s in samples {
        if s.peaks.len() != expected {
            return Err(AnalysisError::InconsistentPeakCount {
                sample: s.meta.short_name.clone(),
                expected,
                found: s.peaks.len(),
            });
        }
    }

    let n = samples.len() as f64;
    let groups = (0..expected)
        .map(|k| {
            let mut high = 0.0;
            let mut low = 0.0;
            let mut areas = Vec::with_capacity(samples.len());
            for s in samples {
                let p = &s.peaks[k];
                high += p.shift_high;
                low += p.shift_low;
                areas.push(p.area_percent);
            }
            PeakGroup {
                number: k + 1,
                shift_high: round2(high / n),
                shift_low: round2(low / n),
                areas,
            }
        })
        .collect();
    Ok(groups)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{IntegratedPeak, SampleMeta};
    use palette::Srgb;

    fn sample(name: &str, fraction: f64, rows: &[(f64, f64, f64)]) -> NmrSample {
        NmrSample {
            meta: SampleMeta {
                short_name: name.into(),
                full_name: name.into(),
                medium: "CDCl3".into(),
                color: Srgb::new(0, 0, 0),
                fraction,
            },
            peaks: rows
                .iter()
                .enumerate()
                .map(|(i, &(shift_high, shift_low, area_percent))| IntegratedPeak {
                    number: i as u32 + 1,
                    shift_high,
                    shift_low,
                    area_percent,
                })
                .collect(),
        }
    }

    #[test]
    fn groups_by_position_in_set_order() {
        let set = SampleSet::new(vec![
            sample("CO", 1.0, &[(5.40, 5.28, 6.0), (0.92, 0.84, 10.0)]),
            sample("PO", 0.0, &[(5.42, 5.30, 3.0), (0.90, 0.82, 12.0)]),
            sample("2C:1P", 0.67, &[(5.41, 5.29, 5.0), (0.91, 0.83, 11.0)]),
        ]);
        let groups = group_peaks(&set).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].areas, vec![3.0, 5.0, 6.0]);
        assert_eq!(groups[0].shift_high, 5.41);
        assert_eq!(groups[0].shift_low, 5.29);
        assert_eq!(groups[1].number, 2);
        assert_eq!(groups[1].range_label(), "0.83-0.91");
    }

    #[test]
    fn mismatched_peak_counts_are_rejected() {
        let set = SampleSet::new(vec![
            sample("PO", 0.0, &[(1.0, 0.9, 1.0), (2.0, 1.9, 2.0)]),
            sample("CO", 1.0, &[(1.0, 0.9, 1.0)]),
        ]);
        assert_eq!(
            group_peaks(&set),
            Err(AnalysisError::InconsistentPeakCount {
                sample: "CO".into(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn proton_ratios_are_relative_to_smallest_area() {
        let g = PeakGroup {
            number: 1,
            shift_high: 2.1,
            shift_low: 2.0,
            areas: vec![4.0, 2.0, 3.0],
        };
        assert_eq!(g.proton_ratios().unwrap(), vec![2.0, 1.0, 1.5]);

        let zero = PeakGroup {
            areas: vec![4.0, 0.0],
            ..g
        };
        assert!(matches!(
            zero.proton_ratios(),
            Err(AnalysisError::DivideByZero { .. })
        ));
    }
}
