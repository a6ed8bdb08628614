use std::fmt;

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{AnalysisError, AnalysisResult};

/// Two-tailed significance level.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Pearson product-moment correlation and its two-tailed p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
}

impl Correlation {
    pub fn is_significant(&self) -> bool {
        self.p_value < SIGNIFICANCE_LEVEL
    }

    pub fn trend(&self) -> Trend {
        if !self.is_significant() {
            Trend::NotSignificant
        } else if self.coefficient > 0.0 {
            Trend::Positive
        } else if self.coefficient < 0.0 {
            Trend::Negative
        } else {
            Trend::NotSignificant
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
    NotSignificant,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Positive => "positive",
            Trend::Negative => "negative",
            Trend::NotSignificant => "not significant",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Positive => write!(f, "Positive trend (+)"),
            Trend::Negative => write!(f, "Negative trend (-)"),
            Trend::NotSignificant => write!(f, "Trend not significant"),
        }
    }
}

/// Correlate `xs` against `ys`.
///
/// The p-value tests r = 0 with Student's t on `n - 2` degrees of freedom,
/// `t = r * sqrt(df / (1 - r²))`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> AnalysisResult<Correlation> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let n = xs.len();
    if n < 3 {
        return Err(AnalysisError::InsufficientData { found: n });
    }

    // Exact comparison: a rounded mean leaves residual variance on constant input.
    let is_constant = |v: &[f64]| v.iter().all(|&a| a == v[0]);
    if is_constant(xs) || is_constant(ys) {
        return Err(AnalysisError::ZeroVariance);
    }

    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;

    let (covariance, var_x, var_y) =
        xs.iter()
            .zip(ys)
            .fold((0.0, 0.0, 0.0), |(cov, vx, vy), (&xi, &yi)| {
                let dx = xi - mean_x;
                let dy = yi - mean_y;
                (cov + dx * dy, vx + dx * dx, vy + dy * dy)
            });

    if var_x == 0.0 || var_y == 0.0 {
        return Err(AnalysisError::ZeroVariance);
    }

    let coefficient = (covariance / (var_x * var_y).sqrt()).clamp(-1.0, 1.0);
    let p_value = two_tailed_p(coefficient, nf - 2.0);

    Ok(Correlation {
        coefficient,
        p_value,
    })
}

fn two_tailed_p(r: f64, df: f64) -> f64 {
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return 0.0;
    }
    let t = r * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        // df >= 1 is guaranteed by the n >= 3 check
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_metric_is_strong_positive() {
        let c = pearson(&[0.0, 0.34, 0.67, 1.0], &[1.0, 1.3, 1.6, 2.0]).unwrap();
        assert!((c.coefficient - 0.996_866_5).abs() < 1e-6, "{c:?}");
        // df = 2: p = 1 - t / sqrt(t² + 2)
        let t = c.coefficient * (2.0 / (1.0 - c.coefficient.powi(2))).sqrt();
        let expected = 1.0 - t / (t * t + 2.0).sqrt();
        assert!((c.p_value - expected).abs() < 1e-9, "{c:?} vs {expected}");
        assert!(c.p_value < 0.01);
        assert_eq!(c.trend(), Trend::Positive);
    }

    #[test]
    fn p_value_matches_cauchy_for_three_points() {
        // df = 1 is the Cauchy distribution: p = 1 - (2/π)·atan(|t|)
        let c = pearson(&[0.0, 0.5, 1.0], &[1.0, 2.0, 2.5]).unwrap();
        let t = c.coefficient * (1.0 / (1.0 - c.coefficient.powi(2))).sqrt();
        let expected = 1.0 - 2.0 / std::f64::consts::PI * t.abs().atan();
        assert!((c.p_value - expected).abs() < 1e-9, "{c:?} vs {expected}");
        assert!(!c.is_significant());
        assert_eq!(c.trend(), Trend::NotSignificant);
    }

    #[test]
    fn exact_linear_relation_has_zero_p() {
        let c = pearson(&[0.0, 1.0, 2.0, 3.0], &[9.0, 7.0, 5.0, 3.0]).unwrap();
        assert_eq!(c.coefficient, -1.0);
        assert_eq!(c.p_value, 0.0);
        assert_eq!(c.trend(), Trend::Negative);
    }

    #[test]
    fn permutation_of_pairs_leaves_coefficient_unchanged() {
        let xs = [0.0, 0.3346, 0.6679, 1.0, 0.5];
        let ys = [2.1, 1.7, 1.9, 0.4, 1.2];
        let a = pearson(&xs, &ys).unwrap();

        let order = [3, 0, 4, 2, 1];
        let px: Vec<f64> = order.iter().map(|&i| xs[i]).collect();
        let py: Vec<f64> = order.iter().map(|&i| ys[i]).collect();
        let b = pearson(&px, &py).unwrap();

        assert!((a.coefficient - b.coefficient).abs() < 1e-12);
        assert!((a.p_value - b.p_value).abs() < 1e-12);
    }

    #[test]
    fn results_stay_in_range() {
        let cases: [(&[f64], &[f64]); 3] = [
            (&[0.0, 0.33, 0.67, 1.0], &[0.9, 1.1, 0.8, 1.2]),
            (&[1.0, 2.0, 3.0], &[1e-9, 3e-9, 2e-9]),
            (&[0.1, 0.2, 0.3, 0.4, 0.5], &[5.0, 4.9, 5.2, 4.7, 4.8]),
        ];
        for (xs, ys) in cases {
            let c = pearson(xs, ys).unwrap();
            assert!((-1.0..=1.0).contains(&c.coefficient), "{c:?}");
            assert!((0.0..=1.0).contains(&c.p_value), "{c:?}");
        }
    }

    #[test]
    fn rejects_short_mismatched_and_constant_input() {
        assert_eq!(
            pearson(&[0.0, 1.0], &[1.0, 2.0]),
            Err(AnalysisError::InsufficientData { found: 2 })
        );
        assert_eq!(
            pearson(&[0.0, 0.5, 1.0], &[1.0, 2.0]),
            Err(AnalysisError::LengthMismatch { left: 3, right: 2 })
        );
        assert_eq!(
            pearson(&[0.0, 0.5, 1.0], &[1.0, 1.0, 1.0]),
            Err(AnalysisError::ZeroVariance)
        );
    }

    #[test]
    fn constant_input_with_inexact_mean_is_zero_variance() {
        // Mean of three 0.1s rounds to 0.10000000000000002.
        assert_eq!(
            pearson(&[0.0, 0.6679, 1.0], &[0.1, 0.1, 0.1]),
            Err(AnalysisError::ZeroVariance)
        );
        assert_eq!(
            pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 4.0]),
            Err(AnalysisError::ZeroVariance)
        );
    }

    #[test]
    fn trend_labels() {
        assert_eq!(Trend::Positive.to_string(), "Positive trend (+)");
        assert_eq!(Trend::Negative.as_str(), "negative");
        assert_eq!(Trend::NotSignificant.to_string(), "Trend not significant");
    }
}
