use thiserror::Error;

/// Failures of the analysis core. All of them point at a window configuration
/// or input data problem; none is recoverable within a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no data points between {low} and {high}")]
    EmptyRange { low: f64, high: f64 },

    #[error("reference peak '{window}' has zero height")]
    DivideByZero { window: String },

    #[error("correlation needs at least 3 paired observations, got {found}")]
    InsufficientData { found: usize },

    #[error("paired sequences differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("correlation undefined for a constant sequence")]
    ZeroVariance,

    #[error("sample '{sample}' has {found} peaks, expected {expected}")]
    InconsistentPeakCount {
        sample: String,
        expected: usize,
        found: usize,
    },

    #[error("no peak windows configured")]
    NoWindows,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
