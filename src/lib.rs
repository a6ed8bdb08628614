//! Peak extraction and composition correlation for FTIR and 1H-NMR spectra of
//! cooking-oil blends.
//!
//! ```text
//!  manifest.json ──► config ──► data::loader ──► SampleSet
//!                                                   │
//!                         analysis::peaks / nmr ◄───┘
//!                                   │
//!                        analysis::correlation
//!                                   │
//!                                report ──► *.csv
//! ```

pub mod analysis;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;

pub use error::AnalysisError;
