/// Feature extraction and correlation.
///
/// ```text
///   SampleSet<FtirSample> ──► peaks ──┐
///                                     ├──► correlation ──► report
///   SampleSet<NmrSample>  ──► nmr  ───┘
/// ```

pub mod correlation;
pub mod nmr;
pub mod peaks;
pub mod window;
