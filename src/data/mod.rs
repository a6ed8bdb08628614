/// Data layer: sample types, loading, and raw-text cleanup.
///
/// Architecture:
/// ```text
///  RawText_*.txt            FTIR_*.csv / .parquet     1H-NMR_*.csv
///        │                          │                       │
///        ▼                          │                       │
///   ┌──────────┐                    │                       │
///   │ cleanup  │ ── 1H-NMR_*.csv ───┼──────────────────────►│
///   └──────────┘                    ▼                       ▼
///                             ┌──────────┐            ┌──────────┐
///                             │  loader  │            │  loader  │
///                             └──────────┘            └──────────┘
///                                   │                       │
///                                   ▼                       ▼
///                         SampleSet<FtirSample>    SampleSet<NmrSample>
/// ```

pub mod cleanup;
pub mod loader;
pub mod model;
