use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::window::{default_ftir_windows, PeakWindow, PeakWindowSet};
use crate::color;
use crate::data::model::SampleMeta;

/// Manifest picked up from the working directory when no path is given.
pub const DEFAULT_MANIFEST: &str = "oil_spectra.json";

// ---------------------------------------------------------------------------
// Manifest – what to load, how to label it, where to write
// ---------------------------------------------------------------------------

/// Analysis manifest. Relative paths resolve against the manifest's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Short name of the oil whose mass fraction is correlated against.
    #[serde(default = "default_reference_oil")]
    pub reference_oil: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub ftir: Option<FtirConfig>,
    #[serde(default)]
    pub nmr: Option<NmrConfig>,
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtirConfig {
    #[serde(default = "default_ftir_medium")]
    pub medium: String,
    #[serde(default = "default_ftir_windows")]
    pub windows: Vec<PeakWindow>,
    /// Index of the normalisation window; the last window when absent.
    #[serde(default)]
    pub reference_window: Option<usize>,
    pub samples: Vec<SampleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NmrConfig {
    #[serde(default)]
    pub medium: String,
    /// Optional assignment per peak group, by position.
    #[serde(default)]
    pub labels: Vec<String>,
    pub samples: Vec<SampleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Instrument output (FTIR spectrum or cleaned NMR peak table).
    pub file: PathBuf,
    /// Raw NMR text that `nmr_cleanup` converts into `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_file: Option<PathBuf>,
    pub short_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub composition: Composition,
}

/// Sample composition, either given directly or from weighed masses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Composition {
    Fraction { fraction: f64 },
    /// Mass of the reference oil and of the other oil.
    Masses { reference: f64, other: f64 },
}

impl Composition {
    /// Mass fraction of the reference oil, checked to lie in [0, 1].
    pub fn fraction(&self) -> Result<f64> {
        let fraction = match *self {
            Composition::Fraction { fraction } => fraction,
            Composition::Masses { reference, other } => {
                if reference < 0.0 || other < 0.0 || reference + other <= 0.0 {
                    bail!("invalid masses {reference} / {other}");
                }
                reference / (reference + other)
            }
        };
        if !(0.0..=1.0).contains(&fraction) {
            bail!("composition fraction {fraction} outside [0, 1]");
        }
        Ok(fraction)
    }
}

fn default_reference_oil() -> String {
    "CO".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Program Output Files")
}

fn default_ftir_medium() -> String {
    "KBr, liquid".to_string()
}

impl Manifest {
    /// Read a manifest from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let mut manifest: Manifest = serde_json::from_str(&text)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        log::info!("Loaded manifest {}", path.display());
        Ok(manifest)
    }

    /// `explicit` if given, else [`DEFAULT_MANIFEST`] in the working
    /// directory if it exists, else the built-in dataset.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = Path::new(DEFAULT_MANIFEST);
        if local.is_file() {
            return Self::load(local);
        }
        log::info!("No {DEFAULT_MANIFEST} found, using the built-in dataset layout");
        Ok(Self::default())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serialising manifest")?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.resolve(&self.output_dir).join(file_name)
    }
}

impl FtirConfig {
    pub fn window_set(&self) -> Result<PeakWindowSet> {
        let windows = self.windows.clone();
        let set = match self.reference_window {
            Some(idx) => PeakWindowSet::with_reference(windows, idx),
            None => PeakWindowSet::new(windows),
        };
        set.context("FTIR window configuration")
    }
}

/// Build sample metadata for a list of sample configs, generating missing colours.
pub fn sample_metas(samples: &[SampleConfig], medium: &str) -> Result<Vec<SampleMeta>> {
    let configured: Vec<Option<String>> = samples.iter().map(|s| s.color.clone()).collect();
    let colors = color::resolve_colors(&configured)?;
    samples
        .iter()
        .zip(colors)
        .map(|(s, color)| {
            let fraction = s
                .composition
                .fraction()
                .with_context(|| format!("sample '{}'", s.short_name))?;
            let full_name = if s.full_name.is_empty() {
                s.short_name.clone()
            } else {
                s.full_name.clone()
            };
            Ok(SampleMeta {
                short_name: s.short_name.clone(),
                full_name,
                medium: medium.to_string(),
                color,
                fraction,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Built-in dataset: palm oil, canola oil and their 1:2 / 2:1 blends
// ---------------------------------------------------------------------------

const FTIR_DIR: &str = "Instrument Output Files/FTIR Instrument Outputs";
const NMR_DIR: &str = "Instrument Output Files/1H-NMR Instrument Outputs";

fn sample(
    dir: &str,
    file: &str,
    short_name: &str,
    full_name: &str,
    color: &str,
    composition: Composition,
) -> SampleConfig {
    SampleConfig {
        file: Path::new(dir).join(format!("{file}.csv")),
        raw_file: None,
        short_name: short_name.to_string(),
        full_name: full_name.to_string(),
        color: Some(color.to_string()),
        composition,
    }
}

fn nmr_sample(file: &str, short_name: &str, full_name: &str, color: &str, c: Composition) -> SampleConfig {
    SampleConfig {
        raw_file: Some(Path::new(NMR_DIR).join(format!("RawText_{file}.txt"))),
        ..sample(NMR_DIR, file, short_name, full_name, color, c)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        let palm = Composition::Fraction { fraction: 0.0 };
        let canola = Composition::Fraction { fraction: 1.0 };
        let one_to_two = Composition::Masses {
            reference: 0.5046,
            other: 1.0088,
        };
        let two_to_one = Composition::Masses {
            reference: 1.0308,
            other: 0.5125,
        };

        let ftir = FtirConfig {
            medium: default_ftir_medium(),
            windows: default_ftir_windows(),
            reference_window: None,
            samples: vec![
                sample(FTIR_DIR, "FTIR_PalmOil", "PO", "Palm Oil", "#f34f1c", palm.clone()),
                sample(
                    FTIR_DIR,
                    "FTIR_1Canola_2Palm_Mixture",
                    "1C:2P",
                    "1:2 Mixture of Canola and Palm Oils",
                    "#5284bd",
                    one_to_two,
                ),
                sample(
                    FTIR_DIR,
                    "FTIR_2Canola_1Palm_Mixture",
                    "2C:1P",
                    "2:1 Mixture of Canola and Palm Oils",
                    "#dba207",
                    two_to_one.clone(),
                ),
                sample(FTIR_DIR, "FTIR_CanolaOil", "CO", "Canola Oil", "#80ba06", canola.clone()),
            ],
        };

        let nmr = NmrConfig {
            medium: String::new(),
            labels: Vec::new(),
            samples: vec![
                nmr_sample("1H-NMR_PalmOil", "PO", "Palm Oil", "#f34f1c", palm),
                nmr_sample(
                    "1H-NMR_2Canola_1Palm_Mixture",
                    "2C:1P",
                    "2:1 Mixture of Canola and Palm Oils",
                    "#ffba01",
                    two_to_one,
                ),
                nmr_sample("1H-NMR_CanolaOil", "CO", "Canola Oil", "#7fbc00", canola),
            ],
        };

        Manifest {
            reference_oil: default_reference_oil(),
            output_dir: default_output_dir(),
            ftir: Some(ftir),
            nmr: Some(nmr),
            base_dir: PathBuf::new(),
        }
    }
}
