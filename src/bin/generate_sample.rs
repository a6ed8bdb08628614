//! Write a synthetic palm/canola dataset plus a matching `oil_spectra.json`.
//!
//! Usage: `generate_sample [output_dir]`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use oil_spectra::config::{Manifest, DEFAULT_MANIFEST};
use oil_spectra::data::loader::{TRANSMITTANCE_COLUMN, WAVENUMBER_COLUMN};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Transmittance trace: a flat baseline minus Gaussian absorption bands.
fn generate_spectrum(
    wavenumbers: &[f64],
    bands: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavenumbers
        .iter()
        .map(|&wn| {
            let absorbed: f64 = bands
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                .sum();
            95.0 - absorbed + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// FTIR bands `(centre, width, depth)` for a given canola fraction.
fn ftir_bands(canola: f64) -> Vec<(f64, f64, f64)> {
    vec![
        (3008.0, 6.0, 3.0 + 4.0 * canola),
        (2925.0, 15.0, 42.0),
        (2855.0, 10.0, 28.0 - 2.0 * canola),
        (1745.0, 10.0, 36.0),
        (1460.0, 10.0, 12.0 - 1.5 * canola),
        (1160.0, 15.0, 20.0 + 1.0 * canola),
        (722.0, 8.0, 8.0 + 2.5 * canola),
    ]
}

/// 1H-NMR peaks `(high δ, low δ, area)` before normalisation to 100%.
fn nmr_peaks(canola: f64) -> Vec<(f64, f64, f64)> {
    vec![
        (5.40, 5.28, 4.0 + 4.5 * canola),
        (4.32, 4.10, 4.0),
        (2.80, 2.72, 0.3 + 2.6 * canola),
        (2.36, 2.26, 6.0),
        (2.08, 1.96, 5.0 + 5.5 * canola),
        (1.66, 1.56, 6.0),
        (1.40, 1.20, 62.0 - 14.0 * canola),
        (0.99, 0.84, 9.0),
    ]
}

fn write_ftir(path: &Path, wavenumbers: &[f64], transmittance: &[f64]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record([WAVENUMBER_COLUMN, TRANSMITTANCE_COLUMN])?;
    for (x, y) in wavenumbers.iter().zip(transmittance) {
        wtr.write_record([format!("{x:.3}"), format!("{y:.4}")])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_nmr_raw(path: &Path, peaks: &[(f64, f64, f64)], rng: &mut SimpleRng) -> Result<()> {
    let total: f64 = peaks.iter().map(|p| p.2).sum();
    let mut text = String::from("Peak    Range(High)    Range(Low)    Area(%)\n");
    for (i, &(high, low, area)) in peaks.iter().enumerate() {
        let jitter = rng.gauss(0.0, 0.004);
        text.push_str(&format!(
            "{:>4}    {:>8.3}    {:>8.3}    {:>8.3}\n",
            i + 1,
            high + jitter,
            low + jitter,
            100.0 * area / total
        ));
    }
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let manifest = Manifest::default().with_base_dir(&out_dir);
    let mut rng = SimpleRng::new(42);

    // Wavenumbers: 4000 → 600, descending like the instrument scan
    let wavenumbers: Vec<f64> = (0..1764).map(|i| 4000.0 - i as f64 * 1.928).collect();

    let mut written = 0;
    if let Some(ftir) = &manifest.ftir {
        for s in &ftir.samples {
            let canola = s.composition.fraction()?;
            let y = generate_spectrum(&wavenumbers, &ftir_bands(canola), 0.08, &mut rng);
            let path = manifest.resolve(&s.file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            write_ftir(&path, &wavenumbers, &y)?;
            written += 1;
        }
    }
    if let Some(nmr) = &manifest.nmr {
        for s in &nmr.samples {
            let Some(raw) = &s.raw_file else { continue };
            let canola = s.composition.fraction()?;
            let path = manifest.resolve(raw);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            write_nmr_raw(&path, &nmr_peaks(canola), &mut rng)?;
            written += 1;
        }
    }

    let manifest_path = out_dir.join(DEFAULT_MANIFEST);
    manifest.save(&manifest_path)?;

    println!(
        "Wrote {written} instrument files and {} under {}",
        DEFAULT_MANIFEST,
        out_dir.display()
    );
    Ok(())
}
