//! Convert raw 1H-NMR peak listings into the CSV tables the analysis reads.
//!
//! Usage: `nmr_cleanup [manifest.json]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use oil_spectra::config::Manifest;
use oil_spectra::pipeline;

fn run() -> Result<()> {
    let manifest_path = std::env::args_os().nth(1).map(PathBuf::from);
    let manifest = Manifest::discover(manifest_path.as_deref())?;
    let converted = pipeline::cleanup_nmr(&manifest)?;
    println!("Converted {converted} NMR file(s)");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
