//! Headless run: load the manifest, correlate, write the CSV reports.
//!
//! Usage: `analyze [manifest.json]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use oil_spectra::config::Manifest;
use oil_spectra::pipeline;

fn run() -> Result<()> {
    let manifest_path = std::env::args_os().nth(1).map(PathBuf::from);
    let manifest = Manifest::discover(manifest_path.as_deref())?;

    let analysis = pipeline::run(&manifest)?;
    for table in analysis.tables() {
        for row in table.significant_only().rows {
            let r = row.correlation.map_or(f64::NAN, |c| c.coefficient);
            log::info!(
                "{} peak {} ({}, {}): {} (r = {r:.3})",
                table.technique.name(),
                row.number,
                row.range,
                row.label,
                row.trend.as_str()
            );
        }
    }

    for path in analysis.write_reports(&manifest)? {
        println!("{}", path.display());
    }
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
