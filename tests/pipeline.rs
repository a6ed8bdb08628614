use std::fs;
use std::path::{Path, PathBuf};

use oil_spectra::analysis::correlation::Trend;
use oil_spectra::config::Manifest;
use oil_spectra::pipeline;
use oil_spectra::report::Technique;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("oil-spectra-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Baseline 100, a band at 2950 deepening with `fraction`, an irregular band
/// at 1750 and a fixed anchor band at 1100.
fn write_ftir(dir: &Path, name: &str, fraction: f64, carbonyl: f64) {
    let c_h = 10.0 + 30.0 * fraction;
    let rows = [
        (4000.0, 100.0),
        (2950.0, 100.0 - c_h),
        (2900.0, 99.0),
        (1750.0, 100.0 - carbonyl),
        (1700.0, 99.0),
        (1100.0, 50.0),
        (1000.0, 100.0),
    ];
    let mut text = String::from("Wavenumber,Percent Transmittance\n");
    for (x, y) in rows {
        text.push_str(&format!("{x},{y}\n"));
    }
    fs::write(dir.join(format!("{name}.csv")), text).unwrap();
}

fn write_nmr_raw(dir: &Path, name: &str, areas: [f64; 2]) {
    let text = format!(
        "Peak  Range-High  Range-Low  Area\n\
         1     5.40        5.28       {}\n\
         2     1.40        1.20       {}\n",
        areas[0], areas[1]
    );
    fs::write(dir.join(format!("RawText_{name}.txt")), text).unwrap();
}

fn setup(dir: &Path) -> Manifest {
    write_ftir(dir, "CO", 1.0, 22.0);
    write_ftir(dir, "PO", 0.0, 20.0);
    write_ftir(dir, "MixA", 1.0 / 3.0, 25.0);
    write_ftir(dir, "MixB", 2.0 / 3.0, 18.0);

    write_nmr_raw(dir, "PO", [10.0, 90.0]);
    write_nmr_raw(dir, "Mix", [20.0, 80.0]);
    write_nmr_raw(dir, "CO", [30.0, 70.0]);

    let json = r##"{
        "reference_oil": "CO",
        "output_dir": "out",
        "ftir": {
            "medium": "KBr, liquid",
            "windows": [
                { "low": 2850, "high": 3050, "label": "C-H Stretch" },
                { "low": 1650, "high": 1850, "label": "C=O Stretch" },
                { "low": 1050, "high": 1250, "label": "Anchor" }
            ],
            "samples": [
                { "file": "CO.csv", "short_name": "CO", "full_name": "Canola Oil",
                  "color": "#80ba06", "composition": { "fraction": 1.0 } },
                { "file": "PO.csv", "short_name": "PO", "full_name": "Peanut Oil",
                  "composition": { "fraction": 0.0 } },
                { "file": "MixB.csv", "short_name": "2C:1P",
                  "composition": { "reference": 1.0, "other": 0.5 } },
                { "file": "MixA.csv", "short_name": "1C:2P",
                  "composition": { "reference": 0.5, "other": 1.0 } }
            ]
        },
        "nmr": {
            "labels": ["Olefinic", "Methylene"],
            "samples": [
                { "file": "CO_nmr.csv", "raw_file": "RawText_CO.txt",
                  "short_name": "CO", "composition": { "fraction": 1.0 } },
                { "file": "PO_nmr.csv", "raw_file": "RawText_PO.txt",
                  "short_name": "PO", "composition": { "fraction": 0.0 } },
                { "file": "Mix_nmr.csv", "raw_file": "RawText_Mix.txt",
                  "short_name": "1C:1P", "composition": { "fraction": 0.5 } }
            ]
        }
    }"##;
    let path = dir.join("oil_spectra.json");
    fs::write(&path, json).unwrap();
    Manifest::load(&path).unwrap()
}

#[test]
fn full_run_writes_consistent_reports() {
    let dir = scratch_dir("pipeline");
    let manifest = setup(&dir);

    assert_eq!(pipeline::cleanup_nmr(&manifest).unwrap(), 3);
    assert!(dir.join("PO_nmr.csv").is_file());

    let analysis = pipeline::run(&manifest).unwrap();

    // FTIR: samples ordered by fraction, one peak per window.
    let ftir = analysis.ftir.as_ref().unwrap();
    let fractions = ftir.samples.fractions();
    assert_eq!(fractions.len(), 4);
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(ftir.samples.get(0).unwrap().meta.short_name, "PO");
    for s in &ftir.samples {
        assert_eq!(s.peaks.len(), 3);
        assert_eq!(s.peaks[0].wavenumber, 2950.0);
        assert_eq!(s.peaks[2].relative_height, 1.0);
    }

    let rows = &ftir.table.rows;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].trend, Trend::Positive);
    assert!(rows[0].significant);
    assert!(rows[0].correlation.unwrap().coefficient > 0.999);
    // Constant anchor row carries no correlation.
    assert!(rows[2].correlation.is_none());
    assert!(!rows[2].significant);

    // NMR: two groups, one rising and one falling with the reference fraction.
    let nmr = analysis.nmr.as_ref().unwrap();
    assert_eq!(nmr.groups.len(), 2);
    assert_eq!(nmr.groups[0].areas, vec![10.0, 20.0, 30.0]);
    assert_eq!(nmr.groups[0].range_label(), "5.28-5.40");
    assert_eq!(nmr.table.rows[0].label, "Olefinic");
    assert_eq!(nmr.table.rows[0].trend, Trend::Positive);
    assert_eq!(nmr.table.rows[1].trend, Trend::Negative);

    let written = analysis.write_reports(&manifest).unwrap();
    assert_eq!(written.len(), 4);
    let out = dir.join("out");
    for technique in [Technique::Ftir, Technique::Nmr] {
        assert!(written.contains(&out.join(technique.all_peaks_file())));
    }

    // Significant-only rows are a subset of all rows, in the same order.
    for table in analysis.tables() {
        let all = fs::read_to_string(out.join(table.technique.all_peaks_file())).unwrap();
        let sig = fs::read_to_string(out.join(table.technique.significant_peaks_file())).unwrap();
        let all_lines: Vec<&str> = all.lines().collect();
        let sig_lines: Vec<&str> = sig.lines().collect();
        assert_eq!(all_lines[0], sig_lines[0]);
        assert_eq!(all_lines.len(), table.rows.len() + 1);
        let mut cursor = all_lines.iter();
        for line in &sig_lines[1..] {
            assert!(cursor.any(|l| l == line), "{line} not in all-peaks report");
            assert!(line.contains(",True,"));
        }
    }

    let ftir_all = fs::read_to_string(out.join(Technique::Ftir.all_peaks_file())).unwrap();
    let header = ftir_all.lines().next().unwrap();
    assert!(header.starts_with("Peak Number,Peak Range (cm⁻¹),Type of Vibration"));
    assert!(header.contains("Relative Height in PO (0.0% CO)"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn mismatched_nmr_peak_counts_fail_the_run() {
    let dir = scratch_dir("nmr-mismatch");
    let manifest = setup(&dir);
    pipeline::cleanup_nmr(&manifest).unwrap();

    fs::write(
        dir.join("Mix_nmr.csv"),
        "Peak Number,Range High δ,Range Low δ,%Peak Area\n1,5.40,5.28,100\n",
    )
    .unwrap();

    let err = pipeline::run(&manifest).unwrap_err();
    assert!(format!("{err:#}").contains("1H-NMR"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_window_names_the_sample() {
    let dir = scratch_dir("empty-window");
    let manifest = setup(&dir);
    // No points between 1650 and 1850.
    fs::write(
        dir.join("MixB.csv"),
        "Wavenumber,Percent Transmittance\n4000,100\n2950,70\n1100,50\n1000,100\n",
    )
    .unwrap();

    let err = format!("{:#}", pipeline::run(&manifest).unwrap_err());
    assert!(err.contains("2C:1P"), "{err}");
    assert!(err.contains("1650"), "{err}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_spectrum_names_the_sample() {
    let dir = scratch_dir("missing");
    let manifest = setup(&dir);
    fs::remove_file(dir.join("MixA.csv")).unwrap();

    let err = pipeline::run(&manifest).unwrap_err();
    assert!(format!("{err:#}").contains("1C:2P"));

    let _ = fs::remove_dir_all(&dir);
}
