use std::path::Path;

use anyhow::{Context, Result};

use super::loader::NMR_COLUMNS;

/// Convert a raw, space-aligned 1H-NMR peak listing into CSV.
///
/// The instrument header line is replaced by [`NMR_COLUMNS`]; every other
/// non-blank line has its whitespace-separated fields joined with commas.
pub fn normalize_nmr_text(raw: &str) -> String {
    let mut out = NMR_COLUMNS.join(",");
    out.push('\n');
    for line in raw.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Read `src`, normalise it and write the CSV to `dst`.
pub fn cleanup_file(src: &Path, dst: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(src)
        .with_context(|| format!("reading raw NMR text {}", src.display()))?;
    let csv = normalize_nmr_text(&raw);
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(dst, csv).with_context(|| format!("writing {}", dst.display()))?;
    log::info!("Converted {} -> {}", src.display(), dst.display());
    Ok(())
}
