use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{IntegratedPeak, Spectrum};

pub const WAVENUMBER_COLUMN: &str = "Wavenumber";
pub const TRANSMITTANCE_COLUMN: &str = "Percent Transmittance";

/// Header of a cleaned 1H-NMR peak table, in file order.
pub const NMR_COLUMNS: [&str; 4] = ["Peak Number", "Range High δ", "Range Low δ", "%Peak Area"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an FTIR spectrum from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – `Wavenumber` and `Percent Transmittance` columns, one point per row
/// * `.parquet` – the same two columns as scalar Float64 or Float32
pub fn load_spectrum(path: &Path) -> Result<Spectrum> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let spectrum = match ext.as_str() {
        "csv" => load_spectrum_csv(path),
        "parquet" | "pq" => load_spectrum_parquet(path),
        other => bail!("Unsupported spectrum file extension: .{other}"),
    }
    .with_context(|| format!("loading spectrum {}", path.display()))?;

    if !spectrum.is_monotonic() {
        log::warn!(
            "{}: wavenumbers are not monotonic in scan order",
            path.display()
        );
    }
    log::info!("Loaded {} points from {}", spectrum.len(), path.display());
    Ok(spectrum)
}

/// Load a cleaned 1H-NMR peak table (see [`super::cleanup`]).
pub fn load_nmr_peaks(path: &Path) -> Result<Vec<IntegratedPeak>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening NMR table {}", path.display()))?;
    let peaks = read_nmr_peaks(reader)
        .with_context(|| format!("reading NMR table {}", path.display()))?;
    log::info!("Loaded {} NMR peaks from {}", peaks.len(), path.display());
    Ok(peaks)
}

// ---------------------------------------------------------------------------
// CSV readers
// ---------------------------------------------------------------------------

fn load_spectrum_csv(path: &Path) -> Result<Spectrum> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_spectrum_csv(reader)
}

/// Parse an FTIR CSV. Columns other than wavenumber and transmittance are ignored.
pub fn read_spectrum_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Spectrum> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let x_idx = column_index(&headers, WAVENUMBER_COLUMN)?;
    let y_idx = column_index(&headers, TRANSMITTANCE_COLUMN)?;

    let mut x = Vec::new();
    let mut y = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        x.push(parse_cell(record.get(x_idx), row_no, WAVENUMBER_COLUMN)?);
        y.push(parse_cell(record.get(y_idx), row_no, TRANSMITTANCE_COLUMN)?);
    }

    Spectrum::new(x, y)
}

/// Parse a cleaned NMR peak table.
pub fn read_nmr_peaks<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<IntegratedPeak>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let [number_col, high_col, low_col, area_col] = NMR_COLUMNS;
    let number_idx = column_index(&headers, number_col)?;
    let high_idx = column_index(&headers, high_col)?;
    let low_idx = column_index(&headers, low_col)?;
    let area_idx = column_index(&headers, area_col)?;

    let mut peaks = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let number = parse_cell(record.get(number_idx), row_no, number_col)?;
        if number < 0.0 || number.fract() != 0.0 {
            bail!("Row {row_no}, {number_col}: '{number}' is not a peak number");
        }
        peaks.push(IntegratedPeak {
            number: number as u32,
            shift_high: parse_cell(record.get(high_idx), row_no, high_col)?,
            shift_low: parse_cell(record.get(low_idx), row_no, low_col)?,
            area_percent: parse_cell(record.get(area_idx), row_no, area_col)?,
        });
    }

    if peaks.is_empty() {
        bail!("NMR table has no peaks");
    }
    Ok(peaks)
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("CSV missing '{name}' column"))
}

fn parse_cell(cell: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let tok = cell.unwrap_or("").trim();
    tok.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{tok}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one spectrum point per row.
///
/// Expected schema:
/// - `Wavenumber`: Float64 or Float32
/// - `Percent Transmittance`: Float64 or Float32
/// - Any other columns are ignored
fn load_spectrum_parquet(path: &Path) -> Result<Spectrum> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut x = Vec::new();
    let mut y = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let x_idx = schema
            .index_of(WAVENUMBER_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{WAVENUMBER_COLUMN}' column"))?;
        let y_idx = schema
            .index_of(TRANSMITTANCE_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{TRANSMITTANCE_COLUMN}' column"))?;

        extend_f64(&mut x, batch.column(x_idx)).context(WAVENUMBER_COLUMN)?;
        extend_f64(&mut y, batch.column(y_idx)).context(TRANSMITTANCE_COLUMN)?;
    }

    Spectrum::new(x, y)
}

/// Append a Float64 or Float32 column to `out`. Nulls are rejected.
fn extend_f64(out: &mut Vec<f64>, col: &Arc<dyn Array>) -> Result<()> {
    if col.null_count() > 0 {
        bail!("column contains {} null values", col.null_count());
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            out.extend(arr.values().iter().copied());
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            out.extend(arr.values().iter().map(|&v| v as f64));
        }
        other => bail!("Expected Float64 or Float32 column, got {other:?}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes())
    }

    #[test]
    fn reads_ftir_csv_and_ignores_extra_columns() {
        let text = "Index,Wavenumber,Percent Transmittance\n0,4000.5,92.1\n1,3998.6,91.7\n";
        let sp = read_spectrum_csv(csv_reader(text)).unwrap();
        assert_eq!(sp.x, vec![4000.5, 3998.6]);
        assert_eq!(sp.y, vec![92.1, 91.7]);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_spectrum_csv(csv_reader("Wavenumber,T\n1,2\n")).unwrap_err();
        assert!(format!("{err:#}").contains("Percent Transmittance"));
    }

    #[test]
    fn bad_number_names_row_and_column() {
        let text = "Wavenumber,Percent Transmittance\n4000,abc\n";
        let err = read_spectrum_csv(csv_reader(text)).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Row 0"), "{msg}");
        assert!(msg.contains("abc"), "{msg}");
    }

    #[test]
    fn reads_cleaned_nmr_table_with_trailing_delimiter() {
        let text = "Peak Number,Range High δ,Range Low δ,%Peak Area,\n\
                    1,5.40,5.28,4.67\n\
                    2,4.32,4.10,3.02\n";
        let peaks = read_nmr_peaks(csv_reader(text)).unwrap();
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].number, 1);
        assert_eq!(peaks[1].shift_low, 4.10);
        assert_eq!(peaks[1].area_percent, 3.02);
    }

    #[test]
    fn rejects_empty_nmr_table() {
        let text = "Peak Number,Range High δ,Range Low δ,%Peak Area\n";
        assert!(read_nmr_peaks(csv_reader(text)).is_err());
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        assert!(load_spectrum(Path::new("spectrum.txt")).is_err());
    }

    #[test]
    fn reads_parquet_spectrum() {
        let dir = std::env::temp_dir().join(format!("oil-spectra-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ftir.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(WAVENUMBER_COLUMN, DataType::Float64, false),
            Field::new(TRANSMITTANCE_COLUMN, DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![3000.0, 2000.0, 1000.0])),
                Arc::new(Float32Array::from(vec![90.0_f32, 45.5, 80.0])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let sp = load_spectrum(&path).unwrap();
        assert_eq!(sp.x, vec![3000.0, 2000.0, 1000.0]);
        assert_eq!(sp.y, vec![90.0, 45.5, 80.0]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
