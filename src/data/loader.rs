use std::io;
use std::path::Path;

use arrow::array::{Array, ArrayRef, Float32Array, Float64Array};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::CrossSectionTable;
use crate::error::{Error, Result};

/// Extensions recognised as cross-section tables, in lookup order.
pub const TABLE_EXTENSIONS: &[&str] = &["csv", "json", "parquet"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a cross-section table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – two numeric columns (energy in eV, sigma in barns), optional header row
/// * `.json`    – `{ "energy_eV": [...], "sigma_b": [...] }`
/// * `.parquet` – two Float64/Float32 columns, energy first
pub fn load_cross_section_table(path: &Path) -> Result<CrossSectionTable> {
    if !path.is_file() {
        return Err(Error::not_found(path));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(Error::malformed(
            path,
            format!("unsupported table extension: .{other}"),
        )),
    }?;

    log::debug!(
        "loaded {} cross-section samples from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

fn open_error(path: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::not_found(path)
    } else {
        Error::from(e)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: exactly two columns, energy (eV) then sigma (barns).
/// A first row whose energy cell is not numeric is treated as the header
/// (`E_eV,Sig_b` in the evaluated-library exports).
fn load_csv(path: &Path) -> Result<CrossSectionTable> {
    let file = std::fs::File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut energy = Vec::new();
    let mut sigma = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| Error::malformed(path, format!("CSV row {row_no}: {e}")))?;

        if record.len() != 2 {
            return Err(Error::malformed(
                path,
                format!("CSV row {row_no}: expected 2 columns, found {}", record.len()),
            ));
        }

        let e_cell = record.get(0).unwrap_or("");
        let s_cell = record.get(1).unwrap_or("");

        if row_no == 0 && e_cell.parse::<f64>().is_err() {
            continue;
        }

        energy.push(parse_cell(path, e_cell, row_no, "energy")?);
        sigma.push(parse_cell(path, s_cell, row_no, "sigma")?);
    }

    CrossSectionTable::from_columns(path, energy, sigma)
}

fn parse_cell(path: &Path, cell: &str, row: usize, col: &str) -> Result<f64> {
    cell.parse::<f64>().map_err(|_| {
        Error::malformed(path, format!("row {row}, {col}: '{cell}' is not a number"))
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// { "energy_eV": [1.0e-5, 2.0e-5, ...], "sigma_b": [120.3, 119.8, ...] }
/// ```
fn load_json(path: &Path) -> Result<CrossSectionTable> {
    let text = std::fs::read_to_string(path).map_err(|e| open_error(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| Error::malformed(path, format!("parsing JSON: {e}")))?;

    let obj = root
        .as_object()
        .ok_or_else(|| Error::malformed(path, "expected top-level JSON object"))?;

    if let Some(extra) = obj.keys().find(|k| *k != "energy_eV" && *k != "sigma_b") {
        return Err(Error::malformed(path, format!("unexpected column '{extra}'")));
    }

    let energy = json_array_to_f64(path, obj.get("energy_eV"), "energy_eV")?;
    let sigma = json_array_to_f64(path, obj.get("sigma_b"), "sigma_b")?;

    CrossSectionTable::from_columns(path, energy, sigma)
}

fn json_array_to_f64(path: &Path, val: Option<&JsonValue>, col: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::malformed(path, format!("missing or invalid '{col}' array")))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .ok_or_else(|| Error::malformed(path, format!("{col}[{j}]: not a number")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet table.
///
/// Expected schema: exactly two Float64 (or Float32) columns, energy first.
/// Column names are not interpreted.
fn load_parquet(path: &Path) -> Result<CrossSectionTable> {
    let file = std::fs::File::open(path).map_err(|e| open_error(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::malformed(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| Error::malformed(path, format!("building parquet reader: {e}")))?;

    let mut energy = Vec::new();
    let mut sigma = Vec::new();

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| Error::malformed(path, format!("reading parquet record batch: {e}")))?;

        if batch.num_columns() != 2 {
            return Err(Error::malformed(
                path,
                format!("expected 2 columns, found {}", batch.num_columns()),
            ));
        }

        energy.extend(
            extract_f64_column(batch.column(0))
                .map_err(|d| Error::malformed(path, format!("energy column: {d}")))?,
        );
        sigma.extend(
            extract_f64_column(batch.column(1))
                .map_err(|d| Error::malformed(path, format!("sigma column: {d}")))?,
        );
    }

    CrossSectionTable::from_columns(path, energy, sigma)
}

// -- Parquet / Arrow helpers --

/// Extract a `Vec<f64>` from a Float64 or Float32 column. Nulls become NaN
/// and are rejected by the table invariants.
fn extract_f64_column(col: &ArrayRef) -> std::result::Result<Vec<f64>, String> {
    if let Some(f64_arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr
            .iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect())
    } else {
        Err(format!(
            "column type is {:?}, expected Float64 or Float32",
            col.data_type()
        ))
    }
}
