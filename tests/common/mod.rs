use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use reso_core::{Catalog, Database};

pub const ENERGIES: &[f64] = &[1e-5, 0.5, 1.0, 5.0, 10.0, 50.0, 100.0, 1000.0, 3000.0];

/// Flat cross-section of `A / 10` barns.
pub fn flat_sigma(mass_number: u32) -> f64 {
    mass_number as f64 / 10.0
}

fn write_csv(dir: &Path, element: &str, mass_number: u32) {
    let mut text = String::from("E_eV,Sig_b\n");
    for e in ENERGIES {
        text.push_str(&format!("{e},{}\n", flat_sigma(mass_number)));
    }
    fs::write(dir.join(format!("{element}-{mass_number}.csv")), text).unwrap();
}

fn write_parquet(dir: &Path, element: &str, mass_number: u32) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("E_eV", DataType::Float64, false),
        Field::new("Sig_b", DataType::Float64, false),
    ]));
    let sigma = vec![flat_sigma(mass_number); ENERGIES.len()];
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(ENERGIES.to_vec())),
            Arc::new(Float64Array::from(sigma)),
        ],
    )
    .unwrap();
    let file = fs::File::create(dir.join(format!("{element}-{mass_number}.parquet"))).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

/// Ag and Co as CSV, Gd as parquet, under `ENDF_VIII`.
pub fn reference_database() -> (TempDir, Catalog) {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("ENDF_VIII");
    fs::create_dir_all(&dir).unwrap();
    for a in [107, 109, 110, 111] {
        write_csv(&dir, "Ag", a);
    }
    write_csv(&dir, "Co", 59);
    for a in [152, 154, 155, 156, 157, 158, 160] {
        write_parquet(&dir, "Gd", a);
    }
    let catalog = Catalog::open(root.path(), Database::EndfViii).unwrap();
    (root, catalog)
}
