//! Writes a synthetic reference database for trying out the library
//! without evaluated nuclear data.
//!
//! Every natural isotope of each element gets a table with a 1/v term, a
//! flat potential-scattering floor and a few Lorentzian resonances placed
//! by mass number.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::{Parser, ValueEnum};
use parquet::arrow::ArrowWriter;

use reso_core::data::nuclides;
use reso_core::Database;

const DEFAULT_ELEMENTS: &[&str] = &["Ag", "Co", "C", "Eu", "Gd", "U"];
const E_MIN: f64 = 1e-5;
const E_MAX: f64 = 3000.0;
const SAMPLES: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Parquet,
}

#[derive(Parser)]
#[command(
    name = "generate-database",
    about = "Write a synthetic neutron cross-section reference database",
    version
)]
struct Cli {
    /// Reference root; tables go to <ROOT>/<DATABASE>/
    #[arg(value_name = "ROOT", default_value = "reference_data")]
    root: PathBuf,

    /// Evaluated library directory name
    #[arg(long, value_name = "NAME", default_value = "ENDF_VIII")]
    database: Database,

    /// Table file format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Element symbols to generate (defaults to Ag Co C Eu Gd U)
    #[arg(value_name = "ELEMENT", num_args = 0.., trailing_var_arg = true)]
    elements: Vec<String>,
}

impl Cli {
    fn elements(&self) -> Vec<String> {
        if self.elements.is_empty() {
            DEFAULT_ELEMENTS.iter().map(|s| s.to_string()).collect()
        } else {
            self.elements.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Synthetic cross-sections
// ---------------------------------------------------------------------------

fn log_energies() -> Vec<f64> {
    let (lo, hi) = (E_MIN.log10(), E_MAX.log10());
    let mut energies: Vec<f64> = (0..SAMPLES)
        .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / (SAMPLES - 1) as f64))
        .collect();
    energies[0] = E_MIN;
    energies[SAMPLES - 1] = E_MAX;
    energies
}

fn lorentzian(e: f64, center: f64, width: f64, peak: f64) -> f64 {
    let half = width / 2.0;
    peak * half * half / ((e - center).powi(2) + half * half)
}

fn synthetic_sigma(mass_number: u32, energies: &[f64]) -> Vec<f64> {
    let a = mass_number as f64;
    let potential = 4.0 + a / 50.0;
    let thermal = 10.0 + (mass_number % 13) as f64 * 5.0;
    let base = 2.5 * ((mass_number % 7) + 1) as f64;
    let resonances: Vec<(f64, f64, f64)> = (1..=3)
        .map(|k| {
            let k = k as f64;
            (base * k * k, 0.05 * k, 500.0 / k)
        })
        .collect();

    energies
        .iter()
        .map(|&e| {
            let one_over_v = thermal * (0.0253 / e).sqrt();
            let peaks: f64 = resonances
                .iter()
                .map(|&(center, width, peak)| lorentzian(e, center, width, peak))
                .sum();
            potential + one_over_v + peaks
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_csv(path: &Path, energies: &[f64], sigma: &[f64]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["E_eV", "Sig_b"])?;
    for (e, s) in energies.iter().zip(sigma) {
        writer.write_record([e.to_string(), s.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, energies: &[f64], sigma: &[f64]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("E_eV", DataType::Float64, false),
        Field::new("Sig_b", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(energies.to_vec())),
            Arc::new(Float64Array::from(sigma.to_vec())),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let directory = args.root.join(args.database.dir_name());
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("creating {}", directory.display()))?;

    let energies = log_energies();
    let mut written = 0;
    for symbol in &args.elements() {
        let Some(record) = nuclides::find(symbol) else {
            bail!("unknown element '{symbol}'");
        };
        for &(mass_number, _, _) in record.isotopes {
            let sigma = synthetic_sigma(mass_number, &energies);
            let stem = format!("{symbol}-{mass_number}");
            match args.format {
                Format::Csv => write_csv(&directory.join(format!("{stem}.csv")), &energies, &sigma)?,
                Format::Parquet => {
                    write_parquet(&directory.join(format!("{stem}.parquet")), &energies, &sigma)?
                }
            }
            log::info!("wrote {stem}");
            written += 1;
        }
    }

    println!(
        "Wrote {written} isotope tables ({} energies each) to {}",
        energies.len(),
        directory.display()
    );
    Ok(())
}
