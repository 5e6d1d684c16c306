//! On-disk reference database used by the unit tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::data::catalog::{Catalog, Database};

/// Tabulated energies of every fixture table (eV).
pub(crate) const FIXTURE_ENERGIES: &[f64] = &[1e-5, 1.0, 10.0, 100.0, 1000.0, 3000.0];

/// Isotopes written to the fixture database, as (element, mass number).
pub(crate) const FIXTURE_ISOTOPES: &[(&str, u32)] = &[
    ("Ag", 107),
    ("Ag", 109),
    ("Ag", 110),
    ("Ag", 111),
    ("C", 12),
    ("C", 13),
    ("Co", 59),
    ("Eu", 151),
    ("Eu", 153),
    ("Gd", 152),
    ("Gd", 154),
    ("Gd", 155),
    ("Gd", 156),
    ("Gd", 157),
    ("Gd", 158),
    ("Gd", 160),
    ("U", 234),
    ("U", 235),
    ("U", 238),
];

/// Fixture cross-section: Ag-107 rises linearly, every other isotope is flat
/// at a tenth of its mass number.
pub(crate) fn fixture_sigma(element: &str, mass_number: u32, energy: f64) -> f64 {
    if element == "Ag" && mass_number == 107 {
        2.0 + 0.01 * energy
    } else {
        mass_number as f64 / 10.0
    }
}

pub(crate) fn write_table(dir: &Path, element: &str, mass_number: u32) {
    let mut text = String::from("E_eV,Sig_b\n");
    for &e in FIXTURE_ENERGIES {
        text.push_str(&format!("{e},{}\n", fixture_sigma(element, mass_number, e)));
    }
    fs::write(dir.join(format!("{element}-{mass_number}.csv")), text)
        .expect("fixture table should be written");
}

/// Build an `ENDF_VIII` fixture database and open it.
///
/// The `TempDir` must outlive the catalog's table loads.
pub(crate) fn fixture_database() -> (TempDir, Catalog) {
    let root = TempDir::new().expect("tempdir should be created");
    let dir = root.path().join(Database::EndfViii.dir_name());
    fs::create_dir_all(&dir).expect("database directory should be created");
    for &(element, mass_number) in FIXTURE_ISOTOPES {
        write_table(&dir, element, mass_number);
    }
    let catalog =
        Catalog::open(root.path(), Database::EndfViii).expect("fixture catalog should open");
    (root, catalog)
}
