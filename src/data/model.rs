use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Isotope – one nuclide of an element
// ---------------------------------------------------------------------------

/// A single isotope as known to the reference database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isotope {
    /// Symbol in `<A>-<El>` form, e.g. `107-Ag`.
    pub symbol: String,
    /// Mass number A.
    pub mass_number: u32,
    /// Isotope mass (g/mol).
    pub mass: f64,
    /// Density of the pure isotope (g/cm³), scaled from the element density.
    pub density: f64,
    /// Natural isotopic abundance (0..1).
    pub abundance: f64,
    /// Cross-section table file name inside the database directory.
    pub file_name: String,
}

impl Isotope {
    /// Builds the `<A>-<El>` isotope symbol.
    pub fn symbol_for(element: &str, mass_number: u32) -> String {
        format!("{mass_number}-{element}")
    }
}

// ---------------------------------------------------------------------------
// Element – reference data for one chemical element
// ---------------------------------------------------------------------------

/// Immutable reference data for one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub symbol: String,
    /// Standard molar mass (g/mol).
    pub molar_mass: f64,
    /// Natural bulk density (g/cm³).
    pub density: f64,
    /// Isotopes ordered by mass number.
    pub isotopes: Vec<Isotope>,
}

impl Element {
    /// Find an isotope by its `<A>-<El>` symbol.
    pub fn isotope(&self, symbol: &str) -> Option<&Isotope> {
        self.isotopes.iter().find(|iso| iso.symbol == symbol)
    }

    /// Natural abundances in isotope order.
    pub fn abundances(&self) -> Vec<f64> {
        self.isotopes.iter().map(|iso| iso.abundance).collect()
    }

    /// Molar mass computed from isotope masses weighted by `ratios`.
    pub fn weighted_molar_mass(&self, ratios: &[f64]) -> f64 {
        self.isotopes
            .iter()
            .zip(ratios)
            .map(|(iso, r)| iso.mass * r)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// IsotopeInfo – lookup result that also represents "absent"
// ---------------------------------------------------------------------------

/// Flattened element information as returned by
/// [`Catalog::get_isotope_info`](super::catalog::Catalog::get_isotope_info).
///
/// An element missing from the database is represented with NaN molar mass
/// and density and empty isotope lists.
#[derive(Debug, Clone, Serialize)]
pub struct IsotopeInfo {
    pub molar_mass: f64,
    pub density: f64,
    /// Isotope symbols (`107-Ag`, …).
    pub list: Vec<String>,
    pub file_names: Vec<String>,
    pub mass: Vec<f64>,
    pub isotope_density: Vec<f64>,
    pub isotopic_ratio: Vec<f64>,
}

impl IsotopeInfo {
    /// The sentinel for a symbol absent from the database.
    pub fn absent() -> Self {
        Self {
            molar_mass: f64::NAN,
            density: f64::NAN,
            list: Vec::new(),
            file_names: Vec::new(),
            mass: Vec::new(),
            isotope_density: Vec::new(),
            isotopic_ratio: Vec::new(),
        }
    }

    /// Whether this describes an element actually present in the database.
    pub fn is_present(&self) -> bool {
        !self.list.is_empty()
    }
}

impl From<Option<&Element>> for IsotopeInfo {
    fn from(element: Option<&Element>) -> Self {
        let Some(element) = element else {
            return IsotopeInfo::absent();
        };
        IsotopeInfo {
            molar_mass: element.molar_mass,
            density: element.density,
            list: element.isotopes.iter().map(|i| i.symbol.clone()).collect(),
            file_names: element.isotopes.iter().map(|i| i.file_name.clone()).collect(),
            mass: element.isotopes.iter().map(|i| i.mass).collect(),
            isotope_density: element.isotopes.iter().map(|i| i.density).collect(),
            isotopic_ratio: element.abundances(),
        }
    }
}

// ---------------------------------------------------------------------------
// CrossSectionTable – raw energy ↔ sigma samples of one isotope
// ---------------------------------------------------------------------------

/// Tabulated cross-section of one isotope, in the table's native sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionTable {
    /// Energies (eV), non-decreasing.
    pub energy_ev: Vec<f64>,
    /// Cross-sections (barns), same length as `energy_ev`.
    pub sigma_b: Vec<f64>,
}

impl CrossSectionTable {
    /// Build a table from loaded columns, checking the layout invariants.
    ///
    /// `source` is only used to label errors.
    pub fn from_columns(source: &Path, energy_ev: Vec<f64>, sigma_b: Vec<f64>) -> Result<Self> {
        if energy_ev.len() != sigma_b.len() {
            return Err(Error::malformed(
                source,
                format!(
                    "energy has {} values but sigma has {}",
                    energy_ev.len(),
                    sigma_b.len()
                ),
            ));
        }
        if energy_ev.len() < 2 {
            return Err(Error::malformed(source, "at least two samples are required"));
        }
        if let Some(i) = energy_ev.iter().position(|e| !e.is_finite()) {
            return Err(Error::malformed(source, format!("energy[{i}] is not finite")));
        }
        if let Some(i) = sigma_b.iter().position(|s| !s.is_finite()) {
            return Err(Error::malformed(source, format!("sigma[{i}] is not finite")));
        }
        if let Some(i) = energy_ev.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::malformed(
                source,
                format!("energies decrease at row {}", i + 1),
            ));
        }
        Ok(Self { energy_ev, sigma_b })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.energy_ev.len()
    }

    /// Whether the table has no samples.
    pub fn is_empty(&self) -> bool {
        self.energy_ev.is_empty()
    }

    /// First and last tabulated energy.
    pub fn energy_range(&self) -> (f64, f64) {
        (
            self.energy_ev.first().copied().unwrap_or(f64::NAN),
            self.energy_ev.last().copied().unwrap_or(f64::NAN),
        )
    }
}
