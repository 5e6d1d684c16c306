//! Reference database accessor.
//!
//! A [`Catalog`] is built once from a database directory and is immutable
//! afterwards. Lookups that merely ask about an element return `Option` (or
//! the NaN sentinel of [`IsotopeInfo`]); it is the stack validator that turns
//! absence into an error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::loader::{load_cross_section_table, TABLE_EXTENSIONS};
use super::model::{CrossSectionTable, Element, Isotope, IsotopeInfo};
use super::nuclides::{NuclideIndex, INDEX_FILE};
use crate::config::ReferenceConfig;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Database identifiers
// ---------------------------------------------------------------------------

/// Evaluated nuclear-data release backing a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Database {
    #[serde(rename = "ENDF_VII")]
    EndfVii,
    #[default]
    #[serde(rename = "ENDF_VIII")]
    EndfViii,
}

impl Database {
    /// Sub-directory of the reference root holding this release.
    pub fn dir_name(self) -> &'static str {
        match self {
            Database::EndfVii => "ENDF_VII",
            Database::EndfViii => "ENDF_VIII",
        }
    }
}

impl FromStr for Database {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENDF_VII" => Ok(Database::EndfVii),
            "ENDF_VIII" => Ok(Database::EndfViii),
            _ => Err(Error::InvalidDatabase(s.to_string())),
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable element/isotope catalog for one database release.
#[derive(Debug, Clone)]
pub struct Catalog {
    database: Database,
    directory: PathBuf,
    elements: BTreeMap<String, Element>,
}

impl Catalog {
    /// Scan `<root>/<database>/` for `<El>-<A>.<ext>` cross-section tables.
    ///
    /// An element is part of the catalog when it has at least one table file
    /// and a record in the nuclide index: the embedded table, overridden and
    /// extended by an `index.json` in the same directory when present.
    pub fn open(root: impl AsRef<Path>, database: Database) -> Result<Self> {
        let directory = root.as_ref().join(database.dir_name());
        if !directory.is_dir() {
            return Err(Error::not_found(directory));
        }

        // element -> mass number -> file name
        let mut files: BTreeMap<String, BTreeMap<u32, String>> = BTreeMap::new();
        for entry in std::fs::read_dir(&directory)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some((symbol, mass_number, rank)) = parse_table_name(&name) else {
                continue;
            };
            let slot = files.entry(symbol).or_default();
            let keep_existing = slot
                .get(&mass_number)
                .and_then(|existing| parse_table_name(existing))
                .is_some_and(|(_, _, existing_rank)| existing_rank <= rank);
            if !keep_existing {
                slot.insert(mass_number, name);
            }
        }

        let mut index = NuclideIndex::embedded();
        let index_path = directory.join(INDEX_FILE);
        if index_path.is_file() {
            let local = NuclideIndex::from_json_file(&index_path)?;
            log::info!("using {} nuclide records from {}", local.len(), index_path.display());
            index.extend(local);
        }

        let mut elements = BTreeMap::new();
        for (symbol, tables) in files {
            let Some(record) = index.get(&symbol) else {
                log::warn!("no nuclide index record for element {symbol}; skipping its tables");
                continue;
            };

            let isotopes: Vec<Isotope> = tables
                .into_iter()
                .filter_map(|(mass_number, file_name)| {
                    let Some(iso) = record.isotope(mass_number) else {
                        log::warn!("no nuclide index record for {file_name}; skipping");
                        return None;
                    };
                    Some(Isotope {
                        symbol: Isotope::symbol_for(&symbol, mass_number),
                        mass_number,
                        mass: iso.mass,
                        density: record.density * iso.mass / record.molar_mass,
                        abundance: iso.abundance,
                        file_name,
                    })
                })
                .collect();

            if isotopes.is_empty() {
                continue;
            }

            elements.insert(
                symbol.clone(),
                Element {
                    symbol,
                    molar_mass: record.molar_mass,
                    density: record.density,
                    isotopes,
                },
            );
        }

        log::info!(
            "opened {database} reference database at {} ({} elements)",
            directory.display(),
            elements.len()
        );

        Ok(Self {
            database,
            directory,
            elements,
        })
    }

    /// Open the catalog described by a [`ReferenceConfig`].
    pub fn from_config(config: &ReferenceConfig) -> Result<Self> {
        Self::open(&config.root, config.database)
    }

    pub fn database(&self) -> Database {
        self.database
    }

    /// Directory holding the cross-section tables.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Whether `symbol` names an element of this catalog. Empty → `false`.
    pub fn is_element_in_database(&self, symbol: &str) -> bool {
        self.elements.contains_key(symbol)
    }

    /// All element symbols in the catalog.
    pub fn list_elements(&self) -> BTreeSet<String> {
        self.elements.keys().cloned().collect()
    }

    /// Reference data for an element, if present.
    pub fn element(&self, symbol: &str) -> Option<&Element> {
        self.elements.get(symbol)
    }

    /// Element information; absent symbols give the NaN/empty sentinel.
    pub fn get_isotope_info(&self, symbol: &str) -> IsotopeInfo {
        IsotopeInfo::from(self.element(symbol))
    }

    /// Molar mass of an element (`Ag`) or mass of an isotope (`107-Ag`).
    pub fn get_mass(&self, symbol: &str) -> Option<f64> {
        match symbol.split_once('-') {
            Some((_, element)) => self
                .element(element)
                .and_then(|e| e.isotope(symbol))
                .map(|iso| iso.mass),
            None => self.element(symbol).map(|e| e.molar_mass),
        }
    }

    /// Bulk density of an element or of a pure isotope (g/cm³).
    pub fn get_density(&self, symbol: &str) -> Option<f64> {
        match symbol.split_once('-') {
            Some((_, element)) => self
                .element(element)
                .and_then(|e| e.isotope(symbol))
                .map(|iso| iso.density),
            None => self.element(symbol).map(|e| e.density),
        }
    }

    /// Path of an isotope's cross-section table.
    pub fn table_path(&self, isotope: &Isotope) -> PathBuf {
        self.directory.join(&isotope.file_name)
    }

    /// Load an isotope's cross-section table.
    pub fn load_table(&self, isotope: &Isotope) -> Result<CrossSectionTable> {
        load_cross_section_table(&self.table_path(isotope))
    }
}

/// List the elements of a database given by name.
///
/// Unrecognized names fail with [`Error::InvalidDatabase`].
pub fn get_list_of_elements(root: impl AsRef<Path>, database: &str) -> Result<BTreeSet<String>> {
    let database: Database = database.parse()?;
    Ok(Catalog::open(root, database)?.list_elements())
}

/// Split `Ag-107.csv` into (`Ag`, 107, extension rank).
fn parse_table_name(name: &str) -> Option<(String, u32, usize)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let rank = TABLE_EXTENSIONS
        .iter()
        .position(|e| e.eq_ignore_ascii_case(ext))?;
    let (symbol, mass_number) = stem.split_once('-')?;

    let mut chars = symbol.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() || !chars.all(|c| c.is_ascii_lowercase()) || symbol.len() > 3 {
        return None;
    }
    let mass_number = mass_number.parse::<u32>().ok()?;
    Some((symbol.to_string(), mass_number, rank))
}
