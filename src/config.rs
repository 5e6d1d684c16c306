//! Run configuration: where the reference data lives and which energy
//! grid / beamline geometry to use.
//!
//! Both structs are plain `serde` records so they can be read from JSON
//! alongside a stack description.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::catalog::Database;
use crate::error::{Error, Result};
use crate::interpolate::EnergyGrid;
use crate::units::TofGeometry;

/// Environment variable naming the reference-data root directory.
pub const DATABASE_DIR_ENV: &str = "RESO_DATABASE_DIR";
/// Environment variable naming the database release (`ENDF_VIII`, …).
pub const DATABASE_ENV: &str = "RESO_DATABASE";

/// Location of the reference database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Directory containing one sub-directory per release.
    pub root: PathBuf,
    #[serde(default)]
    pub database: Database,
}

impl ReferenceConfig {
    pub fn new(root: impl Into<PathBuf>, database: Database) -> Self {
        Self {
            root: root.into(),
            database,
        }
    }

    /// Read `RESO_DATABASE_DIR` (and optionally `RESO_DATABASE`).
    ///
    /// Returns `Ok(None)` when no directory is configured.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(root) = std::env::var_os(DATABASE_DIR_ENV) else {
            return Ok(None);
        };
        let database = match std::env::var(DATABASE_ENV) {
            Ok(name) => name.parse()?,
            Err(_) => Database::default(),
        };
        Ok(Some(Self::new(root, database)))
    }
}

/// Energy grid and beamline geometry of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Lower grid bound (eV).
    pub e_min: f64,
    /// Upper grid bound (eV), always included.
    pub e_max: f64,
    /// Grid step (eV).
    pub e_step: f64,
    pub geometry: TofGeometry,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            e_min: 1e-5,
            e_max: 1000.0,
            e_step: 0.01,
            geometry: TofGeometry::default(),
        }
    }
}

impl SimulationConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::configuration(format!("{}: {e}", path.display())))
    }

    /// The uniform energy grid described by this configuration.
    pub fn grid(&self) -> Result<EnergyGrid> {
        EnergyGrid::new(self.e_min, self.e_max, self.e_step)
    }
}
