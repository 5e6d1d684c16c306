//! Physical constants and unit conversions.
//!
//! The neutron observables are linked by the de Broglie relation and the
//! flight-path geometry:
//!
//! ```text
//!   energy (eV) ◄──► wavelength (Å) ◄──► time-of-flight (s) ◄──► image number
//! ```
//!
//! Time conversions need the source-to-detector distance; image numbers
//! additionally need the detector time resolution. Both come from a
//! [`TofGeometry`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, UnitSide};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Avogadro number (1/mol), CODATA 2014.
pub const AVOGADRO: f64 = 6.022_140_857e23;

/// One barn in cm².
pub const BARN_TO_CM2: f64 = 1e-24;

/// E·λ² for a neutron, in meV·Å².
pub const ENERGY_WAVELENGTH_CONSTANT: f64 = 81.787;

/// v·λ for a neutron, in m·Å/s.
pub const TOF_CONSTANT: f64 = 3956.0;

const X_UNITS: &str = "eV, Angstroms, s, number";
const DISTANCE_UNITS: &str = "nm, um, mm, cm, m, km";
const DENSITY_UNITS: &str = "g/cm3";

// ---------------------------------------------------------------------------
// X-axis units
// ---------------------------------------------------------------------------

/// Representation of the neutron observable on a curve's x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XUnit {
    /// Energy in eV.
    #[serde(rename = "eV")]
    Energy,
    /// Wavelength in Å.
    #[serde(rename = "Angstroms")]
    Wavelength,
    /// Time-of-flight in seconds.
    #[serde(rename = "s")]
    Time,
    /// Detector image (channel) index.
    #[serde(rename = "number")]
    ImageNumber,
}

impl XUnit {
    /// Parses a unit string case-insensitively, tagging failures with `side`.
    pub fn parse(unit: &str, side: UnitSide) -> Result<Self> {
        match unit.trim().to_ascii_lowercase().as_str() {
            "ev" => Ok(XUnit::Energy),
            "angstroms" | "angstrom" => Ok(XUnit::Wavelength),
            "s" => Ok(XUnit::Time),
            "number" | "image_number" => Ok(XUnit::ImageNumber),
            _ => Err(Error::InvalidUnit {
                unit: unit.to_string(),
                side,
                expected: X_UNITS,
            }),
        }
    }
}

impl fmt::Display for XUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XUnit::Energy => write!(f, "eV"),
            XUnit::Wavelength => write!(f, "Angstroms"),
            XUnit::Time => write!(f, "s"),
            XUnit::ImageNumber => write!(f, "number"),
        }
    }
}

/// Time-of-flight geometry of the beamline.
///
/// `offset_us` is the detector-electronics delay; it is removed from or
/// added to raw time-of-flight depending on the direction of conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TofGeometry {
    pub offset_us: f64,
    pub source_to_detector_m: Option<f64>,
    pub time_resolution_us: Option<f64>,
    pub t_start_us: f64,
}

impl Default for TofGeometry {
    fn default() -> Self {
        Self {
            offset_us: 0.0,
            source_to_detector_m: None,
            time_resolution_us: None,
            t_start_us: 0.0,
        }
    }
}

impl TofGeometry {
    /// Geometry with a flight path and detector delay.
    pub fn new(source_to_detector_m: f64, offset_us: f64) -> Self {
        Self {
            source_to_detector_m: Some(source_to_detector_m),
            offset_us,
            ..Self::default()
        }
    }

    /// Adds the detector time binning used for image numbers.
    pub fn with_time_resolution(mut self, time_resolution_us: f64, t_start_us: f64) -> Self {
        self.time_resolution_us = Some(time_resolution_us);
        self.t_start_us = t_start_us;
        self
    }

    fn flight_path(&self, from: XUnit, to: XUnit) -> Result<f64> {
        match self.source_to_detector_m {
            Some(l) if l.is_finite() && l > 0.0 => Ok(l),
            Some(l) => Err(Error::configuration(format!(
                "source_to_detector_m must be a positive distance, got {l}"
            ))),
            None => Err(Error::configuration(format!(
                "source_to_detector_m is required to convert from {from} to {to}"
            ))),
        }
    }

    fn resolution(&self, from: XUnit, to: XUnit) -> Result<f64> {
        match self.time_resolution_us {
            Some(r) if r.is_finite() && r > 0.0 => Ok(r),
            Some(r) => Err(Error::configuration(format!(
                "time_resolution_us must be positive, got {r}"
            ))),
            None => Err(Error::configuration(format!(
                "time_resolution_us is required to convert from {from} to {to}"
            ))),
        }
    }

    fn offset_s(&self) -> f64 {
        self.offset_us * 1e-6
    }
}

// ---------------------------------------------------------------------------
// Scalar relations
// ---------------------------------------------------------------------------

/// Neutron energy (eV) → wavelength (Å).
pub fn ev_to_angstroms(energy_ev: f64) -> f64 {
    (ENERGY_WAVELENGTH_CONSTANT / (energy_ev * 1000.0)).sqrt()
}

/// Neutron wavelength (Å) → energy (eV).
pub fn angstroms_to_ev(lambda: f64) -> f64 {
    ENERGY_WAVELENGTH_CONSTANT / (1000.0 * (lambda * lambda))
}

// ---------------------------------------------------------------------------
// Array conversion
// ---------------------------------------------------------------------------

/// Converts an x-axis array between neutron observables.
///
/// Unit strings are case-insensitive (`eV`, `Angstroms`, `s`, `number`).
/// Converting a unit to itself returns an equal copy of `array`.
pub fn convert_x_axis(
    array: &[f64],
    from_units: &str,
    to_units: &str,
    geometry: &TofGeometry,
) -> Result<Vec<f64>> {
    let from = XUnit::parse(from_units, UnitSide::From)?;
    let to = XUnit::parse(to_units, UnitSide::To)?;
    convert(array, from, to, geometry)
}

/// Typed form of [`convert_x_axis`].
///
/// Detector offset convention: eV→s subtracts `offset_us` and s→eV adds it,
/// while Å→s adds it and s→Å subtracts it (`λ = 3956·(t − offset)/L`). Each
/// pair is an exact inverse; the two routes to seconds differ by 2·offset.
pub fn convert(array: &[f64], from: XUnit, to: XUnit, geometry: &TofGeometry) -> Result<Vec<f64>> {
    use XUnit::*;

    match (from, to) {
        (Energy, Wavelength) => Ok(array.iter().map(|&e| ev_to_angstroms(e)).collect()),
        (Wavelength, Energy) => Ok(array.iter().map(|&l| angstroms_to_ev(l)).collect()),
        (Energy, Time) | (Wavelength, Time) => to_time(array, from, to, geometry),
        (Time, Energy) => {
            let l = geometry.flight_path(from, to)?;
            let offset = geometry.offset_s();
            Ok(array
                .iter()
                .map(|&t| angstroms_to_ev(TOF_CONSTANT * (t + offset) / l))
                .collect())
        }
        (Time, Wavelength) => {
            let l = geometry.flight_path(from, to)?;
            let offset = geometry.offset_s();
            Ok(array
                .iter()
                .map(|&t| TOF_CONSTANT * (t - offset) / l)
                .collect())
        }
        (Time, ImageNumber) => {
            let resolution = geometry.resolution(from, to)?;
            Ok(array
                .iter()
                .map(|&t| (t * 1e6 - geometry.t_start_us) / resolution)
                .collect())
        }
        (ImageNumber, Time) => {
            let resolution = geometry.resolution(from, to)?;
            Ok(array
                .iter()
                .map(|&n| (n * resolution + geometry.t_start_us) * 1e-6)
                .collect())
        }
        (Energy, ImageNumber) | (Wavelength, ImageNumber) => {
            geometry.resolution(from, to)?;
            let time = to_time(array, from, Time, geometry)?;
            convert(&time, Time, ImageNumber, geometry)
        }
        (ImageNumber, Energy) | (ImageNumber, Wavelength) => {
            geometry.flight_path(from, to)?;
            let time = convert(array, ImageNumber, Time, geometry)?;
            convert(&time, Time, to, geometry)
        }
        (Energy, Energy) | (Wavelength, Wavelength) | (Time, Time) | (ImageNumber, ImageNumber) => {
            Ok(array.to_vec())
        }
    }
}

fn to_time(array: &[f64], from: XUnit, to: XUnit, geometry: &TofGeometry) -> Result<Vec<f64>> {
    let l = geometry.flight_path(from, to)?;
    let offset = geometry.offset_s();
    match from {
        XUnit::Energy => Ok(array
            .iter()
            .map(|&e| ev_to_angstroms(e) * l / TOF_CONSTANT - offset)
            .collect()),
        XUnit::Wavelength => Ok(array
            .iter()
            .map(|&lambda| l * lambda / TOF_CONSTANT + offset)
            .collect()),
        other => Err(Error::configuration(format!(
            "no direct time-of-flight relation from {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Distance and density units
// ---------------------------------------------------------------------------

/// Length units accepted for layer thickness and flight paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "nm")]
    Nanometer,
    #[serde(rename = "um")]
    Micrometer,
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "km")]
    Kilometer,
}

impl DistanceUnit {
    /// Power of ten relative to one meter.
    fn exponent(self) -> i32 {
        match self {
            DistanceUnit::Nanometer => -9,
            DistanceUnit::Micrometer => -6,
            DistanceUnit::Millimeter => -3,
            DistanceUnit::Centimeter => -2,
            DistanceUnit::Meter => 0,
            DistanceUnit::Kilometer => 3,
        }
    }

    /// Parses a unit string, tagging failures with `side`.
    pub fn parse(unit: &str, side: UnitSide) -> Result<Self> {
        match unit.trim().to_ascii_lowercase().as_str() {
            "nm" => Ok(DistanceUnit::Nanometer),
            "um" | "µm" => Ok(DistanceUnit::Micrometer),
            "mm" => Ok(DistanceUnit::Millimeter),
            "cm" => Ok(DistanceUnit::Centimeter),
            "m" => Ok(DistanceUnit::Meter),
            "km" => Ok(DistanceUnit::Kilometer),
            _ => Err(Error::InvalidUnit {
                unit: unit.to_string(),
                side,
                expected: DISTANCE_UNITS,
            }),
        }
    }

    /// Converts `value` from `self` into `to`.
    ///
    /// Scaling is by an exact power of ten, dividing when shrinking so that
    /// decimal round numbers stay exact (10 mm → 1 cm).
    pub fn convert(self, value: f64, to: DistanceUnit) -> f64 {
        let diff = self.exponent() - to.exponent();
        if diff >= 0 {
            value * 10f64.powi(diff)
        } else {
            value / 10f64.powi(-diff)
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DistanceUnit::Nanometer => "nm",
            DistanceUnit::Micrometer => "um",
            DistanceUnit::Millimeter => "mm",
            DistanceUnit::Centimeter => "cm",
            DistanceUnit::Meter => "m",
            DistanceUnit::Kilometer => "km",
        };
        write!(f, "{s}")
    }
}

/// Converts a length between units given as strings.
pub fn set_distance_units(value: f64, from_units: &str, to_units: &str) -> Result<f64> {
    let from = DistanceUnit::parse(from_units, UnitSide::From)?;
    let to = DistanceUnit::parse(to_units, UnitSide::To)?;
    Ok(from.convert(value, to))
}

/// Mass density units. Only g/cm³ is used by the reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DensityUnit {
    #[default]
    #[serde(rename = "g/cm3")]
    GramsPerCm3,
}

impl DensityUnit {
    pub fn parse(unit: &str) -> Result<Self> {
        match unit.trim().to_ascii_lowercase().as_str() {
            "g/cm3" | "g/cm^3" | "g/cc" => Ok(DensityUnit::GramsPerCm3),
            _ => Err(Error::InvalidUnit {
                unit: unit.to_string(),
                side: UnitSide::From,
                expected: DENSITY_UNITS,
            }),
        }
    }
}

impl fmt::Display for DensityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g/cm3")
    }
}
