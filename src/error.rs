//! Error types for the transmission pipeline.
//!
//! Every fallible operation in the crate returns [`Error`]. Variants are
//! grouped into a small taxonomy ([`ErrorKind`]) so callers can surface
//! configuration mistakes, invalid stacks, missing reference data and
//! out-of-range queries differently.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a unit conversion an invalid unit string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSide {
    From,
    To,
}

impl fmt::Display for UnitSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSide::From => write!(f, "from_units"),
            UnitSide::To => write!(f, "to_units"),
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing units, missing geometry for time conversions, bad grid.
    Configuration,
    /// Stack shape mismatches, non-numeric thickness, unknown symbols.
    Validation,
    /// Missing reference-data file or directory.
    NotFound,
    /// Interpolation query outside the table's energy range.
    Range,
    /// Unrecognized database identifier.
    InvalidDatabase,
    /// Reference file present but not in the expected layout.
    MalformedData,
    /// Underlying I/O failure.
    Io,
}

/// Errors raised by the transmission pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A unit string that is not one of the supported units.
    #[error("invalid {side} '{unit}': expected one of {expected}")]
    InvalidUnit {
        /// The offending unit string, as given.
        unit: String,
        /// Which side of the conversion it was passed on.
        side: UnitSide,
        /// Human readable list of accepted units.
        expected: &'static str,
    },

    /// A conversion or grid needs a parameter that was not provided or is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An element symbol used in a layer is not in the reference database.
    #[error("element '{symbol}' in layer '{layer}' is not in the reference database")]
    UnknownElement {
        /// The unknown symbol.
        symbol: String,
        /// Layer (or formula) it appeared in.
        layer: String,
    },

    /// `elements` and `stoichiometric_ratio` have different lengths.
    #[error(
        "layer '{layer}': {elements} element(s) but {ratios} stoichiometric ratio(s)"
    )]
    SizeMismatch {
        /// Layer name.
        layer: String,
        /// Number of elements.
        elements: usize,
        /// Number of stoichiometric ratios.
        ratios: usize,
    },

    /// Any other malformed layer or stack description.
    #[error("invalid layer '{layer}': {detail}")]
    InvalidLayer {
        /// Layer name.
        layer: String,
        /// Description of the problem.
        detail: String,
    },

    /// A reference file or database directory does not exist.
    #[error("reference data not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A reference file exists but cannot be interpreted.
    #[error("malformed reference data in {}: {detail}", path.display())]
    MalformedData {
        /// File being read.
        path: PathBuf,
        /// Description of the problem.
        detail: String,
    },

    /// An interpolation query falls outside the table's native energy range.
    #[error("energy range [{e_min}, {e_max}] eV lies outside table range [{table_min}, {table_max}] eV")]
    OutOfRange {
        /// Requested lower bound (eV).
        e_min: f64,
        /// Requested upper bound (eV).
        e_max: f64,
        /// First energy of the table (eV).
        table_min: f64,
        /// Last energy of the table (eV).
        table_max: f64,
    },

    /// A database identifier that is not recognized.
    #[error("unknown database '{0}': expected one of ENDF_VII, ENDF_VIII")]
    InvalidDatabase(String),

    /// I/O failure while reading reference data.
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUnit { .. } | Error::Configuration(_) => ErrorKind::Configuration,
            Error::UnknownElement { .. }
            | Error::SizeMismatch { .. }
            | Error::InvalidLayer { .. } => ErrorKind::Validation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::MalformedData { .. } => ErrorKind::MalformedData,
            Error::OutOfRange { .. } => ErrorKind::Range,
            Error::InvalidDatabase(_) => ErrorKind::InvalidDatabase,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Creates a [`Configuration`](Error::Configuration) error.
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration(detail.into())
    }

    /// Creates an [`UnknownElement`](Error::UnknownElement) error.
    pub fn unknown_element(symbol: &str, layer: &str) -> Self {
        Self::UnknownElement {
            symbol: symbol.to_string(),
            layer: layer.to_string(),
        }
    }

    /// Creates an [`InvalidLayer`](Error::InvalidLayer) error.
    pub fn invalid_layer(layer: &str, detail: impl Into<String>) -> Self {
        Self::InvalidLayer {
            layer: layer.to_string(),
            detail: detail.into(),
        }
    }

    /// Creates a [`MalformedData`](Error::MalformedData) error.
    pub fn malformed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MalformedData {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Creates a [`NotFound`](Error::NotFound) error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }
}
