//! Neutron resonance transmission through layered material stacks.
//!
//! Tabulated isotopic cross-sections from a reference database are
//! resampled onto a common energy grid and combined, layer by layer, into
//! Beer–Lambert transmission curves.
//!
//! ```text
//!  <root>/<DATABASE>/El-A.{csv,json,parquet}
//!        │
//!        ▼
//!   ┌──────────┐      ┌─────────┐
//!   │ Catalog   │◄─────│  Stack   │  layers: elements, ratios, thickness, density
//!   └──────────┘      └─────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ interpolate  │  σ(E) on an EnergyGrid
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ Simulation  │  per isotope / element / layer / total transmission
//!   └────────────┘
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod interpolate;
pub mod simulation;
pub mod stack;
pub mod transmission;
pub mod units;

#[cfg(test)]
mod testing;

pub use data::catalog::{Catalog, Database};
pub use error::{Error, ErrorKind, Result};
pub use interpolate::{Curve, EnergyGrid};
pub use simulation::Simulation;
pub use stack::{Layer, Stack};
pub use units::{TofGeometry, XUnit};
