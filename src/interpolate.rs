//! Uniform energy grids and resampling of cross-section tables onto them.

use std::path::Path;

use serde::Serialize;

use crate::data::loader::load_cross_section_table;
use crate::data::model::CrossSectionTable;
use crate::error::{Error, Result};
use crate::units::{convert, TofGeometry, XUnit};

/// Upper bound on grid size; larger grids are almost certainly a step typo.
const MAX_GRID_POINTS: usize = 50_000_000;

// ---------------------------------------------------------------------------
// EnergyGrid
// ---------------------------------------------------------------------------

/// Strictly increasing energies (eV) with a constant step.
///
/// The first point is exactly `e_min` and the last exactly `e_max`. When
/// `e_max - e_min` is not a whole number of steps, the regular points stop
/// at the last one below `e_max` and `e_max` is appended, so the final
/// interval is shorter than `e_step`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyGrid {
    e_min: f64,
    e_max: f64,
    e_step: f64,
    energies: Vec<f64>,
}

impl EnergyGrid {
    pub fn new(e_min: f64, e_max: f64, e_step: f64) -> Result<Self> {
        if !(e_min.is_finite() && e_max.is_finite() && e_step.is_finite()) {
            return Err(Error::configuration(format!(
                "energy grid bounds must be finite (E_min={e_min}, E_max={e_max}, E_step={e_step})"
            )));
        }
        if e_min < 0.0 {
            return Err(Error::configuration(format!("E_min must be >= 0, got {e_min}")));
        }
        if e_min >= e_max {
            return Err(Error::configuration(format!(
                "E_min ({e_min}) must be lower than E_max ({e_max})"
            )));
        }
        if e_step <= 0.0 {
            return Err(Error::configuration(format!("E_step must be > 0, got {e_step}")));
        }

        let steps = ((e_max - e_min) / e_step + 1e-9).floor();
        if steps >= MAX_GRID_POINTS as f64 {
            return Err(Error::configuration(format!(
                "energy grid would have more than {MAX_GRID_POINTS} points"
            )));
        }
        let steps = steps as usize;

        let tol = 1e-9 * e_step;
        let mut energies = Vec::with_capacity(steps + 2);
        for i in 0..=steps {
            let e = e_min + i as f64 * e_step;
            if e < e_max - tol {
                energies.push(e);
            }
        }
        energies.push(e_max);

        if !energies.windows(2).all(|w| w[1] > w[0]) {
            return Err(Error::configuration(format!(
                "E_step ({e_step}) is below the floating-point resolution of the grid [{e_min}, {e_max}]"
            )));
        }

        Ok(Self {
            e_min,
            e_max,
            e_step,
            energies,
        })
    }

    pub fn e_min(&self) -> f64 {
        self.e_min
    }

    pub fn e_max(&self) -> f64 {
        self.e_max
    }

    pub fn e_step(&self) -> f64 {
        self.e_step
    }

    /// Grid energies (eV).
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// Parallel x/y samples. `x_axis` is in eV unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub x_axis: Vec<f64>,
    pub y_axis: Vec<f64>,
}

impl Curve {
    pub fn len(&self) -> usize {
        self.x_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_axis.is_empty()
    }

    /// First (x, y) pair.
    pub fn first(&self) -> Option<(f64, f64)> {
        Some((*self.x_axis.first()?, *self.y_axis.first()?))
    }

    /// Last (x, y) pair.
    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.x_axis.last()?, *self.y_axis.last()?))
    }

    /// Re-express an eV x-axis in `unit`; y values are untouched.
    pub fn in_units(self, unit: XUnit, geometry: &TofGeometry) -> Result<Curve> {
        Ok(Curve {
            x_axis: convert(&self.x_axis, XUnit::Energy, unit, geometry)?,
            y_axis: self.y_axis,
        })
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Resample `table` onto `grid` by piecewise-linear interpolation.
///
/// The grid must lie within the table's energy range; no extrapolation is
/// performed.
pub fn interpolate(table: &CrossSectionTable, grid: &EnergyGrid) -> Result<Curve> {
    let (table_min, table_max) = table.energy_range();
    if grid.e_min() < table_min || grid.e_max() > table_max {
        return Err(Error::OutOfRange {
            e_min: grid.e_min(),
            e_max: grid.e_max(),
            table_min,
            table_max,
        });
    }

    let y_axis = grid
        .energies()
        .iter()
        .map(|&e| linear_at(&table.energy_ev, &table.sigma_b, e))
        .collect();

    Ok(Curve {
        x_axis: grid.energies().to_vec(),
        y_axis,
    })
}

/// Linear interpolation at `x`, which must lie within `xs`.
fn linear_at(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let hi = xs.partition_point(|&v| v < x);
    if hi < xs.len() && xs[hi] == x {
        return ys[hi];
    }
    // hi > 0 because x >= xs[0] and xs[0] != x here
    let lo = hi - 1;
    let (x0, x1) = (xs[lo], xs[hi]);
    let (y0, y1) = (ys[lo], ys[hi]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Load a table and resample it onto `[e_min, e_max]` with step `e_step`.
pub fn get_sigma(path: &Path, e_min: f64, e_max: f64, e_step: f64) -> Result<Curve> {
    let table = load_cross_section_table(path)?;
    let grid = EnergyGrid::new(e_min, e_max, e_step)?;
    interpolate(&table, &grid)
}
