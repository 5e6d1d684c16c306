/// Reference data: the nuclide index, the on-disk database and its tables.
///
/// Architecture:
/// ```text
///  <root>/<DATABASE>/El-A.csv | .json | .parquet
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  scan file names, join with nuclide index → Element/Isotope
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse one table → CrossSectionTable
///   └──────────┘
/// ```

pub mod catalog;
pub mod loader;
pub mod model;
pub mod nuclides;
