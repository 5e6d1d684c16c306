//! Embedded natural-nuclide index.
//!
//! Per element: symbol, standard molar mass (g/mol), bulk density (g/cm³)
//! and the known isotopes as (mass number, isotope mass in g/mol, natural
//! abundance). Radioactive isotopes that appear in evaluated libraries
//! carry an abundance of zero.
//!
//! A database directory may ship its own `index.json`; its entries are
//! layered over the embedded table by [`NuclideIndex`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of a database-supplied index, next to the tables.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug)]
pub struct ElementRecord {
    pub symbol: &'static str,
    pub molar_mass: f64,
    pub density: f64,
    pub isotopes: &'static [(u32, f64, f64)],
}

pub const ELEMENTS: &[ElementRecord] = &[
    ElementRecord {
        symbol: "H",
        molar_mass: 1.00794,
        density: 0.0708,
        isotopes: &[(1, 1.0078250321, 0.999885), (2, 2.014101778, 0.000115)],
    },
    ElementRecord {
        symbol: "Li",
        molar_mass: 6.941,
        density: 0.534,
        isotopes: &[(6, 6.015122795, 0.0759), (7, 7.01600455, 0.9241)],
    },
    ElementRecord {
        symbol: "B",
        molar_mass: 10.811,
        density: 2.34,
        isotopes: &[(10, 10.012937, 0.199), (11, 11.0093055, 0.801)],
    },
    ElementRecord {
        symbol: "C",
        molar_mass: 12.0107,
        density: 2.1,
        isotopes: &[(12, 12.0, 0.9893), (13, 13.0033548378, 0.0107)],
    },
    ElementRecord {
        symbol: "N",
        molar_mass: 14.0067,
        density: 0.808,
        isotopes: &[(14, 14.0030740052, 0.99632), (15, 15.0001088984, 0.00368)],
    },
    ElementRecord {
        symbol: "O",
        molar_mass: 15.9994,
        density: 1.14,
        isotopes: &[
            (16, 15.9949146221, 0.99757),
            (17, 16.9991315, 0.00038),
            (18, 17.9991604, 0.00205),
        ],
    },
    ElementRecord {
        symbol: "Na",
        molar_mass: 22.98977,
        density: 0.97,
        isotopes: &[(23, 22.98976967, 1.0)],
    },
    ElementRecord {
        symbol: "Mg",
        molar_mass: 24.305,
        density: 1.74,
        isotopes: &[(24, 23.9850419, 0.7899), (25, 24.98583702, 0.1), (26, 25.98259304, 0.1101)],
    },
    ElementRecord {
        symbol: "Al",
        molar_mass: 26.981538,
        density: 2.7,
        isotopes: &[(27, 26.98153844, 1.0)],
    },
    ElementRecord {
        symbol: "Si",
        molar_mass: 28.0855,
        density: 2.33,
        isotopes: &[
            (28, 27.9769265327, 0.922297),
            (29, 28.97649472, 0.046832),
            (30, 29.97377022, 0.030872),
        ],
    },
    ElementRecord {
        symbol: "P",
        molar_mass: 30.973761,
        density: 1.82,
        isotopes: &[(31, 30.97376151, 1.0)],
    },
    ElementRecord {
        symbol: "S",
        molar_mass: 32.065,
        density: 2.07,
        isotopes: &[
            (32, 31.97207069, 0.9493),
            (33, 32.9714585, 0.0076),
            (34, 33.96786683, 0.0429),
            (36, 35.96708088, 0.0002),
        ],
    },
    ElementRecord {
        symbol: "Cl",
        molar_mass: 35.453,
        density: 1.56,
        isotopes: &[(35, 34.96885271, 0.7578), (37, 36.9659026, 0.2422)],
    },
    ElementRecord {
        symbol: "K",
        molar_mass: 39.0983,
        density: 0.86,
        isotopes: &[
            (39, 38.9637069, 0.932581),
            (40, 39.96399867, 0.000117),
            (41, 40.96182597, 0.067302),
        ],
    },
    ElementRecord {
        symbol: "Ca",
        molar_mass: 40.078,
        density: 1.55,
        isotopes: &[
            (40, 39.9625912, 0.96941),
            (42, 41.9586183, 0.00647),
            (43, 42.9587668, 0.00135),
            (44, 43.9554811, 0.02086),
            (46, 45.9536928, 4e-05),
            (48, 47.952534, 0.00187),
        ],
    },
    ElementRecord {
        symbol: "Ti",
        molar_mass: 47.867,
        density: 4.54,
        isotopes: &[
            (46, 45.9526295, 0.0825),
            (47, 46.9517638, 0.0744),
            (48, 47.9479471, 0.7372),
            (49, 48.9478708, 0.0541),
            (50, 49.9447921, 0.0518),
        ],
    },
    ElementRecord {
        symbol: "V",
        molar_mass: 50.9415,
        density: 6.11,
        isotopes: &[(50, 49.9471628, 0.0025), (51, 50.9439637, 0.9975)],
    },
    ElementRecord {
        symbol: "Cr",
        molar_mass: 51.9961,
        density: 7.19,
        isotopes: &[
            (50, 49.9460496, 0.04345),
            (52, 51.9405119, 0.83789),
            (53, 52.9406538, 0.09501),
            (54, 53.9388849, 0.02365),
        ],
    },
    ElementRecord {
        symbol: "Mn",
        molar_mass: 54.938049,
        density: 7.43,
        isotopes: &[(55, 54.9380496, 1.0)],
    },
    ElementRecord {
        symbol: "Fe",
        molar_mass: 55.845,
        density: 7.874,
        isotopes: &[
            (54, 53.9396148, 0.05845),
            (56, 55.9349421, 0.91754),
            (57, 56.9353987, 0.02119),
            (58, 57.9332805, 0.00282),
        ],
    },
    ElementRecord {
        symbol: "Co",
        molar_mass: 58.933195,
        density: 8.9,
        isotopes: &[(58, 57.9357576, 0.0), (59, 58.9332002, 1.0)],
    },
    ElementRecord {
        symbol: "Ni",
        molar_mass: 58.6934,
        density: 8.902,
        isotopes: &[
            (58, 57.9353479, 0.680769),
            (60, 59.9307906, 0.262231),
            (61, 60.9310604, 0.011399),
            (62, 61.9283488, 0.036345),
            (64, 63.9279696, 0.009256),
        ],
    },
    ElementRecord {
        symbol: "Cu",
        molar_mass: 63.546,
        density: 8.96,
        isotopes: &[(63, 62.9296011, 0.6917), (65, 64.9277937, 0.3083)],
    },
    ElementRecord {
        symbol: "Zn",
        molar_mass: 65.409,
        density: 7.133,
        isotopes: &[
            (64, 63.9291466, 0.4863),
            (66, 65.9260368, 0.279),
            (67, 66.9271309, 0.041),
            (68, 67.9248476, 0.1875),
            (70, 69.925325, 0.0062),
        ],
    },
    ElementRecord {
        symbol: "Zr",
        molar_mass: 91.224,
        density: 6.506,
        isotopes: &[
            (90, 89.9047037, 0.5145),
            (91, 90.905645, 0.1122),
            (92, 91.9050401, 0.1715),
            (94, 93.9063158, 0.1738),
            (96, 95.908276, 0.028),
        ],
    },
    ElementRecord {
        symbol: "Nb",
        molar_mass: 92.90638,
        density: 8.57,
        isotopes: &[(93, 92.9063775, 1.0)],
    },
    ElementRecord {
        symbol: "Mo",
        molar_mass: 95.94,
        density: 10.22,
        isotopes: &[
            (92, 91.90681, 0.1484),
            (94, 93.9050876, 0.0925),
            (95, 94.9058415, 0.1592),
            (96, 95.9046789, 0.1668),
            (97, 96.906021, 0.0955),
            (98, 97.9054078, 0.2413),
            (100, 99.907477, 0.0963),
        ],
    },
    ElementRecord {
        symbol: "Ag",
        molar_mass: 107.8682,
        density: 10.5,
        isotopes: &[
            (107, 106.905093, 0.51839),
            (109, 108.904756, 0.48161),
            (110, 109.90611, 0.0),
            (111, 110.905295, 0.0),
        ],
    },
    ElementRecord {
        symbol: "Cd",
        molar_mass: 112.411,
        density: 8.65,
        isotopes: &[
            (106, 105.906458, 0.0125),
            (108, 107.904183, 0.0089),
            (110, 109.903006, 0.1249),
            (111, 110.904182, 0.128),
            (112, 111.9027572, 0.2413),
            (113, 112.9044009, 0.1222),
            (114, 113.9033581, 0.2873),
            (116, 115.904755, 0.0749),
        ],
    },
    ElementRecord {
        symbol: "In",
        molar_mass: 114.818,
        density: 7.31,
        isotopes: &[(113, 112.904061, 0.0429), (115, 114.903878, 0.9571)],
    },
    ElementRecord {
        symbol: "Sn",
        molar_mass: 118.71,
        density: 7.31,
        isotopes: &[
            (112, 111.904821, 0.0097),
            (114, 113.902782, 0.0066),
            (115, 114.903346, 0.0034),
            (116, 115.901744, 0.1454),
            (117, 116.902954, 0.0768),
            (118, 117.901606, 0.2422),
            (119, 118.903309, 0.0859),
            (120, 119.9021966, 0.3258),
            (122, 121.9034401, 0.0463),
            (124, 123.9052746, 0.0579),
        ],
    },
    ElementRecord {
        symbol: "Eu",
        molar_mass: 151.964,
        density: 5.244,
        isotopes: &[(151, 150.919846, 0.4781), (153, 152.921226, 0.5219)],
    },
    ElementRecord {
        symbol: "Gd",
        molar_mass: 157.25,
        density: 7.901,
        isotopes: &[
            (152, 151.919788, 0.002),
            (154, 153.920862, 0.0218),
            (155, 154.922619, 0.148),
            (156, 155.92212, 0.2047),
            (157, 156.923957, 0.1565),
            (158, 157.924101, 0.2484),
            (160, 159.927051, 0.2186),
        ],
    },
    ElementRecord {
        symbol: "Hf",
        molar_mass: 178.49,
        density: 13.31,
        isotopes: &[
            (174, 173.94004, 0.0016),
            (176, 175.9414018, 0.0526),
            (177, 176.94322, 0.186),
            (178, 177.9436977, 0.2728),
            (179, 178.9458151, 0.1362),
            (180, 179.9465488, 0.3508),
        ],
    },
    ElementRecord {
        symbol: "Ta",
        molar_mass: 180.9479,
        density: 16.654,
        isotopes: &[(180, 179.947466, 0.00012), (181, 180.947996, 0.99988)],
    },
    ElementRecord {
        symbol: "W",
        molar_mass: 183.84,
        density: 19.3,
        isotopes: &[
            (180, 179.946706, 0.0012),
            (182, 181.948206, 0.265),
            (183, 182.9502245, 0.1431),
            (184, 183.9509326, 0.3064),
            (186, 185.954362, 0.2843),
        ],
    },
    ElementRecord {
        symbol: "Au",
        molar_mass: 196.96655,
        density: 19.32,
        isotopes: &[(197, 196.966552, 1.0)],
    },
    ElementRecord {
        symbol: "Pb",
        molar_mass: 207.2,
        density: 11.35,
        isotopes: &[
            (204, 203.973029, 0.014),
            (206, 205.974449, 0.241),
            (207, 206.975881, 0.221),
            (208, 207.976636, 0.524),
        ],
    },
    ElementRecord {
        symbol: "Bi",
        molar_mass: 208.98038,
        density: 9.747,
        isotopes: &[(209, 208.980383, 1.0)],
    },
    ElementRecord {
        symbol: "U",
        molar_mass: 238.02891,
        density: 18.95,
        isotopes: &[
            (234, 234.0409456, 0.000055),
            (235, 235.0439231, 0.0072),
            (238, 238.0507826, 0.992745),
        ],
    },
];

/// Look up an element record by exact (case-sensitive) symbol.
pub fn find(symbol: &str) -> Option<&'static ElementRecord> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

// ---------------------------------------------------------------------------
// Owned index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopeRecord {
    pub mass_number: u32,
    /// g/mol
    pub mass: f64,
    pub abundance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuclideRecord {
    pub molar_mass: f64,
    pub density: f64,
    pub isotopes: Vec<IsotopeRecord>,
}

impl NuclideRecord {
    pub fn isotope(&self, mass_number: u32) -> Option<&IsotopeRecord> {
        self.isotopes.iter().find(|i| i.mass_number == mass_number)
    }
}

impl From<&ElementRecord> for NuclideRecord {
    fn from(record: &ElementRecord) -> Self {
        Self {
            molar_mass: record.molar_mass,
            density: record.density,
            isotopes: record
                .isotopes
                .iter()
                .map(|&(mass_number, mass, abundance)| IsotopeRecord {
                    mass_number,
                    mass,
                    abundance,
                })
                .collect(),
        }
    }
}

/// Element symbol → nuclide record.
///
/// JSON form, as read from [`INDEX_FILE`]:
///
/// ```json
/// {
///   "Kr": {
///     "molar_mass": 83.798,
///     "density": 0.003733,
///     "isotopes": [{ "mass_number": 84, "mass": 83.9115, "abundance": 0.57 }]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NuclideIndex {
    records: BTreeMap<String, NuclideRecord>,
}

impl NuclideIndex {
    /// The embedded table.
    pub fn embedded() -> Self {
        Self {
            records: ELEMENTS
                .iter()
                .map(|e| (e.symbol.to_string(), NuclideRecord::from(e)))
                .collect(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let records: BTreeMap<String, NuclideRecord> = serde_json::from_str(&text)
            .map_err(|e| Error::malformed(path, format!("parsing nuclide index: {e}")))?;

        for (symbol, record) in &records {
            let valid = record.molar_mass > 0.0
                && record.density > 0.0
                && !record.isotopes.is_empty()
                && record
                    .isotopes
                    .iter()
                    .all(|i| i.mass > 0.0 && (0.0..=1.0).contains(&i.abundance));
            if !valid {
                return Err(Error::malformed(
                    path,
                    format!("invalid nuclide record for '{symbol}'"),
                ));
            }
        }

        Ok(Self { records })
    }

    /// Layer `other` over `self`; records of the same element are replaced.
    pub fn extend(&mut self, other: NuclideIndex) {
        self.records.extend(other.records);
    }

    pub fn get(&self, symbol: &str) -> Option<&NuclideRecord> {
        self.records.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
