//! Atomic densities and Beer–Lambert transmission.
//!
//! A [`Layer`] is first resolved against the catalog into a
//! [`ResolvedLayer`]: every element gets its isotopes, the isotopic ratios
//! in force (natural or custom), an isotope-derived molar mass and a
//! density. Atomic densities and transmissions are then pure functions of
//! resolved layers and interpolated cross-sections.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::catalog::Catalog;
use crate::data::model::Isotope;
use crate::error::{Error, Result};
use crate::stack::{Layer, Thickness};
use crate::units::{AVOGADRO, BARN_TO_CM2};

// ---------------------------------------------------------------------------
// Resolved layers
// ---------------------------------------------------------------------------

/// An element of a layer with its reference data attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedElement {
    pub symbol: String,
    /// Stoichiometric ratio within the layer.
    pub stoichiometric_ratio: f64,
    pub isotopes: Vec<Isotope>,
    /// Isotopic ratios in force, parallel to `isotopes`.
    pub isotopic_ratio: Vec<f64>,
    /// Σ ratio × isotope mass (g/mol).
    pub molar_mass: f64,
    /// Density of the element with these isotopic ratios (g/cm³).
    pub density: f64,
}

/// A layer with every element resolved and a definite density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLayer {
    pub name: String,
    pub thickness: Thickness,
    /// Layer density (g/cm³), explicit or derived.
    pub density: f64,
    /// Whether `density` was derived from the elements.
    pub density_derived: bool,
    pub elements: Vec<ResolvedElement>,
}

impl ResolvedLayer {
    /// Attach catalog data to `layer`.
    ///
    /// Elements missing from the catalog are an error here. When the layer
    /// has no density, a single element uses its own density and a compound
    /// uses [`compound_density`].
    pub fn resolve(catalog: &Catalog, layer: &Layer) -> Result<Self> {
        let mut elements = Vec::with_capacity(layer.elements().len());

        for (symbol, ratio) in layer.composition() {
            let element = catalog
                .element(symbol)
                .ok_or_else(|| Error::unknown_element(symbol, layer.name()))?;

            let (isotopic_ratio, density) = match layer.isotopic_ratio(symbol) {
                Some(custom) => {
                    if custom.len() != element.isotopes.len() {
                        return Err(Error::invalid_layer(
                            layer.name(),
                            format!(
                                "'{symbol}' has {} isotopes but {} isotopic ratios were given",
                                element.isotopes.len(),
                                custom.len()
                            ),
                        ));
                    }
                    let density = element
                        .isotopes
                        .iter()
                        .zip(custom)
                        .map(|(iso, r)| iso.density * r)
                        .sum();
                    (custom.to_vec(), density)
                }
                None => (element.abundances(), element.density),
            };

            elements.push(ResolvedElement {
                symbol: symbol.to_string(),
                stoichiometric_ratio: ratio,
                molar_mass: element.weighted_molar_mass(&isotopic_ratio),
                isotopes: element.isotopes.clone(),
                isotopic_ratio,
                density,
            });
        }

        let (density, density_derived) = match layer.density().get() {
            Some(d) => (d, false),
            None if elements.len() == 1 => (elements[0].density, true),
            None => {
                let densities: Vec<f64> = elements.iter().map(|e| e.density).collect();
                let ratios: Vec<f64> = elements.iter().map(|e| e.stoichiometric_ratio).collect();
                (compound_density(&densities, &ratios)?, true)
            }
        };

        log::debug!(
            "resolved layer '{}': {} element(s), density {density} g/cm3{}",
            layer.name(),
            elements.len(),
            if density_derived { " (derived)" } else { "" }
        );

        Ok(Self {
            name: layer.name().to_string(),
            thickness: layer.thickness(),
            density,
            density_derived,
            elements,
        })
    }

    /// Look up a resolved element by symbol.
    pub fn element(&self, symbol: &str) -> Option<&ResolvedElement> {
        self.elements.iter().find(|e| e.symbol == symbol)
    }
}

// ---------------------------------------------------------------------------
// Densities
// ---------------------------------------------------------------------------

/// Ratio-weighted density: Σ(rᵢ·dᵢ) / Σ rᵢ.
pub fn compound_density(densities: &[f64], ratios: &[f64]) -> Result<f64> {
    if densities.len() != ratios.len() {
        return Err(Error::configuration(format!(
            "{} densities but {} ratios",
            densities.len(),
            ratios.len()
        )));
    }
    let total: f64 = ratios.iter().sum();
    if densities.is_empty() || !(total > 0.0) {
        return Err(Error::configuration(
            "compound density needs at least one positive ratio",
        ));
    }
    Ok(ratios
        .iter()
        .zip(densities)
        .map(|(r, d)| r * d / total)
        .sum())
}

/// Atoms per cm³ of each element of a layer.
///
/// N = N_A · ρ / Σ rᵢMᵢ molecules per cm³; element i contributes rᵢ·N.
pub fn atoms_per_cm3(layer: &ResolvedLayer) -> BTreeMap<String, f64> {
    let molar_mass_sum: f64 = layer
        .elements
        .iter()
        .map(|e| e.stoichiometric_ratio * e.molar_mass)
        .sum();
    let molecules_per_cm3 = AVOGADRO * layer.density / molar_mass_sum;

    layer
        .elements
        .iter()
        .map(|e| (e.symbol.clone(), e.stoichiometric_ratio * molecules_per_cm3))
        .collect()
}

// ---------------------------------------------------------------------------
// Transmission
// ---------------------------------------------------------------------------

/// Beer–Lambert transmission `exp(-t · 1e-24 · σ · N)` for each σ (barns).
pub fn calculate_transmission(thickness_cm: f64, atoms_per_cm3: f64, sigma_b: &[f64]) -> Vec<f64> {
    sigma_b
        .iter()
        .map(|&sigma| (-thickness_cm * BARN_TO_CM2 * sigma * atoms_per_cm3).exp())
        .collect()
}

/// Abundance-weighted element cross-section Σ aᵢσᵢ(E).
///
/// All `isotope_sigma` curves must share one grid.
pub fn element_sigma(isotopic_ratio: &[f64], isotope_sigma: &[Vec<f64>]) -> Vec<f64> {
    let len = isotope_sigma.first().map_or(0, Vec::len);
    let mut total = vec![0.0; len];
    for (ratio, sigma) in isotopic_ratio.iter().zip(isotope_sigma) {
        for (acc, s) in total.iter_mut().zip(sigma) {
            *acc += ratio * s;
        }
    }
    total
}

/// Elementwise product of equally long curves; empty input gives `len` ones.
pub fn product(curves: &[Vec<f64>], len: usize) -> Vec<f64> {
    let mut out = vec![1.0; len];
    for curve in curves {
        for (acc, v) in out.iter_mut().zip(curve) {
            *acc *= v;
        }
    }
    out
}

/// 1 − transmission, elementwise.
pub fn attenuation(transmission: &[f64]) -> Vec<f64> {
    transmission.iter().map(|t| 1.0 - t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::Density;
    use crate::testing::fixture_database;

    #[test]
    fn compound_density_is_ratio_weighted() {
        let returned = compound_density(&[10.0, 20.0], &[1.0, 2.0]).unwrap();
        let expected = (1.0 * 10.0) / 3.0 + (2.0 * 20.0) / 3.0;
        assert_eq!(returned, expected);
        assert!((returned - 16.666_666).abs() < 1e-5);
    }

    #[test]
    fn compound_density_rejects_bad_input() {
        assert!(compound_density(&[10.0], &[1.0, 2.0]).is_err());
        assert!(compound_density(&[], &[]).is_err());
    }

    #[test]
    fn transmission_matches_beer_lambert_exactly() {
        let thickness = 10.0;
        let atoms = 8.9e22;
        let sigma: Vec<f64> = (1..=10).map(f64::from).collect();
        let returned = calculate_transmission(thickness, atoms, &sigma);
        let expected: Vec<f64> = sigma
            .iter()
            .map(|b| (-thickness * 1e-24 * b * atoms).exp())
            .collect();
        assert_eq!(returned, expected);
    }

    #[test]
    fn atoms_per_cm3_of_compound_layer() {
        let (_dir, catalog) = fixture_database();
        let layer = Layer::new("CoAg", ["Co", "Ag"], vec![1.0, 1.0], Thickness::mm(0.025))
            .unwrap()
            .with_density(Density::g_per_cm3(9.8))
            .unwrap();
        let resolved = ResolvedLayer::resolve(&catalog, &layer).unwrap();
        let atoms = atoms_per_cm3(&resolved);

        // isotope-weighted molar masses of Co (59 only) and natural Ag
        let co = 58.9332002;
        let ag_mass =
            106.905093 * 0.51839 + 108.904756 * 0.48161 + 109.90611 * 0.0 + 110.905295 * 0.0;
        let expected = AVOGADRO * 9.8 / (co + ag_mass);

        let ag = atoms["Ag"];
        assert!((ag - expected).abs() < 1e8, "{ag} vs {expected}");
        assert!((ag - 3.5381596180771292e22).abs() < 1e8, "{ag}");
        assert_eq!(atoms["Ag"], atoms["Co"]);
    }

    #[test]
    fn atoms_follow_stoichiometry() {
        let (_dir, catalog) = fixture_database();
        let layer = Layer::new("Ag2Co", ["Ag", "Co"], vec![2.0, 1.0], Thickness::mm(1.0))
            .unwrap()
            .with_density(Density::g_per_cm3(10.0))
            .unwrap();
        let resolved = ResolvedLayer::resolve(&catalog, &layer).unwrap();
        let atoms = atoms_per_cm3(&resolved);
        assert!((atoms["Ag"] / atoms["Co"] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn derived_density() {
        let (_dir, catalog) = fixture_database();

        let single = Layer::new("Ag", ["Ag"], vec![1.0], Thickness::mm(0.025)).unwrap();
        let resolved = ResolvedLayer::resolve(&catalog, &single).unwrap();
        assert_eq!(resolved.density, 10.5);
        assert!(resolved.density_derived);

        let compound = Layer::new("AgCo2", ["Ag", "Co"], vec![1.0, 2.0], Thickness::mm(0.025)).unwrap();
        let resolved = ResolvedLayer::resolve(&catalog, &compound).unwrap();
        let expected = compound_density(&[10.5, 8.9], &[1.0, 2.0]).unwrap();
        assert_eq!(resolved.density, expected);
    }

    #[test]
    fn custom_isotopic_ratio_changes_mass_and_density() {
        let (_dir, catalog) = fixture_database();
        let layer = Layer::new("Ag", ["Ag"], vec![1.0], Thickness::mm(0.025))
            .unwrap()
            .with_isotopic_ratio("Ag", vec![1.0, 0.0, 0.0, 0.0])
            .unwrap();
        let resolved = ResolvedLayer::resolve(&catalog, &layer).unwrap();
        let ag = &resolved.elements[0];
        assert_eq!(ag.molar_mass, 106.905093);
        assert!((resolved.density - 10.406).abs() < 1e-3);
    }

    #[test]
    fn unknown_element_fails_resolution() {
        let (_dir, catalog) = fixture_database();
        let layer = Layer::new("Ne", ["Ne"], vec![1.0], Thickness::mm(1.0)).unwrap();
        assert!(ResolvedLayer::resolve(&catalog, &layer).is_err());
    }

    #[test]
    fn element_sigma_weights_isotopes() {
        let sigma = element_sigma(&[0.25, 0.75], &[vec![4.0, 8.0], vec![8.0, 4.0]]);
        assert_eq!(sigma, vec![7.0, 5.0]);
    }

    #[test]
    fn product_and_attenuation() {
        let p = product(&[vec![0.5, 1.0], vec![0.5, 0.25]], 2);
        assert_eq!(p, vec![0.25, 0.25]);
        assert_eq!(product(&[], 3), vec![1.0; 3]);
        assert_eq!(attenuation(&p), vec![0.75, 0.75]);
    }
}
