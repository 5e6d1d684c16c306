use std::collections::{BTreeMap, HashMap};

use crate::data::catalog::Catalog;
use crate::error::Result;
use crate::interpolate::{interpolate, Curve, EnergyGrid};
use crate::stack::{validate_stack, Density, Stack};
use crate::transmission::{
    atoms_per_cm3, attenuation, calculate_transmission, element_sigma, product, ResolvedLayer,
};
use crate::units::{convert, TofGeometry, XUnit};

// ---------------------------------------------------------------------------
// Per-layer results
// ---------------------------------------------------------------------------

/// One isotope of an element in a layer.
#[derive(Debug, Clone)]
pub struct IsotopeResult {
    pub symbol: String,
    pub isotopic_ratio: f64,
    /// Interpolated cross-section (barns) on the simulation grid.
    pub sigma_b: Vec<f64>,
    /// Transmission of this isotope's share of the element.
    pub transmission: Vec<f64>,
}

/// One element of a layer.
#[derive(Debug, Clone)]
pub struct ElementResult {
    pub symbol: String,
    pub atoms_per_cm3: f64,
    /// Abundance-weighted cross-section Σ aᵢσᵢ (barns).
    pub sigma_b: Vec<f64>,
    pub transmission: Vec<f64>,
    pub isotopes: Vec<IsotopeResult>,
}

/// One layer of the stack.
#[derive(Debug, Clone)]
pub struct LayerResult {
    pub resolved: ResolvedLayer,
    pub elements: Vec<ElementResult>,
    pub transmission: Vec<f64>,
}

impl LayerResult {
    pub fn element(&self, symbol: &str) -> Option<&ElementResult> {
        self.elements.iter().find(|e| e.symbol == symbol)
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Transmission of a whole stack on one energy grid.
///
/// Built once from a catalog, a stack and a grid; every curve is computed
/// eagerly and the result is immutable.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: EnergyGrid,
    stack: Stack,
    layers: Vec<LayerResult>,
    total_transmission: Vec<f64>,
}

impl Simulation {
    pub fn new(catalog: &Catalog, stack: &Stack, grid: EnergyGrid) -> Result<Self> {
        validate_stack(catalog, stack)?;

        // isotope symbol -> sigma on the grid; each table is read once
        let mut sigma_cache: HashMap<String, Vec<f64>> = HashMap::new();
        let mut normalized = Stack::new();
        let mut layers = Vec::with_capacity(stack.len());

        for layer in stack.layers() {
            let resolved = ResolvedLayer::resolve(catalog, layer)?;
            let atoms = atoms_per_cm3(&resolved);
            let thickness_cm = resolved.thickness.in_cm();

            let mut elements = Vec::with_capacity(resolved.elements.len());
            for element in &resolved.elements {
                let n = atoms.get(&element.symbol).copied().unwrap_or(0.0);

                let mut isotopes = Vec::with_capacity(element.isotopes.len());
                for (isotope, &ratio) in element.isotopes.iter().zip(&element.isotopic_ratio) {
                    let sigma = match sigma_cache.get(&isotope.symbol) {
                        Some(sigma) => sigma.clone(),
                        None => {
                            let table = catalog.load_table(isotope)?;
                            let sigma = interpolate(&table, &grid)?.y_axis;
                            sigma_cache.insert(isotope.symbol.clone(), sigma.clone());
                            sigma
                        }
                    };
                    let weighted: Vec<f64> = sigma.iter().map(|s| ratio * s).collect();
                    isotopes.push(IsotopeResult {
                        symbol: isotope.symbol.clone(),
                        isotopic_ratio: ratio,
                        transmission: calculate_transmission(thickness_cm, n, &weighted),
                        sigma_b: sigma,
                    });
                }

                let sigma_b = element_sigma(
                    &element.isotopic_ratio,
                    &isotopes.iter().map(|i| i.sigma_b.clone()).collect::<Vec<_>>(),
                );
                elements.push(ElementResult {
                    symbol: element.symbol.clone(),
                    atoms_per_cm3: n,
                    transmission: calculate_transmission(thickness_cm, n, &sigma_b),
                    sigma_b,
                    isotopes,
                });
            }

            let transmission = product(
                &elements.iter().map(|e| e.transmission.clone()).collect::<Vec<_>>(),
                grid.len(),
            );

            normalized.push(
                layer
                    .clone()
                    .with_density(Density::g_per_cm3(resolved.density))?,
            )?;
            layers.push(LayerResult {
                resolved,
                elements,
                transmission,
            });
        }

        let total_transmission = product(
            &layers.iter().map(|l| l.transmission.clone()).collect::<Vec<_>>(),
            grid.len(),
        );

        log::info!(
            "simulated {} layer(s) over {} energies ({} isotope tables)",
            layers.len(),
            grid.len(),
            sigma_cache.len()
        );

        Ok(Self {
            grid,
            stack: normalized,
            layers,
            total_transmission,
        })
    }

    pub fn grid(&self) -> &EnergyGrid {
        &self.grid
    }

    /// The stack with every density resolved.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn layers(&self) -> &[LayerResult] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&LayerResult> {
        self.layers.iter().find(|l| l.resolved.name == name)
    }

    /// Atoms per cm³ of each element of the named layer.
    pub fn atoms_per_cm3(&self, layer: &str) -> Option<BTreeMap<String, f64>> {
        self.layer(layer).map(|l| atoms_per_cm3(&l.resolved))
    }

    pub fn total_transmission(&self) -> Curve {
        self.curve(self.total_transmission.clone())
    }

    pub fn total_attenuation(&self) -> Curve {
        self.curve(attenuation(&self.total_transmission))
    }

    pub fn layer_transmission(&self, layer: &str) -> Option<Curve> {
        let layer = self.layer(layer)?;
        Some(self.curve(layer.transmission.clone()))
    }

    pub fn element_transmission(&self, layer: &str, element: &str) -> Option<Curve> {
        let element = self.layer(layer)?.element(element)?;
        Some(self.curve(element.transmission.clone()))
    }

    /// Raw interpolated cross-section of `isotope` (e.g. `"107-Ag"`).
    pub fn isotope_sigma(&self, layer: &str, element: &str, isotope: &str) -> Option<Curve> {
        let isotope = self
            .layer(layer)?
            .element(element)?
            .isotopes
            .iter()
            .find(|i| i.symbol == isotope)?;
        Some(self.curve(isotope.sigma_b.clone()))
    }

    /// The energy grid expressed in `unit`.
    pub fn x_axis(&self, unit: XUnit, geometry: &TofGeometry) -> Result<Vec<f64>> {
        convert(self.grid.energies(), XUnit::Energy, unit, geometry)
    }

    fn curve(&self, y_axis: Vec<f64>) -> Curve {
        Curve {
            x_axis: self.grid.energies().to_vec(),
            y_axis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::stack::{Layer, Thickness};
    use crate::testing::{fixture_database, fixture_sigma};
    use crate::units::AVOGADRO;

    fn ag_stack(mm: f64) -> Stack {
        Stack::new()
            .with_layer(Layer::new("Ag", ["Ag"], vec![1.0], Thickness::mm(mm)).unwrap())
            .unwrap()
    }

    #[test]
    fn single_layer_matches_beer_lambert() {
        let (_dir, catalog) = fixture_database();
        let grid = EnergyGrid::new(1.0, 100.0, 1.0).unwrap();
        let sim = Simulation::new(&catalog, &ag_stack(0.025), grid).unwrap();

        let ag = catalog.element("Ag").unwrap();
        let molar_mass = ag.weighted_molar_mass(&ag.abundances());
        let n = AVOGADRO * 10.5 / molar_mass;

        let total = sim.total_transmission();
        for (e, t) in total.x_axis.iter().zip(&total.y_axis) {
            let sigma = 0.51839 * fixture_sigma("Ag", 107, *e) + 0.48161 * fixture_sigma("Ag", 109, *e);
            let expected = (-0.0025 * 1e-24 * sigma * n).exp();
            assert!((t - expected).abs() < 1e-12, "T({e}) = {t}, expected {expected}");
        }
    }

    #[test]
    fn total_is_product_of_layers() {
        let (_dir, catalog) = fixture_database();
        let stack = Stack::new()
            .with_layer(Layer::new("Ag", ["Ag"], vec![1.0], Thickness::mm(0.025)).unwrap())
            .unwrap()
            .with_layer(
                Layer::new("GdEu", ["Gd", "Eu"], vec![1.0, 1.0], Thickness::mm(0.03)).unwrap(),
            )
            .unwrap();
        let grid = EnergyGrid::new(1.0, 10.0, 0.5).unwrap();
        let sim = Simulation::new(&catalog, &stack, grid).unwrap();

        let ag = sim.layer_transmission("Ag").unwrap();
        let gdeu = sim.layer_transmission("GdEu").unwrap();
        let gd = sim.element_transmission("GdEu", "Gd").unwrap();
        let eu = sim.element_transmission("GdEu", "Eu").unwrap();
        let total = sim.total_transmission();

        for i in 0..total.len() {
            assert!((total.y_axis[i] - ag.y_axis[i] * gdeu.y_axis[i]).abs() < 1e-15);
            assert!((gdeu.y_axis[i] - gd.y_axis[i] * eu.y_axis[i]).abs() < 1e-15);
            assert!(total.y_axis[i] > 0.0 && total.y_axis[i] < 1.0);
        }

        let attenuation = sim.total_attenuation();
        assert!((attenuation.y_axis[0] + total.y_axis[0] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn isotope_product_matches_element() {
        let (_dir, catalog) = fixture_database();
        let grid = EnergyGrid::new(1.0, 50.0, 7.0).unwrap();
        let sim = Simulation::new(&catalog, &ag_stack(0.1), grid).unwrap();

        let element = sim.layer("Ag").unwrap().element("Ag").unwrap();
        let from_isotopes = product(
            &element.isotopes.iter().map(|i| i.transmission.clone()).collect::<Vec<_>>(),
            sim.grid().len(),
        );
        for (a, b) in from_isotopes.iter().zip(&element.transmission) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn thicker_layer_transmits_less() {
        let (_dir, catalog) = fixture_database();
        let grid = EnergyGrid::new(1.0, 10.0, 1.0).unwrap();
        let thin = Simulation::new(&catalog, &ag_stack(0.01), grid.clone()).unwrap();
        let thick = Simulation::new(&catalog, &ag_stack(1.0), grid).unwrap();
        for (a, b) in thin
            .total_transmission()
            .y_axis
            .iter()
            .zip(&thick.total_transmission().y_axis)
        {
            assert!(a > b);
        }
    }

    #[test]
    fn normalized_stack_carries_derived_density() {
        let (_dir, catalog) = fixture_database();
        let stack = ag_stack(0.025);
        let grid = EnergyGrid::new(1.0, 10.0, 1.0).unwrap();
        let sim = Simulation::new(&catalog, &stack, grid).unwrap();

        assert!(!stack.get("Ag").unwrap().density().is_set());
        assert_eq!(sim.stack().get("Ag").unwrap().density().get(), Some(10.5));
    }

    #[test]
    fn isotope_sigma_is_raw_table_value() {
        let (_dir, catalog) = fixture_database();
        let grid = EnergyGrid::new(10.0, 100.0, 10.0).unwrap();
        let sim = Simulation::new(&catalog, &ag_stack(0.025), grid).unwrap();

        let sigma = sim.isotope_sigma("Ag", "Ag", "107-Ag").unwrap();
        for (e, s) in sigma.x_axis.iter().zip(&sigma.y_axis) {
            assert!((s - fixture_sigma("Ag", 107, *e)).abs() < 1e-9);
        }
        assert!(sim.isotope_sigma("Ag", "Ag", "108-Ag").is_none());
        assert!(sim.layer_transmission("Co").is_none());
    }

    #[test]
    fn x_axis_in_wavelength() {
        let (_dir, catalog) = fixture_database();
        let grid = EnergyGrid::new(1.0, 10.0, 1.0).unwrap();
        let sim = Simulation::new(&catalog, &ag_stack(0.025), grid).unwrap();
        let lambda = sim
            .x_axis(XUnit::Wavelength, &TofGeometry::default())
            .unwrap();
        assert!((lambda[0] - (81.787f64 / 1000.0).sqrt()).abs() < 1e-12);
        assert!(lambda.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn invalid_stack_or_grid_is_rejected() {
        let (_dir, catalog) = fixture_database();
        let grid = EnergyGrid::new(1.0, 10.0, 1.0).unwrap();
        let err = Simulation::new(&catalog, &Stack::new(), grid).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let grid = EnergyGrid::new(1.0, 5000.0, 100.0).unwrap();
        let err = Simulation::new(&catalog, &ag_stack(0.025), grid).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }
}
