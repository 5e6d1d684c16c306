mod common;

use reso_core::stack::{formula_to_stack, validate_stack};
use reso_core::transmission::{atoms_per_cm3, ResolvedLayer};
use reso_core::units::AVOGADRO;
use reso_core::{EnergyGrid, ErrorKind, Simulation, Stack, TofGeometry, XUnit};

use common::{flat_sigma, reference_database};

#[test]
fn catalog_reads_csv_and_parquet_tables() {
    let (_dir, catalog) = reference_database();
    let elements: Vec<String> = catalog.list_elements().into_iter().collect();
    assert_eq!(elements, ["Ag", "Co", "Gd"]);

    let gd = catalog.element("Gd").unwrap();
    assert_eq!(gd.isotopes.len(), 7);
    let table = catalog.load_table(&gd.isotopes[0]).unwrap();
    assert_eq!(table.sigma_b[0], flat_sigma(152));
}

#[test]
fn json_stack_end_to_end() {
    let (_dir, catalog) = reference_database();
    let stack = Stack::from_json_str(
        r#"{
            "CoAg": {
                "elements": ["Co", "Ag"],
                "stoichiometric_ratio": [1, 1],
                "thickness": { "value": 0.025, "units": "mm" },
                "density": { "value": 9.8, "units": "g/cm3" }
            },
            "Gd": {
                "elements": ["Gd"],
                "stoichiometric_ratio": [1],
                "thickness": { "value": 10, "units": "um" }
            }
        }"#,
    )
    .unwrap();
    assert_eq!(stack.names().collect::<Vec<_>>(), ["CoAg", "Gd"]);
    assert!(validate_stack(&catalog, &stack).unwrap());

    let grid = EnergyGrid::new(1.0, 100.0, 0.5).unwrap();
    let sim = Simulation::new(&catalog, &stack, grid).unwrap();

    // flat tables give a flat transmission
    let total = sim.total_transmission();
    let first = total.y_axis[0];
    assert!(total.y_axis.iter().all(|t| (t - first).abs() < 1e-12));

    // Gd thickness was given in micrometres
    let gd = sim.layer("Gd").unwrap();
    assert!((gd.resolved.thickness.in_cm() - 1e-3).abs() < 1e-15);
    assert!(gd.resolved.density_derived);

    let coag = sim.layer("CoAg").unwrap();
    let ag = coag.element("Ag").unwrap();
    let sigma_ag = 0.51839 * flat_sigma(107) + 0.48161 * flat_sigma(109);
    let expected = (-0.0025 * 1e-24 * sigma_ag * ag.atoms_per_cm3).exp();
    assert!((ag.transmission[0] - expected).abs() < 1e-12);
}

#[test]
fn formula_stack_matches_explicit_layer() {
    let (_dir, catalog) = reference_database();
    let stack = formula_to_stack(&catalog, "CoAg", Some(0.025), Some(9.8)).unwrap();
    let layer = stack.get("CoAg").unwrap();
    assert_eq!(layer.elements(), ["Co", "Ag"]);

    let resolved = ResolvedLayer::resolve(&catalog, layer).unwrap();
    let atoms = atoms_per_cm3(&resolved);
    let molar = 58.9332002
        + (106.905093 * 0.51839 + 108.904756 * 0.48161 + 109.90611 * 0.0 + 110.905295 * 0.0);
    let expected = AVOGADRO * 9.8 / molar;
    assert!((atoms["Ag"] - expected).abs() / expected < 1e-12);
}

#[test]
fn unknown_element_in_formula() {
    let (_dir, catalog) = reference_database();
    let err = formula_to_stack(&catalog, "AgNe", Some(1.0), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("'Ne'"));
}

#[test]
fn custom_isotopic_ratio_from_json() {
    let (_dir, catalog) = reference_database();
    let stack = Stack::from_json_str(
        r#"{
            "Ag": {
                "elements": ["Ag"],
                "stoichiometric_ratio": [1],
                "thickness": { "value": 0.1 },
                "isotopic_ratio": { "Ag": [0, 1, 0, 0] }
            }
        }"#,
    )
    .unwrap();
    let grid = EnergyGrid::new(1.0, 10.0, 1.0).unwrap();
    let sim = Simulation::new(&catalog, &stack, grid).unwrap();
    let ag = sim.layer("Ag").unwrap().element("Ag").unwrap();
    assert!((ag.sigma_b[0] - flat_sigma(109)).abs() < 1e-12);
}

#[test]
fn time_of_flight_axis() {
    let (_dir, catalog) = reference_database();
    let stack = formula_to_stack(&catalog, "Ag", Some(0.025), None).unwrap();
    let grid = EnergyGrid::new(1.0, 100.0, 1.0).unwrap();
    let sim = Simulation::new(&catalog, &stack, grid).unwrap();

    let err = sim.x_axis(XUnit::Time, &TofGeometry::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let geometry = TofGeometry::new(16.45, 0.0);
    let tof = sim.x_axis(XUnit::Time, &geometry).unwrap();
    let lambda = (81.787f64 / 1000.0).sqrt();
    assert!((tof[0] - lambda * 16.45 / 3956.0).abs() < 1e-12);
    assert!(tof.windows(2).all(|w| w[1] < w[0]));
}
