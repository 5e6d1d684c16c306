//! Material stacks: typed layers, JSON / formula parsing and validation
//! against a [`Catalog`].
//!
//! Shape invariants (matching lengths, positive ratios, sane thickness and
//! density) are enforced when a [`Layer`] is built. Whether the elements
//! exist is a property of a particular catalog and is checked by
//! [`validate_stack`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::data::catalog::Catalog;
use crate::error::{Error, Result, UnitSide};
use crate::units::{DensityUnit, DistanceUnit};

/// Tolerance on isotopic ratios summing to one.
const RATIO_SUM_TOLERANCE: f64 = 1e-4;

// ---------------------------------------------------------------------------
// Quantity
// ---------------------------------------------------------------------------

/// A value with units. A NaN value means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantity<U> {
    pub value: f64,
    pub units: U,
}

pub type Thickness = Quantity<DistanceUnit>;
pub type Density = Quantity<DensityUnit>;

impl<U> Quantity<U> {
    pub fn new(value: f64, units: U) -> Self {
        Self { value, units }
    }

    /// The "not set" quantity.
    pub fn unset(units: U) -> Self {
        Self {
            value: f64::NAN,
            units,
        }
    }

    pub fn is_set(&self) -> bool {
        !self.value.is_nan()
    }

    /// The value, if set.
    pub fn get(&self) -> Option<f64> {
        self.is_set().then_some(self.value)
    }
}

impl Thickness {
    pub fn mm(value: f64) -> Self {
        Self::new(value, DistanceUnit::Millimeter)
    }

    /// Thickness in centimeters.
    pub fn in_cm(&self) -> f64 {
        self.units.convert(self.value, DistanceUnit::Centimeter)
    }
}

impl Density {
    pub fn g_per_cm3(value: f64) -> Self {
        Self::new(value, DensityUnit::GramsPerCm3)
    }
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// One entry of a stack: a compound of elements with a thickness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    name: String,
    elements: Vec<String>,
    stoichiometric_ratio: Vec<f64>,
    thickness: Thickness,
    density: Density,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    isotopic_ratios: BTreeMap<String, Vec<f64>>,
}

impl Layer {
    /// Build a layer, checking its shape.
    ///
    /// A NaN thickness is accepted as "not set"; anything else must be finite
    /// and non-negative. The density starts unset (derived later).
    pub fn new<S: Into<String>>(
        name: &str,
        elements: impl IntoIterator<Item = S>,
        stoichiometric_ratio: Vec<f64>,
        thickness: Thickness,
    ) -> Result<Self> {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();

        if name.is_empty() {
            return Err(Error::invalid_layer(name, "layer name is empty"));
        }
        if elements.is_empty() {
            return Err(Error::invalid_layer(name, "no elements"));
        }
        if elements.len() != stoichiometric_ratio.len() {
            return Err(Error::SizeMismatch {
                layer: name.to_string(),
                elements: elements.len(),
                ratios: stoichiometric_ratio.len(),
            });
        }
        if let Some(r) = stoichiometric_ratio
            .iter()
            .find(|r| !(r.is_finite() && **r > 0.0))
        {
            return Err(Error::invalid_layer(
                name,
                format!("stoichiometric ratio must be a positive number, got {r}"),
            ));
        }
        for (i, e) in elements.iter().enumerate() {
            if elements[..i].contains(e) {
                return Err(Error::invalid_layer(name, format!("element '{e}' listed twice")));
            }
        }
        if thickness.is_set() && !(thickness.value.is_finite() && thickness.value >= 0.0) {
            return Err(Error::invalid_layer(
                name,
                format!("thickness must be finite and non-negative, got {}", thickness.value),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            elements,
            stoichiometric_ratio,
            thickness,
            density: Density::unset(DensityUnit::GramsPerCm3),
            isotopic_ratios: BTreeMap::new(),
        })
    }

    /// Set an explicit density. NaN leaves it unset.
    pub fn with_density(mut self, density: Density) -> Result<Self> {
        if density.is_set() && !(density.value.is_finite() && density.value > 0.0) {
            return Err(Error::invalid_layer(
                &self.name,
                format!("density must be a finite positive number, got {}", density.value),
            ));
        }
        self.density = density;
        Ok(self)
    }

    /// Override the natural isotopic abundances of one element of this layer.
    ///
    /// The number of ratios is checked against the catalog during
    /// validation.
    pub fn with_isotopic_ratio(mut self, element: &str, ratios: Vec<f64>) -> Result<Self> {
        if !self.elements.iter().any(|e| e == element) {
            return Err(Error::invalid_layer(
                &self.name,
                format!("element '{element}' is not part of the layer"),
            ));
        }
        if ratios.iter().any(|r| !(r.is_finite() && *r >= 0.0)) {
            return Err(Error::invalid_layer(
                &self.name,
                format!("isotopic ratios of '{element}' must be non-negative"),
            ));
        }
        let total: f64 = ratios.iter().sum();
        if (total - 1.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(Error::invalid_layer(
                &self.name,
                format!("isotopic ratios of '{element}' sum to {total}, expected 1"),
            ));
        }
        self.isotopic_ratios.insert(element.to_string(), ratios);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn stoichiometric_ratio(&self) -> &[f64] {
        &self.stoichiometric_ratio
    }

    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    pub fn density(&self) -> Density {
        self.density
    }

    /// Custom isotopic ratios for `element`, if any were set.
    pub fn isotopic_ratio(&self, element: &str) -> Option<&[f64]> {
        self.isotopic_ratios.get(element).map(Vec::as_slice)
    }

    /// Elements paired with their stoichiometric ratios.
    pub fn composition(&self) -> impl Iterator<Item = (&str, f64)> {
        self.elements
            .iter()
            .map(String::as_str)
            .zip(self.stoichiometric_ratio.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

/// Ordered collection of uniquely named layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stack {
    layers: Vec<Layer>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer; names must be unique.
    pub fn push(&mut self, layer: Layer) -> Result<()> {
        if self.get(layer.name()).is_some() {
            return Err(Error::invalid_layer(layer.name(), "duplicate layer name"));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_layer(mut self, layer: Layer) -> Result<Self> {
        self.push(layer)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    /// Layers in insertion order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(Layer::name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Parse a JSON stack description.
    ///
    /// Expected schema (layer name → layer):
    ///
    /// ```json
    /// {
    ///   "CoAg": {
    ///     "elements": ["Co", "Ag"],
    ///     "stoichiometric_ratio": [1, 1],
    ///     "thickness": { "value": 0.025, "units": "mm" },
    ///     "density": { "value": 9.8, "units": "g/cm3" }
    ///   }
    /// }
    /// ```
    ///
    /// `density` is optional; `units` default to mm and g/cm3. An optional
    /// `"isotopic_ratio": { "Ag": [...] }` overrides natural abundances.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let layers = value
            .as_object()
            .ok_or_else(|| Error::invalid_layer("<stack>", "expected a JSON object of layers"))?;

        let mut stack = Stack::new();
        for (name, body) in layers {
            stack.push(layer_from_json(name, body)?)?;
        }
        Ok(stack)
    }

    /// Parse a JSON stack description from text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| Error::invalid_layer("<stack>", format!("parsing JSON: {e}")))?;
        Self::from_json(&value)
    }
}

fn layer_from_json(name: &str, body: &JsonValue) -> Result<Layer> {
    let obj = body
        .as_object()
        .ok_or_else(|| Error::invalid_layer(name, "expected a JSON object"))?;

    let elements = obj
        .get("elements")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| Error::invalid_layer(name, "missing or invalid 'elements' array"))?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_layer(name, format!("elements[{i}]: not a string")))
        })
        .collect::<Result<Vec<String>>>()?;

    let ratios = obj
        .get("stoichiometric_ratio")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| {
            Error::invalid_layer(name, "missing or invalid 'stoichiometric_ratio' array")
        })?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| {
                Error::invalid_layer(name, format!("stoichiometric_ratio[{i}]: not a number"))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let thickness_obj = obj
        .get("thickness")
        .ok_or_else(|| Error::invalid_layer(name, "missing 'thickness'"))?;
    let thickness_value = quantity_value(name, "thickness", thickness_obj)?;
    let thickness_units = match quantity_units(name, "thickness", thickness_obj)? {
        Some(u) => DistanceUnit::parse(u, UnitSide::From)?,
        None => DistanceUnit::Millimeter,
    };

    let mut layer = Layer::new(
        name,
        elements,
        ratios,
        Thickness::new(thickness_value, thickness_units),
    )?;

    if let Some(density_obj) = obj.get("density") {
        let value = quantity_value(name, "density", density_obj)?;
        let units = match quantity_units(name, "density", density_obj)? {
            Some(u) => DensityUnit::parse(u)?,
            None => DensityUnit::GramsPerCm3,
        };
        layer = layer.with_density(Density::new(value, units))?;
    }

    if let Some(ratios) = obj.get("isotopic_ratio") {
        let ratios = ratios
            .as_object()
            .ok_or_else(|| Error::invalid_layer(name, "'isotopic_ratio' must map elements to arrays"))?;
        for (element, values) in ratios {
            let values = values
                .as_array()
                .and_then(|v| v.iter().map(JsonValue::as_f64).collect::<Option<Vec<f64>>>())
                .ok_or_else(|| {
                    Error::invalid_layer(name, format!("isotopic_ratio['{element}']: expected numbers"))
                })?;
            layer = layer.with_isotopic_ratio(element, values)?;
        }
    }

    Ok(layer)
}

/// `{ "value": <number|null> }` → f64 (null → NaN, i.e. unset).
fn quantity_value(layer: &str, key: &str, obj: &JsonValue) -> Result<f64> {
    match obj.get("value") {
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::invalid_layer(layer, format!("{key} value is not a number"))),
        Some(JsonValue::Null) => Ok(f64::NAN),
        Some(JsonValue::String(s)) => Err(Error::invalid_layer(
            layer,
            format!("{key} value must be a number, got string '{s}'"),
        )),
        Some(other) => Err(Error::invalid_layer(
            layer,
            format!("{key} value must be a number, got {other}"),
        )),
        None => Err(Error::invalid_layer(layer, format!("missing {key} value"))),
    }
}

fn quantity_units<'a>(layer: &str, key: &str, obj: &'a JsonValue) -> Result<Option<&'a str>> {
    match obj.get("units") {
        None => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(Error::invalid_layer(
            layer,
            format!("{key} units must be a string, got {other}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Validation against a catalog
// ---------------------------------------------------------------------------

/// Check every layer of `stack` against `catalog`.
///
/// Stops at the first violation: an element missing from the catalog, a
/// thickness that is not set, or custom isotopic ratios whose count does
/// not match the element's isotopes.
pub fn validate_stack(catalog: &Catalog, stack: &Stack) -> Result<bool> {
    if stack.is_empty() {
        return Err(Error::invalid_layer("<stack>", "stack has no layers"));
    }

    for layer in stack.layers() {
        for element in layer.elements() {
            if !catalog.is_element_in_database(element) {
                return Err(Error::unknown_element(element, layer.name()));
            }
        }

        if layer.elements().len() != layer.stoichiometric_ratio().len() {
            return Err(Error::SizeMismatch {
                layer: layer.name().to_string(),
                elements: layer.elements().len(),
                ratios: layer.stoichiometric_ratio().len(),
            });
        }

        if !layer.thickness().value.is_finite() {
            return Err(Error::invalid_layer(
                layer.name(),
                format!("thickness must be a finite number, got {}", layer.thickness().value),
            ));
        }

        for (element, ratios) in &layer.isotopic_ratios {
            let expected = catalog.element(element).map_or(0, |e| e.isotopes.len());
            if ratios.len() != expected {
                return Err(Error::invalid_layer(
                    layer.name(),
                    format!(
                        "'{element}' has {expected} isotopes but {} isotopic ratios were given",
                        ratios.len()
                    ),
                ));
            }
        }
    }

    Ok(true)
}

// ---------------------------------------------------------------------------
// Chemical formula shorthand
// ---------------------------------------------------------------------------

/// Parse a compact formula (`Ag2CoU3`) into a single-layer stack named after
/// the formula.
///
/// Counts are optional (default 1) and may be decimal. Repeated symbols are
/// merged. Thickness (mm) and density (g/cm³) stay unset when `None`.
pub fn formula_to_stack(
    catalog: &Catalog,
    formula: &str,
    thickness_mm: Option<f64>,
    density: Option<f64>,
) -> Result<Stack> {
    let tokens = parse_formula(formula)?;

    let mut elements: Vec<String> = Vec::new();
    let mut ratios: Vec<f64> = Vec::new();
    for (symbol, count) in tokens {
        if !catalog.is_element_in_database(&symbol) {
            return Err(Error::unknown_element(&symbol, formula));
        }
        match elements.iter().position(|e| *e == symbol) {
            Some(i) => ratios[i] += count,
            None => {
                elements.push(symbol);
                ratios.push(count);
            }
        }
    }

    let thickness = Thickness::mm(thickness_mm.unwrap_or(f64::NAN));
    let density = Density::g_per_cm3(density.unwrap_or(f64::NAN));
    let layer = Layer::new(formula, elements, ratios, thickness)?.with_density(density)?;

    Stack::new().with_layer(layer)
}

/// Split a formula into `(symbol, count)` tokens.
fn parse_formula(formula: &str) -> Result<Vec<(String, f64)>> {
    let malformed = |detail: String| Error::invalid_layer(formula, detail);

    if formula.is_empty() {
        return Err(malformed("empty formula".to_string()));
    }

    let chars: Vec<char> = formula.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            return Err(malformed(format!(
                "unexpected '{}' at position {i}; element symbols start with an uppercase letter",
                chars[i]
            )));
        }
        let start = i;
        i += 1;
        while i < chars.len() && chars[i].is_ascii_lowercase() {
            i += 1;
        }
        let symbol: String = chars[start..i].iter().collect();

        let num_start = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
            i += 1;
        }
        let count = if num_start == i {
            1.0
        } else {
            let text: String = chars[num_start..i].iter().collect();
            match text.parse::<f64>() {
                Ok(c) if c > 0.0 => c,
                _ => return Err(malformed(format!("invalid count '{text}' for {symbol}"))),
            }
        };
        tokens.push((symbol, count));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::fixture_database;
    use serde_json::json;

    fn simple_layer(name: &str, elements: &[&str], ratios: Vec<f64>, mm: f64) -> Layer {
        Layer::new(name, elements.iter().copied(), ratios, Thickness::mm(mm)).unwrap()
    }

    #[test]
    fn valid_stacks() {
        let (_dir, catalog) = fixture_database();

        let stack = Stack::new()
            .with_layer(simple_layer("Ag", &["Ag"], vec![1.0], 0.025))
            .unwrap();
        assert!(validate_stack(&catalog, &stack).unwrap());

        let stack = Stack::new()
            .with_layer(simple_layer("Co", &["Co"], vec![1.0], 0.03))
            .unwrap()
            .with_layer(simple_layer("GdEu", &["Gd", "Eu"], vec![1.0, 1.0], 0.025))
            .unwrap();
        assert!(validate_stack(&catalog, &stack).unwrap());
        assert_eq!(stack.names().collect::<Vec<_>>(), vec!["Co", "GdEu"]);
    }

    #[test]
    fn unknown_element_names_symbol_and_layer() {
        let (_dir, catalog) = fixture_database();
        let stack = Stack::new()
            .with_layer(simple_layer("Ne", &["Ne"], vec![1.0], 0.03))
            .unwrap()
            .with_layer(simple_layer("GdEu", &["Gd", "Eu"], vec![1.0, 1.0], 0.025))
            .unwrap();
        let err = validate_stack(&catalog, &stack).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, Error::UnknownElement { ref symbol, ref layer } if symbol == "Ne" && layer == "Ne"));
    }

    #[test]
    fn size_mismatch_is_rejected_at_construction() {
        let err = Layer::new("GdEu", ["Gd", "Eu"], vec![1.0], Thickness::mm(0.025)).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { elements: 2, ratios: 1, .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn layer_shape_checks() {
        assert!(Layer::new("x", ["Ag"], vec![0.0], Thickness::mm(1.0)).is_err());
        assert!(Layer::new("x", ["Ag"], vec![1.0], Thickness::mm(-1.0)).is_err());
        assert!(Layer::new("x", ["Ag"], vec![1.0], Thickness::mm(f64::INFINITY)).is_err());
        assert!(Layer::new("x", ["Ag", "Ag"], vec![1.0, 1.0], Thickness::mm(1.0)).is_err());
        assert!(Layer::new("x", Vec::<String>::new(), vec![], Thickness::mm(1.0)).is_err());

        let layer = simple_layer("x", &["Ag"], vec![1.0], 1.0);
        assert!(layer.clone().with_density(Density::g_per_cm3(-2.0)).is_err());
        assert!(layer.clone().with_density(Density::g_per_cm3(f64::INFINITY)).is_err());
        assert!(layer.with_density(Density::g_per_cm3(f64::NAN)).is_ok());
    }

    #[test]
    fn duplicate_layer_names() {
        let mut stack = Stack::new();
        stack.push(simple_layer("Ag", &["Ag"], vec![1.0], 1.0)).unwrap();
        assert!(stack.push(simple_layer("Ag", &["Ag"], vec![1.0], 2.0)).is_err());
    }

    #[test]
    fn unset_thickness_fails_validation() {
        let (_dir, catalog) = fixture_database();
        let stack = formula_to_stack(&catalog, "Ag", None, None).unwrap();
        let err = validate_stack(&catalog, &stack).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn json_stack() {
        let value = json!({
            "CoAg": {
                "elements": ["Co", "Ag"],
                "stoichiometric_ratio": [1, 1],
                "thickness": {"value": 0.025, "units": "mm"},
                "density": {"value": 9.8, "units": "g/cm3"}
            },
            "Ag": {
                "elements": ["Ag"],
                "stoichiometric_ratio": [1],
                "thickness": {"value": 0.03, "units": "mm"}
            }
        });
        let stack = Stack::from_json(&value).unwrap();
        assert_eq!(stack.names().collect::<Vec<_>>(), vec!["CoAg", "Ag"]);
        let coag = stack.get("CoAg").unwrap();
        assert_eq!(coag.density().get(), Some(9.8));
        assert_eq!(coag.thickness(), Thickness::mm(0.025));
        assert!(!stack.get("Ag").unwrap().density().is_set());
    }

    #[test]
    fn json_string_thickness_is_type_error() {
        let value = json!({
            "Ag": {
                "elements": ["Ag"],
                "stoichiometric_ratio": [1],
                "thickness": {"value": "0.025", "units": "mm"}
            }
        });
        let err = Stack::from_json(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("got string"));
    }

    #[test]
    fn json_size_mismatch() {
        let value = json!({
            "GdEu": {
                "elements": ["Gd", "Eu"],
                "stoichiometric_ratio": [1],
                "thickness": {"value": 0.025, "units": "mm"}
            }
        });
        let err = Stack::from_json(&value).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { .. }));
    }

    #[test]
    fn json_bad_units() {
        let value = json!({
            "Ag": {
                "elements": ["Ag"],
                "stoichiometric_ratio": [1],
                "thickness": {"value": 0.025, "units": "inch"}
            }
        });
        let err = Stack::from_json(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn formula_cases() {
        let (_dir, catalog) = fixture_database();

        let stack = formula_to_stack(&catalog, "Ag", None, None).unwrap();
        let layer = stack.get("Ag").unwrap();
        assert_eq!(layer.elements(), &["Ag".to_string()]);
        assert_eq!(layer.stoichiometric_ratio(), &[1.0]);
        assert!(layer.thickness().value.is_nan());
        assert_eq!(layer.thickness().units, DistanceUnit::Millimeter);
        assert!(layer.density().value.is_nan());
        assert_eq!(layer.density().units, DensityUnit::GramsPerCm3);

        let stack = formula_to_stack(&catalog, "Ag2Co", Some(10.0), None).unwrap();
        let layer = stack.get("Ag2Co").unwrap();
        assert_eq!(layer.elements(), &["Ag".to_string(), "Co".to_string()]);
        assert_eq!(layer.stoichiometric_ratio(), &[2.0, 1.0]);
        assert_eq!(layer.thickness().get(), Some(10.0));

        let stack = formula_to_stack(&catalog, "Ag2CoU3", None, Some(20.0)).unwrap();
        let layer = stack.get("Ag2CoU3").unwrap();
        assert_eq!(layer.stoichiometric_ratio(), &[2.0, 1.0, 3.0]);
        assert!(!layer.thickness().is_set());
        assert_eq!(layer.density().get(), Some(20.0));

        let stack = formula_to_stack(&catalog, "Ag2Co", Some(0.025), None).unwrap();
        assert_eq!(stack.get("Ag2Co").unwrap().thickness().get(), Some(0.025));
    }

    #[test]
    fn formula_with_unknown_element() {
        let (_dir, catalog) = fixture_database();
        let err = formula_to_stack(&catalog, "NeCo", None, None).unwrap_err();
        assert!(matches!(err, Error::UnknownElement { ref symbol, .. } if symbol == "Ne"));
    }

    #[test]
    fn formula_parsing_edge_cases() {
        assert_eq!(
            parse_formula("Co0.5Ag1.5").unwrap(),
            vec![("Co".to_string(), 0.5), ("Ag".to_string(), 1.5)]
        );
        assert!(parse_formula("").is_err());
        assert!(parse_formula("2Ag").is_err());
        assert!(parse_formula("Ag0").is_err());
        assert!(parse_formula("Ag-Co").is_err());

        let (_dir, catalog) = fixture_database();
        let stack = formula_to_stack(&catalog, "AgCoAg", None, None).unwrap();
        assert_eq!(stack.layers()[0].stoichiometric_ratio(), &[2.0, 1.0]);
    }

    #[test]
    fn custom_isotopic_ratios() {
        let (_dir, catalog) = fixture_database();
        let layer = simple_layer("Ag", &["Ag"], vec![1.0], 0.025);

        assert!(layer.clone().with_isotopic_ratio("Co", vec![1.0]).is_err());
        assert!(layer.clone().with_isotopic_ratio("Ag", vec![0.5, 0.4]).is_err());

        let enriched = layer.clone().with_isotopic_ratio("Ag", vec![1.0, 0.0]).unwrap();
        let stack = Stack::new().with_layer(enriched).unwrap();
        assert!(validate_stack(&catalog, &stack).is_err());

        let enriched = layer
            .with_isotopic_ratio("Ag", vec![1.0, 0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(enriched.isotopic_ratio("Ag"), Some(&[1.0, 0.0, 0.0, 0.0][..]));
        let stack = Stack::new().with_layer(enriched).unwrap();
        assert!(validate_stack(&catalog, &stack).unwrap());
    }
}
