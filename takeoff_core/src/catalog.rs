//! # Price Book
//!
//! Snapshot of the material price catalog the engine resolves against.
//! The book is assembled by the persistence layer (base prices, user
//! overrides, regional multiplier already applied); the engine only reads
//! from it.
//!
//! ## Resolution Policy
//!
//! Every lookup degrades to `0.0` instead of erroring. Zero means "price
//! unknown", never "item free" — callers are expected to surface unresolved
//! prices to the user. Misses are logged at debug level so a takeoff with
//! blank lines can be diagnosed without breaking the computation.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::PriceBook;
//!
//! let mut book = PriceBook::new();
//! book.add_material("Cement", 850.0);
//! book.add_fastener("Hinges", "butt-hinge", "100mm", 120.0);
//!
//! assert_eq!(book.material_price("cement"), 850.0);
//! // Category lookup tolerates singular/plural naming
//! assert_eq!(book.fastener_price_by("hinge", "butt-hinge", "100mm"), 120.0);
//! assert_eq!(book.material_price("Gold Leaf"), 0.0);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::materials::RebarSize;
use crate::openings::FastenerSelection;

/// A typed variant under a material entry (e.g. "Panel" under "Doors"),
/// optionally carrying per-size prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaterialVariant {
    pub name: String,
    pub price: Option<f64>,
    /// Price per catalog size label (e.g. "0.9 × 2.1 m" → 4500)
    #[serde(default)]
    pub size_prices: HashMap<String, f64>,
}

/// A material entry: either a flat price, typed variants, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaterialEntry {
    pub name: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub variants: Vec<MaterialVariant>,
}

/// A fastener/ironmongery catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerEntry {
    #[serde(rename = "type")]
    pub item_type: String,
    pub size: String,
    pub price: f64,
}

/// The assembled price catalog handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceBook {
    pub materials: Vec<MaterialEntry>,
    /// Fastener categories ("Hinges", "Architraves", ...) → entries
    #[serde(default)]
    pub fasteners: HashMap<String, Vec<FastenerEntry>>,
    /// DPC material name → price per meter
    #[serde(default)]
    pub dpc: HashMap<String, f64>,
    /// Rebar price per kg by size
    #[serde(default)]
    pub rebar: HashMap<RebarSize, f64>,
}

/// Normalize a category key for tolerant comparison: lowercase, alphanumeric
/// only ("Quarter_Rounds" → "quarterrounds").
fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

impl PriceBook {
    pub fn new() -> Self {
        PriceBook::default()
    }

    // === Assembly ===

    /// Add (or replace) a flat-priced material. Last write wins, which is
    /// how user overrides shadow base prices.
    pub fn add_material(&mut self, name: &str, price: f64) -> &mut Self {
        let entry = self.entry_mut(name);
        entry.price = Some(price);
        self
    }

    /// Add (or replace) a typed variant price under a material
    pub fn add_variant(&mut self, material: &str, variant: &str, price: f64) -> &mut Self {
        let entry = self.entry_mut(material);
        match entry
            .variants
            .iter()
            .position(|v| v.name.eq_ignore_ascii_case(variant))
        {
            Some(idx) => entry.variants[idx].price = Some(price),
            None => entry.variants.push(MaterialVariant {
                name: variant.to_string(),
                price: Some(price),
                size_prices: HashMap::new(),
            }),
        }
        self
    }

    /// Add (or replace) a per-size price under a material variant
    pub fn add_size_price(
        &mut self,
        material: &str,
        variant: &str,
        size: &str,
        price: f64,
    ) -> &mut Self {
        let entry = self.entry_mut(material);
        let idx = match entry
            .variants
            .iter()
            .position(|v| v.name.eq_ignore_ascii_case(variant))
        {
            Some(idx) => idx,
            None => {
                entry.variants.push(MaterialVariant {
                    name: variant.to_string(),
                    price: None,
                    size_prices: HashMap::new(),
                });
                entry.variants.len() - 1
            }
        };
        entry.variants[idx].size_prices.insert(size.to_string(), price);
        self
    }

    /// Add a fastener catalog row
    pub fn add_fastener(
        &mut self,
        category: &str,
        item_type: &str,
        size: &str,
        price: f64,
    ) -> &mut Self {
        self.fasteners
            .entry(category.to_string())
            .or_default()
            .push(FastenerEntry {
                item_type: item_type.to_string(),
                size: size.to_string(),
                price,
            });
        self
    }

    /// Add a DPC price per meter for a material name
    pub fn add_dpc(&mut self, material: &str, price_per_m: f64) -> &mut Self {
        self.dpc.insert(material.to_string(), price_per_m);
        self
    }

    /// Add a rebar price per kg
    pub fn add_rebar(&mut self, size: RebarSize, price_per_kg: f64) -> &mut Self {
        self.rebar.insert(size, price_per_kg);
        self
    }

    /// Scale every price by a regional multiplier. This belongs to the
    /// catalog layer; the engine never re-applies it.
    pub fn apply_regional_multiplier(&mut self, multiplier: f64) {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return;
        }
        for entry in &mut self.materials {
            if let Some(p) = entry.price.as_mut() {
                *p *= multiplier;
            }
            for variant in &mut entry.variants {
                if let Some(p) = variant.price.as_mut() {
                    *p *= multiplier;
                }
                for p in variant.size_prices.values_mut() {
                    *p *= multiplier;
                }
            }
        }
        for entries in self.fasteners.values_mut() {
            for e in entries {
                e.price *= multiplier;
            }
        }
        for p in self.dpc.values_mut() {
            *p *= multiplier;
        }
        for p in self.rebar.values_mut() {
            *p *= multiplier;
        }
    }

    fn entry_mut(&mut self, name: &str) -> &mut MaterialEntry {
        if let Some(idx) = self
            .materials
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(name))
        {
            &mut self.materials[idx]
        } else {
            self.materials.push(MaterialEntry {
                name: name.to_string(),
                price: None,
                variants: Vec::new(),
            });
            self.materials.last_mut().unwrap()
        }
    }

    // === Resolution ===

    /// Find a material entry by case-insensitive name
    pub fn material(&self, name: &str) -> Option<&MaterialEntry> {
        self.materials
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Flat material price; 0 when unknown
    pub fn material_price(&self, name: &str) -> f64 {
        match self.material(name).and_then(|m| m.price) {
            Some(price) => price,
            None => {
                debug!(material = name, "no flat price in catalog");
                0.0
            }
        }
    }

    /// Price for a material's typed variant; falls back to the first
    /// variant, then the flat price, then 0.
    pub fn material_type_price(&self, name: &str, variant: &str) -> f64 {
        let Some(entry) = self.material(name) else {
            debug!(material = name, "material missing from catalog");
            return 0.0;
        };
        let matched = entry
            .variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(variant))
            .or_else(|| entry.variants.first());
        matched
            .and_then(|v| v.price)
            .or(entry.price)
            .unwrap_or_else(|| {
                debug!(material = name, variant, "no variant price in catalog");
                0.0
            })
    }

    /// Price for a (material, variant, size) key. The size tier applies only
    /// when a size label is available; custom-sized openings fall through to
    /// the variant price.
    pub fn material_size_price(&self, name: &str, variant: &str, size: Option<&str>) -> f64 {
        let Some(entry) = self.material(name) else {
            debug!(material = name, "material missing from catalog");
            return 0.0;
        };
        let matched = entry
            .variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(variant))
            .or_else(|| entry.variants.first());
        let Some(v) = matched else {
            return entry.price.unwrap_or(0.0);
        };
        if let Some(size) = size {
            if let Some(price) = v.size_prices.get(size) {
                return *price;
            }
        }
        v.price.or(entry.price).unwrap_or_else(|| {
            debug!(material = name, variant, ?size, "no size price in catalog");
            0.0
        })
    }

    /// Variant price only when that exact variant exists (no fallbacks).
    /// Used by chained lookups like the putty price.
    pub fn variant_price_strict(&self, name: &str, variant: &str) -> Option<f64> {
        self.material(name)?
            .variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(variant))
            .and_then(|v| v.price)
    }

    /// Resolve a fastener category key tolerant of singular/plural and
    /// separator differences ("Quarter_Rounds", "quarter round", "hinge").
    pub fn resolve_fastener_category(&self, category: &str) -> Option<&str> {
        let target = normalize_key(category);
        let mut candidates = vec![target.clone()];
        if let Some(stripped) = target.strip_suffix('s') {
            candidates.push(stripped.to_string());
        } else {
            candidates.push(format!("{target}s"));
        }
        self.fasteners
            .keys()
            .find(|key| candidates.contains(&normalize_key(key)))
            .map(String::as_str)
    }

    /// Unit price for a fastener selection; 0 when the category, type, or
    /// size has no catalog row.
    pub fn fastener_price(&self, category: &str, selection: Option<&FastenerSelection>) -> f64 {
        let Some(selection) = selection else {
            return 0.0;
        };
        self.fastener_price_by(category, &selection.item_type, &selection.size)
    }

    /// Unit price for a fastener by explicit (category, type, size)
    pub fn fastener_price_by(&self, category: &str, item_type: &str, size: &str) -> f64 {
        let Some(key) = self.resolve_fastener_category(category) else {
            debug!(category, "fastener category missing from catalog");
            return 0.0;
        };
        self.fasteners
            .get(key)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|e| e.item_type == item_type && e.size == size)
            })
            .map(|e| e.price)
            .unwrap_or_else(|| {
                debug!(category, item_type, size, "fastener row missing");
                0.0
            })
    }

    /// Glass price per m² by glass type, via the "Glazing" material
    pub fn glass_price_per_m2(&self, glass_type: &str) -> f64 {
        let glass_type = if glass_type.is_empty() {
            "Clear"
        } else {
            glass_type
        };
        self.material_type_price("Glazing", glass_type)
    }

    /// Putty price per meter of rebate, trying the sealant variants in
    /// order: "Glazing Putty", "Putty", "Silicone".
    pub fn putty_price_per_m(&self) -> f64 {
        self.variant_price_strict("Sealant", "Glazing Putty")
            .or_else(|| self.variant_price_strict("Sealant", "Putty"))
            .or_else(|| self.variant_price_strict("Sealant", "Silicone"))
            .unwrap_or(0.0)
    }

    /// Sealant price for a packaging size ("600 ml sausage")
    pub fn sealant_size_price(&self, variant: &str, size: &str) -> f64 {
        self.material_size_price("Sealant", variant, Some(size))
    }

    /// DPC price per meter by material name; 0 when unknown
    pub fn dpc_price_per_m(&self, material: &str) -> f64 {
        self.dpc
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(material))
            .map(|(_, price)| *price)
            .unwrap_or_else(|| {
                debug!(material, "DPC material missing from catalog");
                0.0
            })
    }

    /// Rebar price per kg; 0 when unknown
    pub fn rebar_price_per_kg(&self, size: RebarSize) -> f64 {
        self.rebar.get(&size).copied().unwrap_or_else(|| {
            debug!(size = size.label(), "rebar size missing from catalog");
            0.0
        })
    }

    /// Strict flat-price lookup for callers that must distinguish "missing"
    /// from "free".
    pub fn require_material(&self, name: &str) -> CalcResult<f64> {
        self.material(name)
            .and_then(|m| m.price)
            .ok_or_else(|| CalcError::material_not_found(name))
    }
}

/// Price-override precedence: an explicit user price wins when set and
/// positive; otherwise the fallback resolver runs.
pub fn explicit_or(explicit: Option<f64>, fallback: impl FnOnce() -> f64) -> f64 {
    match explicit {
        Some(price) if price.is_finite() && price > 0.0 => price,
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> PriceBook {
        let mut book = PriceBook::new();
        book.add_material("Cement", 850.0)
            .add_material("Sand", 1800.0)
            .add_variant("Doors", "Panel", 6500.0)
            .add_size_price("Doors", "Panel", "0.9 × 2.1 m", 7000.0)
            .add_fastener("Hinges", "butt-hinge", "100mm", 120.0)
            .add_fastener("Quarter_Rounds", "timber-quarter-round", "20mm", 80.0)
            .add_dpc("Polyethylene", 95.0)
            .add_rebar(RebarSize::Y12, 140.0);
        book
    }

    #[test]
    fn test_flat_price_case_insensitive() {
        let book = sample_book();
        assert_eq!(book.material_price("cement"), 850.0);
        assert_eq!(book.material_price("CEMENT"), 850.0);
        assert_eq!(book.material_price("Missing"), 0.0);
    }

    #[test]
    fn test_size_tier_beats_variant_price() {
        let book = sample_book();
        assert_eq!(
            book.material_size_price("Doors", "Panel", Some("0.9 × 2.1 m")),
            7000.0
        );
        // Unknown size falls back to the variant price
        assert_eq!(
            book.material_size_price("Doors", "Panel", Some("9 × 9 m")),
            6500.0
        );
        // No size label at all (custom openings)
        assert_eq!(book.material_size_price("Doors", "Panel", None), 6500.0);
    }

    #[test]
    fn test_unknown_variant_falls_back_to_first() {
        let book = sample_book();
        assert_eq!(book.material_type_price("Doors", "Mystery"), 6500.0);
    }

    #[test]
    fn test_fastener_plural_singular_tolerance() {
        let book = sample_book();
        assert_eq!(book.fastener_price_by("Hinges", "butt-hinge", "100mm"), 120.0);
        assert_eq!(book.fastener_price_by("hinge", "butt-hinge", "100mm"), 120.0);
        assert_eq!(
            book.fastener_price_by("Quarter Rounds", "timber-quarter-round", "20mm"),
            80.0
        );
        assert_eq!(
            book.fastener_price_by("quarter_round", "timber-quarter-round", "20mm"),
            80.0
        );
        // Unknown type resolves to 0, not an error
        assert_eq!(book.fastener_price_by("Hinges", "piano-hinge", "100mm"), 0.0);
    }

    #[test]
    fn test_putty_price_chain() {
        let mut book = PriceBook::new();
        assert_eq!(book.putty_price_per_m(), 0.0);

        book.add_variant("Sealant", "Silicone", 30.0);
        assert_eq!(book.putty_price_per_m(), 30.0);

        book.add_variant("Sealant", "Glazing Putty", 25.0);
        assert_eq!(book.putty_price_per_m(), 25.0);
    }

    #[test]
    fn test_explicit_price_precedence() {
        assert_eq!(explicit_or(Some(500.0), || 100.0), 500.0);
        assert_eq!(explicit_or(Some(0.0), || 100.0), 100.0);
        assert_eq!(explicit_or(Some(-5.0), || 100.0), 100.0);
        assert_eq!(explicit_or(None, || 100.0), 100.0);
    }

    #[test]
    fn test_override_shadows_base_price() {
        let mut book = sample_book();
        // User override arrives last and wins
        book.add_material("Cement", 900.0);
        assert_eq!(book.material_price("Cement"), 900.0);
    }

    #[test]
    fn test_regional_multiplier() {
        let mut book = sample_book();
        book.apply_regional_multiplier(1.1);
        assert!((book.material_price("Cement") - 935.0).abs() < 1e-9);
        assert!((book.rebar_price_per_kg(RebarSize::Y12) - 154.0).abs() < 1e-9);
        assert!((book.dpc_price_per_m("Polyethylene") - 104.5).abs() < 1e-9);

        // Bad multipliers are ignored
        book.apply_regional_multiplier(f64::NAN);
        assert!((book.material_price("Cement") - 935.0).abs() < 1e-9);
    }

    #[test]
    fn test_require_material() {
        let book = sample_book();
        assert_eq!(book.require_material("Cement").unwrap(), 850.0);
        assert!(book.require_material("Unobtainium").is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let book = sample_book();
        let json = serde_json::to_string(&book).unwrap();
        let roundtrip: PriceBook = serde_json::from_str(&json).unwrap();
        assert_eq!(book, roundtrip);
    }
}
