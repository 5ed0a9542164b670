//! Reinforcement Bar Properties
//!
//! Diameter and unit-weight ladder per BS 4449 / ISO 6935, plus the bar
//! scheduling helpers the professional elements need: development length,
//! lap length, bend deduction, and splitting a required run into standard
//! 12 m stock bars.

use serde::{Deserialize, Serialize};

/// Standard stock bar length in meters
pub const STANDARD_BAR_LENGTH_M: f64 = 12.0;

/// High-yield deformed bar sizes (Y-series)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RebarSize {
    Y8,
    Y10,
    Y12,
    Y16,
    Y20,
    Y25,
}

impl RebarSize {
    /// All sizes in ascending diameter order
    pub const ALL: [RebarSize; 6] = [
        RebarSize::Y8,
        RebarSize::Y10,
        RebarSize::Y12,
        RebarSize::Y16,
        RebarSize::Y20,
        RebarSize::Y25,
    ];

    /// Nominal bar diameter in millimeters
    pub fn diameter_mm(&self) -> f64 {
        match self {
            RebarSize::Y8 => 8.0,
            RebarSize::Y10 => 10.0,
            RebarSize::Y12 => 12.0,
            RebarSize::Y16 => 16.0,
            RebarSize::Y20 => 20.0,
            RebarSize::Y25 => 25.0,
        }
    }

    /// Nominal bar diameter in meters
    pub fn diameter_m(&self) -> f64 {
        self.diameter_mm() / 1000.0
    }

    /// Unit weight in kg per meter
    pub fn weight_kg_per_m(&self) -> f64 {
        match self {
            RebarSize::Y8 => 0.395,
            RebarSize::Y10 => 0.617,
            RebarSize::Y12 => 0.888,
            RebarSize::Y16 => 1.579,
            RebarSize::Y20 => 2.466,
            RebarSize::Y25 => 3.855,
        }
    }

    /// Catalog label ("Y12")
    pub fn label(&self) -> &'static str {
        match self {
            RebarSize::Y8 => "Y8",
            RebarSize::Y10 => "Y10",
            RebarSize::Y12 => "Y12",
            RebarSize::Y16 => "Y16",
            RebarSize::Y20 => "Y20",
            RebarSize::Y25 => "Y25",
        }
    }

    /// Weight of a given length of this bar size, in kg
    pub fn weight_for_length_kg(&self, length_m: f64) -> f64 {
        length_m * self.weight_kg_per_m()
    }

    /// Development (anchorage) length = factor × bar diameter
    pub fn development_length_m(&self, factor: f64) -> f64 {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            40.0
        };
        factor * self.diameter_m()
    }

    /// Lap (splice) length = factor × bar diameter
    pub fn lap_length_m(&self, factor: f64) -> f64 {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            50.0
        };
        factor * self.diameter_m()
    }

    /// Bend deduction: one bar diameter per 90° bend
    pub fn bend_deduction_m(&self, bends: u32) -> f64 {
        bends as f64 * self.diameter_m()
    }
}

impl Default for RebarSize {
    fn default() -> Self {
        RebarSize::Y12
    }
}

impl std::fmt::Display for RebarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of splitting a required run into standard stock bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockSplit {
    /// Physical bars to purchase
    pub bars_needed: u64,
    /// Total purchased length in meters (bars × stock length)
    pub total_length_m: f64,
}

/// Split a required bar run into standard 12 m stock lengths.
///
/// Runs longer than one stock bar are spliced; each splice consumes one
/// lap length, so the effective length per extra bar is `stock − lap`.
pub fn split_into_stock(required_m: f64, stock_m: f64, lap_m: f64) -> StockSplit {
    let required = required_m.max(0.0);
    let stock = stock_m.max(0.1);
    let lap = lap_m.max(0.0);

    if required == 0.0 {
        return StockSplit {
            bars_needed: 0,
            total_length_m: 0.0,
        };
    }
    if required <= stock {
        return StockSplit {
            bars_needed: 1,
            total_length_m: stock,
        };
    }

    let effective = (stock - lap).max(0.1);
    let bars_needed = (required / effective).ceil() as u64;
    StockSplit {
        bars_needed,
        total_length_m: bars_needed as f64 * stock,
    }
}
