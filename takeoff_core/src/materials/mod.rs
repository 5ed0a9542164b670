//! # Material Reference Tables
//!
//! Reference data the takeoff leans on: masonry block definitions, the
//! rebar property ladder, and hoop-iron roll variants.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::materials::{BlockType, RebarSize};
//!
//! let block = BlockType::Standard;
//! let (len, height) = block.face_dimensions_m();
//! assert_eq!((len, height), (0.4, 0.2));
//!
//! let y12 = RebarSize::Y12;
//! assert!((y12.weight_kg_per_m() - 0.888).abs() < 1e-9);
//! ```

pub mod blocks;
pub mod rebar;

pub use blocks::BlockType;
pub use rebar::{RebarSize, StockSplit, STANDARD_BAR_LENGTH_M};

use serde::{Deserialize, Serialize};

/// Hoop-iron roll variants stocked by hardware suppliers.
///
/// Roll length is fixed per roll weight; coils needed are computed by
/// dividing the total strapping length by the roll length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HoopIronRoll {
    /// 10 kg roll, 32.5 m of strapping
    Kg10,
    /// 20 kg roll, 65 m of strapping
    #[default]
    Kg20,
}

impl HoopIronRoll {
    /// Strapping length per roll in meters
    pub fn roll_length_m(&self) -> f64 {
        match self {
            HoopIronRoll::Kg10 => 32.5,
            HoopIronRoll::Kg20 => 65.0,
        }
    }

    /// Catalog label used for price lookup ("10kg" / "20kg")
    pub fn label(&self) -> &'static str {
        match self {
            HoopIronRoll::Kg10 => "10kg",
            HoopIronRoll::Kg20 => "20kg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hoop_iron_roll_lengths() {
        assert_eq!(HoopIronRoll::Kg20.roll_length_m(), 65.0);
        assert_eq!(HoopIronRoll::Kg10.roll_length_m(), 32.5);
    }

    #[test]
    fn test_hoop_iron_labels() {
        assert_eq!(HoopIronRoll::Kg20.label(), "20kg");
        assert_eq!(HoopIronRoll::default(), HoopIronRoll::Kg20);
    }
}
