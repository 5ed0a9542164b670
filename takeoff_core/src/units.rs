//! # Unit Types
//!
//! Type-safe wrappers for takeoff units. These provide compile-time safety
//! against unit confusion while remaining lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Quantity surveying uses a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Metric Units (Primary)
//!
//! Blocktally works in metric internally, matching the conventions of the
//! bills of quantities it produces:
//! - Length: meters (m); feet (ft) only for block-course pricing
//! - Area: square meters (m²)
//! - Volume: cubic meters (m³), liters (L)
//! - Mass: kilograms (kg)
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Feet, Meters};
//!
//! let perimeter = Meters(20.0);
//! let perimeter_ft: Feet = perimeter.into();
//! assert!((perimeter_ft.0 - 65.6168).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Meters-to-feet conversion factor used for block-course pricing
pub const METERS_TO_FEET: f64 = 3.28084;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 * METERS_TO_FEET)
    }
}

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 / METERS_TO_FEET)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareFeet(pub f64);

impl From<SquareMeters> for SquareFeet {
    fn from(m2: SquareMeters) -> Self {
        SquareFeet(m2.0 * METERS_TO_FEET * METERS_TO_FEET)
    }
}

impl From<SquareFeet> for SquareMeters {
    fn from(ft2: SquareFeet) -> Self {
        SquareMeters(ft2.0 / (METERS_TO_FEET * METERS_TO_FEET))
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

/// Volume in liters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

impl From<CubicMeters> for Liters {
    fn from(m3: CubicMeters) -> Self {
        Liters(m3.0 * 1000.0)
    }
}

impl From<Liters> for CubicMeters {
    fn from(l: Liters) -> Self {
        CubicMeters(l.0 / 1000.0)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Feet);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(SquareFeet);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Liters);
impl_arithmetic!(Kilograms);
