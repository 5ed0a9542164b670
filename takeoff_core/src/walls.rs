//! # Wall Geometry Model
//!
//! Walls are described by four perimeter/height figures (external and
//! internal) plus the overall building footprint, and by wall sections that
//! own their doors and windows. Sections never exist without a kind; openings
//! never exist outside a section.
//!
//! ## Validation
//!
//! The takeoff is skipped entirely when the core dimensions fail validation
//! (non-finite, non-positive, or ≥ 1000 m). Individual wall kinds with zero
//! perimeter or height simply contribute nothing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::materials::BlockType;
use crate::openings::{Door, Window};

/// Sanity ceiling for perimeter/height inputs, in meters
pub const MAX_WALL_DIMENSION_M: f64 = 1000.0;

/// Which side of the building envelope a wall belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallKind {
    External,
    Internal,
}

impl WallKind {
    pub const ALL: [WallKind; 2] = [WallKind::External, WallKind::Internal];

    pub fn label(&self) -> &'static str {
        match self {
            WallKind::External => "external",
            WallKind::Internal => "internal",
        }
    }
}

/// Plastering applied to a wall section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlasterMode {
    #[serde(rename = "None")]
    None,
    #[serde(rename = "One Side")]
    OneSide,
    #[default]
    #[serde(rename = "Both Sides")]
    BothSides,
}

impl PlasterMode {
    /// Number of plastered faces as an area multiplier (0, 1, or 2)
    pub fn sides(&self) -> f64 {
        match self {
            PlasterMode::None => 0.0,
            PlasterMode::OneSide => 1.0,
            PlasterMode::BothSides => 2.0,
        }
    }
}

/// Core wall dimensions for a building, all in meters.
///
/// ## JSON Example
///
/// ```json
/// {
///   "external_perimeter_m": 20.0,
///   "internal_perimeter_m": 10.0,
///   "external_height_m": 2.4,
///   "internal_height_m": 2.4,
///   "length_m": 6.0,
///   "width_m": 4.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WallDimensions {
    /// External wall perimeter
    pub external_perimeter_m: f64,
    /// Internal (partition) wall perimeter
    pub internal_perimeter_m: f64,
    /// External wall height
    pub external_height_m: f64,
    /// Internal wall height
    pub internal_height_m: f64,
    /// Overall building length
    pub length_m: f64,
    /// Overall building width
    pub width_m: f64,
}

impl WallDimensions {
    /// Whether all four perimeter/height values are finite, positive, and
    /// below the sanity ceiling. The takeoff refuses to run otherwise.
    pub fn is_valid(&self) -> bool {
        [
            self.external_perimeter_m,
            self.internal_perimeter_m,
            self.external_height_m,
            self.internal_height_m,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0 && *v < MAX_WALL_DIMENSION_M)
    }

    /// Strict validation for callers that want a structured error.
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("external_perimeter_m", self.external_perimeter_m),
            ("internal_perimeter_m", self.internal_perimeter_m),
            ("external_height_m", self.external_height_m),
            ("internal_height_m", self.internal_height_m),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    name,
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
            if value >= MAX_WALL_DIMENSION_M {
                return Err(CalcError::invalid_input(
                    name,
                    value.to_string(),
                    "Exceeds 1000 m sanity ceiling",
                ));
            }
        }
        Ok(())
    }

    /// Perimeter for a wall kind
    pub fn perimeter_for(&self, kind: WallKind) -> f64 {
        match kind {
            WallKind::External => self.external_perimeter_m,
            WallKind::Internal => self.internal_perimeter_m,
        }
    }

    /// Height for a wall kind
    pub fn height_for(&self, kind: WallKind) -> f64 {
        match kind {
            WallKind::External => self.external_height_m,
            WallKind::Internal => self.internal_height_m,
        }
    }

    /// External + internal perimeter, used by lintels, reinforcement,
    /// movement joints, and hoop iron
    pub fn total_perimeter_m(&self) -> f64 {
        self.external_perimeter_m + self.internal_perimeter_m
    }

    /// The taller of the two wall heights
    pub fn max_height_m(&self) -> f64 {
        self.external_height_m.max(self.internal_height_m)
    }
}

/// A run of wall of one kind, owning its doors and windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSection {
    /// Stable identity for editing operations
    pub id: Uuid,
    pub kind: WallKind,
    pub block_type: BlockType,
    /// Wall thickness in meters
    pub thickness_m: f64,
    pub plaster: PlasterMode,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
}

impl WallSection {
    /// Create an empty section with the conventional thickness for its kind
    /// (0.2 m external, 0.15 m internal) and plaster on both sides.
    pub fn new(kind: WallKind) -> Self {
        let thickness_m = match kind {
            WallKind::External => 0.2,
            WallKind::Internal => 0.15,
        };
        WallSection {
            id: Uuid::new_v4(),
            kind,
            block_type: BlockType::default(),
            thickness_m,
            plaster: PlasterMode::BothSides,
            doors: Vec::new(),
            windows: Vec::new(),
        }
    }

    /// Total opening area of this section's doors and windows, in m².
    ///
    /// Malformed sizes contribute zero area.
    pub fn opening_area_m2(&self) -> f64 {
        let doors: f64 = self.doors.iter().map(Door::total_area_m2).sum();
        let windows: f64 = self.windows.iter().map(Window::total_area_m2).sum();
        doors + windows
    }

    /// Wall thickness snapshot in millimeters, for frame sizing
    pub fn thickness_mm(&self) -> u32 {
        (self.thickness_m * 1000.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dims() -> WallDimensions {
        WallDimensions {
            external_perimeter_m: 20.0,
            internal_perimeter_m: 10.0,
            external_height_m: 2.4,
            internal_height_m: 2.4,
            length_m: 6.0,
            width_m: 4.0,
        }
    }

    #[test]
    fn test_valid_dimensions() {
        assert!(valid_dims().is_valid());
        assert!(valid_dims().validate().is_ok());
    }

    #[test]
    fn test_invalid_dimensions() {
        let mut dims = valid_dims();
        dims.external_height_m = 0.0;
        assert!(!dims.is_valid());

        dims.external_height_m = -2.4;
        assert!(!dims.is_valid());
        assert!(dims.validate().is_err());

        dims.external_height_m = f64::NAN;
        assert!(!dims.is_valid());

        dims.external_height_m = 1000.0;
        assert!(!dims.is_valid());
    }

    #[test]
    fn test_perimeter_and_height_lookup() {
        let dims = valid_dims();
        assert_eq!(dims.perimeter_for(WallKind::External), 20.0);
        assert_eq!(dims.perimeter_for(WallKind::Internal), 10.0);
        assert_eq!(dims.total_perimeter_m(), 30.0);
        assert_eq!(dims.max_height_m(), 2.4);
    }

    #[test]
    fn test_plaster_sides() {
        assert_eq!(PlasterMode::None.sides(), 0.0);
        assert_eq!(PlasterMode::OneSide.sides(), 1.0);
        assert_eq!(PlasterMode::BothSides.sides(), 2.0);
    }

    #[test]
    fn test_section_defaults() {
        let external = WallSection::new(WallKind::External);
        assert_eq!(external.thickness_m, 0.2);
        assert_eq!(external.thickness_mm(), 200);
        assert_eq!(external.plaster, PlasterMode::BothSides);
        assert!(external.doors.is_empty());

        let internal = WallSection::new(WallKind::Internal);
        assert_eq!(internal.thickness_m, 0.15);
        assert_eq!(internal.thickness_mm(), 150);
    }

    #[test]
    fn test_empty_section_has_no_opening_area() {
        let section = WallSection::new(WallKind::External);
        assert_eq!(section.opening_area_m2(), 0.0);
    }

    #[test]
    fn test_plaster_mode_serialization() {
        // Labels match the editing UI's wording
        let json = serde_json::to_string(&PlasterMode::BothSides).unwrap();
        assert_eq!(json, "\"Both Sides\"");
        let roundtrip: PlasterMode = serde_json::from_str("\"One Side\"").unwrap();
        assert_eq!(roundtrip, PlasterMode::OneSide);
    }

    #[test]
    fn test_section_serialization_roundtrip() {
        let section = WallSection::new(WallKind::Internal);
        let json = serde_json::to_string(&section).unwrap();
        let roundtrip: WallSection = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.kind, WallKind::Internal);
        assert_eq!(roundtrip.id, section.id);
    }
}
