//! # Centerline Wall-Quantity Calculator
//!
//! Converts wall perimeter/height/block-type into gross and net block counts
//! and the blocks-feet linear measure that block pricing is quoted in.
//!
//! The "centerline method" here takes the center line equal to the measured
//! perimeter verbatim, with no inward offset at corners. This matches the
//! estimating convention the figures were calibrated against and must not be
//! "corrected" to a true centerline offset.

use serde::{Deserialize, Serialize};

use crate::materials::BlockType;
use crate::units::{Feet, Meters, SquareFeet, SquareMeters};
use crate::walls::{WallDimensions, WallKind, WallSection};

/// Per-wall-kind quantity results.
///
/// `gross_blocks` is the area-derived count before opening deductions;
/// `net_blocks` deducts openings. Wastage is applied later, at aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallQuantities {
    pub kind: WallKind,
    pub perimeter_m: f64,
    /// Centerline length; equals the perimeter by convention
    pub center_line_m: f64,
    pub height_m: f64,
    /// Block face area including the mortar joint, m²
    pub block_area_m2: f64,
    pub gross_area_m2: f64,
    pub openings_area_m2: f64,
    pub net_area_m2: f64,
    pub gross_blocks: u64,
    pub net_blocks: u64,
    /// Perimeter-in-feet × height-in-feet linear measure
    pub gross_blocks_feet: f64,
    /// Blocks-feet after opening deductions
    pub net_blocks_feet: f64,
}

/// Block type used for a wall kind: the first section of that kind decides,
/// defaulting to the standard block when no section exists yet.
pub fn block_type_for(kind: WallKind, sections: &[WallSection]) -> BlockType {
    sections
        .iter()
        .find(|s| s.kind == kind)
        .map(|s| s.block_type)
        .unwrap_or_default()
}

/// Total opening area of all sections of a wall kind, m²
fn openings_area_for(kind: WallKind, sections: &[WallSection]) -> f64 {
    sections
        .iter()
        .filter(|s| s.kind == kind)
        .map(WallSection::opening_area_m2)
        .sum()
}

/// Quantities for one wall kind.
///
/// Returns `None` when that wall's perimeter or height is non-positive;
/// the wall simply contributes nothing.
pub fn wall_quantities(
    kind: WallKind,
    dims: &WallDimensions,
    sections: &[WallSection],
    joint_m: f64,
) -> Option<WallQuantities> {
    let perimeter_m = dims.perimeter_for(kind);
    let height_m = dims.height_for(kind);
    if !(perimeter_m > 0.0) || !(height_m > 0.0) {
        return None;
    }

    let block_type = block_type_for(kind, sections);
    let block_area_m2 = block_type.face_area_with_joint_m2(joint_m);
    if !(block_area_m2 > 0.0) {
        return None;
    }

    // Center line equals the perimeter (see module docs)
    let center_line_m = perimeter_m;
    let gross_area_m2 = center_line_m * height_m;
    let gross_blocks = (gross_area_m2 / block_area_m2).ceil() as u64;

    let openings_area_m2 = openings_area_for(kind, sections);
    let net_area_m2 = (gross_area_m2 - openings_area_m2).max(0.0);
    let net_blocks = (net_area_m2 / block_area_m2).ceil() as u64;

    let perimeter_ft: Feet = Meters(center_line_m).into();
    let height_ft: Feet = Meters(height_m).into();
    let gross_blocks_feet = perimeter_ft.value() * height_ft.value();
    let net_area_ft2: SquareFeet = SquareMeters(net_area_m2).into();
    let net_blocks_feet = net_area_ft2.value();

    Some(WallQuantities {
        kind,
        perimeter_m,
        center_line_m,
        height_m,
        block_area_m2,
        gross_area_m2,
        openings_area_m2,
        net_area_m2,
        gross_blocks,
        net_blocks,
        gross_blocks_feet,
        net_blocks_feet,
    })
}

/// Quantities for every wall kind with positive dimensions.
///
/// Returns an empty list when the core dimensions fail validation; the
/// aggregator treats that as "skip the whole takeoff".
pub fn all_wall_quantities(
    dims: &WallDimensions,
    sections: &[WallSection],
    joint_m: f64,
) -> Vec<WallQuantities> {
    if !dims.is_valid() {
        return Vec::new();
    }
    WallKind::ALL
        .iter()
        .filter_map(|kind| wall_quantities(*kind, dims, sections, joint_m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openings::{Door, SizeSpec};

    fn sample_dims() -> WallDimensions {
        WallDimensions {
            external_perimeter_m: 20.0,
            internal_perimeter_m: 10.0,
            external_height_m: 2.4,
            internal_height_m: 2.4,
            length_m: 6.0,
            width_m: 4.0,
        }
    }

    fn square_block() -> BlockType {
        BlockType::Custom {
            length_m: 0.2,
            height_m: 0.2,
            thickness_m: 0.2,
        }
    }

    fn section_with_block(block: BlockType) -> WallSection {
        let mut section = WallSection::new(WallKind::External);
        section.block_type = block;
        section
    }

    #[test]
    fn test_square_block_wall_without_openings() {
        // External 20 m × 2.4 m, 0.2×0.2 block, 0.01 joint:
        // block_area = 0.0441, gross_area = 48, gross_blocks = ceil(48/0.0441) = 1089
        let dims = sample_dims();
        let sections = vec![section_with_block(square_block())];
        let q = wall_quantities(WallKind::External, &dims, &sections, 0.01).unwrap();

        assert!((q.block_area_m2 - 0.0441).abs() < 1e-12);
        assert!((q.gross_area_m2 - 48.0).abs() < 1e-12);
        assert_eq!(q.gross_blocks, 1089);
        assert_eq!(q.net_blocks, q.gross_blocks);
        assert_eq!(q.net_area_m2, q.gross_area_m2);
    }

    #[test]
    fn test_standard_door_deducts_from_net() {
        // Same wall with one 0.9 × 2.1 m door: net_area = 46.11, net_blocks = 1046
        let dims = sample_dims();
        let mut section = section_with_block(square_block());
        let mut door = Door::new(200);
        door.size = SizeSpec::standard("0.9 × 2.1 m");
        section.doors.push(door);
        let sections = vec![section];

        let q = wall_quantities(WallKind::External, &dims, &sections, 0.01).unwrap();
        assert!((q.net_area_m2 - 46.11).abs() < 1e-9);
        assert_eq!(q.net_blocks, 1046);
        assert_eq!(q.gross_blocks, 1089);
    }

    #[test]
    fn test_monotonic_in_perimeter_and_height() {
        let sections = vec![section_with_block(square_block())];
        let mut prev = 0;
        for perimeter in [10.0, 15.0, 20.0, 25.0] {
            let mut dims = sample_dims();
            dims.external_perimeter_m = perimeter;
            let q = wall_quantities(WallKind::External, &dims, &sections, 0.01).unwrap();
            assert!(q.gross_blocks >= prev);
            prev = q.gross_blocks;
        }

        let mut prev = 0;
        for height in [2.0, 2.4, 2.7, 3.0] {
            let mut dims = sample_dims();
            dims.external_height_m = height;
            let q = wall_quantities(WallKind::External, &dims, &sections, 0.01).unwrap();
            assert!(q.gross_blocks >= prev);
            prev = q.gross_blocks;
        }
    }

    #[test]
    fn test_openings_never_drive_net_area_negative() {
        let mut dims = sample_dims();
        dims.external_perimeter_m = 1.0;
        dims.external_height_m = 1.0;
        let mut section = section_with_block(square_block());
        let mut door = Door::new(200);
        door.size = SizeSpec::standard("1.2 × 2.4 m");
        door.count = 5;
        section.doors.push(door);

        let q = wall_quantities(WallKind::External, &dims, &[section], 0.01).unwrap();
        assert_eq!(q.net_area_m2, 0.0);
        assert_eq!(q.net_blocks, 0);
    }

    #[test]
    fn test_invalid_dimensions_yield_nothing() {
        let mut dims = sample_dims();
        dims.internal_height_m = -1.0;
        assert!(all_wall_quantities(&dims, &[], 0.01).is_empty());
    }

    #[test]
    fn test_both_kinds_computed() {
        let dims = sample_dims();
        let walls = all_wall_quantities(&dims, &[], 0.01);
        assert_eq!(walls.len(), 2);
        assert_eq!(walls[0].kind, WallKind::External);
        assert_eq!(walls[1].kind, WallKind::Internal);
        // Internal: 10 × 2.4 = 24 m²
        assert!((walls[1].gross_area_m2 - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_blocks_feet_measure() {
        let dims = sample_dims();
        let walls = all_wall_quantities(&dims, &[], 0.01);
        let external = &walls[0];
        // 20 m × 3.28084 = 65.6168 ft; 2.4 m = 7.874016 ft
        let expected = 65.6168 * 7.874016;
        assert!((external.gross_blocks_feet - expected).abs() < 1e-6);
        // No openings: net equals gross
        assert!((external.net_blocks_feet - expected).abs() < 1e-6);
    }
}
