//! Masonry Block Definitions
//!
//! Standard block and brick face dimensions used by the centerline
//! wall-quantity calculator. Labels coming from plan extraction or the
//! editing UI resolve through [`BlockType::from_label`], which falls back
//! to the standard block rather than failing.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Stocked block types by catalog label, in catalog order.
pub static BLOCK_REGISTRY: Lazy<Vec<(&'static str, BlockType)>> = Lazy::new(|| {
    vec![
        ("Standard Block", BlockType::Standard),
        ("Half Block", BlockType::Half),
        ("Brick", BlockType::Brick),
    ]
});

/// Masonry block type for a wall section.
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Standard" }
/// { "type": "Custom", "length_m": 0.3, "height_m": 0.15, "thickness_m": 0.2 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum BlockType {
    /// Standard block, 0.4 × 0.2 m face, 0.2 m thick
    #[default]
    Standard,
    /// Half block, 0.4 × 0.2 m face, 0.1 m thick
    Half,
    /// Fired clay brick, 0.225 × 0.075 m face
    Brick,
    /// Custom block with explicit dimensions
    Custom {
        length_m: f64,
        height_m: f64,
        thickness_m: f64,
    },
}

impl BlockType {
    /// Face dimensions (length, height) in meters, excluding the mortar joint
    pub fn face_dimensions_m(&self) -> (f64, f64) {
        match self {
            BlockType::Standard => (0.4, 0.2),
            BlockType::Half => (0.4, 0.2),
            BlockType::Brick => (0.225, 0.075),
            BlockType::Custom {
                length_m, height_m, ..
            } => (*length_m, *height_m),
        }
    }

    /// Wall thickness this block lays to, in meters
    pub fn thickness_m(&self) -> f64 {
        match self {
            BlockType::Standard => 0.2,
            BlockType::Half => 0.1,
            BlockType::Brick => 0.1125,
            BlockType::Custom { thickness_m, .. } => *thickness_m,
        }
    }

    /// Catalog label used for block price lookup
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Standard => "Standard Block",
            BlockType::Half => "Half Block",
            BlockType::Brick => "Brick",
            BlockType::Custom { .. } => "Custom",
        }
    }

    /// Face area including the mortar joint on one length and one height edge
    pub fn face_area_with_joint_m2(&self, joint_m: f64) -> f64 {
        let (length, height) = self.face_dimensions_m();
        (length + joint_m) * (height + joint_m)
    }

    /// Resolve a free-form block-type label.
    ///
    /// Unknown labels fall back to the standard block; a wall must never
    /// lose its block quantities to a misspelled label.
    pub fn from_label(label: &str) -> BlockType {
        let normalized = label.trim().to_lowercase();
        if let Some((_, block)) = BLOCK_REGISTRY
            .iter()
            .find(|(name, _)| name.to_lowercase() == normalized)
        {
            return *block;
        }
        // Lenient fallbacks for free-form labels
        if normalized.contains("half") {
            BlockType::Half
        } else if normalized.contains("brick") {
            BlockType::Brick
        } else {
            BlockType::Standard
        }
    }
}
