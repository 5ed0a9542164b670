//! # Mortar / Plaster / Water Derivation
//!
//! Converts net wall area into mortar and plaster volumes, splits each by
//! its mix ratio into cement and sand, converts cement through the
//! volume → bags → kilograms chain, and derives mixing water from the
//! cement:water ratio.
//!
//! Volumes carry the dry-volume correction: 1.33 for mortar and plaster,
//! 1.54 for structural concrete.

use serde::{Deserialize, Serialize};

use crate::parse::{ConcreteRatio, MortarRatio};
use crate::settings::QsSettings;

/// Mortar laid per m² of wall face, m³
pub const MORTAR_PER_SQM: f64 = 0.017;

/// Plaster coat thickness, m
pub const PLASTER_THICKNESS_M: f64 = 0.015;

/// Wet-to-loose-dry volume factor for mortar and plaster
pub const DRY_VOLUME_FACTOR: f64 = 1.33;

/// Wet-to-loose-dry volume factor for concrete
pub const CONCRETE_DRY_VOLUME_FACTOR: f64 = 1.54;

/// Volume of one cement bag, m³
pub const CEMENT_BAG_VOLUME_M3: f64 = 0.035;

/// Weight of one cement bag, kg
pub const CEMENT_BAG_KG: f64 = 50.0;

/// Cement/sand split of a mortar or plaster volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MortarMaterials {
    pub cement_volume_m3: f64,
    pub cement_bags: f64,
    pub cement_kg: f64,
    pub sand_m3: f64,
}

/// Split a mortar/plaster dry volume by its cement:sand ratio.
pub fn mortar_materials(dry_volume_m3: f64, ratio: &MortarRatio) -> MortarMaterials {
    let volume = dry_volume_m3.max(0.0);
    let cement_volume_m3 = ratio.cement_fraction() * volume;
    let sand_m3 = ratio.sand_fraction() * volume;
    let cement_bags = cement_volume_m3 / CEMENT_BAG_VOLUME_M3;
    MortarMaterials {
        cement_volume_m3,
        cement_bags,
        cement_kg: cement_bags * CEMENT_BAG_KG,
        sand_m3,
    }
}

/// Cement/sand/ballast/water split of a concrete pour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ConcreteMaterials {
    pub cement_bags: f64,
    pub cement_kg: f64,
    pub sand_m3: f64,
    pub ballast_m3: f64,
    pub water_l: f64,
}

/// Split a wet concrete volume by its mix ratio, with the 1.54 dry-volume
/// factor applied before the split.
pub fn concrete_materials(
    volume_m3: f64,
    ratio: &ConcreteRatio,
    water_cement_ratio: f64,
) -> ConcreteMaterials {
    let dry_volume = volume_m3.max(0.0) * CONCRETE_DRY_VOLUME_FACTOR;
    let total_parts = ratio.total_parts();
    let cement_volume = (ratio.cement / total_parts) * dry_volume;
    let sand_m3 = (ratio.sand / total_parts) * dry_volume;
    let ballast_m3 = (ratio.ballast / total_parts) * dry_volume;
    let cement_bags = cement_volume / CEMENT_BAG_VOLUME_M3;
    let cement_kg = cement_bags * CEMENT_BAG_KG;
    let water_l = cement_kg * water_cement_ratio.max(0.0);
    ConcreteMaterials {
        cement_bags,
        cement_kg,
        sand_m3,
        ballast_m3,
        water_l,
    }
}

/// The wet trades of a masonry takeoff: mortar, plaster, and their water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WetTrades {
    /// Mortar dry volume after the 1.33 correction, m³
    pub mortar_volume_m3: f64,
    pub mortar: MortarMaterials,
    /// Plastered face area, m²
    pub plaster_area_m2: f64,
    /// Plaster dry volume after the 1.33 correction, m³
    pub plaster_volume_m3: f64,
    pub plaster: MortarMaterials,
    /// Mixing water for both trades, liters
    pub water_l: f64,
}

/// Derive mortar, plaster, and water from the net wall area and the
/// already-resolved plastered area.
pub fn wet_trades(net_wall_area_m2: f64, plaster_area_m2: f64, settings: &QsSettings) -> WetTrades {
    let net_area = net_wall_area_m2.max(0.0);
    let plaster_area = plaster_area_m2.max(0.0);

    let mortar_volume_m3 = net_area * MORTAR_PER_SQM * DRY_VOLUME_FACTOR;
    let mortar = mortar_materials(mortar_volume_m3, &settings.mortar_mix());

    let plaster_volume_m3 = plaster_area * PLASTER_THICKNESS_M * DRY_VOLUME_FACTOR;
    let plaster = mortar_materials(plaster_volume_m3, &settings.plaster_mix());

    let water_l = (mortar.cement_kg + plaster.cement_kg) * settings.water_cement_ratio();

    WetTrades {
        mortar_volume_m3,
        mortar,
        plaster_area_m2: plaster_area,
        plaster_volume_m3,
        plaster,
        water_l,
    }
}
