//! # Quantity-Surveyor Settings
//!
//! The configuration block controlling wastage percentages, mix ratios, and
//! the optional structural elements. Defaults follow common East African
//! residential practice and are safe to compute against unedited.

use serde::{Deserialize, Serialize};

use crate::materials::{HoopIronRoll, RebarSize};
use crate::parse::{
    parse_cement_water_ratio, parse_concrete_ratio, parse_mortar_ratio, ConcreteRatio, MortarRatio,
};

/// Global QS settings for a project.
///
/// Mix ratios stay as strings so the editing surface can round-trip exactly
/// what the user typed; the engine parses them leniently at compute time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QsSettings {
    // === Wastage percentages per material class ===
    pub wastage_masonry_pct: f64,
    pub wastage_water_pct: f64,
    pub wastage_concrete_pct: f64,
    pub wastage_reinforcement_pct: f64,
    pub wastage_finishes_pct: f64,

    // === Mixes ===
    /// Mortar mix as "cement:sand"
    pub mortar_ratio: String,
    /// Plaster mix; falls back to the mortar ratio when absent
    pub plaster_ratio: Option<String>,
    /// Concrete mix as "cement:sand:ballast"
    pub concrete_mix_ratio: String,
    /// Mixing-water ratio for mortar/plaster, liters per kg of cement
    pub cement_water_ratio: String,
    /// Mixing-water ratio for structural concrete
    pub concrete_water_cement_ratio: f64,
    pub client_provides_water: bool,
    /// Mortar joint thickness in meters
    pub mortar_joint_thickness_m: f64,

    // === Professional element toggles ===
    pub includes_lintels: bool,
    pub includes_ring_beams: bool,
    pub includes_reinforcement: bool,
    pub includes_dpc: bool,
    pub includes_movement_joints: bool,
    pub includes_scaffolding: bool,
    pub includes_waste_removal: bool,
    pub includes_hoop_iron: bool,

    // === Lintels ===
    pub lintel_width_m: f64,
    pub lintel_depth_m: f64,
    pub lintel_rebar_size: RebarSize,

    // === Ring beams ===
    pub ring_beam_width_m: f64,
    pub ring_beam_depth_m: f64,
    pub ring_beam_main_bar_count: u32,
    pub ring_beam_main_bar_size: RebarSize,
    pub ring_beam_stirrup_size: RebarSize,
    pub ring_beam_stirrup_spacing_m: f64,
    /// Development length as a multiple of bar diameter
    pub development_length_factor: f64,
    /// Lap length as a multiple of bar diameter
    pub lap_length_factor: f64,

    // === Distributed wall reinforcement ===
    /// Courses between bed-joint reinforcement runs
    pub reinforcement_course_spacing: u32,
    /// Meters between vertical bars
    pub vertical_reinforcement_spacing_m: f64,
    pub bed_joint_rebar_size: RebarSize,
    pub vertical_rebar_size: RebarSize,

    // === DPC ===
    pub dpc_width_m: f64,
    pub dpc_material: String,

    // === Movement joints ===
    pub movement_joint_spacing_m: f64,

    // === Scaffolding / waste ===
    pub scaffolding_daily_rate: f64,
    /// Cart-away rate per m³
    pub waste_removal_rate: f64,

    // === Hoop iron ===
    pub hoop_iron_roll: HoopIronRoll,
}

impl Default for QsSettings {
    fn default() -> Self {
        QsSettings {
            wastage_masonry_pct: 5.0,
            wastage_water_pct: 5.0,
            wastage_concrete_pct: 5.0,
            wastage_reinforcement_pct: 5.0,
            wastage_finishes_pct: 5.0,

            mortar_ratio: "1:4".to_string(),
            plaster_ratio: None,
            concrete_mix_ratio: "1:2:4".to_string(),
            cement_water_ratio: "0.5".to_string(),
            concrete_water_cement_ratio: 0.5,
            client_provides_water: false,
            mortar_joint_thickness_m: 0.01,

            includes_lintels: false,
            includes_ring_beams: false,
            includes_reinforcement: false,
            includes_dpc: false,
            includes_movement_joints: false,
            includes_scaffolding: false,
            includes_waste_removal: false,
            includes_hoop_iron: false,

            lintel_width_m: 0.2,
            lintel_depth_m: 0.15,
            lintel_rebar_size: RebarSize::Y12,

            ring_beam_width_m: 0.2,
            ring_beam_depth_m: 0.15,
            ring_beam_main_bar_count: 8,
            ring_beam_main_bar_size: RebarSize::Y12,
            ring_beam_stirrup_size: RebarSize::Y8,
            ring_beam_stirrup_spacing_m: 0.2,
            development_length_factor: 40.0,
            lap_length_factor: 50.0,

            reinforcement_course_spacing: 3,
            vertical_reinforcement_spacing_m: 1.0,
            bed_joint_rebar_size: RebarSize::Y8,
            vertical_rebar_size: RebarSize::Y10,

            dpc_width_m: 0.15,
            dpc_material: "Polyethylene".to_string(),

            movement_joint_spacing_m: 5.0,

            scaffolding_daily_rate: 15.0,
            waste_removal_rate: 500.0,

            hoop_iron_roll: HoopIronRoll::Kg20,
        }
    }
}

impl QsSettings {
    /// Masonry wastage as a multiplier (5% → 1.05)
    pub fn masonry_factor(&self) -> f64 {
        1.0 + self.wastage_masonry_pct / 100.0
    }

    /// Water wastage as a multiplier
    pub fn water_factor(&self) -> f64 {
        1.0 + self.wastage_water_pct / 100.0
    }

    /// Parsed mortar ratio
    pub fn mortar_mix(&self) -> MortarRatio {
        parse_mortar_ratio(&self.mortar_ratio)
    }

    /// Parsed plaster ratio, falling back to the mortar ratio
    pub fn plaster_mix(&self) -> MortarRatio {
        match &self.plaster_ratio {
            Some(ratio) => parse_mortar_ratio(ratio),
            None => self.mortar_mix(),
        }
    }

    /// Parsed concrete mix ratio
    pub fn concrete_mix(&self) -> ConcreteRatio {
        parse_concrete_ratio(&self.concrete_mix_ratio)
    }

    /// Parsed cement:water ratio for mortar and plaster mixing water
    pub fn water_cement_ratio(&self) -> f64 {
        parse_cement_water_ratio(&self.cement_water_ratio)
    }

    /// Mortar joint thickness, clamped to a sane non-negative value
    pub fn joint_thickness_m(&self) -> f64 {
        if self.mortar_joint_thickness_m.is_finite() && self.mortar_joint_thickness_m > 0.0 {
            self.mortar_joint_thickness_m
        } else {
            0.01
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_sane() {
        let settings = QsSettings::default();
        assert_eq!(settings.mortar_ratio, "1:4");
        assert_eq!(settings.ring_beam_main_bar_count, 8);
        assert!((settings.masonry_factor() - 1.05).abs() < 1e-12);
        assert!(!settings.includes_lintels);
    }

    #[test]
    fn test_plaster_ratio_falls_back_to_mortar() {
        let mut settings = QsSettings::default();
        settings.mortar_ratio = "1:3".to_string();
        assert_eq!(settings.plaster_mix().sand, 3.0);

        settings.plaster_ratio = Some("1:6".to_string());
        assert_eq!(settings.plaster_mix().sand, 6.0);
    }

    #[test]
    fn test_joint_thickness_fallback() {
        let mut settings = QsSettings::default();
        settings.mortar_joint_thickness_m = -0.5;
        assert_eq!(settings.joint_thickness_m(), 0.01);
        settings.mortar_joint_thickness_m = 0.012;
        assert_eq!(settings.joint_thickness_m(), 0.012);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let settings = QsSettings::default();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let roundtrip: QsSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, roundtrip);
    }
}
