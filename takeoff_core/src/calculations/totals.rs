//! # Takeoff Aggregator
//!
//! Folds the wall quantities, wet trades, openings, and professional
//! elements into one [`CalculationTotals`] record with paired net/gross
//! figures and a flat line-item list for export.
//!
//! [`compute`] is the single entry point the owning context re-invokes on
//! any input change. It is pure and synchronous; when the core dimensions
//! fail validation it returns `None` and the caller keeps its previous
//! totals.
//!
//! Wastage asymmetry: each professional element carries its own gross cost,
//! but the grand totals add the flat element sum to both the net and gross
//! side. Both element sums are exposed so downstream consumers can make the
//! other choice without recomputation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::blocks::{all_wall_quantities, block_type_for};
use crate::calculations::elements::{professional_elements, HoopIronSummary, ProfessionalElements};
use crate::calculations::mortar::wet_trades;
use crate::calculations::openings::{openings_costs, OpeningsCosts};
use crate::catalog::PriceBook;
use crate::settings::QsSettings;
use crate::walls::{WallDimensions, WallKind, WallSection};

/// One row of the exported bill of quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLineItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub net_quantity: f64,
    pub gross_quantity: f64,
    pub net_cost: f64,
    pub gross_cost: f64,
    pub unit: String,
}

/// The aggregate takeoff output: paired net/gross quantities and costs for
/// every category, plus the line-item list consumed by export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CalculationTotals {
    // === Wall areas ===
    pub net_area_m2: f64,
    pub gross_area_m2: f64,

    // === Blocks ===
    pub net_blocks: u64,
    pub gross_blocks: u64,
    pub net_blocks_feet: f64,
    pub gross_blocks_feet: f64,
    pub net_blocks_cost: f64,
    pub gross_blocks_cost: f64,

    // === Mortar / plaster ===
    pub net_mortar_m3: f64,
    pub gross_mortar_m3: f64,
    pub net_mortar_cost: f64,
    pub gross_mortar_cost: f64,
    pub net_plaster_m2: f64,
    pub gross_plaster_m2: f64,
    pub net_plaster_cost: f64,
    pub gross_plaster_cost: f64,
    pub net_cement_kg: f64,
    pub gross_cement_kg: f64,
    pub net_sand_m3: f64,
    pub gross_sand_m3: f64,

    // === Water ===
    pub net_water_l: f64,
    pub gross_water_l: f64,
    pub net_water_cost: f64,
    pub gross_water_cost: f64,

    // === Openings ===
    pub net_doors: u32,
    pub gross_doors: u32,
    pub net_windows: u32,
    pub gross_windows: u32,
    pub net_door_frames: u32,
    pub gross_door_frames: u32,
    pub net_window_frames: u32,
    pub gross_window_frames: u32,
    pub net_doors_cost: f64,
    pub gross_doors_cost: f64,
    pub net_windows_cost: f64,
    pub gross_windows_cost: f64,
    pub net_door_frames_cost: f64,
    pub gross_door_frames_cost: f64,
    pub net_window_frames_cost: f64,
    pub gross_window_frames_cost: f64,
    pub net_openings_cost: f64,
    pub gross_openings_cost: f64,
    /// Full accessory-level openings breakdown
    pub openings: OpeningsCosts,

    // === Structural concrete (lintels + ring beams) ===
    pub net_concrete_m3: f64,
    pub gross_concrete_m3: f64,
    pub net_concrete_cement_bags: f64,
    pub gross_concrete_cement_bags: f64,
    pub net_concrete_sand_m3: f64,
    pub gross_concrete_sand_m3: f64,
    pub net_concrete_ballast_m3: f64,
    pub gross_concrete_ballast_m3: f64,
    pub net_concrete_water_l: f64,
    pub gross_concrete_water_l: f64,

    // === Reinforcement ===
    pub net_reinforcement_kg: f64,
    pub gross_reinforcement_kg: f64,
    pub net_lintels_cost: f64,
    pub gross_lintels_cost: f64,
    pub net_lintel_rebar_kg: f64,
    pub gross_lintel_rebar_kg: f64,
    pub net_lintel_rebar_cost: f64,
    pub gross_lintel_rebar_cost: f64,
    pub net_ring_beams_cost: f64,
    pub gross_ring_beams_cost: f64,
    pub net_ring_beam_rebar_kg: f64,
    pub gross_ring_beam_rebar_kg: f64,
    pub net_ring_beam_rebar_cost: f64,
    pub gross_ring_beam_rebar_cost: f64,
    pub net_wall_rebar_kg: f64,
    pub gross_wall_rebar_kg: f64,
    pub net_wall_rebar_cost: f64,
    pub gross_wall_rebar_cost: f64,

    // === DPC ===
    pub net_dpc_m: f64,
    pub gross_dpc_m: f64,
    pub net_dpc_cost: f64,
    pub gross_dpc_cost: f64,

    // === Movement joints ===
    pub net_movement_joints: u64,
    pub gross_movement_joints: u64,
    pub net_sealant_l: f64,
    pub gross_sealant_l: f64,
    pub net_movement_joints_cost: f64,
    pub gross_movement_joints_cost: f64,

    // === Scaffolding / waste ===
    pub net_scaffolding_area_m2: f64,
    pub gross_scaffolding_area_m2: f64,
    pub net_scaffolding_cost: f64,
    pub gross_scaffolding_cost: f64,
    pub net_waste_volume_m3: f64,
    pub gross_waste_volume_m3: f64,
    pub net_waste_removal_cost: f64,
    pub gross_waste_removal_cost: f64,

    // === Hoop iron ===
    pub hoop_iron: Option<HoopIronSummary>,

    // === Professional elements ===
    /// Flat sum of element costs, added to both grand totals
    pub professional_elements_total_cost: f64,
    /// Wastage-adjusted element sum, exposed but not folded into totals
    pub professional_elements_gross_cost: f64,

    // === Grand totals ===
    pub net_total_cost: f64,
    pub gross_total_cost: f64,

    // === Export ===
    pub line_items: Vec<MaterialLineItem>,
}

/// Plaster face multiplier for a wall kind: the first section of that kind
/// decides; a kind with no sections is not plastered.
fn plaster_sides_for(kind: WallKind, sections: &[WallSection]) -> f64 {
    sections
        .iter()
        .find(|s| s.kind == kind)
        .map(|s| s.plaster.sides())
        .unwrap_or(0.0)
}

/// Run the full takeoff over a snapshot of inputs.
///
/// Returns `None` when the core wall dimensions fail validation; callers
/// keep their previous totals until valid input arrives. Zero-priced lines
/// mean "price unknown", not "free".
pub fn compute(
    dims: &WallDimensions,
    sections: &[WallSection],
    settings: &QsSettings,
    book: &PriceBook,
) -> Option<CalculationTotals> {
    if !dims.is_valid() {
        debug!("wall dimensions failed validation; takeoff skipped");
        return None;
    }

    let mut totals = CalculationTotals::default();
    let factor = settings.masonry_factor();

    // === Walls ===
    let walls = all_wall_quantities(dims, sections, settings.joint_thickness_m());
    let mut plaster_area_m2 = 0.0;
    for wall in &walls {
        totals.net_area_m2 += wall.net_area_m2;
        totals.gross_area_m2 += wall.gross_area_m2;
        totals.net_blocks += wall.net_blocks;
        totals.net_blocks_feet += wall.net_blocks_feet;
        plaster_area_m2 += wall.net_area_m2 * plaster_sides_for(wall.kind, sections);

        // Block courses are priced per linear foot
        let block_price =
            book.material_type_price("Bricks", block_type_for(wall.kind, sections).label());
        totals.net_blocks_cost += wall.net_blocks_feet * block_price;
    }
    totals.gross_blocks = (totals.net_blocks as f64 * factor).ceil() as u64;
    totals.gross_blocks_feet = totals.net_blocks_feet * factor;
    totals.gross_blocks_cost = totals.net_blocks_cost * factor;

    // === Wet trades ===
    let cement_price = book.material_price("Cement");
    let sand_price = book.material_price("Sand");
    let water_price = book.material_price("Water");

    let wet = wet_trades(totals.net_area_m2, plaster_area_m2, settings);
    totals.net_mortar_m3 = wet.mortar_volume_m3;
    totals.gross_mortar_m3 = wet.mortar_volume_m3 * factor;
    totals.net_plaster_m2 = wet.plaster_area_m2;
    totals.gross_plaster_m2 = wet.plaster_area_m2 * factor;
    totals.net_cement_kg = wet.mortar.cement_kg + wet.plaster.cement_kg;
    totals.gross_cement_kg = totals.net_cement_kg * factor;
    totals.net_sand_m3 = wet.mortar.sand_m3 + wet.plaster.sand_m3;
    totals.gross_sand_m3 = totals.net_sand_m3 * factor;

    totals.net_mortar_cost = wet.mortar.cement_bags * cement_price + wet.mortar.sand_m3 * sand_price;
    totals.gross_mortar_cost = totals.net_mortar_cost * factor;
    totals.net_plaster_cost =
        wet.plaster.cement_bags * cement_price + wet.plaster.sand_m3 * sand_price;
    totals.gross_plaster_cost = totals.net_plaster_cost * factor;

    totals.net_water_l = wet.water_l;
    totals.gross_water_l = wet.water_l * settings.water_factor();
    if !settings.client_provides_water {
        totals.net_water_cost = totals.net_water_l / 1000.0 * water_price;
        totals.gross_water_cost = totals.gross_water_l / 1000.0 * water_price;
    }

    // === Openings ===
    let openings = openings_costs(sections, book);
    totals.net_doors = openings.doors_count;
    totals.net_windows = openings.windows_count;
    totals.net_door_frames = openings.door_frames_count;
    totals.net_window_frames = openings.window_frames_count;
    totals.gross_doors = (openings.doors_count as f64 * factor).ceil() as u32;
    totals.gross_windows = (openings.windows_count as f64 * factor).ceil() as u32;
    totals.gross_door_frames = (openings.door_frames_count as f64 * factor).ceil() as u32;
    totals.gross_window_frames = (openings.window_frames_count as f64 * factor).ceil() as u32;

    totals.net_doors_cost = openings.door_leaves_cost;
    totals.gross_doors_cost = openings.door_leaves_cost * factor;
    totals.net_windows_cost = openings.window_leaves_cost;
    totals.gross_windows_cost = openings.window_leaves_cost * factor;
    totals.net_door_frames_cost = openings.door_frames_cost;
    totals.gross_door_frames_cost = openings.door_frames_cost * factor;
    totals.net_window_frames_cost = openings.window_frames_cost;
    totals.gross_window_frames_cost = openings.window_frames_cost * factor;
    totals.net_openings_cost = openings.total();
    totals.gross_openings_cost = openings.total() * factor;
    totals.openings = openings;

    // === Professional elements ===
    let elements = professional_elements(dims, sections, settings, book, totals.gross_area_m2);

    if let Some(lintels) = &elements.lintels {
        totals.net_concrete_m3 += lintels.concrete_m3;
        totals.net_concrete_cement_bags += lintels.materials.cement_bags;
        totals.net_concrete_sand_m3 += lintels.materials.sand_m3;
        totals.net_concrete_ballast_m3 += lintels.materials.ballast_m3;
        totals.net_concrete_water_l += lintels.materials.water_l;
        totals.net_lintels_cost = lintels.net_concrete_cost;
        totals.gross_lintels_cost = lintels.gross_concrete_cost;
        totals.net_lintel_rebar_kg = lintels.rebar_kg;
        totals.gross_lintel_rebar_kg = lintels.rebar_kg * factor;
        totals.net_lintel_rebar_cost = lintels.net_rebar_cost;
        totals.gross_lintel_rebar_cost = lintels.gross_rebar_cost;
        totals.net_reinforcement_kg += lintels.rebar_kg;
    }
    if let Some(ring) = &elements.ring_beam {
        totals.net_concrete_m3 += ring.concrete_m3;
        totals.net_concrete_cement_bags += ring.materials.cement_bags;
        totals.net_concrete_sand_m3 += ring.materials.sand_m3;
        totals.net_concrete_ballast_m3 += ring.materials.ballast_m3;
        totals.net_concrete_water_l += ring.materials.water_l;
        totals.net_ring_beams_cost = ring.net_concrete_cost;
        totals.gross_ring_beams_cost = ring.gross_concrete_cost;
        totals.net_ring_beam_rebar_kg = ring.rebar_kg;
        totals.gross_ring_beam_rebar_kg = ring.rebar_kg * factor;
        totals.net_ring_beam_rebar_cost = ring.net_rebar_cost;
        totals.gross_ring_beam_rebar_cost = ring.gross_rebar_cost;
        totals.net_reinforcement_kg += ring.rebar_kg;
    }
    if let Some(wall_rebar) = &elements.wall_reinforcement {
        totals.net_wall_rebar_kg = wall_rebar.rebar_kg;
        totals.gross_wall_rebar_kg = wall_rebar.rebar_kg * factor;
        totals.net_wall_rebar_cost = wall_rebar.net_cost;
        totals.gross_wall_rebar_cost = wall_rebar.gross_cost;
        totals.net_reinforcement_kg += wall_rebar.rebar_kg;
    }
    totals.gross_concrete_m3 = totals.net_concrete_m3 * factor;
    totals.gross_concrete_cement_bags = totals.net_concrete_cement_bags * factor;
    totals.gross_concrete_sand_m3 = totals.net_concrete_sand_m3 * factor;
    totals.gross_concrete_ballast_m3 = totals.net_concrete_ballast_m3 * factor;
    totals.gross_concrete_water_l = totals.net_concrete_water_l * factor;
    totals.gross_reinforcement_kg = totals.net_reinforcement_kg * factor;

    if let Some(dpc) = &elements.dpc {
        totals.net_dpc_m = dpc.length_m;
        totals.gross_dpc_m = dpc.length_m * factor;
        totals.net_dpc_cost = dpc.net_cost;
        totals.gross_dpc_cost = dpc.gross_cost;
    }
    if let Some(joints) = &elements.movement_joints {
        totals.net_movement_joints = joints.joints;
        totals.gross_movement_joints = (joints.joints as f64 * factor).ceil() as u64;
        totals.net_sealant_l = joints.sealant_l;
        totals.gross_sealant_l = joints.sealant_l * factor;
        totals.net_movement_joints_cost = joints.net_cost;
        totals.gross_movement_joints_cost = joints.gross_cost;
    }
    if let Some(scaffolding) = &elements.scaffolding {
        totals.net_scaffolding_area_m2 = scaffolding.area_m2;
        totals.gross_scaffolding_area_m2 = scaffolding.area_m2 * factor;
        totals.net_scaffolding_cost = scaffolding.net_cost;
        totals.gross_scaffolding_cost = scaffolding.gross_cost;
    }
    if let Some(waste) = &elements.waste_removal {
        totals.net_waste_volume_m3 = waste.volume_m3;
        totals.gross_waste_volume_m3 = waste.volume_m3 * factor;
        totals.net_waste_removal_cost = waste.net_cost;
        totals.gross_waste_removal_cost = waste.gross_cost;
    }
    totals.hoop_iron = elements.hoop_iron;

    totals.professional_elements_total_cost = elements.total_cost;
    totals.professional_elements_gross_cost = elements.gross_total_cost;

    // === Grand totals ===
    // The flat element sum lands on both sides; see the module docs.
    totals.net_total_cost = totals.net_blocks_cost
        + totals.net_mortar_cost
        + totals.net_plaster_cost
        + totals.net_openings_cost
        + totals.net_water_cost
        + elements.total_cost;
    totals.gross_total_cost = totals.gross_blocks_cost
        + totals.gross_mortar_cost
        + totals.gross_plaster_cost
        + totals.gross_openings_cost
        + totals.gross_water_cost
        + elements.total_cost;

    totals.line_items = build_line_items(&totals, &elements, settings);
    Some(totals)
}

fn line(
    item_type: &str,
    net_quantity: f64,
    gross_quantity: f64,
    net_cost: f64,
    gross_cost: f64,
    unit: &str,
) -> MaterialLineItem {
    MaterialLineItem {
        item_type: item_type.to_string(),
        net_quantity,
        gross_quantity,
        net_cost,
        gross_cost,
        unit: unit.to_string(),
    }
}

fn build_line_items(
    t: &CalculationTotals,
    elements: &ProfessionalElements,
    settings: &QsSettings,
) -> Vec<MaterialLineItem> {
    let factor = settings.masonry_factor();
    let mut items = vec![
        line(
            "blocks",
            t.net_blocks as f64,
            t.gross_blocks as f64,
            t.net_blocks_cost,
            t.gross_blocks_cost,
            "pcs",
        ),
        line(
            "mortar",
            t.net_mortar_m3,
            t.gross_mortar_m3,
            t.net_mortar_cost,
            t.gross_mortar_cost,
            "m³",
        ),
        line(
            "plaster",
            t.net_plaster_m2,
            t.gross_plaster_m2,
            t.net_plaster_cost,
            t.gross_plaster_cost,
            "m²",
        ),
        line(
            "doors",
            t.net_doors as f64,
            t.gross_doors as f64,
            t.net_doors_cost,
            t.gross_doors_cost,
            "pcs",
        ),
        line(
            "windows",
            t.net_windows as f64,
            t.gross_windows as f64,
            t.net_windows_cost,
            t.gross_windows_cost,
            "pcs",
        ),
        line(
            "door_frames",
            t.net_door_frames as f64,
            t.gross_door_frames as f64,
            t.net_door_frames_cost,
            t.gross_door_frames_cost,
            "pcs",
        ),
        line(
            "window_frames",
            t.net_window_frames as f64,
            t.gross_window_frames as f64,
            t.net_window_frames_cost,
            t.gross_window_frames_cost,
            "pcs",
        ),
    ];

    if let Some(lintels) = &elements.lintels {
        items.push(line(
            "concrete_lintels",
            lintels.concrete_m3,
            lintels.concrete_m3 * factor,
            t.net_lintels_cost,
            t.gross_lintels_cost,
            "m³",
        ));
        items.push(line(
            "lintel_reinforcement",
            t.net_lintel_rebar_kg,
            t.gross_lintel_rebar_kg,
            t.net_lintel_rebar_cost,
            t.gross_lintel_rebar_cost,
            "kg",
        ));
    }
    if let Some(ring) = &elements.ring_beam {
        items.push(line(
            "ring_beam_concrete",
            ring.concrete_m3,
            ring.concrete_m3 * factor,
            t.net_ring_beams_cost,
            t.gross_ring_beams_cost,
            "m³",
        ));
        items.push(line(
            "ring_beam_reinforcement",
            t.net_ring_beam_rebar_kg,
            t.gross_ring_beam_rebar_kg,
            t.net_ring_beam_rebar_cost,
            t.gross_ring_beam_rebar_cost,
            "kg",
        ));
    }
    if t.net_wall_rebar_kg > 0.0 {
        items.push(line(
            "wall_reinforcement",
            t.net_wall_rebar_kg,
            t.gross_wall_rebar_kg,
            t.net_wall_rebar_cost,
            t.gross_wall_rebar_cost,
            "kg",
        ));
    }
    if t.net_dpc_m > 0.0 {
        items.push(line(
            "dpc",
            t.net_dpc_m,
            t.gross_dpc_m,
            t.net_dpc_cost,
            t.gross_dpc_cost,
            "m",
        ));
    }
    if t.net_movement_joints > 0 {
        items.push(line(
            "movement_joints",
            t.net_movement_joints as f64,
            t.gross_movement_joints as f64,
            t.net_movement_joints_cost,
            t.gross_movement_joints_cost,
            "pcs",
        ));
    }
    if t.net_scaffolding_area_m2 > 0.0 {
        items.push(line(
            "scaffolding",
            t.net_scaffolding_area_m2,
            t.gross_scaffolding_area_m2,
            t.net_scaffolding_cost,
            t.gross_scaffolding_cost,
            "m²·days",
        ));
    }
    if t.net_waste_volume_m3 > 0.0 {
        items.push(line(
            "waste_removal",
            t.net_waste_volume_m3,
            t.gross_waste_volume_m3,
            t.net_waste_removal_cost,
            t.gross_waste_removal_cost,
            "m³",
        ));
    }
    if let Some(hoop) = &t.hoop_iron {
        items.push(line(
            "hoop_iron",
            hoop.coils as f64,
            hoop.coils as f64,
            hoop.total_cost,
            hoop.gross_cost,
            "rolls",
        ));
    }
    if !settings.client_provides_water {
        items.push(line(
            "water",
            t.net_water_l,
            t.gross_water_l,
            t.net_water_cost,
            t.gross_water_cost,
            "liters",
        ));
    }

    items
}
