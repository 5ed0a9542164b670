//! # Professional Elements
//!
//! The independently toggled structural add-ons of a masonry takeoff:
//! lintels, ring beams, distributed wall reinforcement, damp-proof course,
//! movement joints, scaffolding, waste removal, and hoop-iron bracing.
//!
//! Each element computes its own geometry and costs only when its toggle is
//! on. Cost figures are ceiled to whole currency units, and each element
//! carries its own wastage-adjusted gross cost alongside the net figure.
//! The aggregator intentionally adds only the flat (non-wastage) element
//! total to the grand totals; both sums are exposed so that choice can be
//! revisited without recomputation.

use serde::{Deserialize, Serialize};

use crate::calculations::mortar::{concrete_materials, ConcreteMaterials};
use crate::catalog::PriceBook;
use crate::materials::rebar::{split_into_stock, STANDARD_BAR_LENGTH_M};
use crate::settings::QsSettings;
use crate::walls::{WallDimensions, WallSection};

/// Assumed block course height for reinforcement spacing, m
pub const COURSE_HEIGHT_M: f64 = 0.2;

/// Vertical spacing of hoop-iron courses, m
pub const HOOP_IRON_COURSE_SPACING_M: f64 = 0.4;

/// Sealant consumed per movement joint, liters
pub const SEALANT_PER_JOINT_L: f64 = 0.01;

/// Fraction of the wall volume assumed to end up as site waste
pub const WASTE_FRACTION: f64 = 0.05;

/// Net/gross cost pair, ceiled to whole currency units
fn ceil_pair(raw_cost: f64, wastage_factor: f64) -> (f64, f64) {
    (raw_cost.ceil(), (raw_cost * wastage_factor).ceil())
}

/// Cast-in-place lintels over the full wall run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LintelResult {
    pub length_m: f64,
    pub concrete_m3: f64,
    pub materials: ConcreteMaterials,
    pub rebar_kg: f64,
    pub net_concrete_cost: f64,
    pub gross_concrete_cost: f64,
    pub net_rebar_cost: f64,
    pub gross_rebar_cost: f64,
}

/// Ring beam at wall-top level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RingBeamResult {
    pub length_m: f64,
    pub concrete_m3: f64,
    pub materials: ConcreteMaterials,
    /// Physical stock bars to purchase for the main steel
    pub main_bars: u64,
    pub stirrup_count: u64,
    pub main_rebar_kg: f64,
    pub stirrup_rebar_kg: f64,
    pub rebar_kg: f64,
    pub net_concrete_cost: f64,
    pub gross_concrete_cost: f64,
    pub net_rebar_cost: f64,
    pub gross_rebar_cost: f64,
}

/// Bed-joint and vertical wall reinforcement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WallReinforcementResult {
    pub courses: u64,
    pub bed_joint_length_m: f64,
    pub vertical_bars: u64,
    pub vertical_length_m: f64,
    pub rebar_kg: f64,
    pub net_cost: f64,
    pub gross_cost: f64,
}

/// Damp-proof course along the external perimeter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DpcResult {
    pub length_m: f64,
    pub net_cost: f64,
    pub gross_cost: f64,
}

/// Movement joints with sealant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MovementJointsResult {
    pub joints: u64,
    pub sealant_l: f64,
    pub net_cost: f64,
    pub gross_cost: f64,
}

/// Scaffolding hire over the gross wall area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScaffoldingResult {
    pub area_m2: f64,
    pub net_cost: f64,
    pub gross_cost: f64,
}

/// Cart-away of site waste
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WasteRemovalResult {
    pub volume_m3: f64,
    pub net_cost: f64,
    pub gross_cost: f64,
}

/// Hoop-iron bracing summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct HoopIronSummary {
    pub courses: u64,
    pub length_m: f64,
    pub coils: u64,
    pub price_per_roll: f64,
    pub total_cost: f64,
    pub gross_cost: f64,
}

/// All enabled professional elements plus the two summary figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfessionalElements {
    pub lintels: Option<LintelResult>,
    pub ring_beam: Option<RingBeamResult>,
    pub wall_reinforcement: Option<WallReinforcementResult>,
    pub dpc: Option<DpcResult>,
    pub movement_joints: Option<MovementJointsResult>,
    pub scaffolding: Option<ScaffoldingResult>,
    pub waste_removal: Option<WasteRemovalResult>,
    pub hoop_iron: Option<HoopIronSummary>,
    /// Flat sum of element costs, no wastage applied
    pub total_cost: f64,
    /// Sum of the per-element wastage-adjusted costs
    pub gross_total_cost: f64,
}

fn concrete_cost(materials: &ConcreteMaterials, book: &PriceBook) -> f64 {
    materials.cement_bags * book.material_price("Cement")
        + materials.sand_m3 * book.material_price("Sand")
        + materials.ballast_m3 * book.material_price("Ballast")
        + materials.water_l / 1000.0 * book.material_price("Water")
}

fn lintels(dims: &WallDimensions, settings: &QsSettings, book: &PriceBook) -> LintelResult {
    // One continuous member over the full external + internal run
    let length_m = dims.total_perimeter_m();
    let concrete_m3 = length_m * settings.lintel_width_m * settings.lintel_depth_m;
    let materials = concrete_materials(
        concrete_m3,
        &settings.concrete_mix(),
        settings.concrete_water_cement_ratio,
    );

    let size = settings.lintel_rebar_size;
    let rebar_kg = size.weight_for_length_kg(length_m * 4.0);
    let rebar_cost = rebar_kg * book.rebar_price_per_kg(size);

    let factor = settings.masonry_factor();
    let (net_concrete_cost, gross_concrete_cost) = ceil_pair(concrete_cost(&materials, book), factor);
    let (net_rebar_cost, gross_rebar_cost) = ceil_pair(rebar_cost, factor);

    LintelResult {
        length_m,
        concrete_m3,
        materials,
        rebar_kg,
        net_concrete_cost,
        gross_concrete_cost,
        net_rebar_cost,
        gross_rebar_cost,
    }
}

fn ring_beam(dims: &WallDimensions, settings: &QsSettings, book: &PriceBook) -> RingBeamResult {
    let length_m = dims.external_perimeter_m;
    let width = settings.ring_beam_width_m;
    let depth = settings.ring_beam_depth_m;
    let concrete_m3 = length_m * width * depth;
    let materials = concrete_materials(
        concrete_m3,
        &settings.concrete_mix(),
        settings.concrete_water_cement_ratio,
    );

    // Main steel: each run spans the perimeter plus a development length,
    // then splits into 12 m stock bars losing one lap per splice.
    let main_size = settings.ring_beam_main_bar_size;
    let run_length = length_m + main_size.development_length_m(settings.development_length_factor);
    let lap = main_size.lap_length_m(settings.lap_length_factor);
    let split = split_into_stock(run_length, STANDARD_BAR_LENGTH_M, lap);
    let bar_count = settings.ring_beam_main_bar_count.max(1) as u64;
    let main_bars = bar_count * split.bars_needed;
    let main_rebar_kg = main_size.weight_for_length_kg(split.total_length_m * bar_count as f64);

    // Stirrups: closed links at the configured spacing, perimeter less the
    // bend deduction of two 90° bends.
    let stirrup_size = settings.ring_beam_stirrup_size;
    let spacing = settings.ring_beam_stirrup_spacing_m.max(0.001);
    let stirrup_count = (length_m / spacing).ceil() as u64;
    let stirrup_length = (2.0 * (width + depth) - stirrup_size.bend_deduction_m(2)).max(0.0);
    let stirrup_rebar_kg = stirrup_size.weight_for_length_kg(stirrup_count as f64 * stirrup_length);

    let rebar_cost = main_rebar_kg * book.rebar_price_per_kg(main_size)
        + stirrup_rebar_kg * book.rebar_price_per_kg(stirrup_size);

    let factor = settings.masonry_factor();
    let (net_concrete_cost, gross_concrete_cost) = ceil_pair(concrete_cost(&materials, book), factor);
    let (net_rebar_cost, gross_rebar_cost) = ceil_pair(rebar_cost, factor);

    RingBeamResult {
        length_m,
        concrete_m3,
        materials,
        main_bars,
        stirrup_count,
        main_rebar_kg,
        stirrup_rebar_kg,
        rebar_kg: main_rebar_kg + stirrup_rebar_kg,
        net_concrete_cost,
        gross_concrete_cost,
        net_rebar_cost,
        gross_rebar_cost,
    }
}

fn wall_reinforcement(
    dims: &WallDimensions,
    settings: &QsSettings,
    book: &PriceBook,
) -> WallReinforcementResult {
    let perimeter = dims.total_perimeter_m();
    let height = dims.max_height_m();
    let courses = (height / COURSE_HEIGHT_M).ceil() as u64;

    let course_spacing = settings.reinforcement_course_spacing.max(1) as f64;
    let bed_joint_length_m = perimeter * (courses as f64 / course_spacing).ceil();

    let vertical_spacing = settings.vertical_reinforcement_spacing_m.max(0.001);
    let vertical_bars = (perimeter / vertical_spacing).ceil() as u64;
    let vertical_length_m = vertical_bars as f64 * height;

    let bed_kg = settings
        .bed_joint_rebar_size
        .weight_for_length_kg(bed_joint_length_m);
    let vertical_kg = settings
        .vertical_rebar_size
        .weight_for_length_kg(vertical_length_m);

    let cost = bed_kg * book.rebar_price_per_kg(settings.bed_joint_rebar_size)
        + vertical_kg * book.rebar_price_per_kg(settings.vertical_rebar_size);
    let (net_cost, gross_cost) = ceil_pair(cost, settings.masonry_factor());

    WallReinforcementResult {
        courses,
        bed_joint_length_m,
        vertical_bars,
        vertical_length_m,
        rebar_kg: bed_kg + vertical_kg,
        net_cost,
        gross_cost,
    }
}

fn dpc(dims: &WallDimensions, settings: &QsSettings, book: &PriceBook) -> DpcResult {
    let length_m = dims.external_perimeter_m;
    let cost = length_m * book.dpc_price_per_m(&settings.dpc_material);
    let (net_cost, gross_cost) = ceil_pair(cost, settings.masonry_factor());
    DpcResult {
        length_m,
        net_cost,
        gross_cost,
    }
}

fn movement_joints(
    dims: &WallDimensions,
    settings: &QsSettings,
    book: &PriceBook,
) -> MovementJointsResult {
    let spacing = settings.movement_joint_spacing_m.max(0.001);
    let joints = (dims.total_perimeter_m() / spacing).ceil() as u64;
    let sealant_l = joints as f64 * SEALANT_PER_JOINT_L;
    let unit = book.sealant_size_price("Polyurethane", "600 ml sausage");
    let (net_cost, gross_cost) = ceil_pair(sealant_l * unit, settings.masonry_factor());
    MovementJointsResult {
        joints,
        sealant_l,
        net_cost,
        gross_cost,
    }
}

fn scaffolding(gross_wall_area_m2: f64, settings: &QsSettings) -> ScaffoldingResult {
    // Fixed one-week hire at the daily rate per 100 m²; the combined
    // multiplier is part of the calibrated estimating convention.
    let cost = gross_wall_area_m2 * settings.scaffolding_daily_rate * 7.0 / 100.0;
    let (net_cost, gross_cost) = ceil_pair(cost, settings.masonry_factor());
    ScaffoldingResult {
        area_m2: gross_wall_area_m2,
        net_cost,
        gross_cost,
    }
}

fn waste_removal(
    gross_wall_area_m2: f64,
    sections: &[WallSection],
    settings: &QsSettings,
) -> WasteRemovalResult {
    let thickness = if sections.is_empty() {
        0.2
    } else {
        sections.iter().map(|s| s.thickness_m).sum::<f64>() / sections.len() as f64
    };
    let volume_m3 = gross_wall_area_m2 * WASTE_FRACTION * thickness;
    let (net_cost, gross_cost) = ceil_pair(
        volume_m3 * settings.waste_removal_rate,
        settings.masonry_factor(),
    );
    WasteRemovalResult {
        volume_m3,
        net_cost,
        gross_cost,
    }
}

fn hoop_iron(dims: &WallDimensions, settings: &QsSettings, book: &PriceBook) -> HoopIronSummary {
    // Epsilon guards the floor against binary division noise (2.4/0.4 < 6.0)
    let courses = (dims.max_height_m() / HOOP_IRON_COURSE_SPACING_M + 1e-9).floor() as u64 + 1;
    let length_m = courses as f64 * dims.total_perimeter_m();
    let roll = settings.hoop_iron_roll;
    let coils = (length_m / roll.roll_length_m()).ceil() as u64;
    let price_per_roll = book.material_type_price("Hoop Iron", roll.label());
    let raw_cost = coils as f64 * price_per_roll;
    let (total_cost, gross_cost) = ceil_pair(raw_cost, settings.masonry_factor());
    HoopIronSummary {
        courses,
        length_m,
        coils,
        price_per_roll,
        total_cost,
        gross_cost,
    }
}

/// Compute every enabled professional element.
pub fn professional_elements(
    dims: &WallDimensions,
    sections: &[WallSection],
    settings: &QsSettings,
    book: &PriceBook,
    gross_wall_area_m2: f64,
) -> ProfessionalElements {
    let mut out = ProfessionalElements::default();

    if settings.includes_lintels {
        let r = lintels(dims, settings, book);
        out.total_cost += r.net_concrete_cost + r.net_rebar_cost;
        out.gross_total_cost += r.gross_concrete_cost + r.gross_rebar_cost;
        out.lintels = Some(r);
    }
    if settings.includes_ring_beams {
        let r = ring_beam(dims, settings, book);
        out.total_cost += r.net_concrete_cost + r.net_rebar_cost;
        out.gross_total_cost += r.gross_concrete_cost + r.gross_rebar_cost;
        out.ring_beam = Some(r);
    }
    if settings.includes_reinforcement {
        let r = wall_reinforcement(dims, settings, book);
        out.total_cost += r.net_cost;
        out.gross_total_cost += r.gross_cost;
        out.wall_reinforcement = Some(r);
    }
    if settings.includes_dpc {
        let r = dpc(dims, settings, book);
        out.total_cost += r.net_cost;
        out.gross_total_cost += r.gross_cost;
        out.dpc = Some(r);
    }
    if settings.includes_movement_joints {
        let r = movement_joints(dims, settings, book);
        out.total_cost += r.net_cost;
        out.gross_total_cost += r.gross_cost;
        out.movement_joints = Some(r);
    }
    if settings.includes_scaffolding {
        let r = scaffolding(gross_wall_area_m2, settings);
        out.total_cost += r.net_cost;
        out.gross_total_cost += r.gross_cost;
        out.scaffolding = Some(r);
    }
    if settings.includes_waste_removal {
        let r = waste_removal(gross_wall_area_m2, sections, settings);
        out.total_cost += r.net_cost;
        out.gross_total_cost += r.gross_cost;
        out.waste_removal = Some(r);
    }
    if settings.includes_hoop_iron {
        let r = hoop_iron(dims, settings, book);
        out.total_cost += r.total_cost;
        out.gross_total_cost += r.gross_cost;
        out.hoop_iron = Some(r);
    }

    out
}
