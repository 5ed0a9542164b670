//! # Takeoff Calculations
//!
//! Each calculator is a pure function over a snapshot of inputs:
//!
//! - [`blocks`] - Centerline wall quantities (areas, block counts, blocks-feet)
//! - [`mortar`] - Mortar, plaster, and mixing-water derivation
//! - [`openings`] - Door/window leaf, frame, and accessory costing
//! - [`elements`] - Independently toggled professional elements
//! - [`totals`] - The aggregator producing [`totals::CalculationTotals`]
//!
//! Data flows one direction: wall quantities feed the wet trades, openings
//! and elements cost themselves against the price book, and the aggregator
//! folds everything into one totals record with a line-item list for export.

pub mod blocks;
pub mod elements;
pub mod mortar;
pub mod openings;
pub mod totals;

pub use blocks::{all_wall_quantities, WallQuantities};
pub use elements::{HoopIronSummary, ProfessionalElements};
pub use mortar::{concrete_materials, mortar_materials, ConcreteMaterials, MortarMaterials};
pub use openings::OpeningsCosts;
pub use totals::{compute, CalculationTotals, MaterialLineItem};
