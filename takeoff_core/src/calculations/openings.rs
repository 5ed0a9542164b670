//! # Openings Costing
//!
//! Walks every door and window in the wall sections, resolving leaf, frame,
//! and accessory prices through the price book. Explicit prices set on an
//! entity always win over catalog lookups.
//!
//! Accessory accumulation keys on the presence of a quantity, not on the
//! `enabled` flag; the editing operations zero quantities when a category is
//! disabled, so the two views cannot disagree.

use serde::{Deserialize, Serialize};

use crate::catalog::{explicit_or, PriceBook};
use crate::openings::{Door, Transom, TrimAccessory, Window};
use crate::walls::WallSection;

/// Accumulated openings quantities and costs, all net (pre-wastage).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct OpeningsCosts {
    pub doors_count: u32,
    pub windows_count: u32,
    pub door_frames_count: u32,
    pub window_frames_count: u32,

    pub door_leaves_cost: f64,
    pub door_frames_cost: f64,
    pub window_leaves_cost: f64,
    pub window_frames_cost: f64,

    pub architrave_cost: f64,
    pub quarter_round_cost: f64,
    pub ironmongery_cost: f64,
    pub transom_cost: f64,
    pub transom_glass_cost: f64,
    pub transom_putty_cost: f64,
    pub window_glass_cost: f64,
    pub window_putty_cost: f64,

    /// Windows whose glass fails the span-derived thickness check
    pub insufficient_glass_count: u32,
}

impl OpeningsCosts {
    /// Total openings cost across leaves, frames, and accessories
    pub fn total(&self) -> f64 {
        self.door_leaves_cost
            + self.door_frames_cost
            + self.window_leaves_cost
            + self.window_frames_cost
            + self.architrave_cost
            + self.quarter_round_cost
            + self.ironmongery_cost
            + self.transom_cost
            + self.transom_glass_cost
            + self.transom_putty_cost
            + self.window_glass_cost
            + self.window_putty_cost
    }
}

fn trim_cost(trim: Option<&TrimAccessory>, category: &str, count: f64, book: &PriceBook) -> f64 {
    let Some(trim) = trim else {
        return 0.0;
    };
    if trim.quantity <= 0.0 {
        return 0.0;
    }
    let unit = explicit_or(trim.price, || {
        book.fastener_price(category, trim.selected.as_ref())
    });
    trim.quantity * unit * count
}

fn transom_costs(transom: Option<&Transom>, count: f64, book: &PriceBook) -> (f64, f64, f64) {
    let Some(t) = transom else {
        return (0.0, 0.0, 0.0);
    };
    if !t.enabled {
        return (0.0, 0.0, 0.0);
    }
    let quantity = if t.quantity > 0.0 { t.quantity } else { 1.0 };

    // The transom itself is only ever user-priced
    let base = match t.price {
        Some(price) if price > 0.0 && t.quantity > 0.0 => t.quantity * price * count,
        _ => 0.0,
    };

    let glass = if t.glazing.glass_area_m2 > 0.0 {
        let unit = explicit_or(t.glazing.glass_price_per_m2, || {
            book.glass_price_per_m2("Clear")
        });
        t.glazing.glass_area_m2 * unit * quantity * count
    } else {
        0.0
    };

    let putty = if t.glazing.putty_length_m > 0.0 {
        let unit = explicit_or(t.glazing.putty_price_per_m, || book.putty_price_per_m());
        t.glazing.putty_length_m * unit * quantity * count
    } else {
        0.0
    };

    (base, glass, putty)
}

fn door_costs(door: &Door, book: &PriceBook, costs: &mut OpeningsCosts) {
    let count = door.count as f64;
    costs.doors_count += door.count;
    costs.door_frames_count += door.count;

    let leaf_unit = explicit_or(door.price, || {
        book.material_size_price("Doors", &door.door_type, door.size.label())
    });
    costs.door_leaves_cost += leaf_unit * count;

    let frame_unit = explicit_or(door.frame.price, || {
        book.material_size_price("Door Frames", &door.frame.frame_type, door.size.label())
    });
    costs.door_frames_cost += frame_unit * count;

    costs.architrave_cost += trim_cost(door.architrave.as_ref(), "Architraves", count, book);
    costs.quarter_round_cost +=
        trim_cost(door.quarter_round.as_ref(), "Quarter_Rounds", count, book);

    for (category, item) in door.ironmongery.categories() {
        if item.quantity <= 0.0 {
            continue;
        }
        let unit = explicit_or(item.price, || {
            book.fastener_price(category, item.selected.as_ref())
        });
        costs.ironmongery_cost += item.quantity * unit * count;
    }

    let (base, glass, putty) = transom_costs(door.transom.as_ref(), count, book);
    costs.transom_cost += base;
    costs.transom_glass_cost += glass;
    costs.transom_putty_cost += putty;
}

fn window_costs(window: &Window, book: &PriceBook, costs: &mut OpeningsCosts) {
    let count = window.count as f64;
    costs.windows_count += window.count;
    costs.window_frames_count += window.count;

    let leaf_unit = explicit_or(window.price, || {
        book.material_size_price("Windows", &window.window_type, window.size.label())
    });
    costs.window_leaves_cost += leaf_unit * count;

    let frame_unit = explicit_or(window.frame.price, || {
        book.material_size_price(
            "Window Frames",
            &window.frame.frame_type,
            window.size.label(),
        )
    });
    costs.window_frames_cost += frame_unit * count;

    costs.architrave_cost += trim_cost(window.architrave.as_ref(), "Architraves", count, book);

    for (category, item) in window.ironmongery.categories() {
        if item.quantity <= 0.0 {
            continue;
        }
        let unit = explicit_or(item.price, || {
            book.fastener_price(category, item.selected.as_ref())
        });
        costs.ironmongery_cost += item.quantity * unit * count;
    }

    // Glazing: pane area × pane count × glass price
    let glass = &window.glazing.glass;
    let glass_unit = explicit_or(glass.price_per_m2, || {
        book.glass_price_per_m2(&glass.glass_type)
    });
    costs.window_glass_cost += window.area_m2() * glass.panes as f64 * glass_unit * count;

    let putty = &window.glazing.putty;
    if putty.quantity_m > 0.0 {
        let putty_unit = explicit_or(putty.price, || book.putty_price_per_m());
        costs.window_putty_cost += putty.quantity_m * putty_unit * count;
    }

    if !window.is_glass_sufficient() {
        costs.insufficient_glass_count += window.count;
    }
}

/// Cost every opening in the given wall sections against the price book.
pub fn openings_costs(sections: &[WallSection], book: &PriceBook) -> OpeningsCosts {
    let mut costs = OpeningsCosts::default();
    for section in sections {
        for door in &section.doors {
            door_costs(door, book, &mut costs);
        }
        for window in &section.windows {
            window_costs(window, book, &mut costs);
        }
    }
    costs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openings::SizeSpec;
    use crate::walls::{WallKind, WallSection};

    fn book_with_openings() -> PriceBook {
        let mut book = PriceBook::new();
        book.add_size_price("Doors", "Steel", "0.9 × 2.1 m", 7000.0)
            .add_size_price("Door Frames", "Wood", "0.9 × 2.1 m", 2500.0)
            .add_size_price("Windows", "Clear", "1.2 × 1.2 m", 4200.0)
            .add_size_price("Window Frames", "Wood", "1.2 × 1.2 m", 1800.0)
            .add_variant("Glazing", "Clear", 900.0)
            .add_variant("Sealant", "Glazing Putty", 40.0)
            .add_fastener("Hinges", "butt-hinge", "100mm", 120.0)
            .add_fastener("Locks", "mortice-lock", "3-lever", 950.0)
            .add_fastener("Handles", "lever-handle", "standard", 450.0)
            .add_fastener("Architraves", "timber-architrave", "40x20mm", 300.0)
            .add_fastener("Quarter_Rounds", "timber-quarter-round", "20mm", 150.0);
        book
    }

    fn section_with_default_door() -> WallSection {
        let mut section = WallSection::new(WallKind::External);
        section.doors.push(Door::new(200));
        section
    }

    #[test]
    fn test_door_leaf_and_frame_from_catalog() {
        let book = book_with_openings();
        let sections = vec![section_with_default_door()];
        let costs = openings_costs(&sections, &book);

        assert_eq!(costs.doors_count, 1);
        assert_eq!(costs.door_frames_count, 1);
        assert_eq!(costs.door_leaves_cost, 7000.0);
        assert_eq!(costs.door_frames_cost, 2500.0);
    }

    #[test]
    fn test_explicit_price_beats_catalog() {
        let book = book_with_openings();
        let mut section = section_with_default_door();
        section.doors[0].price = Some(5000.0);
        section.doors[0].count = 2;

        let costs = openings_costs(&[section], &book);
        // quantity × count × explicit price, regardless of catalog contents
        assert_eq!(costs.door_leaves_cost, 10000.0);
    }

    #[test]
    fn test_default_door_hardware_costs() {
        let book = book_with_openings();
        let costs = openings_costs(&[section_with_default_door()], &book);

        // 3 hinges + 1 lock + 1 handle
        let expected = 3.0 * 120.0 + 950.0 + 450.0;
        assert_eq!(costs.ironmongery_cost, expected);
        assert_eq!(costs.architrave_cost, 300.0);
        assert_eq!(costs.quarter_round_cost, 150.0);
    }

    #[test]
    fn test_ironmongery_keys_on_quantity_not_flag() {
        let book = book_with_openings();
        let mut section = section_with_default_door();
        // Flag left on but quantity zeroed: contributes nothing
        section.doors[0].ironmongery.hinges.quantity = 0.0;
        let costs = openings_costs(&[section.clone()], &book);
        assert_eq!(costs.ironmongery_cost, 950.0 + 450.0);

        // Disabling through the editing helper zeroes quantity too
        let mut section2 = section_with_default_door();
        section2.doors[0].ironmongery.locks.set_enabled(false);
        section2.doors[0].ironmongery.handles.set_enabled(false);
        let costs2 = openings_costs(&[section2], &book);
        assert_eq!(costs2.ironmongery_cost, 3.0 * 120.0);
    }

    #[test]
    fn test_disabled_transom_costs_nothing() {
        let book = book_with_openings();
        let costs = openings_costs(&[section_with_default_door()], &book);
        assert_eq!(costs.transom_cost, 0.0);
        assert_eq!(costs.transom_glass_cost, 0.0);
        assert_eq!(costs.transom_putty_cost, 0.0);
    }

    #[test]
    fn test_enabled_transom_glazing_costs() {
        let book = book_with_openings();
        let mut section = section_with_default_door();
        let transom = section.doors[0].transom.as_mut().unwrap();
        transom.enabled = true;
        transom.price = Some(800.0);

        let costs = openings_costs(&[section], &book);
        assert_eq!(costs.transom_cost, 800.0);
        // 0.27 m² of clear glass at 900/m²
        assert!((costs.transom_glass_cost - 0.27 * 900.0).abs() < 1e-9);
        // 2.4 m of rebate at 40/m
        assert!((costs.transom_putty_cost - 2.4 * 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_glazing_and_putty() {
        let book = book_with_openings();
        let mut section = WallSection::new(WallKind::External);
        let mut window = Window::new(200);
        window.size = SizeSpec::standard("1.2 × 1.2 m");
        window.glazing.glass.panes = 2;
        window.glazing.putty.quantity_m = 4.8;
        window.count = 2;
        section.windows.push(window);

        let costs = openings_costs(&[section], &book);
        assert_eq!(costs.window_leaves_cost, 4200.0 * 2.0);
        assert_eq!(costs.window_frames_cost, 1800.0 * 2.0);
        // 1.44 m² × 2 panes × 900 × 2 windows
        assert!((costs.window_glass_cost - 1.44 * 2.0 * 900.0 * 2.0).abs() < 1e-6);
        // 4.8 m × 40 × 2 windows
        assert!((costs.window_putty_cost - 4.8 * 40.0 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_glass_flagged_but_still_costed() {
        let book = book_with_openings();
        let mut section = WallSection::new(WallKind::External);
        let mut window = Window::new(200);
        window.span_m = 2.0;
        window.glazing.glass.thickness_mm = 3;
        section.windows.push(window);

        let costs = openings_costs(&[section], &book);
        assert_eq!(costs.insufficient_glass_count, 1);
        assert!(costs.window_glass_cost > 0.0);
    }

    #[test]
    fn test_missing_prices_resolve_to_zero() {
        let book = PriceBook::new();
        let costs = openings_costs(&[section_with_default_door()], &book);
        assert_eq!(costs.door_leaves_cost, 0.0);
        assert_eq!(costs.ironmongery_cost, 0.0);
        assert_eq!(costs.total(), 0.0);
        // Counts still accumulate
        assert_eq!(costs.doors_count, 1);
    }

    #[test]
    fn test_empty_sections() {
        let book = book_with_openings();
        let costs = openings_costs(&[], &book);
        assert_eq!(costs.total(), 0.0);
        assert_eq!(costs.doors_count, 0);
    }
}
