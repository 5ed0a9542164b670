//! # Doors, Windows, and Accessories
//!
//! Openings are owned by wall sections and carry everything their costing
//! needs: a size specification, the leaf and frame, and the accessory groups
//! (architrave, quarter round, ironmongery, transom, glazing). Optional
//! nesting from the editing surface is modeled as explicit sum types and
//! defaulted structs so the cost aggregation stays exhaustive.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::openings::{Door, SizeSpec};
//!
//! let door = Door::new(200);
//! assert_eq!(door.count, 1);
//! // Standard 0.9 × 2.1 m leaf
//! assert!((door.area_m2() - 1.89).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::parse::{parse_dimension, parse_size_area, parse_size_pair};

/// Standard door leaf sizes stocked by suppliers
pub const STANDARD_DOOR_SIZES: [&str; 3] = ["0.9 × 2.1 m", "1.0 × 2.1 m", "1.2 × 2.4 m"];

/// Standard window sizes stocked by suppliers
pub const STANDARD_WINDOW_SIZES: [&str; 3] = ["1.2 × 1.2 m", "1.5 × 1.2 m", "2.0 × 1.5 m"];

/// Door leaf specification types
pub const DOOR_TYPES: [&str; 5] = ["Steel", "Solid flush", "Semi-solid flush", "Panel", "T&G"];

/// Frame material types
pub const FRAME_TYPES: [&str; 3] = ["Wood", "Steel", "Aluminum"];

/// Glass thickness ladder in millimeters
pub const GLASS_THICKNESS_OPTIONS: [u32; 7] = [3, 4, 5, 6, 8, 10, 12];

/// Opening size: a standard catalog label or custom dimension strings.
///
/// Custom dimensions stay as strings and parse leniently; malformed input
/// yields zero area rather than an error.
///
/// ## JSON Serialization
///
/// ```json
/// { "kind": "standard", "label": "0.9 × 2.1 m" }
/// { "kind": "custom", "height": "2.4", "width": "1.1" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SizeSpec {
    Standard { label: String },
    Custom { height: String, width: String },
}

impl SizeSpec {
    pub fn standard(label: impl Into<String>) -> Self {
        SizeSpec::Standard {
            label: label.into(),
        }
    }

    /// Area in m², zero when unparseable
    pub fn area_m2(&self) -> f64 {
        match self {
            SizeSpec::Standard { label } => parse_size_area(label),
            SizeSpec::Custom { height, width } => parse_dimension(height) * parse_dimension(width),
        }
    }

    /// Width in meters, zero when unparseable
    pub fn width_m(&self) -> f64 {
        match self {
            SizeSpec::Standard { label } => parse_size_pair(label).map(|(w, _)| w).unwrap_or(0.0),
            SizeSpec::Custom { width, .. } => parse_dimension(width),
        }
    }

    /// Height in meters, zero when unparseable
    pub fn height_m(&self) -> f64 {
        match self {
            SizeSpec::Standard { label } => parse_size_pair(label).map(|(_, h)| h).unwrap_or(0.0),
            SizeSpec::Custom { height, .. } => parse_dimension(height),
        }
    }

    /// The label used for catalog size lookups; custom sizes have none.
    pub fn label(&self) -> Option<&str> {
        match self {
            SizeSpec::Standard { label } => Some(label),
            SizeSpec::Custom { .. } => None,
        }
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        SizeSpec::standard(STANDARD_DOOR_SIZES[0])
    }
}

/// Frame for a door or window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame material ("Wood", "Steel", "Aluminum")
    pub frame_type: String,
    pub size: SizeSpec,
    /// Explicit price override; wins over any catalog entry when positive
    pub price: Option<f64>,
}

impl Frame {
    /// Frame sized from the wall-thickness snapshot: 200 mm walls take a
    /// 200×50 mm frame, everything else 150×50 mm.
    pub fn for_wall_thickness(wall_thickness_mm: u32) -> Self {
        let (height, width) = frame_size_for_wall_mm(wall_thickness_mm);
        Frame {
            frame_type: FRAME_TYPES[0].to_string(),
            size: SizeSpec::Custom {
                height: height.to_string(),
                width: width.to_string(),
            },
            price: None,
        }
    }
}

/// Frame section dimensions (height, width) in mm for a wall thickness
pub fn frame_size_for_wall_mm(wall_thickness_mm: u32) -> (u32, u32) {
    if wall_thickness_mm >= 200 {
        (200, 50)
    } else {
        (150, 50)
    }
}

/// A selected fastener/ironmongery catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerSelection {
    #[serde(rename = "type")]
    pub item_type: String,
    pub size: String,
}

impl FastenerSelection {
    pub fn new(item_type: impl Into<String>, size: impl Into<String>) -> Self {
        FastenerSelection {
            item_type: item_type.into(),
            size: size.into(),
        }
    }
}

/// A trim accessory run (architrave, quarter round)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimAccessory {
    pub selected: Option<FastenerSelection>,
    /// Lengths/sets per opening
    pub quantity: f64,
    /// Explicit unit-price override
    pub price: Option<f64>,
}

/// One ironmongery category on an opening.
///
/// Costing keys on `quantity`; `set_enabled(false)` zeroes the quantity so
/// the flag and the cost can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IronmongeryItem {
    pub enabled: bool,
    pub selected: Option<FastenerSelection>,
    pub quantity: f64,
    pub price: Option<f64>,
}

impl IronmongeryItem {
    pub fn new(item_type: &str, size: &str, quantity: f64) -> Self {
        IronmongeryItem {
            enabled: quantity > 0.0,
            selected: Some(FastenerSelection::new(item_type, size)),
            quantity,
            price: None,
        }
    }

    /// Toggle the category. Disabling zeroes the quantity.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.quantity = 0.0;
        }
    }
}

/// The five ironmongery categories carried by an opening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Ironmongery {
    pub hinges: IronmongeryItem,
    pub locks: IronmongeryItem,
    pub handles: IronmongeryItem,
    pub bolts: IronmongeryItem,
    pub closers: IronmongeryItem,
}

impl Ironmongery {
    /// Conventional door hardware: three hinges, one lock, one handle.
    pub fn door_defaults() -> Self {
        Ironmongery {
            hinges: IronmongeryItem::new("butt-hinge", "100mm", 3.0),
            locks: IronmongeryItem::new("mortice-lock", "3-lever", 1.0),
            handles: IronmongeryItem::new("lever-handle", "standard", 1.0),
            bolts: IronmongeryItem::new("tower-bolt", "150mm", 0.0),
            closers: IronmongeryItem::default(),
        }
    }

    /// (catalog category, item) pairs for iteration during costing
    pub fn categories(&self) -> [(&'static str, &IronmongeryItem); 5] {
        [
            ("Hinges", &self.hinges),
            ("Locks", &self.locks),
            ("Handles", &self.handles),
            ("Bolts", &self.bolts),
            ("Closers", &self.closers),
        ]
    }
}

/// Glazing on a door transom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransomGlazing {
    pub glass_area_m2: f64,
    pub glass_price_per_m2: Option<f64>,
    pub putty_length_m: f64,
    pub putty_price_per_m: Option<f64>,
}

/// Fanlight panel above a door.
///
/// Its price and quantity are user-set or derived by the editing surface,
/// never resolved from a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transom {
    pub enabled: bool,
    pub height_m: f64,
    pub width_m: f64,
    pub quantity: f64,
    pub price: Option<f64>,
    pub glazing: TransomGlazing,
}

impl Transom {
    /// A disabled transom of conventional fanlight size above a door leaf.
    pub fn for_door_width(width_m: f64) -> Self {
        let height_m = 0.3;
        Transom {
            enabled: false,
            height_m,
            width_m,
            quantity: 1.0,
            price: None,
            glazing: TransomGlazing {
                glass_area_m2: width_m * height_m,
                glass_price_per_m2: None,
                putty_length_m: 2.0 * (width_m + height_m),
                putty_price_per_m: None,
            },
        }
    }
}

/// A putty tin size with its rebate coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PuttyTin {
    #[default]
    #[serde(rename = "0.5kg")]
    HalfKg,
    #[serde(rename = "1kg")]
    OneKg,
    #[serde(rename = "2kg")]
    TwoKg,
}

impl PuttyTin {
    /// Meters of glazing rebate one tin covers
    pub fn coverage_m(&self) -> f64 {
        match self {
            PuttyTin::HalfKg => 6.0,
            PuttyTin::OneKg => 12.0,
            PuttyTin::TwoKg => 24.0,
        }
    }
}

/// Putty requirement on a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PuttySpec {
    pub tin: PuttyTin,
    /// Rebate length to fill, in meters
    pub quantity_m: f64,
    pub price: Option<f64>,
}

/// Glass specification on a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassSpec {
    pub glass_type: String,
    pub thickness_mm: u32,
    pub panes: u32,
    pub price_per_m2: Option<f64>,
}

impl Default for GlassSpec {
    fn default() -> Self {
        GlassSpec {
            glass_type: "Clear".to_string(),
            thickness_mm: 4,
            panes: 1,
            price_per_m2: None,
        }
    }
}

/// Window glazing: glass plus putty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WindowGlazing {
    pub glass: GlassSpec,
    pub putty: PuttySpec,
}

/// A door entity within a wall section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub size: SizeSpec,
    /// Leaf type label ("Panel", "Steel", ...)
    pub door_type: String,
    /// Repetition multiplier
    pub count: u32,
    /// Wall-thickness snapshot in mm, taken when the door was added
    pub wall_thickness_mm: u32,
    /// Explicit leaf price override
    pub price: Option<f64>,
    pub frame: Frame,
    pub architrave: Option<TrimAccessory>,
    pub quarter_round: Option<TrimAccessory>,
    pub ironmongery: Ironmongery,
    pub transom: Option<Transom>,
}

impl Door {
    /// New door with the editing surface's conventional defaults.
    pub fn new(wall_thickness_mm: u32) -> Self {
        Door {
            size: SizeSpec::standard(STANDARD_DOOR_SIZES[0]),
            door_type: DOOR_TYPES[0].to_string(),
            count: 1,
            wall_thickness_mm,
            price: None,
            frame: Frame::for_wall_thickness(wall_thickness_mm),
            architrave: Some(TrimAccessory {
                selected: Some(FastenerSelection::new("timber-architrave", "40x20mm")),
                quantity: 1.0,
                price: None,
            }),
            quarter_round: Some(TrimAccessory {
                selected: Some(FastenerSelection::new("timber-quarter-round", "20mm")),
                quantity: 1.0,
                price: None,
            }),
            ironmongery: Ironmongery::door_defaults(),
            transom: Some(Transom::for_door_width(0.9)),
        }
    }

    /// Leaf area in m² for one door
    pub fn area_m2(&self) -> f64 {
        self.size.area_m2()
    }

    /// Opening area contributed to the wall: leaf area × count
    pub fn total_area_m2(&self) -> f64 {
        self.area_m2() * self.count as f64
    }
}

/// A window entity within a wall section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub size: SizeSpec,
    /// Glass type label shown on the leaf line ("Clear", "Tinted", ...)
    pub window_type: String,
    pub count: u32,
    pub wall_thickness_mm: u32,
    pub price: Option<f64>,
    pub frame: Frame,
    pub architrave: Option<TrimAccessory>,
    pub ironmongery: Ironmongery,
    pub glazing: WindowGlazing,
    /// Unsupported glass span used for the sufficiency check, in meters
    pub span_m: f64,
    /// Override for the span-derived minimum thickness
    pub recommended_thickness_mm: Option<u32>,
}

impl Window {
    pub fn new(wall_thickness_mm: u32) -> Self {
        let mut window = Window {
            size: SizeSpec::standard(STANDARD_WINDOW_SIZES[0]),
            window_type: "Clear".to_string(),
            count: 1,
            wall_thickness_mm,
            price: None,
            frame: Frame {
                frame_type: FRAME_TYPES[0].to_string(),
                size: SizeSpec::standard(STANDARD_WINDOW_SIZES[0]),
                price: None,
            },
            architrave: Some(TrimAccessory {
                selected: Some(FastenerSelection::new("timber-architrave", "40x20mm")),
                quantity: 1.0,
                price: None,
            }),
            ironmongery: Ironmongery::default(),
            glazing: WindowGlazing::default(),
            span_m: 1.2,
            recommended_thickness_mm: None,
        };
        // Rebate length starts at the derived requirement; the editing
        // surface refreshes it when the size or pane count changes
        window.glazing.putty.quantity_m = window.putty_length_needed_m();
        window
    }

    pub fn area_m2(&self) -> f64 {
        self.size.area_m2()
    }

    pub fn total_area_m2(&self) -> f64 {
        self.area_m2() * self.count as f64
    }

    /// Putty rebate length required: pane perimeter × panes
    pub fn putty_length_needed_m(&self) -> f64 {
        let w = self.size.width_m();
        let h = self.size.height_m();
        2.0 * (w + h) * self.glazing.glass.panes as f64
    }

    /// Putty tins required to fill the rebate length
    pub fn putty_tins_needed(&self) -> u32 {
        let length = self.putty_length_needed_m();
        if length <= 0.0 {
            return 0;
        }
        (length / self.glazing.putty.tin.coverage_m()).ceil() as u32
    }

    /// Span-derived minimum glass thickness, honoring any override
    pub fn required_glass_thickness_mm(&self) -> u32 {
        self.recommended_thickness_mm
            .unwrap_or_else(|| recommended_glass_thickness_mm(self.span_m))
    }

    /// Whether the selected glass thickness meets the span-derived minimum
    pub fn is_glass_sufficient(&self) -> bool {
        self.glazing.glass.thickness_mm >= self.required_glass_thickness_mm()
    }
}

/// Minimum glass thickness for an unsupported span, following the stocked
/// 3–12 mm thickness ladder.
pub fn recommended_glass_thickness_mm(span_m: f64) -> u32 {
    if !span_m.is_finite() || span_m <= 0.0 {
        return GLASS_THICKNESS_OPTIONS[0];
    }
    match span_m {
        s if s <= 0.9 => 3,
        s if s <= 1.2 => 4,
        s if s <= 1.5 => 5,
        s if s <= 2.0 => 6,
        s if s <= 2.5 => 8,
        s if s <= 3.0 => 10,
        _ => 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_door_area() {
        let door = Door::new(200);
        assert!((door.area_m2() - 1.89).abs() < 1e-9);
        assert!((door.total_area_m2() - 1.89).abs() < 1e-9);
    }

    #[test]
    fn test_custom_size_area() {
        let size = SizeSpec::Custom {
            height: "2.1".to_string(),
            width: "1.1".to_string(),
        };
        assert!((size.area_m2() - 2.31).abs() < 1e-9);

        let bad = SizeSpec::Custom {
            height: "tall".to_string(),
            width: "1.1".to_string(),
        };
        assert_eq!(bad.area_m2(), 0.0);
    }

    #[test]
    fn test_door_count_multiplies_area() {
        let mut door = Door::new(200);
        door.count = 3;
        assert!((door.total_area_m2() - 5.67).abs() < 1e-9);
    }

    #[test]
    fn test_frame_sizing_from_wall_thickness() {
        assert_eq!(frame_size_for_wall_mm(200), (200, 50));
        assert_eq!(frame_size_for_wall_mm(150), (150, 50));
        assert_eq!(frame_size_for_wall_mm(100), (150, 50));
    }

    #[test]
    fn test_door_defaults() {
        let door = Door::new(200);
        assert_eq!(door.ironmongery.hinges.quantity, 3.0);
        assert_eq!(door.ironmongery.locks.quantity, 1.0);
        assert_eq!(door.ironmongery.closers.quantity, 0.0);
        assert!(!door.ironmongery.closers.enabled);
        assert!(door.transom.as_ref().is_some_and(|t| !t.enabled));
    }

    #[test]
    fn test_disabling_ironmongery_zeroes_quantity() {
        let mut door = Door::new(200);
        assert!(door.ironmongery.hinges.enabled);
        door.ironmongery.hinges.set_enabled(false);
        assert_eq!(door.ironmongery.hinges.quantity, 0.0);
    }

    #[test]
    fn test_window_putty_requirements() {
        let window = Window::new(150);
        // 1.2 × 1.2 window, 1 pane: rebate = 2 × (1.2 + 1.2) = 4.8 m
        assert!((window.putty_length_needed_m() - 4.8).abs() < 1e-9);
        // New windows start with the derived rebate length
        assert!((window.glazing.putty.quantity_m - 4.8).abs() < 1e-9);
        // 0.5 kg tin covers 6 m → one tin
        assert_eq!(window.putty_tins_needed(), 1);
    }

    #[test]
    fn test_window_putty_scales_with_panes() {
        let mut window = Window::new(150);
        window.glazing.glass.panes = 2;
        assert!((window.putty_length_needed_m() - 9.6).abs() < 1e-9);
        assert_eq!(window.putty_tins_needed(), 2);
    }

    #[test]
    fn test_glass_thickness_ladder() {
        assert_eq!(recommended_glass_thickness_mm(0.8), 3);
        assert_eq!(recommended_glass_thickness_mm(1.2), 4);
        assert_eq!(recommended_glass_thickness_mm(1.8), 6);
        assert_eq!(recommended_glass_thickness_mm(3.5), 12);
        assert_eq!(recommended_glass_thickness_mm(-1.0), 3);
    }

    #[test]
    fn test_glass_sufficiency() {
        let mut window = Window::new(150);
        window.span_m = 1.2;
        window.glazing.glass.thickness_mm = 4;
        assert!(window.is_glass_sufficient());

        window.span_m = 2.0;
        assert!(!window.is_glass_sufficient());

        // Explicit override wins over the span table
        window.recommended_thickness_mm = Some(4);
        assert!(window.is_glass_sufficient());
    }

    #[test]
    fn test_transom_defaults_derive_glazing() {
        let transom = Transom::for_door_width(0.9);
        assert!((transom.glazing.glass_area_m2 - 0.27).abs() < 1e-9);
        assert!((transom.glazing.putty_length_m - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_size_spec_serialization() {
        let size = SizeSpec::standard("0.9 × 2.1 m");
        let json = serde_json::to_string(&size).unwrap();
        assert!(json.contains("\"kind\":\"standard\""));
        let roundtrip: SizeSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(size, roundtrip);
    }

    #[test]
    fn test_door_serialization_roundtrip() {
        let door = Door::new(200);
        let json = serde_json::to_string_pretty(&door).unwrap();
        let roundtrip: Door = serde_json::from_str(&json).unwrap();
        assert_eq!(door, roundtrip);
    }
}
