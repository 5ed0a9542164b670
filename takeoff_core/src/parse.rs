//! # Tolerant Input Parsers
//!
//! Size labels and mix ratios arrive as free-form strings ("0.9 × 2.1 m",
//! "1:4", "0.5"). These parsers accept the separator and whitespace variants
//! seen in real catalogs and degrade to safe defaults instead of erroring:
//! a malformed size label contributes zero area, a malformed ratio falls
//! back to the conventional mix.

use serde::{Deserialize, Serialize};

/// A two-part cement:sand mix ratio (mortar, plaster)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortarRatio {
    pub cement: f64,
    pub sand: f64,
}

impl MortarRatio {
    pub fn total_parts(&self) -> f64 {
        self.cement + self.sand
    }

    /// Fraction of the mix volume that is cement
    pub fn cement_fraction(&self) -> f64 {
        self.cement / self.total_parts()
    }

    /// Fraction of the mix volume that is sand
    pub fn sand_fraction(&self) -> f64 {
        self.sand / self.total_parts()
    }
}

/// A three-part cement:sand:ballast mix ratio (concrete)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRatio {
    pub cement: f64,
    pub sand: f64,
    pub ballast: f64,
}

impl ConcreteRatio {
    pub fn total_parts(&self) -> f64 {
        self.cement + self.sand + self.ballast
    }
}

/// Strip a size label down to `<number>x<number>` form.
///
/// Accepts both `x` and `×` separators and discards units and whitespace
/// ("0.9 × 2.1 m" becomes "0.9x2.1").
fn clean_size_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c == '×' || c == 'X' { 'x' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == 'x')
        .collect()
}

/// Parse a "W × H" size label into a (width, height) pair in meters.
///
/// Returns `None` when either component is missing or not a finite number.
///
/// # Example
///
/// ```rust
/// use takeoff_core::parse::parse_size_pair;
///
/// assert_eq!(parse_size_pair("0.9 × 2.1 m"), Some((0.9, 2.1)));
/// assert_eq!(parse_size_pair("1.2x1.2"), Some((1.2, 1.2)));
/// assert_eq!(parse_size_pair("large"), None);
/// ```
pub fn parse_size_pair(label: &str) -> Option<(f64, f64)> {
    if label.is_empty() {
        return None;
    }
    let cleaned = clean_size_label(label);
    let mut parts = cleaned.split('x');
    let w: f64 = parts.next()?.trim().parse().ok()?;
    let h: f64 = parts.next()?.trim().parse().ok()?;
    if !w.is_finite() || !h.is_finite() {
        return None;
    }
    Some((w, h))
}

/// Parse a size label into its area in square meters, zero on failure.
///
/// This is the failure policy the whole engine relies on: a label that
/// cannot be parsed contributes no opening area rather than an error.
pub fn parse_size_area(label: &str) -> f64 {
    match parse_size_pair(label) {
        Some((w, h)) => w * h,
        None => 0.0,
    }
}

/// Parse a lenient numeric string (custom opening dimensions), zero on failure.
pub fn parse_dimension(value: &str) -> f64 {
    let parsed: f64 = value.trim().parse().unwrap_or(0.0);
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Parse a "cement:sand" ratio string, falling back to 1:4.
///
/// # Example
///
/// ```rust
/// use takeoff_core::parse::parse_mortar_ratio;
///
/// let ratio = parse_mortar_ratio("1:6");
/// assert_eq!(ratio.sand, 6.0);
/// assert_eq!(parse_mortar_ratio("garbage").sand, 4.0);
/// ```
pub fn parse_mortar_ratio(ratio: &str) -> MortarRatio {
    const FALLBACK: MortarRatio = MortarRatio {
        cement: 1.0,
        sand: 4.0,
    };
    let parts: Vec<f64> = ratio
        .split(':')
        .map(|p| p.trim().parse::<f64>().unwrap_or(f64::NAN))
        .collect();
    if parts.len() != 2 || parts.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return FALLBACK;
    }
    MortarRatio {
        cement: parts[0],
        sand: parts[1],
    }
}

/// Parse a "cement:sand:ballast" ratio string, falling back to 1:2:4.
pub fn parse_concrete_ratio(ratio: &str) -> ConcreteRatio {
    const FALLBACK: ConcreteRatio = ConcreteRatio {
        cement: 1.0,
        sand: 2.0,
        ballast: 4.0,
    };
    let parts: Vec<f64> = ratio
        .split(':')
        .map(|p| p.trim().parse::<f64>().unwrap_or(f64::NAN))
        .collect();
    if parts.len() != 3 || parts.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return FALLBACK;
    }
    ConcreteRatio {
        cement: parts[0],
        sand: parts[1],
        ballast: parts[2],
    }
}

/// Parse a cement:water ratio expressed as a bare number ("0.5").
///
/// Falls back to 0.5 when missing, non-numeric, or non-positive.
pub fn parse_cement_water_ratio(ratio: &str) -> f64 {
    let parsed: f64 = ratio.trim().parse().unwrap_or(f64::NAN);
    if parsed.is_finite() && parsed > 0.0 {
        parsed
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_door_size() {
        assert_eq!(parse_size_pair("0.9 × 2.1 m"), Some((0.9, 2.1)));
        let area = parse_size_area("0.9 × 2.1 m");
        assert!((area - 1.89).abs() < 1e-9);
    }

    #[test]
    fn test_parse_separator_variants() {
        assert_eq!(parse_size_pair("1.2x1.2"), Some((1.2, 1.2)));
        assert_eq!(parse_size_pair("1.2 X 1.2"), Some((1.2, 1.2)));
        assert_eq!(parse_size_pair("2.0 × 1.5 m"), Some((2.0, 1.5)));
    }

    #[test]
    fn test_parse_malformed_sizes() {
        assert_eq!(parse_size_area(""), 0.0);
        assert_eq!(parse_size_area("large"), 0.0);
        assert_eq!(parse_size_area("1.2"), 0.0);
        assert_eq!(parse_size_area("x2.1"), 0.0);
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("2.1"), 2.1);
        assert_eq!(parse_dimension(" 0.9 "), 0.9);
        assert_eq!(parse_dimension("tall"), 0.0);
        assert_eq!(parse_dimension(""), 0.0);
    }

    #[test]
    fn test_mortar_ratio() {
        let r = parse_mortar_ratio("1:4");
        assert_eq!(r.cement, 1.0);
        assert_eq!(r.sand, 4.0);
        assert!((r.cement_fraction() - 0.2).abs() < 1e-12);

        // Fallbacks
        assert_eq!(parse_mortar_ratio("").sand, 4.0);
        assert_eq!(parse_mortar_ratio("1:0").sand, 4.0);
        assert_eq!(parse_mortar_ratio("1:2:3").sand, 4.0);
    }

    #[test]
    fn test_concrete_ratio() {
        let r = parse_concrete_ratio("1:2:4");
        assert_eq!(r.total_parts(), 7.0);

        let fallback = parse_concrete_ratio("1:2");
        assert_eq!(fallback.ballast, 4.0);
    }

    #[test]
    fn test_cement_water_ratio() {
        assert_eq!(parse_cement_water_ratio("0.6"), 0.6);
        assert_eq!(parse_cement_water_ratio("-1"), 0.5);
        assert_eq!(parse_cement_water_ratio("wet"), 0.5);
    }

    #[test]
    fn test_ratio_serialization() {
        let r = parse_mortar_ratio("1:3");
        let json = serde_json::to_string(&r).unwrap();
        let roundtrip: MortarRatio = serde_json::from_str(&json).unwrap();
        assert_eq!(r, roundtrip);
    }
}
