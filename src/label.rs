//! Concentration labels decoded from sample identifiers.
//!
//! Instrument exports are named after the standard they were measured in, e.g.
//! `10_mu_M.csv` for a 10 μM solution or `500_n_M.csv` for 500 nM. The identifier is
//! split into two regions by a small scanner:
//!
//! ```text
//! 12.5_mu_M
//! ^^^^              numeric prefix: digits and at most one decimal point
//!     ^^^^^         unit region: everything after the prefix
//! ```
//!
//! The unit region is trimmed of the marker's delimiter characters and the result is
//! joined back onto the prefix with the unit symbol, giving the display label `12.5μM`.
//! Identifiers without a recognized marker are passed through unchanged and carry no
//! magnitude.
//!
//! ## Recognized markers
//!
//! | Marker | Unit | Label | Factor to μM |
//! |--------|------|-------|--------------|
//! | `_mu_` | micromolar | `μM` | 1 |
//! | `_n_`  | nanomolar  | `nM` | 1e-3 |
//! | `_m_`  | millimolar | `mM` | 1e3 |
//! | `_M`   | molar      | `M`  | 1e6 |
//!
//! Markers are tested in table order, so `10_mu_M` is never read as molar.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit scale of a concentration label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationUnit {
    /// nmol/L
    Nanomolar,
    /// μmol/L, the reporting unit
    Micromolar,
    /// mmol/L
    Millimolar,
    /// mol/L
    Molar,
}

impl ConcentrationUnit {
    /// Units in the order their markers are matched against an identifier.
    pub const DETECTION_ORDER: [ConcentrationUnit; 4] = [
        ConcentrationUnit::Micromolar,
        ConcentrationUnit::Nanomolar,
        ConcentrationUnit::Millimolar,
        ConcentrationUnit::Molar,
    ];

    /// Filename marker that selects this unit.
    pub fn marker(&self) -> &'static str {
        match self {
            ConcentrationUnit::Micromolar => "_mu_",
            ConcentrationUnit::Nanomolar => "_n_",
            ConcentrationUnit::Millimolar => "_m_",
            ConcentrationUnit::Molar => "_M",
        }
    }

    /// SI prefix symbol inserted into the display label.
    pub fn prefix_symbol(&self) -> &'static str {
        match self {
            ConcentrationUnit::Micromolar => "μ",
            ConcentrationUnit::Nanomolar => "n",
            ConcentrationUnit::Millimolar => "m",
            ConcentrationUnit::Molar => "",
        }
    }

    /// Full unit symbol as it appears at the end of a normalized label.
    pub fn symbol(&self) -> &'static str {
        match self {
            ConcentrationUnit::Micromolar => "μM",
            ConcentrationUnit::Nanomolar => "nM",
            ConcentrationUnit::Millimolar => "mM",
            ConcentrationUnit::Molar => "M",
        }
    }

    /// Multiply a magnitude in this unit by this factor to get micromolar.
    pub fn micromolar_factor(&self) -> f64 {
        match self {
            ConcentrationUnit::Nanomolar => 1e-3,
            ConcentrationUnit::Micromolar => 1.0,
            ConcentrationUnit::Millimolar => 1e3,
            ConcentrationUnit::Molar => 1e6,
        }
    }

    /// Characters trimmed from both ends of the unit region.
    fn delimiters(&self) -> &'static [char] {
        match self {
            ConcentrationUnit::Micromolar => &['_', 'm', 'u'],
            ConcentrationUnit::Nanomolar => &['_', 'n'],
            ConcentrationUnit::Millimolar => &['_', 'm'],
            // 'M' is the unit itself and must survive the trim
            ConcentrationUnit::Molar => &['_'],
        }
    }

    fn detect(identifier: &str) -> Option<Self> {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|unit| identifier.contains(unit.marker()))
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Copy)]
enum ScanState {
    Integer,
    Fraction,
}

/// Split an identifier into its numeric prefix and the unit region.
///
/// The prefix holds digits and at most one decimal point; it ends at the first
/// character that cannot extend it. Either side may be empty.
pub fn split_numeric_prefix(identifier: &str) -> (&str, &str) {
    let mut state = ScanState::Integer;
    for (i, c) in identifier.char_indices() {
        state = match (state, c) {
            (_, '0'..='9') => state,
            (ScanState::Integer, '.') => ScanState::Fraction,
            _ => return identifier.split_at(i),
        };
    }
    (identifier, "")
}

/// Concentration decoded from a sample identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationLabel {
    /// Normalized display label, or the identifier itself when no unit was found
    pub label: String,

    /// Unit selected by the identifier's marker
    pub unit: Option<ConcentrationUnit>,

    /// Magnitude in `unit`
    pub value: Option<f64>,

    /// Magnitude normalized to micromolar
    pub micromolar: Option<f64>,
}

impl ConcentrationLabel {
    /// Decode a concentration label from a sample identifier.
    ///
    /// Never fails: an identifier that does not follow the naming grammar yields a
    /// label equal to the identifier and no magnitude.
    pub fn parse(identifier: &str) -> Self {
        let Some(unit) = ConcentrationUnit::detect(identifier) else {
            return Self::undefined(identifier);
        };

        let (prefix, region) = split_numeric_prefix(identifier);
        let remainder = region.trim_matches(unit.delimiters());
        let label = format!("{}{}{}", prefix, unit.prefix_symbol(), remainder);

        let value = label
            .strip_suffix(unit.symbol())
            .and_then(|number| number.parse::<f64>().ok())
            .filter(|v| v.is_finite());

        Self {
            micromolar: value.map(|v| v * unit.micromolar_factor()),
            label,
            unit: Some(unit),
            value,
        }
    }

    fn undefined(identifier: &str) -> Self {
        Self {
            label: identifier.to_string(),
            unit: None,
            value: None,
            micromolar: None,
        }
    }

    /// Whether the label carries a usable concentration.
    pub fn is_defined(&self) -> bool {
        self.micromolar.is_some()
    }
}

impl fmt::Display for ConcentrationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micromolar_label() {
        let label = ConcentrationLabel::parse("10_mu_M");
        assert_eq!(label.label, "10μM");
        assert_eq!(label.unit, Some(ConcentrationUnit::Micromolar));
        assert_eq!(label.value, Some(10.0));
        assert_eq!(label.micromolar, Some(10.0));
    }

    #[test]
    fn test_decimal_micromolar_label() {
        let label = ConcentrationLabel::parse("2.5_mu_M");
        assert_eq!(label.label, "2.5μM");
        assert_eq!(label.micromolar, Some(2.5));
    }

    #[test]
    fn test_nanomolar_label() {
        let label = ConcentrationLabel::parse("500_n_M");
        assert_eq!(label.label, "500nM");
        assert_eq!(label.value, Some(500.0));
        let um = label.micromolar.unwrap();
        assert!((um - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_millimolar_and_molar_labels() {
        let milli = ConcentrationLabel::parse("2_m_M");
        assert_eq!(milli.label, "2mM");
        assert_eq!(milli.micromolar, Some(2000.0));

        let molar = ConcentrationLabel::parse("1_M");
        assert_eq!(molar.label, "1M");
        assert_eq!(molar.unit, Some(ConcentrationUnit::Molar));
        assert_eq!(molar.micromolar, Some(1e6));
    }

    #[test]
    fn test_unrecognized_identifier_passes_through() {
        let label = ConcentrationLabel::parse("blank_run");
        assert_eq!(label.label, "blank_run");
        assert_eq!(label.unit, None);
        assert!(!label.is_defined());
    }

    #[test]
    fn test_trailing_suffix_leaves_magnitude_undefined() {
        // The suffix survives the trim, so the label no longer ends in the unit
        let label = ConcentrationLabel::parse("10_mu_M_rep2");
        assert_eq!(label.label, "10μM_rep2");
        assert_eq!(label.unit, Some(ConcentrationUnit::Micromolar));
        assert_eq!(label.micromolar, None);
    }

    #[test]
    fn test_no_leading_digits() {
        let label = ConcentrationLabel::parse("_mu_M");
        assert_eq!(label.label, "μM");
        assert_eq!(label.micromolar, None);
    }

    #[test]
    fn test_leading_zero_and_trailing_dot() {
        assert_eq!(ConcentrationLabel::parse("05_mu_M").micromolar, Some(5.0));
        let dotted = ConcentrationLabel::parse("10._mu_M");
        assert_eq!(dotted.label, "10.μM");
        assert_eq!(dotted.micromolar, Some(10.0));
    }

    #[test]
    fn test_split_numeric_prefix() {
        assert_eq!(split_numeric_prefix("12.5_mu_M"), ("12.5", "_mu_M"));
        assert_eq!(split_numeric_prefix("1.2.3_n_M"), ("1.2", ".3_n_M"));
        assert_eq!(split_numeric_prefix("abc"), ("", "abc"));
        assert_eq!(split_numeric_prefix("42"), ("42", ""));
        assert_eq!(split_numeric_prefix(""), ("", ""));
    }

    #[test]
    fn test_second_decimal_point_ends_prefix() {
        let label = ConcentrationLabel::parse("1.2.3_n_M");
        assert_eq!(label.micromolar, None);
    }
}
