#![forbid(unsafe_code)]

//! Font specification and measured font metrics.
//!
//! A [`FontSpec`] is derived from validated options plus the host zoom
//! factor; it is what the host measures. A [`FontInfo`] is the measurement
//! result the computation pass reads. When the host cannot measure,
//! [`FontInfo::estimate`] supplies a deterministic stand-in so a pass always
//! completes with usable metrics.

use crate::id::OptId;
use crate::registry::ValidatedOptions;

/// Default font stack of the widget.
pub const DEFAULT_FONT_FAMILY: &str =
    "ui-monospace, 'Cascadia Mono', Menlo, Consolas, monospace";

/// Line height below this is treated as a multiplier on font size.
pub const MINIMUM_LINE_HEIGHT: f64 = 8.0;

/// Default line height as a fraction of font size when unset.
pub const GOLDEN_LINE_HEIGHT_RATIO: f64 = 1.5;

/// What to measure: the font the validated options ask for, scaled by zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub weight: String,
    /// Font size in pixels, zoom already applied.
    pub size: f64,
    /// Resolved line height in pixels, zoom already applied.
    pub line_height: f64,
    pub letter_spacing: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            weight: "normal".to_string(),
            size: 14.0,
            line_height: 21.0,
            letter_spacing: 0.0,
        }
    }
}

impl FontSpec {
    /// Resolve the font request from validated options.
    ///
    /// Line-height resolution: `0` means "derive from font size"
    /// ([`GOLDEN_LINE_HEIGHT_RATIO`]); a value below
    /// [`MINIMUM_LINE_HEIGHT`] is a multiplier on the font size; the result
    /// is zoomed and rounded to whole pixels.
    #[must_use]
    pub fn from_validated(validated: &ValidatedOptions, zoom_factor: f64) -> FontSpec {
        let family = validated.read(OptId::FontFamily).expect_str().to_string();
        let weight = validated.read(OptId::FontWeight).expect_str().to_string();
        let base_size = validated.read(OptId::FontSize).expect_float();
        let raw_line_height = validated.read(OptId::LineHeight).expect_float();
        let letter_spacing = validated.read(OptId::LetterSpacing).expect_float();

        let zoom = if zoom_factor.is_finite() && zoom_factor > 0.0 {
            zoom_factor
        } else {
            1.0
        };
        let size = base_size * zoom;
        let line_height = if raw_line_height == 0.0 {
            GOLDEN_LINE_HEIGHT_RATIO * size
        } else if raw_line_height < MINIMUM_LINE_HEIGHT {
            raw_line_height * size
        } else {
            raw_line_height * zoom
        };
        let line_height = line_height.round().max(MINIMUM_LINE_HEIGHT);

        FontSpec {
            family,
            weight,
            size,
            line_height,
            letter_spacing,
        }
    }
}

/// Measured font metrics for one [`FontSpec`] at one pixel ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub family: String,
    pub weight: String,
    pub size: f64,
    pub line_height: f64,
    pub letter_spacing: f64,
    pub is_monospace: bool,
    /// Width of a typical narrow character, the unit of all column math.
    pub typical_halfwidth_character_width: f64,
    pub typical_fullwidth_character_width: f64,
    pub space_width: f64,
    /// Width of the widest decimal digit; sizes the line-number gutter.
    pub max_digit_width: f64,
    /// False when these metrics are an estimate rather than a measurement.
    pub is_trusted: bool,
}

impl FontInfo {
    /// Deterministic stand-in metrics for a spec the host could not measure.
    ///
    /// Proportions follow a typical monospace face: narrow glyphs at 0.6 em,
    /// wide glyphs at one em.
    #[must_use]
    pub fn estimate(spec: &FontSpec) -> FontInfo {
        let halfwidth = (spec.size * 0.6).max(1.0) + spec.letter_spacing;
        FontInfo {
            family: spec.family.clone(),
            weight: spec.weight.clone(),
            size: spec.size,
            line_height: spec.line_height,
            letter_spacing: spec.letter_spacing,
            is_monospace: true,
            typical_halfwidth_character_width: halfwidth,
            typical_fullwidth_character_width: halfwidth * 2.0,
            space_width: halfwidth,
            max_digit_width: halfwidth,
            is_trusted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue;
    use crate::raw::RawOptions;
    use crate::registry::validate;
    use serde_json::json;

    fn spec_for(raw: serde_json::Value, zoom: f64) -> FontSpec {
        let registry = catalogue::builtin_registry();
        let validated = validate(&registry, &RawOptions::from_value(raw));
        FontSpec::from_validated(&validated, zoom)
    }

    #[test]
    fn zero_line_height_derives_from_font_size() {
        let spec = spec_for(json!({ "fontSize": 14 }), 1.0);
        assert_eq!(spec.size, 14.0);
        assert_eq!(spec.line_height, 21.0);
    }

    #[test]
    fn small_line_height_is_a_multiplier() {
        let spec = spec_for(json!({ "fontSize": 10, "lineHeight": 2 }), 1.0);
        assert_eq!(spec.line_height, 20.0);
    }

    #[test]
    fn zoom_scales_size_and_line_height() {
        let spec = spec_for(json!({ "fontSize": 14, "lineHeight": 20 }), 1.5);
        assert_eq!(spec.size, 21.0);
        assert_eq!(spec.line_height, 30.0);
    }

    #[test]
    fn nonsensical_zoom_is_ignored() {
        let spec = spec_for(json!({ "fontSize": 14 }), 0.0);
        assert_eq!(spec.size, 14.0);
    }

    #[test]
    fn estimate_is_deterministic() {
        let spec = spec_for(json!({}), 1.0);
        assert_eq!(FontInfo::estimate(&spec), FontInfo::estimate(&spec));
        assert!(!FontInfo::estimate(&spec).is_trusted);
    }
}
