#![forbid(unsafe_code)]

//! Per-pass environment snapshot.
//!
//! The controller assembles one [`Environment`] per computation pass from
//! host-reported state and viewport statistics. It is immutable for the
//! duration of the pass, with one deliberate exception: [`ComputeMemory`],
//! the cross-pass hysteresis side-table, is shared mutable state behind
//! `Rc<RefCell<..>>` (the engine is single-threaded by contract). Only the
//! layout computer touches it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::font::FontInfo;
use crate::layout::MinimapLayoutInput;
use crate::value::{AccessibilitySupport, InputMode};

/// Everything a computation pass may read from outside the options.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Container width in pixels.
    pub outer_width: f64,
    /// Container height in pixels, reserved chrome already subtracted.
    pub outer_height: f64,
    pub pixel_ratio: f64,
    pub zoom_factor: f64,
    pub font_info: FontInfo,
    pub accessibility_support: AccessibilitySupport,
    pub tab_focus_mode: bool,
    pub input_mode: InputMode,
    pub extra_class_name: String,
    pub view_line_count: u32,
    /// Digit count of the largest line number in the model.
    pub line_numbers_digit_count: u32,
    pub is_dominated_by_long_lines: bool,
    pub glyph_margin_decoration_lane_count: u32,
    /// Cross-pass hysteresis table, owned by the controller.
    pub memory: Rc<RefCell<ComputeMemory>>,
}

/// State some options carry across passes to avoid oscillation.
///
/// The minimap `fit`/`fill` layout feeds back into viewport width, which
/// feeds back into view line count, which feeds back into minimap layout.
/// Once a pass shrinks the minimap scale while viewport wrapping is active,
/// the chosen scale and the width it was chosen at are pinned here so the
/// next pass can stick with them instead of flip-flopping.
#[derive(Debug, Clone, Default)]
pub struct ComputeMemory {
    pub stable_minimap_layout_input: Option<MinimapLayoutInput>,
    pub stable_fit_max_minimap_scale: u32,
    pub stable_fit_remaining_width: f64,
}

impl ComputeMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
