#![forbid(unsafe_code)]

//! Typed option values.
//!
//! [`OptionValue`] is the closed vocabulary every descriptor speaks: the
//! validator produces one per option, the computation engine consumes and
//! produces them, and the change detector compares them. The derived
//! `PartialEq` is intentionally the deep structural equality the change
//! detector needs — descriptor outputs are plain trees, never
//! self-referential, so no cycle guard exists anywhere.
//!
//! # Failure Modes
//!
//! The `expect_*` accessors panic on a type-confused slot. That is a wiring
//! defect (a descriptor registered under the wrong id, or a read of the wrong
//! id), not an input error, and it must fail fast rather than let a stale or
//! defaulted value corrupt every option computed after it.

use crate::font::FontInfo;
use crate::layout::{LayoutInfo, WrappingInfo};

/// Host-reported (and resolved) screen-reader support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessibilitySupport {
    Unknown,
    Disabled,
    Enabled,
}

/// Text input mode of the host widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Insert,
    Overtype,
}

/// Resolved word-wrap strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordWrap {
    Off,
    On,
    WordWrapColumn,
    Bounded,
}

impl WordWrap {
    /// Parse the raw-surface spelling of a wrap mode.
    #[must_use]
    pub fn from_setting(value: &str) -> Option<WordWrap> {
        match value {
            "off" => Some(WordWrap::Off),
            "on" => Some(WordWrap::On),
            "wordWrapColumn" => Some(WordWrap::WordWrapColumn),
            "bounded" => Some(WordWrap::Bounded),
            _ => None,
        }
    }
}

/// Line-number rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineNumbersStyle {
    Off,
    On,
    Relative,
    Interval,
}

/// Which side of the editor the minimap occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimapSide {
    Left,
    Right,
}

/// Minimap sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimapSize {
    Proportional,
    Fill,
    Fit,
}

/// When the minimap slider is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimapSlider {
    Always,
    Mouseover,
}

/// Validated `minimap` option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapSettings {
    pub enabled: bool,
    pub side: MinimapSide,
    pub size: MinimapSize,
    pub show_slider: MinimapSlider,
    pub scale: u32,
    pub render_characters: bool,
    pub max_column: u32,
}

/// Validated `hover` option.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverSettings {
    /// One of `on`, `off`, `onKeyboardModifier`.
    pub enabled: String,
    pub delay: i64,
    pub sticky: bool,
}

/// Validated `padding` option, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddingSettings {
    pub top: i64,
    pub bottom: i64,
}

/// Validated `parameterHints` option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterHintsSettings {
    pub enabled: bool,
    pub cycle: bool,
}

/// Scrollbar visibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollbarVisibility {
    Auto,
    Visible,
    Hidden,
}

/// Validated `scrollbar` option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarSettings {
    pub vertical: ScrollbarVisibility,
    pub horizontal: ScrollbarVisibility,
    pub vertical_scrollbar_size: i64,
    pub horizontal_scrollbar_size: i64,
    pub arrow_size: i64,
    pub vertical_has_arrows: bool,
    pub horizontal_has_arrows: bool,
    pub use_shadows: bool,
}

/// Validated `suggest` option.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestSettings {
    pub show_keywords: bool,
    pub show_snippets: bool,
    pub show_words: bool,
    /// One of `insert`, `replace`.
    pub insert_mode: String,
    pub filter_graceful: bool,
}

/// One resolved option value.
///
/// Plain string-set options (cursor blinking, match brackets, …) stay as
/// validated strings, exactly as the raw surface spells them; structured
/// options get a dedicated variant.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    AccessibilitySupport(AccessibilitySupport),
    InputMode(InputMode),
    WordWrap(WordWrap),
    LineNumbers(LineNumbersStyle),
    Minimap(MinimapSettings),
    Hover(HoverSettings),
    Padding(PaddingSettings),
    ParameterHints(ParameterHintsSettings),
    Scrollbar(ScrollbarSettings),
    Suggest(SuggestSettings),
    FontInfo(FontInfo),
    Layout(LayoutInfo),
    Wrapping(WrappingInfo),
}

macro_rules! expect_variant {
    ($fn_name:ident, $variant:ident, $ty:ty, copied) => {
        #[doc = concat!(
            "Read this value as `", stringify!($variant),
            "`.\n\n# Panics\n\nPanics on any other variant: that is a registry wiring defect."
        )]
        #[must_use]
        pub fn $fn_name(&self) -> $ty {
            match self {
                OptionValue::$variant(v) => *v,
                other => panic!(
                    concat!("option value is not ", stringify!($variant), ": {:?}"),
                    other
                ),
            }
        }
    };
    ($fn_name:ident, $variant:ident, $ty:ty, borrowed) => {
        #[doc = concat!(
            "Read this value as `", stringify!($variant),
            "`.\n\n# Panics\n\nPanics on any other variant: that is a registry wiring defect."
        )]
        #[must_use]
        pub fn $fn_name(&self) -> &$ty {
            match self {
                OptionValue::$variant(v) => v,
                other => panic!(
                    concat!("option value is not ", stringify!($variant), ": {:?}"),
                    other
                ),
            }
        }
    };
}

impl OptionValue {
    expect_variant!(expect_bool, Bool, bool, copied);
    expect_variant!(expect_int, Int, i64, copied);
    expect_variant!(expect_float, Float, f64, copied);
    expect_variant!(expect_str, Str, str, borrowed);
    expect_variant!(
        expect_accessibility,
        AccessibilitySupport,
        AccessibilitySupport,
        copied
    );
    expect_variant!(expect_input_mode, InputMode, InputMode, copied);
    expect_variant!(expect_word_wrap, WordWrap, WordWrap, copied);
    expect_variant!(expect_line_numbers, LineNumbers, LineNumbersStyle, copied);
    expect_variant!(expect_minimap, Minimap, MinimapSettings, copied);
    expect_variant!(expect_hover, Hover, HoverSettings, borrowed);
    expect_variant!(expect_padding, Padding, PaddingSettings, copied);
    expect_variant!(
        expect_parameter_hints,
        ParameterHints,
        ParameterHintsSettings,
        copied
    );
    expect_variant!(expect_scrollbar, Scrollbar, ScrollbarSettings, copied);
    expect_variant!(expect_suggest, Suggest, SuggestSettings, borrowed);
    expect_variant!(expect_font_info, FontInfo, FontInfo, borrowed);
    expect_variant!(expect_layout, Layout, LayoutInfo, borrowed);
    expect_variant!(expect_wrapping, Wrapping, WrappingInfo, copied);
}
