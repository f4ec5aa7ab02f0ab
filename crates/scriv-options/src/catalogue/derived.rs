#![forbid(unsafe_code)]

//! Descriptors with no textual surface.
//!
//! These options cannot be set; they are derived from the environment and
//! from earlier options on every pass. Their validators receive `None` and
//! return placeholder defaults that `compute` always replaces.

use serde_json::Value;

use crate::env::Environment;
use crate::font::{FontInfo, FontSpec};
use crate::id::OptId;
use crate::layout::{self, LayoutInfo, LayoutInput, WrappingInfo};
use crate::registry::{ComputedSoFar, OptionDescriptor};
use crate::value::{AccessibilitySupport, InputMode, LineNumbersStyle, OptionValue};

/// CSS-style class list the host applies to the widget root.
pub(crate) struct EditorClassNameOption;

impl OptionDescriptor for EditorClassNameOption {
    fn id(&self) -> OptId {
        OptId::EditorClassName
    }
    fn name(&self) -> Option<&'static str> {
        None
    }
    fn validate(&self, _input: Option<&Value>) -> OptionValue {
        OptionValue::Str("scriv-widget".to_string())
    }
    fn compute(
        &self,
        env: &Environment,
        computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        let mut class_name = String::from("scriv-widget");
        if !env.extra_class_name.is_empty() {
            class_name.push(' ');
            class_name.push_str(&env.extra_class_name);
        }
        if computed.get(OptId::AccessibilitySupport).expect_accessibility()
            == AccessibilitySupport::Enabled
        {
            class_name.push_str(" accessible");
        }
        if env.input_mode == InputMode::Overtype {
            class_name.push_str(" overtype");
        }
        OptionValue::Str(class_name)
    }
}

pub(crate) struct PixelRatioOption;

impl OptionDescriptor for PixelRatioOption {
    fn id(&self) -> OptId {
        OptId::PixelRatio
    }
    fn name(&self) -> Option<&'static str> {
        None
    }
    fn validate(&self, _input: Option<&Value>) -> OptionValue {
        OptionValue::Float(1.0)
    }
    fn compute(
        &self,
        env: &Environment,
        _computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        OptionValue::Float(env.pixel_ratio)
    }
}

pub(crate) struct TabFocusModeOption;

impl OptionDescriptor for TabFocusModeOption {
    fn id(&self) -> OptId {
        OptId::TabFocusMode
    }
    fn name(&self) -> Option<&'static str> {
        None
    }
    fn validate(&self, _input: Option<&Value>) -> OptionValue {
        OptionValue::Bool(false)
    }
    fn compute(
        &self,
        env: &Environment,
        _computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        OptionValue::Bool(env.tab_focus_mode)
    }
}

pub(crate) struct InputModeOption;

impl OptionDescriptor for InputModeOption {
    fn id(&self) -> OptId {
        OptId::InputMode
    }
    fn name(&self) -> Option<&'static str> {
        None
    }
    fn validate(&self, _input: Option<&Value>) -> OptionValue {
        OptionValue::InputMode(InputMode::Insert)
    }
    fn compute(
        &self,
        env: &Environment,
        _computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        OptionValue::InputMode(env.input_mode)
    }
}

pub(crate) struct FontInfoOption;

impl OptionDescriptor for FontInfoOption {
    fn id(&self) -> OptId {
        OptId::FontInfo
    }
    fn name(&self) -> Option<&'static str> {
        None
    }
    fn validate(&self, _input: Option<&Value>) -> OptionValue {
        OptionValue::FontInfo(FontInfo::estimate(&FontSpec::default()))
    }
    fn compute(
        &self,
        env: &Environment,
        _computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        OptionValue::FontInfo(env.font_info.clone())
    }
}

/// The layout computer; see [`crate::layout`].
pub(crate) struct LayoutInfoOption;

impl OptionDescriptor for LayoutInfoOption {
    fn id(&self) -> OptId {
        OptId::LayoutInfo
    }
    fn name(&self) -> Option<&'static str> {
        None
    }
    fn validate(&self, _input: Option<&Value>) -> OptionValue {
        OptionValue::Layout(LayoutInfo::default())
    }
    fn compute(
        &self,
        env: &Environment,
        computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        let input = LayoutInput {
            outer_width: env.outer_width,
            outer_height: env.outer_height,
            line_height: env.font_info.line_height,
            line_numbers_digit_count: env.line_numbers_digit_count,
            typical_halfwidth_character_width: env.font_info.typical_halfwidth_character_width,
            max_digit_width: env.font_info.max_digit_width,
            pixel_ratio: env.pixel_ratio,
            view_line_count: env.view_line_count,
            glyph_margin_decoration_lane_count: env.glyph_margin_decoration_lane_count,
            is_dominated_by_long_lines: env.is_dominated_by_long_lines,
            accessibility_support: computed
                .get(OptId::AccessibilitySupport)
                .expect_accessibility(),
            word_wrap: computed.get(OptId::WordWrap).expect_word_wrap(),
            word_wrap_column: computed.get(OptId::WordWrapColumn).expect_int(),
            word_wrap_override1: computed.get(OptId::WordWrapOverride1).expect_str(),
            word_wrap_override2: computed.get(OptId::WordWrapOverride2).expect_str(),
            glyph_margin: computed.get(OptId::GlyphMargin).expect_bool(),
            line_numbers_visible: computed.get(OptId::LineNumbers).expect_line_numbers()
                != LineNumbersStyle::Off,
            line_numbers_min_chars: computed.get(OptId::LineNumbersMinChars).expect_int(),
            scroll_beyond_last_line: computed.get(OptId::ScrollBeyondLastLine).expect_bool(),
            padding: computed.get(OptId::Padding).expect_padding(),
            minimap: computed.get(OptId::Minimap).expect_minimap(),
            scrollbar: computed.get(OptId::Scrollbar).expect_scrollbar(),
            folding: computed.get(OptId::Folding).expect_bool(),
            show_folding_decoration: computed.get(OptId::ShowFoldingControls).expect_str()
                != "never",
            line_decorations_width: computed.get(OptId::LineDecorationsWidth).expect_float(),
        };
        let mut memory = env.memory.borrow_mut();
        OptionValue::Layout(layout::compute_layout(&input, &mut memory))
    }
}

/// The wrapping summary, read straight off the layout result.
pub(crate) struct WrappingInfoOption;

impl OptionDescriptor for WrappingInfoOption {
    fn id(&self) -> OptId {
        OptId::WrappingInfo
    }
    fn name(&self) -> Option<&'static str> {
        None
    }
    fn validate(&self, _input: Option<&Value>) -> OptionValue {
        OptionValue::Wrapping(WrappingInfo::default())
    }
    fn compute(
        &self,
        _env: &Environment,
        computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        let layout = computed.get(OptId::LayoutInfo).expect_layout();
        OptionValue::Wrapping(WrappingInfo {
            is_word_wrap_minified: layout.is_word_wrap_minified,
            is_viewport_wrapping: layout.is_viewport_wrapping,
            wrapping_column: layout.wrapping_column,
        })
    }
}
