#![forbid(unsafe_code)]

//! Descriptors for structured and environment-coupled options.

use serde_json::Value;

use crate::env::Environment;
use crate::id::OptId;
use crate::registry::{ComputedSoFar, OptionDescriptor};
use crate::validation::{boolean_or, clamped_float, clamped_int, string_set};
use crate::value::{
    AccessibilitySupport, HoverSettings, LineNumbersStyle, MinimapSettings, MinimapSide,
    MinimapSize, MinimapSlider, OptionValue, PaddingSettings, ParameterHintsSettings,
    ScrollbarSettings, ScrollbarVisibility, SuggestSettings, WordWrap,
};

fn field<'a>(input: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    input.and_then(Value::as_object).and_then(|map| map.get(name))
}

/// `accessibilitySupport`: the user can force screen-reader mode on or off;
/// `auto` defers to what the host reports.
pub(crate) struct AccessibilityPolicy;

impl OptionDescriptor for AccessibilityPolicy {
    fn id(&self) -> OptId {
        OptId::AccessibilitySupport
    }
    fn name(&self) -> Option<&'static str> {
        Some("accessibilitySupport")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Str(string_set(input, "auto", &["auto", "on", "off"], &[]))
    }
    fn compute(
        &self,
        env: &Environment,
        _computed: &ComputedSoFar<'_>,
        value: &OptionValue,
    ) -> OptionValue {
        let resolved = match value.expect_str() {
            "on" => AccessibilitySupport::Enabled,
            "off" => AccessibilitySupport::Disabled,
            _ => env.accessibility_support,
        };
        OptionValue::AccessibilitySupport(resolved)
    }
}

/// `fontSize`: validated in points, computed from the measured font so zoom
/// is reflected.
pub(crate) struct FontSizeOption;

pub(crate) const DEFAULT_FONT_SIZE: f64 = 14.0;

impl OptionDescriptor for FontSizeOption {
    fn id(&self) -> OptId {
        OptId::FontSize
    }
    fn name(&self) -> Option<&'static str> {
        Some("fontSize")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Float(clamped_float(input, DEFAULT_FONT_SIZE, 6.0, 100.0))
    }
    fn compute(
        &self,
        env: &Environment,
        _computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        OptionValue::Float(env.font_info.size)
    }
}

/// `fontWeight`: keyword or a numeric weight, normalized to a string.
pub(crate) struct FontWeightOption;

impl OptionDescriptor for FontWeightOption {
    fn id(&self) -> OptId {
        OptId::FontWeight
    }
    fn name(&self) -> Option<&'static str> {
        Some("fontWeight")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        let normalized = match input {
            Some(Value::Number(_)) => clamped_int(input, 400, 1, 1000).to_string(),
            Some(Value::String(s)) if s == "normal" || s == "bold" => s.clone(),
            Some(Value::String(s)) if s.trim().parse::<f64>().is_ok() => {
                clamped_int(input, 400, 1, 1000).to_string()
            }
            _ => "normal".to_string(),
        };
        OptionValue::Str(normalized)
    }
}

/// `lineHeight`: validated as the user wrote it (0 = derive, small values
/// are multipliers), computed from the resolved font.
pub(crate) struct LineHeightOption;

impl OptionDescriptor for LineHeightOption {
    fn id(&self) -> OptId {
        OptId::LineHeight
    }
    fn name(&self) -> Option<&'static str> {
        Some("lineHeight")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Float(clamped_float(input, 0.0, 0.0, 150.0))
    }
    fn compute(
        &self,
        env: &Environment,
        _computed: &ComputedSoFar<'_>,
        _value: &OptionValue,
    ) -> OptionValue {
        OptionValue::Float(env.font_info.line_height)
    }
}

pub(crate) struct HoverOption;

impl OptionDescriptor for HoverOption {
    fn id(&self) -> OptId {
        OptId::Hover
    }
    fn name(&self) -> Option<&'static str> {
        Some("hover")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Hover(HoverSettings {
            enabled: string_set(
                field(input, "enabled"),
                "on",
                &["on", "off", "onKeyboardModifier"],
                &[],
            ),
            delay: clamped_int(field(input, "delay"), 300, 0, 10_000),
            sticky: boolean_or(field(input, "sticky"), true),
        })
    }
}

pub(crate) struct LineNumbersOption;

impl OptionDescriptor for LineNumbersOption {
    fn id(&self) -> OptId {
        OptId::LineNumbers
    }
    fn name(&self) -> Option<&'static str> {
        Some("lineNumbers")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        let style = match string_set(input, "on", &["on", "off", "relative", "interval"], &[])
            .as_str()
        {
            "off" => LineNumbersStyle::Off,
            "relative" => LineNumbersStyle::Relative,
            "interval" => LineNumbersStyle::Interval,
            _ => LineNumbersStyle::On,
        };
        OptionValue::LineNumbers(style)
    }
}

pub(crate) struct MinimapOption;

impl OptionDescriptor for MinimapOption {
    fn id(&self) -> OptId {
        OptId::Minimap
    }
    fn name(&self) -> Option<&'static str> {
        Some("minimap")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        let side = match string_set(field(input, "side"), "right", &["left", "right"], &[]).as_str()
        {
            "left" => MinimapSide::Left,
            _ => MinimapSide::Right,
        };
        let size = match string_set(
            field(input, "size"),
            "proportional",
            &["proportional", "fill", "fit"],
            &[],
        )
        .as_str()
        {
            "fill" => MinimapSize::Fill,
            "fit" => MinimapSize::Fit,
            _ => MinimapSize::Proportional,
        };
        let show_slider = match string_set(
            field(input, "showSlider"),
            "mouseover",
            &["always", "mouseover"],
            &[],
        )
        .as_str()
        {
            "always" => MinimapSlider::Always,
            _ => MinimapSlider::Mouseover,
        };
        OptionValue::Minimap(MinimapSettings {
            enabled: boolean_or(field(input, "enabled"), true),
            side,
            size,
            show_slider,
            scale: clamped_int(field(input, "scale"), 1, 1, 3) as u32,
            render_characters: boolean_or(field(input, "renderCharacters"), true),
            max_column: clamped_int(field(input, "maxColumn"), 120, 1, 10_000) as u32,
        })
    }
}

pub(crate) struct PaddingOption;

impl OptionDescriptor for PaddingOption {
    fn id(&self) -> OptId {
        OptId::Padding
    }
    fn name(&self) -> Option<&'static str> {
        Some("padding")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Padding(PaddingSettings {
            top: clamped_int(field(input, "top"), 0, 0, 1000),
            bottom: clamped_int(field(input, "bottom"), 0, 0, 1000),
        })
    }
}

pub(crate) struct ParameterHintsOption;

impl OptionDescriptor for ParameterHintsOption {
    fn id(&self) -> OptId {
        OptId::ParameterHints
    }
    fn name(&self) -> Option<&'static str> {
        Some("parameterHints")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::ParameterHints(ParameterHintsSettings {
            enabled: boolean_or(field(input, "enabled"), true),
            cycle: boolean_or(field(input, "cycle"), false),
        })
    }
}

fn scrollbar_visibility(input: Option<&Value>) -> ScrollbarVisibility {
    match string_set(input, "auto", &["auto", "visible", "hidden"], &[]).as_str() {
        "visible" => ScrollbarVisibility::Visible,
        "hidden" => ScrollbarVisibility::Hidden,
        _ => ScrollbarVisibility::Auto,
    }
}

pub(crate) struct ScrollbarOption;

impl OptionDescriptor for ScrollbarOption {
    fn id(&self) -> OptId {
        OptId::Scrollbar
    }
    fn name(&self) -> Option<&'static str> {
        Some("scrollbar")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Scrollbar(ScrollbarSettings {
            vertical: scrollbar_visibility(field(input, "vertical")),
            horizontal: scrollbar_visibility(field(input, "horizontal")),
            vertical_scrollbar_size: clamped_int(
                field(input, "verticalScrollbarSize"),
                14,
                0,
                1000,
            ),
            horizontal_scrollbar_size: clamped_int(
                field(input, "horizontalScrollbarSize"),
                12,
                0,
                1000,
            ),
            arrow_size: clamped_int(field(input, "arrowSize"), 11, 0, 1000),
            vertical_has_arrows: boolean_or(field(input, "verticalHasArrows"), false),
            horizontal_has_arrows: boolean_or(field(input, "horizontalHasArrows"), false),
            use_shadows: boolean_or(field(input, "useShadows"), true),
        })
    }
}

pub(crate) struct SuggestOption;

impl OptionDescriptor for SuggestOption {
    fn id(&self) -> OptId {
        OptId::Suggest
    }
    fn name(&self) -> Option<&'static str> {
        Some("suggest")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        OptionValue::Suggest(SuggestSettings {
            show_keywords: boolean_or(field(input, "showKeywords"), true),
            show_snippets: boolean_or(field(input, "showSnippets"), true),
            show_words: boolean_or(field(input, "showWords"), true),
            insert_mode: string_set(
                field(input, "insertMode"),
                "insert",
                &["insert", "replace"],
                &[],
            ),
            filter_graceful: boolean_or(field(input, "filterGraceful"), true),
        })
    }
}

pub(crate) struct WordWrapOption;

impl OptionDescriptor for WordWrapOption {
    fn id(&self) -> OptId {
        OptId::WordWrap
    }
    fn name(&self) -> Option<&'static str> {
        Some("wordWrap")
    }
    fn validate(&self, input: Option<&Value>) -> OptionValue {
        let wrap = string_set(
            input,
            "off",
            &["off", "on", "wordWrapColumn", "bounded"],
            &[],
        );
        OptionValue::WordWrap(WordWrap::from_setting(&wrap).unwrap_or(WordWrap::Off))
    }
}
