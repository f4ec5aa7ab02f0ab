#![forbid(unsafe_code)]

//! The built-in option catalogue.
//!
//! Descriptors are registered in id order; that order is the dependency
//! order the computation engine honors, so the environment-derived options
//! (class name, pixel ratio, font info, layout, wrapping) sit at the end,
//! after everything they read.

mod derived;
mod simple;
mod structured;

use std::sync::{Arc, OnceLock};

use crate::font::DEFAULT_FONT_FAMILY;
use crate::id::OptId;
use crate::registry::{OptionDescriptor, OptionRegistry};

use self::derived::{
    EditorClassNameOption, FontInfoOption, InputModeOption, LayoutInfoOption, PixelRatioOption,
    TabFocusModeOption, WrappingInfoOption,
};
use self::simple::{BoolOption, FloatOption, IntOption, StringOption, StringSetOption};
use self::structured::{
    AccessibilityPolicy, FontSizeOption, FontWeightOption, HoverOption, LineHeightOption,
    LineNumbersOption, MinimapOption, PaddingOption, ParameterHintsOption, ScrollbarOption,
    SuggestOption, WordWrapOption,
};

const AUTO_CLOSING_VALUES: &[&str] = &["always", "languageDefined", "beforeWhitespace", "never"];

/// Build a fresh registry with every built-in descriptor.
///
/// # Panics
///
/// Panics if the catalogue itself is mis-registered; that is a build-time
/// defect this function's tests exist to catch.
#[must_use]
pub fn builtin_registry() -> OptionRegistry {
    let descriptors: Vec<Box<dyn OptionDescriptor>> = vec![
        Box::new(AccessibilityPolicy),
        Box::new(StringSetOption {
            id: OptId::AutoClosingBrackets,
            name: "autoClosingBrackets",
            default: "languageDefined",
            allowed: AUTO_CLOSING_VALUES,
        }),
        Box::new(StringSetOption {
            id: OptId::AutoClosingQuotes,
            name: "autoClosingQuotes",
            default: "languageDefined",
            allowed: AUTO_CLOSING_VALUES,
        }),
        Box::new(StringSetOption {
            id: OptId::AutoSurround,
            name: "autoSurround",
            default: "languageDefined",
            allowed: &["languageDefined", "quotes", "brackets", "never"],
        }),
        Box::new(StringSetOption {
            id: OptId::CursorBlinking,
            name: "cursorBlinking",
            default: "blink",
            allowed: &["blink", "smooth", "phase", "expand", "solid"],
        }),
        Box::new(BoolOption {
            id: OptId::Folding,
            name: "folding",
            default: true,
        }),
        Box::new(StringOption {
            id: OptId::FontFamily,
            name: "fontFamily",
            default: DEFAULT_FONT_FAMILY,
        }),
        Box::new(FontSizeOption),
        Box::new(FontWeightOption),
        Box::new(BoolOption {
            id: OptId::GlyphMargin,
            name: "glyphMargin",
            default: true,
        }),
        Box::new(HoverOption),
        Box::new(FloatOption {
            id: OptId::LetterSpacing,
            name: "letterSpacing",
            default: 0.0,
            minimum: -5.0,
            maximum: 20.0,
        }),
        Box::new(FloatOption {
            id: OptId::LineDecorationsWidth,
            name: "lineDecorationsWidth",
            default: 10.0,
            minimum: 0.0,
            maximum: 1000.0,
        }),
        Box::new(LineHeightOption),
        Box::new(LineNumbersOption),
        Box::new(IntOption {
            id: OptId::LineNumbersMinChars,
            name: "lineNumbersMinChars",
            default: 5,
            minimum: 1,
            maximum: 300,
        }),
        Box::new(StringSetOption {
            id: OptId::MatchBrackets,
            name: "matchBrackets",
            default: "always",
            allowed: &["always", "near", "never"],
        }),
        Box::new(MinimapOption),
        Box::new(PaddingOption),
        Box::new(ParameterHintsOption),
        Box::new(BoolOption {
            id: OptId::ReadOnly,
            name: "readOnly",
            default: false,
        }),
        Box::new(StringSetOption {
            id: OptId::RenderWhitespace,
            name: "renderWhitespace",
            default: "selection",
            allowed: &["none", "boundary", "selection", "trailing", "all"],
        }),
        Box::new(ScrollbarOption),
        Box::new(BoolOption {
            id: OptId::ScrollBeyondLastLine,
            name: "scrollBeyondLastLine",
            default: true,
        }),
        Box::new(StringSetOption {
            id: OptId::ShowFoldingControls,
            name: "showFoldingControls",
            default: "mouseover",
            allowed: &["always", "never", "mouseover"],
        }),
        Box::new(IntOption {
            id: OptId::StopRenderingLineAfter,
            name: "stopRenderingLineAfter",
            default: 10_000,
            minimum: -1,
            maximum: 10_000_000,
        }),
        Box::new(SuggestOption),
        Box::new(WordWrapOption),
        Box::new(IntOption {
            id: OptId::WordWrapColumn,
            name: "wordWrapColumn",
            default: 80,
            minimum: 1,
            maximum: 1_000_000,
        }),
        Box::new(StringSetOption {
            id: OptId::WordWrapOverride1,
            name: "wordWrapOverride1",
            default: "inherit",
            allowed: &["off", "on", "inherit"],
        }),
        Box::new(StringSetOption {
            id: OptId::WordWrapOverride2,
            name: "wordWrapOverride2",
            default: "inherit",
            allowed: &["off", "on", "inherit"],
        }),
        Box::new(EditorClassNameOption),
        Box::new(PixelRatioOption),
        Box::new(TabFocusModeOption),
        Box::new(InputModeOption),
        Box::new(FontInfoOption),
        Box::new(LayoutInfoOption),
        Box::new(WrappingInfoOption),
    ];
    OptionRegistry::new(descriptors).expect("built-in catalogue is registered in id order")
}

/// The registry shared by every controller in the process. Built once.
#[must_use]
pub fn shared_registry() -> Arc<OptionRegistry> {
    static REGISTRY: OnceLock<Arc<OptionRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Arc::new(builtin_registry())).clone()
}
