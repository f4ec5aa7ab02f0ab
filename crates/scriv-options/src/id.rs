#![forbid(unsafe_code)]

//! Stable, dense option identities.
//!
//! Every registered option has a small integer id used as an array index on
//! hot paths; no string hashing happens after validation. Discriminant order
//! is the registry order, which doubles as the computation dependency order:
//! an option may only read the computed results of options with a smaller id.

/// Identity of one logical editor option.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptId {
    AccessibilitySupport = 0,
    AutoClosingBrackets = 1,
    AutoClosingQuotes = 2,
    AutoSurround = 3,
    CursorBlinking = 4,
    Folding = 5,
    FontFamily = 6,
    FontSize = 7,
    FontWeight = 8,
    GlyphMargin = 9,
    Hover = 10,
    LetterSpacing = 11,
    LineDecorationsWidth = 12,
    LineHeight = 13,
    LineNumbers = 14,
    LineNumbersMinChars = 15,
    MatchBrackets = 16,
    Minimap = 17,
    Padding = 18,
    ParameterHints = 19,
    ReadOnly = 20,
    RenderWhitespace = 21,
    Scrollbar = 22,
    ScrollBeyondLastLine = 23,
    ShowFoldingControls = 24,
    StopRenderingLineAfter = 25,
    Suggest = 26,
    WordWrap = 27,
    WordWrapColumn = 28,
    WordWrapOverride1 = 29,
    WordWrapOverride2 = 30,
    // Derived options below have no textual surface: they are computed from
    // the environment and from earlier options only.
    EditorClassName = 31,
    PixelRatio = 32,
    TabFocusMode = 33,
    InputMode = 34,
    FontInfo = 35,
    LayoutInfo = 36,
    WrappingInfo = 37,
}

impl OptId {
    /// Number of registered options; the length of every dense per-option
    /// array in the engine.
    pub const COUNT: usize = 38;

    /// All ids in registry (= dependency) order.
    pub const ALL: [OptId; Self::COUNT] = [
        OptId::AccessibilitySupport,
        OptId::AutoClosingBrackets,
        OptId::AutoClosingQuotes,
        OptId::AutoSurround,
        OptId::CursorBlinking,
        OptId::Folding,
        OptId::FontFamily,
        OptId::FontSize,
        OptId::FontWeight,
        OptId::GlyphMargin,
        OptId::Hover,
        OptId::LetterSpacing,
        OptId::LineDecorationsWidth,
        OptId::LineHeight,
        OptId::LineNumbers,
        OptId::LineNumbersMinChars,
        OptId::MatchBrackets,
        OptId::Minimap,
        OptId::Padding,
        OptId::ParameterHints,
        OptId::ReadOnly,
        OptId::RenderWhitespace,
        OptId::Scrollbar,
        OptId::ScrollBeyondLastLine,
        OptId::ShowFoldingControls,
        OptId::StopRenderingLineAfter,
        OptId::Suggest,
        OptId::WordWrap,
        OptId::WordWrapColumn,
        OptId::WordWrapOverride1,
        OptId::WordWrapOverride2,
        OptId::EditorClassName,
        OptId::PixelRatio,
        OptId::TabFocusMode,
        OptId::InputMode,
        OptId::FontInfo,
        OptId::LayoutInfo,
        OptId::WrappingInfo,
    ];

    /// Dense array index of this id.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Reverse lookup; `None` for out-of-range indices.
    #[must_use]
    pub fn from_index(index: usize) -> Option<OptId> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_dense_and_ordered() {
        for (i, id) in OptId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(OptId::from_index(i), Some(*id));
        }
        assert_eq!(OptId::ALL.len(), OptId::COUNT);
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(OptId::from_index(OptId::COUNT), None);
        assert_eq!(OptId::from_index(usize::MAX), None);
    }
}
