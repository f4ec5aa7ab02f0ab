#![forbid(unsafe_code)]

//! Editor layout computation.
//!
//! Splits the container width into glyph margin, line-number gutter,
//! decoration lane, content, minimap, and scrollbar, and derives the
//! viewport/wrapping columns from what is left. This is the one computation
//! with cross-pass state: the minimap `fit`/`fill` sizing participates in a
//! feedback loop with viewport wrapping (minimap width → content width →
//! view line count → minimap height), so once a pass shrinks the minimap
//! scale while wrapping is active, the scale and the width it was chosen at
//! are pinned in [`ComputeMemory`] and reused while the editor only gets
//! narrower.

use tracing::debug;

use crate::env::ComputeMemory;
use crate::value::{
    AccessibilitySupport, MinimapSettings, MinimapSide, MinimapSize, PaddingSettings,
    ScrollbarSettings, WordWrap,
};

/// Width of the empty gutter to the left of the minimap, in pixels.
pub const MINIMAP_GUTTER_WIDTH: f64 = 8.0;

/// Pixels kept free after the last character so the cursor has room.
const CURSOR_SURROUND_WIDTH: f64 = 2.0;

/// How the minimap renders lines, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMinimap {
    None,
    Text,
    Blocks,
}

/// Resolved minimap geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapLayout {
    pub render_minimap: RenderMinimap,
    pub minimap_left: f64,
    pub minimap_width: f64,
    pub minimap_height_is_editor_height: bool,
    pub minimap_is_sampling: bool,
    pub minimap_scale: u32,
    pub minimap_line_height: f64,
    pub minimap_canvas_inner_width: f64,
    pub minimap_canvas_inner_height: f64,
    pub minimap_canvas_outer_width: f64,
    pub minimap_canvas_outer_height: f64,
}

/// Overview-ruler geometry (the strip over the vertical scrollbar).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverviewRulerLayout {
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub right: f64,
}

/// Resolved editor geometry, the `layoutInfo` computed option.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInfo {
    pub width: f64,
    pub height: f64,
    pub glyph_margin_left: f64,
    pub glyph_margin_width: f64,
    pub glyph_margin_decoration_lane_count: u32,
    pub line_numbers_left: f64,
    pub line_numbers_width: f64,
    pub decorations_left: f64,
    pub decorations_width: f64,
    pub content_left: f64,
    pub content_width: f64,
    pub minimap: MinimapLayout,
    pub viewport_column: i32,
    pub is_word_wrap_minified: bool,
    pub is_viewport_wrapping: bool,
    /// `-1` when no wrapping bound applies.
    pub wrapping_column: i32,
    pub vertical_scrollbar_width: f64,
    pub horizontal_scrollbar_height: f64,
    pub overview_ruler: OverviewRulerLayout,
}

/// The `wrappingInfo` computed option, derived from [`LayoutInfo`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrappingInfo {
    pub is_word_wrap_minified: bool,
    pub is_viewport_wrapping: bool,
    /// `-1` when no wrapping bound applies.
    pub wrapping_column: i32,
}

impl Default for WrappingInfo {
    fn default() -> Self {
        Self {
            is_word_wrap_minified: false,
            is_viewport_wrapping: false,
            wrapping_column: -1,
        }
    }
}

impl Default for MinimapLayout {
    fn default() -> Self {
        Self {
            render_minimap: RenderMinimap::None,
            minimap_left: 0.0,
            minimap_width: 0.0,
            minimap_height_is_editor_height: false,
            minimap_is_sampling: false,
            minimap_scale: 1,
            minimap_line_height: 1.0,
            minimap_canvas_inner_width: 0.0,
            minimap_canvas_inner_height: 0.0,
            minimap_canvas_outer_width: 0.0,
            minimap_canvas_outer_height: 0.0,
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            glyph_margin_left: 0.0,
            glyph_margin_width: 0.0,
            glyph_margin_decoration_lane_count: 0,
            line_numbers_left: 0.0,
            line_numbers_width: 0.0,
            decorations_left: 0.0,
            decorations_width: 0.0,
            content_left: 0.0,
            content_width: 0.0,
            minimap: MinimapLayout::default(),
            viewport_column: 0,
            is_word_wrap_minified: false,
            is_viewport_wrapping: false,
            wrapping_column: -1,
            vertical_scrollbar_width: 0.0,
            horizontal_scrollbar_height: 0.0,
            overview_ruler: OverviewRulerLayout {
                top: 0.0,
                width: 0.0,
                height: 0.0,
                right: 0.0,
            },
        }
    }
}

/// Inputs to the minimap layout, also the record pinned in [`ComputeMemory`].
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapLayoutInput {
    pub outer_width: f64,
    pub outer_height: f64,
    pub line_height: f64,
    pub typical_halfwidth_character_width: f64,
    pub pixel_ratio: f64,
    pub scroll_beyond_last_line: bool,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub minimap: MinimapSettings,
    pub vertical_scrollbar_width: f64,
    pub view_line_count: u32,
    pub remaining_width: f64,
    pub is_viewport_wrapping: bool,
}

impl MinimapLayoutInput {
    /// Whether a pinned input still describes the current pass closely
    /// enough to reuse the pinned minimap scale. `outer_width`,
    /// `view_line_count` and `remaining_width` are intentionally excluded:
    /// they are exactly the quantities the feedback loop perturbs.
    fn stable_key_matches(&self, other: &MinimapLayoutInput) -> bool {
        self.outer_height == other.outer_height
            && self.line_height == other.line_height
            && self.typical_halfwidth_character_width == other.typical_halfwidth_character_width
            && self.pixel_ratio == other.pixel_ratio
            && self.scroll_beyond_last_line == other.scroll_beyond_last_line
            && self.padding_top == other.padding_top
            && self.padding_bottom == other.padding_bottom
            && self.minimap == other.minimap
            && self.vertical_scrollbar_width == other.vertical_scrollbar_width
            && self.is_viewport_wrapping == other.is_viewport_wrapping
    }
}

/// Everything `compute_layout` reads: validated/computed option values plus
/// the environment of the current pass.
#[derive(Debug, Clone)]
pub struct LayoutInput<'a> {
    pub outer_width: f64,
    pub outer_height: f64,
    pub line_height: f64,
    pub line_numbers_digit_count: u32,
    pub typical_halfwidth_character_width: f64,
    pub max_digit_width: f64,
    pub pixel_ratio: f64,
    pub view_line_count: u32,
    pub glyph_margin_decoration_lane_count: u32,
    pub is_dominated_by_long_lines: bool,
    pub accessibility_support: AccessibilitySupport,
    pub word_wrap: WordWrap,
    pub word_wrap_column: i64,
    pub word_wrap_override1: &'a str,
    pub word_wrap_override2: &'a str,
    pub glyph_margin: bool,
    pub line_numbers_visible: bool,
    pub line_numbers_min_chars: i64,
    pub scroll_beyond_last_line: bool,
    pub padding: PaddingSettings,
    pub minimap: MinimapSettings,
    pub scrollbar: ScrollbarSettings,
    pub folding: bool,
    pub show_folding_decoration: bool,
    pub line_decorations_width: f64,
}

struct ContainedMinimapLineCount {
    typical_viewport_line_count: f64,
    extra_lines_before_first_line: f64,
    extra_lines_beyond_last_line: f64,
    desired_ratio: f64,
    minimap_line_count: f64,
}

fn compute_contained_minimap_line_count(
    view_line_count: u32,
    scroll_beyond_last_line: bool,
    padding_top: f64,
    padding_bottom: f64,
    height: f64,
    line_height: f64,
    pixel_ratio: f64,
) -> ContainedMinimapLineCount {
    let typical_viewport_line_count = height / line_height;
    let extra_lines_before_first_line = (padding_top / line_height).floor();
    let mut extra_lines_beyond_last_line = (padding_bottom / line_height).floor();
    if scroll_beyond_last_line {
        extra_lines_beyond_last_line =
            extra_lines_beyond_last_line.max(typical_viewport_line_count - 1.0);
    }
    let desired_ratio = (extra_lines_before_first_line
        + f64::from(view_line_count)
        + extra_lines_beyond_last_line)
        / (pixel_ratio * height);
    let minimap_line_count = (f64::from(view_line_count) / desired_ratio).floor();
    ContainedMinimapLineCount {
        typical_viewport_line_count,
        extra_lines_before_first_line,
        extra_lines_beyond_last_line,
        desired_ratio,
        minimap_line_count,
    }
}

fn compute_minimap_layout(input: &MinimapLayoutInput, memory: &mut ComputeMemory) -> MinimapLayout {
    let outer_width = input.outer_width;
    let outer_height = input.outer_height;
    let pixel_ratio = input.pixel_ratio;

    if !input.minimap.enabled {
        return MinimapLayout {
            render_minimap: RenderMinimap::None,
            minimap_left: 0.0,
            minimap_width: 0.0,
            minimap_height_is_editor_height: false,
            minimap_is_sampling: false,
            minimap_scale: 1,
            minimap_line_height: 1.0,
            minimap_canvas_inner_width: 0.0,
            minimap_canvas_inner_height: (pixel_ratio * outer_height).floor(),
            minimap_canvas_outer_width: 0.0,
            minimap_canvas_outer_height: outer_height,
        };
    }

    // The pinned input may be reused even though `view_line_count` and
    // `remaining_width` have moved; that is the whole point of pinning.
    let could_use_memory = memory
        .stable_minimap_layout_input
        .as_ref()
        .is_some_and(|stable| stable.stable_key_matches(input));

    let line_height = input.line_height;
    let typical_halfwidth_character_width = input.typical_halfwidth_character_width;
    let scroll_beyond_last_line = input.scroll_beyond_last_line;
    let minimap_render_characters = input.minimap.render_characters;
    let mut minimap_scale = if pixel_ratio >= 2.0 {
        (f64::from(input.minimap.scale) * 2.0).round() as u32
    } else {
        input.minimap.scale
    };
    let minimap_max_column = input.minimap.max_column;
    let minimap_size = input.minimap.size;
    let minimap_side = input.minimap.side;
    let vertical_scrollbar_width = input.vertical_scrollbar_width;
    let view_line_count = input.view_line_count;
    let remaining_width = input.remaining_width;
    let is_viewport_wrapping = input.is_viewport_wrapping;

    let base_char_height = if minimap_render_characters { 2.0 } else { 3.0 };
    let mut minimap_canvas_inner_height = (pixel_ratio * outer_height).floor();
    let minimap_canvas_outer_height = minimap_canvas_inner_height / pixel_ratio;
    let mut minimap_height_is_editor_height = false;
    let mut minimap_is_sampling = false;
    let mut minimap_line_height = base_char_height * f64::from(minimap_scale);
    let mut minimap_char_width = f64::from(minimap_scale) / pixel_ratio;
    let mut minimap_width_multiplier: f64 = 1.0;

    if minimap_size == MinimapSize::Fill || minimap_size == MinimapSize::Fit {
        let contained = compute_contained_minimap_line_count(
            view_line_count,
            scroll_beyond_last_line,
            input.padding_top,
            input.padding_bottom,
            outer_height,
            line_height,
            pixel_ratio,
        );
        // Ratio is intentionally not part of the pinned layout so sampling
        // does not destabilize it.
        let ratio = f64::from(view_line_count) / contained.minimap_line_count;
        if ratio > 1.0 {
            minimap_height_is_editor_height = true;
            minimap_is_sampling = true;
            minimap_scale = 1;
            minimap_line_height = 1.0;
            minimap_char_width = f64::from(minimap_scale) / pixel_ratio;
        } else {
            let mut fit_becomes_fill = false;
            let mut max_minimap_scale = minimap_scale + 1;
            if minimap_size == MinimapSize::Fit {
                let effective_minimap_height = ((contained.extra_lines_before_first_line
                    + f64::from(view_line_count)
                    + contained.extra_lines_beyond_last_line)
                    * minimap_line_height)
                    .ceil();
                if is_viewport_wrapping
                    && could_use_memory
                    && remaining_width <= memory.stable_fit_remaining_width
                {
                    // Break the wrap↔minimap loop: stick with the scale a
                    // previous pass already shrank to.
                    fit_becomes_fill = true;
                    max_minimap_scale = memory.stable_fit_max_minimap_scale;
                } else {
                    fit_becomes_fill = effective_minimap_height > minimap_canvas_inner_height;
                }
            }
            if minimap_size == MinimapSize::Fill || fit_becomes_fill {
                minimap_height_is_editor_height = true;
                let configured_minimap_scale = minimap_scale;
                minimap_line_height = (line_height * pixel_ratio)
                    .min((1.0 / contained.desired_ratio).floor().max(1.0));
                if is_viewport_wrapping
                    && could_use_memory
                    && remaining_width <= memory.stable_fit_remaining_width
                {
                    max_minimap_scale = memory.stable_fit_max_minimap_scale;
                }
                minimap_scale = max_minimap_scale
                    .min(((minimap_line_height / base_char_height).floor() as u32).max(1));
                if minimap_scale > configured_minimap_scale {
                    minimap_width_multiplier =
                        (f64::from(minimap_scale) / f64::from(configured_minimap_scale)).min(2.0);
                }
                minimap_char_width =
                    f64::from(minimap_scale) / pixel_ratio / minimap_width_multiplier;
                minimap_canvas_inner_height = (contained
                    .typical_viewport_line_count
                    .max(
                        contained.extra_lines_before_first_line
                            + f64::from(view_line_count)
                            + contained.extra_lines_beyond_last_line,
                    )
                    * minimap_line_height)
                    .ceil();
                if is_viewport_wrapping {
                    memory.stable_minimap_layout_input = Some(input.clone());
                    memory.stable_fit_remaining_width = remaining_width;
                    memory.stable_fit_max_minimap_scale = minimap_scale;
                    debug!(
                        scale = minimap_scale,
                        remaining_width, "pinned minimap scale for viewport wrapping"
                    );
                } else {
                    memory.stable_minimap_layout_input = None;
                    memory.stable_fit_remaining_width = 0.0;
                }
            }
        }
    }

    // Solve minimapWidth so that content and minimap share the remaining
    // width at the same columns-per-pixel:
    //   minimapWidth = ((remainingWidth - verticalScrollbarWidth - 2) * minimapCharWidth)
    //               / (typicalHalfwidthCharacterWidth + minimapCharWidth)
    let minimap_max_width = (f64::from(minimap_max_column) * minimap_char_width).floor();
    let minimap_width = minimap_max_width.min(
        (((remaining_width - vertical_scrollbar_width - CURSOR_SURROUND_WIDTH)
            * minimap_char_width)
            / (typical_halfwidth_character_width + minimap_char_width))
            .floor()
            .max(0.0)
            + MINIMAP_GUTTER_WIDTH,
    );

    let mut minimap_canvas_inner_width = (pixel_ratio * minimap_width).floor();
    let minimap_canvas_outer_width = minimap_canvas_inner_width / pixel_ratio;
    minimap_canvas_inner_width = (minimap_canvas_inner_width * minimap_width_multiplier).floor();

    let render_minimap = if minimap_render_characters {
        RenderMinimap::Text
    } else {
        RenderMinimap::Blocks
    };
    let minimap_left = match minimap_side {
        MinimapSide::Left => 0.0,
        MinimapSide::Right => outer_width - minimap_width - vertical_scrollbar_width,
    };

    MinimapLayout {
        render_minimap,
        minimap_left,
        minimap_width,
        minimap_height_is_editor_height,
        minimap_is_sampling,
        minimap_scale,
        minimap_line_height,
        minimap_canvas_inner_width,
        minimap_canvas_inner_height,
        minimap_canvas_outer_width,
        minimap_canvas_outer_height,
    }
}

/// Compute the full editor layout for one pass.
pub fn compute_layout(input: &LayoutInput<'_>, memory: &mut ComputeMemory) -> LayoutInfo {
    let outer_width = input.outer_width.trunc();
    let outer_height = input.outer_height.trunc();
    let line_height = input.line_height;

    // Overrides are transient (e.g. a diff editor forcing wrap off); the
    // second override wins over the first, the first over the base value.
    let word_wrap_override1 = if input.word_wrap_override2 == "inherit" {
        input.word_wrap_override1
    } else {
        input.word_wrap_override2
    };
    let word_wrap = if word_wrap_override1 == "inherit" {
        input.word_wrap
    } else {
        WordWrap::from_setting(word_wrap_override1).unwrap_or(input.word_wrap)
    };

    let mut line_decorations_width = input.line_decorations_width;
    if input.folding && input.show_folding_decoration {
        line_decorations_width += 16.0;
    }

    let mut line_numbers_width = 0.0;
    if input.line_numbers_visible {
        let digit_count =
            i64::from(input.line_numbers_digit_count).max(input.line_numbers_min_chars);
        line_numbers_width = (digit_count as f64 * input.max_digit_width).round();
    }

    let mut glyph_margin_width = 0.0;
    if input.glyph_margin {
        glyph_margin_width = line_height * f64::from(input.glyph_margin_decoration_lane_count);
    }

    let mut glyph_margin_left = 0.0;
    let mut line_numbers_left = glyph_margin_left + glyph_margin_width;
    let mut decorations_left = line_numbers_left + line_numbers_width;
    let mut content_left = decorations_left + line_decorations_width;

    let remaining_width =
        outer_width - glyph_margin_width - line_numbers_width - line_decorations_width;

    let mut is_word_wrap_minified = false;
    let mut is_viewport_wrapping = false;
    let mut wrapping_column: i32 = -1;

    if input.accessibility_support == AccessibilitySupport::Enabled
        && word_wrap_override1 == "inherit"
        && input.is_dominated_by_long_lines
    {
        // A screen reader plus very long lines: force wrapping at the
        // viewport so horizontal scrolling never hides content.
        is_word_wrap_minified = true;
        is_viewport_wrapping = true;
    } else if word_wrap == WordWrap::On || word_wrap == WordWrap::Bounded {
        is_viewport_wrapping = true;
    } else if word_wrap == WordWrap::WordWrapColumn {
        wrapping_column = input.word_wrap_column as i32;
    }

    let minimap_layout = compute_minimap_layout(
        &MinimapLayoutInput {
            outer_width,
            outer_height,
            line_height,
            typical_halfwidth_character_width: input.typical_halfwidth_character_width,
            pixel_ratio: input.pixel_ratio,
            scroll_beyond_last_line: input.scroll_beyond_last_line,
            padding_top: input.padding.top as f64,
            padding_bottom: input.padding.bottom as f64,
            minimap: input.minimap,
            vertical_scrollbar_width: input.scrollbar.vertical_scrollbar_size as f64,
            view_line_count: input.view_line_count,
            remaining_width,
            is_viewport_wrapping,
        },
        memory,
    );

    if minimap_layout.render_minimap != RenderMinimap::None && minimap_layout.minimap_left == 0.0 {
        // Minimap on the left: shift everything right.
        glyph_margin_left += minimap_layout.minimap_width;
        line_numbers_left += minimap_layout.minimap_width;
        decorations_left += minimap_layout.minimap_width;
        content_left += minimap_layout.minimap_width;
    }

    let content_width = remaining_width - minimap_layout.minimap_width;
    let vertical_scrollbar_width = input.scrollbar.vertical_scrollbar_size as f64;
    let viewport_column = (((content_width - vertical_scrollbar_width - CURSOR_SURROUND_WIDTH)
        / input.typical_halfwidth_character_width)
        .floor() as i32)
        .max(1);

    if is_viewport_wrapping {
        wrapping_column = viewport_column.max(1);
        if word_wrap == WordWrap::Bounded {
            wrapping_column = wrapping_column.min(input.word_wrap_column as i32);
        }
    }

    let vertical_arrow_size = if input.scrollbar.vertical_has_arrows {
        input.scrollbar.arrow_size as f64
    } else {
        0.0
    };

    LayoutInfo {
        width: outer_width,
        height: outer_height,
        glyph_margin_left,
        glyph_margin_width,
        glyph_margin_decoration_lane_count: input.glyph_margin_decoration_lane_count,
        line_numbers_left,
        line_numbers_width,
        decorations_left,
        decorations_width: line_decorations_width,
        content_left,
        content_width,
        minimap: minimap_layout,
        viewport_column,
        is_word_wrap_minified,
        is_viewport_wrapping,
        wrapping_column,
        vertical_scrollbar_width,
        horizontal_scrollbar_height: input.scrollbar.horizontal_scrollbar_size as f64,
        overview_ruler: OverviewRulerLayout {
            top: vertical_arrow_size,
            width: vertical_scrollbar_width,
            height: outer_height - 2.0 * vertical_arrow_size,
            right: 0.0,
        },
    }
}
