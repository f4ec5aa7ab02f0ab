#![forbid(unsafe_code)]

//! Option resolution engine for the Scriv editor widget.
//!
//! This crate turns a loosely-typed, backward-compatible configuration tree
//! into a fully resolved, internally consistent set of typed option values
//! that the rest of the widget reads on every keystroke and layout pass.
//!
//! # Pipeline
//!
//! ```text
//! RawOptions ──migrate──▶ RawOptions ──validate──▶ ValidatedOptions
//!                                                        │
//!                         Environment ──────compute──────┤
//!                                                        ▼
//!                previous ComputedOptions ──diff──▶ ChangeSet
//! ```
//!
//! # Invariants
//!
//! 1. Migration is idempotent and never overwrites a canonical key the user
//!    already set.
//! 2. Validation is total: malformed input resolves to defaults, never to an
//!    error.
//! 3. Registry order is the dependency order. A descriptor may read the
//!    computed result of any earlier descriptor; reading a later (unwritten)
//!    one panics immediately instead of propagating a stale value.
//! 4. A published [`ComputedOptions`] snapshot is never mutated, only
//!    replaced.
//!
//! The stateful shell (event wiring, environment providers, the controller)
//! lives in the companion `scriv-config` crate.

pub mod catalogue;
pub mod diff;
pub mod env;
pub mod font;
pub mod id;
pub mod layout;
pub mod migration;
pub mod raw;
pub mod registry;
pub mod validation;
pub mod value;

pub use diff::{ChangeSet, diff};
pub use env::{ComputeMemory, Environment};
pub use font::{FontInfo, FontSpec};
pub use id::OptId;
pub use layout::{LayoutInfo, MinimapLayout, OverviewRulerLayout, RenderMinimap, WrappingInfo};
pub use migration::{MigrationScope, SettingMigration, migrate_options, run_migrations};
pub use raw::RawOptions;
pub use registry::{
    ApplyUpdateResult, ComputedOptions, ComputedSoFar, OptionDescriptor, OptionRegistry,
    RegistryError, ValidatedOptions, apply_update, compute, validate,
};
pub use value::{
    AccessibilitySupport, HoverSettings, InputMode, LineNumbersStyle, MinimapSettings, MinimapSide,
    MinimapSize, MinimapSlider, OptionValue, PaddingSettings, ParameterHintsSettings,
    ScrollbarSettings, ScrollbarVisibility, SuggestSettings, WordWrap,
};
