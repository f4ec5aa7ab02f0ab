#![forbid(unsafe_code)]

//! The host seam: everything the controller reads from outside.

use std::cell::RefCell;

use thiserror::Error;

use scriv_options::{AccessibilitySupport, FontInfo, FontSpec, InputMode};

/// Host-reported state captured once per pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HostState {
    /// Container width in pixels.
    pub outer_width: f64,
    /// Container height in pixels, before any reserved chrome is deducted.
    pub outer_height: f64,
    pub pixel_ratio: f64,
    pub zoom_factor: f64,
    pub accessibility_support: AccessibilitySupport,
    pub tab_focus_mode: bool,
    pub input_mode: InputMode,
    /// Extra class names the embedder wants on the widget root.
    pub extra_class_name: String,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            outer_width: 800.0,
            outer_height: 600.0,
            pixel_ratio: 1.0,
            zoom_factor: 1.0,
            accessibility_support: AccessibilitySupport::Unknown,
            tab_focus_mode: false,
            input_mode: InputMode::Insert,
            extra_class_name: String::new(),
        }
    }
}

/// A collaborator could not supply a measurement right now.
///
/// This is recoverable by design: the environment assembler substitutes the
/// last known metrics (or a deterministic estimate) rather than aborting the
/// pass — the editor must always have usable computed options.
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("font measurement unavailable: {reason}")]
    FontUnavailable { reason: String },
}

/// What the controller consumes from its host.
pub trait EnvironmentProvider {
    /// Capture the current host state. Called once per pass.
    fn host_state(&self) -> HostState;

    /// Measure the font the validated options ask for. May fail while the
    /// host is not ready to measure (e.g. not attached yet).
    fn font_metrics(&self, spec: &FontSpec, pixel_ratio: f64)
    -> Result<FontInfo, MeasurementError>;
}

/// An [`EnvironmentProvider`] with explicitly controlled state.
///
/// The provider for headless embedding and tests: host state is whatever the
/// caller last set, and font measurement derives deterministic metrics from
/// the font spec, with optional fixed character widths and an optional
/// simulated measurement outage.
pub struct FixedEnvironmentProvider {
    state: RefCell<HostState>,
    char_widths: RefCell<Option<(f64, f64)>>,
    measurement_down: RefCell<bool>,
}

impl Default for FixedEnvironmentProvider {
    fn default() -> Self {
        Self::new(HostState::default())
    }
}

impl FixedEnvironmentProvider {
    #[must_use]
    pub fn new(state: HostState) -> Self {
        Self {
            state: RefCell::new(state),
            char_widths: RefCell::new(None),
            measurement_down: RefCell::new(false),
        }
    }

    /// Mutate the host state in place; the change is visible to the next
    /// pass (pair it with the matching signal, as a real host would).
    pub fn set_state(&self, mutate: impl FnOnce(&mut HostState)) {
        mutate(&mut self.state.borrow_mut());
    }

    /// Pin the typical character width and the digit width reported by
    /// measurement, independent of font size.
    pub fn set_char_widths(&self, typical_halfwidth: f64, max_digit: f64) {
        *self.char_widths.borrow_mut() = Some((typical_halfwidth, max_digit));
    }

    /// Simulate the measurement collaborator being unavailable.
    pub fn set_measurement_down(&self, down: bool) {
        *self.measurement_down.borrow_mut() = down;
    }
}

impl EnvironmentProvider for FixedEnvironmentProvider {
    fn host_state(&self) -> HostState {
        self.state.borrow().clone()
    }

    fn font_metrics(
        &self,
        spec: &FontSpec,
        _pixel_ratio: f64,
    ) -> Result<FontInfo, MeasurementError> {
        if *self.measurement_down.borrow() {
            return Err(MeasurementError::FontUnavailable {
                reason: "measurement disabled".to_string(),
            });
        }
        let mut info = FontInfo::estimate(spec);
        if let Some((typical, digit)) = *self.char_widths.borrow() {
            info.typical_halfwidth_character_width = typical;
            info.typical_fullwidth_character_width = typical * 2.0;
            info.space_width = typical;
            info.max_digit_width = digit;
        }
        info.is_trusted = true;
        Ok(info)
    }
}
