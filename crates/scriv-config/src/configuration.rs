#![forbid(unsafe_code)]

//! The configuration controller.
//!
//! Owns the raw options tree, the published computed snapshot, and the
//! cross-pass compute memory; watches the external signal sources; exposes
//! the update/read/notify surface the rest of the widget uses.
//!
//! # Design
//!
//! State lives behind one `RefCell`, and no borrow is held while listeners
//! run: every pass swaps in the new snapshot *first*, then notifies. A
//! listener that calls [`Configuration::update_options`] therefore starts an
//! independent, iterative pass — there is no recursion to guard against.
//!
//! # Failure Modes
//!
//! Malformed user input never fails (descriptor validators absorb it). A
//! wiring defect — reading an unregistered or not-yet-computed option —
//! panics inside the pass and is deliberately not caught here.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use scriv_options::{
    ChangeSet, ComputeMemory, ComputedOptions, Environment, FontInfo, FontSpec, OptionRegistry,
    RawOptions, ValidatedOptions, apply_update, catalogue, compute, diff, migrate_options,
    validate,
};

use crate::event::{EventEmitter, Signal, SignalSources, Subscription};
use crate::provider::EnvironmentProvider;

/// Viewport statistics owned by the controller and fed into every pass.
#[derive(Debug, Clone, PartialEq)]
struct ViewportState {
    model_line_count: u32,
    view_line_count: u32,
    is_dominated_by_long_lines: bool,
    reserved_height: f64,
    glyph_margin_decoration_lane_count: u32,
    container_override: Option<(f64, f64)>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            model_line_count: 1,
            view_line_count: 1,
            is_dominated_by_long_lines: false,
            reserved_height: 0.0,
            glyph_margin_decoration_lane_count: 1,
            container_override: None,
        }
    }
}

struct ControllerState {
    disposed: bool,
    raw: RawOptions,
    viewport: ViewportState,
    memory: Rc<RefCell<ComputeMemory>>,
    last_font_info: Option<FontInfo>,
    computed: Arc<ComputedOptions>,
    signal_subscriptions: Vec<Subscription>,
}

struct ConfigInner {
    registry: Arc<OptionRegistry>,
    provider: Rc<dyn EnvironmentProvider>,
    state: RefCell<ControllerState>,
    did_change_fast: EventEmitter<ChangeSet>,
    did_change: EventEmitter<ChangeSet>,
}

/// The stateful façade over the options engine.
///
/// Cheaply cloneable; clones are handles to the same shared state.
#[derive(Clone)]
pub struct Configuration {
    inner: Rc<ConfigInner>,
}

fn digit_count(mut n: u32) -> u32 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

fn assemble_environment(
    provider: &dyn EnvironmentProvider,
    viewport: &ViewportState,
    memory: &Rc<RefCell<ComputeMemory>>,
    last_font_info: &mut Option<FontInfo>,
    validated: &ValidatedOptions,
) -> Environment {
    let host = provider.host_state();
    let (outer_width, raw_height) = viewport
        .container_override
        .unwrap_or((host.outer_width, host.outer_height));
    let outer_height = (raw_height - viewport.reserved_height).max(0.0);

    let spec = FontSpec::from_validated(validated, host.zoom_factor);
    let font_info = match provider.font_metrics(&spec, host.pixel_ratio) {
        Ok(info) => {
            *last_font_info = Some(info.clone());
            info
        }
        Err(error) => {
            warn!(%error, "font measurement unavailable, substituting fallback metrics");
            last_font_info
                .clone()
                .unwrap_or_else(|| FontInfo::estimate(&spec))
        }
    };

    Environment {
        outer_width,
        outer_height,
        pixel_ratio: host.pixel_ratio,
        zoom_factor: host.zoom_factor,
        font_info,
        accessibility_support: host.accessibility_support,
        tab_focus_mode: host.tab_focus_mode,
        input_mode: host.input_mode,
        extra_class_name: host.extra_class_name,
        view_line_count: viewport.view_line_count,
        line_numbers_digit_count: digit_count(viewport.model_line_count),
        is_dominated_by_long_lines: viewport.is_dominated_by_long_lines,
        glyph_margin_decoration_lane_count: viewport.glyph_margin_decoration_lane_count,
        memory: Rc::clone(memory),
    }
}

impl ConfigInner {
    /// Run one full pass; swap state and notify only when something changed.
    fn recompute(&self) {
        let change = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            let validated = validate(&self.registry, &state.raw);
            let state = &mut *state;
            let environment = assemble_environment(
                self.provider.as_ref(),
                &state.viewport,
                &state.memory,
                &mut state.last_font_info,
                &validated,
            );
            let next = Arc::new(compute(&self.registry, &validated, &environment));
            match diff(&state.computed, &next) {
                None => {
                    debug!("recompute produced an identical snapshot, skipping notification");
                    return;
                }
                Some(change) => {
                    state.computed = next;
                    change
                }
            }
        };
        debug!(
            changed = change.changed_count(),
            "published new computed options"
        );
        // Fast listeners first, then normal; identical payloads.
        self.did_change_fast.fire(&change);
        self.did_change.fire(&change);
    }
}

impl Configuration {
    /// Build a controller over an explicit registry.
    ///
    /// The raw input is consumed (and migrated) here; later mutation by the
    /// caller is impossible by construction. One listener is attached to
    /// every signal source, each triggering a recomputation.
    #[must_use]
    pub fn new(
        initial: Value,
        registry: Arc<OptionRegistry>,
        provider: Rc<dyn EnvironmentProvider>,
        signals: &SignalSources,
    ) -> Configuration {
        let mut raw = RawOptions::from_value(initial);
        migrate_options(&mut raw);

        let viewport = ViewportState::default();
        let memory = Rc::new(RefCell::new(ComputeMemory::new()));
        let mut last_font_info = None;
        let validated = validate(&registry, &raw);
        let environment = assemble_environment(
            provider.as_ref(),
            &viewport,
            &memory,
            &mut last_font_info,
            &validated,
        );
        let computed = Arc::new(compute(&registry, &validated, &environment));

        let inner = Rc::new(ConfigInner {
            registry,
            provider,
            state: RefCell::new(ControllerState {
                disposed: false,
                raw,
                viewport,
                memory,
                last_font_info,
                computed,
                signal_subscriptions: Vec::new(),
            }),
            did_change_fast: EventEmitter::new(),
            did_change: EventEmitter::new(),
        });

        let subscriptions = [
            &signals.zoom_change,
            &signals.tab_focus_change,
            &signals.container_resize,
            &signals.font_measurement_change,
            &signals.pixel_ratio_change,
            &signals.accessibility_change,
            &signals.input_mode_change,
        ]
        .into_iter()
        .map(|signal| recompute_on(signal, &inner))
        .collect();
        inner.state.borrow_mut().signal_subscriptions = subscriptions;

        Configuration { inner }
    }

    /// Build a controller over the process-wide built-in registry.
    #[must_use]
    pub fn with_builtin_registry(
        initial: Value,
        provider: Rc<dyn EnvironmentProvider>,
        signals: &SignalSources,
    ) -> Configuration {
        Self::new(initial, catalogue::shared_registry(), provider, signals)
    }

    /// The published computed snapshot. Holders may keep the `Arc` as long
    /// as they like; it is never mutated, only superseded.
    #[must_use]
    pub fn options(&self) -> Arc<ComputedOptions> {
        Arc::clone(&self.inner.state.borrow().computed)
    }

    /// A copy of the raw options tree, for inspection only.
    #[must_use]
    pub fn raw_options(&self) -> RawOptions {
        self.inner.state.borrow().raw.clone()
    }

    /// Merge a partial raw update. Skips the (expensive) recomputation when
    /// the update changes nothing.
    pub fn update_options(&self, update: Value) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            if state.disposed {
                return;
            }
            let mut partial = RawOptions::from_value(update);
            migrate_options(&mut partial);
            apply_update(&self.inner.registry, &mut state.raw, &partial)
        };
        if !changed {
            debug!("options update changed nothing, skipping recompute");
            return;
        }
        self.inner.recompute();
    }

    /// Listen on the normal change channel.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_did_change(&self, listener: impl Fn(&ChangeSet) + 'static) -> Subscription {
        self.inner.did_change.subscribe(listener)
    }

    /// Listen on the fast change channel. It fires before the normal
    /// channel with the identical change set; no further semantics.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_did_change_fast(&self, listener: impl Fn(&ChangeSet) + 'static) -> Subscription {
        self.inner.did_change_fast.subscribe(listener)
    }

    pub fn set_model_line_count(&self, count: u32) {
        self.set_viewport_field(|viewport| {
            if viewport.model_line_count == count {
                false
            } else {
                viewport.model_line_count = count;
                true
            }
        });
    }

    pub fn set_view_line_count(&self, count: u32) {
        self.set_viewport_field(|viewport| {
            if viewport.view_line_count == count {
                false
            } else {
                viewport.view_line_count = count;
                true
            }
        });
    }

    pub fn set_is_dominated_by_long_lines(&self, dominated: bool) {
        self.set_viewport_field(|viewport| {
            if viewport.is_dominated_by_long_lines == dominated {
                false
            } else {
                viewport.is_dominated_by_long_lines = dominated;
                true
            }
        });
    }

    /// Height reserved for host chrome above/below the editor, subtracted
    /// from the container height before layout.
    pub fn set_reserved_height(&self, pixels: f64) {
        self.set_viewport_field(|viewport| {
            if viewport.reserved_height == pixels {
                false
            } else {
                viewport.reserved_height = pixels;
                true
            }
        });
    }

    pub fn set_glyph_margin_decoration_lane_count(&self, lanes: u32) {
        self.set_viewport_field(|viewport| {
            if viewport.glyph_margin_decoration_lane_count == lanes {
                false
            } else {
                viewport.glyph_margin_decoration_lane_count = lanes;
                true
            }
        });
    }

    /// Override the observed container size, or `None` to return to
    /// provider-reported geometry.
    pub fn observe_container(&self, size_override: Option<(f64, f64)>) {
        self.set_viewport_field(|viewport| {
            if viewport.container_override == size_override {
                false
            } else {
                viewport.container_override = size_override;
                true
            }
        });
    }

    /// Release every signal subscription and go inert. Idempotent; all
    /// later calls on this controller are no-ops.
    pub fn dispose(&self) {
        let subscriptions = {
            let mut state = self.inner.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
            std::mem::take(&mut state.signal_subscriptions)
        };
        // Dropping outside the borrow: unsubscribing touches the signal
        // emitters, never our own state.
        drop(subscriptions);
        debug!("configuration disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.state.borrow().disposed
    }

    fn set_viewport_field(&self, mutate: impl FnOnce(&mut ViewportState) -> bool) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            if state.disposed {
                return;
            }
            mutate(&mut state.viewport)
        };
        if changed {
            self.inner.recompute();
        }
    }
}

fn recompute_on(signal: &Signal, inner: &Rc<ConfigInner>) -> Subscription {
    let weak = Rc::downgrade(inner);
    signal.on_fire(move || {
        if let Some(inner) = weak.upgrade() {
            inner.recompute();
        }
    })
}
