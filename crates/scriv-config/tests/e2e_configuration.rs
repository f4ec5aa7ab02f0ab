//! End-to-end controller behavior: migration on ingestion, environment
//! assembly, selective notification, signal wiring, and disposal.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;

use scriv_config::{Configuration, FixedEnvironmentProvider, HostState, SignalSources};
use scriv_options::{AccessibilitySupport, ChangeSet, OptId};

fn widget_host() -> Rc<FixedEnvironmentProvider> {
    let provider = Rc::new(FixedEnvironmentProvider::new(HostState {
        outer_width: 1000.0,
        outer_height: 800.0,
        ..HostState::default()
    }));
    // A 10px typical character and 9.8px digits at the default 14px font.
    provider.set_char_widths(10.0, 9.8);
    provider
}

fn configuration(
    initial: serde_json::Value,
    provider: &Rc<FixedEnvironmentProvider>,
    signals: &SignalSources,
) -> Configuration {
    Configuration::with_builtin_registry(
        initial,
        Rc::clone(provider) as Rc<dyn scriv_config::EnvironmentProvider>,
        signals,
    )
}

fn change_counter(config: &Configuration) -> (Rc<Cell<u32>>, scriv_config::Subscription) {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let sub = config.on_did_change(move |_| counter.set(counter.get() + 1));
    (count, sub)
}

#[test]
fn word_wrap_boolean_migrates_and_wraps_at_the_viewport() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({ "wordWrap": true }), &provider, &signals);

    assert_eq!(config.raw_options().read("wordWrap"), Some(&json!("on")));

    let wrapping = config.options().wrapping();
    assert!(wrapping.is_viewport_wrapping);
    assert_eq!(wrapping.wrapping_column, 80);
}

#[test]
fn hiding_the_minimap_widens_the_wrapping_column() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(
        json!({ "wordWrap": true, "minimap": { "enabled": false } }),
        &provider,
        &signals,
    );

    let wrapping = config.options().wrapping();
    assert!(wrapping.is_viewport_wrapping);
    assert_eq!(wrapping.wrapping_column, 88);
}

#[test]
fn hover_migration_and_single_bit_update() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({ "hover": true }), &provider, &signals);

    assert_eq!(
        config.raw_options().read("hover"),
        Some(&json!({ "enabled": "on" }))
    );

    let changes: Rc<std::cell::RefCell<Vec<ChangeSet>>> = Rc::default();
    let sink = Rc::clone(&changes);
    let _sub = config.on_did_change(move |change| sink.borrow_mut().push(change.clone()));

    config.update_options(json!({ "hover": { "enabled": "off" } }));

    let changes = changes.borrow();
    assert_eq!(changes.len(), 1);
    assert!(changes[0].has_changed(OptId::Hover));
    assert_eq!(changes[0].changed_count(), 1);
    assert_eq!(config.options().get(OptId::Hover).expect_hover().enabled, "off");
}

#[test]
fn empty_and_structurally_equal_updates_never_notify() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({ "fontSize": 14, "wordWrap": "on" }), &provider, &signals);
    let (count, _sub) = change_counter(&config);

    config.update_options(json!({}));
    config.update_options(json!({ "fontSize": 14 }));
    config.update_options(json!({ "wordWrap": "on" }));

    assert_eq!(count.get(), 0);
}

#[test]
fn repeated_model_line_count_fires_at_most_once() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    let (count, _sub) = change_counter(&config);

    // Six digits outgrow the 5-char gutter minimum, so the first call lays
    // out again; the second is a structural no-op.
    config.set_model_line_count(123_456);
    config.set_model_line_count(123_456);
    assert_eq!(count.get(), 1);

    // Four digits stay within the gutter minimum: nothing observable moves.
    let config2 = configuration(json!({}), &provider, &signals);
    let (count2, _sub2) = change_counter(&config2);
    config2.set_model_line_count(1234);
    config2.set_model_line_count(1234);
    assert_eq!(count2.get(), 0);
}

#[test]
fn signal_with_unchanged_environment_stays_silent() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    let (count, _sub) = change_counter(&config);

    // The host reports an accessibility event, but the assembled value is
    // the same as last pass.
    signals.accessibility_change.fire();
    assert_eq!(count.get(), 0);

    // Now the reported mode actually changes.
    provider.set_state(|state| state.accessibility_support = AccessibilitySupport::Enabled);
    signals.accessibility_change.fire();
    assert_eq!(count.get(), 1);
    assert_eq!(
        config
            .options()
            .get(OptId::AccessibilitySupport)
            .expect_accessibility(),
        AccessibilitySupport::Enabled
    );
}

#[test]
fn fast_channel_fires_first_with_the_same_payload() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);

    let order: Rc<std::cell::RefCell<Vec<(&str, usize)>>> = Rc::default();
    let fast_sink = Rc::clone(&order);
    let _fast = config.on_did_change_fast(move |change| {
        fast_sink.borrow_mut().push(("fast", change.changed_count()));
    });
    let normal_sink = Rc::clone(&order);
    let _normal = config.on_did_change(move |change| {
        normal_sink.borrow_mut().push(("normal", change.changed_count()));
    });

    config.update_options(json!({ "readOnly": true }));

    assert_eq!(*order.borrow(), vec![("fast", 1), ("normal", 1)]);
}

#[test]
fn container_resize_signal_relays_out_to_layout() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({ "wordWrap": "on" }), &provider, &signals);
    assert_eq!(config.options().wrapping().wrapping_column, 80);

    provider.set_state(|state| state.outer_width = 600.0);
    signals.container_resize.fire();

    let narrow = config.options().wrapping().wrapping_column;
    assert!(narrow < 80, "narrower container must wrap earlier, got {narrow}");
}

#[test]
fn observe_container_overrides_and_restores_host_geometry() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    let wide = config.options().layout().content_width;

    config.observe_container(Some((500.0, 400.0)));
    assert!(config.options().layout().content_width < wide);

    config.observe_container(None);
    assert_eq!(config.options().layout().content_width, wide);
}

#[test]
fn reserved_height_shrinks_the_laid_out_editor() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    assert_eq!(config.options().layout().height, 800.0);

    config.set_reserved_height(100.0);
    assert_eq!(config.options().layout().height, 700.0);

    let (count, _sub) = change_counter(&config);
    config.set_reserved_height(100.0);
    assert_eq!(count.get(), 0);
}

#[test]
fn zoom_change_flows_into_font_and_layout() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    assert_eq!(config.options().get(OptId::FontSize).expect_float(), 14.0);

    provider.set_state(|state| state.zoom_factor = 2.0);
    signals.zoom_change.fire();

    assert_eq!(config.options().get(OptId::FontSize).expect_float(), 28.0);
    assert_eq!(config.options().font_info().line_height, 42.0);
}

#[test]
fn measurement_outage_falls_back_to_last_known_metrics() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    let measured = config.options().font_info().clone();
    assert!(measured.is_trusted);

    let (count, _sub) = change_counter(&config);
    provider.set_measurement_down(true);
    signals.font_measurement_change.fire();

    // The pass completed on cached metrics; nothing observable changed.
    assert_eq!(count.get(), 0);
    assert_eq!(*config.options().font_info(), measured);
}

#[test]
fn measurement_outage_at_construction_uses_estimates() {
    let provider = widget_host();
    provider.set_measurement_down(true);
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);

    assert!(!config.options().font_info().is_trusted);
    assert!(config.options().layout().content_width > 0.0);
}

#[test]
fn listener_updating_options_runs_an_independent_pass() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);

    let nested = config.clone();
    let observed: Rc<std::cell::RefCell<Vec<bool>>> = Rc::default();
    let sink = Rc::clone(&observed);
    let _sub = config.on_did_change(move |change| {
        // Mid-callback reads observe the already-swapped snapshot.
        sink.borrow_mut()
            .push(nested.options().get(OptId::ReadOnly).expect_bool());
        if change.has_changed(OptId::ReadOnly)
            && nested.options().get(OptId::ReadOnly).expect_bool()
        {
            nested.update_options(json!({ "folding": false }));
        }
    });

    config.update_options(json!({ "readOnly": true }));

    assert_eq!(*observed.borrow(), vec![true, true]);
    assert!(!config.options().get(OptId::Folding).expect_bool());
}

#[test]
fn dispose_releases_signals_and_goes_inert() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    let (count, _sub) = change_counter(&config);

    config.dispose();
    assert!(config.is_disposed());

    provider.set_state(|state| state.outer_width = 500.0);
    signals.container_resize.fire();
    config.update_options(json!({ "readOnly": true }));
    config.set_model_line_count(999_999);

    assert_eq!(count.get(), 0);
    assert_eq!(config.raw_options().read("readOnly"), None);

    // A second dispose is a no-op.
    config.dispose();
}

#[test]
fn long_lines_with_screen_reader_force_wrapping() {
    let provider = widget_host();
    provider.set_state(|state| state.accessibility_support = AccessibilitySupport::Enabled);
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    assert!(!config.options().wrapping().is_viewport_wrapping);

    config.set_is_dominated_by_long_lines(true);

    let wrapping = config.options().wrapping();
    assert!(wrapping.is_word_wrap_minified);
    assert!(wrapping.is_viewport_wrapping);
}

#[test]
fn glyph_margin_lane_count_widens_the_margin() {
    let provider = widget_host();
    let signals = SignalSources::new();
    let config = configuration(json!({}), &provider, &signals);
    assert_eq!(config.options().layout().glyph_margin_width, 21.0);

    config.set_glyph_margin_decoration_lane_count(3);
    assert_eq!(config.options().layout().glyph_margin_width, 63.0);
}
