#![forbid(unsafe_code)]

//! The option registry and the validate/compute passes.
//!
//! A registry is an ordered, immutable collection of descriptors handed to
//! every controller at construction and never mutated afterwards. Iteration
//! order is the authoritative dependency order: descriptor `i` may read the
//! computed result of any descriptor `j < i` through [`ComputedSoFar`], and
//! nothing else. There is no cycle detection — the registry order is an
//! implicit DAG, and the fault-on-unwritten-read rule in `ComputedSoFar` is
//! the only safety net against a misordered registry.
//!
//! # Failure Modes
//!
//! - Malformed raw input: resolved by descriptor validators, never an error.
//! - Misordered or duplicate registration: [`RegistryError`] at construction.
//! - Reading an unwritten or unregistered id mid-pass: immediate panic.
//!   Silently returning a stale value would corrupt every option computed
//!   after the bad read in the same pass.

use serde_json::Value;
use thiserror::Error;

use crate::env::Environment;
use crate::id::OptId;
use crate::raw::RawOptions;
use crate::value::OptionValue;

/// Result of applying a partial update to one option's raw value.
#[derive(Debug, Clone)]
pub struct ApplyUpdateResult {
    pub new_value: Value,
    pub did_change: bool,
}

/// Registered definition of one option's validate/compute/update behavior.
pub trait OptionDescriptor: Send + Sync {
    /// Stable identity; must equal this descriptor's registry position.
    fn id(&self) -> OptId;

    /// Raw-surface key, or `None` for derived options with no textual
    /// surface — their validator always receives `None`.
    fn name(&self) -> Option<&'static str>;

    /// Turn raw input into a typed, defaulted value. Total: malformed input
    /// resolves to the default, never to an error.
    fn validate(&self, input: Option<&Value>) -> OptionValue;

    /// Derive the final value from the environment, the results of earlier
    /// descriptors, and this option's validated value. Defaults to the
    /// validated value unchanged.
    fn compute(
        &self,
        env: &Environment,
        computed: &ComputedSoFar<'_>,
        value: &OptionValue,
    ) -> OptionValue {
        let _ = (env, computed);
        value.clone()
    }

    /// Merge a partial raw update into this option's current raw value.
    /// Defaults to [`merge_update`]: objects merge key-by-key, everything
    /// else replaces.
    fn apply_update(&self, old: Option<&Value>, update: &Value) -> ApplyUpdateResult {
        merge_update(old, update)
    }
}

/// Recursive raw-value merge. Objects merge key-by-key; arrays and scalars
/// replace, reporting a change only when the replacement differs.
#[must_use]
pub fn merge_update(old: Option<&Value>, update: &Value) -> ApplyUpdateResult {
    match (old, update) {
        (Some(Value::Object(old_map)), Value::Object(update_map)) => {
            let mut merged = old_map.clone();
            let mut did_change = false;
            for (key, update_value) in update_map {
                let result = merge_update(merged.get(key), update_value);
                if result.did_change {
                    merged.insert(key.clone(), result.new_value);
                    did_change = true;
                }
            }
            ApplyUpdateResult {
                new_value: Value::Object(merged),
                did_change,
            }
        }
        _ => ApplyUpdateResult {
            new_value: update.clone(),
            did_change: old != Some(update),
        },
    }
}

/// A registry construction defect.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("descriptor at position {position} carries id {id:?}; registry order must be id order")]
    Misordered { position: usize, id: OptId },

    #[error("duplicate option name {name:?}")]
    DuplicateName { name: &'static str },
}

/// Ordered, immutable collection of option descriptors.
pub struct OptionRegistry {
    descriptors: Vec<Box<dyn OptionDescriptor>>,
}

impl OptionRegistry {
    /// Build a registry, checking that descriptor ids are dense and in
    /// registration order and that no raw-surface name repeats.
    pub fn new(descriptors: Vec<Box<dyn OptionDescriptor>>) -> Result<Self, RegistryError> {
        let mut seen_names: Vec<&'static str> = Vec::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            if descriptor.id().index() != position {
                return Err(RegistryError::Misordered {
                    position,
                    id: descriptor.id(),
                });
            }
            if let Some(name) = descriptor.name() {
                if seen_names.contains(&name) {
                    return Err(RegistryError::DuplicateName { name });
                }
                seen_names.push(name);
            }
        }
        Ok(Self { descriptors })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn OptionDescriptor> {
        self.descriptors.iter().map(|descriptor| descriptor.as_ref())
    }

    /// Look up a descriptor by id.
    ///
    /// # Panics
    ///
    /// Panics on an unregistered id: a wiring defect.
    #[must_use]
    pub fn descriptor(&self, id: OptId) -> &dyn OptionDescriptor {
        self.descriptors
            .get(id.index())
            .unwrap_or_else(|| panic!("option {id:?} is not registered"))
            .as_ref()
    }
}

/// Dense validated values, one per registered option.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOptions {
    values: Vec<OptionValue>,
}

impl ValidatedOptions {
    /// Read the validated value of an option.
    ///
    /// # Panics
    ///
    /// Panics on an unregistered id: a wiring defect.
    #[must_use]
    pub fn read(&self, id: OptId) -> &OptionValue {
        self.values
            .get(id.index())
            .unwrap_or_else(|| panic!("option {id:?} is not registered"))
    }
}

/// Dense computed values — the only form the rest of the editor reads.
///
/// Published snapshots are never mutated, only replaced wholesale, so any
/// number of readers can hold one without coordination.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedOptions {
    values: Vec<OptionValue>,
}

impl ComputedOptions {
    /// Read one computed value.
    ///
    /// # Panics
    ///
    /// Panics on an unregistered id: a wiring defect.
    #[must_use]
    pub fn get(&self, id: OptId) -> &OptionValue {
        self.values
            .get(id.index())
            .unwrap_or_else(|| panic!("option {id:?} is not registered"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolved editor geometry.
    #[must_use]
    pub fn layout(&self) -> &crate::layout::LayoutInfo {
        self.get(OptId::LayoutInfo).expect_layout()
    }

    /// Resolved wrapping state.
    #[must_use]
    pub fn wrapping(&self) -> crate::layout::WrappingInfo {
        self.get(OptId::WrappingInfo).expect_wrapping()
    }

    /// Measured font metrics of this pass.
    #[must_use]
    pub fn font_info(&self) -> &crate::font::FontInfo {
        self.get(OptId::FontInfo).expect_font_info()
    }
}

/// Read access to the results already produced this pass.
pub struct ComputedSoFar<'a> {
    slots: &'a [Option<OptionValue>],
}

impl ComputedSoFar<'_> {
    /// Read the computed value of an earlier descriptor.
    ///
    /// # Panics
    ///
    /// Panics when `id` has not been written this pass (or is not
    /// registered). The registry order is misarranged; failing fast here is
    /// the only thing preventing a stale value from silently corrupting
    /// every option computed afterwards.
    #[must_use]
    pub fn get(&self, id: OptId) -> &OptionValue {
        self.slots
            .get(id.index())
            .unwrap_or_else(|| panic!("option {id:?} is not registered"))
            .as_ref()
            .unwrap_or_else(|| {
                panic!(
                    "option {id:?} was read before it was computed this pass; \
                     a descriptor may only depend on earlier registry entries"
                )
            })
    }
}

/// Produce validated values for every registered option.
///
/// Performs no interpretation itself: clamping and defaulting live entirely
/// in the descriptors, so this cannot fail on malformed input.
#[must_use]
pub fn validate(registry: &OptionRegistry, raw: &RawOptions) -> ValidatedOptions {
    let values = registry
        .iter()
        .map(|descriptor| descriptor.validate(descriptor.name().and_then(|name| raw.read(name))))
        .collect();
    ValidatedOptions { values }
}

/// Apply a partial raw update, option by option, mutating `raw` in place.
/// Returns whether anything actually changed.
pub fn apply_update(registry: &OptionRegistry, raw: &mut RawOptions, update: &RawOptions) -> bool {
    let mut changed = false;
    for descriptor in registry.iter() {
        let Some(name) = descriptor.name() else {
            continue;
        };
        let Some(update_value) = update.read(name) else {
            continue;
        };
        let result = descriptor.apply_update(raw.read(name), update_value);
        raw.write(name, result.new_value);
        changed = changed || result.did_change;
    }
    changed
}

/// Run the computation pass: descriptors in registry order, each seeing the
/// environment and everything computed before it.
#[must_use]
pub fn compute(
    registry: &OptionRegistry,
    validated: &ValidatedOptions,
    env: &Environment,
) -> ComputedOptions {
    let mut slots: Vec<Option<OptionValue>> = vec![None; registry.len()];
    for descriptor in registry.iter() {
        let id = descriptor.id();
        let value = {
            let so_far = ComputedSoFar { slots: &slots };
            descriptor.compute(env, &so_far, validated.read(id))
        };
        slots[id.index()] = Some(value);
    }
    let values = slots
        .into_iter()
        .map(|slot| slot.expect("every registered descriptor writes its own slot"))
        .collect();
    ComputedOptions { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ComputeMemory;
    use crate::font::FontInfo;
    use crate::value::{AccessibilitySupport, InputMode};
    use crate::validation::boolean_or;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FlagOption {
        id: OptId,
        name: &'static str,
        default: bool,
    }

    impl OptionDescriptor for FlagOption {
        fn id(&self) -> OptId {
            self.id
        }
        fn name(&self) -> Option<&'static str> {
            Some(self.name)
        }
        fn validate(&self, input: Option<&Value>) -> OptionValue {
            OptionValue::Bool(boolean_or(input, self.default))
        }
    }

    /// Computes the AND of the two flags before it.
    struct AndOption;

    impl OptionDescriptor for AndOption {
        fn id(&self) -> OptId {
            OptId::from_index(2).unwrap()
        }
        fn name(&self) -> Option<&'static str> {
            None
        }
        fn validate(&self, _input: Option<&Value>) -> OptionValue {
            OptionValue::Bool(false)
        }
        fn compute(
            &self,
            _env: &Environment,
            computed: &ComputedSoFar<'_>,
            _value: &OptionValue,
        ) -> OptionValue {
            let a = computed.get(OptId::from_index(0).unwrap()).expect_bool();
            let b = computed.get(OptId::from_index(1).unwrap()).expect_bool();
            OptionValue::Bool(a && b)
        }
    }

    /// Illegally reads its own (still unwritten) slot.
    struct SelfReader;

    impl OptionDescriptor for SelfReader {
        fn id(&self) -> OptId {
            OptId::from_index(0).unwrap()
        }
        fn name(&self) -> Option<&'static str> {
            None
        }
        fn validate(&self, _input: Option<&Value>) -> OptionValue {
            OptionValue::Bool(false)
        }
        fn compute(
            &self,
            _env: &Environment,
            computed: &ComputedSoFar<'_>,
            _value: &OptionValue,
        ) -> OptionValue {
            computed.get(OptId::from_index(0).unwrap()).clone()
        }
    }

    fn test_registry() -> OptionRegistry {
        OptionRegistry::new(vec![
            Box::new(FlagOption {
                id: OptId::from_index(0).unwrap(),
                name: "alpha",
                default: true,
            }),
            Box::new(FlagOption {
                id: OptId::from_index(1).unwrap(),
                name: "beta",
                default: false,
            }),
            Box::new(AndOption),
        ])
        .unwrap()
    }

    fn test_env() -> Environment {
        let spec = crate::font::FontSpec {
            family: "monospace".to_string(),
            weight: "normal".to_string(),
            size: 14.0,
            line_height: 21.0,
            letter_spacing: 0.0,
        };
        Environment {
            outer_width: 800.0,
            outer_height: 600.0,
            pixel_ratio: 1.0,
            zoom_factor: 1.0,
            font_info: FontInfo::estimate(&spec),
            accessibility_support: AccessibilitySupport::Unknown,
            tab_focus_mode: false,
            input_mode: InputMode::Insert,
            extra_class_name: String::new(),
            view_line_count: 1,
            line_numbers_digit_count: 1,
            is_dominated_by_long_lines: false,
            glyph_margin_decoration_lane_count: 1,
            memory: Rc::new(RefCell::new(ComputeMemory::new())),
        }
    }

    #[test]
    fn validate_defaults_absent_and_malformed_input() {
        let registry = test_registry();
        let validated = validate(
            &registry,
            &RawOptions::from_value(json!({ "beta": "true", "junk": 3 })),
        );
        assert!(validated.read(OptId::from_index(0).unwrap()).expect_bool());
        assert!(validated.read(OptId::from_index(1).unwrap()).expect_bool());
    }

    #[test]
    fn compute_sees_earlier_results() {
        let registry = test_registry();
        let validated = validate(
            &registry,
            &RawOptions::from_value(json!({ "alpha": true, "beta": true })),
        );
        let computed = compute(&registry, &validated, &test_env());
        assert!(computed.get(OptId::from_index(2).unwrap()).expect_bool());
    }

    #[test]
    #[should_panic(expected = "read before it was computed this pass")]
    fn reading_an_unwritten_slot_faults() {
        let registry = OptionRegistry::new(vec![Box::new(SelfReader)]).unwrap();
        let validated = validate(&registry, &RawOptions::new());
        let _ = compute(&registry, &validated, &test_env());
    }

    #[test]
    fn misordered_registry_is_rejected() {
        let result = OptionRegistry::new(vec![Box::new(FlagOption {
            id: OptId::from_index(1).unwrap(),
            name: "alpha",
            default: true,
        })]);
        assert!(matches!(
            result,
            Err(RegistryError::Misordered { position: 0, .. })
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = OptionRegistry::new(vec![
            Box::new(FlagOption {
                id: OptId::from_index(0).unwrap(),
                name: "alpha",
                default: true,
            }),
            Box::new(FlagOption {
                id: OptId::from_index(1).unwrap(),
                name: "alpha",
                default: false,
            }),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateName { .. })));
    }

    #[test]
    fn merge_update_replaces_scalars() {
        let result = merge_update(Some(&json!("off")), &json!("on"));
        assert!(result.did_change);
        assert_eq!(result.new_value, json!("on"));

        let result = merge_update(Some(&json!("on")), &json!("on"));
        assert!(!result.did_change);
    }

    #[test]
    fn merge_update_merges_objects_key_by_key() {
        let old = json!({ "enabled": "on", "delay": 300 });
        let result = merge_update(Some(&old), &json!({ "enabled": "off" }));
        assert!(result.did_change);
        assert_eq!(result.new_value, json!({ "enabled": "off", "delay": 300 }));

        let result = merge_update(Some(&old), &json!({ "enabled": "on" }));
        assert!(!result.did_change);
        assert_eq!(result.new_value, old);
    }

    #[test]
    fn merge_update_replaces_arrays_wholesale() {
        let result = merge_update(Some(&json!([1, 2])), &json!([1, 2]));
        assert!(!result.did_change);
        let result = merge_update(Some(&json!([1, 2])), &json!([2, 1]));
        assert!(result.did_change);
        assert_eq!(result.new_value, json!([2, 1]));
    }

    #[test]
    fn apply_update_reports_overall_change() {
        let registry = test_registry();
        let mut raw = RawOptions::from_value(json!({ "alpha": true }));
        assert!(!apply_update(
            &registry,
            &mut raw,
            &RawOptions::from_value(json!({ "alpha": true }))
        ));
        assert!(apply_update(
            &registry,
            &mut raw,
            &RawOptions::from_value(json!({ "alpha": false, "beta": false }))
        ));
        assert_eq!(raw.read("alpha"), Some(&json!(false)));
        // `beta` was absent before; writing the default-equal value is still
        // a change to the raw store.
        assert_eq!(raw.read("beta"), Some(&json!(false)));
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn reading_unregistered_id_faults() {
        let registry = test_registry();
        let validated = validate(&registry, &RawOptions::new());
        let _ = validated.read(OptId::from_index(10).unwrap());
    }
}
