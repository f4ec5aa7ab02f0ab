#![forbid(unsafe_code)]

//! Backward-compatibility rewrites of deprecated raw keys.
//!
//! Rules run in registration order on every raw-options ingestion — initial
//! construction and every update — before validation. They mutate the raw
//! tree in place, return nothing, and never fail: unknown or absent keys are
//! no-ops.
//!
//! # Invariants
//!
//! 1. Idempotent: running the whole set twice equals running it once.
//! 2. Non-destructive: a canonical key the user already set is never
//!    overwritten by a rewrite of its deprecated sibling.

use std::sync::OnceLock;

use serde_json::{Value, json};
use tracing::trace;

use crate::raw::RawOptions;

/// Path-addressed access to the raw tree for one rule invocation.
pub struct MigrationScope<'a> {
    raw: &'a mut RawOptions,
    key: &'static str,
}

impl MigrationScope<'_> {
    /// The current value of the rule's own key.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        self.raw.read(self.key).cloned()
    }

    /// Read any dotted path; `None` for absent paths.
    #[must_use]
    pub fn read(&self, path: &str) -> Option<Value> {
        self.raw.read(path).cloned()
    }

    /// Write any dotted path, creating intermediate objects.
    pub fn write(&mut self, path: &str, value: Value) {
        self.raw.write(path, value);
    }

    /// Remove any dotted path.
    pub fn remove(&mut self, path: &str) {
        self.raw.remove(path);
    }
}

/// One registered rewrite rule.
pub struct SettingMigration {
    key: &'static str,
    migrate: Box<dyn Fn(&mut MigrationScope<'_>) + Send + Sync>,
}

impl SettingMigration {
    /// Register a rule for one deprecated key. The callback receives a
    /// [`MigrationScope`] addressing the whole raw tree.
    pub fn new(
        key: &'static str,
        migrate: impl Fn(&mut MigrationScope<'_>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            migrate: Box::new(migrate),
        }
    }

    /// Rule that replaces the key's value on exact match against
    /// `(old, new)` pairs — the boolean→enum shorthand conversions.
    pub fn value_mapping(key: &'static str, pairs: Vec<(Value, Value)>) -> Self {
        Self::new(key, move |scope| {
            let Some(current) = scope.value() else {
                return;
            };
            if let Some((_, new)) = pairs.iter().find(|(old, _)| *old == current) {
                scope.write(key, new.clone());
            }
        })
    }

    fn apply(&self, raw: &mut RawOptions) {
        let mut scope = MigrationScope { raw, key: self.key };
        (self.migrate)(&mut scope);
    }
}

fn migrations() -> &'static [SettingMigration] {
    static MIGRATIONS: OnceLock<Vec<SettingMigration>> = OnceLock::new();
    MIGRATIONS.get_or_init(|| {
        vec![
            SettingMigration::value_mapping(
                "wordWrap",
                vec![(json!(true), json!("on")), (json!(false), json!("off"))],
            ),
            SettingMigration::value_mapping(
                "lineNumbers",
                vec![(json!(true), json!("on")), (json!(false), json!("off"))],
            ),
            SettingMigration::value_mapping(
                "cursorBlinking",
                vec![(json!("visible"), json!("solid"))],
            ),
            SettingMigration::value_mapping(
                "matchBrackets",
                vec![(json!(true), json!("always")), (json!(false), json!("never"))],
            ),
            SettingMigration::value_mapping(
                "renderWhitespace",
                vec![(json!(true), json!("all")), (json!(false), json!("none"))],
            ),
            SettingMigration::value_mapping(
                "hover",
                vec![
                    (json!(true), json!({ "enabled": "on" })),
                    (json!(false), json!({ "enabled": "off" })),
                ],
            ),
            SettingMigration::value_mapping(
                "parameterHints",
                vec![
                    (json!(true), json!({ "enabled": true })),
                    (json!(false), json!({ "enabled": false })),
                ],
            ),
            // `autoClosingBrackets: false` used to silence quotes and
            // surround as well; spell that out, without clobbering values
            // the user set explicitly.
            SettingMigration::new("autoClosingBrackets", |scope| {
                if scope.value() == Some(Value::Bool(false)) {
                    scope.write("autoClosingBrackets", json!("never"));
                    if scope.read("autoClosingQuotes").is_none() {
                        scope.write("autoClosingQuotes", json!("never"));
                    }
                    if scope.read("autoSurround").is_none() {
                        scope.write("autoSurround", json!("never"));
                    }
                }
            }),
            // The legacy `suggest.filteredTypes` record became individual
            // `suggest.show*` switches.
            SettingMigration::new("suggest.filteredTypes", |scope| {
                let Some(Value::Object(filtered)) = scope.value() else {
                    return;
                };
                let renames = [
                    ("keyword", "suggest.showKeywords"),
                    ("snippet", "suggest.showSnippets"),
                    ("text", "suggest.showWords"),
                ];
                for (old_field, new_path) in renames {
                    if filtered.get(old_field) == Some(&Value::Bool(false))
                        && scope.read(new_path).is_none()
                    {
                        scope.write(new_path, json!(false));
                    }
                }
                scope.remove("suggest.filteredTypes");
            }),
        ]
    })
}

/// Run a rule set over `raw`, in registration order.
pub fn run_migrations(rules: &[SettingMigration], raw: &mut RawOptions) {
    for migration in rules {
        let before = raw.read(migration.key).cloned();
        migration.apply(raw);
        if raw.read(migration.key).cloned() != before {
            trace!(key = migration.key, "migrated deprecated option value");
        }
    }
}

/// Rewrite deprecated keys in `raw` into canonical form, in place, using
/// the built-in rule table.
pub fn migrate_options(raw: &mut RawOptions) {
    run_migrations(migrations(), raw);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn migrated(value: Value) -> RawOptions {
        let mut raw = RawOptions::from_value(value);
        migrate_options(&mut raw);
        raw
    }

    #[test]
    fn word_wrap_boolean_becomes_enum() {
        assert_eq!(
            migrated(json!({ "wordWrap": true })).read("wordWrap"),
            Some(&json!("on"))
        );
        assert_eq!(
            migrated(json!({ "wordWrap": false })).read("wordWrap"),
            Some(&json!("off"))
        );
        // Canonical spellings pass through untouched.
        assert_eq!(
            migrated(json!({ "wordWrap": "bounded" })).read("wordWrap"),
            Some(&json!("bounded"))
        );
    }

    #[test]
    fn hover_boolean_becomes_object() {
        assert_eq!(
            migrated(json!({ "hover": true })).read("hover"),
            Some(&json!({ "enabled": "on" }))
        );
        assert_eq!(
            migrated(json!({ "hover": false })).read("hover"),
            Some(&json!({ "enabled": "off" }))
        );
    }

    #[test]
    fn cursor_blinking_rename() {
        assert_eq!(
            migrated(json!({ "cursorBlinking": "visible" })).read("cursorBlinking"),
            Some(&json!("solid"))
        );
    }

    #[test]
    fn auto_closing_brackets_false_fans_out() {
        let raw = migrated(json!({ "autoClosingBrackets": false }));
        assert_eq!(raw.read("autoClosingBrackets"), Some(&json!("never")));
        assert_eq!(raw.read("autoClosingQuotes"), Some(&json!("never")));
        assert_eq!(raw.read("autoSurround"), Some(&json!("never")));
    }

    #[test]
    fn auto_closing_brackets_does_not_clobber_user_values() {
        let raw = migrated(json!({
            "autoClosingBrackets": false,
            "autoClosingQuotes": "always"
        }));
        assert_eq!(raw.read("autoClosingQuotes"), Some(&json!("always")));
        assert_eq!(raw.read("autoSurround"), Some(&json!("never")));
    }

    #[test]
    fn filtered_types_record_becomes_switches() {
        let raw = migrated(json!({
            "suggest": { "filteredTypes": { "keyword": false, "snippet": true } }
        }));
        assert_eq!(raw.read("suggest.showKeywords"), Some(&json!(false)));
        // `snippet: true` matches the default; no switch is written.
        assert_eq!(raw.read("suggest.showSnippets"), None);
        assert_eq!(raw.read("suggest.filteredTypes"), None);
    }

    #[test]
    fn filtered_types_respects_existing_switch() {
        let raw = migrated(json!({
            "suggest": {
                "filteredTypes": { "keyword": false },
                "showKeywords": true
            }
        }));
        assert_eq!(raw.read("suggest.showKeywords"), Some(&json!(true)));
    }

    #[test]
    fn migration_is_idempotent() {
        let inputs = [
            json!({ "wordWrap": true, "hover": false, "cursorBlinking": "visible" }),
            json!({ "autoClosingBrackets": false }),
            json!({ "suggest": { "filteredTypes": { "keyword": false } } }),
            json!({ "lineNumbers": true, "matchBrackets": false, "renderWhitespace": true }),
        ];
        for input in inputs {
            let once = migrated(input.clone());
            let mut twice = once.clone();
            migrate_options(&mut twice);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn unknown_and_absent_keys_are_no_ops() {
        let raw = migrated(json!({ "unknownOption": { "deeply": [1, 2, 3] } }));
        assert_eq!(raw.read("unknownOption"), Some(&json!({ "deeply": [1, 2, 3] })));
        let empty = migrated(json!({}));
        assert!(empty.is_empty());
    }
}
