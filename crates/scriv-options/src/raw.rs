#![forbid(unsafe_code)]

//! The loosely-typed raw options tree.
//!
//! Raw options arrive from the embedder as arbitrary JSON-shaped data:
//! booleans, numbers, strings, and nested objects keyed by dotted option
//! paths. [`RawOptions`] wraps that tree and provides the explicit
//! path-segment navigation the migration engine and validator rely on —
//! reads of absent paths return `None` without failing, writes lazily create
//! intermediate objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mutable, untyped configuration tree.
///
/// Cloning produces the deep copy the controller uses to isolate itself from
/// later caller mutation. Serializes transparently as the underlying object,
/// so embedders can round-trip raw options through any serde format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOptions {
    root: Map<String, Value>,
}

impl RawOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any JSON value. Anything but an object becomes the empty
    /// tree — a non-object configuration carries no readable keys.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(root) => Self { root },
            _ => Self::default(),
        }
    }

    /// The underlying object, for inspection.
    #[must_use]
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.root
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Read the value at a dotted path, or `None` if any segment is absent
    /// or a non-object is traversed.
    #[must_use]
    pub fn read(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let value = current.get(segment)?;
            if segments.peek().is_none() {
                return Some(value);
            }
            current = value.as_object()?;
        }
        None
    }

    /// Write a value at a dotted path, creating intermediate objects as
    /// needed. An intermediate that exists but is not an object is replaced
    /// by one — the old scalar was unreachable through this path anyway.
    pub fn write(&mut self, path: &str, value: Value) {
        let mut current = &mut self.root;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value);
                return;
            }
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = entry
                .as_object_mut()
                .expect("entry was just ensured to be an object");
        }
    }

    /// Remove the value at a dotted path, if present. Empty intermediate
    /// objects are left in place; they read back as absent leaves.
    pub fn remove(&mut self, path: &str) {
        let Some((parent_path, leaf)) = path.rsplit_once('.') else {
            self.root.remove(path);
            return;
        };
        let mut current = &mut self.root;
        for segment in parent_path.split('.') {
            match current.get_mut(segment).and_then(Value::as_object_mut) {
                Some(next) => current = next,
                None => return,
            }
        }
        current.remove(leaf);
    }

    /// Insert a value under a top-level key, replacing any previous value.
    pub fn set_top_level(&mut self, key: &str, value: Value) {
        self.root.insert(key.to_string(), value);
    }

    /// Top-level keys present in the tree, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }
}
