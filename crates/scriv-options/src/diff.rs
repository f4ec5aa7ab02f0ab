#![forbid(unsafe_code)]

//! Change detection between two computed snapshots.
//!
//! Equality is structural all the way down (`OptionValue` is a closed tree
//! of plain data), so a per-id `!=` is exactly the deep comparison the
//! engine needs. `diff` returns `None` when nothing differs, letting callers
//! skip notification without allocating.

use crate::id::OptId;
use crate::registry::ComputedOptions;

/// Which options' computed values differ between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    changed: Vec<bool>,
}

impl ChangeSet {
    /// Whether the given option changed.
    ///
    /// # Panics
    ///
    /// Panics on an unregistered id: a wiring defect.
    #[must_use]
    pub fn has_changed(&self, id: OptId) -> bool {
        *self
            .changed
            .get(id.index())
            .unwrap_or_else(|| panic!("option {id:?} is not registered"))
    }

    /// Number of options that changed.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.changed.iter().filter(|c| **c).count()
    }

    /// Ids of the options that changed, in registry order.
    pub fn changed_ids(&self) -> impl Iterator<Item = OptId> + '_ {
        self.changed
            .iter()
            .enumerate()
            .filter(|(_, changed)| **changed)
            .filter_map(|(index, _)| OptId::from_index(index))
    }
}

/// Compare two snapshots. Returns `None` when they are identical.
///
/// # Panics
///
/// Panics when the snapshots come from registries of different sizes — they
/// are not comparable, and that is a wiring defect.
#[must_use]
pub fn diff(old: &ComputedOptions, new: &ComputedOptions) -> Option<ChangeSet> {
    assert_eq!(
        old.len(),
        new.len(),
        "computed snapshots from different registries are not comparable"
    );
    let mut changed = vec![false; old.len()];
    let mut something_changed = false;
    for index in 0..old.len() {
        let id = OptId::from_index(index)
            .unwrap_or_else(|| panic!("snapshot index {index} has no registered option id"));
        if old.get(id) != new.get(id) {
            changed[index] = true;
            something_changed = true;
        }
    }
    if something_changed {
        Some(ChangeSet { changed })
    } else {
        None
    }
}
