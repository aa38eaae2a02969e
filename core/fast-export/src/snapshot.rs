//! FILENAME: core/fast-export/src/snapshot.rs
//! PURPOSE: Per-element cache of dynamic style snapshots.
//! CONTEXT: A snapshot holds the computed values of an element's dynamic keys
//! plus the fingerprint they were read at. While the fingerprint does not
//! move, the cached `Rc` is handed out again and computed styles are not read.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use report_model::{ComputedStyles, ElementId, Fingerprint, StyleKey, StyleValue};

/// Values of an element's dynamic style keys at one point in the run.
/// Equality and hashing look at the values only, never the fingerprint.
#[derive(Debug, Clone, Default)]
pub struct StyleSnapshot {
    pairs: SmallVec<[(StyleKey, StyleValue); 4]>,
    fingerprint: Fingerprint,
}

impl StyleSnapshot {
    /// Reads the current values of `keys` for an element.
    pub fn capture<S>(id: ElementId, keys: &[StyleKey], styles: &S) -> Self
    where
        S: ComputedStyles + ?Sized,
    {
        StyleSnapshot {
            pairs: keys.iter().map(|key| (*key, styles.value(id, *key))).collect(),
            fingerprint: styles.fingerprint(id),
        }
    }

    pub fn get(&self, key: StyleKey) -> Option<&StyleValue> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn pairs(&self) -> &[(StyleKey, StyleValue)] {
        &self.pairs
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// False only when the snapshot carries `visible = false`.
    pub fn is_visible(&self) -> bool {
        self.get(StyleKey::Visible)
            .and_then(StyleValue::as_bool)
            .unwrap_or(true)
    }
}

impl PartialEq for StyleSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Eq for StyleSnapshot {}

impl Hash for StyleSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pairs.hash(state);
    }
}

// ============================================================================
// CHANGE CACHE
// ============================================================================

/// Last snapshot per element for one export run.
#[derive(Debug, Default)]
pub struct StyleChangeCache {
    entries: FxHashMap<ElementId, Rc<StyleSnapshot>>,
    empty: Rc<StyleSnapshot>,
    hits: usize,
    misses: usize,
}

impl StyleChangeCache {
    pub fn new() -> Self {
        StyleChangeCache::default()
    }

    /// Current snapshot of the element's dynamic keys.
    ///
    /// With no dynamic keys the shared empty snapshot is returned and the
    /// computed styles are not consulted at all. Otherwise the cached
    /// snapshot is reused while its fingerprint matches the current one.
    pub fn snapshot<S>(&mut self, id: ElementId, keys: &[StyleKey], styles: &S) -> Rc<StyleSnapshot>
    where
        S: ComputedStyles + ?Sized,
    {
        if keys.is_empty() {
            return Rc::clone(&self.empty);
        }

        let current = styles.fingerprint(id);
        if let Some(cached) = self.entries.get(&id) {
            if cached.fingerprint == current {
                self.hits += 1;
                return Rc::clone(cached);
            }
        }

        self.misses += 1;
        let fresh = Rc::new(StyleSnapshot::capture(id, keys, styles));
        self.entries.insert(id, Rc::clone(&fresh));
        fresh
    }

    /// The shared snapshot handed out for elements without dynamic keys.
    pub fn empty(&self) -> Rc<StyleSnapshot> {
        Rc::clone(&self.empty)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
