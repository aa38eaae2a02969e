//! FILENAME: core/report-model/src/computed.rs
//! PURPOSE: Run-time computed styles with a per-element change fingerprint.
//! CONTEXT: The host evaluates style expressions per row and writes the results
//! here. Each write that changes a value bumps the element's fingerprint, so
//! consumers can tell "nothing changed" without comparing values.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::element::{Band, Element, ElementId};
use crate::report::Report;
use crate::style::{StyleKey, StyleSheet, StyleValue};

/// Monotonically increasing change counter of one element's computed style.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Fingerprint(pub u64);

/// Read access to computed styles, as seen by the export pipeline.
pub trait ComputedStyles {
    /// Current fingerprint of the element's computed style.
    fn fingerprint(&self, id: ElementId) -> Fingerprint;

    /// Current computed value of `key` for the element.
    fn value(&self, id: ElementId, key: StyleKey) -> StyleValue;
}

#[derive(Debug, Clone, Default)]
struct ComputedEntry {
    values: BTreeMap<StyleKey, StyleValue>,
    fingerprint: Fingerprint,
}

/// Computed styles of every element of a report tree.
#[derive(Debug, Clone, Default)]
pub struct ComputedStyleTable {
    entries: HashMap<ElementId, ComputedEntry>,
}

impl ComputedStyleTable {
    pub fn new() -> Self {
        ComputedStyleTable::default()
    }

    /// Seeds the table with the design styles of every element reachable from
    /// the report, including sub-report definitions.
    pub fn from_report(report: &Report) -> Self {
        let mut table = ComputedStyleTable::new();
        table.register_report(report);
        table
    }

    pub fn register_report(&mut self, report: &Report) {
        for band in report.root_bands() {
            self.register_band(band);
        }
    }

    pub fn register_band(&mut self, band: &Band) {
        self.register(band.id, &band.style);
        for child in &band.children {
            match child {
                Element::Band(inner) => self.register_band(inner),
                Element::Leaf(leaf) => self.register(leaf.id, &leaf.style),
                Element::SubReport(sub) => self.register_report(&sub.report),
            }
        }
        for sub in &band.subreports {
            self.register_report(&sub.report);
        }
    }

    /// Seeds one element. Re-registering resets values but keeps the
    /// fingerprint moving forward.
    pub fn register(&mut self, id: ElementId, style: &StyleSheet) {
        let entry = self.entries.entry(id).or_default();
        let values: BTreeMap<StyleKey, StyleValue> =
            style.defined().map(|(k, v)| (k, v.clone())).collect();
        if entry.values != values {
            entry.values = values;
            entry.fingerprint.0 += 1;
        }
    }

    /// Sets a computed value. Returns true (and bumps the fingerprint) only
    /// when the value actually changed.
    pub fn set(&mut self, id: ElementId, key: StyleKey, value: StyleValue) -> bool {
        let entry = self.entries.entry(id).or_default();
        let current = entry
            .values
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_value());
        if current == value {
            return false;
        }
        entry.values.insert(key, value);
        entry.fingerprint.0 += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ComputedStyles for ComputedStyleTable {
    fn fingerprint(&self, id: ElementId) -> Fingerprint {
        self.entries
            .get(&id)
            .map(|e| e.fingerprint)
            .unwrap_or_default()
    }

    fn value(&self, id: ElementId, key: StyleKey) -> StyleValue {
        self.entries
            .get(&id)
            .and_then(|e| e.values.get(&key))
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }
}
