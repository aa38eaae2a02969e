//! FILENAME: core/fast-export/src/analyzer.rs
//! PURPOSE: One-time analysis of which style keys change per data row.
//! CONTEXT: Runs once per root band before any event fires. The result is
//! kept in a run-scoped `AnalysisStash` keyed by the root band id; the report
//! tree itself is never annotated.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use report_model::{
    Band, Element, ElementId, Report, StyleExpression, StyleKey, Attributes, CORE_NAMESPACE,
    ONLY_SHOW_CHANGING_VALUES,
};

use crate::conf::ROW_BANDING_FUNCTION;
use crate::error::{ExportError, ExportResult};
use crate::evaluator::BANDING_COLOR_PROPERTY;
use crate::logging::CATEGORY;

/// Element id -> sorted set of style keys recomputed per row.
/// Elements without dynamic keys are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicStyleSet {
    keys: FxHashMap<ElementId, SmallVec<[StyleKey; 4]>>,
}

impl DynamicStyleSet {
    /// Dynamic keys of an element, in key order. Empty when it has none.
    pub fn keys_for(&self, id: ElementId) -> &[StyleKey] {
        self.keys.get(&id).map(|keys| keys.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.keys.contains_key(&id)
    }

    /// Number of elements with at least one dynamic key.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn add(&mut self, id: ElementId, key: StyleKey) {
        let keys = self.keys.entry(id).or_default();
        if let Err(pos) = keys.binary_search(&key) {
            keys.insert(pos, key);
        }
    }
}

/// Analyzes one root band depth-first. Sub-reports are not entered; their
/// own root bands are analyzed separately.
pub fn analyze(root: &Band) -> ExportResult<DynamicStyleSet> {
    let mut set = DynamicStyleSet::default();
    analyze_band(root, &mut set)?;
    Ok(set)
}

fn analyze_band(band: &Band, set: &mut DynamicStyleSet) -> ExportResult<()> {
    analyze_element(band.id, &band.attributes, &band.style_expressions, set)?;
    for child in &band.children {
        match child {
            Element::Band(inner) => analyze_band(inner, set)?,
            Element::Leaf(leaf) => {
                analyze_element(leaf.id, &leaf.attributes, &leaf.style_expressions, set)?
            }
            Element::SubReport(_) => {}
        }
    }
    Ok(())
}

fn analyze_element(
    id: ElementId,
    attributes: &Attributes,
    expressions: &[StyleExpression],
    set: &mut DynamicStyleSet,
) -> ExportResult<()> {
    if attributes.is_true(CORE_NAMESPACE, ONLY_SHOW_CHANGING_VALUES) {
        set.add(id, StyleKey::Visible);
    }
    for expr in expressions {
        let key = StyleKey::from_name(&expr.style_key).ok_or_else(|| {
            ExportError::UnknownStyleKey {
                element: id,
                key: expr.style_key.clone(),
            }
        })?;
        warn_unusable_banding_value(id, key, expr);
        set.add(id, key);
    }
    Ok(())
}

/// Row banding falls back to the design value when its configured value does
/// not parse for the key; report that once per run instead of per row.
fn warn_unusable_banding_value(id: ElementId, key: StyleKey, expr: &StyleExpression) {
    if expr.expression.type_name != ROW_BANDING_FUNCTION {
        return;
    }
    if let Some(text) = expr.expression.property(BANDING_COLOR_PROPERTY) {
        if key.parse_value(text).is_none() {
            log_warn!(
                CATEGORY,
                "row banding value '{}' of element {} is not a valid {}; design value is kept",
                text,
                id,
                key.name()
            );
        }
    }
}

// ============================================================================
// RUN-SCOPED STASH
// ============================================================================

/// Analysis results of one export run, keyed by root band id.
/// Written before processing starts, read-only afterwards.
#[derive(Debug, Default)]
pub struct AnalysisStash {
    sets: FxHashMap<ElementId, DynamicStyleSet>,
}

impl AnalysisStash {
    pub fn new() -> Self {
        AnalysisStash::default()
    }

    /// Analyzes every root band of the report and of its banded sub-reports.
    pub fn prepare(&mut self, report: &Report) -> ExportResult<()> {
        for band in report.root_bands() {
            self.store(band)?;
            for sub in &band.subreports {
                self.prepare(&sub.report)?;
            }
        }
        log_debug!(
            CATEGORY,
            "analyzed report '{}': {} root band(s) stashed",
            report.name,
            self.sets.len()
        );
        Ok(())
    }

    /// Analyzes one root band and replaces any earlier result for it.
    pub fn store(&mut self, root: &Band) -> ExportResult<&DynamicStyleSet> {
        let set = analyze(root)?;
        let slot = self.sets.entry(root.id).or_default();
        *slot = set;
        Ok(slot)
    }

    pub fn get(&self, root: ElementId) -> Option<&DynamicStyleSet> {
        self.sets.get(&root)
    }

    /// Dynamic keys of `element` inside the root band `root`.
    pub fn keys_for(&self, root: ElementId, element: ElementId) -> &[StyleKey] {
        self.sets
            .get(&root)
            .map(|set| set.keys_for(element))
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
