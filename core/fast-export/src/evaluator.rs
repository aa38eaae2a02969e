//! FILENAME: core/fast-export/src/evaluator.rs
//! PURPOSE: Evaluates the allow-listed style expressions for the current row.
//! CONTEXT: Host side of the pipeline. Results are written to the
//! `ComputedStyleTable`, which bumps fingerprints only on real changes; the
//! templates never evaluate anything themselves.

use rustc_hash::FxHashMap;

use report_model::{
    Attributes, Band, ComputedStyleTable, Content, DataRow, Element, ElementId, Expression,
    LeafElement, StyleExpression, StyleKey, StyleSheet, StyleValue, Value, CORE_NAMESPACE,
    ONLY_SHOW_CHANGING_VALUES,
};

use crate::conf::ROW_BANDING_FUNCTION;

/// Row-banding property holding the band color.
pub const BANDING_COLOR_PROPERTY: &str = "color";
/// Row-banding property holding the number of rows per band.
pub const BANDING_SIZE_PROPERTY: &str = "numberOfElements";

/// Value of a row-banding expression for a row: the configured color on odd
/// bands, the element's design value otherwise.
pub fn row_banding_value(
    expression: &Expression,
    key: StyleKey,
    design_value: StyleValue,
    row_number: usize,
) -> StyleValue {
    let size = expression
        .property(BANDING_SIZE_PROPERTY)
        .and_then(|text| text.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    if (row_number / size) % 2 == 0 {
        return design_value;
    }
    expression
        .property(BANDING_COLOR_PROPERTY)
        .and_then(|text| key.parse_value(text))
        .unwrap_or(design_value)
}

#[derive(Debug, Default)]
pub struct StyleEvaluator {
    previous: FxHashMap<ElementId, Value>,
}

impl StyleEvaluator {
    pub fn new() -> Self {
        StyleEvaluator::default()
    }

    /// Forgets the last shown values, so the next row shows every value
    /// again. Called when a group starts.
    pub fn reset_changing_values(&mut self) {
        self.previous.clear();
    }

    /// Evaluates the band and everything below it except sub-reports.
    pub fn evaluate_band(
        &mut self,
        band: &Band,
        row: &DataRow,
        row_number: usize,
        styles: &mut ComputedStyleTable,
    ) {
        evaluate_expressions(band.id, &band.style, &band.style_expressions, row_number, styles);
        for child in &band.children {
            match child {
                Element::Band(inner) => self.evaluate_band(inner, row, row_number, styles),
                Element::Leaf(leaf) => self.evaluate_leaf(leaf, row, row_number, styles),
                Element::SubReport(_) => {}
            }
        }
    }

    fn evaluate_leaf(
        &mut self,
        leaf: &LeafElement,
        row: &DataRow,
        row_number: usize,
        styles: &mut ComputedStyleTable,
    ) {
        evaluate_expressions(leaf.id, &leaf.style, &leaf.style_expressions, row_number, styles);
        if shows_changing_values_only(&leaf.attributes) {
            let current = match &leaf.content {
                Content::Field(field) => row.get(field).clone(),
                Content::Label(text) => Value::Text(text.clone()),
            };
            let changed = self.previous.get(&leaf.id) != Some(&current);
            styles.set(leaf.id, StyleKey::Visible, StyleValue::Bool(changed));
            self.previous.insert(leaf.id, current);
        }
    }
}

fn shows_changing_values_only(attributes: &Attributes) -> bool {
    attributes.is_true(CORE_NAMESPACE, ONLY_SHOW_CHANGING_VALUES)
}

fn evaluate_expressions(
    id: ElementId,
    style: &StyleSheet,
    expressions: &[StyleExpression],
    row_number: usize,
    styles: &mut ComputedStyleTable,
) {
    for expr in expressions {
        // Unknown keys were rejected by the analyzer; other types by the gate.
        let Some(key) = StyleKey::from_name(&expr.style_key) else {
            continue;
        };
        if expr.expression.type_name != ROW_BANDING_FUNCTION {
            continue;
        }
        let value = row_banding_value(&expr.expression, key, style.get(key), row_number);
        styles.set(id, key, value);
    }
}
