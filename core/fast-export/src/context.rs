//! FILENAME: core/fast-export/src/context.rs
//! PURPOSE: Read-only view of the run state handed to templates with each band.

use report_model::{ComputedStyles, Content, DataRow, ElementId, LeafElement, StyleKey, Value};

use crate::analyzer::AnalysisStash;

#[derive(Clone, Copy)]
pub struct RuntimeContext<'a> {
    /// The current data row (an empty row outside the details section of an
    /// empty scope).
    pub data_row: &'a DataRow,
    /// Zero-based index of `data_row` within its scope.
    pub row_number: usize,
    pub styles: &'a dyn ComputedStyles,
    pub analysis: &'a AnalysisStash,
}

impl<'a> RuntimeContext<'a> {
    pub fn new(
        data_row: &'a DataRow,
        row_number: usize,
        styles: &'a dyn ComputedStyles,
        analysis: &'a AnalysisStash,
    ) -> Self {
        RuntimeContext {
            data_row,
            row_number,
            styles,
            analysis,
        }
    }

    /// Dynamic keys of `element` within the root band `root`.
    pub fn dynamic_keys(&self, root: ElementId, element: ElementId) -> &'a [StyleKey] {
        self.analysis.keys_for(root, element)
    }

    /// Current value displayed by a leaf element.
    pub fn value_of(&self, leaf: &LeafElement) -> Value {
        match &leaf.content {
            Content::Label(text) => Value::Text(text.clone()),
            Content::Field(field) => self.data_row.get(field).clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_model::{Bounds, ComputedStyleTable};

    #[test]
    fn test_value_of_resolves_fields_against_row() {
        let row = DataRow::new().with("amount", 12.5);
        let styles = ComputedStyleTable::new();
        let stash = AnalysisStash::new();
        let ctx = RuntimeContext::new(&row, 0, &styles, &stash);

        let field = LeafElement::field(ElementId(1), Bounds::default(), "amount");
        let missing = LeafElement::field(ElementId(2), Bounds::default(), "qty");
        let label = LeafElement::label(ElementId(3), Bounds::default(), "Total");

        assert_eq!(ctx.value_of(&field), Value::Number(12.5));
        assert_eq!(ctx.value_of(&missing), Value::Empty);
        assert_eq!(ctx.value_of(&label), Value::text("Total"));
    }
}
