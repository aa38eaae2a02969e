//! FILENAME: core/fast-export/src/placeholder.rs
//! PURPOSE: Builds the CSV placeholder template of one band.
//! CONTEXT: A band template is a flat token list: one token per grid cell and
//! a line end per grid row. Placeholders name the element whose current value
//! fills the field, so the same template serves every row until the band's
//! dynamic styles change.

use std::fmt::Write as _;

use report_model::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateToken {
    /// An empty field.
    Separator,
    /// A field filled with the element's current value.
    Placeholder(ElementId),
    LineEnd,
}

/// What a grid cell holds, as far as CSV output is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCell {
    /// Span origin of an element with content.
    Content(ElementId),
    /// Span origin of an element without content (decoration).
    Decoration(ElementId),
    Covered,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BandTemplate {
    tokens: Vec<TemplateToken>,
    filled_rows: usize,
    finished_rows: usize,
}

impl BandTemplate {
    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    /// Rows appended to the template.
    pub fn filled_rows(&self) -> usize {
        self.filled_rows
    }

    /// Rows in which at least one element originates.
    pub fn finished_rows(&self) -> usize {
        self.finished_rows
    }

    pub fn placeholders(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            TemplateToken::Placeholder(id) => Some(*id),
            _ => None,
        })
    }

    /// Text form with fields joined by `separator` and placeholders written
    /// as `{id}`. Used for diagnostics.
    pub fn render(&self, separator: char) -> String {
        let mut out = String::new();
        let mut record_open = false;
        for token in &self.tokens {
            match token {
                TemplateToken::LineEnd => {
                    out.push('\n');
                    record_open = false;
                    continue;
                }
                _ if record_open => out.push(separator),
                _ => {}
            }
            if let TemplateToken::Placeholder(id) = token {
                let _ = write!(out, "{{{}}}", id.0);
            }
            record_open = true;
        }
        out
    }
}

#[derive(Debug, Default)]
pub struct TemplatePlaceholderBuilder {
    template: BandTemplate,
}

impl TemplatePlaceholderBuilder {
    pub fn new() -> Self {
        TemplatePlaceholderBuilder::default()
    }

    /// Appends one grid row. A row without any originating element is not
    /// resolved and contributes separators only.
    pub fn add_row(&mut self, cells: &[RowCell]) {
        let resolved = cells
            .iter()
            .any(|cell| matches!(cell, RowCell::Content(_) | RowCell::Decoration(_)));

        for cell in cells {
            let token = match cell {
                RowCell::Content(id) if resolved => TemplateToken::Placeholder(*id),
                _ => TemplateToken::Separator,
            };
            self.template.tokens.push(token);
        }
        self.template.tokens.push(TemplateToken::LineEnd);

        self.template.filled_rows += 1;
        if resolved {
            self.template.finished_rows += 1;
        }
    }

    pub fn build(self) -> BandTemplate {
        self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_column_scenario() {
        let (a, b, c) = (ElementId(1), ElementId(2), ElementId(3));
        let mut builder = TemplatePlaceholderBuilder::new();
        builder.add_row(&[RowCell::Empty, RowCell::Empty, RowCell::Empty]);
        builder.add_row(&[RowCell::Content(a), RowCell::Content(b), RowCell::Content(c)]);
        builder.add_row(&[RowCell::Covered, RowCell::Covered, RowCell::Covered]);
        let template = builder.build();

        use TemplateToken::*;
        assert_eq!(
            template.tokens(),
            &[
                Separator,
                Separator,
                Separator,
                LineEnd,
                Placeholder(a),
                Placeholder(b),
                Placeholder(c),
                LineEnd,
                Separator,
                Separator,
                Separator,
                LineEnd,
            ]
        );
        assert_eq!(template.render(','), ",,\n{1},{2},{3}\n,,\n");
        assert_eq!(template.filled_rows(), 3);
        assert_eq!(template.finished_rows(), 1);
        assert_eq!(template.placeholders().collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn test_decoration_resolves_row_without_placeholder() {
        let mut builder = TemplatePlaceholderBuilder::new();
        builder.add_row(&[RowCell::Decoration(ElementId(9)), RowCell::Empty]);
        let template = builder.build();

        assert_eq!(template.render(';'), ";\n");
        assert_eq!(template.finished_rows(), 1);
        assert_eq!(template.placeholders().count(), 0);
    }
}
