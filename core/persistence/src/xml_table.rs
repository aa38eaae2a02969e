//! FILENAME: core/persistence/src/xml_table.rs
//! PURPOSE: Template writing bands as an XML table document.
//! CONTEXT: Output shape is
//! `<report name=".."><band kind=".."><tr><td colspan rowspan>text</td></tr></band></report>`.
//! Bands share the report's column grid; covered cells are skipped so spans
//! read like HTML table cells.

use std::io::Write;

use fast_export::layout::placed_leaves;
use fast_export::{
    log_debug, ColumnBreaks, ExportError, ExportResult, GridLayout, GridSlot, RuntimeContext,
    StyleChangeCache, Template,
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use report_model::{Band, LeafElement, Report};

use crate::CATEGORY;

pub struct XmlTableTemplate<W: Write> {
    writer: Writer<W>,
    columns: ColumnBreaks,
    changes: StyleChangeCache,
    measurement_pass: bool,
    open: bool,
    bands_written: usize,
}

impl<W: Write> XmlTableTemplate<W> {
    pub fn new(inner: W) -> Self {
        XmlTableTemplate {
            writer: Writer::new_with_indent(inner, b' ', 2),
            columns: ColumnBreaks::from_edges([]),
            changes: StyleChangeCache::new(),
            measurement_pass: false,
            open: false,
            bands_written: 0,
        }
    }

    pub fn bands_written(&self) -> usize {
        self.bands_written
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn event(&mut self, event: Event<'_>) -> ExportResult<()> {
        self.writer.write_event(event).map_err(ExportError::sink)
    }

    /// Writes one `td`; empty cells are written as `<td/>`.
    fn write_cell(
        &mut self,
        leaf: Option<&LeafElement>,
        ctx: &RuntimeContext<'_>,
        rows: usize,
        cols: usize,
    ) -> ExportResult<()> {
        let mut start = BytesStart::new("td");
        if cols > 1 {
            start.push_attribute(("colspan", cols.to_string().as_str()));
        }
        if rows > 1 {
            start.push_attribute(("rowspan", rows.to_string().as_str()));
        }
        let text = leaf.map(|leaf| ctx.value_of(leaf).to_string()).unwrap_or_default();
        if text.is_empty() {
            return self.event(Event::Empty(start));
        }
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(&text)))?;
        self.event(Event::End(BytesEnd::new("td")))
    }
}

impl<W: Write> Template for XmlTableTemplate<W> {
    fn initialize(
        &mut self,
        report: &Report,
        _ctx: &RuntimeContext<'_>,
        is_measurement_pass: bool,
    ) -> ExportResult<()> {
        self.columns = ColumnBreaks::from_report(report);
        self.changes.clear();
        self.measurement_pass = is_measurement_pass;
        if is_measurement_pass || self.open {
            return Ok(());
        }

        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("report");
        root.push_attribute(("name", report.name.as_str()));
        root.push_attribute(("columns", self.columns.column_count().to_string().as_str()));
        self.event(Event::Start(root))?;
        self.open = true;
        Ok(())
    }

    fn write(&mut self, band: &Band, ctx: &RuntimeContext<'_>) -> ExportResult<()> {
        if self.measurement_pass || !self.open {
            return Ok(());
        }

        let placed = placed_leaves(band);
        let mut shown = Vec::with_capacity(placed.len());
        for leaf in &placed {
            let keys = ctx.dynamic_keys(band.id, leaf.leaf.id);
            shown.push(self.changes.snapshot(leaf.leaf.id, keys, ctx.styles).is_visible());
        }
        // Hidden elements keep their rows and leave empty cells.
        let bounds: Vec<_> = placed.iter().map(|p| p.bounds).collect();
        let layout = GridLayout::build_masked(&self.columns, &bounds, |item| shown[item]);
        if layout.rows() == 0 {
            return Ok(());
        }

        let mut start = BytesStart::new("band");
        let kind = format!("{:?}", band.kind);
        start.push_attribute(("kind", kind.as_str()));
        self.event(Event::Start(start))?;
        for row in 0..layout.rows() {
            self.event(Event::Start(BytesStart::new("tr")))?;
            for col in 0..layout.columns() {
                match layout.slot(row, col) {
                    GridSlot::Origin(item) => {
                        let (rows, cols) = layout
                            .span_of(item)
                            .map(|span| (span.row_span, span.col_span))
                            .unwrap_or((1, 1));
                        let leaf = placed.get(item).map(|p| p.leaf);
                        self.write_cell(leaf, ctx, rows, cols)?;
                    }
                    GridSlot::Covered(_) => {}
                    GridSlot::Empty => self.write_cell(None, ctx, 1, 1)?,
                }
            }
            self.event(Event::End(BytesEnd::new("tr")))?;
        }
        self.event(Event::End(BytesEnd::new("band")))?;
        self.bands_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        if self.measurement_pass || !self.open {
            return Ok(());
        }
        self.event(Event::End(BytesEnd::new("report")))?;
        self.writer.get_mut().flush()?;
        self.open = false;
        log_debug!(CATEGORY, "xml table written: {} band(s)", self.bands_written);
        Ok(())
    }
}
