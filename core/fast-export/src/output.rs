//! FILENAME: core/fast-export/src/output.rs
//! PURPOSE: Binds a template to the report lifecycle.
//! CONTEXT: The output function holds no layout state of its own. It never
//! defers work for inline sub-reports (the gate rejects them) and performs
//! no rollback: a failed write aborts the run.

use report_model::ElementId;

use crate::error::ExportResult;
use crate::events::{ReportEvent, ReportListener};
use crate::logging::CATEGORY;
use crate::template::Template;

pub struct OutputFunction<T: Template> {
    template: T,
}

impl<T: Template> OutputFunction<T> {
    pub fn new(template: T) -> Self {
        OutputFunction { template }
    }

    pub fn template(&self) -> &T {
        &self.template
    }

    pub fn into_template(self) -> T {
        self.template
    }

    /// Inline sub-reports waiting for layout. Always empty on the fast path.
    pub fn pending_inline_subreports(&self) -> &[ElementId] {
        &[]
    }

    fn write_bands(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        log_trace!(
            CATEGORY,
            "{:?} for '{}' (nested: {}, rows: {})",
            event.kind,
            event.report.name,
            event.is_nested,
            event.row_count
        );
        for band in event.bands() {
            self.template.write(band, &event.context)?;
        }
        Ok(())
    }
}

impl<T: Template> ReportListener for OutputFunction<T> {
    fn report_initialized(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        if event.is_nested {
            return Ok(());
        }
        self.template
            .initialize(event.report, &event.context, event.is_measurement_pass)
    }

    fn report_started(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        self.write_bands(event)
    }

    fn group_started(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        self.write_bands(event)
    }

    fn items_started(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        self.write_bands(event)
    }

    fn items_advanced(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        self.write_bands(event)
    }

    fn items_finished(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        self.write_bands(event)
    }

    fn group_finished(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        self.write_bands(event)
    }

    fn report_finished(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        self.write_bands(event)
    }

    fn report_done(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
        if event.is_nested {
            return Ok(());
        }
        self.template.finish()
    }
}
