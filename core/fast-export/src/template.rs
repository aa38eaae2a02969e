//! FILENAME: core/fast-export/src/template.rs
//! PURPOSE: The per-format writer interface driven by the output function.
//! CONTEXT: Bands arrive in document order. `write` may be called any number
//! of times with the same structural band (once per data row for the item
//! band) and emits output proportional to the band's current content.

use report_model::{Band, Report};

use crate::context::RuntimeContext;
use crate::error::ExportResult;

pub trait Template {
    /// Prepares the template for a run. In a measurement pass the template
    /// must not emit anything until it is initialized again.
    fn initialize(
        &mut self,
        report: &Report,
        ctx: &RuntimeContext<'_>,
        is_measurement_pass: bool,
    ) -> ExportResult<()>;

    fn write(&mut self, band: &Band, ctx: &RuntimeContext<'_>) -> ExportResult<()>;

    /// Flushes and closes the output. Called once, only when the run
    /// completed.
    fn finish(&mut self) -> ExportResult<()>;
}

impl<T: Template + ?Sized> Template for Box<T> {
    fn initialize(
        &mut self,
        report: &Report,
        ctx: &RuntimeContext<'_>,
        is_measurement_pass: bool,
    ) -> ExportResult<()> {
        (**self).initialize(report, ctx, is_measurement_pass)
    }

    fn write(&mut self, band: &Band, ctx: &RuntimeContext<'_>) -> ExportResult<()> {
        (**self).write(band, ctx)
    }

    fn finish(&mut self) -> ExportResult<()> {
        (**self).finish()
    }
}
