//! FILENAME: core/fast-export/src/events.rs
//! PURPOSE: Report-processing lifecycle events and the listener interface.
//! CONTEXT: Lifecycle of one (sub-)report:
//!   initialized -> started -> { group started -> items started ->
//!   items advanced* -> items finished -> group finished }* -> finished -> done
//! Events of banded sub-reports are flagged `is_nested` and carry the
//! sub-report's own definition.

use report_model::{Band, Report};

use crate::context::RuntimeContext;
use crate::error::ExportResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Initialized,
    Started,
    GroupStarted,
    ItemsStarted,
    ItemsAdvanced,
    ItemsFinished,
    GroupFinished,
    Finished,
    Done,
}

pub struct ReportEvent<'a> {
    pub kind: EventKind,
    pub report: &'a Report,
    /// Index into `report.groups` for group events.
    pub group: Option<usize>,
    /// Number of rows in the current scope (items events only).
    pub row_count: usize,
    pub is_nested: bool,
    pub is_measurement_pass: bool,
    pub context: RuntimeContext<'a>,
}

impl<'a> ReportEvent<'a> {
    pub fn new(kind: EventKind, report: &'a Report, context: RuntimeContext<'a>) -> Self {
        ReportEvent {
            kind,
            report,
            group: None,
            row_count: 0,
            is_nested: false,
            is_measurement_pass: false,
            context,
        }
    }

    pub fn with_group(mut self, group: usize) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn nested(mut self, is_nested: bool) -> Self {
        self.is_nested = is_nested;
        self
    }

    pub fn measurement_pass(mut self, is_measurement_pass: bool) -> Self {
        self.is_measurement_pass = is_measurement_pass;
        self
    }

    /// The bands this event renders, in output order.
    pub fn bands(&self) -> Vec<&'a Band> {
        bands_for_event(self.kind, self.report, self.group, self.row_count)
    }
}

/// Maps an event to the bands written for it. Group events with a missing
/// group index render nothing.
pub fn bands_for_event(
    kind: EventKind,
    report: &Report,
    group: Option<usize>,
    row_count: usize,
) -> Vec<&Band> {
    match kind {
        EventKind::Initialized | EventKind::Done => Vec::new(),
        EventKind::Started => vec![&report.page_header, &report.report_header],
        EventKind::GroupStarted => group
            .and_then(|g| report.groups.get(g))
            .map(|g| vec![&g.header])
            .unwrap_or_default(),
        EventKind::ItemsStarted => {
            if row_count == 0 {
                vec![&report.details_header, &report.no_data]
            } else {
                vec![&report.details_header]
            }
        }
        EventKind::ItemsAdvanced => vec![&report.item_band],
        EventKind::ItemsFinished => vec![&report.details_footer],
        EventKind::GroupFinished => group
            .and_then(|g| report.groups.get(g))
            .map(|g| vec![&g.footer])
            .unwrap_or_default(),
        EventKind::Finished => vec![&report.report_footer, &report.page_footer],
    }
}

/// Receives lifecycle events. All methods default to doing nothing.
pub trait ReportListener {
    fn report_initialized(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn report_started(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn group_started(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn items_started(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn items_advanced(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn items_finished(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn group_finished(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn report_finished(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }

    fn report_done(&mut self, _event: &ReportEvent<'_>) -> ExportResult<()> {
        Ok(())
    }
}

/// Routes an event to the matching listener method.
pub fn dispatch<L>(listener: &mut L, event: &ReportEvent<'_>) -> ExportResult<()>
where
    L: ReportListener + ?Sized,
{
    match event.kind {
        EventKind::Initialized => listener.report_initialized(event),
        EventKind::Started => listener.report_started(event),
        EventKind::GroupStarted => listener.group_started(event),
        EventKind::ItemsStarted => listener.items_started(event),
        EventKind::ItemsAdvanced => listener.items_advanced(event),
        EventKind::ItemsFinished => listener.items_finished(event),
        EventKind::GroupFinished => listener.group_finished(event),
        EventKind::Finished => listener.report_finished(event),
        EventKind::Done => listener.report_done(event),
    }
}
