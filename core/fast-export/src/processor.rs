//! FILENAME: core/fast-export/src/processor.rs
//! PURPOSE: Minimal report processor replaying the lifecycle over data rows.
//! CONTEXT: Reference host for the fast path. It groups rows on the group
//! fields (rows are expected to arrive sorted by them), evaluates the styles of
//! each band right before the event that writes it, and runs banded
//! sub-reports as nested lifecycles after their parent band was written.
//! It performs no layout.

use rustc_hash::FxHashMap;

use report_model::{ComputedStyleTable, DataRow, Report};

use crate::analyzer::AnalysisStash;
use crate::context::RuntimeContext;
use crate::error::ExportResult;
use crate::evaluator::StyleEvaluator;
use crate::events::{bands_for_event, dispatch, EventKind, ReportEvent, ReportListener};
use crate::logging::CATEGORY;

/// Supplies rows for a report's query.
pub trait DataSource {
    /// Rows of `query`, or of the main query when `query` is None.
    fn rows(&self, query: Option<&str>) -> Vec<DataRow>;
}

/// Data source over rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    rows: Vec<DataRow>,
    queries: FxHashMap<String, Vec<DataRow>>,
}

impl InMemoryDataSource {
    pub fn new(rows: Vec<DataRow>) -> Self {
        InMemoryDataSource {
            rows,
            queries: FxHashMap::default(),
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, rows: Vec<DataRow>) -> Self {
        self.queries.insert(name.into(), rows);
        self
    }
}

impl DataSource for InMemoryDataSource {
    fn rows(&self, query: Option<&str>) -> Vec<DataRow> {
        match query {
            Some(name) => self.queries.get(name).cloned().unwrap_or_default(),
            None => self.rows.clone(),
        }
    }
}

// ============================================================================
// PROCESSOR
// ============================================================================

pub struct ReportProcessor<'a, D: DataSource + ?Sized> {
    report: &'a Report,
    data: &'a D,
    analysis: &'a AnalysisStash,
    measurement_pass: bool,
}

impl<'a, D: DataSource + ?Sized> ReportProcessor<'a, D> {
    pub fn new(report: &'a Report, data: &'a D, analysis: &'a AnalysisStash) -> Self {
        ReportProcessor {
            report,
            data,
            analysis,
            measurement_pass: false,
        }
    }

    pub fn with_measurement_pass(mut self, measurement_pass: bool) -> Self {
        self.measurement_pass = measurement_pass;
        self
    }

    /// Runs the full lifecycle. Returns the number of master rows processed.
    pub fn process<L>(&self, listener: &mut L) -> ExportResult<usize>
    where
        L: ReportListener + ?Sized,
    {
        let mut pass = Pass {
            data: self.data,
            analysis: self.analysis,
            listener,
            styles: ComputedStyleTable::from_report(self.report),
            evaluator: StyleEvaluator::new(),
            measurement_pass: self.measurement_pass,
        };
        pass.run_report(self.report, false)
    }
}

/// What a single event is about.
#[derive(Debug, Clone, Copy)]
struct EventSpec {
    kind: EventKind,
    group: Option<usize>,
    row_count: usize,
}

impl EventSpec {
    fn new(kind: EventKind) -> Self {
        EventSpec {
            kind,
            group: None,
            row_count: 0,
        }
    }

    fn group(kind: EventKind, group: usize) -> Self {
        EventSpec {
            group: Some(group),
            ..EventSpec::new(kind)
        }
    }

    fn rows(kind: EventKind, row_count: usize) -> Self {
        EventSpec {
            row_count,
            ..EventSpec::new(kind)
        }
    }
}

/// State of one processing pass, shared by nested sub-report runs.
struct Pass<'p, D: ?Sized, L: ?Sized> {
    data: &'p D,
    analysis: &'p AnalysisStash,
    listener: &'p mut L,
    styles: ComputedStyleTable,
    evaluator: StyleEvaluator,
    measurement_pass: bool,
}

impl<'p, D, L> Pass<'p, D, L>
where
    D: DataSource + ?Sized,
    L: ReportListener + ?Sized,
{
    fn run_report(&mut self, report: &Report, nested: bool) -> ExportResult<usize> {
        let rows = self.data.rows(report.query.as_deref());
        let empty = DataRow::new();
        let first = rows.first().unwrap_or(&empty);
        let last = rows.last().unwrap_or(&empty);
        let last_index = rows.len().saturating_sub(1);

        log_debug!(
            CATEGORY,
            "processing '{}' ({} row(s), nested: {})",
            report.name,
            rows.len(),
            nested
        );

        self.fire(report, nested, EventSpec::new(EventKind::Initialized), first, 0)?;
        self.fire(report, nested, EventSpec::new(EventKind::Started), first, 0)?;

        if report.groups.is_empty() || rows.is_empty() {
            let count = rows.len();
            self.fire(report, nested, EventSpec::rows(EventKind::ItemsStarted, count), first, 0)?;
            for (index, row) in rows.iter().enumerate() {
                self.fire(report, nested, EventSpec::rows(EventKind::ItemsAdvanced, count), row, index)?;
            }
            self.fire(report, nested, EventSpec::rows(EventKind::ItemsFinished, count), last, last_index)?;
        } else {
            self.run_groups(report, nested, &rows)?;
        }

        self.fire(report, nested, EventSpec::new(EventKind::Finished), last, last_index)?;
        self.fire(report, nested, EventSpec::new(EventKind::Done), last, last_index)?;
        Ok(rows.len())
    }

    fn run_groups(&mut self, report: &Report, nested: bool, rows: &[DataRow]) -> ExportResult<()> {
        let levels = report.groups.len();
        let same_at = |a: &DataRow, b: &DataRow, level: usize| {
            let field = &report.groups[level].field;
            a.get(field) == b.get(field)
        };

        let mut scope_start = 0;
        let mut scope_len = 0;
        for (index, row) in rows.iter().enumerate() {
            let changed_level = if index == 0 {
                Some(0)
            } else {
                (0..levels).find(|&level| !same_at(&rows[index - 1], row, level))
            };

            if let Some(level) = changed_level {
                if index > 0 {
                    let previous = &rows[index - 1];
                    let offset = index - 1 - scope_start;
                    self.fire(report, nested, EventSpec::rows(EventKind::ItemsFinished, scope_len), previous, offset)?;
                    for closing in (level..levels).rev() {
                        self.fire(report, nested, EventSpec::group(EventKind::GroupFinished, closing), previous, offset)?;
                    }
                }

                for opening in level..levels {
                    self.evaluator.reset_changing_values();
                    self.fire(report, nested, EventSpec::group(EventKind::GroupStarted, opening), row, 0)?;
                }

                scope_start = index;
                scope_len = rows[index..]
                    .iter()
                    .take_while(|other| (0..levels).all(|level| same_at(row, *other, level)))
                    .count();
                self.fire(report, nested, EventSpec::rows(EventKind::ItemsStarted, scope_len), row, 0)?;
            }

            let offset = index - scope_start;
            self.fire(report, nested, EventSpec::rows(EventKind::ItemsAdvanced, scope_len), row, offset)?;
        }

        if let Some(last) = rows.last() {
            let offset = rows.len() - 1 - scope_start;
            self.fire(report, nested, EventSpec::rows(EventKind::ItemsFinished, scope_len), last, offset)?;
            for closing in (0..levels).rev() {
                self.fire(report, nested, EventSpec::group(EventKind::GroupFinished, closing), last, offset)?;
            }
        }
        Ok(())
    }

    /// Evaluates the event's bands, dispatches it, then runs the banded
    /// sub-reports of those bands.
    fn fire(
        &mut self,
        report: &Report,
        nested: bool,
        spec: EventSpec,
        row: &DataRow,
        row_number: usize,
    ) -> ExportResult<()> {
        let bands = bands_for_event(spec.kind, report, spec.group, spec.row_count);
        for band in &bands {
            self.evaluator
                .evaluate_band(band, row, row_number, &mut self.styles);
        }

        let ctx = RuntimeContext::new(row, row_number, &self.styles, self.analysis);
        let mut event = ReportEvent::new(spec.kind, report, ctx)
            .with_row_count(spec.row_count)
            .nested(nested)
            .measurement_pass(self.measurement_pass);
        if let Some(group) = spec.group {
            event = event.with_group(group);
        }
        dispatch(&mut *self.listener, &event)?;

        for band in bands {
            for sub in &band.subreports {
                self.run_report(&sub.report, true)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingTemplate, TemplateCall};
    use crate::output::OutputFunction;
    use report_model::{BandKind, Group, IdGenerator, SubReport};

    /// Records (event kind, group, row count, nested) per event.
    #[derive(Default)]
    struct EventLog {
        events: Vec<(EventKind, Option<usize>, usize, bool)>,
    }

    impl EventLog {
        fn push(&mut self, event: &ReportEvent<'_>) -> ExportResult<()> {
            self.events
                .push((event.kind, event.group, event.row_count, event.is_nested));
            Ok(())
        }
    }

    impl ReportListener for EventLog {
        fn report_initialized(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn report_started(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn group_started(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn items_started(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn items_advanced(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn items_finished(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn group_finished(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn report_finished(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
        fn report_done(&mut self, e: &ReportEvent<'_>) -> ExportResult<()> {
            self.push(e)
        }
    }

    fn row(region: &str, city: &str) -> DataRow {
        DataRow::new().with("region", region).with("city", city)
    }

    #[test]
    fn test_groups_follow_key_changes() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("sales", &mut ids);
        report.groups.push(Group::new("region", "region", &mut ids));
        report.groups.push(Group::new("city", "city", &mut ids));

        let data = InMemoryDataSource::new(vec![
            row("North", "Oslo"),
            row("North", "Oslo"),
            row("North", "Bergen"),
            row("South", "Rome"),
        ]);
        let stash = AnalysisStash::new();
        let mut log = EventLog::default();
        let processed = ReportProcessor::new(&report, &data, &stash)
            .process(&mut log)
            .unwrap();
        assert_eq!(processed, 4);

        use EventKind::*;
        assert_eq!(
            log.events.iter().map(|e| (e.0, e.1, e.2)).collect::<Vec<_>>(),
            vec![
                (Initialized, None, 0),
                (Started, None, 0),
                (GroupStarted, Some(0), 0),
                (GroupStarted, Some(1), 0),
                (ItemsStarted, None, 2),
                (ItemsAdvanced, None, 2),
                (ItemsAdvanced, None, 2),
                (ItemsFinished, None, 2),
                (GroupFinished, Some(1), 0),
                (GroupStarted, Some(1), 0),
                (ItemsStarted, None, 1),
                (ItemsAdvanced, None, 1),
                (ItemsFinished, None, 1),
                (GroupFinished, Some(1), 0),
                (GroupFinished, Some(0), 0),
                (GroupStarted, Some(0), 0),
                (GroupStarted, Some(1), 0),
                (ItemsStarted, None, 1),
                (ItemsAdvanced, None, 1),
                (ItemsFinished, None, 1),
                (GroupFinished, Some(1), 0),
                (GroupFinished, Some(0), 0),
                (Finished, None, 0),
                (Done, None, 0),
            ]
        );
    }

    #[test]
    fn test_empty_data_fires_no_data_scope() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("empty", &mut ids);
        report.groups.push(Group::new("region", "region", &mut ids));

        let data = InMemoryDataSource::default();
        let stash = AnalysisStash::new();
        let mut output = OutputFunction::new(RecordingTemplate::default());
        ReportProcessor::new(&report, &data, &stash)
            .process(&mut output)
            .unwrap();

        assert_eq!(
            output.template().written_kinds(),
            vec![
                BandKind::PageHeader,
                BandKind::ReportHeader,
                BandKind::DetailsHeader,
                BandKind::NoData,
                BandKind::DetailsFooter,
                BandKind::ReportFooter,
                BandKind::PageFooter,
            ]
        );
    }

    #[test]
    fn test_banded_subreport_runs_nested_after_parent_band() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("master", &mut ids);
        let detail = Report::new("lines", &mut ids).with_query("lines");
        let detail_item = detail.item_band.id;
        let sub_id = ids.next_id();
        report.report_header.subreports.push(SubReport::new(sub_id, detail));

        let data = InMemoryDataSource::new(vec![DataRow::new()])
            .with_query("lines", vec![DataRow::new(), DataRow::new()]);
        let stash = AnalysisStash::new();
        let mut output = OutputFunction::new(RecordingTemplate::default());
        ReportProcessor::new(&report, &data, &stash)
            .process(&mut output)
            .unwrap();

        let calls = &output.template().calls;
        // One initialize and one finish: the nested lifecycle leaves them alone.
        assert_eq!(
            calls.iter().filter(|c| matches!(c, TemplateCall::Initialize { .. })).count(),
            1
        );
        assert_eq!(calls.last(), Some(&TemplateCall::Finish));

        let kinds = output.template().written_kinds();
        let header = kinds.iter().position(|k| *k == BandKind::ReportHeader).unwrap();
        assert_eq!(kinds[header + 1], BandKind::PageHeader);
        let detail_rows = calls
            .iter()
            .filter(|c| matches!(c, TemplateCall::Write { band, .. } if *band == detail_item))
            .count();
        assert_eq!(detail_rows, 2);
    }

    #[test]
    fn test_measurement_flag_reaches_events() {
        let mut ids = IdGenerator::new();
        let report = Report::new("list", &mut ids);
        let data = InMemoryDataSource::default();
        let stash = AnalysisStash::new();
        let mut output = OutputFunction::new(RecordingTemplate::default());
        ReportProcessor::new(&report, &data, &stash)
            .with_measurement_pass(true)
            .process(&mut output)
            .unwrap();

        assert_eq!(
            output.template().calls.first(),
            Some(&TemplateCall::Initialize { measurement: true })
        );
    }
}
