//! FILENAME: core/fast-export/src/run.rs
//! PURPOSE: Entry point of a fast export run.
//! CONTEXT: validate -> analyze every root band -> replay the lifecycle with
//! the output function bound to the template. A report that fails the gate
//! is rejected before anything is written.

use report_model::Report;

use crate::analyzer::AnalysisStash;
use crate::error::{ExportError, ExportResult};
use crate::logging::CATEGORY;
use crate::output::OutputFunction;
use crate::processor::{DataSource, ReportProcessor};
use crate::template::Template;
use crate::validator::validate;

/// Exports `report` through `template` and hands the template back, so the
/// caller can take its sink.
pub fn run_fast_export<T, D>(report: &Report, data: &D, template: T) -> ExportResult<T>
where
    T: Template,
    D: DataSource + ?Sized,
{
    let reasons = validate(report);
    if !reasons.is_empty() {
        for reason in &reasons {
            log_debug!(CATEGORY, "report '{}' not eligible: {}", report.name, reason);
        }
        return Err(ExportError::NotEligible { reasons });
    }

    let mut analysis = AnalysisStash::new();
    analysis.prepare(report)?;

    log_info!(CATEGORY, "fast export of '{}' started", report.name);
    let mut output = OutputFunction::new(template);
    let rows = ReportProcessor::new(report, data, &analysis).process(&mut output)?;
    log_info!(CATEGORY, "fast export of '{}' finished: {} row(s)", report.name, rows);

    Ok(output.into_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_template::CsvTemplate;
    use crate::processor::InMemoryDataSource;
    use crate::testing::StringTextSink;
    use crate::validator::Ineligibility;
    use report_model::{
        AttributeKey, AttributeValue, Bounds, DataRow, Expression, Group, IdGenerator,
        LeafElement, StyleExpression, SubReport, CORE_NAMESPACE, ONLY_SHOW_CHANGING_VALUES,
    };

    fn grouped_report() -> Report {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("sales", &mut ids);
        report
            .report_header
            .push(LeafElement::label(ids.next_id(), Bounds::new(0, 0, 20, 10), "Sales"));
        let mut region = Group::new("region", "region", &mut ids);
        region
            .header
            .push(LeafElement::field(ids.next_id(), Bounds::new(0, 0, 10, 10), "region"));
        region
            .footer
            .push(LeafElement::label(ids.next_id(), Bounds::new(0, 0, 10, 10), "end"));
        report.groups.push(region);
        report
            .item_band
            .push(LeafElement::field(ids.next_id(), Bounds::new(0, 0, 10, 10), "city"));
        report.item_band.push(
            LeafElement::field(ids.next_id(), Bounds::new(10, 0, 10, 10), "amount")
                .with_expression(StyleExpression::new(
                    "background-color",
                    Expression::new("band", "RowBandingFunction").with_property("color", "#EEEEEE"),
                )),
        );
        report
    }

    #[test]
    fn test_grouped_csv_export() {
        let report = grouped_report();
        let data = InMemoryDataSource::new(vec![
            DataRow::new().with("region", "North").with("city", "Oslo").with("amount", 10.0),
            DataRow::new().with("region", "North").with("city", "Bergen").with("amount", 20.0),
            DataRow::new().with("region", "South").with("city", "Rome").with("amount", 5.5),
        ]);

        let template = run_fast_export(&report, &data, CsvTemplate::new(StringTextSink::default()))
            .unwrap();
        assert_eq!(
            template.sink().out,
            "Sales,\nNorth,\nOslo,10\nBergen,20\nend,\nSouth,\nRome,5.5\nend,\n"
        );
        assert!(template.sink().flushed);
    }

    #[test]
    fn test_ineligible_report_writes_nothing() {
        let mut ids = IdGenerator::new();
        let mut report = grouped_report();
        let sub = SubReport::new(ids.next_id(), Report::new("inline", &mut ids));
        let sub_id = sub.id;
        report.item_band.push(sub);

        let data = InMemoryDataSource::default();
        match run_fast_export(&report, &data, CsvTemplate::new(StringTextSink::default())) {
            Err(ExportError::NotEligible { reasons }) => {
                assert_eq!(reasons, vec![Ineligibility::InlineSubReport { element: sub_id }]);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("inline sub-report must not be exported"),
        }
    }

    #[test]
    fn test_unknown_style_key_aborts_run() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("bad", &mut ids);
        report.item_band.push(
            LeafElement::field(ids.next_id(), Bounds::new(0, 0, 10, 10), "a").with_expression(
                StyleExpression::new("shadow", Expression::new("band", "RowBandingFunction")),
            ),
        );

        let result = run_fast_export(
            &report,
            &InMemoryDataSource::new(vec![DataRow::new()]),
            CsvTemplate::new(StringTextSink::default()),
        );
        assert!(matches!(result, Err(ExportError::UnknownStyleKey { .. })));
    }

    #[test]
    fn test_hidden_value_on_its_own_row_keeps_record_count() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("cities", &mut ids);
        report
            .item_band
            .push(LeafElement::field(ids.next_id(), Bounds::new(10, 0, 10, 10), "city"));
        report.item_band.push(
            LeafElement::field(ids.next_id(), Bounds::new(0, 10, 10, 10), "region").with_attribute(
                AttributeKey::new(CORE_NAMESPACE, ONLY_SHOW_CHANGING_VALUES),
                AttributeValue::Bool(true),
            ),
        );
        let data = InMemoryDataSource::new(vec![
            DataRow::new().with("region", "N").with("city", "Oslo"),
            DataRow::new().with("region", "N").with("city", "Bergen"),
        ]);

        let template = run_fast_export(&report, &data, CsvTemplate::new(StringTextSink::default()))
            .unwrap();
        assert_eq!(template.sink().out, ",Oslo\nN,\n,Bergen\n,\n");
    }

    #[test]
    fn test_non_ascii_banding_color_is_ignored() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("banded", &mut ids);
        report.item_band.push(
            LeafElement::field(ids.next_id(), Bounds::new(0, 0, 10, 10), "city").with_expression(
                StyleExpression::new(
                    "background-color",
                    Expression::new("band", "RowBandingFunction").with_property("color", "aé123"),
                ),
            ),
        );
        let data = InMemoryDataSource::new(vec![
            DataRow::new().with("city", "Oslo"),
            DataRow::new().with("city", "Bergen"),
        ]);

        let template = run_fast_export(&report, &data, CsvTemplate::new(StringTextSink::default()))
            .unwrap();
        assert_eq!(template.sink().out, "Oslo\nBergen\n");
    }
}
