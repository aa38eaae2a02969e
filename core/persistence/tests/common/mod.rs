//! FILENAME: tests/common/mod.rs
//! Fixtures for the export writer integration tests.

#![allow(dead_code)]

use fast_export::InMemoryDataSource;
use report_model::{
    Bounds, DataRow, Expression, Group, IdGenerator, LeafElement, Report, StyleExpression,
    StyleKey, StyleValue, SubReport,
};

/// Width of one report column in design units (1/1000 pt).
pub const COLUMN: u32 = 40_000;
/// Height of every element in design units.
pub const LINE: u32 = 10_000;

/// CSV produced for `sales_report()` over `sales_data()`.
pub const SALES_CSV: &str = "Sales,\nNorth,\nOslo,10\nBergen,20\nend,\nSouth,\nRome,5.5\nend,\n";

/// A report grouped by region with a banded amount column:
///
/// ```text
/// report header | Sales (two columns)  |
/// group header  | region               |
/// item band     | city    | amount     |
/// group footer  | end                  |
/// ```
pub fn sales_report() -> Report {
    let mut ids = IdGenerator::new();
    let mut report = Report::new("sales", &mut ids);
    report.report_header.push(
        LeafElement::label(ids.next_id(), Bounds::new(0, 0, 2 * COLUMN, LINE), "Sales")
            .with_style(StyleKey::Bold, StyleValue::Bool(true)),
    );

    let mut region = Group::new("region", "region", &mut ids);
    region
        .header
        .push(LeafElement::field(ids.next_id(), Bounds::new(0, 0, COLUMN, LINE), "region"));
    region
        .footer
        .push(LeafElement::label(ids.next_id(), Bounds::new(0, 0, COLUMN, LINE), "end"));
    report.groups.push(region);

    report
        .item_band
        .push(LeafElement::field(ids.next_id(), Bounds::new(0, 0, COLUMN, LINE), "city"));
    report.item_band.push(
        LeafElement::field(ids.next_id(), Bounds::new(COLUMN, 0, COLUMN, LINE), "amount")
            .with_expression(StyleExpression::new(
                "background-color",
                Expression::new("banding", "RowBandingFunction").with_property("color", "#DDEEFF"),
            )),
    );
    report
}

pub fn sales_data() -> InMemoryDataSource {
    InMemoryDataSource::new(vec![
        DataRow::new().with("region", "North").with("city", "Oslo").with("amount", 10.0),
        DataRow::new().with("region", "North").with("city", "Bergen").with("amount", 20.0),
        DataRow::new().with("region", "South").with("city", "Rome").with("amount", 5.5),
    ])
}

/// `sales_report()` with an inline sub-report, which needs the layout engine.
pub fn report_with_inline_subreport() -> Report {
    let mut report = sales_report();
    let mut ids = IdGenerator::new();
    let inline = Report::new("notes", &mut ids);
    report.item_band.push(SubReport::new(ids.next_id(), inline));
    report
}
