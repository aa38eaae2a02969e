//! FILENAME: core/report-model/src/report.rs
//! PURPOSE: The report definition: root bands, groups, pre-processors and functions.

use serde::{Deserialize, Serialize};

use crate::element::{Band, BandKind, IdGenerator};
use crate::expression::ReportFunction;

/// A grouping level. Groups are ordered outer to inner in `Report::groups`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Data field whose value changes start a new group instance.
    pub field: String,
    pub header: Band,
    pub footer: Band,
}

impl Group {
    pub fn new(name: impl Into<String>, field: impl Into<String>, ids: &mut IdGenerator) -> Self {
        Group {
            name: name.into(),
            field: field.into(),
            header: Band::new(ids.next_id(), BandKind::GroupHeader),
            footer: Band::new(ids.next_id(), BandKind::GroupFooter),
        }
    }
}

/// A complete report (or sub-report) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub name: String,
    /// Query name used to fetch rows for a sub-report.
    #[serde(default)]
    pub query: Option<String>,
    pub page_header: Band,
    pub report_header: Band,
    #[serde(default)]
    pub groups: Vec<Group>,
    pub details_header: Band,
    pub item_band: Band,
    pub details_footer: Band,
    pub no_data: Band,
    pub report_footer: Band,
    pub page_footer: Band,
    /// Type names of report pre-processors.
    #[serde(default)]
    pub preprocessors: Vec<String>,
    #[serde(default)]
    pub functions: Vec<ReportFunction>,
}

impl Report {
    /// Creates a report with empty root bands.
    pub fn new(name: impl Into<String>, ids: &mut IdGenerator) -> Self {
        Report {
            name: name.into(),
            query: None,
            page_header: Band::new(ids.next_id(), BandKind::PageHeader),
            report_header: Band::new(ids.next_id(), BandKind::ReportHeader),
            groups: Vec::new(),
            details_header: Band::new(ids.next_id(), BandKind::DetailsHeader),
            item_band: Band::new(ids.next_id(), BandKind::ItemBand),
            details_footer: Band::new(ids.next_id(), BandKind::DetailsFooter),
            no_data: Band::new(ids.next_id(), BandKind::NoData),
            report_footer: Band::new(ids.next_id(), BandKind::ReportFooter),
            page_footer: Band::new(ids.next_id(), BandKind::PageFooter),
            preprocessors: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// All root bands in document order: headers outer to inner, the details
    /// section, then footers inner to outer.
    pub fn root_bands(&self) -> Vec<&Band> {
        let mut bands = Vec::with_capacity(8 + self.groups.len() * 2);
        bands.push(&self.page_header);
        bands.push(&self.report_header);
        bands.extend(self.groups.iter().map(|g| &g.header));
        bands.push(&self.details_header);
        bands.push(&self.item_band);
        bands.push(&self.details_footer);
        bands.push(&self.no_data);
        bands.extend(self.groups.iter().rev().map(|g| &g.footer));
        bands.push(&self.report_footer);
        bands.push(&self.page_footer);
        bands
    }
}
