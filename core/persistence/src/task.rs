//! FILENAME: core/persistence/src/task.rs
//! PURPOSE: Export entry points binding the fast path to concrete writers.
//! CONTEXT: Eligibility is checked before the target file is created, so a
//! rejected report leaves nothing behind and the caller can fall back to the
//! layout engine.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use fast_export::{
    log_info, run_fast_export, validate, CsvTemplate, DataSource, SpreadsheetTemplate,
};
use report_model::Report;

use crate::csv_writer::CsvTextSink;
use crate::error::{WriterError, WriterResult};
use crate::options::ExportOptions;
use crate::xlsx_writer::XlsxSheetSink;
use crate::xml_table::XmlTableTemplate;
use crate::CATEGORY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Xml,
}

impl ExportFormat {
    /// Format matching the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            "xml" => Some(ExportFormat::Xml),
            _ => None,
        }
    }
}

/// Loads a report definition saved as JSON.
pub fn load_report(path: &Path) -> WriterResult<Report> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(WriterError::Report)
}

pub fn export_csv_to_writer<W, D>(
    report: &Report,
    data: &D,
    writer: W,
    options: &ExportOptions,
) -> WriterResult<W>
where
    W: Write,
    D: DataSource + ?Sized,
{
    let sink = CsvTextSink::new(writer, &options.csv)?;
    let template = run_fast_export(report, data, CsvTemplate::new(sink))?;
    Ok(template.into_sink().into_inner())
}

pub fn export_xlsx_to_writer<W, D>(
    report: &Report,
    data: &D,
    writer: W,
    options: &ExportOptions,
) -> WriterResult<W>
where
    W: Write,
    D: DataSource + ?Sized,
{
    let sink = XlsxSheetSink::new(writer, &options.xlsx)?;
    let template = run_fast_export(report, data, SpreadsheetTemplate::new(sink))?;
    Ok(template.into_sink().into_inner())
}

pub fn export_xml_to_writer<W, D>(report: &Report, data: &D, writer: W) -> WriterResult<W>
where
    W: Write,
    D: DataSource + ?Sized,
{
    let template = run_fast_export(report, data, XmlTableTemplate::new(writer))?;
    Ok(template.into_inner())
}

pub fn export_csv<D>(
    report: &Report,
    data: &D,
    path: &Path,
    options: &ExportOptions,
) -> WriterResult<()>
where
    D: DataSource + ?Sized,
{
    export(report, data, ExportFormat::Csv, path, options)
}

pub fn export_xlsx<D>(
    report: &Report,
    data: &D,
    path: &Path,
    options: &ExportOptions,
) -> WriterResult<()>
where
    D: DataSource + ?Sized,
{
    export(report, data, ExportFormat::Xlsx, path, options)
}

pub fn export_xml<D>(
    report: &Report,
    data: &D,
    path: &Path,
    options: &ExportOptions,
) -> WriterResult<()>
where
    D: DataSource + ?Sized,
{
    export(report, data, ExportFormat::Xml, path, options)
}

/// Exports to `path` in the format chosen by its extension.
pub fn export_to_path<D>(
    report: &Report,
    data: &D,
    path: &Path,
    options: &ExportOptions,
) -> WriterResult<()>
where
    D: DataSource + ?Sized,
{
    let format = ExportFormat::from_path(path).ok_or_else(|| {
        WriterError::InvalidOptions(format!("no export format for '{}'", path.display()))
    })?;
    export(report, data, format, path, options)
}

fn export<D>(
    report: &Report,
    data: &D,
    format: ExportFormat,
    path: &Path,
    options: &ExportOptions,
) -> WriterResult<()>
where
    D: DataSource + ?Sized,
{
    options.validate()?;
    let reasons = validate(report);
    if !reasons.is_empty() {
        return Err(WriterError::NotEligible { reasons });
    }

    let file = create_target(path, options)?;
    let mut writer = match format {
        ExportFormat::Csv => export_csv_to_writer(report, data, file, options)?,
        ExportFormat::Xlsx => export_xlsx_to_writer(report, data, file, options)?,
        ExportFormat::Xml => export_xml_to_writer(report, data, file)?,
    };
    writer.flush()?;
    log_info!(CATEGORY, "exported '{}' as {:?} to {}", report.name, format, path.display());
    Ok(())
}

fn create_target(path: &Path, options: &ExportOptions) -> WriterResult<BufWriter<File>> {
    if options.create_parent_dirs {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}
