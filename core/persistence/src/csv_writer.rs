//! FILENAME: core/persistence/src/csv_writer.rs
//! PURPOSE: `TextSink` writing CSV through the `csv` crate.

use std::io::Write;

use csv::{ByteRecord, QuoteStyle, Terminator, WriterBuilder};
use fast_export::{ExportError, ExportResult, TextSink};

use crate::error::WriterResult;
use crate::options::{CsvOptions, LineTerminator};

/// Buffer size of the per-record encoder.
const RECORD_BUFFER: usize = 512;

/// Records are collected field by field and encoded when they end. A record
/// holding a single empty field is written as a bare line end; the encoder
/// would quote it.
pub struct CsvTextSink<W: Write> {
    inner: W,
    builder: WriterBuilder,
    record: ByteRecord,
    scratch: Vec<u8>,
    line_end: &'static [u8],
    quote_all: bool,
    records: usize,
}

impl<W: Write> CsvTextSink<W> {
    pub fn new(inner: W, options: &CsvOptions) -> WriterResult<Self> {
        let (terminator, line_end): (_, &'static [u8]) = match options.line_terminator {
            LineTerminator::Lf => (Terminator::Any(b'\n'), b"\n"),
            LineTerminator::Crlf => (Terminator::CRLF, b"\r\n"),
        };
        let quote_style = if options.quote_all {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        };
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(options.separator_byte()?)
            .quote_style(quote_style)
            .terminator(terminator)
            .flexible(true)
            .buffer_capacity(RECORD_BUFFER);
        Ok(CsvTextSink {
            inner,
            builder,
            record: ByteRecord::new(),
            scratch: Vec::new(),
            line_end,
            quote_all: options.quote_all,
            records: 0,
        })
    }

    /// Records terminated so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn is_bare_line(&self) -> bool {
        !self.quote_all && self.record.len() <= 1 && self.record.iter().all(<[u8]>::is_empty)
    }
}

impl<W: Write> TextSink for CsvTextSink<W> {
    fn write_field(&mut self, text: &str) -> ExportResult<()> {
        self.record.push_field(text.as_bytes());
        Ok(())
    }

    fn write_empty_field(&mut self) -> ExportResult<()> {
        self.record.push_field(b"");
        Ok(())
    }

    fn end_record(&mut self) -> ExportResult<()> {
        if self.is_bare_line() {
            self.inner.write_all(self.line_end)?;
        } else {
            self.scratch.clear();
            let mut encoder = self.builder.from_writer(&mut self.scratch);
            encoder
                .write_byte_record(&self.record)
                .map_err(ExportError::sink)?;
            encoder.flush()?;
            drop(encoder);
            self.inner.write_all(&self.scratch)?;
        }
        self.record.clear();
        self.records += 1;
        Ok(())
    }

    fn flush(&mut self) -> ExportResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}
