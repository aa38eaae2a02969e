//! FILENAME: core/persistence/src/options.rs
//! PURPOSE: User-facing options of the export writers.
//! CONTEXT: Loaded from JSON; every field has a default so partial documents
//! are accepted. The fast-path allow-lists are not options (see fast-export conf.rs).

use serde::{Deserialize, Serialize};

use crate::error::{WriterError, WriterResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Lf,
    Crlf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub separator: char,
    pub quote_all: bool,
    pub line_terminator: LineTerminator,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            separator: ',',
            quote_all: false,
            line_terminator: LineTerminator::Lf,
        }
    }
}

impl CsvOptions {
    /// The separator as a single byte. Only ASCII separators are supported.
    pub fn separator_byte(&self) -> WriterResult<u8> {
        u8::try_from(self.separator)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                WriterError::InvalidOptions(format!(
                    "csv separator '{}' is not an ASCII character",
                    self.separator
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XlsxOptions {
    pub sheet_name: String,
    /// Design units per Excel column-width character.
    pub units_per_character: u32,
}

impl Default for XlsxOptions {
    fn default() -> Self {
        XlsxOptions {
            sheet_name: "Report".to_string(),
            units_per_character: 5250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub create_parent_dirs: bool,
    pub csv: CsvOptions,
    pub xlsx: XlsxOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            create_parent_dirs: true,
            csv: CsvOptions::default(),
            xlsx: XlsxOptions::default(),
        }
    }
}

impl ExportOptions {
    pub fn from_json(json: &str) -> WriterResult<Self> {
        let options: ExportOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> WriterResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> WriterResult<()> {
        self.csv.separator_byte()?;
        if self.xlsx.units_per_character == 0 {
            return Err(WriterError::InvalidOptions(
                "xlsx units_per_character must be positive".to_string(),
            ));
        }
        if self.xlsx.sheet_name.trim().is_empty() {
            return Err(WriterError::InvalidOptions(
                "xlsx sheet_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
