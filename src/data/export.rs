//! CSV, spreadsheet and Excel export
//!
//! Serializes rows with a header of canonical column names in a fixed order.
//! Text output is byte-reproducible: the same rows always produce the same
//! bytes. A reader for the text formats is provided so exports can be loaded
//! back.

use crate::constants::{COLUMN_NAMES, CORE_COLUMN_COUNT, XLSX_SHEET_NAME};
use crate::data::error::{ExportError, ExportResult};
use crate::types::CountryRow;
use rust_xlsxwriter::Workbook;
use std::io::Write;
use std::path::Path;

/// Export layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: char,
    /// Emit latitude/longitude columns (nine columns instead of seven)
    pub include_coordinates: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::csv()
    }
}

impl ExportOptions {
    pub fn csv() -> Self {
        Self {
            delimiter: ',',
            include_coordinates: true,
        }
    }

    /// Tab-separated layout that spreadsheet software opens directly
    pub fn spreadsheet() -> Self {
        Self {
            delimiter: '\t',
            include_coordinates: true,
        }
    }

    pub fn without_coordinates(mut self) -> Self {
        self.include_coordinates = false;
        self
    }

    fn column_count(&self) -> usize {
        if self.include_coordinates {
            COLUMN_NAMES.len()
        } else {
            CORE_COLUMN_COUNT
        }
    }
}

/// Serialize rows as comma-separated values with all nine columns
pub fn to_csv(rows: &[CountryRow]) -> Vec<u8> {
    export(rows, &ExportOptions::csv())
}

/// Serialize rows as tab-separated values with all nine columns
pub fn to_spreadsheet(rows: &[CountryRow]) -> Vec<u8> {
    export(rows, &ExportOptions::spreadsheet())
}

/// Serialize rows using the given layout.
///
/// Every line, the last included, ends with `\n`.
pub fn export(rows: &[CountryRow], options: &ExportOptions) -> Vec<u8> {
    let columns = options.column_count();
    let separator = options.delimiter.to_string();
    let mut out = String::new();

    let headers: Vec<String> = COLUMN_NAMES[..columns]
        .iter()
        .map(|name| quote_field(name, options.delimiter))
        .collect();
    out.push_str(&headers.join(&separator));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row_cells(row)
            .into_iter()
            .take(columns)
            .map(|cell| quote_field(&cell, options.delimiter))
            .collect();
        out.push_str(&cells.join(&separator));
        out.push('\n');
    }

    out.into_bytes()
}

fn row_cells(row: &CountryRow) -> [String; 9] {
    [
        row.name.clone(),
        row.region.clone(),
        row.population.to_string(),
        row.area.to_string(),
        row.border_count.to_string(),
        row.official_language_count.to_string(),
        row.timezone_count.to_string(),
        row.latitude.map(|v| v.to_string()).unwrap_or_default(),
        row.longitude.map(|v| v.to_string()).unwrap_or_default(),
    ]
}

/// Quote a field if necessary (contains delimiter, quotes, or newlines)
fn quote_field(value: &str, delimiter: char) -> String {
    let needs_quoting = value.contains(delimiter)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');

    if needs_quoting {
        // Escape internal quotes by doubling them
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize rows as an Excel workbook with all nine columns
pub fn to_xlsx(rows: &[CountryRow]) -> ExportResult<Vec<u8>> {
    export_xlsx(rows, &ExportOptions::csv())
}

/// Serialize rows as an Excel workbook.
///
/// One worksheet named `countries`: the header row holds the canonical
/// column names, counts and measures are numeric cells, absent coordinates
/// are left blank. The delimiter of `options` is ignored.
pub fn export_xlsx(rows: &[CountryRow], options: &ExportOptions) -> ExportResult<Vec<u8>> {
    let columns = options.column_count();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET_NAME)?;

    for (col, name) in COLUMN_NAMES[..columns].iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let line = i as u32 + 1;
        sheet.write_string(line, 0, row.name.as_str())?;
        sheet.write_string(line, 1, row.region.as_str())?;

        let numbers = [
            Some(row.population as f64),
            Some(row.area),
            Some(row.border_count as f64),
            Some(row.official_language_count as f64),
            Some(row.timezone_count as f64),
            row.latitude,
            row.longitude,
        ];
        for (offset, value) in numbers.into_iter().take(columns - 2).enumerate() {
            if let Some(value) = value {
                sheet.write_number(line, (offset + 2) as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write export bytes to `path` atomically.
///
/// Bytes go to a temporary file next to the destination which is then
/// renamed over it, so readers never observe a partial export.
pub fn write_export(path: &Path, bytes: &[u8]) -> ExportResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "export: written");
    Ok(())
}

/// Read comma-separated export bytes back into rows
pub fn parse_csv(bytes: &[u8]) -> ExportResult<Vec<CountryRow>> {
    parse_export(bytes, ',')
}

/// Read export bytes produced with the given delimiter.
///
/// Accepts both the seven- and nine-column layouts.
pub fn parse_export(bytes: &[u8], delimiter: char) -> ExportResult<Vec<CountryRow>> {
    let content = std::str::from_utf8(bytes).map_err(|_| ExportError::Encoding)?;
    let mut records = split_records(content, delimiter).into_iter();

    let header = records.next().ok_or(ExportError::MissingHeader)?;
    let columns = header.len();
    let expected_header = &COLUMN_NAMES[..columns.min(COLUMN_NAMES.len())];
    if (columns != COLUMN_NAMES.len() && columns != CORE_COLUMN_COUNT) || header != expected_header {
        return Err(ExportError::HeaderMismatch(header.join(&delimiter.to_string())));
    }

    records
        .enumerate()
        .map(|(i, fields)| {
            // line numbers are 1-based and count the header
            let line = i + 2;
            if fields.len() != columns {
                return Err(ExportError::ColumnCount {
                    line,
                    expected: columns,
                    found: fields.len(),
                });
            }
            parse_row(&fields, line)
        })
        .collect()
}

fn parse_row(fields: &[String], line: usize) -> ExportResult<CountryRow> {
    let int = |idx: usize| -> ExportResult<u64> {
        fields[idx].parse().map_err(|_| invalid(line, idx, &fields[idx]))
    };
    let float = |idx: usize| -> ExportResult<f64> {
        fields[idx].parse().map_err(|_| invalid(line, idx, &fields[idx]))
    };
    let coordinate = |idx: usize| -> ExportResult<Option<f64>> {
        match fields.get(idx).map(String::as_str) {
            None | Some("") => Ok(None),
            Some(_) => float(idx).map(Some),
        }
    };

    Ok(CountryRow {
        name: fields[0].clone(),
        region: fields[1].clone(),
        population: int(2)?,
        area: float(3)?,
        border_count: int(4)?,
        official_language_count: int(5)?,
        timezone_count: int(6)?,
        latitude: coordinate(7)?,
        longitude: coordinate(8)?,
    })
}

fn invalid(line: usize, idx: usize, value: &str) -> ExportError {
    ExportError::InvalidValue {
        line,
        column: COLUMN_NAMES[idx],
        value: value.to_string(),
    }
}

/// Split content into records, respecting quoted fields.
///
/// Quoted fields may contain the delimiter, doubled quotes and line breaks.
/// Blank lines are skipped.
fn split_records(content: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                if !(record.len() == 1 && record[0].is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}
