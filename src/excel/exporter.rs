//! Excel exporter implementation - records → `.xlsx` bytes

use crate::error::{XlError, XlResult};
use crate::types::{MissingKeyPolicy, Record, WriteOptions, DEFAULT_SHEET_NAME};
use indexmap::IndexMap;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Excel exporter writing one sheet of records
pub struct ExcelExporter {
    options: WriteOptions,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Build a workbook from records and return it as `.xlsx` bytes.
    ///
    /// The header is the first record's keys. Keys that only later records
    /// carry are not written; a header key missing from a later record is
    /// handled by the configured [`MissingKeyPolicy`].
    pub fn export_records(&self, records: &[Record]) -> XlResult<Vec<u8>> {
        if records.is_empty() {
            return Err(XlError::InvalidInput("data is empty".to_string()));
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.options.sheet_name).map_err(|e| {
            XlError::InvalidInput(format!(
                "invalid sheet name '{}': {}",
                self.options.sheet_name, e
            ))
        })?;

        self.write_sheet(worksheet, records)?;

        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| XlError::Serialize(e.to_string()))?;

        info!(
            sheet = %self.options.sheet_name,
            records = records.len(),
            bytes = bytes.len(),
            "export complete"
        );
        Ok(bytes)
    }

    /// Parse a JSON array of objects and export it like [`Self::export_records`]
    pub fn export_json(&self, document: &str) -> XlResult<Vec<u8>> {
        let records = parse_json_records(document)?;
        self.export_records(&records)
    }

    /// Export records straight to a file
    pub fn export_to_file(&self, records: &[Record], output_path: &Path) -> XlResult<()> {
        let bytes = self.export_records(records)?;
        std::fs::write(output_path, bytes)?;
        Ok(())
    }

    fn write_sheet(&self, worksheet: &mut Worksheet, records: &[Record]) -> XlResult<()> {
        let header = header_from_records(records);
        debug!(columns = header.len(), rows = records.len(), "writing sheet");

        // Header row (row 0)
        for (col_idx, name) in header.iter().enumerate() {
            let col = column_index(col_idx)?;
            worksheet
                .write_string(0, col, *name)
                .map_err(|e| XlError::InvalidInput(format!("Failed to write header: {}", e)))?;
        }

        // Data rows start at row 1
        for (record_idx, record) in records.iter().enumerate() {
            let row = u32::try_from(record_idx + 1)
                .map_err(|_| XlError::InvalidInput("too many records for one sheet".to_string()))?;

            for (col_idx, key) in header.iter().enumerate() {
                let value = match record.get(key) {
                    Some(value) => value,
                    None => match self.options.on_missing_key {
                        MissingKeyPolicy::Fail => {
                            return Err(XlError::KeyNotFound {
                                key: key.to_string(),
                                record: record_idx,
                            })
                        }
                        MissingKeyPolicy::Blank => {
                            warn!(key = %key, record = record_idx, "missing key written as blank");
                            continue;
                        }
                    },
                };

                // Excel has no empty-string cells; leave them blank
                if value.is_empty() {
                    continue;
                }

                worksheet
                    .write_string(row, column_index(col_idx)?, value)
                    .map_err(|e| XlError::InvalidInput(format!("Failed to write cell: {}", e)))?;
            }
        }

        worksheet.autofit();
        Ok(())
    }
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new(WriteOptions::default())
    }
}

/// Header for a write: the first record's keys, in order
pub fn header_from_records(records: &[Record]) -> Vec<&str> {
    records
        .first()
        .map(|first| first.keys().collect())
        .unwrap_or_default()
}

/// Decode a JSON array of objects into records, keeping key order.
///
/// Blank text and anything that is not an array of objects is
/// [`XlError::MalformedInput`]. An empty array decodes fine; rejecting it is
/// the exporter's job.
pub fn parse_json_records(document: &str) -> XlResult<Vec<Record>> {
    if document.trim().is_empty() {
        return Err(XlError::MalformedInput("JSON input is required".to_string()));
    }

    let rows: Vec<IndexMap<String, serde_json::Value>> = serde_json::from_str(document)
        .map_err(|e| XlError::MalformedInput(format!("invalid JSON: {}", e)))?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(key, value)| (key, json_value_to_text(value)))
                .collect()
        })
        .collect())
}

fn json_value_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn column_index(idx: usize) -> XlResult<u16> {
    u16::try_from(idx)
        .map_err(|_| XlError::InvalidInput(format!("column {} exceeds sheet width", idx + 1)))
}

/// Write records to a one-sheet workbook, failing on missing keys
///
/// Empty values leave their cell blank. Reading the workbook back with
/// [`read_multiple_workbooks`](crate::excel::read_multiple_workbooks)
/// returns the same records, except that trailing records whose values
/// are all empty are lost: blank rows at the end of a sheet are not in
/// its used range.
pub fn generate_workbook_from_data(records: &[Record], sheet_name: &str) -> XlResult<Vec<u8>> {
    ExcelExporter::new(WriteOptions::new(sheet_name)).export_records(records)
}

/// Write a JSON array of objects to a one-sheet workbook
pub fn generate_workbook_from_text(document: &str, sheet_name: &str) -> XlResult<Vec<u8>> {
    ExcelExporter::new(WriteOptions::new(sheet_name)).export_json(document)
}

/// [`generate_workbook_from_data`] with the default sheet name
pub fn generate_workbook(records: &[Record]) -> XlResult<Vec<u8>> {
    generate_workbook_from_data(records, DEFAULT_SHEET_NAME)
}
