//! Excel import/export for record collections
//!
//! This module provides bidirectional workbook ↔ record conversion:
//! - Import: first sheet of each workbook → ordered text records
//! - Export: records (or a JSON array of objects) → single-sheet `.xlsx` bytes

mod exporter;
mod importer;

pub use exporter::{
    generate_workbook, generate_workbook_from_data, generate_workbook_from_text,
    header_from_records, parse_json_records, ExcelExporter,
};
pub use importer::{
    cell_to_text, read_multiple_workbooks, read_workbook_bytes, records_from_range, ExcelImporter,
};
