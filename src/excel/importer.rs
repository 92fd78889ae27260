//! Excel importer implementation - workbook files → records

use crate::error::{XlError, XlResult};
use crate::types::{Record, RecordSet};
use calamine::{open_workbook_auto, Data, ExcelDateTime, ExcelDateTimeType, Range, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Largest serial Excel can display (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Days between the 1900 and 1904 epochs
const EPOCH_1904_OFFSET_DAYS: f64 = 1_462.0;

/// Excel importer: reads the first sheet of each workbook into records
pub struct ExcelImporter {
    paths: Vec<PathBuf>,
}

impl ExcelImporter {
    /// Create an importer over an ordered list of workbook paths
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            paths: paths
                .into_iter()
                .map(|p| p.as_ref().to_path_buf())
                .collect(),
        }
    }

    /// Import every workbook, in order, into one record set.
    ///
    /// Stops at the first failing file; nothing read so far is returned.
    pub fn import(&self) -> XlResult<RecordSet> {
        let mut records = RecordSet::new();

        for path in &self.paths {
            let before = records.len();
            self.import_file(path, &mut records)?;
            debug!(
                path = %path.display(),
                rows = records.len() - before,
                "imported workbook"
            );
        }

        info!(
            files = self.paths.len(),
            records = records.len(),
            "import complete"
        );
        Ok(records)
    }

    fn import_file(&self, path: &Path, records: &mut RecordSet) -> XlResult<()> {
        // Handle is dropped at the end of this scope on every path
        let mut workbook = open_workbook_auto(path).map_err(|e| XlError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        records.extend(first_sheet_records(&mut workbook, path)?);
        Ok(())
    }
}

/// Read records from the first sheet of every path, in order
///
/// Records span the sheet's used range. Rows after the last non-empty
/// cell are not part of it, so a workbook whose final records were all
/// blank (see [`generate_workbook_from_data`](crate::excel::generate_workbook_from_data))
/// reads back without them.
pub fn read_multiple_workbooks<P: AsRef<Path>>(paths: &[P]) -> XlResult<RecordSet> {
    ExcelImporter::new(paths).import()
}

/// Read records from the first sheet of an in-memory `.xlsx` buffer
pub fn read_workbook_bytes(bytes: &[u8]) -> XlResult<RecordSet> {
    let source = Path::new("<memory>");
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| XlError::Workbook {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(RecordSet::from(first_sheet_records(&mut workbook, source)?))
}

fn first_sheet_records<RS, R>(workbook: &mut R, source: &Path) -> XlResult<Vec<Record>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| XlError::Workbook {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?,
        None => {
            debug!(path = %source.display(), "workbook has no sheets");
            return Ok(Vec::new());
        }
    };

    records_from_range(&range)
}

/// Map a sheet to records: row 1 is the header, every later row a record.
///
/// Positions are absolute from A1, so a sheet whose used range starts
/// further down still treats A1's row as the header.
pub fn records_from_range(range: &Range<Data>) -> XlResult<Vec<Record>> {
    let (last_row, last_col) = match range.end() {
        Some(end) if !range.is_empty() => end,
        _ => return Ok(Vec::new()),
    };

    let header = (0..=last_col)
        .map(|col| cell_text(range, 0, col))
        .collect::<XlResult<Vec<String>>>()?;

    debug!(
        columns = header.len(),
        data_rows = last_row,
        "mapping sheet to records"
    );

    let mut records = Vec::with_capacity(last_row as usize);
    for row in 1..=last_row {
        let mut record = Record::with_capacity(header.len());
        for (col, name) in (0..=last_col).zip(&header) {
            record.insert(name.as_str(), cell_text(range, row, col)?);
        }
        records.push(record);
    }

    Ok(records)
}

fn cell_text(range: &Range<Data>, row: u32, col: u32) -> XlResult<String> {
    match range.get_value((row, col)) {
        Some(cell) => cell_to_text(cell).map_err(|message| XlError::DataConversion {
            cell: cell_reference(row, col),
            message,
        }),
        None => Ok(String::new()),
    }
}

/// Render a cell as trimmed text
///
/// Dates follow the workbook's epoch (1900 or 1904) and come out as
/// `YYYY-MM-DD`, or `YYYY-MM-DD HH:MM:SS` when a time of day is present.
/// A 1900-system serial below one day has no date part and renders as
/// `HH:MM:SS`. Durations render as `H:MM:SS` with unbounded hours.
pub fn cell_to_text(cell: &Data) -> Result<String, String> {
    let text = match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => {
            let rendered = if dt.is_duration() {
                format_duration(dt.as_f64())
            } else {
                format_datetime(dt)
            };
            rendered.ok_or_else(|| format!("date serial {} is out of range", dt.as_f64()))?
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    };
    Ok(text.trim().to_string())
}

/// Date serial → `YYYY-MM-DD[ HH:MM:SS]`, rounded to the nearest second
fn format_datetime(dt: &ExcelDateTime) -> Option<String> {
    let serial = dt.as_f64();
    let is_1904 = uses_1904_epoch(dt);
    let max = if is_1904 {
        MAX_EXCEL_SERIAL - EPOCH_1904_OFFSET_DAYS
    } else {
        MAX_EXCEL_SERIAL
    };
    if !serial.is_finite() || !(0.0..max).contains(&serial) {
        return None;
    }

    // calamine truncates to whole seconds; nudge so that truncation rounds
    let nudged = serial + 0.5 / SECONDS_PER_DAY;
    let (year, month, day, hour, minute, second, _) =
        ExcelDateTime::new(nudged, ExcelDateTimeType::DateTime, is_1904).to_ymd_hms_milli();

    let time = format!("{:02}:{:02}:{:02}", hour, minute, second);
    if year < 1900 {
        // 1899-12-31 is serial 0 of the 1900 system: a bare time of day
        return Some(time);
    }
    let date = format!("{:04}-{:02}-{:02}", year, month, day);
    if (hour, minute, second) == (0, 0, 0) {
        Some(date)
    } else {
        Some(format!("{} {}", date, time))
    }
}

/// calamine keeps the epoch flag private, so compare against a 1904 twin
fn uses_1904_epoch(dt: &ExcelDateTime) -> bool {
    *dt == ExcelDateTime::new(dt.as_f64(), ExcelDateTimeType::DateTime, true)
}

/// Duration serial (days) → `H:MM:SS`, hours unbounded
fn format_duration(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial.abs() * SECONDS_PER_DAY > i64::MAX as f64 {
        return None;
    }

    let total = (serial * SECONDS_PER_DAY).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    Some(format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    ))
}

/// A1-style reference for a 0-based (row, col)
fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", number_to_column_letter(col as usize), row + 1)
}

/// Convert column index to Excel column letter (0→A, 1→B, 25→Z, 26→AA, etc.)
fn number_to_column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}
