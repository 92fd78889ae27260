//! Excel import/export tests against real workbook files

use pretty_assertions::assert_eq;
use royalbit_xlrecords::error::{ErrorKind, XlError};
use royalbit_xlrecords::excel::{
    generate_workbook_from_data, generate_workbook_from_text, read_multiple_workbooks,
    read_workbook_bytes, ExcelExporter, ExcelImporter,
};
use royalbit_xlrecords::types::{MissingKeyPolicy, Record, RecordSet, WriteOptions};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

/// Cell content for fixture workbooks
enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Blank,
}

use Cell::{Blank, Bool, Number, Text};

/// Write a one-sheet workbook from rows of cells
fn write_fixture(path: &Path, rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Text(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Number(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Bool(b) => {
                    worksheet.write_boolean(r, c, *b).unwrap();
                }
                Blank => {}
            }
        }
    }

    workbook.save(path).unwrap();
}

fn record(fields: &[(&str, &str)]) -> Record {
    fields.iter().copied().collect()
}

fn keys(record: &Record) -> Vec<&str> {
    record.keys().collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// READER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_read_no_files_is_empty() {
    let paths: Vec<PathBuf> = Vec::new();
    let records = read_multiple_workbooks(&paths).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_read_single_file_two_rows() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("people.xlsx");
    write_fixture(
        &path,
        &[
            vec![Text(" id "), Text("name  ")],
            vec![Number(1.0), Text("  Alice")],
            vec![Number(2.0), Text("Bob  ")],
        ],
    );

    let records = read_multiple_workbooks(&[&path]).unwrap();

    assert_eq!(records.len(), 2);
    for rec in &records {
        assert_eq!(keys(rec), vec!["id", "name"]);
    }
    assert_eq!(records.records()[0], record(&[("id", "1"), ("name", "Alice")]));
    assert_eq!(records.records()[1], record(&[("id", "2"), ("name", "Bob")]));
}

#[test]
fn test_read_merges_files_in_order_with_own_headers() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.xlsx");
    let second = temp_dir.path().join("second.xlsx");
    write_fixture(
        &first,
        &[
            vec![Text("sku"), Text("qty")],
            vec![Text("A-1"), Number(3.0)],
            vec![Text("A-2"), Number(4.0)],
        ],
    );
    write_fixture(
        &second,
        &[vec![Text("sku"), Text("price")], vec![Text("B-1"), Number(9.5)]],
    );

    let records = read_multiple_workbooks(&[&first, &second]).unwrap();

    assert_eq!(
        records.into_records(),
        vec![
            record(&[("sku", "A-1"), ("qty", "3")]),
            record(&[("sku", "A-2"), ("qty", "4")]),
            record(&[("sku", "B-1"), ("price", "9.5")]),
        ]
    );
}

#[test]
fn test_read_renders_scalars_as_text() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("scalars.xlsx");
    write_fixture(
        &path,
        &[
            vec![Text("n"), Text("flag"), Text("empty"), Text("ratio")],
            vec![Number(42.0), Bool(true), Blank, Number(0.25)],
        ],
    );

    let records = read_multiple_workbooks(&[&path]).unwrap();

    assert_eq!(
        records.records()[0],
        record(&[("n", "42"), ("flag", "TRUE"), ("empty", ""), ("ratio", "0.25")])
    );
}

#[test]
fn test_read_date_cells() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dates.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
    worksheet.write_string(0, 0, "when").unwrap();
    worksheet
        .write_datetime_with_format(1, 0, &date, &date_format)
        .unwrap();
    workbook.save(&path).unwrap();

    let records = read_multiple_workbooks(&[&path]).unwrap();

    assert_eq!(records.records()[0].get("when"), Some("2024-01-15"));
}

#[test]
fn test_read_ragged_rows_use_header_width() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ragged.xlsx");
    write_fixture(
        &path,
        &[
            vec![Text("a"), Text("b"), Text("c")],
            vec![Text("1")],
            vec![Blank, Blank, Text("3")],
        ],
    );

    let records = read_multiple_workbooks(&[&path]).unwrap();

    assert_eq!(
        records.into_records(),
        vec![
            record(&[("a", "1"), ("b", ""), ("c", "")]),
            record(&[("a", ""), ("b", ""), ("c", "3")]),
        ]
    );
}

#[test]
fn test_read_only_first_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("two_sheets.xlsx");

    let mut workbook = Workbook::new();
    let first = workbook.add_worksheet();
    first.set_name("First").unwrap();
    first.write_string(0, 0, "k").unwrap();
    first.write_string(1, 0, "from-first").unwrap();
    let second = workbook.add_worksheet();
    second.set_name("Second").unwrap();
    second.write_string(0, 0, "k").unwrap();
    second.write_string(1, 0, "from-second").unwrap();
    workbook.save(&path).unwrap();

    let records = read_multiple_workbooks(&[&path]).unwrap();

    assert_eq!(records.into_records(), vec![record(&[("k", "from-first")])]);
}

#[test]
fn test_read_empty_sheet_yields_no_records() {
    let temp_dir = TempDir::new().unwrap();
    let empty = temp_dir.path().join("empty.xlsx");
    let full = temp_dir.path().join("full.xlsx");
    write_fixture(&empty, &[]);
    write_fixture(&full, &[vec![Text("x")], vec![Text("1")]]);

    let records = read_multiple_workbooks(&[&empty, &full]).unwrap();

    assert_eq!(records.into_records(), vec![record(&[("x", "1")])]);
}

#[test]
fn test_read_missing_file_is_io_failure() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.xlsx");

    let err = read_multiple_workbooks(&[&missing]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert!(err.to_string().contains("missing.xlsx"));
}

#[test]
fn test_read_corrupt_file_is_io_failure() {
    let temp_dir = TempDir::new().unwrap();
    let corrupt = temp_dir.path().join("corrupt.xlsx");
    std::fs::write(&corrupt, "this is not a zip archive").unwrap();

    let err = read_multiple_workbooks(&[&corrupt]).unwrap_err();

    assert!(matches!(err, XlError::Workbook { .. }));
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}

#[test]
fn test_read_failure_in_later_file_fails_whole_call() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.xlsx");
    write_fixture(&good, &[vec![Text("x")], vec![Text("1")]]);
    let missing = temp_dir.path().join("missing.xlsx");

    let result = ExcelImporter::new([&good, &missing]).import();

    assert!(result.is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// WRITER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_generate_empty_data_is_invalid_input() {
    let err = generate_workbook_from_data(&[], "Sheet1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_generate_missing_key_policies() {
    let records = vec![record(&[("a", "1"), ("b", "2")]), record(&[("a", "3")])];

    let err = generate_workbook_from_data(&records, "S").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);

    let options = WriteOptions::new("S").with_missing_key_policy(MissingKeyPolicy::Blank);
    let bytes = ExcelExporter::new(options).export_records(&records).unwrap();
    let back = read_workbook_bytes(&bytes).unwrap();

    assert_eq!(
        back.into_records(),
        vec![
            record(&[("a", "1"), ("b", "2")]),
            record(&[("a", "3"), ("b", "")]),
        ]
    );
}

#[test]
fn test_generate_from_text_malformed_is_distinct_from_invalid() {
    for document in ["", "{not json"] {
        let err = generate_workbook_from_text(document, "S").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    let err = generate_workbook_from_text("[]", "S").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_generate_from_text_single_row() {
    let bytes = generate_workbook_from_text(r#"[{"x":"1"}]"#, "S").unwrap();
    let back = read_workbook_bytes(&bytes).unwrap();

    assert_eq!(back.len(), 1);
    assert_eq!(keys(&back.records()[0]), vec!["x"]);
    assert_eq!(back.records()[0].get("x"), Some("1"));
}

#[test]
fn test_generate_to_file_and_read_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.xlsx");
    let records = vec![
        record(&[("city", "Lisbon"), ("pop", "545000")]),
        record(&[("city", "Porto"), ("pop", "232000")]),
    ];

    ExcelExporter::new(WriteOptions::new("Cities"))
        .export_to_file(&records, &path)
        .unwrap();

    let back = read_multiple_workbooks(&[&path]).unwrap();
    assert_eq!(back.into_records(), records);
}

// ═══════════════════════════════════════════════════════════════════════════
// ROUND TRIP
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_round_trip_preserves_records() {
    let original: RecordSet = vec![
        record(&[("id", "1"), ("name", "Ana"), ("note", "")]),
        record(&[("id", "2"), ("name", "Bruno"), ("note", "vip")]),
        record(&[("id", "3"), ("name", "Carla Sousa"), ("note", "42.5")]),
    ]
    .into();

    let bytes = generate_workbook_from_data(original.records(), "Sheet1").unwrap();
    let back = read_workbook_bytes(&bytes).unwrap();

    assert_eq!(back, original);
}

#[test]
fn test_round_trip_json_values_coerced_to_text() {
    let document = r#"[
        {"id": 1, "active": true, "score": 9.5, "tag": null},
        {"id": 2, "active": false, "score": 7, "tag": "x"}
    ]"#;

    let bytes = generate_workbook_from_text(document, "Sheet1").unwrap();
    let back = read_workbook_bytes(&bytes).unwrap();

    assert_eq!(
        back.into_records(),
        vec![
            record(&[("id", "1"), ("active", "true"), ("score", "9.5"), ("tag", "")]),
            record(&[("id", "2"), ("active", "false"), ("score", "7"), ("tag", "x")]),
        ]
    );
}

#[test]
fn test_round_trip_keeps_interior_empty_records() {
    let original: RecordSet = vec![
        record(&[("a", "1"), ("b", "2")]),
        record(&[("a", ""), ("b", "")]),
        record(&[("a", "3"), ("b", "4")]),
    ]
    .into();

    let bytes = generate_workbook_from_data(original.records(), "Sheet1").unwrap();
    let back = read_workbook_bytes(&bytes).unwrap();

    assert_eq!(back, original);
}

#[test]
fn test_round_trip_drops_trailing_empty_records() {
    // A row of blank cells is outside the used range, so it cannot come back
    let original = vec![
        record(&[("a", "1"), ("b", "2")]),
        record(&[("a", ""), ("b", "")]),
    ];
    let bytes = generate_workbook_from_data(&original, "Sheet1").unwrap();
    let back = read_workbook_bytes(&bytes).unwrap();
    assert_eq!(back.into_records(), vec![record(&[("a", "1"), ("b", "2")])]);

    let only_empty = vec![record(&[("a", "")])];
    let bytes = generate_workbook_from_data(&only_empty, "Sheet1").unwrap();
    assert!(read_workbook_bytes(&bytes).unwrap().is_empty());
}
