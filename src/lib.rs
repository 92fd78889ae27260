//! xlrecords - spreadsheet ↔ record conversion
//!
//! Reads the first sheet of one or more workbooks into ordered text records,
//! and writes records (or a JSON array of objects) back to a single-sheet
//! `.xlsx` workbook.
//!
//! # Features
//!
//! - Header row inference, ragged rows padded with empty text
//! - Every cell normalized to trimmed text
//! - Header derived from the first record on write, with a configurable
//!   policy for records missing a header key
//! - CLI (`xlrecords`) and HTTP API (`xlrecords-server`)
//!
//! # Example
//!
//! ```no_run
//! use royalbit_xlrecords::excel::{generate_workbook_from_data, read_multiple_workbooks};
//!
//! let records = read_multiple_workbooks(&["q1.xlsx", "q2.xlsx"])?;
//! println!("Records: {}", records.len());
//!
//! let bytes = generate_workbook_from_data(records.records(), "Merged")?;
//! std::fs::write("merged.xlsx", bytes)?;
//! # Ok::<(), royalbit_xlrecords::error::XlError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, XlError, XlResult};
pub use types::{MissingKeyPolicy, Record, RecordSet, WriteOptions};
