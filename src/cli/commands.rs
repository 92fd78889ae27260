use crate::error::{XlError, XlResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::{RecordSet, WriteOptions};
use colored::Colorize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Serialization format for imported records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render records in the requested format
fn render_records(records: &RecordSet, format: OutputFormat) -> XlResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(records)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| XlError::Serialize(e.to_string())),
        OutputFormat::Yaml => {
            serde_yaml::to_string(records).map_err(|e| XlError::Serialize(e.to_string()))
        }
    }
}

/// Read a JSON document from a path, or from stdin when the path is `-`
fn read_document(input: &Path) -> XlResult<String> {
    if input == Path::new("-") {
        let mut document = String::new();
        std::io::stdin().read_to_string(&mut document)?;
        Ok(document)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Execute the read command
///
/// Status lines go to stderr so stdout carries only the records.
pub fn read(
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> XlResult<()> {
    eprintln!("{}", "📖 xlrecords - Reading workbooks".bold().green());
    if verbose {
        for file in &files {
            eprintln!("   File: {}", file.display());
        }
        eprintln!();
    }

    let records = ExcelImporter::new(&files).import()?;
    let rendered = render_records(&records, format)?;

    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            eprintln!("{}", "✅ Read Complete!".bold().green());
            eprintln!(
                "   {} records from {} file(s) → {}\n",
                records.len(),
                files.len(),
                path.display()
            );
        }
        None => {
            print!("{}", rendered);
            eprintln!(
                "{} {} records from {} file(s)",
                "✅".green(),
                records.len(),
                files.len()
            );
        }
    }

    Ok(())
}

/// Execute the write command
pub fn write(input: PathBuf, output: PathBuf, options: WriteOptions, verbose: bool) -> XlResult<()> {
    println!("{}", "📊 xlrecords - Writing workbook".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Parsing JSON records...".cyan());
        println!("   Sheet: {}", options.sheet_name.bright_blue());
        println!("   Missing keys: {:?}\n", options.on_missing_key);
    }

    let document = read_document(&input)?;
    let bytes = ExcelExporter::new(options).export_json(&document)?;

    if verbose {
        println!("{}", "💾 Writing Excel file...".cyan());
    }
    fs::write(&output, &bytes)?;

    println!("{}", "✅ Write Complete!".bold().green());
    println!("   Excel file: {} ({} bytes)\n", output.display(), bytes.len());

    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
