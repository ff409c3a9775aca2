use crate::config::{OutputFormat, WRITE_BUFFER_SIZE};
use crate::models::Table;
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Borrows the records so serialization never clones field text.
#[derive(Serialize)]
struct TableDocSer<'a> {
    table: &'a str,
    columns: &'a [&'a str],
    rows: Vec<&'a [String]>,
}

#[derive(Deserialize)]
struct TableDocDe {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Renders `records` to `writer`. Identical input always produces identical bytes.
pub fn write_records<T: Table, W: Write>(
    writer: W,
    records: &[T],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut csv_writer = Writer::from_writer(writer);
            csv_writer.write_record(T::COLUMNS)?;
            for record in records {
                csv_writer.write_record(record.fields())?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Json => {
            let doc = TableDocSer {
                table: T::NAME,
                columns: T::COLUMNS,
                rows: records.iter().map(|r| r.fields()).collect(),
            };
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &doc)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Writes `records` to `path`, creating parent directories as needed.
pub fn save_records<T: Table>(path: &Path, records: &[T], format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?;
    write_records(
        BufWriter::with_capacity(WRITE_BUFFER_SIZE, file),
        records,
        format,
    )
    .with_context(|| format!("Failed to write records to: {:?}", path))?;

    info!(path = %path.display(), records = records.len(), "Output written");
    Ok(())
}

/// Reads records previously written by [`write_records`], checking the stored
/// columns against the schema of `T`.
pub fn read_records<T: Table, R: Read>(reader: R, format: OutputFormat) -> Result<Vec<T>> {
    match format {
        OutputFormat::Csv => {
            let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
            let headers = csv_reader.headers()?.clone();
            if !headers.iter().eq(T::COLUMNS.iter().copied()) {
                bail!("Column header does not match the {} schema", T::NAME);
            }

            let mut records = Vec::new();
            for (line, result) in csv_reader.records().enumerate() {
                let row = result?;
                let fields: Vec<String> = row.iter().map(str::to_string).collect();
                let record = T::assemble(fields)
                    .with_context(|| format!("Invalid record at row {}", line + 1))?;
                records.push(record);
            }
            Ok(records)
        }
        OutputFormat::Json => {
            let doc: TableDocDe = serde_json::from_reader(reader)?;
            if !doc.columns.iter().map(String::as_str).eq(T::COLUMNS.iter().copied()) {
                bail!(
                    "Columns of table {} do not match the {} schema",
                    doc.table,
                    T::NAME
                );
            }
            doc.rows
                .into_iter()
                .enumerate()
                .map(|(i, fields)| {
                    T::assemble(fields).with_context(|| format!("Invalid record at row {}", i + 1))
                })
                .collect()
        }
    }
}

pub fn load_records<T: Table>(path: &Path, format: OutputFormat) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
    read_records(BufReader::new(file), format)
        .with_context(|| format!("Failed to read records from: {:?}", path))
}
