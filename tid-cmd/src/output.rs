//! Printing records as an aligned table or as CSV.

use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Csv,
}

#[derive(Debug, Clone)]
pub struct Output {
    format: Format,
    path: Option<PathBuf>,
}

impl Output {
    pub fn new(csv: bool, path: Option<PathBuf>) -> Self {
        let format = if csv { Format::Csv } else { Format::Table };
        Self { format, path }
    }

    /// Write `records` to the configured file, or stdout.
    pub fn write<T: Serialize>(&self, records: &[T]) -> anyhow::Result<()> {
        match &self.path {
            Some(path) => self.write_to(File::create(path)?, records),
            None => self.write_to(io::stdout().lock(), records),
        }
    }

    pub fn write_to<W: Write, T: Serialize>(&self, writer: W, records: &[T]) -> anyhow::Result<()> {
        match self.format {
            Format::Csv => {
                let mut wtr = csv::Writer::from_writer(writer);
                for record in records {
                    wtr.serialize(record)?;
                }
                wtr.flush()?;
            }
            Format::Table => write_table(writer, records)?,
        }
        Ok(())
    }
}

/// Columns padded to their widest cell, header first.
fn write_table<W: Write, T: Serialize>(mut writer: W, records: &[T]) -> anyhow::Result<()> {
    if records.is_empty() {
        writeln!(writer, "(no rows)")?;
        return Ok(());
    }

    let mut buffer = csv::Writer::from_writer(Vec::new());
    for record in records {
        buffer.serialize(record)?;
    }
    let bytes = buffer.into_inner()?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes.as_slice());
    let rows = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;

    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for row in &rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<String>>()
            .join(COLUMN_GAP);
        writeln!(writer, "{}", line.trim_end())?;
    }
    writer.flush()?;
    Ok(())
}
