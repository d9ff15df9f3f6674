use std::io::{Read, Write};
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};

use super::error::ImportParseError;
use super::model::{Column, Table, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an uploaded pipeline table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`                          – header row + one row per line
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, first row is the header
///
/// Headers are returned as found; the store normalizes them on `replace`.
pub fn load_file(path: &Path) -> Result<Table, ImportParseError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)?;
            Ok(read_csv(file)?)
        }
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path),
        other => Err(ImportParseError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV codec
// ---------------------------------------------------------------------------

/// Parse CSV with a header row. Short records are padded with `Empty`,
/// fields beyond the header are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut columns: Vec<Column> = headers
        .into_iter()
        .map(|name| Column::new(name, Vec::new()))
        .collect();

    for result in reader.records() {
        let record = result?;
        for (idx, col) in columns.iter_mut().enumerate() {
            col.values
                .push(record.get(idx).map(Value::parse_cell).unwrap_or_default());
        }
    }

    Ok(Table::from_columns(columns))
}

/// Write the header row followed by every row, in table column order.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    // A header with no fields cannot round-trip, so an empty schema writes nothing.
    if table.columns().is_empty() {
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.column_names())?;
    for row in 0..table.n_rows() {
        let record: Vec<String> = (0..table.columns().len())
            .map(|col| table.cell(row, col).to_string())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<Table, ImportParseError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportParseError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        log::info!("Worksheet {sheet_name:?} is empty");
        return Ok(Table::default());
    };

    let mut columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            Data::Empty => Column::new(format!("Unnamed: {idx}"), Vec::new()),
            other => Column::new(other.to_string(), Vec::new()),
        })
        .collect();

    for row in rows {
        for (idx, col) in columns.iter_mut().enumerate() {
            col.values
                .push(row.get(idx).map(workbook_cell_value).unwrap_or_default());
        }
    }

    log::debug!(
        "Read worksheet {sheet_name:?}: {} columns, {} rows",
        columns.len(),
        range.height().saturating_sub(1)
    );
    Ok(Table::from_columns(columns))
}

/// Map a workbook cell to the same typing a CSV cell would get after the
/// table is persisted and reloaded.
fn workbook_cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Empty,
        Data::String(s) => Value::parse_cell(s),
        Data::Float(f) if f.is_finite() => Value::Number(*f),
        Data::Float(_) => Value::Empty,
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Text(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
            None => Value::Text(cell.to_string()),
        },
        other => Value::Text(other.to_string()),
    }
}
