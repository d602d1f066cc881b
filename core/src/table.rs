//! Row-oriented interchange for decoded records.
//!
//! CSV uses the record field names as header and an empty cell for a null.
//! Columns are matched by name, so their order is irrelevant on import.

use crate::prelude::{TelemetryError, TelemetryResult};
use crate::protocol::Record;

pub const COLUMNS: [&str; 11] = [
    "local_ts",
    "valid",
    "device",
    "msg_id",
    "data_type",
    "sensor",
    "value",
    "unit",
    "esp_ts",
    "checksum",
    "time_sec",
];

pub fn to_json_rows(records: &[Record]) -> TelemetryResult<String> {
    Ok(serde_json::to_string(records)?)
}

pub fn from_json_rows(json: &str) -> TelemetryResult<Vec<Record>> {
    let records: Vec<Record> = serde_json::from_str(json)?;
    check_records(&records)?;
    Ok(records)
}

pub fn to_csv(records: &[Record]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for record in records {
        let cells = [
            opt(record.local_ts),
            record.valid.to_string(),
            quote(&record.device),
            opt(record.msg_id),
            quote(&record.data_type),
            quote(&record.sensor),
            opt(record.value),
            quote(&record.unit),
            opt(record.esp_ts),
            record.checksum.as_deref().map(quote).unwrap_or_default(),
            opt(record.time_sec),
        ];
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

pub fn from_csv(text: &str) -> TelemetryResult<Vec<Record>> {
    let mut rows = split_records(text).into_iter();
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    let mut index = [0usize; COLUMNS.len()];
    for (slot, column) in index.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|name| name.trim() == column)
            .ok_or_else(|| TelemetryError::MissingColumn(column.to_string()))?;
    }

    let mut records = Vec::new();
    for (row, cells) in rows.enumerate() {
        if cells.len() != header.len() {
            return Err(TelemetryError::ColumnCount {
                row,
                expected: header.len(),
                found: cells.len(),
            });
        }
        let cell = |column: usize| cells[index[column]].as_str();
        let parsed = |column: usize| parse_cell(row, COLUMNS[column], cell(column));

        records.push(Record {
            local_ts: parsed(0)?,
            valid: parse_bool(row, cell(1))?,
            device: cell(2).to_string(),
            msg_id: parsed(3)?,
            data_type: cell(4).to_string(),
            sensor: cell(5).to_string(),
            value: parse_cell(row, COLUMNS[6], cell(6))?,
            unit: cell(7).to_string(),
            esp_ts: parsed(8)?,
            checksum: Some(cell(9)).filter(|c| !c.is_empty()).map(str::to_string),
            time_sec: parse_cell(row, COLUMNS[10], cell(10))?,
        });
    }
    check_records(&records)?;
    Ok(records)
}

/// A record without a value can never be flagged valid.
fn check_records(records: &[Record]) -> TelemetryResult<()> {
    match records.iter().position(|r| r.valid && r.value.is_none()) {
        Some(row) => Err(TelemetryError::InvalidRecord {
            row,
            reason: "valid record without a value".to_string(),
        }),
        None => Ok(()),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits CSV text into rows of cells. Newlines inside quoted cells belong to
/// the cell; blank rows are dropped.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', _) => quoted = !quoted,
            (',', false) => cells.push(std::mem::take(&mut current)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                cells.push(std::mem::take(&mut current));
                push_row(&mut rows, std::mem::take(&mut cells));
            }
            _ => current.push(c),
        }
    }
    cells.push(current);
    push_row(&mut rows, cells);
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, cells: Vec<String>) {
    let blank = cells.len() == 1 && cells[0].trim().is_empty();
    if !blank {
        rows.push(cells);
    }
}

fn parse_cell<T: std::str::FromStr>(
    row: usize,
    column: &str,
    raw: &str,
) -> TelemetryResult<Option<T>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| TelemetryError::InvalidCell {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn parse_bool(row: usize, raw: &str) -> TelemetryResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(TelemetryError::InvalidCell {
            row,
            column: "valid".to_string(),
            value: raw.to_string(),
        }),
    }
}
