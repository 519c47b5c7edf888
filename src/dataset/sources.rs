// src/dataset/sources.rs

use crate::dataset::columns::RawTable;
use crate::errors::LoadError;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

const SQL_ALL_LISTINGS: &str = "SELECT * FROM real_estate";

/// Reads a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Reads the `real_estate` table of a SQLite database, opened read-only.
pub fn read_sqlite(path: &Path) -> Result<RawTable, LoadError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare(SQL_ALL_LISTINGS)?;

    let headers: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let width = headers.len();

    let mapped = stmt.query_map([], |row| {
        (0..width)
            .map(|i| row.get_ref(i).map(cell_to_string))
            .collect::<Result<Vec<String>, _>>()
    })?;

    let mut rows = Vec::new();
    for r in mapped {
        rows.push(r?);
    }

    Ok(RawTable { headers, rows })
}

fn cell_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
    }
}
