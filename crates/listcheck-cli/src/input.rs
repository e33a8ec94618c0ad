//! File I/O for the command surface: the authoritative CSV sheet and the
//! JSON documents passed between commands.

use std::path::Path;

use anyhow::Context;
use listcheck_core::{records_from_table, AuthoritativeRecord, InputError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a CSV sheet whose first row is the header.
///
/// # Errors
///
/// Returns [`InputError::Unreadable`] if the file cannot be read as CSV, or
/// any error from [`records_from_table`].
pub(crate) fn read_csv_records(path: &Path) -> Result<Vec<AuthoritativeRecord>, InputError> {
    let unreadable = |reason: String| InputError::Unreadable {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| unreadable(e.to_string()))?;

    let mut table = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| unreadable(e.to_string()))?;
        table.push(row.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let mut rows = table.into_iter();
    let headers = rows.next().ok_or(InputError::MissingHeader)?;
    records_from_table(&headers, &rows.collect::<Vec<_>>())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `parse-input`: CSV sheet to a JSON record array.
pub(crate) fn run_parse_input(csv: &Path, out: Option<&Path>) -> anyhow::Result<()> {
    let records = read_csv_records(csv)?;
    tracing::info!(path = %csv.display(), records = records.len(), "parsed input sheet");
    match out {
        Some(path) => write_json(path, &records),
        None => print_json(&records),
    }
}
