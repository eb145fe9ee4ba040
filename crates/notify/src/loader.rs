//! Input loading for both sources.
//!
//! The `parse_*` / `load_*` functions return errors; the `*_or_empty` variants
//! log the error and hand back an empty collection so a broken source never
//! stops the rest of the run.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::NotifyError;
use crate::model::{AssignmentTable, HostRecord, StructuredRecords};

// ---------------------------------------------------------------------------
// Structured (JSON) source
// ---------------------------------------------------------------------------

/// Parse a JSON object of `key -> host record`. Entries that are not objects
/// are skipped.
pub fn parse_structured_records(input: &str) -> Result<StructuredRecords, NotifyError> {
    let root: Value = serde_json::from_str(input).map_err(|e| NotifyError::Json(e.to_string()))?;
    let map = match root {
        Value::Object(map) => map,
        other => {
            return Err(NotifyError::Json(format!(
                "expected a JSON object at top level, found {}",
                value_kind(&other)
            )));
        }
    };

    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        match serde_json::from_value::<HostRecord>(value) {
            Ok(record) => entries.push((key, record)),
            Err(e) => warn!(key = %key, "skipping structured entry: {e}"),
        }
    }
    Ok(StructuredRecords { entries })
}

pub fn load_structured_records(path: &Path) -> Result<StructuredRecords, NotifyError> {
    let input = std::fs::read_to_string(path).map_err(|e| NotifyError::io(path, e))?;
    let records = parse_structured_records(&input)?;
    info!(path = %path.display(), entries = records.len(), "loaded LDD entries from JSON");
    Ok(records)
}

pub fn load_structured_records_or_empty(path: &Path) -> StructuredRecords {
    load_structured_records(path).unwrap_or_else(|e| {
        error!(path = %path.display(), "failed to load JSON: {e}");
        StructuredRecords::default()
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tabular (CSV) source
// ---------------------------------------------------------------------------

/// Header names of the two columns the tabular loader reads.
#[derive(Debug, Clone)]
pub struct TableColumns {
    pub user: String,
    pub hostnames: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            user: "User".into(),
            hostnames: "Hostname List".into(),
        }
    }
}

/// Split a comma-separated hostname list, trimming tokens and dropping empty ones.
pub fn split_hostnames(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the assignment export, keeping only users with more than one hostname.
pub fn parse_assignment_table(
    input: &str,
    columns: &TableColumns,
) -> Result<AssignmentTable, NotifyError> {
    // Rows may be shorter or longer than the header; only the two named
    // columns matter.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, NotifyError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| NotifyError::MissingColumn { column: name.into() })
    };

    let user_idx = idx(&columns.user)?;
    let hosts_idx = idx(&columns.hostnames)?;

    let mut table = AssignmentTable::default();

    for (row_no, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(row = row_no + 1, "skipping malformed row: {e}");
                continue;
            }
        };

        let user = record.get(user_idx).unwrap_or("").trim();
        let hostnames = split_hostnames(record.get(hosts_idx).unwrap_or(""));

        if !user.is_empty() && hostnames.len() > 1 {
            table.upsert(user.to_string(), hostnames);
        }
    }

    Ok(table)
}

pub fn load_assignment_table(
    path: &Path,
    columns: &TableColumns,
) -> Result<AssignmentTable, NotifyError> {
    let input = std::fs::read_to_string(path).map_err(|e| NotifyError::io(path, e))?;
    parse_assignment_table(&input, columns)
}

pub fn load_assignment_table_or_empty(path: &Path, columns: &TableColumns) -> AssignmentTable {
    let table = load_assignment_table(path, columns).unwrap_or_else(|e| {
        error!(path = %path.display(), "failed to read CSV: {e}");
        AssignmentTable::default()
    });
    info!(users = table.len(), "loaded users with multiple LDDs from CSV");
    table
}
