use std::io::Read;

use csv::StringRecord;
use serde::{Deserialize, Deserializer};

use super::RosterError;
use crate::candidates::NewCandidate;

pub(crate) const FULL_NAME_COLUMN: &str = "full_name";
pub(crate) const PROCESSES_COLUMN: &str = "processes";

const FULL_NAME_HEADERS: &[&str] = &["full name", "fullname", "фио"];
const PROCESSES_HEADERS: &[&str] = &["processes", "процессы"];

pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '_'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

fn canonical_header(value: &str) -> Option<&'static str> {
    let normalized = normalize_header(value);
    if FULL_NAME_HEADERS.contains(&normalized.as_str()) {
        Some(FULL_NAME_COLUMN)
    } else if PROCESSES_HEADERS.contains(&normalized.as_str()) {
        Some(PROCESSES_COLUMN)
    } else {
        None
    }
}

/// Rewrites recognized headers to their canonical names so rows deserialize
/// the same way whatever language the export was produced in.
fn canonical_headers(headers: &StringRecord) -> Result<StringRecord, RosterError> {
    let mapped: StringRecord = headers
        .iter()
        .map(|header| canonical_header(header).unwrap_or(header))
        .collect();

    for required in [FULL_NAME_COLUMN, PROCESSES_COLUMN] {
        if !mapped.iter().any(|header| header == required) {
            return Err(RosterError::MissingColumn(required));
        }
    }

    Ok(mapped)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    full_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    processes: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<NewCandidate>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = canonical_headers(csv_reader.headers()?)?;
    csv_reader.set_headers(headers);

    let mut candidates = Vec::new();
    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        let candidate = NewCandidate::new(&row.full_name, row.processes.as_deref().unwrap_or(""));
        if candidate.full_name.is_empty() {
            continue;
        }
        candidates.push(candidate);
    }

    Ok(candidates)
}
