//! Candidate roster CSV import and the candidate progress export.

mod export;
mod parser;

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::candidates::NewCandidate;
use crate::repository::{CandidateRepository, RepositoryError};

pub use export::{export_candidates, ExportRow};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("roster file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Counts reported after merging an uploaded roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterUpdate {
    pub inserted: usize,
    pub updated: usize,
    /// Existing candidates whose process list changed.
    pub reassigned: Vec<String>,
}

pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<NewCandidate>, RosterError> {
    parser::parse_rows(reader)
}

/// Replace the whole roster with the contents of the CSV file at `path`.
pub fn load_roster<P, C>(path: P, candidates: &C) -> Result<usize, RosterError>
where
    P: AsRef<Path>,
    C: CandidateRepository + ?Sized,
{
    let path = path.as_ref();
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(RosterError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    let rows = parse_roster(file)?;
    let loaded = candidates.replace_all(rows)?;
    info!(path = %path.display(), loaded, "roster loaded");
    Ok(loaded)
}

/// Merge an uploaded roster: existing candidates get their processes
/// replaced, unknown names are added.
pub fn upsert_roster<R, C>(reader: R, candidates: &C) -> Result<RosterUpdate, RosterError>
where
    R: Read,
    C: CandidateRepository + ?Sized,
{
    let mut update = RosterUpdate::default();
    for row in parse_roster(reader)? {
        match candidates.find_by_name(&row.full_name)? {
            Some(existing) => {
                if existing.processes != row.processes {
                    update.reassigned.push(existing.full_name);
                }
                candidates.update_processes(existing.id, row.processes)?;
                update.updated += 1;
            }
            None => {
                candidates.insert(row)?;
                update.inserted += 1;
            }
        }
    }

    info!(
        inserted = update.inserted,
        updated = update.updated,
        reassigned = update.reassigned.len(),
        "roster merged"
    );
    Ok(update)
}
