use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::repository::{CandidateRepository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster entry: a person allowed to take the interview and the processes
/// they will be asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub full_name: String,
    pub processes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn processes_label(&self) -> String {
        self.processes.join(", ")
    }
}

/// Candidate data before the repository assigns an id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub full_name: String,
    pub processes: Vec<String>,
}

impl NewCandidate {
    pub fn new(full_name: &str, processes: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            processes: parse_processes(processes),
        }
    }
}

/// Split a comma separated process list, dropping blank entries.
pub fn parse_processes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|process| !process.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Registration {
    Allowed { processes: Vec<String> },
    Forbidden,
}

/// Checks a self-registering candidate against the roster.
pub struct RegistrationService<C> {
    candidates: Arc<C>,
}

impl<C> RegistrationService<C>
where
    C: CandidateRepository + 'static,
{
    pub fn new(candidates: Arc<C>) -> Self {
        Self { candidates }
    }

    pub fn register(&self, full_name: &str) -> Result<Registration, RepositoryError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Ok(Registration::Forbidden);
        }

        match self.candidates.find_by_name(full_name)? {
            Some(candidate) => {
                info!(candidate = %candidate.id, "candidate registered");
                Ok(Registration::Allowed {
                    processes: candidate.processes,
                })
            }
            None => {
                info!("registration refused for unknown candidate");
                Ok(Registration::Forbidden)
            }
        }
    }
}
