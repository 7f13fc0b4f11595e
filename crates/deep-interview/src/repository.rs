use crate::answers::{AnswerRecord, NewAnswer};
use crate::candidates::{Candidate, CandidateId, NewCandidate};

/// Roster storage so services can be exercised without a database.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError>;
    fn update_processes(
        &self,
        id: CandidateId,
        processes: Vec<String>,
    ) -> Result<Candidate, RepositoryError>;
    fn find_by_name(&self, full_name: &str) -> Result<Option<Candidate>, RepositoryError>;
    fn find_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn list(&self) -> Result<Vec<Candidate>, RepositoryError>;
    /// Drop the whole roster and load `candidates` in its place.
    fn replace_all(&self, candidates: Vec<NewCandidate>) -> Result<usize, RepositoryError>;
}

/// Append-only log of interview answers.
pub trait AnswerRepository: Send + Sync {
    fn append(&self, answer: NewAnswer) -> Result<AnswerRecord, RepositoryError>;
    fn for_candidate(&self, id: CandidateId) -> Result<Vec<AnswerRecord>, RepositoryError>;
    /// Every stored answer in insertion order.
    fn all(&self) -> Result<Vec<AnswerRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
