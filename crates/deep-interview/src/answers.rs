use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidates::CandidateId;

/// One chat turn as persisted: the prompt shown, the candidate's reply, and
/// whether the reply passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: u64,
    pub candidate_id: CandidateId,
    pub question: String,
    pub answer: String,
    pub is_valid: bool,
    pub process: String,
    pub question_number: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub candidate_id: CandidateId,
    pub question: String,
    pub answer: String,
    pub is_valid: bool,
    pub process: String,
    pub question_number: u8,
}

/// Answer counts used by the dashboard, export, and stats views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerTally {
    pub total: usize,
    pub valid: usize,
}

impl AnswerTally {
    pub fn from_records(records: &[AnswerRecord]) -> Self {
        Self {
            total: records.len(),
            valid: records.iter().filter(|record| record.is_valid).count(),
        }
    }
}
