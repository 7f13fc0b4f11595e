use std::io::Write;

use serde::Serialize;

use super::RosterError;
use crate::admin::assess;
use crate::answers::AnswerTally;
use crate::interview::InterviewScript;
use crate::repository::{AnswerRepository, CandidateRepository};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub full_name: String,
    pub processes: String,
    pub questions_answered: usize,
    pub valid_answers: usize,
    pub progress_percent: u8,
    pub created_at: String,
}

/// Write one CSV row per candidate with answer counts and progress.
pub fn export_candidates<C, A, W>(
    candidates: &C,
    answers: &A,
    script: &InterviewScript,
    writer: W,
) -> Result<usize, RosterError>
where
    C: CandidateRepository + ?Sized,
    A: AnswerRepository + ?Sized,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;

    for candidate in candidates.list()? {
        let tally = AnswerTally::from_records(&answers.for_candidate(candidate.id)?);
        let progress = assess(&candidate, tally, script.len());

        csv_writer.serialize(ExportRow {
            processes: candidate.processes_label(),
            full_name: candidate.full_name,
            questions_answered: tally.total,
            valid_answers: tally.valid,
            progress_percent: progress.progress_percent,
            created_at: candidate.created_at.format(TIMESTAMP_FORMAT).to_string(),
        })?;
        written += 1;
    }

    if written == 0 {
        csv_writer.write_record([
            "full_name",
            "processes",
            "questions_answered",
            "valid_answers",
            "progress_percent",
            "created_at",
        ])?;
    }

    csv_writer.flush()?;
    Ok(written)
}
