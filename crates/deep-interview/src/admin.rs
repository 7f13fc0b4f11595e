//! Administrator views over the roster and the answer log.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::answers::{AnswerRecord, AnswerTally};
use crate::candidates::{Candidate, CandidateId};
use crate::interview::script::ITERATION_MINUTES_QUESTION;
use crate::interview::{percent, validator, InterviewScript};
use crate::repository::{AnswerRepository, CandidateRepository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateProgress {
    pub status: InterviewStatus,
    pub progress_percent: u8,
}

/// Progress derived from stored answers: accepted answers over the number of
/// questions the candidate's processes require.
pub fn assess(candidate: &Candidate, tally: AnswerTally, questions_per_process: usize) -> CandidateProgress {
    if tally.total == 0 {
        return CandidateProgress {
            status: InterviewStatus::NotStarted,
            progress_percent: 0,
        };
    }

    let required = candidate.processes.len() * questions_per_process;
    let progress_percent = percent(tally.valid, required);
    let status = if progress_percent >= 100 {
        InterviewStatus::Completed
    } else {
        InterviewStatus::InProgress
    };

    CandidateProgress {
        status,
        progress_percent,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateStatusView {
    pub id: CandidateId,
    pub full_name: String,
    pub processes: String,
    pub interview_status: InterviewStatus,
    pub status_label: &'static str,
    pub progress_percent: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_candidates: usize,
    pub completed_interviews: usize,
    pub in_progress_interviews: usize,
    pub not_started_interviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEntry {
    pub full_name: String,
    pub total_time_minutes: f64,
    pub estimated_cost: f64,
    pub process_count: usize,
}

pub fn candidate_statuses<C, A>(
    candidates: &C,
    answers: &A,
    script: &InterviewScript,
) -> Result<Vec<CandidateStatusView>, RepositoryError>
where
    C: CandidateRepository + ?Sized,
    A: AnswerRepository + ?Sized,
{
    candidates
        .list()?
        .into_iter()
        .map(|candidate| -> Result<CandidateStatusView, RepositoryError> {
            let tally = AnswerTally::from_records(&answers.for_candidate(candidate.id)?);
            let progress = assess(&candidate, tally, script.len());
            Ok(CandidateStatusView {
                id: candidate.id,
                processes: candidate.processes_label(),
                full_name: candidate.full_name,
                interview_status: progress.status,
                status_label: progress.status.label(),
                progress_percent: progress.progress_percent,
                created_at: candidate.created_at,
            })
        })
        .collect()
}

pub fn admin_stats<C, A>(
    candidates: &C,
    answers: &A,
    script: &InterviewScript,
) -> Result<AdminStats, RepositoryError>
where
    C: CandidateRepository + ?Sized,
    A: AnswerRepository + ?Sized,
{
    let mut stats = AdminStats::default();
    for view in candidate_statuses(candidates, answers, script)? {
        stats.total_candidates += 1;
        match view.interview_status {
            InterviewStatus::Completed => stats.completed_interviews += 1,
            InterviewStatus::InProgress => stats.in_progress_interviews += 1,
            InterviewStatus::NotStarted => stats.not_started_interviews += 1,
        }
    }
    Ok(stats)
}

/// Time and cost estimates for every candidate who has answered at least once.
pub fn analytics<C, A>(
    candidates: &C,
    answers: &A,
    rate_per_minute: f64,
) -> Result<Vec<AnalyticsEntry>, RepositoryError>
where
    C: CandidateRepository + ?Sized,
    A: AnswerRepository + ?Sized,
{
    let mut entries = Vec::new();
    for candidate in candidates.list()? {
        let records = answers.for_candidate(candidate.id)?;
        if records.is_empty() {
            continue;
        }

        let total_time_minutes = iteration_minutes(&records);
        entries.push(AnalyticsEntry {
            full_name: candidate.full_name,
            total_time_minutes,
            estimated_cost: total_time_minutes * rate_per_minute,
            process_count: distinct_processes(&records),
        });
    }
    Ok(entries)
}

fn iteration_minutes(records: &[AnswerRecord]) -> f64 {
    records
        .iter()
        .filter(|record| record.is_valid && record.question_number == ITERATION_MINUTES_QUESTION)
        .filter_map(|record| validator::first_number(&record.answer))
        .sum()
}

fn distinct_processes(records: &[AnswerRecord]) -> usize {
    records
        .iter()
        .map(|record| record.process.as_str())
        .filter(|process| !process.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}
