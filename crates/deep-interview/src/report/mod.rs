//! Per-candidate process report built from accepted answers.

mod metrics;
mod render;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::answers::AnswerRecord;
use crate::candidates::{Candidate, CandidateId};
use crate::repository::{AnswerRepository, CandidateRepository, RepositoryError};

pub use metrics::ProcessMetrics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportAnswer {
    pub question_number: u8,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSection {
    pub process: String,
    pub metrics: ProcessMetrics,
    pub answers: Vec<ReportAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateReport {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub processes: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<ProcessSection>,
}

impl CandidateReport {
    /// Group the valid answers by process (roster order first, then any
    /// process only present in the answer log) and compute metrics for each.
    pub fn build(
        candidate: &Candidate,
        answers: &[AnswerRecord],
        rate_per_minute: f64,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let valid: Vec<&AnswerRecord> = answers.iter().filter(|answer| answer.is_valid).collect();

        let mut order: Vec<&str> = candidate.processes.iter().map(String::as_str).collect();
        for answer in &valid {
            if !order.contains(&answer.process.as_str()) {
                order.push(answer.process.as_str());
            }
        }

        let sections = order
            .into_iter()
            .filter_map(|process| {
                let mut grouped: Vec<AnswerRecord> = valid
                    .iter()
                    .filter(|answer| answer.process == process)
                    .map(|answer| (*answer).clone())
                    .collect();
                if grouped.is_empty() {
                    return None;
                }
                grouped.sort_by_key(|answer| answer.question_number);

                Some(ProcessSection {
                    process: process.to_string(),
                    metrics: ProcessMetrics::from_answers(&grouped, rate_per_minute),
                    answers: grouped
                        .into_iter()
                        .map(|answer| ReportAnswer {
                            question_number: answer.question_number,
                            question: answer.question,
                            answer: answer.answer,
                        })
                        .collect(),
                })
            })
            .collect();

        Self {
            candidate_id: candidate.id,
            full_name: candidate.full_name.clone(),
            processes: candidate.processes.clone(),
            generated_at,
            sections,
        }
    }

    pub fn total_minutes(&self) -> f64 {
        self.sections
            .iter()
            .map(|section| section.metrics.total_minutes)
            .sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.sections.iter().map(|section| section.metrics.cost).sum()
    }
}

/// Load a candidate and their answers and build the report; `None` when the
/// candidate does not exist.
pub fn build_report<C, A>(
    candidates: &C,
    answers: &A,
    id: CandidateId,
    rate_per_minute: f64,
) -> Result<Option<CandidateReport>, RepositoryError>
where
    C: CandidateRepository + ?Sized,
    A: AnswerRepository + ?Sized,
{
    let Some(candidate) = candidates.find_by_id(id)? else {
        return Ok(None);
    };
    let records = answers.for_candidate(id)?;
    Ok(Some(CandidateReport::build(
        &candidate,
        &records,
        rate_per_minute,
        Utc::now(),
    )))
}
