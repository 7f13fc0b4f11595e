use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::script::{Question, QuestionKind};

const VAGUE_MARKERS: [&str; 5] = [
    "sometimes",
    "it depends",
    "usually",
    "varies",
    "from time to time",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Empty,
    Vague,
    MissingNumber,
}

impl RejectionReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "Empty answer",
            Self::Vague => "Vague answer",
            Self::MissingNumber => "Missing number",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected(RejectionReason),
}

impl Verdict {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

// ASCII digits only, so every match parses as a number.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static number pattern compiles"));

pub fn validate(answer: &str, question: &Question) -> Verdict {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Verdict::Rejected(RejectionReason::Empty);
    }

    let lowered = trimmed.to_lowercase();
    if VAGUE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return Verdict::Rejected(RejectionReason::Vague);
    }

    if question.requires_number() && !NUMBER_RE.is_match(trimmed) {
        return Verdict::Rejected(RejectionReason::MissingNumber);
    }

    Verdict::Accepted
}

pub fn clarification(question: &Question) -> &'static str {
    match question.kind {
        QuestionKind::Quantitative => "Please be more precise (in minutes or as a count).",
        QuestionKind::Narrative => "Please make your answer more specific.",
    }
}

/// First whole number mentioned in an answer, used by the analytics and report metrics.
pub fn first_number(answer: &str) -> Option<f64> {
    NUMBER_RE
        .find(answer)
        .and_then(|found| found.as_str().parse::<f64>().ok())
}
