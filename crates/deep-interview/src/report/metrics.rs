use serde::Serialize;

use crate::answers::AnswerRecord;
use crate::interview::script::{
    FREQUENCY_QUESTION, ITERATION_MINUTES_QUESTION, SESSION_COUNT_QUESTION, TOOLS_QUESTION,
};
use crate::interview::validator::first_number;

/// Workload estimate for one process, derived from the numeric answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessMetrics {
    pub iteration_minutes: f64,
    pub frequency: f64,
    pub session_count: f64,
    pub total_minutes: f64,
    pub cost: f64,
    pub tools: Vec<String>,
}

impl ProcessMetrics {
    pub fn from_answers(answers: &[AnswerRecord], rate_per_minute: f64) -> Self {
        let mut metrics = Self::default();

        for answer in answers {
            match answer.question_number {
                ITERATION_MINUTES_QUESTION => {
                    if let Some(value) = first_number(&answer.answer) {
                        metrics.iteration_minutes = value;
                    }
                }
                FREQUENCY_QUESTION => {
                    if let Some(value) = first_number(&answer.answer) {
                        metrics.frequency = value;
                    }
                }
                SESSION_COUNT_QUESTION => {
                    if let Some(value) = first_number(&answer.answer) {
                        metrics.session_count = value;
                    }
                }
                TOOLS_QUESTION => metrics.tools.push(answer.answer.clone()),
                _ => {}
            }
        }

        metrics.total_minutes = metrics.iteration_minutes * metrics.frequency * metrics.session_count;
        metrics.cost = metrics.total_minutes * rate_per_minute;
        metrics
    }

    pub fn tools_label(&self) -> String {
        if self.tools.is_empty() {
            "Not specified".to_string()
        } else {
            self.tools.join(", ")
        }
    }
}
