use serde::{Deserialize, Serialize};

/// Separates free-form questions from those that need a measurable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Narrative,
    Quantitative,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Narrative => "Narrative",
            Self::Quantitative => "Quantitative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    /// 1-based position within a process.
    pub number: u8,
    pub text: &'static str,
    pub kind: QuestionKind,
}

impl Question {
    pub const fn requires_number(&self) -> bool {
        matches!(self.kind, QuestionKind::Quantitative)
    }
}

pub const ITERATION_MINUTES_QUESTION: u8 = 2;
pub const FREQUENCY_QUESTION: u8 = 3;
pub const SESSION_COUNT_QUESTION: u8 = 4;
pub const TOOLS_QUESTION: u8 = 6;

const STANDARD_QUESTIONS: [Question; 6] = [
    Question {
        number: 1,
        text: "How does the process start?",
        kind: QuestionKind::Narrative,
    },
    Question {
        number: ITERATION_MINUTES_QUESTION,
        text: "How long does one iteration take (in minutes)?",
        kind: QuestionKind::Quantitative,
    },
    Question {
        number: FREQUENCY_QUESTION,
        text: "How often is the process repeated (times per day/week/month)?",
        kind: QuestionKind::Quantitative,
    },
    Question {
        number: SESSION_COUNT_QUESTION,
        text: "How many times is the process repeated in one session?",
        kind: QuestionKind::Quantitative,
    },
    Question {
        number: 5,
        text: "How do you know the process is finished?",
        kind: QuestionKind::Narrative,
    },
    Question {
        number: TOOLS_QUESTION,
        text: "Which programs or tools do you use?",
        kind: QuestionKind::Narrative,
    },
];

const STANDARD_ENCOURAGEMENTS: [&str; 3] = [
    "You're doing great!",
    "Halfway there, keep going!",
    "Thank you, this really helps!",
];

pub const COMPLETION_MESSAGE: &str = "Your interview is complete! Thank you for participating!";

/// Ordered question list asked once for every process a candidate owns.
#[derive(Debug, Clone)]
pub struct InterviewScript {
    questions: Vec<Question>,
    encouragements: Vec<&'static str>,
}

impl InterviewScript {
    pub fn standard() -> Self {
        Self {
            questions: STANDARD_QUESTIONS.to_vec(),
            encouragements: STANDARD_ENCOURAGEMENTS.to_vec(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Encouragement shown after every third accepted answer, rotating through the list.
    pub fn encouragement_for(&self, valid_answers: usize) -> Option<&'static str> {
        if valid_answers == 0 || valid_answers % 3 != 0 || self.encouragements.is_empty() {
            return None;
        }
        let slot = (valid_answers / 3 - 1) % self.encouragements.len();
        self.encouragements.get(slot).copied()
    }

    pub fn prompt(process: &str, question: &Question) -> String {
        format!("Process: {process}\n\n{}", question.text)
    }
}

impl Default for InterviewScript {
    fn default() -> Self {
        Self::standard()
    }
}
