use serde::Serialize;

/// Position of one candidate within the processes × questions grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewState {
    processes: Vec<String>,
    process_index: usize,
    question_index: usize,
    valid_answers: usize,
}

impl InterviewState {
    pub fn new(processes: Vec<String>) -> Self {
        Self {
            processes,
            process_index: 0,
            question_index: 0,
            valid_answers: 0,
        }
    }

    pub fn processes(&self) -> &[String] {
        &self.processes
    }

    pub fn position(&self) -> (usize, usize) {
        (self.process_index, self.question_index)
    }

    pub fn valid_answers(&self) -> usize {
        self.valid_answers
    }

    pub fn is_complete(&self) -> bool {
        self.process_index >= self.processes.len()
    }

    pub fn current_process(&self) -> Option<&str> {
        self.processes.get(self.process_index).map(String::as_str)
    }

    /// Records an accepted answer and moves to the next question, rolling over
    /// to the next process after the last question.
    pub fn advance(&mut self, questions_per_process: usize) {
        if self.is_complete() {
            return;
        }

        self.valid_answers += 1;
        self.question_index += 1;
        if self.question_index >= questions_per_process {
            self.question_index = 0;
            self.process_index += 1;
        }
    }

    pub fn progress(&self, questions_per_process: usize) -> u8 {
        let total = self.processes.len() * questions_per_process;
        if total == 0 || self.is_complete() {
            return 100;
        }

        let completed = self.process_index * questions_per_process + self.question_index;
        percent(completed, total)
    }
}

/// Floor percentage capped at 100.
pub(crate) fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let value = (part.saturating_mul(100) / whole).min(100);
    u8::try_from(value).unwrap_or(100)
}
