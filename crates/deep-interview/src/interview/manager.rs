use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::debug;

use super::script::{InterviewScript, Question, COMPLETION_MESSAGE};
use super::state::InterviewState;
use super::validator::{self, Verdict};

/// Message sent back to the chat client after every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub bot_message: String,
    pub progress: u8,
}

impl ChatReply {
    pub fn completed() -> Self {
        Self {
            bot_message: COMPLETION_MESSAGE.to_string(),
            progress: 100,
        }
    }
}

/// Question currently awaiting an answer from a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingQuestion {
    pub process: String,
    pub process_index: usize,
    pub question: Question,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub answered: PendingQuestion,
    pub verdict: Verdict,
    pub reply: ChatReply,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InterviewError {
    #[error("candidate has no assigned processes")]
    NoProcesses,
    #[error("interview has not been started; send 'start interview' first")]
    NotStarted,
    #[error("interview is already complete")]
    Complete,
    #[error("interview state unavailable")]
    Poisoned,
}

/// In-memory interview state machine keyed by candidate full name.
#[derive(Debug, Default)]
pub struct InterviewManager {
    script: InterviewScript,
    states: Mutex<HashMap<String, InterviewState>>,
}

impl InterviewManager {
    pub fn new(script: InterviewScript) -> Self {
        Self {
            script,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn script(&self) -> &InterviewScript {
        &self.script
    }

    /// Begin (or resume) an interview and return the prompt to show.
    ///
    /// The process list is captured on the first call; later calls resume from
    /// the stored position.
    pub fn start(&self, full_name: &str, processes: &[String]) -> Result<ChatReply, InterviewError> {
        if processes.is_empty() {
            return Err(InterviewError::NoProcesses);
        }

        let mut states = self.lock()?;
        let state = states.entry(full_name.to_string()).or_insert_with(|| {
            debug!(candidate = full_name, processes = processes.len(), "interview started");
            InterviewState::new(processes.to_vec())
        });

        match self.pending_for(state) {
            Some(pending) => Ok(ChatReply {
                bot_message: pending.prompt,
                progress: state.progress(self.script.len()),
            }),
            None => Ok(ChatReply::completed()),
        }
    }

    pub fn pending(&self, full_name: &str) -> Result<Option<PendingQuestion>, InterviewError> {
        let states = self.lock()?;
        let state = states.get(full_name).ok_or(InterviewError::NotStarted)?;
        Ok(self.pending_for(state))
    }

    /// Validate `answer` against the pending question and advance when accepted.
    pub fn answer(&self, full_name: &str, answer: &str) -> Result<AnswerOutcome, InterviewError> {
        self.answer_with(full_name, answer, |_, _| Ok(()))
    }

    /// Like [`answer`](Self::answer), but runs `record` before the state moves.
    ///
    /// The candidate's state stays locked while `record` runs; if it fails the
    /// question stays pending and the error is returned unchanged.
    pub fn answer_with<F, E>(&self, full_name: &str, answer: &str, record: F) -> Result<AnswerOutcome, E>
    where
        F: FnOnce(&PendingQuestion, Verdict) -> Result<(), E>,
        E: From<InterviewError>,
    {
        let mut states = self.lock()?;
        let state = states.get_mut(full_name).ok_or(InterviewError::NotStarted)?;
        let answered = self.pending_for(state).ok_or(InterviewError::Complete)?;

        let verdict = validator::validate(answer, &answered.question);
        record(&answered, verdict)?;
        let reply = self.apply(state, &answered.question, verdict);

        debug!(
            candidate = full_name,
            process = %answered.process,
            question = answered.question.number,
            accepted = verdict.is_accepted(),
            progress = reply.progress,
            "answer processed"
        );

        Ok(AnswerOutcome {
            answered,
            verdict,
            reply,
        })
    }

    pub fn progress(&self, full_name: &str) -> Result<Option<u8>, InterviewError> {
        let states = self.lock()?;
        Ok(states
            .get(full_name)
            .map(|state| state.progress(self.script.len())))
    }

    pub fn current_process(&self, full_name: &str) -> Result<Option<String>, InterviewError> {
        let states = self.lock()?;
        Ok(states
            .get(full_name)
            .and_then(InterviewState::current_process)
            .map(str::to_string))
    }

    pub fn reset(&self, full_name: &str) -> Result<bool, InterviewError> {
        let mut states = self.lock()?;
        Ok(states.remove(full_name).is_some())
    }

    fn apply(&self, state: &mut InterviewState, question: &Question, verdict: Verdict) -> ChatReply {
        let questions = self.script.len();
        if !verdict.is_accepted() {
            return ChatReply {
                bot_message: validator::clarification(question).to_string(),
                progress: state.progress(questions),
            };
        }

        state.advance(questions);

        let Some(next) = self.pending_for(state) else {
            return ChatReply::completed();
        };

        let bot_message = match self.script.encouragement_for(state.valid_answers()) {
            Some(encouragement) => format!("{encouragement}\n\n{}", next.prompt),
            None => next.prompt,
        };

        ChatReply {
            bot_message,
            progress: state.progress(questions),
        }
    }

    fn pending_for(&self, state: &InterviewState) -> Option<PendingQuestion> {
        let (process_index, question_index) = state.position();
        let process = state.current_process()?;
        let question = *self.script.question(question_index)?;

        Some(PendingQuestion {
            process: process.to_string(),
            process_index,
            prompt: InterviewScript::prompt(process, &question),
            question,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, InterviewState>>, InterviewError> {
        self.states.lock().map_err(|_| InterviewError::Poisoned)
    }
}
