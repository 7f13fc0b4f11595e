use std::sync::Arc;

use tracing::{info, warn};

use crate::answers::NewAnswer;
use crate::candidates::{Registration, RegistrationService};
use crate::interview::{ChatReply, InterviewError, InterviewManager};
use crate::repository::{AnswerRepository, CandidateRepository, RepositoryError};

/// Chat command that starts (or resumes) an interview.
pub const START_COMMAND: &str = "start interview";

pub fn is_start_command(message: &str) -> bool {
    message.trim().to_lowercase() == START_COMMAND
}

/// Service composing the roster, the answer log, and the interview state machine.
pub struct InterviewService<C, A> {
    candidates: Arc<C>,
    answers: Arc<A>,
    manager: Arc<InterviewManager>,
    registration: RegistrationService<C>,
}

impl<C, A> InterviewService<C, A>
where
    C: CandidateRepository + 'static,
    A: AnswerRepository + 'static,
{
    pub fn new(candidates: Arc<C>, answers: Arc<A>, manager: Arc<InterviewManager>) -> Self {
        let registration = RegistrationService::new(candidates.clone());
        Self {
            candidates,
            answers,
            manager,
            registration,
        }
    }

    pub fn manager(&self) -> &InterviewManager {
        &self.manager
    }

    pub fn candidates(&self) -> &C {
        &self.candidates
    }

    pub fn answers(&self) -> &A {
        &self.answers
    }

    pub fn register(&self, full_name: &str) -> Result<Registration, ChatError> {
        Ok(self.registration.register(full_name)?)
    }

    /// Drop in-progress interviews for candidates whose processes changed, so
    /// their next start uses the new process list.
    pub fn restart_interviews(&self, full_names: &[String]) -> Result<usize, ChatError> {
        let mut restarted = 0;
        for full_name in full_names {
            if self.manager.reset(full_name)? {
                info!(candidate = %full_name, "interview restarted after roster change");
                restarted += 1;
            }
        }
        Ok(restarted)
    }

    /// Handle one chat message from a candidate.
    pub fn chat(&self, full_name: &str, message: &str) -> Result<ChatReply, ChatError> {
        let full_name = full_name.trim();
        let candidate = self
            .candidates
            .find_by_name(full_name)?
            .ok_or(ChatError::UnknownCandidate)?;

        if candidate.processes.is_empty() {
            return Err(ChatError::Interview(InterviewError::NoProcesses));
        }

        if is_start_command(message) {
            let reply = self.manager.start(full_name, &candidate.processes)?;
            info!(candidate = %candidate.id, progress = reply.progress, "interview prompt issued");
            return Ok(reply);
        }

        let outcome = self
            .manager
            .answer_with(full_name, message, |pending, verdict| -> Result<(), ChatError> {
                self.answers.append(NewAnswer {
                    candidate_id: candidate.id,
                    question: pending.prompt.clone(),
                    answer: message.to_string(),
                    is_valid: verdict.is_accepted(),
                    process: pending.process.clone(),
                    question_number: pending.question.number,
                })?;
                Ok(())
            });

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(ChatError::Interview(InterviewError::Complete)) => return Ok(ChatReply::completed()),
            Err(err) => return Err(err),
        };

        if !outcome.verdict.is_accepted() {
            warn!(
                candidate = %candidate.id,
                question = outcome.answered.question.number,
                verdict = ?outcome.verdict,
                "answer needs clarification"
            );
        }

        Ok(outcome.reply)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("candidate not found")]
    UnknownCandidate,
    #[error(transparent)]
    Interview(#[from] InterviewError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerRecord;
    use crate::candidates::{CandidateId, NewCandidate};
    use crate::interview::{InterviewScript, COMPLETION_MESSAGE};
    use crate::store::memory::{InMemoryAnswerRepository, InMemoryCandidateRepository};

    fn service() -> InterviewService<InMemoryCandidateRepository, InMemoryAnswerRepository> {
        let candidates = Arc::new(InMemoryCandidateRepository::default());
        candidates
            .insert(NewCandidate::new("Grace Hopper", "Compiling"))
            .expect("insert candidate");
        candidates
            .insert(NewCandidate::new("Idle Person", ""))
            .expect("insert idle candidate");
        let answers = Arc::new(InMemoryAnswerRepository::default());
        let manager = Arc::new(InterviewManager::new(InterviewScript::standard()));
        InterviewService::new(candidates, answers, manager)
    }

    #[test]
    fn start_command_is_case_insensitive() {
        assert!(is_start_command("  Start Interview "));
        assert!(!is_start_command("start the interview"));
    }

    #[test]
    fn unknown_and_processless_candidates_are_refused() {
        let service = service();
        assert!(matches!(
            service.chat("Nobody", START_COMMAND),
            Err(ChatError::UnknownCandidate)
        ));
        assert!(matches!(
            service.chat("Idle Person", START_COMMAND),
            Err(ChatError::Interview(InterviewError::NoProcesses))
        ));
    }

    #[test]
    fn answers_require_a_started_interview() {
        let service = service();
        assert!(matches!(
            service.chat("Grace Hopper", "hello"),
            Err(ChatError::Interview(InterviewError::NotStarted))
        ));
    }

    #[test]
    fn every_answer_is_persisted_with_its_verdict() {
        let service = service();
        service.chat("Grace Hopper", "start interview").expect("start");
        service
            .chat("Grace Hopper", "A ticket arrives")
            .expect("first answer");
        let reply = service
            .chat("Grace Hopper", "quite a while")
            .expect("second answer");
        assert!(reply.bot_message.contains("minutes"));

        let stored = service
            .answers()
            .for_candidate(CandidateId(1))
            .expect("answers");
        assert_eq!(stored.len(), 2);
        assert!(stored[0].is_valid);
        assert_eq!(stored[0].question_number, 1);
        assert_eq!(
            stored[0].question,
            "Process: Compiling\n\nHow does the process start?"
        );
        assert!(!stored[1].is_valid);
        assert_eq!(stored[1].question_number, 2);
        assert_eq!(stored[1].process, "Compiling");
    }

    struct UnavailableAnswers;

    impl AnswerRepository for UnavailableAnswers {
        fn append(&self, _answer: NewAnswer) -> Result<AnswerRecord, RepositoryError> {
            Err(RepositoryError::Unavailable("answer log offline".to_string()))
        }

        fn for_candidate(&self, _id: CandidateId) -> Result<Vec<AnswerRecord>, RepositoryError> {
            Ok(Vec::new())
        }

        fn all(&self) -> Result<Vec<AnswerRecord>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn failed_persistence_leaves_question_pending() {
        let candidates = Arc::new(InMemoryCandidateRepository::default());
        candidates
            .insert(NewCandidate::new("Grace Hopper", "Compiling"))
            .expect("insert candidate");
        let manager = Arc::new(InterviewManager::new(InterviewScript::standard()));
        let service = InterviewService::new(candidates, Arc::new(UnavailableAnswers), manager);

        service.chat("Grace Hopper", START_COMMAND).expect("start");
        assert!(matches!(
            service.chat("Grace Hopper", "A ticket arrives"),
            Err(ChatError::Repository(RepositoryError::Unavailable(_)))
        ));

        let pending = service
            .manager()
            .pending("Grace Hopper")
            .expect("started")
            .expect("question pending");
        assert_eq!(pending.question.number, 1);
        assert_eq!(service.manager().progress("Grace Hopper"), Ok(Some(0)));
    }

    #[test]
    fn restart_interviews_resets_only_started_candidates() {
        let service = service();
        service.chat("Grace Hopper", START_COMMAND).expect("start");
        service.chat("Grace Hopper", "A ticket arrives").expect("answer");

        let restarted = service
            .restart_interviews(&["Grace Hopper".to_string(), "Nobody".to_string()])
            .expect("restart");
        assert_eq!(restarted, 1);

        let reply = service.chat("Grace Hopper", START_COMMAND).expect("start again");
        assert_eq!(reply.progress, 0);
        assert!(reply.bot_message.ends_with("How does the process start?"));
    }

    #[test]
    fn completed_interview_keeps_answering_with_completion() {
        let service = service();
        service.chat("Grace Hopper", "start interview").expect("start");
        for answer in ["Email", "10", "2 per day", "4", "Report sent", "Outlook"] {
            service.chat("Grace Hopper", answer).expect("answer");
        }

        let reply = service.chat("Grace Hopper", "one more").expect("reply");
        assert_eq!(reply.bot_message, COMPLETION_MESSAGE);
        assert_eq!(reply.progress, 100);
        assert_eq!(
            service
                .answers()
                .for_candidate(CandidateId(1))
                .expect("answers")
                .len(),
            6
        );
    }
}
