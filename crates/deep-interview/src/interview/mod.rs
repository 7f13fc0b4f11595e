//! Scripted interview: the question script, answer validation, per-candidate
//! state, and the manager that ties them together.

mod manager;
pub mod script;
mod state;
pub mod validator;

pub use manager::{AnswerOutcome, ChatReply, InterviewError, InterviewManager, PendingQuestion};
pub use script::{InterviewScript, Question, QuestionKind, COMPLETION_MESSAGE};
pub use state::InterviewState;
pub use validator::{RejectionReason, Verdict};

pub(crate) use state::percent;
