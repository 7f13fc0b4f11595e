use serde::Serialize;

const SHORT_ANSWER_CHARS: usize = 10;

const MOTIVATION_PHRASES: [&str; 4] = [
    "Great, keep it up!",
    "You explain things very clearly, thank you!",
    "We're making good progress, tell me a little more.",
    "Excellent! Let's clarify one more detail...",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUp {
    pub follow_up_question: String,
    pub motivation_phrase: String,
}

/// Suggest a follow-up prompt for the chat client: short answers get asked
/// to elaborate on the same question, longer ones move the conversation on.
pub fn follow_up(question: &str, answer: &str, step_counter: usize) -> FollowUp {
    let follow_up_question = if answer.trim().chars().count() < SHORT_ANSWER_CHARS {
        let question = question.trim().trim_end_matches('?').to_lowercase();
        format!("Could you tell a bit more: {question}?")
    } else {
        "Thanks! Could you describe the next step of this process?".to_string()
    };

    let motivation_phrase = MOTIVATION_PHRASES[step_counter % MOTIVATION_PHRASES.len()].to_string();

    FollowUp {
        follow_up_question,
        motivation_phrase,
    }
}
