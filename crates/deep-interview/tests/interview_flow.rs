//! End-to-end interview scenarios driven through the public chat service.

use std::sync::Arc;

use deep_interview::chat::{ChatError, InterviewService, START_COMMAND};
use deep_interview::candidates::{NewCandidate, Registration};
use deep_interview::interview::{InterviewError, InterviewManager, InterviewScript, COMPLETION_MESSAGE};
use deep_interview::repository::{AnswerRepository, CandidateRepository};
use deep_interview::store::{InMemoryAnswerRepository, InMemoryCandidateRepository};

type Service = InterviewService<InMemoryCandidateRepository, InMemoryAnswerRepository>;

const GOOD_ANSWERS: [&str; 6] = [
    "An invoice lands in the finance mailbox",
    "12 minutes",
    "30 times per week",
    "3",
    "The invoice is marked as paid",
    "ERP, Excel",
];

fn service_with(name: &str, processes: &str) -> Service {
    let candidates = Arc::new(InMemoryCandidateRepository::default());
    candidates
        .insert(NewCandidate::new(name, processes))
        .expect("seed candidate");
    InterviewService::new(
        candidates,
        Arc::new(InMemoryAnswerRepository::default()),
        Arc::new(InterviewManager::new(InterviewScript::standard())),
    )
}

#[test]
fn two_process_interview_runs_to_completion() {
    let service = service_with("Mary Jackson", "Invoicing, Payroll");

    let opening = service.chat("Mary Jackson", START_COMMAND).expect("start");
    assert_eq!(opening.bot_message, "Process: Invoicing\n\nHow does the process start?");
    assert_eq!(opening.progress, 0);

    let mut last = opening;
    for answer in GOOD_ANSWERS {
        last = service.chat("Mary Jackson", answer).expect("answer accepted");
    }
    assert!(last.bot_message.ends_with("Process: Payroll\n\nHow does the process start?"));
    assert!(last.bot_message.starts_with("Halfway there, keep going!"));
    assert_eq!(last.progress, 50);

    for answer in GOOD_ANSWERS {
        last = service.chat("Mary Jackson", answer).expect("answer accepted");
    }
    assert_eq!(last.bot_message, COMPLETION_MESSAGE);
    assert_eq!(last.progress, 100);

    let after = service.chat("Mary Jackson", "anything else").expect("completed reply");
    assert_eq!(after.bot_message, COMPLETION_MESSAGE);

    let candidate = service
        .candidates()
        .find_by_name("Mary Jackson")
        .expect("lookup")
        .expect("present");
    let stored = service.answers().for_candidate(candidate.id).expect("answers");
    assert_eq!(stored.len(), 12);
    assert!(stored.iter().all(|record| record.is_valid));
    assert_eq!(stored[6].process, "Payroll");
    assert_eq!(stored[6].question_number, 1);
}

#[test]
fn rejected_answers_are_logged_but_do_not_advance() {
    let service = service_with("Dorothy Vaughan", "Scheduling");
    service.chat("Dorothy Vaughan", START_COMMAND).expect("start");
    service.chat("Dorothy Vaughan", GOOD_ANSWERS[0]).expect("first");

    let vague = service.chat("Dorothy Vaughan", "It depends").expect("vague");
    assert_eq!(vague.bot_message, "Please be more precise (in minutes or as a count).");

    let missing_number = service.chat("Dorothy Vaughan", "quite a while").expect("no number");
    assert_eq!(missing_number.progress, vague.progress);

    let accepted = service.chat("Dorothy Vaughan", "about 40 minutes").expect("accepted");
    assert!(accepted.bot_message.contains("How often is the process repeated"));

    let candidate = service
        .candidates()
        .find_by_name("Dorothy Vaughan")
        .expect("lookup")
        .expect("present");
    let stored = service.answers().for_candidate(candidate.id).expect("answers");
    let validity: Vec<bool> = stored.iter().map(|record| record.is_valid).collect();
    assert_eq!(validity, vec![true, false, false, true]);
    assert!(stored.iter().skip(1).all(|record| record.question_number == 2));
}

#[test]
fn restarting_resumes_the_pending_question() {
    let service = service_with("Annie Easley", "Testing");
    service.chat("Annie Easley", START_COMMAND).expect("start");
    service.chat("Annie Easley", GOOD_ANSWERS[0]).expect("first");

    let resumed = service.chat("Annie Easley", "  Start Interview ").expect("resume");
    assert_eq!(
        resumed.bot_message,
        "Process: Testing\n\nHow long does one iteration take (in minutes)?"
    );
    assert_eq!(resumed.progress, 16);
}

#[test]
fn unknown_or_unassigned_candidates_are_refused() {
    let service = service_with("Idle Person", "");

    assert!(matches!(
        service.register("Nobody Here").expect("register"),
        Registration::Forbidden
    ));
    assert!(matches!(
        service.chat("Nobody Here", START_COMMAND),
        Err(ChatError::UnknownCandidate)
    ));
    assert!(matches!(
        service.chat("Idle Person", START_COMMAND),
        Err(ChatError::Interview(InterviewError::NoProcesses))
    ));
}

#[test]
fn answering_before_start_is_an_error() {
    let service = service_with("Early Bird", "Onboarding");
    assert!(matches!(
        service.chat("Early Bird", "hello"),
        Err(ChatError::Interview(InterviewError::NotStarted))
    ));
}
