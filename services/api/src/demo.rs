use crate::infra::{in_memory_interviews, Interviews};
use chrono::Local;
use clap::Args;
use deep_interview::admin;
use deep_interview::candidates::{CandidateId, NewCandidate};
use deep_interview::chat::{ChatError, START_COMMAND};
use deep_interview::error::AppError;
use deep_interview::report::build_report;
use deep_interview::repository::CandidateRepository;
use deep_interview::roster::{self, RosterError};
use std::fs::File;
use std::path::PathBuf;

const DEMO_ANSWERS: &[&str] = &[
    "A ticket arrives in the shared inbox",
    "it depends on the ticket",
    "About 15 minutes per ticket",
    "40 times a week",
    "2 people handle it",
    "The reply is sent and the ticket is closed",
    "Helpdesk, spreadsheets",
];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Candidate name used for the scripted interview
    #[arg(long, default_value = "Demo Candidate")]
    pub(crate) name: String,
    /// Comma-separated processes assigned to the demo candidate
    #[arg(long, default_value = "Support triage")]
    pub(crate) processes: String,
    /// Cost per minute used for the report estimates
    #[arg(long, default_value_t = 0.5)]
    pub(crate) rate_per_minute: f64,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            name: "Demo Candidate".to_string(),
            processes: "Support triage".to_string(),
            rate_per_minute: 0.5,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RosterCheckArgs {
    /// Path to the roster CSV (full_name, processes)
    pub(crate) path: PathBuf,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        name,
        processes,
        rate_per_minute,
    } = args;

    let service = in_memory_interviews();
    let candidate = service
        .candidates()
        .insert(NewCandidate::new(&name, &processes))?;

    println!("DeepInterview demo ({})", Local::now().format("%Y-%m-%d %H:%M"));
    println!(
        "Candidate: {} | processes: {}",
        candidate.full_name,
        candidate.processes_label()
    );

    let reply = service.chat(&candidate.full_name, START_COMMAND)?;
    println!("\nBot: {}", reply.bot_message);

    let mut answers = DEMO_ANSWERS.iter().cycle();
    while reply_pending(&service, &candidate.full_name)? {
        let Some(answer) = answers.next() else {
            break;
        };
        println!("You: {answer}");
        let reply = service.chat(&candidate.full_name, answer)?;
        println!("Bot: {} [{}%]", reply.bot_message, reply.progress);
    }

    println!("\n{}", report_text(&service, candidate.id, rate_per_minute)?);

    let stats = admin::admin_stats(
        service.candidates(),
        service.answers(),
        service.manager().script(),
    )?;
    println!(
        "Candidates: {} | completed {} | in progress {} | not started {}",
        stats.total_candidates,
        stats.completed_interviews,
        stats.in_progress_interviews,
        stats.not_started_interviews
    );

    Ok(())
}

fn reply_pending(service: &Interviews, full_name: &str) -> Result<bool, AppError> {
    let pending = service
        .manager()
        .pending(full_name)
        .map_err(ChatError::from)?;
    Ok(pending.is_some())
}

fn report_text(
    service: &Interviews,
    id: CandidateId,
    rate_per_minute: f64,
) -> Result<String, AppError> {
    let report = build_report(service.candidates(), service.answers(), id, rate_per_minute)?
        .ok_or_else(|| AppError::NotFound(format!("candidate {id}")))?;
    Ok(report.to_text())
}

pub(crate) fn check_roster(args: RosterCheckArgs) -> Result<(), AppError> {
    let file = match File::open(&args.path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(RosterError::NotFound(args.path).into());
        }
        Err(err) => return Err(err.into()),
    };

    let rows = roster::parse_roster(file)?;
    println!("Roster {}: {} candidates", args.path.display(), rows.len());
    for row in &rows {
        if row.processes.is_empty() {
            println!("- {} (no processes assigned)", row.full_name);
        } else {
            println!("- {}: {}", row.full_name, row.processes.join(", "));
        }
    }

    Ok(())
}
