use std::fmt::Write as _;
use std::io::Write;

use super::CandidateReport;

const TITLE: &str = "CANDIDATE PROCESS REPORT";
const FOOTER: &str = "Generated automatically by DeepInterview";

impl CandidateReport {
    fn processes_label(&self) -> String {
        if self.processes.is_empty() {
            "Not specified".to_string()
        } else {
            self.processes.join(", ")
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out);
        let _ = writeln!(out, "Full name: {}", self.full_name);
        let _ = writeln!(out, "Processes: {}", self.processes_label());
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.format("%d.%m.%Y %H:%M")
        );

        if self.sections.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "No accepted answers yet.");
        }

        for section in &self.sections {
            let metrics = &section.metrics;
            let _ = writeln!(out);
            let _ = writeln!(out, "Process: {}", section.process);
            let _ = writeln!(out, "  Iteration time (min): {}", metrics.iteration_minutes);
            let _ = writeln!(out, "  Frequency: {}", metrics.frequency);
            let _ = writeln!(out, "  Repetitions per session: {}", metrics.session_count);
            let _ = writeln!(out, "  Total time (min): {:.1}", metrics.total_minutes);
            let _ = writeln!(out, "  Process cost: {:.2}", metrics.cost);
            let _ = writeln!(out, "  Tools: {}", metrics.tools_label());
            let _ = writeln!(out, "  Answers:");
            for answer in &section.answers {
                let question = answer.question.replace("\n\n", " / ");
                let _ = writeln!(out, "    Question {}: {}", answer.question_number, question);
                let _ = writeln!(out, "    Answer: {}", answer.answer);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{FOOTER}");
        out
    }

    /// Spreadsheet-friendly rendering: one `section,field,value` row per datum.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["section", "field", "value"])?;
        csv_writer.write_record(["candidate", "full_name", self.full_name.as_str()])?;
        csv_writer.write_record(["candidate", "processes", self.processes_label().as_str()])?;
        csv_writer.write_record([
            "candidate",
            "generated_at",
            self.generated_at.format("%d.%m.%Y %H:%M").to_string().as_str(),
        ])?;

        for section in &self.sections {
            let metrics = &section.metrics;
            let process = section.process.as_str();
            let rows = [
                ("iteration_minutes", metrics.iteration_minutes.to_string()),
                ("frequency", metrics.frequency.to_string()),
                ("session_count", metrics.session_count.to_string()),
                ("total_minutes", format!("{:.1}", metrics.total_minutes)),
                ("cost", format!("{:.2}", metrics.cost)),
                ("tools", metrics.tools_label()),
            ];
            for (field, value) in rows {
                csv_writer.write_record([process, field, value.as_str()])?;
            }
            for answer in &section.answers {
                let field = format!("question_{}", answer.question_number);
                csv_writer.write_record([process, field.as_str(), answer.answer.as_str()])?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
