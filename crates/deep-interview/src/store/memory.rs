use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::answers::{AnswerRecord, NewAnswer};
use crate::candidates::{Candidate, CandidateId, NewCandidate};
use crate::repository::{AnswerRepository, CandidateRepository, RepositoryError};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

#[derive(Debug, Default)]
struct CandidateTable {
    next_id: u64,
    rows: BTreeMap<CandidateId, Candidate>,
}

impl CandidateTable {
    fn insert(&mut self, candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        if self
            .rows
            .values()
            .any(|row| row.full_name == candidate.full_name)
        {
            return Err(RepositoryError::Conflict);
        }

        self.next_id += 1;
        let record = Candidate {
            id: CandidateId(self.next_id),
            full_name: candidate.full_name,
            processes: candidate.processes,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.rows.insert(record.id, record.clone());
        Ok(record)
    }
}

/// Roster kept in process memory; ids are never reused, even across
/// `replace_all`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCandidateRepository {
    table: Arc<Mutex<CandidateTable>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        lock(&self.table)?.insert(candidate)
    }

    fn update_processes(
        &self,
        id: CandidateId,
        processes: Vec<String>,
    ) -> Result<Candidate, RepositoryError> {
        let mut table = lock(&self.table)?;
        let row = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        row.processes = processes;
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    fn find_by_name(&self, full_name: &str) -> Result<Option<Candidate>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table
            .rows
            .values()
            .find(|row| row.full_name == full_name)
            .cloned())
    }

    fn find_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(lock(&self.table)?.rows.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(lock(&self.table)?.rows.values().cloned().collect())
    }

    fn replace_all(&self, candidates: Vec<NewCandidate>) -> Result<usize, RepositoryError> {
        let mut table = lock(&self.table)?;
        table.rows.clear();
        let mut loaded = 0;
        for candidate in candidates {
            match table.insert(candidate) {
                Ok(_) => loaded += 1,
                Err(RepositoryError::Conflict) => continue,
                Err(other) => return Err(other),
            }
        }
        Ok(loaded)
    }
}

#[derive(Debug, Default)]
struct AnswerLog {
    next_id: u64,
    rows: Vec<AnswerRecord>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryAnswerRepository {
    log: Arc<Mutex<AnswerLog>>,
}

impl InMemoryAnswerRepository {
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.log)?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(lock(&self.log)?.rows.is_empty())
    }
}

impl AnswerRepository for InMemoryAnswerRepository {
    fn append(&self, answer: NewAnswer) -> Result<AnswerRecord, RepositoryError> {
        let mut log = lock(&self.log)?;
        log.next_id += 1;
        let record = AnswerRecord {
            id: log.next_id,
            candidate_id: answer.candidate_id,
            question: answer.question,
            answer: answer.answer,
            is_valid: answer.is_valid,
            process: answer.process,
            question_number: answer.question_number,
            created_at: Utc::now(),
        };
        log.rows.push(record.clone());
        Ok(record)
    }

    fn for_candidate(&self, id: CandidateId) -> Result<Vec<AnswerRecord>, RepositoryError> {
        let log = lock(&self.log)?;
        Ok(log
            .rows
            .iter()
            .filter(|row| row.candidate_id == id)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<AnswerRecord>, RepositoryError> {
        Ok(lock(&self.log)?.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_names_are_unique() {
        let repository = InMemoryCandidateRepository::default();
        let first = repository
            .insert(NewCandidate::new("Alan Turing", "Decoding"))
            .expect("insert");
        assert_eq!(first.id, CandidateId(1));
        assert!(matches!(
            repository.insert(NewCandidate::new("Alan Turing", "Other")),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn replace_all_keeps_ids_monotonic() {
        let repository = InMemoryCandidateRepository::default();
        repository
            .insert(NewCandidate::new("Alan Turing", "Decoding"))
            .expect("insert");

        let loaded = repository
            .replace_all(vec![
                NewCandidate::new("Joan Clarke", "Decoding"),
                NewCandidate::new("Joan Clarke", "Duplicate"),
            ])
            .expect("replace");
        assert_eq!(loaded, 1);

        let roster = repository.list().expect("list");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, CandidateId(2));
        assert!(repository
            .find_by_name("Alan Turing")
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn update_processes_stamps_update_time() {
        let repository = InMemoryCandidateRepository::default();
        let candidate = repository
            .insert(NewCandidate::new("Alan Turing", "Decoding"))
            .expect("insert");
        let updated = repository
            .update_processes(candidate.id, vec!["Testing".to_string()])
            .expect("update");
        assert_eq!(updated.processes, vec!["Testing".to_string()]);
        assert!(updated.updated_at.is_some());
        assert!(matches!(
            repository.update_processes(CandidateId(99), Vec::new()),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn answers_are_filtered_by_candidate() {
        let repository = InMemoryAnswerRepository::default();
        for candidate in [1, 2, 1] {
            repository
                .append(NewAnswer {
                    candidate_id: CandidateId(candidate),
                    question: "Process: A\n\nHow does the process start?".to_string(),
                    answer: "With a call".to_string(),
                    is_valid: true,
                    process: "A".to_string(),
                    question_number: 1,
                })
                .expect("append");
        }
        assert_eq!(repository.len().expect("len"), 3);
        let first = repository.for_candidate(CandidateId(1)).expect("answers");
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].id, 3);

        let everything = repository.all().expect("all answers");
        let owners: Vec<u64> = everything.iter().map(|row| row.candidate_id.0).collect();
        assert_eq!(owners, vec![1, 2, 1]);
    }
}
