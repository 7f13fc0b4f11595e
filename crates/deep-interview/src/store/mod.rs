pub mod memory;

pub use memory::{InMemoryAnswerRepository, InMemoryCandidateRepository};
