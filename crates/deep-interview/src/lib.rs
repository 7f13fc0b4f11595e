pub mod admin;
pub mod answers;
pub mod assistant;
pub mod auth;
pub mod candidates;
pub mod chat;
pub mod config;
pub mod error;
pub mod interview;
pub mod report;
pub mod repository;
pub mod roster;
pub mod store;
pub mod telemetry;
