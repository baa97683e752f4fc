//! Shared types for the interview agent: conversational exchanges, scored
//! evaluations, turn decisions, reports, configuration and trace events.

pub mod config;
pub mod error;
pub mod interview;
pub mod tool;
pub mod trace;
