//! Mitigation Intake - conversational intake for mitigation statements
//!
//! A fixed questionnaire is walked one answer at a time. Once every question
//! has a substantive answer, similar cases are retrieved and an LLM drafts a
//! mitigation statement that is stored for solicitor review.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
