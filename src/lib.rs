//! Lead Intake - conversational lead capture agent.
//!
//! Drives a dialogue with a prospective customer through a tool-calling
//! completion engine, extracts contact details and project needs, and
//! records a lead with a proposed appointment once the conversation is
//! ready to schedule.
//!
//! Two surfaces share one turn engine: a stateless step endpoint where the
//! client holds the transcript, and a streaming voice session where the
//! server does.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
