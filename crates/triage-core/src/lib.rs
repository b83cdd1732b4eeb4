//! # triage-core
//!
//! Core types for Triage, the incident-analysis chat assistant.
//!
//! This crate is free of I/O and provides the types shared across all Triage
//! crates:
//! - Transcript messages and their ordering ([`message`])
//! - Chat wire types with an explicitly versioned reply schema ([`chat`])
//! - Render-ready reply views built from chat replies ([`render`])
//! - The RCA form draft, its validation, and the submission payload ([`rca`])
//! - Closed enums for senders, severities, and incident statuses ([`enums`])
//! - Cross-cutting error types ([`errors`])

pub mod chat;
pub mod enums;
pub mod errors;
pub mod message;
pub mod rca;
pub mod render;
