//! Optional push of log records to an external search backend.
//!
//! Forwarding is fire-and-forget: the decision is made synchronously on the
//! logging thread, delivery happens on a background thread and its outcome is
//! only visible through [`ForwardStatsSnapshot`] and internal diagnostics.

pub mod client;
pub mod forwarder;
pub mod policy;

pub use client::{BackendClient, SearchClient};
pub use forwarder::{ForwardStats, ForwardStatsSnapshot, Forwarder};
pub use policy::{ForwardTargets, WILDCARD, should_forward};

use crate::domain::{Payload, Severity, payload};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },
    #[error("Forwarding timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Forwarder runtime error: {0}")]
    Runtime(String),
}

/// Document pushed to the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRecord {
    pub index: String,
    pub message: String,
}

impl ForwardRecord {
    pub fn new(severity: Severity, content: &Payload) -> Self {
        Self {
            index: severity.index_name(),
            message: payload::to_message(content),
        }
    }
}
