//! Structural validation of pipeline graphs.
//!
//! [`validate_connection`] gates a single edge at the moment it is drawn;
//! [`validate_flow`] re-derives the health of the whole graph after every edit.

use crate::error::ConnectionError;
use itertools::Itertools;
use thiserror::Error;

mod connection;
mod flow;

pub use connection::{available_successor_kinds, is_valid_connection, validate_connection};
pub use flow::validate_flow;

/// A blocking problem: the flow cannot be executed while any of these exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("flow must contain at least one index source node")]
    MissingSource,

    #[error("flow must contain an output node")]
    MissingOutput,

    #[error("single output only: flow contains {0} output nodes")]
    MultipleOutputs(usize),

    #[error("cycle detected: {}", .0.iter().join(" → "))]
    Cycle(Vec<String>),

    #[error("invalid connection '{source_id}' → '{target_id}': {reason}")]
    InvalidConnection {
        source_id: String,
        target_id: String,
        reason: ConnectionError,
    },
}

/// An advisory finding; never affects [`ValidationResult::is_valid`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowWarning {
    #[error("node \"{label}\" has no input connection")]
    NoInput { node_id: String, label: String },

    #[error("node \"{label}\" has no output connection")]
    NoOutput { node_id: String, label: String },
}

/// Outcome of [`validate_flow`], derived purely from one graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FlowError>,
    pub warnings: Vec<FlowWarning>,
}

impl ValidationResult {
    pub(crate) fn from_findings(errors: Vec<FlowError>, warnings: Vec<FlowWarning>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Valid and without warnings.
    pub fn is_clean(&self) -> bool {
        self.is_valid && self.warnings.is_empty()
    }
}
