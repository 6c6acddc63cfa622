use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of a run request: the generated source, snapshotted at submission
/// time. Edits made while a request is in flight never reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>) -> Self {
        ExecutionRequest { code: code.into() }
    }
}

/// One record of the line-by-line execution trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// 1-based line number into the submitted source.
    pub line: usize,
    /// The line's text, echoed by some service versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// The service's structured reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub success: bool,
    /// Printed lines, in order. Present on success.
    #[serde(default)]
    pub output: Vec<String>,
    /// Final variable bindings, rendered to strings. Present on success.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// Trace for stepwise replay. Present on success.
    #[serde(default)]
    pub steps: Vec<TraceStep>,
    /// Failure description. Present when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Transport-level failure talking to the execution service. A run that
/// reached the service but failed inside the submitted program comes back
/// as an [`ExecutionReport`] with `success: false`, not as an error here.
#[derive(Debug)]
pub enum ServiceError {
    Unavailable(String),
    Protocol(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unavailable(msg) => {
                write!(f, "execution service unavailable: {}", msg)
            }
            ServiceError::Protocol(msg) => write!(f, "malformed service reply: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

/// The seam the surrounding shell implements to run generated code. The
/// editor core never executes anything itself.
pub trait ExecutionService {
    fn execute(&mut self, request: &ExecutionRequest) -> Result<ExecutionReport, ServiceError>;
}
