//! Runtime error taxonomy and transport-safe failure reports.
//!
//! Errors never cross an actor boundary directly. Inside an actor they are
//! ordinary `Result`s; at the run boundary a failure is formatted into a
//! [`FailureReport`], a plain value tree, and delivered to linked actors
//! as a message, while the raw [`ActorError`] is stored in the exit slot for
//! `wait()` to observe.

// Layer 1: Standard library imports
use std::error::Error;
use std::time::Duration;

// Layer 2: Third-party crate imports
use thiserror::Error as ThisError;

// Layer 3: Internal module imports
use crate::message::Value;

/// Result alias used throughout the runtime and by actor bodies.
pub type RtResult<T> = Result<T, ActorError>;

/// All failure modes of the actor runtime.
///
/// The enum is `Clone` because one outcome can be observed by many waiters
/// and serialised into several link messages.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ActorError {
    /// Operation on an address whose actor has terminated.
    #[error("message sent to a terminated actor")]
    DeadActor,

    /// The actor was forcibly terminated. Also what `wait()` returns for a
    /// killed actor.
    #[error("actor was killed")]
    Killed,

    /// A `call` did not receive its response in time.
    #[error("call timed out after {0:?}")]
    CallTimeout(Duration),

    /// The remote server exposes no such method.
    #[error("remote actor has no method `{0}`")]
    InvalidMethod(String),

    /// The remote server's method failed; the payload is the formatted
    /// report it sent back.
    #[error("remote method failed: {0:?}")]
    RemoteFailure(Value),

    /// A respond helper was handed a message that does not conform to the
    /// call shape. Programmer error; normal control flow never produces it.
    #[error("message does not conform to the call shape: {0}")]
    InvalidCallMessage(String),

    /// Application-level failure raised by an actor body.
    #[error("{kind}: {message}")]
    Failure {
        /// Application-chosen failure class, e.g. `"RuntimeError"`.
        kind: String,
        /// Human-readable description.
        message: String,
    },

    /// The wire envelope could not be produced or parsed.
    #[error("bad message envelope: {0}")]
    BadEnvelope(String),
}

impl ActorError {
    /// Construct an application-level failure.
    pub fn failure(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Stable kind name used in failure reports.
    pub fn kind(&self) -> &str {
        match self {
            Self::DeadActor => "DeadActor",
            Self::Killed => "Killed",
            Self::CallTimeout(_) => "CallTimeout",
            Self::InvalidMethod(_) => "InvalidMethod",
            Self::RemoteFailure(_) => "RemoteFailure",
            Self::InvalidCallMessage(_) => "InvalidCallMessage",
            Self::Failure { kind, .. } => kind,
            Self::BadEnvelope(_) => "BadEnvelope",
        }
    }
}

/// Transport-safe rendition of a failure: kind, message, and a line-per-cause
/// trace. This is what linked actors receive and what
/// `respond_exception` puts on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    /// Failure class name.
    pub kind: String,
    /// Human-readable description.
    pub message: String,
    /// One line per cause, outermost first.
    pub trace: Vec<String>,
}

impl FailureReport {
    /// Format an error into a report.
    pub fn from_error(error: &ActorError) -> Self {
        let message = match error {
            ActorError::Failure { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let mut trace = vec![format!("{}: {message}", error.kind())];
        let mut cause: Option<&dyn Error> = error.source();
        while let Some(current) = cause {
            trace.push(current.to_string());
            cause = current.source();
        }
        Self {
            kind: error.kind().to_owned(),
            message,
            trace,
        }
    }

    /// The value tree carried in `exception` messages.
    pub fn to_value(&self) -> Value {
        Value::map([
            ("kind", Value::from(self.kind.clone())),
            ("message", Value::from(self.message.clone())),
            (
                "trace",
                Value::List(self.trace.iter().map(|line| Value::from(line.clone())).collect()),
            ),
        ])
    }

    /// Parse a report back out of a value tree, if it has the right shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = value.get("kind")?.as_str()?.to_owned();
        let message = value.get("message")?.as_str()?.to_owned();
        let trace = match value.get("trace") {
            Some(Value::List(lines)) => lines
                .iter()
                .filter_map(|line| line.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        };
        Some(Self { kind, message, trace })
    }
}
