//! Errors raised at the session boundary.
//!
//! None of these are fatal: every variant leaves the session in a valid state
//! and the caller decides whether to show it, retry, or drop it.

use thiserror::Error;

use crate::score::ScoreError;
use crate::session::{PitchState, SignalTicket};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Event does not apply to the current state; nothing changed
    #[error("cannot {event} while {state}")]
    InvalidState {
        event: &'static str,
        state: PitchState,
    },

    /// An ingested score was outside 0..=100; results were not applied
    #[error("metric '{metric}' rejected: {source}")]
    InvalidScore {
        metric: String,
        #[source]
        source: ScoreError,
    },

    /// A headline metric was absent from the analysis
    #[error("analysis did not score headline metric '{0}'")]
    MissingMetric(String),

    /// Feedback referred to a category the schema does not declare
    #[error("feedback category '{0}' is not part of the schema")]
    UnknownCategory(String),

    /// Completion signal for a phase that is no longer pending
    #[error("stale completion signal {ticket:?}")]
    StaleSignal { ticket: SignalTicket },
}

impl SessionError {
    pub fn is_stale(&self) -> bool {
        matches!(self, SessionError::StaleSignal { .. })
    }

    /// Whether the presentation layer should show this to the user.
    ///
    /// Stale signals are dropped silently and rejected key presses are
    /// just ignored; analysis rejections become a retry prompt.
    pub fn should_surface(&self) -> bool {
        match self {
            SessionError::InvalidState { .. } => false,
            SessionError::StaleSignal { .. } => false,
            SessionError::InvalidScore { .. } => true,
            SessionError::MissingMetric(_) => true,
            SessionError::UnknownCategory(_) => true,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            SessionError::InvalidScore { .. }
            | SessionError::MissingMetric(_)
            | SessionError::UnknownCategory(_) => {
                "The analysis came back incomplete. Press (r) to retry.".to_string()
            }
            SessionError::InvalidState { .. } | SessionError::StaleSignal { .. } => String::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
