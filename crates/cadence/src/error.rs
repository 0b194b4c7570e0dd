//! Score errors
//!
//! Construction errors are rejected while the graph is built and never reached
//! at runtime. Guard evaluation failures are not errors at all; atoms fail
//! closed (see `expression`).

use crate::event::EventId;
use crate::interval::IntervalId;
use crate::sync::SyncId;
use crate::time_value::TimeValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("invalid duration bounds: min {min} > max {max}")]
    InvalidBounds { min: TimeValue, max: TimeValue },

    #[error("interval cannot start and end at the same time sync")]
    SelfReference,

    #[error("interval would create a cycle between time syncs")]
    Cycle,

    #[error("automation needs a bounded interval (max duration is infinite)")]
    UnboundedAutomation,

    #[error("unknown time event: {0}")]
    UnknownEvent(EventId),

    #[error("unknown time sync: {0}")]
    UnknownSync(SyncId),

    #[error("unknown time interval: {0}")]
    UnknownInterval(IntervalId),

    #[error("time event {0} is not pending")]
    NotPending(EventId),

    #[error("graph integrity violation: {0}")]
    Integrity(String),
}

impl ScoreError {
    /// Whether this error is raised while building the graph
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            ScoreError::InvalidBounds { .. }
                | ScoreError::SelfReference
                | ScoreError::Cycle
                | ScoreError::UnboundedAutomation
        )
    }
}

pub type Result<T, E = ScoreError> = std::result::Result<T, E>;
