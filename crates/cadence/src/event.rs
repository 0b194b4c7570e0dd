//! Time events
//!
//! An event is a guardable firing point owned by one time sync. Its status
//! only moves forward (WAITING -> PENDING -> HAPPENED) until an explicit reset.
//! DISPOSED is what a removed event reports: the object itself is gone and
//! lookups by id resolve to nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::device::ParameterSource;
use crate::expression::Expression;
use crate::time_value::TimeValue;

/// Identity of a time event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event:{}", &self.0.to_string()[..8])
    }
}

/// Status of a time event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Waiting,
    Pending,
    Happened,
    Disposed,
}

/// Called on every status transition of an event
pub type StatusCallback = Box<dyn FnMut(EventId, EventStatus) + Send>;

/// A firing point inside a time sync
pub struct TimeEvent {
    id: EventId,
    status: EventStatus,
    guard: Option<Expression>,
    date: Option<TimeValue>,
    /// Tick on which the guard was last evaluated
    evaluated_on: Option<u64>,
    callback: Option<StatusCallback>,
}

impl TimeEvent {
    pub(crate) fn new() -> Self {
        Self {
            id: EventId::new(),
            status: EventStatus::Waiting,
            guard: None,
            date: None,
            evaluated_on: None,
            callback: None,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    /// Date at which the event happened, relative to its scenario's start
    pub fn date(&self) -> Option<TimeValue> {
        self.date
    }

    pub fn guard(&self) -> Option<&Expression> {
        self.guard.as_ref()
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub(crate) fn set_guard(&mut self, guard: Option<Expression>) {
        self.guard = guard;
    }

    pub(crate) fn set_callback(&mut self, callback: Option<StatusCallback>) {
        self.callback = callback;
    }

    /// WAITING -> PENDING. Returns whether the status changed.
    pub(crate) fn make_pending(&mut self) -> bool {
        if self.status != EventStatus::Waiting {
            return false;
        }
        self.transition(EventStatus::Pending);
        true
    }

    /// PENDING -> HAPPENED at `date`. Returns whether the status changed.
    pub(crate) fn happen(&mut self, date: TimeValue) -> bool {
        if self.status != EventStatus::Pending {
            return false;
        }
        self.date = Some(date);
        self.transition(EventStatus::Happened);
        true
    }

    /// Final transition before the event is torn down
    pub(crate) fn dispose(&mut self) {
        if self.status != EventStatus::Disposed {
            self.transition(EventStatus::Disposed);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.date = None;
        self.evaluated_on = None;
        if let Some(guard) = &mut self.guard {
            guard.reset();
        }
        if self.status != EventStatus::Waiting {
            self.transition(EventStatus::Waiting);
        }
    }

    /// Evaluate the guard, at most once per tick.
    ///
    /// An event without a guard always passes. A second call on the same tick
    /// returns false without evaluating, which keeps pulse guards honest.
    pub(crate) fn check_guard(&mut self, tick: u64, source: &dyn ParameterSource) -> bool {
        if self.evaluated_on == Some(tick) {
            return false;
        }
        self.evaluated_on = Some(tick);
        match &mut self.guard {
            Some(guard) => guard.evaluate(source),
            None => true,
        }
    }

    fn transition(&mut self, status: EventStatus) {
        debug!(event = %self.id, from = ?self.status, to = ?status, "event status");
        self.status = status;
        if let Some(callback) = &mut self.callback {
            callback(self.id, status);
        }
    }
}

impl fmt::Debug for TimeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeEvent")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("guard", &self.guard)
            .field("date", &self.date)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryDevice;
    use crate::expression::Expr;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_status_only_moves_forward() {
        let mut event = TimeEvent::new();
        assert_eq!(event.status(), EventStatus::Waiting);

        // Cannot happen before being pending
        assert!(!event.happen(TimeValue::from_secs(1.0)));
        assert_eq!(event.status(), EventStatus::Waiting);

        assert!(event.make_pending());
        assert!(!event.make_pending());
        assert!(event.happen(TimeValue::from_secs(1.0)));
        assert_eq!(event.date(), Some(TimeValue::from_secs(1.0)));

        // No regression to pending
        assert!(!event.make_pending());
        assert_eq!(event.status(), EventStatus::Happened);
    }

    #[test]
    fn test_reset_returns_to_waiting() {
        let mut event = TimeEvent::new();
        event.make_pending();
        event.happen(TimeValue::ZERO);
        event.reset();
        assert_eq!(event.status(), EventStatus::Waiting);
        assert_eq!(event.date(), None);
    }

    #[test]
    fn test_callback_sees_every_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut event = TimeEvent::new();
        event.set_callback(Some(Box::new(move |_, status| {
            sink.lock().unwrap().push(status);
        })));

        event.make_pending();
        event.happen(TimeValue::ZERO);
        event.reset();
        event.dispose();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                EventStatus::Pending,
                EventStatus::Happened,
                EventStatus::Waiting,
                EventStatus::Disposed,
            ]
        );
    }

    #[test]
    fn test_guard_evaluated_once_per_tick() {
        let mut device = MemoryDevice::new();
        device.set("/go", true);

        let mut event = TimeEvent::new();
        event.set_guard(Some(Expression::new(Expr::equals("/go", true))));

        assert!(event.check_guard(1, &device));
        assert!(!event.check_guard(1, &device));
        assert!(event.check_guard(2, &device));
    }

    #[test]
    fn test_unguarded_event_passes() {
        let device = MemoryDevice::new();
        let mut event = TimeEvent::new();
        assert!(event.check_guard(0, &device));
    }
}
