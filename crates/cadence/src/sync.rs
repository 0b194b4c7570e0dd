//! Time syncs
//!
//! A sync is a logical instant that owns one or more events and decides when
//! they may fire. In OBSERVED mode the first pending event (insertion order)
//! whose guard holds fires, at most one per tick. In MANUAL mode events fire
//! only through an explicit trigger. Events whose incoming intervals hit their
//! max duration fire in either mode, ignoring guards.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::device::ParameterSource;
use crate::event::{EventId, EventStatus, TimeEvent};
use crate::time_value::TimeValue;

/// Identity of a time sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncId(Uuid);

impl SyncId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SyncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sync:{}", &self.0.to_string()[..8])
    }
}

/// How a sync's events get fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    #[default]
    Observed,
    Manual,
}

/// A logical instant owning one or more events
#[derive(Debug)]
pub struct TimeSync {
    id: SyncId,
    events: Vec<TimeEvent>,
    mode: TriggerMode,
    date: Option<TimeValue>,
    /// Tick on which an observed firing last happened
    fired_on: Option<u64>,
}

impl TimeSync {
    /// A sync with a single unguarded event
    pub(crate) fn new(mode: TriggerMode) -> Self {
        Self {
            id: SyncId::new(),
            events: vec![TimeEvent::new()],
            mode,
            date: None,
            fired_on: None,
        }
    }

    pub fn id(&self) -> SyncId {
        self.id
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Date at which every event of this sync had happened
    pub fn date(&self) -> Option<TimeValue> {
        self.date
    }

    pub fn events(&self) -> &[TimeEvent] {
        &self.events
    }

    pub fn event_ids(&self) -> Vec<EventId> {
        self.events.iter().map(|e| e.id()).collect()
    }

    pub fn event(&self, id: EventId) -> Option<&TimeEvent> {
        self.events.iter().find(|e| e.id() == id)
    }

    /// The first event, which every sync has at creation
    pub fn main_event(&self) -> Option<EventId> {
        self.events.first().map(|e| e.id())
    }

    /// All events happened; the completion signal for parent logic
    pub fn is_executed(&self) -> bool {
        self.date.is_some()
    }

    pub(crate) fn event_mut(&mut self, id: EventId) -> Option<&mut TimeEvent> {
        self.events.iter_mut().find(|e| e.id() == id)
    }

    pub(crate) fn events_mut(&mut self) -> impl Iterator<Item = &mut TimeEvent> {
        self.events.iter_mut()
    }

    pub(crate) fn set_mode(&mut self, mode: TriggerMode) {
        self.mode = mode;
    }

    pub(crate) fn add_event(&mut self) -> EventId {
        let event = TimeEvent::new();
        let id = event.id();
        self.events.push(event);
        id
    }

    pub(crate) fn take_event(&mut self, id: EventId) -> Option<TimeEvent> {
        let pos = self.events.iter().position(|e| e.id() == id)?;
        Some(self.events.remove(pos))
    }

    /// Pick the events to fire on this pass.
    ///
    /// `deadlines` holds events whose incoming intervals reached max duration;
    /// those fire regardless of mode and guard. Otherwise, in OBSERVED mode and
    /// if nothing fired through observation yet on `tick`, the first pending
    /// event whose guard holds is chosen. Events in `held` are skipped without
    /// evaluating their guard. Returned ids keep insertion order.
    pub(crate) fn select(
        &mut self,
        tick: u64,
        source: &dyn ParameterSource,
        deadlines: &HashSet<EventId>,
        held: &HashSet<EventId>,
    ) -> Vec<EventId> {
        let mut chosen: Vec<usize> = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.status() == EventStatus::Pending && deadlines.contains(&e.id()))
            .map(|(i, _)| i)
            .collect();

        if self.mode == TriggerMode::Observed && self.fired_on != Some(tick) {
            for (i, event) in self.events.iter_mut().enumerate() {
                if event.status() != EventStatus::Pending
                    || chosen.contains(&i)
                    || held.contains(&event.id())
                {
                    continue;
                }
                if event.check_guard(tick, source) {
                    chosen.push(i);
                    self.fired_on = Some(tick);
                    break;
                }
            }
        }

        chosen.sort_unstable();
        chosen.into_iter().map(|i| self.events[i].id()).collect()
    }

    /// Record the sync date once every event happened.
    ///
    /// The date is the latest event date and never changes until reset.
    pub(crate) fn try_execute(&mut self) -> bool {
        if self.date.is_some() || self.events.is_empty() {
            return false;
        }
        if !self
            .events
            .iter()
            .all(|e| e.status() == EventStatus::Happened)
        {
            return false;
        }
        let date = self
            .events
            .iter()
            .filter_map(|e| e.date())
            .max()
            .unwrap_or(TimeValue::ZERO);
        self.date = Some(date);
        info!(sync = %self.id, date = %date, "time sync executed");
        true
    }

    pub(crate) fn reset(&mut self) {
        self.date = None;
        self.fired_on = None;
        for event in &mut self.events {
            event.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryDevice;
    use crate::expression::{Expr, Expression};

    fn pending_sync(events: usize) -> TimeSync {
        let mut sync = TimeSync::new(TriggerMode::Observed);
        for _ in 1..events {
            sync.add_event();
        }
        for event in sync.events_mut() {
            event.make_pending();
        }
        sync
    }

    #[test]
    fn test_first_eligible_event_fires_alone() {
        let device = MemoryDevice::new();
        let mut sync = pending_sync(3);
        let ids = sync.event_ids();

        let chosen = sync.select(1, &device, &HashSet::new(), &HashSet::new());
        assert_eq!(chosen, vec![ids[0]]);

        // Same tick: nothing more through observation
        let again = sync.select(1, &device, &HashSet::new(), &HashSet::new());
        assert!(again.is_empty());
    }

    #[test]
    fn test_guard_skips_to_next_event() {
        let mut device = MemoryDevice::new();
        device.set("/left", false);
        let mut sync = pending_sync(2);
        let ids = sync.event_ids();
        if let Some(event) = sync.event_mut(ids[0]) {
            event.set_guard(Some(Expression::new(Expr::equals("/left", true))));
        }

        let chosen = sync.select(1, &device, &HashSet::new(), &HashSet::new());
        assert_eq!(chosen, vec![ids[1]]);
    }

    #[test]
    fn test_held_event_is_passed_over() {
        let device = MemoryDevice::new();
        let mut sync = pending_sync(2);
        let ids = sync.event_ids();

        let held: HashSet<EventId> = [ids[0]].into_iter().collect();
        assert_eq!(sync.select(1, &device, &HashSet::new(), &held), vec![ids[1]]);
        assert_eq!(sync.event(ids[0]).map(|e| e.status()), Some(EventStatus::Pending));
    }

    #[test]
    fn test_manual_mode_only_fires_deadlines() {
        let device = MemoryDevice::new();
        let mut sync = pending_sync(2);
        sync.set_mode(TriggerMode::Manual);
        let ids = sync.event_ids();

        assert!(sync.select(1, &device, &HashSet::new(), &HashSet::new()).is_empty());

        let deadlines: HashSet<EventId> = [ids[1]].into_iter().collect();
        assert_eq!(sync.select(1, &device, &deadlines, &HashSet::new()), vec![ids[1]]);
    }

    #[test]
    fn test_execution_date_is_latest_event() {
        let mut sync = pending_sync(2);
        let ids = sync.event_ids();

        sync.event_mut(ids[0]).map(|e| e.happen(TimeValue::from_secs(2.0)));
        assert!(!sync.try_execute());
        assert!(!sync.is_executed());

        sync.event_mut(ids[1]).map(|e| e.happen(TimeValue::from_secs(1.5)));
        assert!(sync.try_execute());
        assert_eq!(sync.date(), Some(TimeValue::from_secs(2.0)));

        // Date is sticky
        assert!(!sync.try_execute());

        sync.reset();
        assert_eq!(sync.date(), None);
        assert!(sync
            .events()
            .iter()
            .all(|e| e.status() == EventStatus::Waiting));
    }
}
