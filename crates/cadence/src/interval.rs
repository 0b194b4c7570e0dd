//! Time intervals
//!
//! An interval is a span between two events with a min and a max duration.
//! It carries a playback position and owns its processes, which all see the
//! same position and duration. Endpoints are kept by the scenario graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::device::ParameterSource;
use crate::error::{Result, ScoreError};
use crate::process::{Process, ProcessContext, TimeProcess};
use crate::state::State;
use crate::time_value::TimeValue;

/// Identity of a time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalId(Uuid);

impl IntervalId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interval:{}", &self.0.to_string()[..8])
    }
}

/// Playback status of an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalStatus {
    #[default]
    Waiting,
    Pending,
    Playing,
    Paused,
    Stopped,
}

/// A bounded span with processes
#[derive(Debug)]
pub struct TimeInterval {
    id: IntervalId,
    min: TimeValue,
    max: TimeValue,
    position: TimeValue,
    /// Date at which the start event happened
    date: Option<TimeValue>,
    status: IntervalStatus,
    processes: Vec<TimeProcess>,
}

impl TimeInterval {
    /// Create an interval, rejecting `min > max`
    pub fn new(min: TimeValue, max: TimeValue) -> Result<Self> {
        if min > max {
            return Err(ScoreError::InvalidBounds { min, max });
        }
        Ok(Self {
            id: IntervalId::new(),
            min,
            max,
            position: TimeValue::ZERO,
            date: None,
            status: IntervalStatus::Waiting,
            processes: Vec::new(),
        })
    }

    /// Interval with `min == max == duration`
    pub fn fixed(duration: TimeValue) -> Self {
        Self {
            id: IntervalId::new(),
            min: duration,
            max: duration,
            position: TimeValue::ZERO,
            date: None,
            status: IntervalStatus::Waiting,
            processes: Vec::new(),
        }
    }

    pub fn with_process(mut self, process: impl Into<TimeProcess>) -> Result<Self> {
        self.add_process(process)?;
        Ok(self)
    }

    pub fn id(&self) -> IntervalId {
        self.id
    }

    pub fn min(&self) -> TimeValue {
        self.min
    }

    pub fn max(&self) -> TimeValue {
        self.max
    }

    pub fn position(&self) -> TimeValue {
        self.position
    }

    pub fn date(&self) -> Option<TimeValue> {
        self.date
    }

    pub fn status(&self) -> IntervalStatus {
        self.status
    }

    pub fn processes(&self) -> &[TimeProcess] {
        &self.processes
    }

    pub fn processes_mut(&mut self) -> &mut [TimeProcess] {
        &mut self.processes
    }

    pub fn add_process(&mut self, process: impl Into<TimeProcess>) -> Result<()> {
        let process = process.into();
        process.validate(self.max)?;
        debug!(interval = %self.id, kind = process.kind(), "process added");
        self.processes.push(process);
        Ok(())
    }

    /// Change duration bounds. Processes must accept the new max.
    pub fn set_bounds(&mut self, min: TimeValue, max: TimeValue) -> Result<()> {
        if min > max {
            return Err(ScoreError::InvalidBounds { min, max });
        }
        for process in &self.processes {
            process.validate(max)?;
        }
        self.min = min;
        self.max = max;
        if self.position > max {
            self.position = max;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, IntervalStatus::Playing | IntervalStatus::Paused)
    }

    pub fn min_reached(&self) -> bool {
        self.position >= self.min
    }

    /// Reached a finite max duration
    pub fn at_deadline(&self) -> bool {
        self.max.is_finite() && self.position >= self.max
    }

    /// Playing, past min, and every process agrees to end
    pub fn end_ready(&self) -> bool {
        self.status == IntervalStatus::Playing
            && self.min_reached()
            && self.processes.iter().all(|p| p.end_ready())
    }

    /// WAITING -> PENDING once the start event happened at `date`
    pub(crate) fn schedule(&mut self, date: TimeValue) -> bool {
        if self.status != IntervalStatus::Waiting {
            return false;
        }
        self.date = Some(date);
        self.status = IntervalStatus::Pending;
        trace!(interval = %self.id, date = %date, "interval pending");
        true
    }

    /// Begin playback from position zero
    pub fn start(&mut self) {
        if !matches!(
            self.status,
            IntervalStatus::Waiting | IntervalStatus::Pending
        ) {
            return;
        }
        self.position = TimeValue::ZERO;
        self.status = IntervalStatus::Playing;
        for process in &mut self.processes {
            process.start();
        }
        debug!(interval = %self.id, min = %self.min, max = %self.max, "interval started");
    }

    pub fn stop(&mut self) {
        let was_running = self.is_running();
        if self.status == IntervalStatus::Stopped {
            return;
        }
        self.status = IntervalStatus::Stopped;
        if was_running {
            for process in &mut self.processes {
                process.stop();
            }
        }
        debug!(interval = %self.id, position = %self.position, "interval stopped");
    }

    pub fn pause(&mut self) -> bool {
        if self.status != IntervalStatus::Playing {
            return false;
        }
        self.status = IntervalStatus::Paused;
        for process in &mut self.processes {
            process.pause();
        }
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != IntervalStatus::Paused {
            return false;
        }
        self.status = IntervalStatus::Playing;
        for process in &mut self.processes {
            process.resume();
        }
        true
    }

    /// Seek a running interval, clamped to `[0, max]`
    pub fn offset(&mut self, position: TimeValue) -> bool {
        if !self.is_running() {
            return false;
        }
        self.position = position.min(self.max);
        true
    }

    /// Move the position forward by at most `budget`, stopping at max.
    ///
    /// Returns the time actually consumed and the merged state of the
    /// processes at the new position. Anything but PLAYING yields nothing.
    pub fn advance(&mut self, budget: TimeValue, source: &dyn ParameterSource) -> (TimeValue, State) {
        if self.status != IntervalStatus::Playing {
            return (TimeValue::ZERO, State::new());
        }

        let target = (self.position + budget).min(self.max);
        let consumed = target - self.position;
        self.position = target;

        let ctx = ProcessContext {
            position: self.position,
            duration: self.max,
            source,
        };
        let mut state = State::new();
        for process in &mut self.processes {
            process.advance(consumed, source);
            state.merge(process.state_at(&ctx));
        }

        trace!(
            interval = %self.id,
            position = %self.position,
            consumed = %consumed,
            messages = state.len(),
            "interval advanced"
        );
        (consumed, state)
    }

    /// Back to WAITING at position zero, resetting every process
    pub fn reset(&mut self) {
        self.status = IntervalStatus::Waiting;
        self.position = TimeValue::ZERO;
        self.date = None;
        for process in &mut self.processes {
            process.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::device::NoParameters;
    use crate::process::Automation;
    use crate::value::Value;

    fn secs(s: f64) -> TimeValue {
        TimeValue::from_secs(s)
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = TimeInterval::new(secs(2.0), secs(1.0)).unwrap_err();
        assert_eq!(
            err,
            ScoreError::InvalidBounds {
                min: secs(2.0),
                max: secs(1.0)
            }
        );
    }

    #[test]
    fn test_position_never_exceeds_max() {
        let mut interval = TimeInterval::new(secs(1.0), secs(2.0)).unwrap();
        interval.start();

        let (consumed, _) = interval.advance(secs(1.5), &NoParameters);
        assert_eq!(consumed, secs(1.5));
        let (consumed, _) = interval.advance(secs(1.5), &NoParameters);
        assert_eq!(consumed, secs(0.5));
        assert_eq!(interval.position(), secs(2.0));
        assert!(interval.at_deadline());
    }

    #[test]
    fn test_end_ready_requires_min() {
        let mut interval = TimeInterval::new(secs(1.0), TimeValue::INFINITE).unwrap();
        assert!(!interval.end_ready());
        interval.start();
        interval.advance(secs(0.5), &NoParameters);
        assert!(!interval.end_ready());
        interval.advance(secs(0.5), &NoParameters);
        assert!(interval.end_ready());
        assert!(!interval.at_deadline());
    }

    #[test]
    fn test_paused_interval_does_not_move() {
        let mut interval = TimeInterval::fixed(secs(4.0));
        interval.start();
        interval.advance(secs(1.0), &NoParameters);
        assert!(interval.pause());

        let (consumed, state) = interval.advance(secs(1.0), &NoParameters);
        assert_eq!(consumed, TimeValue::ZERO);
        assert!(state.is_empty());
        assert_eq!(interval.position(), secs(1.0));

        assert!(interval.resume());
        interval.advance(secs(1.0), &NoParameters);
        assert_eq!(interval.position(), secs(2.0));
    }

    #[test]
    fn test_offset_clamps_to_max() {
        let mut interval = TimeInterval::fixed(secs(2.0));
        assert!(!interval.offset(secs(1.0)));
        interval.start();
        assert!(interval.offset(secs(5.0)));
        assert_eq!(interval.position(), secs(2.0));
    }

    #[test]
    fn test_processes_share_position() {
        let mut interval = TimeInterval::fixed(secs(2.0))
            .with_process(Automation::new("/a", Curve::linear(0.0, 1.0)))
            .unwrap()
            .with_process(Automation::new("/b", Curve::linear(1.0, 0.0)))
            .unwrap();
        interval.start();

        let (_, state) = interval.advance(secs(1.0), &NoParameters);
        assert_eq!(state.len(), 2);
        assert_eq!(state.get(&"/a".into()).map(|m| &m.value), Some(&Value::Float(0.5)));
        assert_eq!(state.get(&"/b".into()).map(|m| &m.value), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_automation_needs_bounded_interval() {
        let mut interval = TimeInterval::new(TimeValue::ZERO, TimeValue::INFINITE).unwrap();
        let err = interval
            .add_process(Automation::new("/a", Curve::default()))
            .unwrap_err();
        assert_eq!(err, ScoreError::UnboundedAutomation);

        let mut bounded = TimeInterval::fixed(secs(1.0))
            .with_process(Automation::new("/a", Curve::default()))
            .unwrap();
        assert_eq!(
            bounded.set_bounds(TimeValue::ZERO, TimeValue::INFINITE),
            Err(ScoreError::UnboundedAutomation)
        );
        assert_eq!(bounded.max(), secs(1.0));
    }

    #[test]
    fn test_reset_returns_to_waiting() {
        let mut interval = TimeInterval::fixed(secs(1.0));
        interval.schedule(secs(3.0));
        interval.start();
        interval.advance(secs(1.0), &NoParameters);
        interval.stop();
        assert_eq!(interval.status(), IntervalStatus::Stopped);

        interval.reset();
        assert_eq!(interval.status(), IntervalStatus::Waiting);
        assert_eq!(interval.position(), TimeValue::ZERO);
        assert_eq!(interval.date(), None);
    }
}
