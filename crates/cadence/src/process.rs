//! Time processes
//!
//! The units of behavior that run inside an interval. Every process answers
//! `state_at` for the interval's current position; variants with internal
//! state also react to the lifecycle hooks the owning interval forwards.

use tracing::warn;

use crate::device::ParameterSource;
use crate::error::{Result, ScoreError};
use crate::scenario::Scenario;
use crate::state::State;
use crate::time_value::TimeValue;

mod automation;
mod looping;
mod mapping;

pub use automation::Automation;
pub use looping::Loop;
pub use mapping::{Mapping, Transfer};

// =============================================================================
// CAPABILITY
// =============================================================================

/// What a process sees when asked for its state
pub struct ProcessContext<'a> {
    /// Position inside the owning interval
    pub position: TimeValue,
    /// Max duration of the owning interval
    pub duration: TimeValue,
    pub source: &'a dyn ParameterSource,
}

impl ProcessContext<'_> {
    /// Normalized position. A zero-length span is already complete; an
    /// unbounded one stays at `0.0`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.position.ratio_of(self.duration).unwrap_or(0.0)
    }
}

/// Uniform capability of every process variant
pub trait Process {
    fn state_at(&self, ctx: &ProcessContext<'_>) -> State;

    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn reset(&mut self) {}

    /// Move internal time forward by the time the interval consumed
    fn advance(&mut self, _delta: TimeValue, _source: &dyn ParameterSource) {}

    /// Whether the owning interval may end
    fn end_ready(&self) -> bool {
        true
    }
}

// =============================================================================
// VARIANTS
// =============================================================================

/// The closed set of process kinds
#[derive(Debug)]
pub enum TimeProcess {
    Automation(Automation),
    Mapping(Mapping),
    Loop(Box<Loop>),
    Scenario(Box<Scenario>),
}

impl TimeProcess {
    pub fn kind(&self) -> &'static str {
        match self {
            TimeProcess::Automation(_) => "automation",
            TimeProcess::Mapping(_) => "mapping",
            TimeProcess::Loop(_) => "loop",
            TimeProcess::Scenario(_) => "scenario",
        }
    }

    /// Check the process against the max duration of its interval
    pub fn validate(&self, max: TimeValue) -> Result<()> {
        match self {
            TimeProcess::Automation(automation) if max.is_infinite() => {
                warn!(target = %automation.target(), "automation on unbounded interval rejected");
                Err(ScoreError::UnboundedAutomation)
            }
            _ => Ok(()),
        }
    }

    pub fn as_scenario(&self) -> Option<&Scenario> {
        match self {
            TimeProcess::Scenario(scenario) => Some(scenario),
            _ => None,
        }
    }

    pub fn as_scenario_mut(&mut self) -> Option<&mut Scenario> {
        match self {
            TimeProcess::Scenario(scenario) => Some(scenario),
            _ => None,
        }
    }

    pub fn as_loop(&self) -> Option<&Loop> {
        match self {
            TimeProcess::Loop(looped) => Some(looped),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Process {
        match self {
            TimeProcess::Automation(p) => p,
            TimeProcess::Mapping(p) => p,
            TimeProcess::Loop(p) => p.as_ref(),
            TimeProcess::Scenario(p) => p.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Process {
        match self {
            TimeProcess::Automation(p) => p,
            TimeProcess::Mapping(p) => p,
            TimeProcess::Loop(p) => p.as_mut(),
            TimeProcess::Scenario(p) => p.as_mut(),
        }
    }
}

impl Process for TimeProcess {
    fn state_at(&self, ctx: &ProcessContext<'_>) -> State {
        self.inner().state_at(ctx)
    }

    fn start(&mut self) {
        self.inner_mut().start()
    }

    fn stop(&mut self) {
        self.inner_mut().stop()
    }

    fn pause(&mut self) {
        self.inner_mut().pause()
    }

    fn resume(&mut self) {
        self.inner_mut().resume()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }

    fn advance(&mut self, delta: TimeValue, source: &dyn ParameterSource) {
        self.inner_mut().advance(delta, source)
    }

    fn end_ready(&self) -> bool {
        self.inner().end_ready()
    }
}

impl From<Automation> for TimeProcess {
    fn from(p: Automation) -> Self {
        TimeProcess::Automation(p)
    }
}

impl From<Mapping> for TimeProcess {
    fn from(p: Mapping) -> Self {
        TimeProcess::Mapping(p)
    }
}

impl From<Loop> for TimeProcess {
    fn from(p: Loop) -> Self {
        TimeProcess::Loop(Box::new(p))
    }
}

impl From<Scenario> for TimeProcess {
    fn from(p: Scenario) -> Self {
        TimeProcess::Scenario(Box::new(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::device::NoParameters;

    #[test]
    fn test_progress_on_unbounded_duration() {
        let ctx = ProcessContext {
            position: TimeValue::from_secs(3.0),
            duration: TimeValue::INFINITE,
            source: &NoParameters,
        };
        assert_eq!(ctx.progress(), 0.0);
    }

    #[test]
    fn test_zero_length_automation_lands_on_end() {
        let automation = Automation::new("/p", Curve::linear(0.0, 1.0));
        let ctx = ProcessContext {
            position: TimeValue::ZERO,
            duration: TimeValue::ZERO,
            source: &NoParameters,
        };
        assert_eq!(ctx.progress(), 1.0);
        assert_eq!(
            automation.state_at(&ctx).messages(),
            &[crate::state::Message::new("/p", 1.0)]
        );
    }

    #[test]
    fn test_only_automation_needs_bounds() {
        let automation: TimeProcess = Automation::new("/a", Curve::default()).into();
        assert!(automation.validate(TimeValue::INFINITE).is_err());
        assert!(automation.validate(TimeValue::from_secs(1.0)).is_ok());

        let nested: TimeProcess = Scenario::new().into();
        assert!(nested.validate(TimeValue::INFINITE).is_ok());
        assert_eq!(nested.kind(), "scenario");
    }
}
