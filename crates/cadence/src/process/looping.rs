//! Repeating pattern interval
//!
//! A loop owns one pattern interval standing for a single iteration. When
//! the pattern ends, it is reset and restarted with whatever is left of the
//! delta, until the optional iteration bound is reached.

use tracing::debug;

use crate::device::ParameterSource;
use crate::expression::Expression;
use crate::interval::{IntervalStatus, TimeInterval};
use crate::state::State;
use crate::time_value::TimeValue;

use super::{Process, ProcessContext};

#[derive(Debug)]
pub struct Loop {
    pattern: TimeInterval,
    /// Ends an iteration early once the pattern reached its min
    guard: Option<Expression>,
    bound: Option<u32>,
    iterations: u32,
    finished: bool,
    state: State,
}

impl Loop {
    /// Unbounded loop over `pattern`
    pub fn new(pattern: TimeInterval) -> Self {
        Self {
            pattern,
            guard: None,
            bound: None,
            iterations: 0,
            finished: false,
            state: State::new(),
        }
    }

    pub fn with_bound(mut self, iterations: u32) -> Self {
        self.bound = Some(iterations);
        self
    }

    pub fn with_guard(mut self, guard: Expression) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn pattern(&self) -> &TimeInterval {
        &self.pattern
    }

    pub fn pattern_mut(&mut self) -> &mut TimeInterval {
        &mut self.pattern
    }

    pub fn bound(&self) -> Option<u32> {
        self.bound
    }

    /// Completed iterations
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn iteration_over(&mut self, source: &dyn ParameterSource) -> bool {
        if self.pattern.at_deadline() {
            return true;
        }
        if !self.pattern.end_ready() {
            return false;
        }
        match &mut self.guard {
            Some(guard) => guard.evaluate(source),
            None => true,
        }
    }
}

impl Process for Loop {
    fn state_at(&self, _ctx: &ProcessContext<'_>) -> State {
        self.state.clone()
    }

    fn start(&mut self) {
        self.iterations = 0;
        self.finished = false;
        self.state.clear();
        self.pattern.reset();
        self.pattern.start();
    }

    fn stop(&mut self) {
        self.pattern.stop();
    }

    fn pause(&mut self) {
        self.pattern.pause();
    }

    fn resume(&mut self) {
        self.pattern.resume();
    }

    fn reset(&mut self) {
        self.iterations = 0;
        self.finished = false;
        self.state.clear();
        self.pattern.reset();
        if let Some(guard) = &mut self.guard {
            guard.reset();
        }
    }

    fn advance(&mut self, delta: TimeValue, source: &dyn ParameterSource) {
        self.state.clear();
        if self.finished {
            return;
        }

        let mut remaining = delta;
        loop {
            if self.pattern.status() == IntervalStatus::Waiting {
                self.pattern.start();
            }
            let (consumed, state) = self.pattern.advance(remaining, source);
            self.state.merge(state);
            remaining = remaining - consumed;

            if !self.iteration_over(source) {
                break;
            }

            let length = self.pattern.position();
            self.pattern.stop();
            self.iterations += 1;
            debug!(iterations = self.iterations, length = %length, "loop iteration done");

            if self.bound.is_some_and(|bound| self.iterations >= bound) {
                self.finished = true;
                break;
            }
            self.pattern.reset();

            // At most one zero-length iteration per advance
            if length.is_zero() || remaining.is_zero() {
                break;
            }
        }
    }

    fn end_ready(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::device::{MemoryDevice, NoParameters};
    use crate::expression::Expr;
    use crate::process::Automation;
    use crate::value::Value;

    fn secs(s: f64) -> TimeValue {
        TimeValue::from_secs(s)
    }

    fn ramp_pattern(length: f64) -> TimeInterval {
        TimeInterval::fixed(secs(length))
            .with_process(Automation::new("/x", Curve::linear(0.0, 1.0)))
            .unwrap()
    }

    #[test]
    fn test_bounded_loop_finishes_after_n_iterations() {
        let mut looped = Loop::new(ramp_pattern(1.0)).with_bound(3);
        looped.start();

        for expected in 1..=3 {
            assert!(!looped.end_ready());
            looped.advance(secs(1.0), &NoParameters);
            assert_eq!(looped.iterations(), expected);
        }
        assert!(looped.end_ready());

        // Finished loops stay quiet
        looped.advance(secs(1.0), &NoParameters);
        assert_eq!(looped.iterations(), 3);
    }

    #[test]
    fn test_remaining_delta_carries_into_next_iteration() {
        let mut looped = Loop::new(ramp_pattern(1.0));
        looped.start();

        looped.advance(secs(1.5), &NoParameters);
        assert_eq!(looped.iterations(), 1);
        assert_eq!(looped.pattern().position(), secs(0.5));

        let ctx = ProcessContext {
            position: TimeValue::ZERO,
            duration: TimeValue::INFINITE,
            source: &NoParameters,
        };
        let state = looped.state_at(&ctx);
        assert_eq!(
            state.get(&"/x".into()).map(|m| &m.value),
            Some(&Value::Float(0.5))
        );
    }

    #[test]
    fn test_unbounded_loop_never_ready() {
        let mut looped = Loop::new(ramp_pattern(0.5));
        looped.start();
        for _ in 0..20 {
            looped.advance(secs(1.0), &NoParameters);
        }
        assert_eq!(looped.iterations(), 40);
        assert!(!looped.end_ready());
    }

    #[test]
    fn test_guard_ends_open_pattern() {
        let pattern = TimeInterval::new(secs(1.0), TimeValue::INFINITE).unwrap();
        let mut looped = Loop::new(pattern)
            .with_bound(1)
            .with_guard(Expression::new(Expr::equals("/done", true)));
        looped.start();

        let mut device = MemoryDevice::new();
        device.set("/done", false);
        looped.advance(secs(2.0), &device);
        assert_eq!(looped.iterations(), 0);

        device.set("/done", true);
        looped.advance(secs(0.1), &device);
        assert_eq!(looped.iterations(), 1);
        assert!(looped.end_ready());
    }

    #[test]
    fn test_zero_length_pattern_does_not_spin() {
        let mut looped = Loop::new(TimeInterval::fixed(TimeValue::ZERO));
        looped.start();
        looped.advance(secs(1.0), &NoParameters);
        assert_eq!(looped.iterations(), 1);
        looped.advance(secs(1.0), &NoParameters);
        assert_eq!(looped.iterations(), 2);
    }

    #[test]
    fn test_reset_clears_iterations() {
        let mut looped = Loop::new(ramp_pattern(1.0)).with_bound(1);
        looped.start();
        looped.advance(secs(1.0), &NoParameters);
        assert!(looped.is_finished());

        looped.reset();
        assert_eq!(looped.iterations(), 0);
        assert!(!looped.is_finished());
        assert_eq!(looped.pattern().status(), IntervalStatus::Waiting);
    }
}
