//! Parameter-to-parameter mapping

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::curve::Curve;
use crate::device::Address;
use crate::state::{Message, State};
use crate::value::Value;

use super::{Process, ProcessContext};

/// How an input value becomes an output value
#[derive(Clone)]
pub enum Transfer {
    /// Normalize a numeric input over `[input_min, input_max]`, then read the curve
    Curve {
        input_min: f64,
        input_max: f64,
        curve: Curve,
    },
    /// Arbitrary pure function; `None` drops the output
    Function(Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>),
}

impl Transfer {
    pub fn function(f: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        Transfer::Function(Arc::new(f))
    }

    pub fn apply(&self, input: &Value) -> Option<Value> {
        match self {
            Transfer::Curve {
                input_min,
                input_max,
                curve,
            } => {
                let x = input.as_f64()?;
                let span = input_max - input_min;
                let t = if span.abs() > f64::EPSILON {
                    ((x - input_min) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                Some(Value::Float(curve.value_at(t)))
            }
            Transfer::Function(f) => f(input),
        }
    }
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transfer::Curve {
                input_min,
                input_max,
                curve,
            } => f
                .debug_struct("Curve")
                .field("input_min", input_min)
                .field("input_max", input_max)
                .field("curve", curve)
                .finish(),
            Transfer::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Reads `source`, transforms it, writes `target`
#[derive(Debug, Clone)]
pub struct Mapping {
    source: Address,
    target: Address,
    transfer: Transfer,
}

impl Mapping {
    pub fn new(source: impl Into<Address>, target: impl Into<Address>, transfer: Transfer) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transfer,
        }
    }

    pub fn source(&self) -> &Address {
        &self.source
    }

    pub fn target(&self) -> &Address {
        &self.target
    }
}

impl Process for Mapping {
    fn state_at(&self, ctx: &ProcessContext<'_>) -> State {
        let Some(input) = ctx.source.read(&self.source) else {
            trace!(source = %self.source, "mapping input unavailable");
            return State::new();
        };
        match self.transfer.apply(&input) {
            Some(output) => Message::new(self.target.clone(), output).into(),
            None => State::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryDevice;
    use crate::time_value::TimeValue;

    fn run(mapping: &Mapping, device: &MemoryDevice) -> State {
        let ctx = ProcessContext {
            position: TimeValue::ZERO,
            duration: TimeValue::INFINITE,
            source: device,
        };
        mapping.state_at(&ctx)
    }

    #[test]
    fn test_curve_transfer_normalizes_input() {
        let mut device = MemoryDevice::new();
        device.set("/sensor", 50);

        let mapping = Mapping::new(
            "/sensor",
            "/volume",
            Transfer::Curve {
                input_min: 0.0,
                input_max: 100.0,
                curve: Curve::linear(0.0, 1.0),
            },
        );
        let state = run(&mapping, &device);
        assert_eq!(
            state.get(&"/volume".into()).map(|m| &m.value),
            Some(&Value::Float(0.5))
        );
    }

    #[test]
    fn test_function_transfer() {
        let mut device = MemoryDevice::new();
        device.set("/note", 60);

        let mapping = Mapping::new(
            "/note",
            "/label",
            Transfer::function(|v| v.as_f64().map(|n| Value::from(format!("n{}", n)))),
        );
        let state = run(&mapping, &device);
        assert_eq!(
            state.get(&"/label".into()).map(|m| &m.value),
            Some(&Value::String("n60".into()))
        );
    }

    #[test]
    fn test_missing_input_emits_nothing() {
        let device = MemoryDevice::new();
        let mapping = Mapping::new(
            "/absent",
            "/out",
            Transfer::function(|v| Some(v.clone())),
        );
        assert!(run(&mapping, &device).is_empty());
    }
}
