//! Curve-driven automation of one parameter

use crate::curve::Curve;
use crate::device::Address;
use crate::state::{Message, State};
use crate::value::Value;

use super::{Process, ProcessContext};

/// Drives `target` along a curve over the interval's duration
#[derive(Debug, Clone, PartialEq)]
pub struct Automation {
    target: Address,
    curve: Curve,
}

impl Automation {
    pub fn new(target: impl Into<Address>, curve: Curve) -> Self {
        Self {
            target: target.into(),
            curve,
        }
    }

    pub fn target(&self) -> &Address {
        &self.target
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}

impl Process for Automation {
    fn state_at(&self, ctx: &ProcessContext<'_>) -> State {
        let value = self.curve.value_at(ctx.progress());
        Message::new(self.target.clone(), Value::Float(value)).into()
    }
}
