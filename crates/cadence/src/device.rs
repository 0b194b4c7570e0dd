//! Device boundary
//!
//! The engine never talks to a parameter tree directly. It reads through a
//! `ParameterSource` (guards, mapping inputs) and hands merged output to a
//! `ParameterSink` once per tick. `MemoryDevice` implements both for tests and
//! for the demo driver.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::{MergePolicy, State};
use crate::value::Value;

/// Parameter address, e.g. `/synth/cutoff`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Address> for Address {
    fn from(a: &Address) -> Self {
        a.clone()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read access to live parameter values.
///
/// Reads must be side-effect free and consistent within one tick. An address
/// that cannot be resolved yields `None`.
pub trait ParameterSource {
    fn read(&self, address: &Address) -> Option<Value>;
}

/// Write access to live parameters
pub trait ParameterSink {
    fn apply(&mut self, state: &State);
}

/// Source that resolves nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParameters;

impl ParameterSource for NoParameters {
    fn read(&self, _address: &Address) -> Option<Value> {
        None
    }
}

/// In-memory parameter store
#[derive(Debug, Clone, Default)]
pub struct MemoryDevice {
    values: HashMap<Address, Value>,
    applied: u64,
}

impl MemoryDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, address: impl Into<Address>, value: impl Into<Value>) {
        self.values.insert(address.into(), value.into());
    }

    pub fn remove(&mut self, address: &Address) -> Option<Value> {
        self.values.remove(address)
    }

    pub fn get(&self, address: &Address) -> Option<&Value> {
        self.values.get(address)
    }

    /// Number of states applied so far
    pub fn applied_count(&self) -> u64 {
        self.applied
    }
}

impl ParameterSource for MemoryDevice {
    fn read(&self, address: &Address) -> Option<Value> {
        self.values.get(address).cloned()
    }
}

impl ParameterSink for MemoryDevice {
    fn apply(&mut self, state: &State) {
        for message in state.iter() {
            let slot = self
                .values
                .entry(message.address.clone())
                .or_insert_with(|| Value::List(Vec::new()));
            match message.policy {
                MergePolicy::Override => *slot = message.value.clone(),
                MergePolicy::Merge => slot.merge(message.value.clone()),
            }
        }
        self.applied += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Message;

    #[test]
    fn test_read_missing_address() {
        let device = MemoryDevice::new();
        assert_eq!(device.read(&Address::from("/missing")), None);
        assert_eq!(NoParameters.read(&Address::from("/any")), None);
    }

    #[test]
    fn test_apply_writes_values() {
        let mut device = MemoryDevice::new();
        device.set("/gain", 0.0);

        let state: State = vec![
            Message::new("/gain", 0.8),
            Message::merging("/notes", vec![Value::Int(60)]),
        ]
        .into_iter()
        .collect();
        device.apply(&state);

        assert_eq!(device.read(&Address::from("/gain")), Some(Value::Float(0.8)));
        assert_eq!(
            device.read(&Address::from("/notes")),
            Some(Value::List(vec![Value::Int(60)]))
        );
        assert_eq!(device.applied_count(), 1);
    }
}
