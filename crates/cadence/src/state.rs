//! Output state
//!
//! A `State` is the ordered set of parameter messages produced by one tick.
//! Messages are merged on insertion: at most one message per address survives,
//! and the survivor keeps the position of the first message for that address.
//! Insertion order follows graph declaration order, so identical graphs fed
//! identical ticks produce identical states.

use serde::{Deserialize, Serialize};

use crate::device::Address;
use crate::value::Value;

/// How a message combines with an earlier message for the same address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    #[default]
    Override,
    Merge,
}

/// A single parameter assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub address: Address,
    pub value: Value,
    #[serde(default)]
    pub policy: MergePolicy,
}

impl Message {
    pub fn new(address: impl Into<Address>, value: impl Into<Value>) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
            policy: MergePolicy::Override,
        }
    }

    pub fn merging(address: impl Into<Address>, value: impl Into<Value>) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
            policy: MergePolicy::Merge,
        }
    }
}

/// Ordered, address-unique set of messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    messages: Vec<Message>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message, merging with an earlier message for the same address.
    pub fn insert(&mut self, message: Message) {
        match self
            .messages
            .iter_mut()
            .find(|existing| existing.address == message.address)
        {
            Some(existing) => match message.policy {
                MergePolicy::Override => {
                    existing.value = message.value;
                    existing.policy = MergePolicy::Override;
                }
                MergePolicy::Merge => existing.value.merge(message.value),
            },
            None => self.messages.push(message),
        }
    }

    /// Merge a later state into this one, message by message.
    pub fn merge(&mut self, other: State) {
        for message in other.messages {
            self.insert(message);
        }
    }

    pub fn get(&self, address: &Address) -> Option<&Message> {
        self.messages.iter().find(|m| &m.address == address)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl From<Message> for State {
    fn from(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

impl FromIterator<Message> for State {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        let mut state = State::new();
        for message in iter {
            state.insert(message);
        }
        state
    }
}

impl IntoIterator for State {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_replaces_in_place() {
        let mut state = State::new();
        state.insert(Message::new("/a", 1.0));
        state.insert(Message::new("/b", 2.0));
        state.insert(Message::new("/a", 3.0));

        assert_eq!(state.len(), 2);
        assert_eq!(state.messages()[0], Message::new("/a", 3.0));
        assert_eq!(state.messages()[1], Message::new("/b", 2.0));
    }

    #[test]
    fn test_merge_policy_concatenates_lists() {
        let mut state = State::new();
        state.insert(Message::new("/l", vec![Value::Int(1)]));
        state.insert(Message::merging("/l", vec![Value::Int(2)]));

        assert_eq!(
            state.get(&Address::from("/l")).map(|m| m.value.clone()),
            Some(Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn test_merge_states_keeps_declaration_order() {
        let first: State = vec![Message::new("/x", 1), Message::new("/y", 1)]
            .into_iter()
            .collect();
        let second: State = vec![Message::new("/z", 2), Message::new("/x", 2)]
            .into_iter()
            .collect();

        let mut merged = first;
        merged.merge(second);

        let order: Vec<&str> = merged.iter().map(|m| m.address.as_str()).collect();
        assert_eq!(order, vec!["/x", "/y", "/z"]);
        assert_eq!(merged.messages()[0].value, Value::Int(2));
    }
}
