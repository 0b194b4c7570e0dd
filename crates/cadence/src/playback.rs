//! Playback engine
//!
//! Owns the root scenario and the device it drives. Each `tick` reads the
//! device through the scenario's guards and mappings, advances the score,
//! and applies the merged state to the device exactly once.

use tracing::{debug, info};

use crate::device::{ParameterSink, ParameterSource};
use crate::error::Result;
use crate::event::EventId;
use crate::scenario::{Scenario, TransportState};
use crate::state::State;
use crate::time_value::TimeValue;

/// Drives a root scenario against a device
pub struct PlaybackEngine<D> {
    scenario: Scenario,
    device: D,
    ticks: u64,
    elapsed: TimeValue,
}

impl<D: ParameterSource + ParameterSink> PlaybackEngine<D> {
    pub fn new(scenario: Scenario, device: D) -> Self {
        Self {
            scenario,
            device,
            ticks: 0,
            elapsed: TimeValue::ZERO,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn scenario_mut(&mut self) -> &mut Scenario {
        &mut self.scenario
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_parts(self) -> (Scenario, D) {
        (self.scenario, self.device)
    }

    /// Start, restart after stop, or resume after pause
    pub fn play(&mut self) {
        match self.scenario.transport() {
            TransportState::Idle => self.scenario.start(),
            TransportState::Stopped => {
                self.ticks = 0;
                self.elapsed = TimeValue::ZERO;
                self.scenario.start();
            }
            TransportState::Paused => self.scenario.resume(),
            TransportState::Playing => {}
        }
        info!(ticks = self.ticks, "playback running");
    }

    pub fn pause(&mut self) {
        self.scenario.pause();
    }

    pub fn stop(&mut self) {
        self.scenario.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.scenario.transport() == TransportState::Playing
    }

    /// Ticks processed while playing
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Score time covered by processed ticks
    pub fn elapsed(&self) -> TimeValue {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.scenario.is_finished()
    }

    /// Advance by `delta` and apply the resulting state to the device
    pub fn tick(&mut self, delta: TimeValue) -> State {
        if !self.is_playing() {
            return State::new();
        }
        let state = self.scenario.advance(delta, &self.device);
        self.device.apply(&state);
        self.ticks += 1;
        self.elapsed += delta;
        if !state.is_empty() {
            debug!(tick = self.ticks, messages = state.len(), "state applied");
        }
        state
    }

    pub fn trigger(&mut self, event: EventId) -> Result<()> {
        self.scenario.trigger(event)
    }

    /// Reset the score; the device keeps its values
    pub fn reset(&mut self) {
        self.scenario.reset();
        self.ticks = 0;
        self.elapsed = TimeValue::ZERO;
    }
}
