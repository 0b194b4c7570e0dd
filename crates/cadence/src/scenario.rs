//! Scenario graph and tick algorithm
//!
//! Time syncs are the nodes of a petgraph `StableGraph` and time intervals are
//! its edges, each edge remembering which event of its source sync starts it
//! and which event of its target sync ends it. Ids map to graph indices the
//! way the audio graph maps node uuids, so removals never invalidate them.
//!
//! `advance(delta)` runs one tick:
//! 1. intervals that are playing (or became pending) move forward, in
//!    declaration order, and their states merge into the tick's state;
//! 2. waiting events whose previous intervals all agree to end become pending;
//! 3. syncs pick the events to fire; firing stops the previous intervals and
//!    schedules the next ones, which get the rest of the tick on the next pass.
//!
//! Passes repeat until nothing fires, so one tick can cross several syncs.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::device::ParameterSource;
use crate::error::{Result, ScoreError};
use crate::event::{EventId, EventStatus, TimeEvent};
use crate::expression::Expression;
use crate::interval::{IntervalId, IntervalStatus, TimeInterval};
use crate::process::{Process, ProcessContext, TimeProcess};
use crate::state::State;
use crate::sync::{SyncId, TimeSync, TriggerMode};
use crate::time_value::TimeValue;

/// Transport state of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// Never started since creation or reset
    #[default]
    Idle,
    Playing,
    Paused,
    Stopped,
}

/// Edge weight: an interval and the events it connects
#[derive(Debug)]
struct Span {
    start: EventId,
    end: EventId,
    interval: TimeInterval,
}

/// A graph of time syncs connected by time intervals
#[derive(Debug)]
pub struct Scenario {
    graph: StableGraph<TimeSync, Span>,
    syncs: HashMap<SyncId, NodeIndex>,
    sync_order: Vec<SyncId>,
    events: HashMap<EventId, SyncId>,
    intervals: HashMap<IntervalId, EdgeIndex>,
    order: Vec<IntervalId>,
    start_sync: SyncId,
    end_sync: SyncId,
    default_mode: TriggerMode,
    transport: TransportState,
    date: TimeValue,
    tick: u64,
    last_state: State,
}

impl Scenario {
    /// Empty scenario with its start and end syncs
    pub fn new() -> Self {
        let mut graph = StableGraph::new();
        let start = TimeSync::new(TriggerMode::Observed);
        let end = TimeSync::new(TriggerMode::Observed);
        let (start_sync, end_sync) = (start.id(), end.id());

        let mut events = HashMap::new();
        for event in start.event_ids() {
            events.insert(event, start_sync);
        }
        for event in end.event_ids() {
            events.insert(event, end_sync);
        }

        let mut syncs = HashMap::new();
        syncs.insert(start_sync, graph.add_node(start));
        syncs.insert(end_sync, graph.add_node(end));

        Self {
            graph,
            syncs,
            sync_order: vec![start_sync, end_sync],
            events,
            intervals: HashMap::new(),
            order: Vec::new(),
            start_sync,
            end_sync,
            default_mode: TriggerMode::Observed,
            transport: TransportState::Idle,
            date: TimeValue::ZERO,
            tick: 0,
            last_state: State::new(),
        }
    }

    /// Trigger mode given to syncs added from now on
    pub fn set_default_trigger_mode(&mut self, mode: TriggerMode) {
        self.default_mode = mode;
    }

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    pub fn add_sync(&mut self) -> SyncId {
        self.add_sync_with(self.default_mode)
    }

    pub fn add_sync_with(&mut self, mode: TriggerMode) -> SyncId {
        let sync = TimeSync::new(mode);
        let id = sync.id();
        for event in sync.event_ids() {
            self.events.insert(event, id);
        }
        let node = self.graph.add_node(sync);
        self.syncs.insert(id, node);
        self.sync_order.push(id);
        debug!(sync = %id, mode = ?mode, "sync added");
        id
    }

    /// Add another event to a sync
    pub fn add_event(&mut self, sync: SyncId) -> Result<EventId> {
        let node = self.node(sync)?;
        let event = self
            .graph
            .node_weight_mut(node)
            .map(|s| s.add_event())
            .ok_or(ScoreError::UnknownSync(sync))?;
        self.events.insert(event, sync);
        Ok(event)
    }

    pub fn set_guard(&mut self, event: EventId, guard: impl Into<Expression>) -> Result<()> {
        self.event_mut(event)?.set_guard(Some(guard.into()));
        Ok(())
    }

    pub fn clear_guard(&mut self, event: EventId) -> Result<()> {
        self.event_mut(event)?.set_guard(None);
        Ok(())
    }

    /// Observe every status transition of an event
    pub fn set_event_callback(
        &mut self,
        event: EventId,
        callback: impl FnMut(EventId, EventStatus) + Send + 'static,
    ) -> Result<()> {
        self.event_mut(event)?.set_callback(Some(Box::new(callback)));
        Ok(())
    }

    pub fn set_trigger_mode(&mut self, sync: SyncId, mode: TriggerMode) -> Result<()> {
        let node = self.node(sync)?;
        if let Some(sync) = self.graph.node_weight_mut(node) {
            sync.set_mode(mode);
        }
        Ok(())
    }

    /// Place `interval` between two events.
    ///
    /// Rejects an interval whose endpoints share an event or a sync, and one
    /// that would close a cycle between syncs.
    pub fn add_interval(
        &mut self,
        start: EventId,
        end: EventId,
        interval: TimeInterval,
    ) -> Result<IntervalId> {
        if start == end {
            return Err(ScoreError::SelfReference);
        }
        let start_sync = self.sync_of(start).ok_or(ScoreError::UnknownEvent(start))?;
        let end_sync = self.sync_of(end).ok_or(ScoreError::UnknownEvent(end))?;
        if start_sync == end_sync {
            return Err(ScoreError::SelfReference);
        }
        let a = self.node(start_sync)?;
        let b = self.node(end_sync)?;

        let id = interval.id();
        let edge = self.graph.add_edge(a, b, Span {
            start,
            end,
            interval,
        });
        if is_cyclic_directed(&self.graph) {
            self.graph.remove_edge(edge);
            return Err(ScoreError::Cycle);
        }

        self.intervals.insert(id, edge);
        self.order.push(id);
        debug!(interval = %id, from = %start_sync, to = %end_sync, "interval added");
        Ok(id)
    }

    /// Place `interval` between the first events of two syncs
    pub fn connect(&mut self, from: SyncId, to: SyncId, interval: TimeInterval) -> Result<IntervalId> {
        let start = self
            .sync(from)
            .and_then(|s| s.main_event())
            .ok_or(ScoreError::UnknownSync(from))?;
        let end = self
            .sync(to)
            .and_then(|s| s.main_event())
            .ok_or(ScoreError::UnknownSync(to))?;
        self.add_interval(start, end, interval)
    }

    pub fn add_process(&mut self, interval: IntervalId, process: impl Into<TimeProcess>) -> Result<()> {
        self.interval_mut(interval)?.add_process(process)
    }

    pub fn set_bounds(&mut self, interval: IntervalId, min: TimeValue, max: TimeValue) -> Result<()> {
        self.interval_mut(interval)?.set_bounds(min, max)
    }

    // =========================================================================
    // DISPOSAL
    // =========================================================================

    /// Stop and remove an interval
    pub fn remove_interval(&mut self, id: IntervalId) -> Result<TimeInterval> {
        let edge = self
            .intervals
            .remove(&id)
            .ok_or(ScoreError::UnknownInterval(id))?;
        self.order.retain(|i| *i != id);

        let mut span = self
            .graph
            .remove_edge(edge)
            .ok_or_else(|| ScoreError::Integrity(format!("{} has no edge", id)))?;
        span.interval.stop();
        info!(interval = %id, "interval removed");
        Ok(span.interval)
    }

    /// Dispose an event, removing every interval attached to it first.
    ///
    /// A sync left without events is removed as well.
    pub fn remove_event(&mut self, id: EventId) -> Result<()> {
        let sync_id = self.sync_of(id).ok_or(ScoreError::UnknownEvent(id))?;
        let node = self.node(sync_id)?;

        let attached: Vec<IntervalId> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .chain(self.graph.edges_directed(node, Direction::Outgoing))
            .filter(|e| e.weight().start == id || e.weight().end == id)
            .map(|e| e.weight().interval.id())
            .collect();
        for interval in &attached {
            self.remove_interval(*interval)?;
        }

        let sync = self
            .graph
            .node_weight_mut(node)
            .ok_or(ScoreError::UnknownSync(sync_id))?;
        let mut event = sync
            .take_event(id)
            .ok_or_else(|| ScoreError::Integrity(format!("{} missing from {}", id, sync_id)))?;
        event.dispose();
        let sync_empty = sync.events().is_empty();
        self.events.remove(&id);
        info!(event = %id, intervals = attached.len(), "event disposed");

        if sync_empty {
            self.graph.remove_node(node);
            self.syncs.remove(&sync_id);
            self.sync_order.retain(|s| *s != sync_id);
            info!(sync = %sync_id, "sync removed");
        }
        Ok(())
    }

    /// Dispose every event of a sync, then the sync itself
    pub fn remove_sync(&mut self, id: SyncId) -> Result<()> {
        let events = self.sync(id).ok_or(ScoreError::UnknownSync(id))?.event_ids();
        for event in events {
            self.remove_event(event)?;
        }
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn start_sync(&self) -> SyncId {
        self.start_sync
    }

    pub fn end_sync(&self) -> SyncId {
        self.end_sync
    }

    pub fn start_event(&self) -> Option<EventId> {
        self.sync(self.start_sync).and_then(|s| s.main_event())
    }

    pub fn end_event(&self) -> Option<EventId> {
        self.sync(self.end_sync).and_then(|s| s.main_event())
    }

    pub fn sync(&self, id: SyncId) -> Option<&TimeSync> {
        let node = self.syncs.get(&id)?;
        self.graph.node_weight(*node)
    }

    pub fn sync_of(&self, event: EventId) -> Option<SyncId> {
        self.events.get(&event).copied()
    }

    pub fn event(&self, id: EventId) -> Option<&TimeEvent> {
        self.sync(self.sync_of(id)?)?.event(id)
    }

    /// Status of an event; removed or unknown events report DISPOSED
    pub fn event_status(&self, id: EventId) -> EventStatus {
        self.event(id)
            .map(|e| e.status())
            .unwrap_or(EventStatus::Disposed)
    }

    pub fn interval(&self, id: IntervalId) -> Option<&TimeInterval> {
        let edge = self.intervals.get(&id)?;
        self.graph.edge_weight(*edge).map(|span| &span.interval)
    }

    /// Processes of an interval, e.g. to reach a nested scenario
    pub fn processes_mut(&mut self, id: IntervalId) -> Option<&mut [TimeProcess]> {
        self.interval_mut(id).ok().map(|i| i.processes_mut())
    }

    /// Start and end events of an interval
    pub fn endpoints(&self, id: IntervalId) -> Option<(EventId, EventId)> {
        let edge = self.intervals.get(&id)?;
        self.graph.edge_weight(*edge).map(|span| (span.start, span.end))
    }

    /// Intervals ending at `event`, in declaration order
    pub fn previous_intervals(&self, event: EventId) -> Vec<IntervalId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.endpoints(*id).is_some_and(|(_, end)| end == event))
            .collect()
    }

    /// Intervals starting at `event`, in declaration order
    pub fn next_intervals(&self, event: EventId) -> Vec<IntervalId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.endpoints(*id).is_some_and(|(start, _)| start == event))
            .collect()
    }

    pub fn sync_ids(&self) -> &[SyncId] {
        &self.sync_order
    }

    pub fn interval_ids(&self) -> &[IntervalId] {
        &self.order
    }

    pub fn sync_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn interval_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Current date relative to the scenario start
    pub fn date(&self) -> TimeValue {
        self.date
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    /// State produced by the last tick
    pub fn last_state(&self) -> &State {
        &self.last_state
    }

    /// The end sync has executed
    pub fn is_finished(&self) -> bool {
        self.sync(self.end_sync).is_some_and(|s| s.is_executed())
    }

    /// Check that ids, graph edges and sync membership agree
    pub fn validate(&self) -> Result<()> {
        if self.order.len() != self.intervals.len() {
            return Err(ScoreError::Integrity(format!(
                "{} intervals indexed, {} ordered",
                self.intervals.len(),
                self.order.len()
            )));
        }
        for (&id, &edge) in &self.intervals {
            let (a, b) = self
                .graph
                .edge_endpoints(edge)
                .ok_or_else(|| ScoreError::Integrity(format!("{} has no edge", id)))?;
            let span = self
                .graph
                .edge_weight(edge)
                .ok_or_else(|| ScoreError::Integrity(format!("{} has no edge", id)))?;
            if span.interval.id() != id {
                return Err(ScoreError::Integrity(format!("{} indexes another interval", id)));
            }
            for (event, node) in [(span.start, a), (span.end, b)] {
                let owner = self
                    .sync_of(event)
                    .and_then(|s| self.syncs.get(&s))
                    .ok_or_else(|| {
                        ScoreError::Integrity(format!("{} attached to disposed {}", id, event))
                    })?;
                if *owner != node {
                    return Err(ScoreError::Integrity(format!(
                        "{} edge does not match the sync of {}",
                        id, event
                    )));
                }
            }
        }
        for (&event, &sync) in &self.events {
            if self.sync(sync).and_then(|s| s.event(event)).is_none() {
                return Err(ScoreError::Integrity(format!("{} not owned by {}", event, sync)));
            }
        }
        if is_cyclic_directed(&self.graph) {
            return Err(ScoreError::Integrity("cycle between syncs".to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    /// Make the start sync's events pending. A stopped scenario is reset first.
    pub fn start(&mut self) {
        match self.transport {
            TransportState::Idle => {}
            TransportState::Stopped => self.reset(),
            TransportState::Playing | TransportState::Paused => return,
        }
        self.transport = TransportState::Playing;
        if let Some(node) = self.syncs.get(&self.start_sync) {
            if let Some(sync) = self.graph.node_weight_mut(*node) {
                for event in sync.events_mut() {
                    event.make_pending();
                }
            }
        }
        info!(syncs = self.sync_count(), intervals = self.interval_count(), "scenario started");
    }

    /// Stop every interval that has not ended yet
    pub fn stop(&mut self) {
        if self.transport == TransportState::Stopped {
            return;
        }
        self.transport = TransportState::Stopped;
        let edges: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for edge in edges {
            let Some(span) = self.graph.edge_weight_mut(edge) else {
                continue;
            };
            if matches!(
                span.interval.status(),
                IntervalStatus::Pending | IntervalStatus::Playing | IntervalStatus::Paused
            ) {
                span.interval.stop();
            }
        }
        info!(date = %self.date, "scenario stopped");
    }

    pub fn pause(&mut self) {
        if self.transport == TransportState::Playing {
            self.transport = TransportState::Paused;
            debug!(date = %self.date, "scenario paused");
        }
    }

    pub fn resume(&mut self) {
        if self.transport == TransportState::Paused {
            self.transport = TransportState::Playing;
            debug!(date = %self.date, "scenario resumed");
        }
    }

    pub fn pause_interval(&mut self, id: IntervalId) -> Result<bool> {
        Ok(self.interval_mut(id)?.pause())
    }

    pub fn resume_interval(&mut self, id: IntervalId) -> Result<bool> {
        Ok(self.interval_mut(id)?.resume())
    }

    /// Seek a running interval, clamped to `[0, max]`
    pub fn offset_interval(&mut self, id: IntervalId, position: TimeValue) -> Result<bool> {
        Ok(self.interval_mut(id)?.offset(position))
    }

    /// Fire a pending event now, whatever its sync's trigger mode
    pub fn trigger(&mut self, event: EventId) -> Result<()> {
        let sync = self.sync_of(event).ok_or(ScoreError::UnknownEvent(event))?;
        let node = self.node(sync)?;
        if self.event_status(event) != EventStatus::Pending || !self.end_allowed(node, event) {
            return Err(ScoreError::NotPending(event));
        }
        self.fire(node, event);
        Ok(())
    }

    /// Back to the state right after construction
    pub fn reset(&mut self) {
        let nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        for node in nodes {
            if let Some(sync) = self.graph.node_weight_mut(node) {
                sync.reset();
            }
        }
        let edges: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for edge in edges {
            if let Some(span) = self.graph.edge_weight_mut(edge) {
                span.interval.reset();
            }
        }
        self.transport = TransportState::Idle;
        self.date = TimeValue::ZERO;
        self.tick = 0;
        self.last_state.clear();
        info!("scenario reset");
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advance the scenario by `delta` and return the merged state.
    ///
    /// An idle scenario starts on its first advance. Paused and stopped
    /// scenarios produce nothing.
    pub fn advance(&mut self, delta: TimeValue, source: &dyn ParameterSource) -> State {
        if delta.is_infinite() {
            warn!("ignoring infinite tick delta");
            return State::new();
        }
        match self.transport {
            TransportState::Idle => self.start(),
            TransportState::Playing => {}
            TransportState::Paused | TransportState::Stopped => return State::new(),
        }

        self.tick += 1;
        let tick_start = self.date;
        let tick_end = self.date + delta;
        let mut state = State::new();
        let mut advanced: HashSet<IntervalId> = HashSet::new();

        loop {
            for id in self.order.clone() {
                if advanced.contains(&id) {
                    continue;
                }
                let Some(span) = self
                    .intervals
                    .get(&id)
                    .and_then(|edge| self.graph.edge_weight_mut(*edge))
                else {
                    continue;
                };
                let interval = &mut span.interval;
                let budget = match interval.status() {
                    IntervalStatus::Pending => {
                        let from = interval.date().unwrap_or(tick_start).max(tick_start);
                        interval.start();
                        tick_end - from
                    }
                    IntervalStatus::Playing => delta,
                    _ => continue,
                };
                advanced.insert(id);
                let (_, produced) = interval.advance(budget, source);
                state.merge(produced);
            }

            let (deadlines, held) = self.refresh_pending();
            if self.fire_ready(source, &deadlines, &held) == 0 {
                break;
            }
        }

        self.date = tick_end;
        self.last_state = state.clone();
        state
    }

    /// Move waiting events to PENDING.
    ///
    /// Returns the events forced by a deadline, and the pending events held
    /// back because a previous interval was paused or sought below its min.
    fn refresh_pending(&mut self) -> (HashSet<EventId>, HashSet<EventId>) {
        let mut ready = Vec::new();
        let mut deadlines = HashSet::new();
        let mut held = HashSet::new();

        for node in self.graph.node_indices() {
            let Some(sync) = self.graph.node_weight(node) else {
                continue;
            };
            for event in sync.events() {
                if !matches!(event.status(), EventStatus::Waiting | EventStatus::Pending) {
                    continue;
                }
                let previous: Vec<&TimeInterval> = self
                    .graph
                    .edges_directed(node, Direction::Incoming)
                    .filter(|e| e.weight().end == event.id())
                    .map(|e| &e.weight().interval)
                    .collect();
                if previous.is_empty() {
                    continue;
                }

                let min_reached = previous
                    .iter()
                    .all(|i| i.status() == IntervalStatus::Playing && i.min_reached());
                let forced = min_reached && previous.iter().any(|i| i.at_deadline());
                if forced {
                    deadlines.insert(event.id());
                }
                if event.status() == EventStatus::Pending && !min_reached {
                    held.insert(event.id());
                }
                if event.status() == EventStatus::Waiting
                    && (forced || previous.iter().all(|i| i.end_ready()))
                {
                    ready.push((node, event.id()));
                }
            }
        }

        for (node, id) in ready {
            if let Some(event) = self
                .graph
                .node_weight_mut(node)
                .and_then(|s| s.event_mut(id))
            {
                event.make_pending();
            }
        }
        (deadlines, held)
    }

    /// Let every sync, in declaration order, fire what it selects
    fn fire_ready(
        &mut self,
        source: &dyn ParameterSource,
        deadlines: &HashSet<EventId>,
        held: &HashSet<EventId>,
    ) -> usize {
        let mut fired = 0;
        for id in self.sync_order.clone() {
            let Some(&node) = self.syncs.get(&id) else {
                continue;
            };
            let chosen = match self.graph.node_weight_mut(node) {
                Some(sync) => sync.select(self.tick, source, deadlines, held),
                None => continue,
            };
            for event in chosen {
                self.fire(node, event);
                fired += 1;
            }
        }
        fired
    }

    /// PENDING -> HAPPENED, then stop previous intervals and schedule next ones
    fn fire(&mut self, node: NodeIndex, event: EventId) {
        let previous: Vec<EdgeIndex> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter(|e| e.weight().end == event)
            .map(|e| e.id())
            .collect();
        let next: Vec<EdgeIndex> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|e| e.weight().start == event)
            .map(|e| e.id())
            .collect();

        let date = previous
            .iter()
            .filter_map(|edge| self.graph.edge_weight(*edge))
            .filter_map(|span| span.interval.date().map(|d| d + span.interval.position()))
            .max()
            .unwrap_or(self.date);

        let Some(sync) = self.graph.node_weight_mut(node) else {
            return;
        };
        let happened = sync.event_mut(event).is_some_and(|e| e.happen(date));
        if !happened {
            return;
        }
        debug!(event = %event, date = %date, "event happened");
        sync.try_execute();

        for edge in previous {
            if let Some(span) = self.graph.edge_weight_mut(edge) {
                span.interval.stop();
            }
        }
        for edge in next {
            if let Some(span) = self.graph.edge_weight_mut(edge) {
                span.interval.schedule(date);
            }
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Every interval ending at `event` is playing and past its min
    fn end_allowed(&self, node: NodeIndex, event: EventId) -> bool {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .filter(|e| e.weight().end == event)
            .all(|e| {
                let interval = &e.weight().interval;
                interval.status() == IntervalStatus::Playing && interval.min_reached()
            })
    }

    fn node(&self, sync: SyncId) -> Result<NodeIndex> {
        self.syncs
            .get(&sync)
            .copied()
            .ok_or(ScoreError::UnknownSync(sync))
    }

    fn event_mut(&mut self, id: EventId) -> Result<&mut TimeEvent> {
        let sync = self.sync_of(id).ok_or(ScoreError::UnknownEvent(id))?;
        let node = self.node(sync)?;
        self.graph
            .node_weight_mut(node)
            .and_then(|s| s.event_mut(id))
            .ok_or(ScoreError::UnknownEvent(id))
    }

    fn interval_mut(&mut self, id: IntervalId) -> Result<&mut TimeInterval> {
        let edge = self
            .intervals
            .get(&id)
            .copied()
            .ok_or(ScoreError::UnknownInterval(id))?;
        self.graph
            .edge_weight_mut(edge)
            .map(|span| &mut span.interval)
            .ok_or(ScoreError::UnknownInterval(id))
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

/// A scenario nested in an interval ticks with the interval's consumed time
impl Process for Scenario {
    fn state_at(&self, _ctx: &ProcessContext<'_>) -> State {
        self.last_state.clone()
    }

    fn start(&mut self) {
        Scenario::start(self)
    }

    fn stop(&mut self) {
        Scenario::stop(self)
    }

    fn pause(&mut self) {
        Scenario::pause(self)
    }

    fn resume(&mut self) {
        Scenario::resume(self)
    }

    fn reset(&mut self) {
        Scenario::reset(self)
    }

    fn advance(&mut self, delta: TimeValue, source: &dyn ParameterSource) {
        Scenario::advance(self, delta, source);
    }
}
