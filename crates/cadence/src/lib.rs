//! Cadence: Interactive Score Engine
//!
//! A temporal execution engine for non-linear scores. A score is a graph of
//! time syncs joined by time intervals; intervals run processes (automations,
//! mappings, loops and nested scenarios) that emit parameter messages for an
//! external device. Timing reacts to live conditions through guard
//! expressions on time events instead of following a fixed timeline.
//!
//! The engine is driven explicitly:
//!
//! - **Scenario**: owns the graph, `advance(delta, source)` runs one tick
//! - **PlaybackEngine**: pairs a root scenario with a device, reads and applies once per tick
//! - **TickClock**: turns wall time into tick deltas for a driver loop

pub mod curve;
pub mod device;
pub mod error;
pub mod event;
pub mod expression;
pub mod interval;
pub mod playback;
pub mod process;
pub mod scenario;
pub mod state;
pub mod sync;
pub mod tick_clock;
pub mod time_value;
pub mod value;

pub use curve::{Curve, CurvePoint, CurveType};
pub use device::{Address, MemoryDevice, NoParameters, ParameterSink, ParameterSource};
pub use error::{Result, ScoreError};
pub use event::{EventId, EventStatus, StatusCallback, TimeEvent};
pub use expression::{Comparator, Expr, Expression, Operand};
pub use interval::{IntervalId, IntervalStatus, TimeInterval};
pub use playback::PlaybackEngine;
pub use process::{Automation, Loop, Mapping, Process, ProcessContext, TimeProcess, Transfer};
pub use scenario::{Scenario, TransportState};
pub use state::{MergePolicy, Message, State};
pub use sync::{SyncId, TimeSync, TriggerMode};
pub use tick_clock::TickClock;
pub use time_value::TimeValue;
pub use value::Value;
