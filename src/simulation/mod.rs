//! Simulation session, render reconciliation and event sinks

pub mod events;
pub mod reconcile;
pub mod scheduler;
pub mod session;

pub use events::{CycleReport, EventSink, LogSink, MessageBuffer, NullSink, SimEvent};
pub use reconcile::{Reconciler, RenderAdapter, RenderDelta, VisualHandle, VisualRegistry};
pub use scheduler::{RunSummary, TickScheduler};
pub use session::{Simulation, TickOutcome, DEFAULT_ALIVE_PROBABILITY};
