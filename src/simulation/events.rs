//! Injectable sinks for simulation events

use crate::game_of_life::{CellCounts, CellEvent, Coord, Grid, LoadReport};
use crate::utils::display::GridFormatter;
use serde::Serialize;
use std::collections::VecDeque;

/// Default number of messages a `MessageBuffer` retains
pub const DEFAULT_MESSAGE_CAPACITY: usize = 10_000;

/// Everything that happened during one completed tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub dying: Vec<CellEvent>,
    pub born: Vec<CellEvent>,
    pub counts: CellCounts,
}

/// Something a simulation session reports to its sink
#[derive(Debug, Clone, Copy)]
pub enum SimEvent<'a> {
    Started,
    Stopped,
    Cleared,
    Randomized { probability: f64, grid: &'a Grid },
    PatternLoaded(&'a LoadReport),
    CellEdited { coord: Coord, alive: bool },
    CycleCompleted(&'a CycleReport),
    TickSkipped { cycle: u64 },
}

impl SimEvent<'_> {
    /// Human-readable lines, in the layout of the debug console
    pub fn messages(&self) -> Vec<String> {
        match self {
            SimEvent::Started => vec!["Simulation started".to_string()],
            SimEvent::Stopped => vec!["Simulation stopped".to_string()],
            SimEvent::Cleared => vec!["Grid cleared".to_string()],
            SimEvent::Randomized { grid, .. } => vec![
                "=== INITIAL GRID STATE ===".to_string(),
                GridFormatter::format_layers(grid),
                "=== END OF INITIAL STATE ===".to_string(),
            ],
            SimEvent::PatternLoaded(report) => {
                let mut lines = vec![format!(
                    "Pattern loaded: {} cell(s) applied, {} warning(s)",
                    report.applied,
                    report.warnings.len()
                )];
                lines.extend(report.warnings.iter().map(|w| format!("  ! {}", w)));
                lines
            }
            SimEvent::CellEdited { coord, alive } => vec![format!(
                "Cell at {} set {}",
                coord,
                if *alive { "alive" } else { "dead" }
            )],
            SimEvent::CycleCompleted(report) => cycle_messages(report),
            SimEvent::TickSkipped { cycle } => vec![format!(
                "Skipped tick for cycle {}: previous frame still rendering",
                cycle
            )],
        }
    }
}

fn cycle_messages(report: &CycleReport) -> Vec<String> {
    let mut lines = vec![format!("=== CYCLE {} ===", report.cycle)];

    if report.dying.is_empty() {
        lines.push("No cells dying this cycle".to_string());
    } else {
        lines.push(format!("DYING CELLS ({}):", report.dying.len()));
        lines.extend(report.dying.iter().map(|e| {
            format!("  • Cell at {} is dying with {} neighbors", e.coord, e.neighbors)
        }));
    }

    if report.born.is_empty() {
        lines.push("No new cells born this cycle".to_string());
    } else {
        lines.push(format!("NEW ALIVE CELLS ({}):", report.born.len()));
        lines.extend(report.born.iter().map(|e| {
            format!("  • Cell at {} is becoming alive with {} neighbors", e.coord, e.neighbors)
        }));
    }

    lines.push(format!("=== END OF CYCLE {} ===", report.cycle));
    lines
}

/// Receiver for simulation events
pub trait EventSink {
    fn record(&mut self, event: &SimEvent<'_>);

    /// Drop anything retained so far
    fn clear(&mut self) {}
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn record(&mut self, event: &SimEvent<'_>) {
        self.0.record(event);
        self.1.record(event);
    }

    fn clear(&mut self) {
        self.0.clear();
        self.1.clear();
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &SimEvent<'_>) {}
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: &SimEvent<'_>) {
        match event {
            SimEvent::CycleCompleted(report) => {
                log::info!(
                    "cycle {}: {} dying, {} born, {} alive",
                    report.cycle,
                    report.dying.len(),
                    report.born.len(),
                    report.counts.alive
                );
                for e in &report.dying {
                    log::debug!("cell {} dying with {} neighbors", e.coord, e.neighbors);
                }
                for e in &report.born {
                    log::debug!("cell {} becoming alive with {} neighbors", e.coord, e.neighbors);
                }
            }
            SimEvent::Randomized { probability, grid } => {
                log::info!(
                    "grid randomized with p={:.2}: {} of {} cells alive",
                    probability,
                    grid.alive_count(),
                    grid.total_cells()
                );
                log::trace!("initial state:\n{}", GridFormatter::format_layers(grid));
            }
            SimEvent::PatternLoaded(report) if !report.warnings.is_empty() => {
                log::warn!(
                    "pattern loaded with {} warning(s), {} cell(s) applied",
                    report.warnings.len(),
                    report.applied
                );
            }
            SimEvent::TickSkipped { .. } => {
                for line in event.messages() {
                    log::warn!("{}", line);
                }
            }
            _ => {
                for line in event.messages() {
                    log::info!("{}", line);
                }
            }
        }
    }
}

/// Bounded in-memory message log; the oldest messages are evicted first
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    messages: VecDeque<String>,
    capacity: usize,
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MESSAGE_CAPACITY)
    }
}

impl MessageBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All retained messages joined by newlines
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for message in &self.messages {
            out.push_str(message);
            out.push('\n');
        }
        out
    }
}

impl EventSink for MessageBuffer {
    fn record(&mut self, event: &SimEvent<'_>) {
        for line in event.messages() {
            self.push(line);
        }
    }

    fn clear(&mut self) {
        self.messages.clear();
    }
}
