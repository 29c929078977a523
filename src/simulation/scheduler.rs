//! Periodic tick driver

use super::events::{CycleReport, EventSink};
use super::reconcile::RenderAdapter;
use super::session::{Simulation, TickOutcome};
use crate::game_of_life::{CellCounts, Dimensions};
use serde::Serialize;
use std::time::Duration;

/// What a scheduled run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub dimensions: Dimensions,
    pub ticks_executed: usize,
    pub ticks_skipped: usize,
    pub final_counts: CellCounts,
    pub reports: Vec<CycleReport>,
}

/// Runs ticks one after another at a fixed interval. A tick always completes,
/// renderer hand-off included, before the next one is considered.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    interval: Duration,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run up to `slots` tick slots while the simulation is running
    pub fn run<S, R>(&self, simulation: &mut Simulation<S>, adapter: &mut R, slots: usize) -> RunSummary
    where
        S: EventSink,
        R: RenderAdapter + ?Sized,
    {
        self.run_with(simulation, adapter, slots, |_| {})
    }

    /// Like `run`, calling `on_tick` after every slot
    pub fn run_with<S, R, F>(
        &self,
        simulation: &mut Simulation<S>,
        adapter: &mut R,
        slots: usize,
        mut on_tick: F,
    ) -> RunSummary
    where
        S: EventSink,
        R: RenderAdapter + ?Sized,
        F: FnMut(&TickOutcome),
    {
        let mut reports = Vec::new();
        let mut skipped = 0;

        for slot in 0..slots {
            if !simulation.is_running() {
                log::debug!("simulation stopped, ending run after {} slot(s)", slot);
                break;
            }

            let outcome = simulation.tick(adapter);
            on_tick(&outcome);
            match outcome {
                TickOutcome::Ticked(report) => reports.push(report),
                TickOutcome::Skipped { .. } => skipped += 1,
            }

            if !self.interval.is_zero() && slot + 1 < slots {
                std::thread::sleep(self.interval);
            }
        }

        RunSummary {
            dimensions: simulation.dimensions(),
            ticks_executed: reports.len(),
            ticks_skipped: skipped,
            final_counts: simulation.cell_counts(),
            reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::Coord;
    use crate::simulation::events::NullSink;
    use crate::simulation::reconcile::{RenderDelta, VisualRegistry};

    /// Busy on every other poll
    struct FlakyAdapter {
        polls: std::cell::Cell<usize>,
    }

    impl RenderAdapter for FlakyAdapter {
        fn apply(&mut self, _delta: &RenderDelta) {}

        fn is_busy(&self) -> bool {
            let n = self.polls.get();
            self.polls.set(n + 1);
            n % 2 == 1
        }
    }

    #[test]
    fn test_run_requires_started_simulation() {
        let mut sim = Simulation::new(Dimensions::cube(4), NullSink).unwrap();
        let summary = TickScheduler::from_millis(0).run(&mut sim, &mut VisualRegistry::new(), 5);
        assert_eq!(summary.ticks_executed, 0);
        assert_eq!(sim.cycle(), 0);
    }

    #[test]
    fn test_run_counts_ticks() {
        let mut sim = Simulation::with_seed(Dimensions::cube(5), Some(1), NullSink).unwrap();
        sim.randomize(0.3);
        sim.start();

        let mut seen = 0;
        let summary = TickScheduler::from_millis(0).run_with(
            &mut sim,
            &mut VisualRegistry::new(),
            4,
            |_| seen += 1,
        );

        assert_eq!(seen, 4);
        assert_eq!(summary.ticks_executed, 4);
        assert_eq!(summary.ticks_skipped, 0);
        assert_eq!(
            summary.reports.iter().map(|r| r.cycle).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        assert_eq!(sim.cycle(), 4);
        assert_eq!(summary.final_counts, sim.cell_counts());
    }

    #[test]
    fn test_busy_slots_are_skipped() {
        let mut sim = Simulation::new(Dimensions::cube(3), NullSink).unwrap();
        sim.set_cell_state(Coord::new(1, 1, 1), true);
        sim.start();

        let mut adapter = FlakyAdapter { polls: std::cell::Cell::new(0) };
        let summary = TickScheduler::from_millis(0).run(&mut sim, &mut adapter, 4);

        assert_eq!(summary.ticks_executed, 2);
        assert_eq!(summary.ticks_skipped, 2);
        assert_eq!(sim.cycle(), 2);
    }
}
