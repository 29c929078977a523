//! A single simulation session: one grid, its cycle counter and its sinks

use super::events::{CycleReport, EventSink, LogSink, SimEvent};
use super::reconcile::{Reconciler, RenderAdapter, RenderDelta};
use crate::config::{InitialState, Settings};
use crate::game_of_life::{
    builtin_pattern, CellCounts, Coord, Dimensions, Grid, GridError, LoadReport, PatternError,
    PatternLoader, TransitionEngine,
};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

/// Default probability used by `randomize`
pub const DEFAULT_ALIVE_PROBABILITY: f64 = 0.5;

/// What happened when a tick was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Ticked(CycleReport),
    /// The renderer had not finished the previous delta; nothing changed
    Skipped { cycle: u64 },
}

/// Owns the grid and drives it one generation at a time
pub struct Simulation<S: EventSink = LogSink> {
    grid: Grid,
    cycle: u64,
    running: bool,
    reconciler: Reconciler,
    rng: StdRng,
    sink: S,
}

impl<S: EventSink> Simulation<S> {
    /// Create a session with an all-dead grid and an entropy-seeded RNG
    pub fn new(dimensions: Dimensions, sink: S) -> Result<Self, GridError> {
        Self::with_seed(dimensions, None, sink)
    }

    /// Create a session; a fixed seed makes every `randomize` reproducible
    pub fn with_seed(dimensions: Dimensions, seed: Option<u64>, sink: S) -> Result<Self, GridError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            grid: Grid::new(dimensions)?,
            cycle: 0,
            running: false,
            reconciler: Reconciler::new(),
            rng,
            sink,
        })
    }

    /// Build a session from settings and put the grid in its configured initial state
    pub fn from_settings(settings: &Settings, sink: S) -> Result<Self> {
        let mut simulation = Self::with_seed(settings.simulation.size, settings.random.seed, sink)
            .context("Failed to create simulation grid")?;

        match settings.simulation.initial_state {
            InitialState::Empty => simulation.clear(),
            InitialState::Random => {
                simulation.randomize(settings.random.probability);
            }
            InitialState::Oscillator => {
                let pattern = builtin_pattern("oscillator")?;
                simulation.setup_pattern(pattern.cells);
            }
            InitialState::Pattern => {
                let path = settings
                    .input
                    .pattern_file
                    .as_ref()
                    .context("Initial state 'pattern' requires input.pattern_file")?;
                simulation.load_pattern_file(path)?;
            }
        }

        Ok(simulation)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    /// Number of completed ticks
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn cell_counts(&self) -> CellCounts {
        self.grid.cell_counts()
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.sink.record(&SimEvent::Started);
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.sink.record(&SimEvent::Stopped);
        }
    }

    /// Kill every cell and stop the schedule
    pub fn clear(&mut self) {
        self.stop();
        self.grid.clear();
        self.sink.record(&SimEvent::Cleared);
    }

    /// Re-roll every cell; returns how many came up alive
    pub fn randomize(&mut self, probability_alive: f64) -> usize {
        self.grid.randomize(probability_alive, &mut self.rng);
        self.sink.clear();
        self.sink.record(&SimEvent::Randomized {
            probability: probability_alive,
            grid: &self.grid,
        });
        self.grid.alive_count()
    }

    /// Replace the live set with the given cells
    pub fn setup_pattern(&mut self, cells: &[Coord]) -> LoadReport {
        let report = PatternLoader::apply_pattern(&mut self.grid, cells);
        self.sink.record(&SimEvent::PatternLoaded(&report));
        report
    }

    pub fn load_pattern_str(&mut self, content: &str) -> LoadReport {
        let report = PatternLoader::load_str(&mut self.grid, content);
        self.sink.record(&SimEvent::PatternLoaded(&report));
        report
    }

    /// Replace the live set with a pattern file. On a read failure the grid stays cleared.
    pub fn load_pattern_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport, PatternError> {
        let report = PatternLoader::load_file(&mut self.grid, path)?;
        self.sink.record(&SimEvent::PatternLoaded(&report));
        Ok(report)
    }

    /// Manual edit between ticks; out-of-range coordinates are ignored
    pub fn set_cell_state(&mut self, coord: Coord, alive: bool) -> bool {
        let applied = self.grid.set_coord(coord, alive);
        if applied {
            self.sink.record(&SimEvent::CellEdited { coord, alive });
        }
        applied
    }

    /// Bring the renderer in line with the current grid without stepping
    pub fn sync<R: RenderAdapter + ?Sized>(&mut self, adapter: &mut R) -> RenderDelta {
        let delta = self.reconciler.reconcile(&self.grid);
        if !delta.is_empty() {
            adapter.apply(&delta);
        }
        delta
    }

    /// Advance one generation, unless the renderer is still busy with the last one
    pub fn tick<R: RenderAdapter + ?Sized>(&mut self, adapter: &mut R) -> TickOutcome {
        if adapter.is_busy() {
            self.sink.record(&SimEvent::TickSkipped { cycle: self.cycle });
            return TickOutcome::Skipped { cycle: self.cycle };
        }

        let step = TransitionEngine::step(&self.grid);
        let report = CycleReport {
            cycle: self.cycle,
            dying: step.dying,
            born: step.born,
            counts: step.grid.cell_counts(),
        };

        // The successor is built from this grid, so dimensions always match
        if let Err(e) = self.grid.replace(step.grid) {
            log::error!("discarding successor grid: {}", e);
        }

        self.sync(adapter);
        self.sink.record(&SimEvent::CycleCompleted(&report));
        self.cycle += 1;

        TickOutcome::Ticked(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::events::MessageBuffer;
    use crate::simulation::reconcile::VisualRegistry;
    use tempfile::tempdir;

    struct BusyAdapter;

    impl RenderAdapter for BusyAdapter {
        fn apply(&mut self, _delta: &RenderDelta) {
            panic!("busy adapter should never receive a delta");
        }

        fn is_busy(&self) -> bool {
            true
        }
    }

    fn session(size: usize) -> Simulation<MessageBuffer> {
        Simulation::with_seed(Dimensions::cube(size), Some(42), MessageBuffer::default()).unwrap()
    }

    #[test]
    fn test_tick_lone_cell() {
        let mut sim = session(3);
        let mut registry = VisualRegistry::new();
        assert!(sim.set_cell_state(Coord::new(1, 1, 1), true));
        sim.sync(&mut registry);
        assert_eq!(registry.live_visuals(), 1);

        let outcome = sim.tick(&mut registry);
        let TickOutcome::Ticked(report) = outcome else {
            panic!("expected a completed tick");
        };
        assert_eq!(report.cycle, 0);
        assert_eq!(report.dying.len(), 1);
        assert_eq!(report.counts.alive, 0);
        assert_eq!(sim.cycle(), 1);
        assert!(sim.grid().is_empty());
        assert_eq!(registry.live_visuals(), 0);
    }

    #[test]
    fn test_busy_adapter_skips_tick() {
        let mut sim = session(3);
        sim.set_cell_state(Coord::new(1, 1, 1), true);

        let outcome = sim.tick(&mut BusyAdapter);
        assert_eq!(outcome, TickOutcome::Skipped { cycle: 0 });
        assert_eq!(sim.cycle(), 0);
        assert!(sim.grid().get(1, 1, 1));
        assert!(sim.sink().messages().any(|m| m.starts_with("Skipped tick")));
    }

    #[test]
    fn test_randomize_reproducible_with_seed() {
        let mut a = session(5);
        let mut b = session(5);
        assert_eq!(a.randomize(0.5), b.randomize(0.5));
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_randomize_resets_message_log() {
        let mut sim = session(3);
        sim.start();
        sim.stop();
        sim.randomize(DEFAULT_ALIVE_PROBABILITY);

        let first = sim.sink().messages().next().map(str::to_string);
        assert_eq!(first.as_deref(), Some("=== INITIAL GRID STATE ==="));
    }

    #[test]
    fn test_clear_stops_and_empties() {
        let mut sim = session(4);
        sim.randomize(1.0);
        sim.start();
        sim.clear();

        assert!(!sim.is_running());
        assert!(sim.grid().is_empty());
        assert_eq!(sim.cell_counts(), CellCounts { alive: 0, dead: 64 });
    }

    #[test]
    fn test_manual_edit_out_of_range_ignored() {
        let mut sim = session(3);
        assert!(!sim.set_cell_state(Coord::new(5, 0, 0), true));
        assert!(sim.grid().is_empty());
        assert!(sim.sink().is_empty());
    }

    #[test]
    fn test_pattern_loading() {
        let mut sim = session(10);
        let report = sim.load_pattern_str("1,1,1\n// comment\n\n99,0,0\n");
        assert_eq!(report.applied, 1);
        assert_eq!(report.warnings.len(), 1);

        let report = sim.setup_pattern(builtin_pattern("oscillator").unwrap().cells);
        assert_eq!(report.applied, 4);
        assert!(!sim.grid().get(1, 1, 1));

        let temp_dir = tempdir().unwrap();
        let err = sim.load_pattern_file(temp_dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, PatternError::Read { .. }));
        assert!(sim.grid().is_empty());
    }

    #[test]
    fn test_from_settings_initial_states() {
        let mut settings = Settings::default();
        settings.simulation.size = Dimensions::cube(10);
        settings.random.seed = Some(9);

        settings.simulation.initial_state = InitialState::Oscillator;
        let sim = Simulation::from_settings(&settings, MessageBuffer::default()).unwrap();
        assert_eq!(sim.grid().alive_count(), 4);

        settings.simulation.initial_state = InitialState::Empty;
        let sim = Simulation::from_settings(&settings, MessageBuffer::default()).unwrap();
        assert!(sim.grid().is_empty());

        settings.simulation.initial_state = InitialState::Pattern;
        settings.input.pattern_file = None;
        assert!(Simulation::from_settings(&settings, MessageBuffer::default()).is_err());

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("p.txt");
        std::fs::write(&path, "2,3,4\n").unwrap();
        settings.input.pattern_file = Some(path);
        let sim = Simulation::from_settings(&settings, MessageBuffer::default()).unwrap();
        assert!(sim.grid().get(2, 3, 4));
    }

    #[test]
    fn test_render_deltas_match_events() {
        let mut sim = session(6);
        let mut registry = VisualRegistry::new();
        sim.randomize(0.35);
        sim.sync(&mut registry);

        for _ in 0..3 {
            if let TickOutcome::Ticked(report) = sim.tick(&mut registry) {
                assert_eq!(registry.live_visuals(), report.counts.alive);
            }
        }
        assert_eq!(registry.live_visuals(), sim.grid().alive_count());
    }
}
