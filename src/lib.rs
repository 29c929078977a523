//! 3D Game of Life
//!
//! A cellular automaton over a fixed X×Y×Z voxel grid using the 26-cell Moore
//! neighbourhood: live cells survive with 5 or 6 live neighbours, dead cells
//! are born with exactly 4.

pub mod config;
pub mod game_of_life;
pub mod simulation;
pub mod utils;

pub use config::Settings;
pub use game_of_life::{Coord, Dimensions, Grid, Step, TransitionEngine};
pub use simulation::{RunSummary, Simulation, TickScheduler};

use anyhow::Result;
use simulation::{LogSink, VisualRegistry};

/// Run a configured simulation to completion with an in-memory renderer
pub fn run_simulation(settings: &Settings) -> Result<RunSummary> {
    settings.validate()?;
    let mut session = Simulation::from_settings(settings, LogSink)?;
    let mut visuals = VisualRegistry::new();
    session.sync(&mut visuals);
    session.start();

    let scheduler = TickScheduler::from_millis(settings.simulation.tick_interval_ms);
    Ok(scheduler.run(&mut session, &mut visuals, settings.simulation.generations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialState;

    #[test]
    fn test_run_simulation() {
        let mut settings = Settings::default();
        settings.simulation.size = Dimensions::cube(5);
        settings.simulation.generations = 3;
        settings.simulation.tick_interval_ms = 0;
        settings.simulation.initial_state = InitialState::Random;
        settings.random.seed = Some(8);

        let first = run_simulation(&settings).unwrap();
        let second = run_simulation(&settings).unwrap();
        assert_eq!(first.ticks_executed, 3);
        assert_eq!(first.reports, second.reports);
    }
}
