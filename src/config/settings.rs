//! Configuration settings for the 3D Life simulator

use crate::game_of_life::Dimensions;
use crate::simulation::events::DEFAULT_MESSAGE_CAPACITY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub random: RandomConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub size: Dimensions,
    pub generations: usize,
    pub tick_interval_ms: u64,
    pub initial_state: InitialState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    Random,
    Oscillator,
    Pattern,
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomConfig {
    pub probability: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub pattern_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_layers: bool,
    pub max_log_messages: usize,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                size: Dimensions::cube(10),
                generations: 20,
                tick_interval_ms: 1500,
                initial_state: InitialState::Random,
            },
            random: RandomConfig {
                probability: 0.5,
                seed: None,
            },
            input: InputConfig { pattern_file: None },
            output: OutputConfig {
                format: OutputFormat::Text,
                show_layers: false,
                max_log_messages: DEFAULT_MESSAGE_CAPACITY,
                output_directory: PathBuf::from("output/runs"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.simulation
            .size
            .validate()
            .context("Invalid simulation.size")?;

        if !(0.0..=1.0).contains(&self.random.probability) {
            anyhow::bail!(
                "Alive probability must be within [0, 1], got {}",
                self.random.probability
            );
        }

        if self.output.max_log_messages == 0 {
            anyhow::bail!("Maximum log messages must be positive");
        }

        if self.simulation.initial_state == InitialState::Pattern {
            match &self.input.pattern_file {
                None => anyhow::bail!("Initial state 'pattern' requires input.pattern_file"),
                Some(path) if !path.exists() => {
                    anyhow::bail!("Pattern file does not exist: {}", path.display())
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(size) = cli_overrides.size {
            self.simulation.size = size;
        }
        if let Some(generations) = cli_overrides.generations {
            self.simulation.generations = generations;
        }
        if let Some(interval) = cli_overrides.tick_interval_ms {
            self.simulation.tick_interval_ms = interval;
        }
        if let Some(ref pattern_file) = cli_overrides.pattern_file {
            self.input.pattern_file = Some(pattern_file.clone());
            self.simulation.initial_state = InitialState::Pattern;
        }
        if let Some(seed) = cli_overrides.seed {
            self.random.seed = Some(seed);
        }
        if let Some(probability) = cli_overrides.probability {
            self.random.probability = probability;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if cli_overrides.show_layers {
            self.output.show_layers = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub size: Option<Dimensions>,
    pub generations: Option<usize>,
    pub tick_interval_ms: Option<u64>,
    pub pattern_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub probability: Option<f64>,
    pub output_dir: Option<PathBuf>,
    pub show_layers: bool,
}
