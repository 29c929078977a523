//! Command line driver for the 3D Game of Life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_of_life_3d::{
    config::{CliOverrides, InitialState, Settings},
    game_of_life::{create_example_patterns, Dimensions, Grid, PatternLoader, TransitionEngine},
    simulation::{LogSink, MessageBuffer, Simulation, TickOutcome, TickScheduler, VisualRegistry},
    utils::{ColorOutput, GridFormatter, RunFormatter},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "game_of_life_3d")]
#[command(about = "3D cellular automaton simulator (B4/S56, 26-cell neighbourhood)")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Pattern file to start from (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Grid size as X,Y,Z (overrides config)
        #[arg(short, long, value_parser = parse_dimensions)]
        size: Option<Dimensions>,

        /// Number of generations (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Milliseconds between ticks (overrides config)
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// RNG seed for the random initial state (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Probability of a cell starting alive (overrides config)
        #[arg(long)]
        probability: Option<f64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full layer view of the initial and final grid
        #[arg(long)]
        show_layers: bool,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Load a pattern file and preview its first generation
    Inspect {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Pattern file
        #[arg(short, long)]
        pattern: PathBuf,

        /// Grid size as X,Y,Z (overrides config)
        #[arg(short, long, value_parser = parse_dimensions)]
        size: Option<Dimensions>,
    },
}

fn parse_dimensions(value: &str) -> Result<Dimensions, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let parsed: Vec<usize> = parts
        .iter()
        .map(|p| p.parse::<usize>().map_err(|e| format!("'{}': {}", p, e)))
        .collect::<Result<_, _>>()?;

    match parsed.as_slice() {
        [n] => Ok(Dimensions::cube(*n)),
        [x, y, z] => Ok(Dimensions::new(*x, *y, *z)),
        _ => Err("expected N or X,Y,Z".to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config, pattern, size, generations, interval_ms, seed, probability,
            output, show_layers,
        } => {
            let overrides = CliOverrides {
                size,
                generations,
                tick_interval_ms: interval_ms,
                pattern_file: pattern,
                seed,
                probability,
                output_dir: output,
                show_layers,
            };
            run_command(config, overrides, cli.verbose)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Inspect { config, pattern, size } => inspect_command(config, pattern, size),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Ok(Settings::default())
    }
}

fn run_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🧊 Starting 3D Game of Life"));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    if verbose {
        println!("Configuration:");
        println!("  Grid: {}", settings.simulation.size);
        println!("  Generations: {}", settings.simulation.generations);
        println!("  Tick interval: {}ms", settings.simulation.tick_interval_ms);
        println!("  Initial state: {:?}", settings.simulation.initial_state);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    let sink = (LogSink, MessageBuffer::with_capacity(settings.output.max_log_messages));
    let mut simulation = Simulation::from_settings(&settings, sink)
        .context("Failed to initialise simulation")?;

    if settings.simulation.initial_state == InitialState::Pattern {
        if let Some(report) = last_pattern_warnings(&simulation) {
            println!("{}", ColorOutput::warning(&report));
        }
    }

    if settings.output.show_layers {
        println!("Initial state:");
        println!("{}", GridFormatter::format_layers(simulation.grid()));
    }
    println!("{}\n", GridFormatter::format_counts(&simulation.cell_counts()));

    let mut visuals = VisualRegistry::new();
    simulation.sync(&mut visuals);
    simulation.start();

    let start_time = Instant::now();
    let scheduler = TickScheduler::from_millis(settings.simulation.tick_interval_ms);
    let summary = scheduler.run_with(
        &mut simulation,
        &mut visuals,
        settings.simulation.generations,
        |outcome| match outcome {
            TickOutcome::Ticked(report) => println!("{}", RunFormatter::format_cycle_line(report)),
            TickOutcome::Skipped { cycle } => println!("{}", ColorOutput::muted(&format!(
                "Cycle {:4} | skipped, renderer busy", cycle
            ))),
        },
    );
    simulation.stop();

    println!("\n{}", ColorOutput::success(&format!(
        "✅ Ran {} generation(s) in {:.3}s",
        summary.ticks_executed,
        start_time.elapsed().as_secs_f64()
    )));
    print!("{}", RunFormatter::format_summary(&summary));
    println!(
        "Visuals: {} live, {} created, {} destroyed",
        visuals.live_visuals(),
        visuals.total_created(),
        visuals.total_destroyed()
    );

    if settings.output.show_layers {
        println!("\nFinal state:");
        println!("{}", GridFormatter::format_layers(simulation.grid()));
    }

    let (_, log) = simulation.into_sink();
    let saved = RunFormatter::save_run(
        &summary,
        &log,
        &settings.output.output_directory,
        settings.output.format,
    )
    .context("Failed to save run output")?;
    println!("{}", ColorOutput::success(&format!("Run saved to {}", saved.display())));

    Ok(())
}

/// Warning lines from the most recent pattern load, if any were recorded
fn last_pattern_warnings(simulation: &Simulation<(LogSink, MessageBuffer)>) -> Option<String> {
    let warnings: Vec<&str> = simulation
        .sink()
        .1
        .messages()
        .filter(|m| m.starts_with("  ! "))
        .collect();

    if warnings.is_empty() {
        None
    } else {
        Some(format!("Pattern warnings:\n{}", warnings.join("\n")))
    }
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let pattern_dir = directory.join("input/patterns");
    let output_dir = directory.join("output/runs");

    for dir in [&config_dir, &pattern_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_patterns(&pattern_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", pattern_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut oscillator = Settings::default();
    oscillator.simulation.initial_state = InitialState::Oscillator;
    oscillator.simulation.generations = 10;
    oscillator.to_file(examples_dir.join("oscillator.yaml"))?;

    let mut seeded = Settings::default();
    seeded.simulation.size = Dimensions::cube(16);
    seeded.random.seed = Some(42);
    seeded.random.probability = 0.3;
    seeded.simulation.tick_interval_ms = 250;
    seeded.output.format = game_of_life_3d::config::OutputFormat::Json;
    seeded.to_file(examples_dir.join("seeded_random.yaml"))?;

    let mut from_file = Settings::default();
    from_file.simulation.initial_state = InitialState::Pattern;
    from_file.input.pattern_file = Some(PathBuf::from("input/patterns/survivor.txt"));
    from_file.to_file(examples_dir.join("pattern.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own x,y,z pattern files to {}", pattern_dir.display());
    println!("3. Run: cargo run -- run --config config/default.yaml");

    Ok(())
}

fn inspect_command(config_path: PathBuf, pattern_path: PathBuf, size: Option<Dimensions>) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Inspecting pattern..."));

    let settings = load_settings(&config_path)?;
    let dimensions = size.unwrap_or(settings.simulation.size);
    let mut grid = Grid::new(dimensions).context("Invalid grid size")?;

    let report = PatternLoader::load_file(&mut grid, &pattern_path)
        .with_context(|| format!("Failed to load pattern from {}", pattern_path.display()))?;

    println!("Applied {} cell(s) to a {} grid", report.applied, dimensions);
    for warning in &report.warnings {
        println!("{}", ColorOutput::warning(&format!("  ! {}", warning)));
    }

    println!("\n{}", GridFormatter::format_layers(&grid));
    println!("{}", GridFormatter::format_counts(&grid.cell_counts()));

    let step = TransitionEngine::step(&grid);
    println!("\nNext generation preview:");
    if step.dying.is_empty() && step.born.is_empty() {
        println!("{}", ColorOutput::muted("  stable: no cells change"));
    }
    for event in &step.dying {
        println!("{}", ColorOutput::error(&format!(
            "  - {} dies with {} neighbors", event.coord, event.neighbors
        )));
    }
    for event in &step.born {
        println!("{}", ColorOutput::success(&format!(
            "  + {} is born with {} neighbors", event.coord, event.neighbors
        )));
    }
    println!("{}", GridFormatter::format_counts(&step.grid.cell_counts()));

    Ok(())
}
