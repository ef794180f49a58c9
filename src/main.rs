//! Command line front end for the Game of Life board

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use life_board::{
    board::Snapshot,
    config::{CliOverrides, OutputFormat, Settings},
    game_of_life::{builtin_pattern, create_example_patterns, load_pattern_from_file, Cell, Dimensions, GameOfLifeRules, LiveSet, Pattern},
    simulation::{RenderSink, SimulationLoop},
    utils::{ColorOutput, SnapshotFormatter, TerminalRenderer},
};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "life_board")]
#[command(about = "Concurrent Game of Life simulator")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the background simulation and print every generation
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Seed pattern file (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Built-in seed pattern: glider, blinker, block or beacon
        #[arg(short, long, conflicts_with = "pattern")]
        builtin: Option<String>,

        /// Generations per second (overrides config)
        #[arg(short, long)]
        speed: Option<u64>,

        /// Window width in pixels (overrides config)
        #[arg(long)]
        width: Option<u32>,

        /// Window height in pixels (overrides config)
        #[arg(long)]
        height: Option<u32>,

        /// Print frames as JSON
        #[arg(long)]
        json: bool,

        /// Number of generations to run before stopping
        #[arg(short, long, default_value_t = 10)]
        ticks: usize,
    },

    /// Apply the rules to a pattern without the background loop
    Step {
        /// Pattern file
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Built-in pattern: glider, blinker, block or beacon
        #[arg(short, long, conflicts_with = "pattern")]
        builtin: Option<String>,

        /// Number of generations
        #[arg(short, long, default_value_t = 1)]
        generations: usize,

        /// Dead cells added around the pattern on every side
        #[arg(short, long, default_value_t = 2)]
        margin: usize,

        /// Show every intermediate generation
        #[arg(long)]
        show_evolution: bool,
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
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli.command) {
        eprintln!("{}", failure_message(&e));
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            config, pattern, builtin, speed, width, height, json, ticks
        } => {
            let overrides = CliOverrides {
                generations_per_second: speed,
                pattern_file: pattern,
                window_width: width,
                window_height: height,
                format: json.then_some(OutputFormat::Json),
            };
            run_command(config, overrides, builtin, ticks)
        }
        Commands::Step { pattern, builtin, generations, margin, show_evolution } => {
            step_command(pattern, builtin, generations, margin, show_evolution)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
    }
}

/// Error chain on one line, highlighted like the other status messages
fn failure_message(error: &anyhow::Error) -> String {
    ColorOutput::error(&format!("❌ {:#}", error))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
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

fn resolve_pattern(pattern: Option<PathBuf>, builtin: Option<String>) -> Result<Pattern> {
    match (pattern, builtin) {
        (Some(path), _) => load_pattern_from_file(&path),
        (None, Some(name)) => builtin_pattern(&name)
            .with_context(|| format!("Unknown built-in pattern: {}", name)),
        (None, None) => anyhow::bail!("Either --pattern or --builtin is required"),
    }
}

fn run_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    builtin: Option<String>,
    ticks: usize,
) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate()
        .context("Configuration validation failed")?;

    let board = life_board::prepare_board(&settings)
        .context("Failed to prepare board")?;

    if let Some(name) = builtin {
        let pattern = builtin_pattern(&name)
            .with_context(|| format!("Unknown built-in pattern: {}", name))?;
        let dims = settings.board_dimensions();
        board.add_cells(pattern.placed_at(pattern.centered_origin(dims)));
    }

    let terminal = TerminalRenderer::new(Arc::clone(&board), settings.output.clone(), std::io::stdout());
    terminal.request_render();

    let (frames, frame_rx) = mpsc::channel();
    let renderer = move || {
        terminal.request_render();
        let _ = frames.send(());
    };

    let period = settings.period();
    let mut simulation = SimulationLoop::with_period(Arc::clone(&board), Arc::new(renderer), period);

    println!("{}", ColorOutput::info(&format!(
        "▶ Running {} generations at {} per second", ticks, settings.simulation.generations_per_second
    )));
    let start_time = Instant::now();
    simulation.start()?;

    let frame_timeout = period + Duration::from_secs(5);
    for _ in 0..ticks {
        frame_rx.recv_timeout(frame_timeout)
            .context("Simulation stopped producing frames")?;
    }

    simulation.stop()?;
    let snapshot = board.snapshot();

    println!("{}", ColorOutput::success(&format!(
        "✅ Stopped after {:.3}s: {}",
        start_time.elapsed().as_secs_f64(),
        SnapshotFormatter::format_summary(&snapshot)
    )));

    Ok(())
}

fn step_command(
    pattern_path: Option<PathBuf>,
    builtin: Option<String>,
    generations: usize,
    margin: usize,
    show_evolution: bool,
) -> Result<()> {
    let pattern = resolve_pattern(pattern_path, builtin)?;
    let dims = Dimensions::new(pattern.size.width + 2 * margin, pattern.size.height + 2 * margin);
    let mut live: LiveSet = pattern.placed_at(Cell::new(margin, margin)).collect();

    let frame = |cells: LiveSet, generation: u64| Snapshot {
        cells,
        dimensions: Some(dims),
        generation,
        epoch: 0,
    };

    println!("Generation 0:");
    println!("{}", SnapshotFormatter::format_with_coords(&frame(live.clone(), 0)));

    for generation in 1..=generations as u64 {
        live = GameOfLifeRules::step(&live, dims.width, dims.height);
        if show_evolution || generation == generations as u64 {
            println!("Generation {}:", generation);
            println!("{}", SnapshotFormatter::format_with_coords(&frame(live.clone(), generation)));
        }
    }

    println!("Living cells: {} → {}", pattern.cells.len(), live.len());
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let pattern_dir = directory.join("patterns");

    for dir in [&config_dir, &pattern_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_patterns(&pattern_dir)
        .context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", pattern_dir.display());

    // Faster variant seeded with a glider
    let mut glider_config = Settings::default();
    glider_config.simulation.generations_per_second = 10;
    glider_config.input.pattern_file = Some(PathBuf::from("patterns/glider.txt"));
    glider_config.to_file(&config_dir.join("glider.yaml"))?;

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- run --config config/glider.yaml --ticks 20");

    Ok(())
}
