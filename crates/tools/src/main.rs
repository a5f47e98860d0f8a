use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::{CellState, DungeonLayout, GeneratorConfig, LevelPreset, generate};
use env_logger::{Builder, Env};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Small,
    Medium,
    Large,
}

impl From<Preset> for LevelPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Small => LevelPreset::Small,
            Preset::Medium => LevelPreset::Medium,
            Preset::Large => LevelPreset::Large,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
    Summary,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML or JSON generator config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level size preset, applied on top of the config file
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Fixed seed; disables random seeding
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Skip noise, random walk, and blending
    #[arg(long)]
    no_organic: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct LayoutSummary {
    seed: u64,
    attempts: u32,
    width: usize,
    height: usize,
    rooms: usize,
    corridors: usize,
    floor_cells: usize,
    corridor_cells: usize,
    wall_cells: usize,
}

impl LayoutSummary {
    fn of(layout: &DungeonLayout) -> Self {
        Self {
            seed: layout.seed,
            attempts: layout.attempts,
            width: layout.width(),
            height: layout.height(),
            rooms: layout.rooms.len(),
            corridors: layout.corridors.len(),
            floor_cells: layout.count(CellState::Floor),
            corridor_cells: layout.count(CellState::Corridor),
            wall_cells: layout.count(CellState::Wall),
        }
    }
}

fn build_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(preset) = args.preset {
        config = config.with_preset(preset.into());
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
        config.use_random_seed = false;
    }
    if let Some(width) = args.width {
        config.level_width = width;
    }
    if let Some(height) = args.height {
        config.level_height = height;
    }
    if args.no_organic {
        config.use_organic_generation = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = build_config(&args)?;
    log::debug!("generator config: {config:?}");
    let layout = generate(&config).with_context(|| "Dungeon generation failed")?;

    let rendered = match args.format {
        OutputFormat::Ascii => layout.render_ascii(),
        OutputFormat::Json => serde_json::to_string_pretty(&layout)
            .with_context(|| "Failed to serialize layout to JSON")?,
        OutputFormat::Summary => serde_json::to_string_pretty(&LayoutSummary::of(&layout))
            .with_context(|| "Failed to serialize layout summary")?,
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}
