// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Partialscan CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use partialscan::config::GeneratorConfig;
use partialscan::io::{self, read_landmarks, MeshFormat, ObjWriteOptions, StagedOutput};
use partialscan::logging;
use partialscan::partial::PartialShapeGenerator;
use partialscan::sampling::SampleRange;
use partialscan::texture::SoftwareUvRenderer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slog::{info, Logger};
use std::path::{Path, PathBuf};

/// File searched next to the input mesh when `--landmarks` is not given
const DEFAULT_LANDMARKS: &str = "landmarks3d.txt";

#[derive(Parser)]
#[command(name = "partialscan")]
#[command(about = "Synthesize partial 3D scans from complete textured meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Random seed (overrides the configuration)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Configuration file (defaults to ./partialscan.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep the source texture atlas instead of re-rendering it
    #[arg(long, global = true)]
    no_texture_repair: bool,

    /// Print a JSON report of the generated meshes
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (repeat for trace logging)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a mesh in two along a plane through three landmarks
    Cut {
        /// Input mesh (.obj or .npz)
        #[arg(short, long)]
        input: PathBuf,

        /// Output prefix; writes <prefix>_slice1 and <prefix>_slice2
        #[arg(short, long)]
        output: PathBuf,

        /// Landmark file (defaults to landmarks3d.txt next to the input)
        #[arg(short, long)]
        landmarks: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "obj")]
        format: OutputFormat,
    },

    /// Remove random localized patches from a mesh
    Shoot {
        /// Input mesh (.obj or .npz)
        #[arg(short, long)]
        input: PathBuf,

        /// Output mesh (.obj or .npz)
        #[arg(short, long)]
        output: PathBuf,

        /// Number of holes, fixed ("5") or a range ("3:10")
        #[arg(long)]
        holes: Option<SampleRange<usize>>,

        /// Fraction of points removed per hole, fixed or a range ("0.01:0.05")
        #[arg(long)]
        dropout: Option<SampleRange<f64>>,

        /// Also write the input as OBJ with the removed vertices painted red
        #[arg(long, value_name = "FILE.obj")]
        highlight: Option<PathBuf>,
    },

    /// Convert a mesh between OBJ and NPZ
    Convert {
        input: PathBuf,
        output: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Obj,
    Npz,
}

impl From<OutputFormat> for MeshFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Obj => MeshFormat::Obj,
            OutputFormat::Npz => MeshFormat::Npz,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = logging::terminal(logging::level_from_verbosity(cli.verbose));

    match &cli.command {
        Commands::Cut {
            input,
            output,
            landmarks,
            format,
        } => {
            let config = load_config(&cli, None, None)?;
            cut_command(&log, &cli, config, input, output, landmarks.as_deref(), *format)?;
        }
        Commands::Shoot {
            input,
            output,
            holes,
            dropout,
            highlight,
        } => {
            let config = load_config(&cli, *holes, *dropout)?;
            shoot_command(&log, &cli, config, input, output, highlight.as_deref())?;
        }
        Commands::Convert { input, output } => {
            let mesh = io::load_mesh(input)
                .with_context(|| format!("Failed to load mesh: {}", input.display()))?;
            io::save_mesh(output, &mesh)
                .with_context(|| format!("Failed to write mesh: {}", output.display()))?;
            println!("{} {} -> {}", "✓".green(), input.display(), output.display());
        }
        Commands::Version => {
            println!("Partialscan v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_config(
    cli: &Cli,
    holes: Option<SampleRange<usize>>,
    dropout: Option<SampleRange<f64>>,
) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = GeneratorConfig::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => GeneratorConfig::load()?,
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if cli.no_texture_repair {
        config.repair_texture = false;
    }
    if let Some(holes) = holes {
        config.holes = holes;
    }
    if let Some(dropout) = dropout {
        config.dropout = dropout;
    }

    config.validate()?;
    Ok(config)
}

fn new_rng(config: &GeneratorConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn cut_command(
    log: &Logger,
    cli: &Cli,
    config: GeneratorConfig,
    input: &Path,
    output: &Path,
    landmarks: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mesh = io::load_mesh(input)
        .with_context(|| format!("Failed to load mesh: {}", input.display()))?;

    let landmark_path = match landmarks {
        Some(path) => path.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(DEFAULT_LANDMARKS),
    };
    let landmarks = if landmark_path.exists() {
        Some(
            read_landmarks(&landmark_path)
                .with_context(|| format!("Failed to read landmarks: {}", landmark_path.display()))?,
        )
    } else {
        info!(log, "landmark file not found"; "path" => landmark_path.display().to_string());
        None
    };

    let renderer = SoftwareUvRenderer::new();
    let rng = new_rng(&config);
    let mut generator = PartialShapeGenerator::new(log, rng, &renderer, config);
    let cut = generator
        .cut(&mesh, landmarks.as_ref())
        .with_context(|| format!("Failed to cut {}", input.display()))?;

    let extension = MeshFormat::from(format).extension();
    let first_path = PathBuf::from(format!("{}_slice1.{}", output.display(), extension));
    let second_path = PathBuf::from(format!("{}_slice2.{}", output.display(), extension));
    let mut staged = StagedOutput::new();
    staged
        .stage_mesh(&first_path, &cut.first)
        .with_context(|| format!("Failed to write mesh: {}", first_path.display()))?;
    staged
        .stage_mesh(&second_path, &cut.second)
        .with_context(|| format!("Failed to write mesh: {}", second_path.display()))?;
    staged.commit().context("Failed to move slices into place")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&cut.report())?);
    } else {
        println!(
            "{} Cut through {} -> {} ({} vertices), {} ({} vertices)",
            "✓".green(),
            cut.landmarks.join(", ").cyan(),
            first_path.display(),
            cut.first.vertex_count(),
            second_path.display(),
            cut.second.vertex_count()
        );
    }

    Ok(())
}

fn shoot_command(
    log: &Logger,
    cli: &Cli,
    config: GeneratorConfig,
    input: &Path,
    output: &Path,
    highlight: Option<&Path>,
) -> Result<()> {
    // Fail on an unsupported output extension before doing any work
    MeshFormat::from_path(output)?;
    if let Some(path) = highlight {
        if MeshFormat::from_path(path)? != MeshFormat::Obj {
            anyhow::bail!("--highlight writes OBJ only: {}", path.display());
        }
    }

    let mesh = io::load_mesh(input)
        .with_context(|| format!("Failed to load mesh: {}", input.display()))?;

    let renderer = SoftwareUvRenderer::new();
    let rng = new_rng(&config);
    let mut generator = PartialShapeGenerator::new(log, rng, &renderer, config);
    let shot = generator
        .shoot(&mesh)
        .with_context(|| format!("Failed to shoot holes into {}", input.display()))?;

    let mut staged = StagedOutput::new();
    staged
        .stage_mesh(output, &shot.mesh)
        .with_context(|| format!("Failed to write mesh: {}", output.display()))?;
    if let Some(path) = highlight {
        let options = ObjWriteOptions::with_highlight(shot.removed.iter().copied());
        staged
            .stage_obj(path, &mesh, &options)
            .with_context(|| format!("Failed to write highlight: {}", path.display()))?;
    }
    staged.commit().context("Failed to move output into place")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&shot.report())?);
    } else {
        println!(
            "{} Removed {} of {} vertices -> {}",
            "✓".green(),
            shot.removed.len().to_string().cyan(),
            mesh.vertex_count(),
            output.display()
        );
    }

    Ok(())
}
