//! Nano Work Prover CLI
//!
//! Command-line front end for generating and checking BLAKE2b work.
//!
//! # Commands
//!
//! - `generate` - Find work for a root
//! - `validate` - Check work against a root and difficulty
//! - `difficulty` - Convert between thresholds and multipliers
//! - `devices` - List OpenCL GPUs
//! - `benchmark` - Measure batch throughput of the selected backend

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use nanowork::codec::{parse_difficulty, parse_root, parse_work, work_to_hex};
use nanowork::config::default_config_path;
use nanowork::engine::{select_engine, Batch, WorkJob};
use nanowork::{
    from_multiplier, to_multiplier, validate, work_value, BackendChoice, EngineConfig, WorkError,
    WorkGenerator, BASE_DIFFICULTY,
};

#[derive(Parser)]
#[command(name = "nanowork")]
#[command(version)]
#[command(about = "BLAKE2b proof-of-work generator with CPU and OpenCL backends")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend to run on: auto, gpu or cpu
    #[arg(long, global = true)]
    backend: Option<BackendChoice>,

    /// CPU worker threads (default: number of CPU cores)
    #[arg(short, long, global = true)]
    threads: Option<usize>,

    /// OpenCL GPU index
    #[arg(long, global = true)]
    gpu_device: Option<usize>,

    /// Custom config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find work for a root
    Generate {
        /// Root as 64 hex digits (previous block hash, or account key for open blocks)
        #[arg(long)]
        root: String,

        /// Threshold as 16 hex digits (default: base network difficulty)
        #[arg(long, conflicts_with = "multiplier")]
        difficulty: Option<String>,

        /// Threshold as a multiplier of the base difficulty
        #[arg(long)]
        multiplier: Option<f64>,
    },

    /// Check work against a root
    Validate {
        /// Work as 16 hex digits
        #[arg(long)]
        work: String,

        /// Root as 64 hex digits
        #[arg(long)]
        root: String,

        /// Threshold as 16 hex digits (default: base network difficulty)
        #[arg(long)]
        difficulty: Option<String>,
    },

    /// Convert between difficulty thresholds and multipliers
    Difficulty {
        /// Multiplier to convert into a threshold
        #[arg(long, conflicts_with = "from", required_unless_present = "from")]
        multiplier: Option<f64>,

        /// Threshold (16 hex digits) to convert into a multiplier
        #[arg(long)]
        from: Option<String>,
    },

    /// List OpenCL GPUs
    Devices,

    /// Run performance benchmark
    Benchmark {
        /// Number of full batches to evaluate
        #[arg(short, long, default_value = "16")]
        batches: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    // Ok(false): the command ran but its check failed
    let result = build_config(&cli).and_then(|config| match cli.command {
        Commands::Generate {
            root,
            difficulty,
            multiplier,
        } => cmd_generate(&config, &root, difficulty.as_deref(), multiplier).map(|()| true),
        Commands::Validate {
            work,
            root,
            difficulty,
        } => cmd_validate(&work, &root, difficulty.as_deref()),
        Commands::Difficulty { multiplier, from } => {
            cmd_difficulty(multiplier, from.as_deref()).map(|()| true)
        }
        Commands::Devices => cmd_devices().map(|()| true),
        Commands::Benchmark { batches } => cmd_benchmark(&config, batches).map(|()| true),
    });

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Config file values, then command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::load_or_default(&default_config_path())?,
    };

    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(threads) = cli.threads {
        config.threads = Some(threads);
    }
    if let Some(index) = cli.gpu_device {
        config.gpu_device = index;
    }
    Ok(config)
}

fn difficulty_or_base(hex_difficulty: Option<&str>) -> Result<u64, WorkError> {
    hex_difficulty.map_or(Ok(BASE_DIFFICULTY), parse_difficulty)
}

fn multiplier_difficulty(multiplier: f64) -> Result<u64, WorkError> {
    from_multiplier(BASE_DIFFICULTY, multiplier).ok_or_else(|| {
        WorkError::InvalidInput(format!("multiplier must be positive, got {multiplier}"))
    })
}

fn cmd_generate(
    config: &EngineConfig,
    root_hex: &str,
    difficulty_hex: Option<&str>,
    multiplier: Option<f64>,
) -> anyhow::Result<()> {
    let root = parse_root(root_hex)?;
    let difficulty = match multiplier {
        Some(m) => multiplier_difficulty(m)?,
        None => difficulty_or_base(difficulty_hex)?,
    };

    let mut generator = WorkGenerator::new(config)?;
    println!(
        "Generating work on {} ({}) at difficulty {} ({:.2}x)",
        generator.engine_name(),
        generator.backend(),
        work_to_hex(difficulty),
        to_multiplier(BASE_DIFFICULTY, difficulty)
    );

    let work = generator.generate(&root, difficulty)?;
    let value = work_value(work, &root)?;

    println!("\nFound work!");
    println!("  Work:   {}", work_to_hex(work));
    println!("  Value:  {}", work_to_hex(value));
    if let Some(stats) = generator.last_stats() {
        println!(
            "  Hashes: {} in {} batches ({:.2}s, {:.0} H/s)",
            stats.hashes,
            stats.batches,
            stats.elapsed.as_secs_f64(),
            stats.hashrate()
        );
    }
    Ok(())
}

/// Prints the report; `Ok(false)` when the work is below the difficulty
fn cmd_validate(
    work_hex: &str,
    root_hex: &str,
    difficulty_hex: Option<&str>,
) -> anyhow::Result<bool> {
    let work = parse_work(work_hex)?;
    let root = parse_root(root_hex)?;
    let difficulty = difficulty_or_base(difficulty_hex)?;

    let value = work_value(work, &root)?;
    let valid = validate(work, &root, difficulty)?;

    println!("Work:       {}", work_to_hex(work));
    println!("Value:      {}", work_to_hex(value));
    println!("Difficulty: {}", work_to_hex(difficulty));
    println!("Multiplier: {:.4}", to_multiplier(BASE_DIFFICULTY, value));
    println!("Valid:      {}", if valid { "yes" } else { "no" });

    Ok(valid)
}

fn cmd_difficulty(multiplier: Option<f64>, from: Option<&str>) -> anyhow::Result<()> {
    match (multiplier, from) {
        (Some(m), _) => {
            println!("{}", work_to_hex(multiplier_difficulty(m)?));
        }
        (None, Some(hex_difficulty)) => {
            let difficulty = parse_difficulty(hex_difficulty)?;
            println!("{}", to_multiplier(BASE_DIFFICULTY, difficulty));
        }
        (None, None) => anyhow::bail!("pass --multiplier or --from"),
    }
    Ok(())
}

#[cfg(feature = "opencl")]
fn cmd_devices() -> anyhow::Result<()> {
    let devices = nanowork::engine::gpu::list_devices();
    if devices.is_empty() {
        println!("No OpenCL GPUs found");
        return Ok(());
    }

    for device in devices {
        println!(
            "[{}] {} ({}) - {} compute units, {} MB",
            device.index,
            device.name,
            device.vendor,
            device.compute_units,
            device.global_mem_size / (1024 * 1024)
        );
    }
    Ok(())
}

#[cfg(not(feature = "opencl"))]
fn cmd_devices() -> anyhow::Result<()> {
    println!("Built without OpenCL support; rebuild with --features opencl");
    Ok(())
}

fn cmd_benchmark(config: &EngineConfig, batches: u32) -> anyhow::Result<()> {
    let mut engine = select_engine(config)?;
    // Unreachable threshold: every batch runs to completion
    let job = WorkJob::new(&[0u8; 32], u64::MAX)?;
    engine.prepare(&job)?;

    println!("Running benchmark on {} ({} batches)...", engine.name(), batches);

    let mut hashes = 0u64;
    let start = Instant::now();
    for i in 0..batches {
        let batch = Batch::at(u64::from(i) * Batch::at(0).size + 1);
        hashes += engine.evaluate(&job, batch)?.hashes;
    }
    let elapsed = start.elapsed();

    println!("\nResults:");
    println!("  Backend: {}", engine.kind());
    println!("  Total hashes: {}", hashes);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} MH/s", hashes as f64 / elapsed.as_secs_f64() / 1e6);
    println!(
        "  Expected time at base difficulty: {:.2}s",
        expected_hashes(BASE_DIFFICULTY) / (hashes as f64 / elapsed.as_secs_f64())
    );

    Ok(())
}

/// Mean number of candidates before one meets `difficulty`
fn expected_hashes(difficulty: u64) -> f64 {
    2f64.powi(64) / (u64::MAX - difficulty).saturating_add(1) as f64
}
