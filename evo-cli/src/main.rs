use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use evo_config::{default_world_config, load_world_config_from_path};
use evo_core::Simulation;
use evo_types::{GenerationSummary, MetricsSnapshot, WorldConfig};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

mod stats;

use stats::StatsRecorder;

#[derive(Parser, Debug)]
#[command(name = "evo-cli")]
#[command(about = "Predator/prey neuroevolution CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve for a number of generations, forever when omitted.
    Run {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        generations: Option<u32>,
        #[arg(long, default_value = "stats.csv")]
        stats: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Step {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        ticks: u32,
        #[arg(long, default_value_t = false)]
        print_state: bool,
    },
    Benchmark {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 5)]
        generations: u32,
        #[arg(long)]
        predators: Option<u32>,
        #[arg(long)]
        prey: Option<u32>,
    },
    /// Write one render snapshot per line for an external viewer.
    Export {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 300)]
        ticks: u32,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    generations: u32,
    seed: u64,
    final_generation: u32,
    best_predator_fitness: f32,
    best_prey_fitness: f32,
    total_prey_eaten: u64,
    last: Option<GenerationSummary>,
}

#[derive(Debug, Serialize)]
struct StepSummary {
    ticks: u32,
    generation: u32,
    tick_in_generation: u32,
    generations_completed: u32,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
struct BenchmarkSummary {
    generations: u32,
    ticks: u64,
    elapsed_ms: u128,
    avg_ms_per_generation: f64,
    avg_us_per_agent_tick: f64,
    final_metrics: MetricsSnapshot,
}

fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "evo_cli=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            seed,
            generations,
            stats,
            format,
            out,
        } => run_command(config, seed, generations, stats, format, out),
        Commands::Step {
            config,
            seed,
            ticks,
            print_state,
        } => step_command(config, seed, ticks, print_state),
        Commands::Benchmark {
            config,
            seed,
            generations,
            predators,
            prey,
        } => benchmark_command(config, seed, generations, predators, prey),
        Commands::Export {
            config,
            seed,
            ticks,
            out,
        } => export_command(config, seed, ticks, out),
    }
}

fn run_command(
    config_path: Option<PathBuf>,
    seed: u64,
    generations: Option<u32>,
    stats_path: PathBuf,
    format: OutputFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    let mut recorder = StatsRecorder::new(stats_path);
    info!(
        seed,
        predators = sim.predators().len(),
        prey = sim.prey().len(),
        stats = %recorder.path().display(),
        "starting evolution run"
    );

    let mut summary = RunSummary {
        generations: 0,
        seed,
        final_generation: sim.generation(),
        best_predator_fitness: 0.0,
        best_prey_fitness: 0.0,
        total_prey_eaten: 0,
        last: None,
    };

    while generations.map_or(true, |limit| summary.generations < limit) {
        let generation = sim.run_generation()?;
        info!(
            generation = generation.generation,
            avg_predator_fitness = generation.avg_predator_fitness,
            max_predator_fitness = generation.max_predator_fitness,
            avg_prey_fitness = generation.avg_prey_fitness,
            max_prey_fitness = generation.max_prey_fitness,
            prey_eaten = generation.prey_eaten,
            "generation complete"
        );
        if let Err(err) = recorder.record(&generation) {
            warn!("failed to record generation {}: {err:#}", generation.generation);
        }

        summary.generations += 1;
        summary.final_generation = sim.generation();
        summary.best_predator_fitness = summary
            .best_predator_fitness
            .max(generation.max_predator_fitness);
        summary.best_prey_fitness = summary.best_prey_fitness.max(generation.max_prey_fitness);
        summary.total_prey_eaten += u64::from(generation.prey_eaten);
        summary.last = Some(generation);
    }

    match format {
        OutputFormat::Pretty => {
            let text = format!(
                "generations={} seed={} final_generation={} best_predator_fitness={} best_prey_fitness={} total_prey_eaten={}",
                summary.generations,
                summary.seed,
                summary.final_generation,
                summary.best_predator_fitness,
                summary.best_prey_fitness,
                summary.total_prey_eaten
            );
            write_output(text, out)?;
        }
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&summary)?;
            write_output(text, out)?;
        }
    }

    Ok(())
}

fn step_command(
    config_path: Option<PathBuf>,
    seed: u64,
    ticks: u32,
    print_state: bool,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    for outcome in sim.step_n(ticks.max(1))? {
        debug!(
            generation = outcome.generation,
            tick = outcome.tick,
            prey_eaten = outcome.metrics.prey_eaten_last_tick,
            food_consumed = outcome.metrics.food_consumed_last_tick,
            starvations = outcome.metrics.starvations_last_tick,
            "tick"
        );
        if let Some(summary) = outcome.summary {
            info!(generation = summary.generation, "generation boundary reached");
        }
    }

    let summary = StepSummary {
        ticks: ticks.max(1),
        generation: sim.generation(),
        tick_in_generation: sim.tick_in_generation(),
        generations_completed: sim.metrics().generations_completed,
        metrics: *sim.metrics(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if print_state {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    }

    Ok(())
}

fn benchmark_command(
    config_path: Option<PathBuf>,
    seed: u64,
    generations: u32,
    predators: Option<u32>,
    prey: Option<u32>,
) -> Result<()> {
    let mut cfg = load_config(config_path)?;
    if let Some(v) = predators {
        cfg.num_predators = v;
    }
    if let Some(v) = prey {
        cfg.num_prey = v;
    }

    let generations = generations.max(1);
    let mut sim = Simulation::new(cfg.clone(), seed)?;
    let start = Instant::now();
    sim.run_generations(generations)?;
    let elapsed = start.elapsed();

    let ticks = u64::from(generations) * u64::from(cfg.steps_per_generation);
    let agent_ticks = ticks * u64::from(cfg.num_predators + cfg.num_prey).max(1);

    let summary = BenchmarkSummary {
        generations,
        ticks,
        elapsed_ms: elapsed.as_millis(),
        avg_ms_per_generation: elapsed.as_secs_f64() * 1000.0 / f64::from(generations),
        avg_us_per_agent_tick: elapsed.as_secs_f64() * 1_000_000.0 / agent_ticks as f64,
        final_metrics: *sim.metrics(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn export_command(
    config_path: Option<PathBuf>,
    seed: u64,
    ticks: u32,
    out: PathBuf,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    let lines = sim.export_trace_jsonl(ticks)?;

    fs::write(&out, lines.join("\n"))
        .with_context(|| format!("failed writing export to {}", out.display()))?;
    info!(lines = lines.len(), "exported trace to {}", out.display());
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<WorldConfig> {
    match path {
        Some(path) => load_world_config_from_path(&path),
        None => Ok(default_world_config()),
    }
}

fn write_output(text: String, out: Option<PathBuf>) -> Result<()> {
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating output directory {}", parent.display())
            })?;
        }
        fs::write(&path, text).with_context(|| format!("failed writing {}", path.display()))?;
        println!("wrote output to {}", path.display());
    } else {
        println!("{text}");
    }
    Ok(())
}
