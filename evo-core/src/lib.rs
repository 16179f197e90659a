use evo_config::validate_world_config;
use evo_types::{
    AgentMarker, AgentState, FoodState, GenerationSummary, MetricsSnapshot, RenderSnapshot,
    SimulationPhase, TickOutcome, WorldConfig, WorldSnapshot,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use thiserror::Error;

mod controller;
mod epoch;
mod evolution;
mod genome;
mod perception;
mod spawn;
mod turn;

#[cfg(test)]
mod tests;

pub use controller::{step_controller, GateBlock, GenomeLayout, OutputHead};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid world config: {0}")]
    InvalidConfig(String),
    #[error("genome has {actual} genes, controller expects {expected}")]
    GenomeLength { expected: usize, actual: usize },
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: WorldConfig,
    generation: u32,
    tick_in_generation: u32,
    seed: u64,
    rng: ChaCha8Rng,
    phase: SimulationPhase,
    predators: Vec<AgentState>,
    prey: Vec<AgentState>,
    foods: Vec<FoodState>,
    prey_eaten: u32,
    metrics: MetricsSnapshot,
}

impl Simulation {
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, SimError> {
        validate_world_config(&config).map_err(SimError::InvalidConfig)?;

        let mut sim = Self {
            config,
            generation: 1,
            tick_in_generation: 0,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: SimulationPhase::Stepping,
            predators: Vec::new(),
            prey: Vec::new(),
            foods: Vec::new(),
            prey_eaten: 0,
            metrics: MetricsSnapshot::default(),
        };

        sim.spawn_initial_population();
        sim.refresh_population_metrics();
        Ok(sim)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn tick_in_generation(&self) -> u32 {
        self.tick_in_generation
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.metrics
    }

    pub fn predators(&self) -> &[AgentState] {
        &self.predators
    }

    pub fn prey(&self) -> &[AgentState] {
        &self.prey
    }

    pub fn foods(&self) -> &[FoodState] {
        &self.foods
    }

    /// Prey caught so far in the current generation.
    pub fn prey_eaten(&self) -> u32 {
        self.prey_eaten
    }

    pub fn reset(&mut self, seed: Option<u64>) {
        self.seed = seed.unwrap_or(self.seed);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.generation = 1;
        self.tick_in_generation = 0;
        self.phase = SimulationPhase::Stepping;
        self.prey_eaten = 0;
        self.metrics = MetricsSnapshot::default();
        self.spawn_initial_population();
        self.refresh_population_metrics();
    }

    /// Advances one tick. On the last tick of a generation the boundary runs
    /// in the same call and its summary is attached to the outcome.
    pub fn tick(&mut self) -> Result<TickOutcome, SimError> {
        let counts = self.run_tick_phases()?;

        self.tick_in_generation += 1;
        self.prey_eaten += counts.prey_eaten;
        self.metrics.ticks += 1;
        self.metrics.prey_eaten_last_tick = counts.prey_eaten;
        self.metrics.food_consumed_last_tick = counts.food_consumed;
        self.metrics.starvations_last_tick = counts.starvations;
        self.metrics.total_prey_eaten += u64::from(counts.prey_eaten);
        self.metrics.total_food_consumed += u64::from(counts.food_consumed);

        let generation = self.generation;
        let tick = self.tick_in_generation;
        let summary = if self.tick_in_generation >= self.config.steps_per_generation {
            Some(self.finish_generation())
        } else {
            None
        };
        self.refresh_population_metrics();

        Ok(TickOutcome {
            generation,
            tick,
            metrics: self.metrics,
            summary,
        })
    }

    pub fn step_n(&mut self, count: u32) -> Result<Vec<TickOutcome>, SimError> {
        let mut outcomes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            outcomes.push(self.tick()?);
        }
        Ok(outcomes)
    }

    /// Ticks until the current generation closes.
    pub fn run_generation(&mut self) -> Result<GenerationSummary, SimError> {
        loop {
            if let Some(summary) = self.tick()?.summary {
                return Ok(summary);
            }
        }
    }

    pub fn run_generations(&mut self, count: u32) -> Result<Vec<GenerationSummary>, SimError> {
        let mut summaries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            summaries.push(self.run_generation()?);
        }
        Ok(summaries)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            generation: self.generation,
            tick: self.tick_in_generation,
            rng_seed: self.seed,
            config: self.config.clone(),
            predators: self.predators.clone(),
            prey: self.prey.clone(),
            foods: self.foods.clone(),
            prey_eaten: self.prey_eaten,
            metrics: self.metrics,
        }
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        let marker = |agent: &AgentState| AgentMarker {
            position: agent.position,
            alive: agent.alive,
        };
        RenderSnapshot {
            generation: self.generation,
            tick: self.tick_in_generation,
            predators: self.predators.iter().map(marker).collect(),
            prey: self.prey.iter().map(marker).collect(),
            food: self
                .foods
                .iter()
                .filter(|food| !food.consumed)
                .map(|food| food.position)
                .collect(),
        }
    }

    /// One render snapshot per line: the current state, then one per tick.
    pub fn export_trace_jsonl(&mut self, ticks: u32) -> Result<Vec<String>, SimError> {
        let mut lines = Vec::with_capacity(ticks as usize + 1);
        lines.push(
            serde_json::to_string(&self.render_snapshot())
                .expect("serialize initial render snapshot for trace export"),
        );

        for _ in 0..ticks {
            self.tick()?;
            lines.push(
                serde_json::to_string(&self.render_snapshot())
                    .expect("serialize tick render snapshot for trace export"),
            );
        }
        Ok(lines)
    }

    fn refresh_population_metrics(&mut self) {
        self.metrics.live_predators = count_alive(&self.predators);
        self.metrics.live_prey = count_alive(&self.prey);
    }
}

fn count_alive(population: &[AgentState]) -> u32 {
    population.iter().filter(|agent| agent.alive).count() as u32
}

pub fn compare_snapshots(a: &WorldSnapshot, b: &WorldSnapshot) -> Ordering {
    let snapshot_a = serde_json::to_string(a).expect("serialize snapshot A");
    let snapshot_b = serde_json::to_string(b).expect("serialize snapshot B");
    snapshot_a.cmp(&snapshot_b)
}
