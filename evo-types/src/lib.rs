use serde::{Deserialize, Serialize};

pub use evo_config::WorldConfig;

pub const INPUT_SIZE: usize = 4;
pub const HIDDEN_SIZE: usize = 8;
pub const OUTPUT_SIZE: usize = 2;

/// Parameters in one gate block: input weights, recurrent weights, biases.
pub const GATE_BLOCK_LEN: usize = (INPUT_SIZE + HIDDEN_SIZE) * HIDDEN_SIZE + HIDDEN_SIZE;
/// Parameters in the output head: weights, then biases.
pub const OUTPUT_HEAD_LEN: usize = HIDDEN_SIZE * OUTPUT_SIZE + OUTPUT_SIZE;
pub const GENOME_LEN: usize = 4 * GATE_BLOCK_LEN + OUTPUT_HEAD_LEN;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Predator,
    Prey,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Genome(pub Vec<f32>);

impl Genome {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn genes(&self) -> &[f32] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ControllerState {
    pub hidden: [f32; HIDDEN_SIZE],
    pub cell: [f32; HIDDEN_SIZE],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub kind: AgentKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub genome: Genome,
    pub controller: ControllerState,
    pub fitness: f32,
    pub alive: bool,
    pub energy: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FoodState {
    pub position: Vec2,
    pub consumed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationSummary {
    pub generation: u32,
    pub avg_predator_fitness: f32,
    pub max_predator_fitness: f32,
    pub avg_prey_fitness: f32,
    pub max_prey_fitness: f32,
    pub prey_eaten: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub generations_completed: u32,
    pub live_predators: u32,
    pub live_prey: u32,
    pub prey_eaten_last_tick: u32,
    pub food_consumed_last_tick: u32,
    pub starvations_last_tick: u32,
    pub total_prey_eaten: u64,
    pub total_food_consumed: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SimulationPhase {
    Stepping,
    Evolving,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TickOutcome {
    pub generation: u32,
    pub tick: u32,
    pub metrics: MetricsSnapshot,
    pub summary: Option<GenerationSummary>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentMarker {
    pub position: Vec2,
    pub alive: bool,
}

/// What a viewer needs to draw one tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderSnapshot {
    pub generation: u32,
    pub tick: u32,
    pub predators: Vec<AgentMarker>,
    pub prey: Vec<AgentMarker>,
    pub food: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub generation: u32,
    pub tick: u32,
    pub rng_seed: u64,
    pub config: WorldConfig,
    pub predators: Vec<AgentState>,
    pub prey: Vec<AgentState>,
    pub foods: Vec<FoodState>,
    pub prey_eaten: u32,
    pub metrics: MetricsSnapshot,
}
