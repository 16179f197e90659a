use crate::genome::generate_seed_genome;
use crate::Simulation;
use evo_types::{AgentKind, AgentState, ControllerState, FoodState, Genome, Vec2, WorldConfig};
use rand::Rng;

/// Uniform over the arena. Draws x, then y.
pub(crate) fn random_position<R: Rng + ?Sized>(config: &WorldConfig, rng: &mut R) -> Vec2 {
    let x = rng.random::<f32>() * config.arena_width;
    let y = rng.random::<f32>() * config.arena_height;
    Vec2::new(x, y)
}

pub(crate) fn new_agent<R: Rng + ?Sized>(
    kind: AgentKind,
    genome: Genome,
    config: &WorldConfig,
    rng: &mut R,
) -> AgentState {
    AgentState {
        kind,
        position: random_position(config, rng),
        velocity: Vec2::ZERO,
        genome,
        controller: ControllerState::default(),
        fitness: 0.0,
        alive: true,
        energy: config.initial_energy,
    }
}

/// Fresh agents with seed genomes. Each agent draws its genes before its position.
pub(crate) fn seed_population<R: Rng + ?Sized>(
    kind: AgentKind,
    count: usize,
    config: &WorldConfig,
    rng: &mut R,
) -> Vec<AgentState> {
    (0..count)
        .map(|_| {
            let genome = generate_seed_genome(config.initial_gene_scale, rng);
            new_agent(kind, genome, config, rng)
        })
        .collect()
}

pub(crate) fn food_batch<R: Rng + ?Sized>(config: &WorldConfig, rng: &mut R) -> Vec<FoodState> {
    (0..config.food_count)
        .map(|_| FoodState {
            position: random_position(config, rng),
            consumed: false,
        })
        .collect()
}

impl Simulation {
    pub(crate) fn spawn_initial_population(&mut self) {
        self.predators = seed_population(
            AgentKind::Predator,
            self.config.num_predators as usize,
            &self.config,
            &mut self.rng,
        );
        self.prey = seed_population(
            AgentKind::Prey,
            self.config.num_prey as usize,
            &self.config,
            &mut self.rng,
        );
        self.reset_food();
    }

    pub(crate) fn reset_food(&mut self) {
        self.foods = food_batch(&self.config, &mut self.rng);
    }
}
