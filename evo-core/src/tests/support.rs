use super::*;

pub(super) fn test_config() -> WorldConfig {
    WorldConfig {
        arena_width: 100.0,
        arena_height: 80.0,
        num_predators: 4,
        num_prey: 6,
        food_count: 5,
        steps_per_generation: 10,
        mutation_rate: 0.2,
        mutation_power: 0.2,
        elite_count: 2,
        initial_gene_scale: 0.5,
        collision_distance: 2.0,
        max_speed: 5.0,
        energy_decay: 0.5,
        initial_energy: 10.0,
        energy_sensor_scale: 20.0,
        predator_eat_bonus: 5.0,
        prey_food_energy: 2.0,
        predation_fitness: 5.0,
        foraging_fitness: 2.0,
        predator_survival_fitness: 0.01,
        prey_survival_fitness: 0.02,
    }
}

/// Every gene zero: the controller outputs exactly zero thrust forever.
pub(super) fn zero_genome() -> Genome {
    Genome(vec![0.0; GENOME_LEN])
}

pub(super) fn filled_genome(value: f32) -> Genome {
    Genome(vec![value; GENOME_LEN])
}

/// Zero weights except the output head biases, so the outputs are
/// `tanh(bias_x)` and `tanh(bias_y)` on every tick.
pub(super) fn constant_thrust_genome(bias_x: f32, bias_y: f32) -> Genome {
    let mut genome = zero_genome();
    genome.0[GENOME_LEN - 2] = bias_x;
    genome.0[GENOME_LEN - 1] = bias_y;
    genome
}

pub(super) fn make_agent(kind: AgentKind, x: f32, y: f32, genome: Genome) -> AgentState {
    AgentState {
        kind,
        position: Vec2::new(x, y),
        velocity: Vec2::ZERO,
        genome,
        controller: ControllerState::default(),
        fitness: 0.0,
        alive: true,
        energy: 10.0,
    }
}

pub(super) fn make_food(x: f32, y: f32) -> FoodState {
    FoodState {
        position: Vec2::new(x, y),
        consumed: false,
    }
}

pub(super) fn ranked_population(kind: AgentKind, fitnesses: &[f32]) -> Vec<AgentState> {
    fitnesses
        .iter()
        .enumerate()
        .map(|(idx, &fitness)| {
            let mut agent = make_agent(kind, 1.0, 1.0, filled_genome(idx as f32));
            agent.fitness = fitness;
            agent.energy = 0.5;
            agent.alive = idx % 2 == 0;
            agent.velocity = Vec2::new(1.0, -1.0);
            agent.controller.hidden[0] = 0.25;
            agent.controller.cell[0] = -0.25;
            agent
        })
        .collect()
}

pub(super) fn configure_sim(
    sim: &mut Simulation,
    predators: Vec<AgentState>,
    prey: Vec<AgentState>,
    foods: Vec<FoodState>,
) {
    sim.predators = predators;
    sim.prey = prey;
    sim.foods = foods;
    sim.tick_in_generation = 0;
    sim.prey_eaten = 0;
    sim.refresh_population_metrics();
}

pub(super) fn tick_once(sim: &mut Simulation) -> TickOutcome {
    sim.tick().expect("tick should succeed")
}

pub(super) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}",
    );
}
