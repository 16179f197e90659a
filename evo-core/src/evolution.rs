use crate::genome::{crossover, mutate_genome};
use crate::spawn::{new_agent, random_position, seed_population};
use evo_types::{AgentKind, AgentState, ControllerState, Vec2, WorldConfig};
use rand::Rng;

/// Builds the next generation of one population.
///
/// The population is ranked by fitness (stable, so ties keep their current
/// order). The top `elite_count` genomes carry over unchanged into fresh
/// bodies. The rest of the slots are filled by children of two parents drawn
/// uniformly from the top half of the ranking.
pub(crate) fn evolve_population<R: Rng + ?Sized>(
    mut population: Vec<AgentState>,
    kind: AgentKind,
    target_size: usize,
    config: &WorldConfig,
    rng: &mut R,
) -> Vec<AgentState> {
    if population.is_empty() {
        return seed_population(kind, target_size, config, rng);
    }

    population.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

    let elite_count = (config.elite_count as usize)
        .min(population.len())
        .min(target_size);
    let mut next = Vec::with_capacity(target_size);
    for elite in &population[..elite_count] {
        let mut carried = elite.clone();
        reset_body(&mut carried, config, rng);
        next.push(carried);
    }

    let parent_pool = (population.len() / 2).max(1);
    while next.len() < target_size {
        let parent_a = &population[rng.random_range(0..parent_pool)];
        let parent_b = &population[rng.random_range(0..parent_pool)];
        let mut genome = crossover(&parent_a.genome, &parent_b.genome, rng);
        mutate_genome(&mut genome, config.mutation_rate, config.mutation_power, rng);
        next.push(new_agent(kind, genome, config, rng));
    }

    next
}

fn reset_body<R: Rng + ?Sized>(agent: &mut AgentState, config: &WorldConfig, rng: &mut R) {
    agent.fitness = 0.0;
    agent.energy = config.initial_energy;
    agent.alive = true;
    agent.velocity = Vec2::ZERO;
    agent.controller = ControllerState::default();
    agent.position = random_position(config, rng);
}
