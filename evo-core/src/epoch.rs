use crate::evolution::evolve_population;
use crate::Simulation;
use evo_types::{AgentKind, AgentState, GenerationSummary, SimulationPhase};

/// Mean over every member, dead or alive. The max starts at zero, so an
/// all-negative population reports 0.
fn fitness_stats(population: &[AgentState]) -> (f32, f32) {
    if population.is_empty() {
        return (0.0, 0.0);
    }
    let sum: f32 = population.iter().map(|agent| agent.fitness).sum();
    let max = population
        .iter()
        .map(|agent| agent.fitness)
        .fold(0.0_f32, f32::max);
    (sum / population.len() as f32, max)
}

pub(crate) fn summarize_generation(
    generation: u32,
    predators: &[AgentState],
    prey: &[AgentState],
    prey_eaten: u32,
) -> GenerationSummary {
    let (avg_predator_fitness, max_predator_fitness) = fitness_stats(predators);
    let (avg_prey_fitness, max_prey_fitness) = fitness_stats(prey);
    GenerationSummary {
        generation,
        avg_predator_fitness,
        max_predator_fitness,
        avg_prey_fitness,
        max_prey_fitness,
        prey_eaten,
    }
}

impl Simulation {
    /// Closes the current generation: summarize, evolve predators then prey,
    /// lay fresh food, reset the per-generation counters.
    pub(crate) fn finish_generation(&mut self) -> GenerationSummary {
        self.phase = SimulationPhase::Evolving;

        let summary =
            summarize_generation(self.generation, &self.predators, &self.prey, self.prey_eaten);

        let predators = std::mem::take(&mut self.predators);
        self.predators = evolve_population(
            predators,
            AgentKind::Predator,
            self.config.num_predators as usize,
            &self.config,
            &mut self.rng,
        );
        let prey = std::mem::take(&mut self.prey);
        self.prey = evolve_population(
            prey,
            AgentKind::Prey,
            self.config.num_prey as usize,
            &self.config,
            &mut self.rng,
        );
        self.reset_food();

        self.tick_in_generation = 0;
        self.prey_eaten = 0;
        self.generation = self.generation.saturating_add(1);
        self.metrics.generations_completed = self.metrics.generations_completed.saturating_add(1);

        self.phase = SimulationPhase::Stepping;
        summary
    }
}
