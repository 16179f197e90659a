use crate::controller::step_controller;
use crate::perception::perceive;
use crate::{SimError, Simulation};
use evo_types::{AgentState, FoodState, Vec2, WorldConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TickCounts {
    pub(crate) prey_eaten: u32,
    pub(crate) food_consumed: u32,
    pub(crate) starvations: u32,
}

/// Wraps one coordinate into `[0, extent)`.
pub(crate) fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

impl Simulation {
    /// One environment step. Predators move first, then prey react to the
    /// predators' new positions; interactions resolve after all movement.
    pub(crate) fn run_tick_phases(&mut self) -> Result<TickCounts, SimError> {
        let mut counts = TickCounts::default();

        counts.starvations += Self::movement_phase(&mut self.predators, &self.prey, &self.config)?;
        counts.starvations += Self::movement_phase(&mut self.prey, &self.predators, &self.config)?;

        counts.prey_eaten =
            Self::predation_phase(&mut self.predators, &mut self.prey, &self.config);
        counts.food_consumed = Self::foraging_phase(&mut self.prey, &mut self.foods, &self.config);
        Self::survival_phase(&mut self.predators, self.config.predator_survival_fitness);
        Self::survival_phase(&mut self.prey, self.config.prey_survival_fitness);

        Ok(counts)
    }

    /// Perceive, think, move and metabolize, one agent at a time. Returns the
    /// number of agents that starved this tick.
    fn movement_phase(
        movers: &mut [AgentState],
        opponents: &[AgentState],
        config: &WorldConfig,
    ) -> Result<u32, SimError> {
        let mut starvations = 0;
        for agent in movers.iter_mut().filter(|agent| agent.alive) {
            let inputs = perceive(agent, opponents, config);
            let (outputs, next_state) =
                step_controller(&agent.genome, &inputs, &agent.controller)?;
            agent.controller = next_state;

            agent.velocity = Vec2::new(
                outputs[0] * config.max_speed,
                outputs[1] * config.max_speed,
            );
            agent.position = Vec2::new(
                wrap_coordinate(agent.position.x + agent.velocity.x, config.arena_width),
                wrap_coordinate(agent.position.y + agent.velocity.y, config.arena_height),
            );

            agent.energy -= config.energy_decay;
            if agent.energy <= 0.0 {
                agent.alive = false;
                starvations += 1;
            }
        }
        Ok(starvations)
    }

    /// A predator may catch any number of prey in one tick.
    fn predation_phase(
        predators: &mut [AgentState],
        prey: &mut [AgentState],
        config: &WorldConfig,
    ) -> u32 {
        let mut eaten = 0;
        for predator in predators.iter_mut().filter(|predator| predator.alive) {
            for victim in prey.iter_mut().filter(|victim| victim.alive) {
                if predator.position.distance(victim.position) < config.collision_distance {
                    victim.alive = false;
                    predator.energy += config.predator_eat_bonus;
                    predator.fitness += config.predation_fitness;
                    eaten += 1;
                }
            }
        }
        eaten
    }

    fn foraging_phase(
        prey: &mut [AgentState],
        foods: &mut [FoodState],
        config: &WorldConfig,
    ) -> u32 {
        let mut consumed = 0;
        for forager in prey.iter_mut().filter(|forager| forager.alive) {
            for food in foods.iter_mut().filter(|food| !food.consumed) {
                if forager.position.distance(food.position) < config.collision_distance {
                    food.consumed = true;
                    forager.energy += config.prey_food_energy;
                    forager.fitness += config.foraging_fitness;
                    consumed += 1;
                }
            }
        }
        consumed
    }

    fn survival_phase(population: &mut [AgentState], increment: f32) {
        for agent in population.iter_mut().filter(|agent| agent.alive) {
            agent.fitness += increment;
        }
    }
}
