use evo_config::default_world_config;
use evo_core::{compare_snapshots, Simulation};
use evo_types::{RenderSnapshot, WorldConfig};
use std::cmp::Ordering;

fn short_generation_config() -> WorldConfig {
    WorldConfig {
        steps_per_generation: 60,
        ..default_world_config()
    }
}

#[test]
fn seed42_runs_are_reproducible_across_generations() {
    let mut a = Simulation::new(short_generation_config(), 42).expect("simulation A");
    let mut b = Simulation::new(short_generation_config(), 42).expect("simulation B");

    let summaries_a = a.run_generations(3).expect("run A");
    let summaries_b = b.run_generations(3).expect("run B");

    assert_eq!(summaries_a, summaries_b);
    assert_eq!(compare_snapshots(&a.snapshot(), &b.snapshot()), Ordering::Equal);
    assert_eq!(a.generation(), 4);
}

#[test]
fn default_populations_survive_generation_boundaries() {
    let config = short_generation_config();
    let mut sim = Simulation::new(config.clone(), 7).expect("simulation init");

    for summary in sim.run_generations(2).expect("run") {
        assert!(summary.avg_predator_fitness >= 0.0);
        assert!(summary.max_prey_fitness >= summary.avg_prey_fitness);
        assert!(summary.prey_eaten <= config.num_prey);
    }

    assert_eq!(sim.predators().len(), config.num_predators as usize);
    assert_eq!(sim.prey().len(), config.num_prey as usize);
    for agent in sim.predators().iter().chain(sim.prey()) {
        assert!((0.0..config.arena_width).contains(&agent.position.x));
        assert!((0.0..config.arena_height).contains(&agent.position.y));
    }
}

#[test]
fn exported_trace_replays_positions_inside_arena() {
    let config = short_generation_config();
    let mut sim = Simulation::new(config.clone(), 42).expect("simulation init");
    let lines = sim.export_trace_jsonl(80).expect("export");

    assert_eq!(lines.len(), 81);
    let last: RenderSnapshot =
        serde_json::from_str(lines.last().expect("last line")).expect("parse");
    assert_eq!(last.generation, 2);
    assert_eq!(last.tick, 20);
    for marker in last.predators.iter().chain(&last.prey) {
        assert!((0.0..config.arena_width).contains(&marker.position.x));
        assert!((0.0..config.arena_height).contains(&marker.position.y));
    }
}
