use evo_types::{AgentState, Vec2, WorldConfig, INPUT_SIZE};

const BEARING_EPSILON: f32 = 1e-4;

/// Nearest live agent in `targets`, as (distance, offset from `from`).
/// The first of several equidistant targets wins.
pub(crate) fn nearest_live_target(from: Vec2, targets: &[AgentState]) -> Option<(f32, Vec2)> {
    let mut best: Option<(f32, Vec2)> = None;
    for target in targets.iter().filter(|target| target.alive) {
        let dist = from.distance(target.position);
        if best.map_or(true, |(best_dist, _)| dist < best_dist) {
            let offset = Vec2::new(target.position.x - from.x, target.position.y - from.y);
            best = Some((dist, offset));
        }
    }
    best
}

/// Controller inputs: normalized distance, unit bearing, normalized energy.
/// With no live target the distance and bearing are all zero.
pub(crate) fn perceive(
    agent: &AgentState,
    targets: &[AgentState],
    config: &WorldConfig,
) -> [f32; INPUT_SIZE] {
    let (dist, offset) = nearest_live_target(agent.position, targets).unwrap_or((0.0, Vec2::ZERO));
    let len = offset.x.hypot(offset.y) + BEARING_EPSILON;
    [
        dist / config.arena_extent(),
        offset.x / len,
        offset.y / len,
        agent.energy / config.energy_sensor_scale,
    ]
}
