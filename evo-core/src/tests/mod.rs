pub(super) use super::*;
pub(super) use evo_types::{
    AgentKind, ControllerState, Genome, Vec2, GATE_BLOCK_LEN, GENOME_LEN, HIDDEN_SIZE, INPUT_SIZE,
};
pub(super) use rand::SeedableRng;
pub(super) use rand_chacha::ChaCha8Rng;

mod support;
