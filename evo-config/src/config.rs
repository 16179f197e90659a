use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_WORLD_CONFIG_REL_PATH: &str = "default.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub num_predators: u32,
    pub num_prey: u32,
    #[serde(default = "default_food_count")]
    pub food_count: u32,
    pub steps_per_generation: u32,
    pub mutation_rate: f32,
    pub mutation_power: f32,
    pub elite_count: u32,
    #[serde(default = "default_initial_gene_scale")]
    pub initial_gene_scale: f32,
    pub collision_distance: f32,
    pub max_speed: f32,
    pub energy_decay: f32,
    pub initial_energy: f32,
    #[serde(default = "default_energy_sensor_scale")]
    pub energy_sensor_scale: f32,
    pub predator_eat_bonus: f32,
    pub prey_food_energy: f32,
    #[serde(default = "default_predation_fitness")]
    pub predation_fitness: f32,
    #[serde(default = "default_foraging_fitness")]
    pub foraging_fitness: f32,
    #[serde(default = "default_predator_survival_fitness")]
    pub predator_survival_fitness: f32,
    #[serde(default = "default_prey_survival_fitness")]
    pub prey_survival_fitness: f32,
}

impl WorldConfig {
    /// Normalization divisor for perceived distances.
    pub fn arena_extent(&self) -> f32 {
        self.arena_width.max(self.arena_height)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        default_world_config()
    }
}

pub fn world_config_from_toml_str(raw: &str) -> Result<WorldConfig, toml::de::Error> {
    toml::from_str(raw)
}

pub fn default_world_config() -> WorldConfig {
    world_config_from_toml_str(include_str!("../default.toml"))
        .expect("default world config TOML must deserialize")
}

pub fn default_world_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_WORLD_CONFIG_REL_PATH)
}

pub fn load_default_world_config() -> Result<WorldConfig> {
    load_world_config_from_path(&default_world_config_path())
}

pub fn load_world_config_from_path(path: &Path) -> Result<WorldConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read world config from {}", path.display()))?;
    world_config_from_toml_str(&raw)
        .context("world config TOML failed schema deserialization")
        .with_context(|| format!("failed to parse world config from {}", path.display()))
}

pub fn validate_world_config(config: &WorldConfig) -> Result<(), String> {
    if !config.arena_width.is_finite() || config.arena_width <= 0.0 {
        return Err("arena_width must be finite and greater than zero".to_owned());
    }
    if !config.arena_height.is_finite() || config.arena_height <= 0.0 {
        return Err("arena_height must be finite and greater than zero".to_owned());
    }
    if config.num_predators == 0 {
        return Err("num_predators must be greater than zero".to_owned());
    }
    if config.num_prey == 0 {
        return Err("num_prey must be greater than zero".to_owned());
    }
    if config.steps_per_generation == 0 {
        return Err("steps_per_generation must be greater than zero".to_owned());
    }
    if !(0.0..=1.0).contains(&config.mutation_rate) {
        return Err("mutation_rate must be within [0, 1]".to_owned());
    }
    if !config.mutation_power.is_finite() || config.mutation_power < 0.0 {
        return Err("mutation_power must be finite and >= 0".to_owned());
    }
    if !config.initial_gene_scale.is_finite() || config.initial_gene_scale < 0.0 {
        return Err("initial_gene_scale must be finite and >= 0".to_owned());
    }
    if !config.collision_distance.is_finite() || config.collision_distance <= 0.0 {
        return Err("collision_distance must be finite and greater than zero".to_owned());
    }
    if !config.max_speed.is_finite() || config.max_speed < 0.0 {
        return Err("max_speed must be finite and >= 0".to_owned());
    }
    if !config.energy_decay.is_finite() || config.energy_decay <= 0.0 {
        return Err("energy_decay must be finite and greater than zero".to_owned());
    }
    if !config.initial_energy.is_finite() || config.initial_energy <= 0.0 {
        return Err("initial_energy must be finite and greater than zero".to_owned());
    }
    if !config.energy_sensor_scale.is_finite() || config.energy_sensor_scale <= 0.0 {
        return Err("energy_sensor_scale must be finite and greater than zero".to_owned());
    }
    for (name, value) in [
        ("predator_eat_bonus", config.predator_eat_bonus),
        ("prey_food_energy", config.prey_food_energy),
        ("predation_fitness", config.predation_fitness),
        ("foraging_fitness", config.foraging_fitness),
        ("predator_survival_fitness", config.predator_survival_fitness),
        ("prey_survival_fitness", config.prey_survival_fitness),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be finite and >= 0"));
        }
    }
    Ok(())
}

fn default_food_count() -> u32 {
    50
}

fn default_initial_gene_scale() -> f32 {
    0.5
}

fn default_energy_sensor_scale() -> f32 {
    20.0
}

fn default_predation_fitness() -> f32 {
    5.0
}

fn default_foraging_fitness() -> f32 {
    2.0
}

fn default_predator_survival_fitness() -> f32 {
    0.01
}

fn default_prey_survival_fitness() -> f32 {
    0.02
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_default_parses_and_validates() {
        let cfg = default_world_config();
        assert_eq!(cfg.num_predators, 30);
        assert_eq!(cfg.num_prey, 50);
        assert_eq!(cfg.steps_per_generation, 1500);
        assert_eq!(cfg.elite_count, 8);
        assert!((cfg.energy_sensor_scale - 20.0).abs() < f32::EPSILON);
        assert!((cfg.arena_extent() - 1200.0).abs() < f32::EPSILON);
        validate_world_config(&cfg).expect("default config should validate");
    }

    #[test]
    fn file_on_disk_matches_bundled_default() {
        let from_disk = load_default_world_config().expect("load default.toml from disk");
        assert_eq!(from_disk, default_world_config());
    }

    #[test]
    fn config_roundtrip() {
        let cfg = WorldConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize config");
        let parsed: WorldConfig = serde_json::from_str(&json).expect("deserialize config");
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn explicit_energy_sensor_scale_is_kept() {
        let raw = include_str!("../default.toml").to_owned() + "energy_sensor_scale = 7.5\n";
        let cfg = world_config_from_toml_str(&raw).expect("parse config");
        assert!((cfg.energy_sensor_scale - 7.5).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let raw = r#"
            arena_width = 100.0
            arena_height = 50.0
            num_predators = 2
            num_prey = 3
            steps_per_generation = 10
            mutation_rate = 0.1
            mutation_power = 0.1
            elite_count = 1
            collision_distance = 4.0
            max_speed = 1.0
            energy_decay = 0.5
            initial_energy = 3.0
            predator_eat_bonus = 1.0
            prey_food_energy = 1.0
        "#;
        let cfg = world_config_from_toml_str(raw).expect("parse minimal config");
        assert_eq!(cfg.food_count, 50);
        assert!((cfg.energy_sensor_scale - 20.0).abs() < f32::EPSILON);
        assert!((cfg.prey_survival_fitness - 0.02).abs() < f32::EPSILON);
    }

    #[test]
    fn validation_names_the_offending_field() {
        let mut cfg = default_world_config();
        cfg.mutation_rate = 1.5;
        let err = validate_world_config(&cfg).expect_err("mutation_rate should be rejected");
        assert!(err.contains("mutation_rate"));

        let mut cfg = default_world_config();
        cfg.num_prey = 0;
        let err = validate_world_config(&cfg).expect_err("num_prey should be rejected");
        assert!(err.contains("num_prey"));

        let mut cfg = default_world_config();
        cfg.foraging_fitness = f32::NAN;
        let err = validate_world_config(&cfg).expect_err("NaN fitness should be rejected");
        assert!(err.contains("foraging_fitness"));
    }

    #[test]
    fn energy_decay_must_be_strictly_positive() {
        let mut cfg = default_world_config();
        cfg.energy_decay = 0.0;
        let err = validate_world_config(&cfg).expect_err("zero decay should be rejected");
        assert!(err.contains("energy_decay"));

        cfg.energy_decay = -0.1;
        assert!(validate_world_config(&cfg).is_err());

        cfg.energy_decay = 0.001;
        validate_world_config(&cfg).expect("small positive decay should validate");
    }
}
