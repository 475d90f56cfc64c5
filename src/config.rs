use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vector2D;
use crate::movement::{Arrival, PhysicalParams, WanderConfig};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not load config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Size of the grid the agents live on. The world wraps around at its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub columns: u32,
    pub rows: u32,
    /// Size of a single grid cell in world units.
    pub grid_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: 16,
            rows: 12,
            grid_size: 50.0,
        }
    }
}

impl WorldConfig {
    pub fn width(&self) -> f64 {
        self.columns as f64 * self.grid_size
    }

    pub fn height(&self) -> f64 {
        self.rows as f64 * self.grid_size
    }
}

fn default_slowing_radius() -> f64 {
    Arrival::DEFAULT_SLOWING_RADIUS
}

/// Steering behaviour attached to freshly spawned agents. `Pursuit` and
/// `Evade` refer to other agents by spawn order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviourKind {
    Wander,
    Seek {
        target: Vector2D,
    },
    Flee {
        target: Vector2D,
        #[serde(default)]
        velocity_damping: bool,
    },
    Arrival {
        target: Vector2D,
        #[serde(default = "default_slowing_radius")]
        slowing_radius: f64,
    },
    Pursuit {
        target: usize,
    },
    Evade {
        target: usize,
    },
}

fn invalid(msg: String) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg))
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpawn {
    #[serde(default = "default_count")]
    pub count: u32,
    pub behaviour: BehaviourKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub physics: PhysicalParams,
    pub wander: WanderConfig,
    /// Fixes every random choice of the simulation when set.
    pub seed: Option<u64>,
    pub agents: Vec<AgentSpawn>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            physics: PhysicalParams::default(),
            wander: WanderConfig::default(),
            seed: None,
            agents: vec![AgentSpawn {
                count: 12,
                behaviour: BehaviourKind::Wander,
            }],
        }
    }
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.iter().map(|spawn| spawn.count as usize).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.columns == 0 || self.world.rows == 0 || self.world.grid_size <= 0.0 {
            return invalid(format!("world must not be empty: {:?}", self.world));
        }

        let physics = &self.physics;
        if physics.mass <= 0.0 {
            return invalid(format!("mass must be positive, got {}", physics.mass));
        }
        if physics.max_velocity < 0.0 || physics.max_force < 0.0 {
            return invalid("velocity and force limits must not be negative".to_string());
        }
        if !(0.0..=1.0).contains(&physics.friction) {
            return invalid(format!("friction must be in [0, 1], got {}", physics.friction));
        }

        let wander = &self.wander;
        if wander.wander_radius < 0.0 || wander.wander_distance < 0.0 || wander.angle_jitter < 0.0
        {
            return invalid(format!("wander settings must not be negative: {:?}", wander));
        }

        let total = self.agent_count();
        for spawn in &self.agents {
            match spawn.behaviour {
                BehaviourKind::Pursuit { target } | BehaviourKind::Evade { target }
                    if target >= total =>
                {
                    return invalid(format!(
                        "{:?} refers to agent {} but only {} are spawned",
                        spawn.behaviour, target, total
                    ));
                }
                BehaviourKind::Arrival { slowing_radius, .. } if slowing_radius <= 0.0 => {
                    return invalid(format!(
                        "slowing radius must be positive, got {}",
                        slowing_radius
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
