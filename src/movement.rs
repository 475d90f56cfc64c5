use serde::{Deserialize, Serialize};

pub mod behaviors;
pub mod steering;
pub mod wander;

pub use behaviors::{Arrival, Evade, Flee, Pursuit, Seek};
pub use steering::{
    AgentId, AgentLookup, AgentSnapshot, SteeringAgent, SteeringBehaviour, SteeringError,
};
pub use wander::{Jitter, Wander, WanderConfig};

/// Limits applied when a steering force is integrated into an agent's motion.
/// All values are per simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalParams {
    /// Upper bound for an agent's speed, in world units per tick.
    /// Defaults to `2.0`.
    pub max_velocity: f64,
    /// Stores the maximum impulse of a steering force applied to an agent via a steering
    /// behavior. Set this value lower than `max_velocity` to achieve smooth acceleration.
    /// Defaults to `0.5`.
    pub max_force: f64,
    /// Determines how much inertia an agent will have. Must be positive.
    /// Defaults to `4.0`.
    pub mass: f64,
    /// Determines how fast an agent will decelerate. Lower values mean faster deceleration.
    /// Should be in range [0, 1] where 0 - instant stop, 1 - no deceleration at all.
    /// Defaults to `0.98`.
    pub friction: f64,
}

impl Default for PhysicalParams {
    fn default() -> Self {
        Self {
            max_velocity: 2.0,
            max_force: 0.5,
            mass: 4.0,
            friction: 0.98,
        }
    }
}
