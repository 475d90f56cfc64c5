use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::debug::DebugSurface;
use crate::math::{Vector2D, VectorError};

/// Non-owning handle to an agent, i.e. its index in the agent collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SteeringError {
    #[error("{behaviour} behaviour is not bound to an agent")]
    NotBound { behaviour: &'static str },
    #[error("{behaviour} behaviour has no target")]
    NoTarget { behaviour: &'static str },
    #[error("Agent {0} does not exist")]
    UnknownAgent(AgentId),
    #[error(transparent)]
    Vector(#[from] VectorError),
}

pub trait SteeringAgent {
    fn position(&self) -> Vector2D;
    fn velocity(&self) -> Vector2D {
        Vector2D::ZERO
    }
}

impl SteeringAgent for Vector2D {
    fn position(&self) -> Vector2D {
        *self
    }
}

/// Read-only state of an agent at the start of a tick.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl AgentSnapshot {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }
}

impl SteeringAgent for AgentSnapshot {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn velocity(&self) -> Vector2D {
        self.velocity
    }
}

/// Resolves agent handles into snapshots.
pub trait AgentLookup {
    fn agent(&self, id: AgentId) -> Option<AgentSnapshot>;

    fn resolve(&self, id: AgentId) -> Result<AgentSnapshot, SteeringError> {
        self.agent(id).ok_or(SteeringError::UnknownAgent(id))
    }
}

impl AgentLookup for Vec<AgentSnapshot> {
    fn agent(&self, id: AgentId) -> Option<AgentSnapshot> {
        self.get(id.0).copied()
    }
}

/// A steering algorithm bound to a single agent.
///
/// `process` returns a steering force. Integrating it into the agent's
/// velocity and position is left to the caller, and implementations only ever
/// read agent state through the supplied [`AgentLookup`].
pub trait SteeringBehaviour: Send + Sync {
    fn name(&self) -> &'static str;

    /// Associates the behaviour with `agent`, replacing any previous binding.
    fn bind(&mut self, agent: AgentId);

    fn bound(&self) -> Option<AgentId>;

    fn process(&mut self, agents: &dyn AgentLookup) -> Result<Vector2D, SteeringError>;

    /// Renders the behaviour's internal geometry.
    fn debug_draw(&self, _surface: &mut dyn DebugSurface) {}
}

/// Resolves the agent a behaviour is bound to.
pub(crate) fn bound_agent(
    behaviour: &dyn SteeringBehaviour,
    agents: &dyn AgentLookup,
) -> Result<(AgentId, AgentSnapshot), SteeringError> {
    let id = behaviour.bound().ok_or(SteeringError::NotBound {
        behaviour: behaviour.name(),
    })?;

    Ok((id, agents.resolve(id)?))
}

/// Unit vector from `agent` towards `target`, minus the agent's velocity.
pub fn steer_seek(agent: &impl SteeringAgent, target: Vector2D) -> Vector2D {
    agent.position().direction_to(target) - agent.velocity()
}

/// Unit vector from `target` towards `agent`, minus `damping`.
pub fn steer_flee(agent: &impl SteeringAgent, target: Vector2D, damping: Vector2D) -> Vector2D {
    target.direction_to(agent.position()) - damping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_known_agents_only() {
        let agents = vec![AgentSnapshot::new(Vector2D::new(1.0, 2.0), Vector2D::ZERO)];

        assert_eq!(agents.resolve(AgentId(0)).unwrap().position, Vector2D::new(1.0, 2.0));
        assert_eq!(
            agents.resolve(AgentId(3)),
            Err(SteeringError::UnknownAgent(AgentId(3)))
        );
    }

    #[test]
    fn seek_subtracts_velocity() {
        let agent = AgentSnapshot::new(Vector2D::ZERO, Vector2D::new(0.5, 0.5));
        let force = steer_seek(&agent, Vector2D::new(0.0, 10.0));
        assert!(force.roughly_equals(Vector2D::new(-0.5, 0.5), 1e-9));
    }

    #[test]
    fn static_point_has_no_velocity() {
        let p = Vector2D::new(4.0, 4.0);
        assert_eq!(SteeringAgent::position(&p), p);
        assert_eq!(p.velocity(), Vector2D::ZERO);
    }
}
