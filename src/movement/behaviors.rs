use bevy::color::palettes::css::{ORANGE, RED};
use bevy::log::trace;

use crate::debug::DebugSurface;
use crate::math::Vector2D;

use super::steering::{
    bound_agent, steer_flee, steer_seek, AgentId, AgentLookup, SteeringAgent, SteeringBehaviour,
    SteeringError,
};

/// Seeks the specified target moving directly towards it.
///
/// The target can be moved between ticks with [`Seek::set_target`]. Processing
/// without a target fails with [`SteeringError::NoTarget`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Seek {
    target: Option<Vector2D>,
    agent: Option<AgentId>,
}

impl Seek {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(target: Vector2D) -> Self {
        Self {
            target: Some(target),
            agent: None,
        }
    }

    pub fn set_target(&mut self, target: Vector2D) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<Vector2D> {
        self.target
    }
}

impl SteeringBehaviour for Seek {
    fn name(&self) -> &'static str {
        "seek"
    }

    fn bind(&mut self, agent: AgentId) {
        self.agent = Some(agent);
    }

    fn bound(&self) -> Option<AgentId> {
        self.agent
    }

    fn process(&mut self, agents: &dyn AgentLookup) -> Result<Vector2D, SteeringError> {
        let (_, agent) = bound_agent(&*self, agents)?;
        let target = self.target.ok_or(SteeringError::NoTarget {
            behaviour: self.name(),
        })?;

        Ok(steer_seek(&agent, target))
    }

    fn debug_draw(&self, surface: &mut dyn DebugSurface) {
        if let Some(target) = self.target {
            surface.point(target, RED.into());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Damping {
    /// A velocity captured at construction and never refreshed.
    Captured(Vector2D),
    /// The bound agent's velocity at the time of processing.
    AgentVelocity,
}

/// Flees from a fixed target moving away from it.
/// Works the same way as [`Seek`] but the direction is inverted.
///
/// By default the damping term is a velocity captured when the behaviour is
/// created, which is always zero, so the result is a plain unit vector pointing
/// away from the target. [`Flee::with_velocity_damping`] subtracts the agent's
/// actual velocity instead, mirroring [`Seek`].
#[derive(Debug, Clone, PartialEq)]
pub struct Flee {
    target: Vector2D,
    damping: Damping,
    agent: Option<AgentId>,
}

impl Flee {
    pub fn new(target: Vector2D) -> Self {
        Self {
            target,
            damping: Damping::Captured(Vector2D::ZERO),
            agent: None,
        }
    }

    pub fn with_velocity_damping(target: Vector2D) -> Self {
        Self {
            damping: Damping::AgentVelocity,
            ..Self::new(target)
        }
    }

    pub fn target(&self) -> Vector2D {
        self.target
    }
}

impl SteeringBehaviour for Flee {
    fn name(&self) -> &'static str {
        "flee"
    }

    fn bind(&mut self, agent: AgentId) {
        self.agent = Some(agent);
    }

    fn bound(&self) -> Option<AgentId> {
        self.agent
    }

    fn process(&mut self, agents: &dyn AgentLookup) -> Result<Vector2D, SteeringError> {
        let (_, agent) = bound_agent(&*self, agents)?;
        let damping = match self.damping {
            Damping::Captured(velocity) => velocity,
            Damping::AgentVelocity => agent.velocity(),
        };

        Ok(steer_flee(&agent, self.target, damping))
    }
}

/// Moves towards the specified target slowing down gradually as the agent is
/// getting closer. The slowing starts when the agent is within circle with radius
/// `slowing_radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub target: Vector2D,
    pub slowing_radius: f64,
    agent: Option<AgentId>,
}

impl Arrival {
    pub const DEFAULT_SLOWING_RADIUS: f64 = 50.0;

    pub fn new(target: Vector2D, slowing_radius: f64) -> Self {
        Self {
            target,
            slowing_radius,
            agent: None,
        }
    }
}

impl SteeringBehaviour for Arrival {
    fn name(&self) -> &'static str {
        "arrival"
    }

    fn bind(&mut self, agent: AgentId) {
        self.agent = Some(agent);
    }

    fn bound(&self) -> Option<AgentId> {
        self.agent
    }

    fn process(&mut self, agents: &dyn AgentLookup) -> Result<Vector2D, SteeringError> {
        let (_, agent) = bound_agent(&*self, agents)?;
        let distance = agent.position().distance(self.target);
        let direction = agent.position().direction_to(self.target);

        let desired = if distance < self.slowing_radius {
            direction * (distance / self.slowing_radius)
        } else {
            direction
        };

        Ok(desired - agent.velocity())
    }

    fn debug_draw(&self, surface: &mut dyn DebugSurface) {
        surface.circle(self.target, self.slowing_radius, ORANGE.into());
        surface.point(self.target, RED.into());
    }
}

/// Where `target` will be once `pursuer` covers the distance between them at
/// `max_speed`.
fn predict_position(pursuer: Vector2D, target: &impl SteeringAgent, max_speed: f64) -> Vector2D {
    if max_speed <= 0.0 {
        return target.position();
    }

    let updates_ahead = pursuer.distance(target.position()) / max_speed;
    target.position().add_scaled(target.velocity(), updates_ahead)
}

/// Moves towards future position of the target agent, predicting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pursuit {
    pub target: AgentId,
    pub max_speed: f64,
    agent: Option<AgentId>,
    predicted: Option<Vector2D>,
}

impl Pursuit {
    pub fn new(target: AgentId, max_speed: f64) -> Self {
        Self {
            target,
            max_speed,
            agent: None,
            predicted: None,
        }
    }

    pub fn predicted(&self) -> Option<Vector2D> {
        self.predicted
    }
}

impl SteeringBehaviour for Pursuit {
    fn name(&self) -> &'static str {
        "pursuit"
    }

    fn bind(&mut self, agent: AgentId) {
        self.agent = Some(agent);
    }

    fn bound(&self) -> Option<AgentId> {
        self.agent
    }

    fn process(&mut self, agents: &dyn AgentLookup) -> Result<Vector2D, SteeringError> {
        let (id, agent) = bound_agent(&*self, agents)?;
        let target = agents.resolve(self.target)?;

        let future = predict_position(agent.position(), &target, self.max_speed);
        trace!("{} pursues {} towards {}", id, self.target, future);
        self.predicted = Some(future);

        Ok(steer_seek(&agent, future))
    }

    fn debug_draw(&self, surface: &mut dyn DebugSurface) {
        if let Some(predicted) = self.predicted {
            surface.point(predicted, RED.into());
        }
    }
}

/// Moves away from the target agent with prediction of its future position.
#[derive(Debug, Clone, PartialEq)]
pub struct Evade {
    pub target: AgentId,
    pub max_speed: f64,
    agent: Option<AgentId>,
    predicted: Option<Vector2D>,
}

impl Evade {
    pub fn new(target: AgentId, max_speed: f64) -> Self {
        Self {
            target,
            max_speed,
            agent: None,
            predicted: None,
        }
    }

    pub fn predicted(&self) -> Option<Vector2D> {
        self.predicted
    }
}

impl SteeringBehaviour for Evade {
    fn name(&self) -> &'static str {
        "evade"
    }

    fn bind(&mut self, agent: AgentId) {
        self.agent = Some(agent);
    }

    fn bound(&self) -> Option<AgentId> {
        self.agent
    }

    fn process(&mut self, agents: &dyn AgentLookup) -> Result<Vector2D, SteeringError> {
        let (_, agent) = bound_agent(&*self, agents)?;
        let target = agents.resolve(self.target)?;

        let future = predict_position(agent.position(), &target, self.max_speed);
        self.predicted = Some(future);

        Ok(steer_flee(&agent, future, agent.velocity()))
    }

    fn debug_draw(&self, surface: &mut dyn DebugSurface) {
        if let Some(predicted) = self.predicted {
            surface.point(predicted, ORANGE.into());
        }
    }
}
