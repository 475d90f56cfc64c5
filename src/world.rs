use bevy::color::palettes::css::{GREEN, WHITE, YELLOW};
use bevy::log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{BehaviourKind, SimulationConfig, WorldConfig};
use crate::debug::DebugSurface;
use crate::math::{self, CartesianLimits, MutVector2D, PolarRange, Vector2D, VectorError};
use crate::movement::{
    AgentId, AgentLookup, AgentSnapshot, Arrival, Evade, Flee, PhysicalParams, Pursuit, Seek,
    SteeringBehaviour, SteeringError, Wander,
};

pub mod plugin;

pub use plugin::{SimulationWorld, SteeringWorldPlugin};

const AGENT_RADIUS: f64 = 5.0;
const DEFAULT_HEALTH: i64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: MutVector2D,
    pub velocity: MutVector2D,
    pub params: PhysicalParams,
    pub health: i64,
}

impl Agent {
    pub fn new(position: Vector2D, velocity: Vector2D, params: PhysicalParams) -> Self {
        Self {
            position: position.into(),
            velocity: velocity.into(),
            params,
            health: DEFAULT_HEALTH,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::new(self.position.get(), self.velocity.get())
    }

    /// Applies a steering force: `force` is clamped to `max_force` and scaled
    /// by `1 / mass`, then the velocity is clamped to `max_velocity`, moved
    /// along, damped by friction and the position is wrapped into the world.
    fn integrate(&mut self, force: Vector2D, width: f64, height: f64) -> Result<(), VectorError> {
        let params = self.params;
        let steering = math::truncate(force, params.max_force).divide(params.mass)?;

        let velocity = math::truncate(self.velocity.get() + steering, params.max_velocity);
        self.velocity.set_to(velocity);

        self.position += velocity;
        self.velocity *= params.friction;
        self.position.wrap(width, height)
    }
}

struct Driver {
    agent: AgentId,
    behaviour: Box<dyn SteeringBehaviour>,
}

/// What happened during a single [`World::tick`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub steered: usize,
    pub failed: usize,
}

/// A toroidal grid populated by agents, each driven by any number of steering
/// behaviours.
pub struct World {
    config: WorldConfig,
    agents: Vec<Agent>,
    drivers: Vec<Driver>,
}

impl AgentLookup for Vec<Agent> {
    fn agent(&self, id: AgentId) -> Option<AgentSnapshot> {
        self.get(id.0)
            .filter(|agent| agent.is_alive())
            .map(Agent::snapshot)
    }
}

impl AgentLookup for World {
    fn agent(&self, id: AgentId) -> Option<AgentSnapshot> {
        self.agents.agent(id)
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            agents: Vec::new(),
            drivers: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.config.width()
    }

    pub fn height(&self) -> f64 {
        self.config.height()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn spawn(
        &mut self,
        position: Vector2D,
        velocity: Vector2D,
        params: PhysicalParams,
    ) -> AgentId {
        let id = AgentId(self.agents.len());
        self.agents.push(Agent::new(position, velocity, params));
        id
    }

    /// Binds `behaviour` to `agent` and lets it steer the agent every tick.
    pub fn attach(
        &mut self,
        agent: AgentId,
        mut behaviour: Box<dyn SteeringBehaviour>,
    ) -> Result<(), SteeringError> {
        if agent.0 >= self.agents.len() {
            return Err(SteeringError::UnknownAgent(agent));
        }

        behaviour.bind(agent);
        debug!("attached {} behaviour to agent {}", behaviour.name(), agent);
        self.drivers.push(Driver { agent, behaviour });
        Ok(())
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &Agent)> {
        self.agents
            .iter()
            .enumerate()
            .map(|(idx, agent)| (AgentId(idx), agent))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.is_alive()).count()
    }

    /// Lowers an agent's health. Returns `true` if the agent died from it.
    pub fn damage(&mut self, id: AgentId, amount: i64) -> Result<bool, SteeringError> {
        let agent = self
            .agents
            .get_mut(id.0)
            .ok_or(SteeringError::UnknownAgent(id))?;

        let was_alive = agent.is_alive();
        agent.health -= amount;

        let died = was_alive && !agent.is_alive();
        if died {
            debug!("agent {} died", id);
        }
        Ok(died)
    }

    /// Advances the simulation by one step.
    ///
    /// Every behaviour sees the agents as they were at the start of the tick.
    /// A behaviour that fails is logged and its agent skips the tick.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let mut forces = vec![Vector2D::ZERO; self.agents.len()];
        let mut skipped = vec![false; self.agents.len()];

        for driver in &mut self.drivers {
            if self.agents.agent(driver.agent).is_none() {
                continue;
            }

            match driver.behaviour.process(&self.agents) {
                Ok(force) => {
                    forces[driver.agent.0] = forces[driver.agent.0] + force;
                    report.steered += 1;
                }
                Err(err) => {
                    warn!(
                        "{} behaviour of agent {} failed: {}",
                        driver.behaviour.name(),
                        driver.agent,
                        err
                    );
                    skipped[driver.agent.0] = true;
                    report.failed += 1;
                }
            }
        }

        let (width, height) = (self.width(), self.height());
        for (idx, (agent, force)) in self.agents.iter_mut().zip(forces).enumerate() {
            if !agent.is_alive() || skipped[idx] {
                continue;
            }

            if let Err(err) = agent.integrate(force, width, height) {
                warn!("could not move agent {}: {}", AgentId(idx), err);
                report.failed += 1;
            }
        }

        report
    }

    /// Spawns the agents listed in `config` at random positions and headings.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<usize, SteeringError> {
        let first = self.agents.len();
        let limits = CartesianLimits {
            x_limit: self.width(),
            y_limit: self.height(),
        };
        let headings = PolarRange {
            speed_min: 0.0,
            speed_max: config.physics.max_velocity,
            ..PolarRange::FULL_TURN_UNIT
        };

        let kinds = config
            .agents
            .iter()
            .flat_map(|spawn| std::iter::repeat(spawn.behaviour).take(spawn.count as usize))
            .collect::<Vec<_>>();

        for _ in &kinds {
            let position = Vector2D::random_cartesian(rng, limits);
            let velocity = Vector2D::random_polar(rng, headings).to_cartesian();
            self.spawn(position, velocity, config.physics);
        }

        for (offset, kind) in kinds.iter().enumerate() {
            let behaviour = build_behaviour(*kind, first, config, rng);
            self.attach(AgentId(first + offset), behaviour)?;
        }

        Ok(kinds.len())
    }

    /// Draws the grid, every live agent and the behaviours' own overlays.
    pub fn debug_draw(&self, surface: &mut dyn DebugSurface) {
        let (width, height) = (self.width(), self.height());
        let grid = self.config.grid_size;

        for col in 0..=self.config.columns {
            let x = col as f64 * grid;
            surface.line(Vector2D::new(x, 0.0), Vector2D::new(x, height), GREEN.into());
        }
        for row in 0..=self.config.rows {
            let y = row as f64 * grid;
            surface.line(Vector2D::new(0.0, y), Vector2D::new(width, y), GREEN.into());
        }

        for agent in self.agents.iter().filter(|agent| agent.is_alive()) {
            let position = agent.position.get();
            surface.circle(position, AGENT_RADIUS, WHITE.into());
            surface.line(
                position,
                position.add_scaled(agent.velocity.get(), 10.0),
                YELLOW.into(),
            );
        }

        for driver in &self.drivers {
            if self.agents.agent(driver.agent).is_some() {
                driver.behaviour.debug_draw(surface);
            }
        }
    }
}

fn build_behaviour<R: Rng + ?Sized>(
    kind: BehaviourKind,
    first: usize,
    config: &SimulationConfig,
    rng: &mut R,
) -> Box<dyn SteeringBehaviour> {
    let max_speed = config.physics.max_velocity;

    match kind {
        BehaviourKind::Wander => {
            let seeded = StdRng::seed_from_u64(rng.gen());
            Box::new(Wander::new(config.wander, seeded))
        }
        BehaviourKind::Seek { target } => Box::new(Seek::with_target(target)),
        BehaviourKind::Flee {
            target,
            velocity_damping: false,
        } => Box::new(Flee::new(target)),
        BehaviourKind::Flee {
            target,
            velocity_damping: true,
        } => Box::new(Flee::with_velocity_damping(target)),
        BehaviourKind::Arrival {
            target,
            slowing_radius,
        } => Box::new(Arrival::new(target, slowing_radius)),
        BehaviourKind::Pursuit { target } => {
            Box::new(Pursuit::new(AgentId(first + target), max_speed))
        }
        BehaviourKind::Evade { target } => Box::new(Evade::new(AgentId(first + target), max_speed)),
    }
}
