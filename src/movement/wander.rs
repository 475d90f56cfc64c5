use bevy::color::palettes::css::{GREEN, WHITE};
use bevy::log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::debug::DebugSurface;
use crate::math::{MutVector2D, PolarRange, Vector2D};

use super::behaviors::Seek;
use super::steering::{bound_agent, AgentId, AgentLookup, SteeringBehaviour, SteeringError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Radius of the circle the seek point drifts around.
    pub wander_radius: f64,
    /// The circle is projected twice this far ahead of the agent.
    pub wander_distance: f64,
    /// Maximum rotation of the jitter direction per tick, in degrees.
    pub angle_jitter: f64,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            wander_radius: 25.0,
            wander_distance: 25.0,
            angle_jitter: 5.0,
        }
    }
}

/// Unit direction on the wander circle. It is rotated by a small random angle
/// every tick instead of being redrawn, so consecutive seek points stay close
/// to each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Jitter {
    direction: MutVector2D,
}

impl Jitter {
    pub fn new(direction: Vector2D) -> Self {
        Self {
            direction: direction.into(),
        }
    }

    /// Random unit direction.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Vector2D::random_polar(rng, PolarRange::FULL_TURN_UNIT).to_cartesian())
    }

    pub fn direction(&self) -> Vector2D {
        self.direction.get()
    }

    /// Renormalises and rotates by an angle drawn from `[-max_degrees, max_degrees]`.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, max_degrees: f64) {
        let degrees = (rng.gen::<f64>() * 2.0 - 1.0) * max_degrees;

        self.direction.normalise();
        self.direction.rotate(degrees.to_radians());
    }
}

/// Wanders around by seeking a point that drifts along a circle projected
/// ahead of the agent.
///
/// Each tick the circle center is placed `2 * wander_distance` along the
/// agent's heading, the [`Jitter`] direction is nudged, and an inner [`Seek`]
/// is pointed at `center + jitter * wander_radius`. An agent standing still
/// has no heading, in which case the circle sits on the agent itself.
///
/// The random source is owned by the behaviour, so a seeded RNG gives a
/// repeatable path.
#[derive(Debug, Clone)]
pub struct Wander<R = StdRng> {
    config: WanderConfig,
    jitter: Jitter,
    seek: Seek,
    rng: R,
    agent: Option<AgentId>,
    circle_center: Option<Vector2D>,
    seek_target: Option<Vector2D>,
}

impl Wander<StdRng> {
    pub fn seeded(config: WanderConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Wander<R> {
    pub fn new(config: WanderConfig, mut rng: R) -> Self {
        let jitter = Jitter::random(&mut rng);

        Self {
            config,
            jitter,
            seek: Seek::new(),
            rng,
            agent: None,
            circle_center: None,
            seek_target: None,
        }
    }

    /// Replaces the current jitter state.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn config(&self) -> &WanderConfig {
        &self.config
    }

    pub fn jitter(&self) -> &Jitter {
        &self.jitter
    }

    /// Circle center computed by the last tick.
    pub fn circle_center(&self) -> Option<Vector2D> {
        self.circle_center
    }

    /// Point the last tick steered towards.
    pub fn seek_target(&self) -> Option<Vector2D> {
        self.seek_target
    }
}

impl<R: Rng + Send + Sync> SteeringBehaviour for Wander<R> {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn bind(&mut self, agent: AgentId) {
        self.agent = Some(agent);
        self.seek.bind(agent);
    }

    fn bound(&self) -> Option<AgentId> {
        self.agent
    }

    fn process(&mut self, agents: &dyn AgentLookup) -> Result<Vector2D, SteeringError> {
        let (id, agent) = bound_agent(&*self, agents)?;

        let mut ahead = MutVector2D::from(agent.velocity);
        ahead.normalise();
        ahead *= self.config.wander_distance * 2.0;
        let center = agent.position + ahead.get();

        self.jitter.step(&mut self.rng, self.config.angle_jitter);
        let target = center.add_scaled(self.jitter.direction(), self.config.wander_radius);

        self.circle_center = Some(center);
        self.seek_target = Some(target);
        trace!("{} wanders towards {}", id, target);

        self.seek.set_target(target);
        self.seek.bind(id);
        self.seek.process(agents)
    }

    fn debug_draw(&self, surface: &mut dyn DebugSurface) {
        if let Some(center) = self.circle_center {
            surface.circle(center, self.config.wander_radius, WHITE.into());
        }
        if let Some(target) = self.seek_target {
            surface.point(target, GREEN.into());
        }
        self.seek.debug_draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::super::steering::AgentSnapshot;
    use super::*;
    use crate::debug::{DebugLog, DrawCommand};

    const EPS: f64 = 1e-9;

    fn still_jitter() -> WanderConfig {
        WanderConfig {
            angle_jitter: 0.0,
            ..Default::default()
        }
    }

    fn heading_right() -> Vec<AgentSnapshot> {
        vec![AgentSnapshot::new(Vector2D::ZERO, Vector2D::new(1.0, 0.0))]
    }

    #[test]
    fn circle_is_projected_ahead() {
        let agents = heading_right();
        let mut wander =
            Wander::seeded(still_jitter(), 1).with_jitter(Jitter::new(Vector2D::new(0.0, 1.0)));
        wander.bind(AgentId(0));

        let force = wander.process(&agents).unwrap();

        assert_eq!(wander.circle_center(), Some(Vector2D::new(50.0, 0.0)));
        let target = wander.seek_target().unwrap();
        assert!(target.roughly_equals(Vector2D::new(50.0, 25.0), EPS));

        let expected = Vector2D::new(50.0, 25.0).normalise() - Vector2D::new(1.0, 0.0);
        assert!(force.roughly_equals(expected, EPS));
    }

    #[test]
    fn zero_jitter_is_repeatable() {
        let agents = heading_right();
        let mut wander = Wander::seeded(still_jitter(), 99);
        wander.bind(AgentId(0));

        let first = wander.process(&agents).unwrap();
        let first_target = wander.seek_target().unwrap();
        for _ in 0..10 {
            let next = wander.process(&agents).unwrap();
            assert!(next.roughly_equals(first, EPS));
            assert!(wander.seek_target().unwrap().roughly_equals(first_target, EPS));
        }
    }

    #[test]
    fn same_seed_gives_same_path() {
        let agents = heading_right();
        let mut a = Wander::seeded(WanderConfig::default(), 1234);
        let mut b = Wander::seeded(WanderConfig::default(), 1234);
        a.bind(AgentId(0));
        b.bind(AgentId(0));

        for _ in 0..25 {
            assert_eq!(a.process(&agents).unwrap(), b.process(&agents).unwrap());
        }
    }

    #[test]
    fn jitter_drifts_smoothly() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut jitter = Jitter::new(Vector2D::new(1.0, 0.0));

        for _ in 0..50 {
            let before = jitter.direction();
            jitter.step(&mut rng, 5.0);
            let after = jitter.direction();

            assert!((after.magnitude() - 1.0).abs() < EPS);
            let turned = before.scalar_product(after).clamp(-1.0, 1.0).acos();
            assert!(turned <= 5f64.to_radians() + EPS);
        }
    }

    #[test]
    fn standing_agent_circles_itself() {
        let agents = vec![AgentSnapshot::new(Vector2D::new(7.0, 3.0), Vector2D::ZERO)];
        let mut wander = Wander::seeded(WanderConfig::default(), 3);
        wander.bind(AgentId(0));

        let force = wander.process(&agents).unwrap();

        assert_eq!(wander.circle_center(), Some(Vector2D::new(7.0, 3.0)));
        let offset = wander.seek_target().unwrap() - Vector2D::new(7.0, 3.0);
        assert!((offset.magnitude() - 25.0).abs() < 1e-6);
        assert!((force.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unbound_wander_fails() {
        let mut wander = Wander::seeded(WanderConfig::default(), 0);
        assert_eq!(
            wander.process(&heading_right()),
            Err(SteeringError::NotBound { behaviour: "wander" })
        );
        assert_eq!(wander.circle_center(), None);
    }

    #[test]
    fn debug_draw_shows_circle_and_target() {
        let mut log = DebugLog::default();
        let mut wander =
            Wander::seeded(still_jitter(), 1).with_jitter(Jitter::new(Vector2D::new(0.0, 1.0)));

        wander.debug_draw(&mut log);
        assert!(log.commands.is_empty());

        wander.bind(AgentId(0));
        wander.process(&heading_right()).unwrap();
        wander.debug_draw(&mut log);

        match log.commands.as_slice() {
            [DrawCommand::Circle {
                center, radius, ..
            }, DrawCommand::Circle { .. }, DrawCommand::Circle { .. }] => {
                assert_eq!(*center, Vector2D::new(50.0, 0.0));
                assert_eq!(*radius, 25.0);
            }
            other => panic!("unexpected draw commands: {other:?}"),
        }
    }
}
