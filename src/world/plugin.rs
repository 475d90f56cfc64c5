use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimulationConfig;
use crate::debug::GizmoSurface;

use super::World;

#[derive(Resource)]
pub struct SimulationWorld(pub World);

#[derive(Resource, Debug, Clone)]
pub struct SimulationSettings(pub SimulationConfig);

/// Populates a [`World`] from the config on startup, advances it on the fixed
/// timestep and renders it with gizmos.
pub struct SteeringWorldPlugin {
    pub config: SimulationConfig,
}

impl SteeringWorldPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SteeringWorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationSettings(self.config.clone()))
            .insert_resource(SimulationWorld(World::new(self.config.world)))
            .add_systems(Startup, populate_world)
            .add_systems(FixedUpdate, tick_world)
            .add_systems(Update, draw_world);
    }
}

fn populate_world(settings: Res<SimulationSettings>, mut world: ResMut<SimulationWorld>) {
    let config = &settings.0;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match world.0.populate(config, &mut rng) {
        Ok(spawned) => info!(
            "Spawned {} agents on a {}x{} grid",
            spawned, config.world.columns, config.world.rows
        ),
        Err(err) => error!("Could not populate the world: {}", err),
    }
}

fn tick_world(mut world: ResMut<SimulationWorld>) {
    let report = world.0.tick();
    if report.failed > 0 {
        debug!("{} steering failures this tick", report.failed);
    }
}

fn draw_world(mut gizmos: Gizmos, world: Res<SimulationWorld>) {
    let origin = Vec2::new(
        -(world.0.width() as f32) / 2.0,
        world.0.height() as f32 / 2.0,
    );

    let mut surface = GizmoSurface::new(&mut gizmos, origin);
    world.0.debug_draw(&mut surface);
}
