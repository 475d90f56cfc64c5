use bevy::prelude::*;

use steer::config::SimulationConfig;
use steer::world::SteeringWorldPlugin;

pub const FRAMERATE: f64 = 60.0;
pub const FIXED_TIMESTEP: f64 = 1.0 / FRAMERATE;

const CONFIG_PATH: &str = "configs/simulation.json";

fn main() {
    let (config, load_error) = match SimulationConfig::load(CONFIG_PATH) {
        Ok(config) => (config, None),
        Err(err) => (SimulationConfig::default(), Some(err)),
    };

    let grid = config.world.grid_size as f32;
    let resolution = (
        config.world.width() as f32 + grid,
        config.world.height() as f32 + grid,
    );

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Steering Grid".into(),
            resolution: resolution.into(),
            ..default()
        }),
        ..default()
    }));

    if let Some(err) = load_error {
        warn!("{}, falling back to the default config", err);
    }

    app.add_plugins(SteeringWorldPlugin::new(config))
        .add_systems(Startup, spawn_camera)
        .insert_resource(Time::<Fixed>::from_seconds(FIXED_TIMESTEP))
        .insert_resource(Msaa::Off);

    app.run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}
