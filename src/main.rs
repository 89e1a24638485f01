use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use boostfall::camera::CameraPlugin;
use boostfall::config::{load_game_config, CONFIG_PATH};
use boostfall::constants::PHYSICS_HZ;
use boostfall::hud::HudPlugin;
use boostfall::menu::{EndScreenPlugin, MainMenuPlugin};
use boostfall::GameplayPlugin;

/// Player motion is integrated by the gameplay systems; Rapier only reports
/// overlaps, so its own gravity is off.
fn setup_physics_config(mut config: Query<&mut RapierConfiguration>) {
    for mut cfg in config.iter_mut() {
        cfg.gravity = Vec2::ZERO;
    }
}

fn main() {
    // Config is loaded before the app exists so a bad value never starts a run.
    let config = load_game_config(CONFIG_PATH);
    if let Err(err) = config.validate() {
        eprintln!("✗ {err}");
        std::process::exit(1);
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Boostfall".into(),
                resolution: WindowResolution::new(720, 960),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.03, 0.03, 0.06)))
        .insert_resource(config)
        .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
        // pixels_per_meter(1.0): world units are metres, the camera scales them.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .add_plugins(MainMenuPlugin)
        .add_plugins(GameplayPlugin { render: true })
        .add_plugins((CameraPlugin, HudPlugin, EndScreenPlugin))
        .add_systems(Startup, setup_physics_config)
        .run();
}
