//! Boostfall: a vertical fall-and-boost arcade game.
//!
//! The player drops down a shaft, steers around obstacles, collects boost
//! pickups and spends them to launch back upward.  Reaching the finish gate at
//! the bottom ends the run; landing on the ground ends it too.
//!
//! [`GameplayPlugin`] holds everything that runs without a window, so
//! integration tests can drive a full run under `MinimalPlugins`.  The binary
//! adds the camera, HUD and menus on top.

pub mod camera;
pub mod config;
pub mod constants;
pub mod contact;
pub mod error;
pub mod feedback;
pub mod flow;
pub mod hud;
pub mod level;
pub mod menu;
pub mod particles;
pub mod player;

use bevy::prelude::*;

/// Gameplay core: contacts, player, flow, level, particles and feedback.
///
/// `render: false` skips mesh and audio asset loading for headless apps.
/// Requires `GameState` (from [`menu::MainMenuPlugin`] or `init_state`) and a
/// [`config::GameConfig`] resource.
pub struct GameplayPlugin {
    pub render: bool,
}

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            feedback::FeedbackPlugin { audio: self.render },
            contact::ContactPlugin,
            player::PlayerPlugin {
                render: self.render,
            },
            flow::FlowPlugin,
            level::LevelPlugin {
                render: self.render,
            },
            particles::ParticlesPlugin {
                render: self.render,
            },
        ));
    }
}
