//! Camera rig: follows the player down the shaft and zooms out with fall speed.
//!
//! ## Zoom
//!
//! The target zoom (orthographic half-height, world units) is the player's
//! vertical speed clamped to `[min_zoom, |max_falling_velocity|]`, so the view
//! widens as the player accelerates.  Smoothing is asymmetric: widening uses
//! the slower `zoom_in_smoothing` rate, narrowing the faster
//! `zoom_out_smoothing` rate.
//!
//! ## Follow
//!
//! By default the camera is locked to x = 0 and sits `camera_offset_y` below
//! the player.  With `camera_clamp_follow` it lerps toward the player and may
//! drift horizontally, but only within ±`camera_horizontal_clamp`, which keeps
//! dodges from swinging the whole view.

use crate::config::GameConfig;
use crate::flow::GameFlow;
use crate::menu::GameState;
use crate::player::{Player, PlayerBody};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Window height assumed when no window exists (headless runs).
const FALLBACK_WINDOW_HEIGHT: f32 = 720.0;

/// Camera follow and zoom state.
#[derive(Component, Debug, Clone)]
pub struct CameraRig {
    pub position: Vec2,
    /// Orthographic half-height in world units.
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_in_smoothing: f32,
    pub zoom_out_smoothing: f32,
    pub follow_smoothing: f32,
    pub offset_y: f32,
    pub horizontal_clamp: f32,
    pub clamp_follow: bool,
}

impl CameraRig {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            position: Vec2::new(0.0, -config.camera_offset_y),
            zoom: config.min_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_fall_zoom(),
            zoom_in_smoothing: config.zoom_in_smoothing,
            zoom_out_smoothing: config.zoom_out_smoothing,
            follow_smoothing: config.camera_follow_smoothing,
            offset_y: config.camera_offset_y,
            horizontal_clamp: config.camera_horizontal_clamp,
            clamp_follow: config.camera_clamp_follow,
        }
    }

    /// Zoom the rig is heading toward for a given player velocity.
    pub fn target_zoom(&self, velocity: Vec2) -> f32 {
        velocity.y.abs().clamp(self.min_zoom, self.max_zoom)
    }

    /// Advance follow and zoom by `dt` seconds toward the player.
    pub fn update(&mut self, player_position: Vec2, player_velocity: Vec2, dt: f32) {
        self.follow(player_position, dt);

        let target = self.target_zoom(player_velocity);
        let rate = if target > self.zoom {
            self.zoom_in_smoothing
        } else {
            self.zoom_out_smoothing
        };
        self.zoom = lerp_clamped(self.zoom, target, rate * dt);
    }

    fn follow(&mut self, player_position: Vec2, dt: f32) {
        let target = Vec2::new(player_position.x, player_position.y - self.offset_y);
        if self.clamp_follow {
            let t = (self.follow_smoothing * dt).clamp(0.0, 1.0);
            let mut next = self.position.lerp(target, t);
            next.x = next.x.clamp(-self.horizontal_clamp, self.horizontal_clamp);
            self.position = next;
        } else {
            self.position = Vec2::new(0.0, target.y);
        }
    }
}

/// `a + (b - a) * t` with `t` clamped to `[0, 1]`.
#[inline]
fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Orthographic `scale` that shows `zoom` world units above and below centre.
///
/// Bevy's default 2D projection maps one world unit to one pixel at scale 1.
#[inline]
pub fn projection_scale(zoom: f32, window_height: f32) -> f32 {
    zoom * 2.0 / window_height.max(1.0)
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            camera_rig_system.run_if(in_state(GameState::Playing)),
        );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Startup: spawn the 2D camera with its rig.
pub fn setup_camera(mut commands: Commands, config: Res<GameConfig>) {
    let rig = CameraRig::from_config(&config);
    commands.spawn((
        Camera2d,
        Transform::from_translation(rig.position.extend(0.0)),
        rig,
    ));
    info!("[camera] Camera spawned");
}

/// Update: move the rig toward the player and push it into the camera.
///
/// Frozen once the player has finished so the player can fly out of frame.
pub fn camera_rig_system(
    q_player: Query<&PlayerBody, With<Player>>,
    mut q_camera: Query<(&mut CameraRig, &mut Transform, &mut Projection), Without<Player>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    flow: Res<GameFlow>,
    time: Res<Time>,
) {
    if flow.is_finished() {
        return;
    }
    let Ok(body) = q_player.single() else {
        return;
    };
    let Ok((mut rig, mut transform, mut projection)) = q_camera.single_mut() else {
        return;
    };

    rig.update(body.position, body.velocity, time.delta_secs());

    transform.translation.x = rig.position.x;
    transform.translation.y = rig.position.y;

    let window_height = q_window
        .single()
        .map(|w| w.height())
        .unwrap_or(FALLBACK_WINDOW_HEIGHT);
    if let Projection::Orthographic(ortho) = projection.as_mut() {
        ortho.scale = projection_scale(rig.zoom, window_height);
    }
}
