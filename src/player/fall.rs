//! Fall control: terminal-velocity cap, horizontal movement, and track clamp.

use super::state::{Player, PlayerBody, PlayerIntent};
use crate::config::GameConfig;
use crate::flow::GameFlow;
use bevy::prelude::*;

/// Per-tick fall and steering rules for the player.
///
/// Gravity starts disabled; the first non-zero horizontal input enables it
/// (`started`), and this controller never disables it again.
#[derive(Component, Debug, Clone)]
pub struct FallController {
    /// Downward speed cap (negative).
    pub max_falling_velocity: f32,
    pub horizontal_move_speed: f32,
    pub track_half_width: f32,
    pub default_gravity_scale: f32,
    started: bool,
}

impl FallController {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            max_falling_velocity: config.max_falling_velocity,
            horizontal_move_speed: config.horizontal_move_speed,
            track_half_width: config.track_half_width,
            default_gravity_scale: config.default_gravity_scale,
            started: false,
        }
    }

    /// Whether the player has given their first input this run.
    #[inline]
    pub fn started(&self) -> bool {
        self.started
    }

    /// Apply one physics step of fall control.  No-op while the body is busy.
    pub fn step(&mut self, body: &mut PlayerBody, horizontal_axis: f32) {
        if body.busy {
            return;
        }

        body.velocity.y = body.velocity.y.max(self.max_falling_velocity);

        if !self.started {
            if horizontal_axis == 0.0 {
                return;
            }
            self.started = true;
            body.gravity_scale = self.default_gravity_scale;
        }

        body.velocity.x = horizontal_axis.clamp(-1.0, 1.0) * self.horizontal_move_speed;
        self.keep_on_track(body);
    }

    /// Hold the body inside the track walls, dropping any sideways velocity
    /// that points into a wall.
    ///
    /// Unlike [`step`](Self::step) this applies while busy, so a knockback
    /// taken mid-maneuver cannot carry the player out of the shaft.
    pub fn keep_on_track(&self, body: &mut PlayerBody) {
        let limit = self.track_half_width;
        if body.position.x >= limit {
            body.position.x = limit;
            body.velocity.x = body.velocity.x.min(0.0);
        } else if body.position.x <= -limit {
            body.position.x = -limit;
            body.velocity.x = body.velocity.x.max(0.0);
        }
    }
}

/// FixedUpdate: run [`FallController::step`] for the player while the run is live.
pub fn fall_control_system(
    mut q: Query<(&mut FallController, &mut PlayerBody), With<Player>>,
    intent: Res<PlayerIntent>,
    flow: Res<GameFlow>,
) {
    if !flow.is_running() {
        return;
    }
    let Ok((mut fall, mut body)) = q.single_mut() else {
        return;
    };
    let was_started = fall.started();
    fall.step(&mut body, intent.horizontal_axis);
    if !was_started && fall.started() {
        info!("[fall] First input; gravity enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_controller() -> (FallController, PlayerBody) {
        let mut fall = FallController::from_config(&GameConfig::default());
        let mut body = PlayerBody::at(Vec2::ZERO);
        fall.step(&mut body, 1.0);
        assert!(fall.started());
        (fall, body)
    }

    #[test]
    fn gravity_stays_off_until_first_horizontal_input() {
        let mut fall = FallController::from_config(&GameConfig::default());
        let mut body = PlayerBody::at(Vec2::ZERO);
        for _ in 0..10 {
            fall.step(&mut body, 0.0);
        }
        assert!(!fall.started());
        assert_eq!(body.gravity_scale, 0.0);

        fall.step(&mut body, -0.3);
        assert!(fall.started());
        assert_eq!(body.gravity_scale, 1.0);
    }

    #[test]
    fn gravity_latch_is_one_way() {
        let (mut fall, mut body) = started_controller();
        fall.step(&mut body, 0.0);
        fall.step(&mut body, 0.0);
        assert!(fall.started());
        assert_eq!(body.gravity_scale, 1.0);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn fall_speed_never_exceeds_cap() {
        let (mut fall, mut body) = started_controller();
        for v in [-1000.0, -10.5, -10.0, -3.0, 0.0, 7.0] {
            body.velocity.y = v;
            fall.step(&mut body, 0.0);
            assert!(body.velocity.y >= fall.max_falling_velocity);
        }
        body.velocity.y = 7.0;
        fall.step(&mut body, 0.0);
        assert_eq!(body.velocity.y, 7.0, "upward velocity is not capped");
    }

    #[test]
    fn horizontal_position_is_clamped_to_track() {
        let (mut fall, mut body) = started_controller();
        for x in [-100.0, -4.3, -4.2, 0.0, 3.9, 4.2001, 55.0] {
            body.position.x = x;
            fall.step(&mut body, 1.0);
            assert!((-4.2..=4.2).contains(&body.position.x), "x = {x}");
        }
    }

    #[test]
    fn horizontal_velocity_follows_axis() {
        let (mut fall, mut body) = started_controller();
        fall.step(&mut body, -0.5);
        assert_eq!(body.velocity.x, -0.5 * fall.horizontal_move_speed);
    }

    #[test]
    fn wall_stops_outward_drift_while_busy() {
        let (fall, mut body) = started_controller();
        body.busy = true;
        body.position.x = 4.5;
        body.velocity = Vec2::new(2.85, 0.0);
        fall.keep_on_track(&mut body);
        assert_eq!(body.position.x, fall.track_half_width);
        assert_eq!(body.velocity.x, 0.0);

        // Velocity back toward the centre is kept.
        body.position.x = -4.4;
        body.velocity.x = 1.0;
        fall.keep_on_track(&mut body);
        assert_eq!(body.position.x, -fall.track_half_width);
        assert_eq!(body.velocity.x, 1.0);
    }

    #[test]
    fn busy_body_is_left_alone() {
        let (mut fall, mut body) = started_controller();
        body.busy = true;
        body.velocity = Vec2::new(2.0, -50.0);
        body.position.x = 9.0;
        let before = body.clone();
        fall.step(&mut body, -1.0);
        assert_eq!(body, before);
    }
}
