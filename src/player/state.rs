//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live here.
//! Systems that mutate this state are in the sibling modules:
//! - [`super::control`]: input sampling
//! - [`super::fall`]: per-tick fall capping and horizontal movement
//! - [`super::boost`]: boost pickups and obstacle knockback
//! - [`super::maneuver`]: the halt → launch → settle boost sequence

use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Kinematic state of the player.
///
/// The player's Rapier body is `KinematicPositionBased`: Rapier only uses it
/// to detect overlaps, while motion is integrated here by
/// [`PlayerBody::integrate`] every fixed step and copied to the `Transform`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Multiplier on world gravity; 0 while hanging at spawn or boosting.
    pub gravity_scale: f32,
    /// `true` while a boost maneuver is in flight.  Blocks new boosts and
    /// suspends fall control.
    pub busy: bool,
    /// When `false`, contacts with pickups, obstacles and the ground are ignored.
    pub collisions_enabled: bool,
}

impl PlayerBody {
    /// A body at rest at `position` with gravity off until the first input.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            gravity_scale: 0.0,
            busy: false,
            collisions_enabled: true,
        }
    }

    /// Semi-implicit Euler step under `gravity` (u/s², negative is down).
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.velocity.y += gravity * self.gravity_scale * dt;
        self.position += self.velocity * dt;
    }

    /// Add an instantaneous velocity change (unit mass).
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
    }
}

// ── Resources ──────────────────────────────────────────────────────────────────

/// Abstract input for one player, written by the input systems and consumed by
/// the fixed-step systems.
///
/// `boost_pressed` is latched: a press seen on any frame stays set until a
/// fixed step consumes it, so a press is never lost between physics ticks.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    /// Horizontal axis in `[-1, 1]`.
    pub horizontal_axis: f32,
    pub boost_pressed: bool,
}

impl PlayerIntent {
    /// Return and clear the latched boost press.
    pub fn take_boost(&mut self) -> bool {
        std::mem::take(&mut self.boost_pressed)
    }
}

/// Seconds of play since the player's first input.  Frozen once the run ends.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct RunClock {
    pub secs: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_without_gravity_scale_drifts_linearly() {
        let mut body = PlayerBody::at(Vec2::ZERO);
        body.velocity = Vec2::new(1.0, 2.0);
        body.integrate(0.5, -9.81);
        assert_eq!(body.velocity, Vec2::new(1.0, 2.0));
        assert_eq!(body.position, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn gravity_scale_accelerates_downward() {
        let mut body = PlayerBody::at(Vec2::ZERO);
        body.gravity_scale = 1.0;
        body.integrate(1.0, -10.0);
        assert_eq!(body.velocity.y, -10.0);
        assert_eq!(body.position.y, -10.0);
    }

    #[test]
    fn boost_press_is_consumed_once() {
        let mut intent = PlayerIntent {
            horizontal_axis: 0.0,
            boost_pressed: true,
        };
        assert!(intent.take_boost());
        assert!(!intent.take_boost());
    }
}
