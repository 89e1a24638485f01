//! Boost maneuver: the halt → launch → settle sequence that spends boost.
//!
//! ## Phases
//!
//! | Phase       | Gravity | Collisions | Per sub-interval                         | Exit when                 |
//! |-------------|---------|------------|------------------------------------------|---------------------------|
//! | `Idle`      | normal  | on         | -                                        | boost pressed, boost > 0  |
//! | `Halting`   | 0       | off        | every 0.05 s: `vy = lerp(vy, 0, 0.5)`    | `|vy| < 0.005`            |
//! | `Launching` | 0       | off        | every 0.025 s: compare y to target       | `y >= target_y`           |
//! | `Settling`  | 0       | on         | -                                        | 1 s elapsed               |
//!
//! Boost is spent on entry to `Launching`, before the player has moved, so the
//! HUD meter is already empty while the player is still rising.
//!
//! Every wait is an elapsed-time accumulator advanced by [`BoostManeuver::tick`],
//! so the whole sequence can be driven with virtual time in tests.

use super::boost::BoostAccumulator;
use super::state::{Player, PlayerBody, PlayerIntent};
use crate::config::GameConfig;
use crate::feedback::{AudioCue, Feedback, FeedbackSink};
use crate::flow::GameFlow;
use bevy::prelude::*;

/// Current phase of the maneuver state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManeuverPhase {
    Idle,
    Halting { elapsed: f32 },
    Launching { target_y: f32, elapsed: f32 },
    Settling { elapsed: f32 },
}

/// Drives one player's boost maneuver.
#[derive(Component, Debug, Clone)]
pub struct BoostManeuver {
    phase: ManeuverPhase,
    pub halt_interval: f32,
    pub halt_lerp: f32,
    pub halt_epsilon: f32,
    pub launch_impulse: f32,
    pub ascent_poll_interval: f32,
    pub settle_cooldown: f32,
    pub default_gravity_scale: f32,
}

impl BoostManeuver {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            phase: ManeuverPhase::Idle,
            halt_interval: config.halt_interval,
            halt_lerp: config.halt_lerp,
            halt_epsilon: config.halt_epsilon,
            launch_impulse: config.launch_impulse,
            ascent_poll_interval: config.ascent_poll_interval,
            settle_cooldown: config.settle_cooldown,
            default_gravity_scale: config.default_gravity_scale,
        }
    }

    #[inline]
    pub fn phase(&self) -> ManeuverPhase {
        self.phase
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == ManeuverPhase::Idle
    }

    #[inline]
    pub fn is_launching(&self) -> bool {
        matches!(self.phase, ManeuverPhase::Launching { .. })
    }

    /// Start a maneuver if the player holds boost and is not already busy.
    ///
    /// Returns `false` without touching any state otherwise; presses while
    /// busy are dropped, not queued.
    pub fn try_begin(&mut self, body: &mut PlayerBody, boost: &BoostAccumulator) -> bool {
        if body.busy || !self.is_idle() || boost.collected() == 0 {
            return false;
        }
        body.busy = true;
        body.collisions_enabled = false;
        body.gravity_scale = 0.0;
        // Fall control is suspended while busy, so nothing else would stop
        // sideways drift.
        body.velocity.x = 0.0;
        self.phase = ManeuverPhase::Halting { elapsed: 0.0 };
        true
    }

    /// Advance the state machine by `dt` seconds.
    ///
    /// Only mutates velocity, gravity and flags; the integrator moves the body.
    pub fn tick<F: FeedbackSink + ?Sized>(
        &mut self,
        dt: f32,
        body: &mut PlayerBody,
        boost: &mut BoostAccumulator,
        feedback: &mut F,
    ) {
        match self.phase {
            ManeuverPhase::Idle => {}
            ManeuverPhase::Halting { elapsed } => {
                let mut elapsed = elapsed + dt;
                while elapsed >= self.halt_interval {
                    elapsed -= self.halt_interval;
                    body.velocity.y = lerp(body.velocity.y, 0.0, self.halt_lerp);
                    if body.velocity.y.abs() < self.halt_epsilon {
                        self.launch(body, boost, feedback);
                        return;
                    }
                }
                self.phase = ManeuverPhase::Halting { elapsed };
            }
            ManeuverPhase::Launching { target_y, elapsed } => {
                let mut elapsed = elapsed + dt;
                if elapsed >= self.ascent_poll_interval {
                    elapsed %= self.ascent_poll_interval;
                    if body.position.y >= target_y {
                        self.settle(body, feedback);
                        return;
                    }
                }
                self.phase = ManeuverPhase::Launching { target_y, elapsed };
            }
            ManeuverPhase::Settling { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.settle_cooldown {
                    body.gravity_scale = self.default_gravity_scale;
                    body.busy = false;
                    self.phase = ManeuverPhase::Idle;
                } else {
                    self.phase = ManeuverPhase::Settling { elapsed };
                }
            }
        }
    }

    fn launch<F: FeedbackSink + ?Sized>(
        &mut self,
        body: &mut PlayerBody,
        boost: &mut BoostAccumulator,
        feedback: &mut F,
    ) {
        let distance = boost.spend(feedback);
        let target_y = body.position.y + distance;
        body.velocity.y = 0.0;
        body.apply_impulse(Vec2::Y * self.launch_impulse);
        feedback.play(AudioCue::ImpulseStart);
        self.phase = ManeuverPhase::Launching {
            target_y,
            elapsed: 0.0,
        };
    }

    fn settle<F: FeedbackSink + ?Sized>(&mut self, body: &mut PlayerBody, feedback: &mut F) {
        body.velocity = Vec2::ZERO;
        body.collisions_enabled = true;
        feedback.play(AudioCue::ImpulseStop);
        self.phase = ManeuverPhase::Settling { elapsed: 0.0 };
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// FixedUpdate: start a maneuver on a latched boost press.
///
/// The press is consumed whether or not a maneuver starts.
pub fn boost_activation_system(
    mut q: Query<(&mut BoostManeuver, &mut PlayerBody, &BoostAccumulator), With<Player>>,
    mut intent: ResMut<PlayerIntent>,
    flow: Res<GameFlow>,
) {
    if !intent.take_boost() || !flow.is_running() {
        return;
    }
    let Ok((mut maneuver, mut body, boost)) = q.single_mut() else {
        return;
    };
    let held = boost.collected();
    if maneuver.try_begin(&mut body, boost) {
        info!("[maneuver] Boost activated with {held} pickups");
    }
}

/// FixedUpdate: advance the player's maneuver by one fixed step.
///
/// Frozen once the run has ended, so a pending cooldown cannot restore gravity
/// under the finish lift-off.
pub fn maneuver_tick_system(
    mut q: Query<(&mut BoostManeuver, &mut PlayerBody, &mut BoostAccumulator), With<Player>>,
    mut feedback: MessageWriter<Feedback>,
    flow: Res<GameFlow>,
    time: Res<Time>,
) {
    if !flow.is_running() {
        return;
    }
    let Ok((mut maneuver, mut body, mut boost)) = q.single_mut() else {
        return;
    };
    if maneuver.is_idle() {
        return;
    }
    let before = maneuver.phase();
    maneuver.tick(time.delta_secs(), &mut body, &mut boost, &mut feedback);
    let after = maneuver.phase();
    if std::mem::discriminant(&before) != std::mem::discriminant(&after) {
        debug!("[maneuver] {before:?} -> {after:?}");
    }
}
